// outcome-vault: pooled YES/NO claim vault core.
// nets opposing claims into collateral, parks it in a yield reserve, and pays the
// winning side principal plus yield once the oracle reports.
// all collaborators sit behind traits; the engine itself does no I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: MarketId, ClaimId, UserId, Side, Amount, Timestamp
//   2.x  market.rs: market binding, claim id -> side
//        ledger.rs: per-user balances and pool totals
//   3.x  matching.rs: greedy symmetric netting plan
//   4.x  resolution.rs: oracle report, winner rule, one-way state
//   5.x  payout.rs: proportional payout and liquidity cap
//   6.x  custody.rs: deposit notifications, outbound claim transfers
//        conversion.rs: merge/redeem and oracle traits
//        reserve.rs: collateral token and yield reserve traits
//   7.x  config.rs: vault config, JSON load, env presets
//   8.x  engine/: vault engine: deposits, resolution, withdrawals, queries
//   9.x  sim.rs: in-memory chain implementing every collaborator (mocked)
//        service.rs: mutex-guarded shared vault, reentrancy refusal
//   11.x events.rs: state transition events for audit

// core accounting modules
pub mod engine;
pub mod error;
pub mod events;
pub mod ledger;
pub mod market;
pub mod matching;
pub mod payout;
pub mod resolution;
pub mod types;

// integration modules
pub mod config;
pub mod conversion;
pub mod custody;
pub mod reserve;
pub mod service;
pub mod sim;

// re exports for convenience
pub use engine::*;
pub use error::*;
pub use events::*;
pub use ledger::*;
pub use market::*;
pub use matching::*;
pub use payout::*;
pub use resolution::*;
pub use types::*;
pub use config::{ConfigError, Environment, VaultConfig};
pub use conversion::{ConversionAdapter, OutcomeOracle};
pub use custody::{BatchClaimTransfer, ClaimCustody, ClaimTransfer};
pub use reserve::{CollateralToken, YieldReserve};
pub use service::SharedVault;
pub use sim::{deliver_batch, deliver_claims, Fault, SimulatedChain};
