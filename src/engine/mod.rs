// 8.0: vault engine. owns the ledger and resolution state, drives the external
// collaborators and commits ledger changes only after every call they make succeeds.

mod config;
mod core;
mod deposits;
mod queries;
mod resolution;
mod results;
mod withdrawals;

pub use config::EngineConfig;
pub use core::{Externals, Transactional, Vault};
pub use results::{DepositReceipt, MatchOutcome, ReclaimReceipt, ResolutionReceipt, WithdrawalReceipt};
