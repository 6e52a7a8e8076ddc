// Yield reserve boundary.
//
// The reserve is an external lending/custody platform. The vault supplies idle
// collateral, and the reserve reports a balance that grows with accrued yield.
// Only its contract is consumed; nothing here reimplements it.

use crate::error::ExternalError;
use crate::types::{AssetId, Amount, UserId};

/// Idle collateral held directly by an address (not yet in the reserve).
pub trait CollateralToken {
    fn collateral_balance(&self, holder: UserId) -> Result<Amount, ExternalError>;
}

pub trait YieldReserve {
    /// Pull `amount` of `asset` from the vault's idle collateral and credit the
    /// reserve position of `on_behalf_of`.
    fn supply(&mut self, asset: AssetId, amount: Amount, on_behalf_of: UserId) -> Result<(), ExternalError>;

    /// Withdraw from the vault's reserve position straight to `to`. Returns the
    /// amount actually delivered.
    fn withdraw(&mut self, asset: AssetId, amount: Amount, to: UserId) -> Result<Amount, ExternalError>;

    /// Current value of `holder`'s position, principal plus accrued yield.
    fn reserve_balance(&self, asset: AssetId, holder: UserId) -> Result<Amount, ExternalError>;

    /// Underlying the reserve can hand out right now. Can be below the sum of
    /// positions when the platform has lent collateral out.
    fn available_liquidity(&self, asset: AssetId) -> Result<Amount, ExternalError>;
}
