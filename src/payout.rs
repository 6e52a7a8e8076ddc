//! Payout computation.
//!
//! Pure functions of ledger state and the reserve balance. Both divisions floor,
//! so a user is under-paid by at most a few minimal units and never over-paid.
//! The dust stays in the reserve.

use crate::error::{VaultError, VaultResult};
use crate::types::{Amount, SCALE};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutInputs {
    pub user_balance: Amount,
    pub side_deposits: Amount,
    pub total_matched: Amount,
    pub reserve_balance: Amount,
    pub is_resolved: bool,
}

/// Collateral owed to a holder of `user_balance` claims on the winning side.
///
/// Before resolution this is a preview that counts not-yet-converted claims
/// at par with no yield on them. It is accurate just before resolution but
/// not a guarantee earlier on.
pub fn calculate_payout(inputs: &PayoutInputs) -> VaultResult<Amount> {
    if inputs.side_deposits.is_zero() {
        return Err(VaultError::NoWinningDeposits);
    }

    let share = mul_div_floor(inputs.user_balance.value(), SCALE, inputs.side_deposits.value())?;

    let mut pool = inputs.reserve_balance;
    if !inputs.is_resolved {
        let unconverted = inputs.side_deposits.saturating_sub(inputs.total_matched);
        pool = pool.checked_add(unconverted).ok_or(VaultError::ArithmeticOverflow)?;
    }

    let payout = mul_div_floor(pool.value(), share, SCALE)?;

    Ok(Amount::new(payout))
}

// floor(a * b / d) through a 256-bit product. only the quotient has to fit in u128.
// d is never zero at the call sites above.
fn mul_div_floor(a: u128, b: u128, d: u128) -> VaultResult<u128> {
    let quotient = U256::from(a) * U256::from(b) / U256::from(d);
    if quotient > U256::from(u128::MAX) {
        return Err(VaultError::ArithmeticOverflow);
    }
    Ok(quotient.low_u128())
}

// 5.1: what the reserve can actually hand over right now. the rest is forfeited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CappedPayout {
    pub requested: Amount,
    pub actual: Amount,
}

impl CappedPayout {
    pub fn shortfall(&self) -> Amount {
        self.requested.saturating_sub(self.actual)
    }

    pub fn is_capped(&self) -> bool {
        self.actual < self.requested
    }
}

pub fn cap_to_liquidity(requested: Amount, available: Amount) -> CappedPayout {
    CappedPayout {
        requested,
        actual: requested.min(available),
    }
}
