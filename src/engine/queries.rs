// 8.5: read-only views. reserve-backed values are read from the reserve at call time.

use super::core::{Externals, Vault};
use crate::error::{VaultError, VaultResult};
use crate::ledger::{PoolTotals, UserPosition};
use crate::payout::{calculate_payout, PayoutInputs};
use crate::resolution::{Resolution, ResolutionState};
use crate::types::{Amount, Side, UserId};
use rust_decimal::Decimal;

impl<E: Externals> Vault<E> {
    pub fn position(&self, user: UserId) -> UserPosition {
        self.ledger.position(user)
    }

    pub fn totals(&self) -> &PoolTotals {
        self.ledger.totals()
    }

    pub fn unmatched(&self, side: Side) -> Amount {
        self.ledger.totals().unmatched(side)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_resolved()
    }

    pub fn resolution_state(&self) -> &ResolutionState {
        &self.resolution
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.resolution()
    }

    pub fn winning_side(&self) -> Option<Side> {
        self.resolution.winning_side()
    }

    pub fn payout_ratio(&self) -> Option<Decimal> {
        self.resolution.resolution().and_then(|r| r.payout_ratio())
    }

    /// Current value of the vault's reserve position, principal plus yield.
    pub fn reserve_value(&self) -> VaultResult<Amount> {
        Ok(self
            .externals
            .reserve_balance(self.market.collateral, self.market.vault_address)?)
    }

    /// Yield earned so far: what the reserve holds plus what has been paid out,
    /// less everything ever supplied.
    pub fn accrued_yield(&self) -> VaultResult<Amount> {
        let totals = self.ledger.totals();
        let gross = self
            .reserve_value()?
            .checked_add(totals.paid_out)
            .ok_or(VaultError::ArithmeticOverflow)?;
        Ok(gross.saturating_sub(totals.yielding))
    }

    // accrued yield as a fraction of principal supplied. None before anything is supplied.
    pub fn yield_rate(&self) -> VaultResult<Option<Decimal>> {
        let principal = self.ledger.totals().yielding;
        if principal.is_zero() {
            return Ok(None);
        }
        let accrued = self.accrued_yield()?;
        match (accrued.to_decimal(), principal.to_decimal()) {
            (Some(a), Some(p)) => Ok(a.checked_div(p)),
            _ => Err(VaultError::ArithmeticOverflow),
        }
    }

    /// What `user` would receive if `side` wins, at the current reserve value.
    /// After resolution a losing side estimates zero.
    pub fn payout_estimate(&self, user: UserId, side: Side) -> VaultResult<Amount> {
        let balance = self.ledger.balance(user, side);
        if balance.is_zero() {
            return Ok(Amount::ZERO);
        }
        if let Some(winner) = self.resolution.winning_side() {
            if winner != side {
                return Ok(Amount::ZERO);
            }
        }

        let totals = self.ledger.totals();
        calculate_payout(&PayoutInputs {
            user_balance: balance,
            side_deposits: totals.deposits(side),
            total_matched: totals.matched,
            reserve_balance: self.reserve_value()?,
            is_resolved: self.resolution.is_resolved(),
        })
    }

    /// Estimate against the recorded winner if resolved, or against the oracle's
    /// current report if it has finalized but nobody has resolved yet.
    pub fn settlement_estimate(&self, user: UserId) -> VaultResult<Amount> {
        let winner = match self.resolution.winning_side() {
            Some(side) => side,
            None => {
                let report = self.externals.report(self.market.id)?;
                crate::resolution::decide_winner(&report)?
            }
        };
        self.payout_estimate(user, winner)
    }

    // debug aid: both conservation invariants that hold at every state
    pub fn check_invariants(&self) -> bool {
        let totals = self.ledger.totals();
        let conserved = self.ledger.is_conserved();
        let bounded = self.resolution.is_resolved()
            || totals.matched <= totals.yes_deposits.min(totals.no_deposits);
        conserved && bounded
    }
}
