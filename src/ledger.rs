//! Per-user claim ledger and pool totals.
//!
//! The ledger is pure state. Totals are updated in the same call as the user
//! balance they summarise, so `totals().yes_deposits` always equals the sum
//! of every user's YES balance.

use crate::error::{VaultError, VaultResult};
use crate::types::{Amount, Side, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPosition {
    pub yes_balance: Amount,
    pub no_balance: Amount,
}

impl UserPosition {
    pub fn balance(&self, side: Side) -> Amount {
        match side {
            Side::Yes => self.yes_balance,
            Side::No => self.no_balance,
        }
    }

    fn balance_mut(&mut self, side: Side) -> &mut Amount {
        match side {
            Side::Yes => &mut self.yes_balance,
            Side::No => &mut self.no_balance,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.yes_balance.is_zero() && self.no_balance.is_zero()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTotals {
    pub yes_deposits: Amount,
    pub no_deposits: Amount,
    // cumulative claim pairs merged into collateral
    pub matched: Amount,
    // cumulative principal forwarded to the reserve. not a live balance.
    pub yielding: Amount,
    // cumulative collateral paid out to users
    pub paid_out: Amount,
}

impl PoolTotals {
    pub fn deposits(&self, side: Side) -> Amount {
        match side {
            Side::Yes => self.yes_deposits,
            Side::No => self.no_deposits,
        }
    }

    fn deposits_mut(&mut self, side: Side) -> &mut Amount {
        match side {
            Side::Yes => &mut self.yes_deposits,
            Side::No => &mut self.no_deposits,
        }
    }

    // claims on `side` the vault still holds in claim form
    pub fn unmatched(&self, side: Side) -> Amount {
        self.deposits(side).saturating_sub(self.matched)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    positions: HashMap<UserId, UserPosition>,
    totals: PoolTotals,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, user: UserId) -> UserPosition {
        self.positions.get(&user).copied().unwrap_or_default()
    }

    pub fn balance(&self, user: UserId, side: Side) -> Amount {
        self.position(user).balance(side)
    }

    pub fn totals(&self) -> &PoolTotals {
        &self.totals
    }

    pub fn users(&self) -> impl Iterator<Item = (&UserId, &UserPosition)> {
        self.positions.iter()
    }

    /// Checks that a credit would succeed without applying it.
    pub fn check_credit(&self, user: UserId, side: Side, amount: Amount) -> VaultResult<()> {
        if amount.is_zero() {
            return Err(VaultError::InvalidAmount);
        }
        self.balance(user, side)
            .checked_add(amount)
            .ok_or(VaultError::ArithmeticOverflow)?;
        self.totals
            .deposits(side)
            .checked_add(amount)
            .ok_or(VaultError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn credit(&mut self, user: UserId, side: Side, amount: Amount) -> VaultResult<()> {
        self.check_credit(user, side, amount)?;
        let position = self.positions.entry(user).or_default();
        let balance = position.balance_mut(side);
        *balance = balance.checked_add(amount).ok_or(VaultError::ArithmeticOverflow)?;
        let total = self.totals.deposits_mut(side);
        *total = total.checked_add(amount).ok_or(VaultError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn check_debit(&self, user: UserId, side: Side, amount: Amount) -> VaultResult<()> {
        let available = self.balance(user, side);
        if amount > available {
            return Err(VaultError::InsufficientBalance {
                side,
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    pub fn debit(&mut self, user: UserId, side: Side, amount: Amount) -> VaultResult<()> {
        self.check_debit(user, side, amount)?;
        if amount.is_zero() {
            return Ok(());
        }
        if let Some(position) = self.positions.get_mut(&user) {
            let balance = position.balance_mut(side);
            *balance = balance.saturating_sub(amount);
            let total = self.totals.deposits_mut(side);
            *total = total.saturating_sub(amount);
            if position.is_empty() {
                self.positions.remove(&user);
            }
        }
        Ok(())
    }

    /// Removes both side balances for `user`, returning what was removed.
    pub fn zero_user(&mut self, user: UserId) -> UserPosition {
        let removed = self.positions.remove(&user).unwrap_or_default();
        self.totals.yes_deposits = self.totals.yes_deposits.saturating_sub(removed.yes_balance);
        self.totals.no_deposits = self.totals.no_deposits.saturating_sub(removed.no_balance);
        removed
    }

    pub fn record_match(&mut self, amount: Amount) -> VaultResult<()> {
        self.totals.matched = self
            .totals
            .matched
            .checked_add(amount)
            .ok_or(VaultError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn record_yielding(&mut self, amount: Amount) -> VaultResult<()> {
        self.totals.yielding = self
            .totals
            .yielding
            .checked_add(amount)
            .ok_or(VaultError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn record_paid_out(&mut self, amount: Amount) -> VaultResult<()> {
        self.totals.paid_out = self
            .totals
            .paid_out
            .checked_add(amount)
            .ok_or(VaultError::ArithmeticOverflow)?;
        Ok(())
    }

    // recomputes per-side sums from user balances and compares to the totals
    pub fn is_conserved(&self) -> bool {
        let yes: u128 = self.positions.values().map(|p| p.yes_balance.value()).sum();
        let no: u128 = self.positions.values().map(|p| p.no_balance.value()).sum();
        yes == self.totals.yes_deposits.value() && no == self.totals.no_deposits.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: UserId = UserId(1);
    const BOB: UserId = UserId(2);

    #[test]
    fn credit_updates_balance_and_total() {
        let mut ledger = Ledger::new();
        ledger.credit(ALICE, Side::Yes, Amount::new(600)).unwrap();
        ledger.credit(BOB, Side::Yes, Amount::new(400)).unwrap();
        ledger.credit(BOB, Side::No, Amount::new(50)).unwrap();

        assert_eq!(ledger.balance(ALICE, Side::Yes), Amount::new(600));
        assert_eq!(ledger.totals().yes_deposits, Amount::new(1000));
        assert_eq!(ledger.totals().no_deposits, Amount::new(50));
        assert!(ledger.is_conserved());
    }

    #[test]
    fn zero_credit_rejected() {
        let mut ledger = Ledger::new();
        assert_eq!(
            ledger.credit(ALICE, Side::No, Amount::ZERO),
            Err(VaultError::InvalidAmount)
        );
        assert_eq!(ledger.totals().no_deposits, Amount::ZERO);
    }

    #[test]
    fn overdraw_rejected_without_change() {
        let mut ledger = Ledger::new();
        ledger.credit(ALICE, Side::Yes, Amount::new(100)).unwrap();

        let err = ledger.debit(ALICE, Side::Yes, Amount::new(101)).unwrap_err();
        assert!(matches!(err, VaultError::InsufficientBalance { .. }));
        assert_eq!(ledger.balance(ALICE, Side::Yes), Amount::new(100));
        assert_eq!(ledger.totals().yes_deposits, Amount::new(100));
    }

    #[test]
    fn debit_to_zero_drops_position() {
        let mut ledger = Ledger::new();
        ledger.credit(ALICE, Side::Yes, Amount::new(100)).unwrap();
        ledger.debit(ALICE, Side::Yes, Amount::new(100)).unwrap();

        assert_eq!(ledger.users().count(), 0);
        assert!(ledger.is_conserved());
    }

    #[test]
    fn zero_user_clears_both_sides() {
        let mut ledger = Ledger::new();
        ledger.credit(ALICE, Side::Yes, Amount::new(70)).unwrap();
        ledger.credit(ALICE, Side::No, Amount::new(30)).unwrap();
        ledger.credit(BOB, Side::No, Amount::new(5)).unwrap();

        let removed = ledger.zero_user(ALICE);
        assert_eq!(removed.yes_balance, Amount::new(70));
        assert_eq!(removed.no_balance, Amount::new(30));
        assert_eq!(ledger.totals().yes_deposits, Amount::ZERO);
        assert_eq!(ledger.totals().no_deposits, Amount::new(5));
        assert!(ledger.is_conserved());
    }

    #[test]
    fn credit_overflow_rejected() {
        let mut ledger = Ledger::new();
        ledger.credit(ALICE, Side::Yes, Amount::new(u128::MAX)).unwrap();
        assert_eq!(
            ledger.credit(BOB, Side::Yes, Amount::new(1)),
            Err(VaultError::ArithmeticOverflow)
        );
        assert_eq!(ledger.balance(BOB, Side::Yes), Amount::ZERO);
    }
}
