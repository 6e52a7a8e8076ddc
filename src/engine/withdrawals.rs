// 8.4: withdrawals. two paths:
//   withdraw_side: pre-resolution reversal of a deposit, claims go back 1:1.
//   withdraw: post-resolution settlement, resolves lazily if nobody has yet.
//
// settlement zeroes both of the caller's balances even when the reserve can't cover
// the full entitlement. the uncovered part is forfeited; it is logged and reported
// on the receipt but never owed again.

use super::core::{Externals, Vault};
use super::results::{ReclaimReceipt, ResolutionReceipt, WithdrawalReceipt};
use crate::error::{VaultError, VaultResult};
use crate::events::{EventPayload, SideReclaimedEvent, WithdrawnEvent};
use crate::payout::{calculate_payout, cap_to_liquidity, PayoutInputs};
use crate::types::{Amount, Side, UserId};

impl<E: Externals> Vault<E> {
    /// Returns `amount` of the caller's original `side` claims. Only while unresolved,
    /// and only out of claims the vault still holds unmatched.
    pub fn withdraw_side(&mut self, user: UserId, side: Side, amount: Amount) -> VaultResult<ReclaimReceipt> {
        self.transact("withdraw_side", |vault| vault.reclaim(user, side, amount))
    }

    /// Settles the caller's whole position to `to`.
    pub fn withdraw(&mut self, user: UserId, to: UserId) -> VaultResult<WithdrawalReceipt> {
        self.transact("withdraw", |vault| vault.settle(user, to))
    }

    fn reclaim(&mut self, user: UserId, side: Side, amount: Amount) -> VaultResult<ReclaimReceipt> {
        self.ensure_unresolved()?;
        if amount.is_zero() {
            return Err(VaultError::InvalidAmount);
        }
        self.ledger.check_debit(user, side, amount)?;

        let unmatched = self.ledger.totals().unmatched(side);
        if amount > unmatched {
            return Err(VaultError::InsufficientUnmatched {
                side,
                requested: amount,
                available: unmatched,
            });
        }

        let claim_id = self.market.claim_id(side);
        self.externals
            .transfer_claims(self.market.vault_address, user, claim_id, amount)?;

        self.ledger.debit(user, side, amount)?;
        let remaining_balance = self.ledger.balance(user, side);
        self.emit_event(EventPayload::SideReclaimed(SideReclaimedEvent {
            user,
            side,
            amount,
            remaining_balance,
        }));
        tracing::info!(%user, %side, %amount, %remaining_balance, "claims reclaimed");

        Ok(ReclaimReceipt {
            user,
            side,
            amount,
            remaining_balance,
        })
    }

    fn settle(&mut self, user: UserId, to: UserId) -> VaultResult<WithdrawalReceipt> {
        // resolve first: an empty caller on an unfinalized market sees OracleNotFinalized
        let pending: Option<ResolutionReceipt> = if self.resolution.is_resolved() {
            None
        } else {
            Some(self.prepare_resolution()?)
        };
        let winner = match (&pending, self.resolution.winning_side()) {
            (Some(receipt), _) => receipt.resolution.winning_side,
            (None, Some(side)) => side,
            (None, None) => return Err(VaultError::OracleNotFinalized),
        };

        let position = self.ledger.position(user);
        if position.is_empty() {
            return Err(VaultError::NothingToWithdraw);
        }

        let asset = self.market.collateral;
        let vault = self.market.vault_address;
        let totals = *self.ledger.totals();

        let winning_balance = position.balance(winner);
        let requested = if winning_balance.is_zero() {
            Amount::ZERO
        } else {
            let inputs = PayoutInputs {
                user_balance: winning_balance,
                side_deposits: totals.deposits(winner),
                total_matched: totals.matched,
                reserve_balance: self.externals.reserve_balance(asset, vault)?,
                is_resolved: true,
            };
            tracing::debug!(%user, ?inputs, "payout inputs");
            calculate_payout(&inputs)?
        };

        let available = self.externals.available_liquidity(asset)?;
        let capped = cap_to_liquidity(requested, available);

        let mut received = Amount::ZERO;
        if !capped.actual.is_zero() {
            received = self.externals.withdraw(asset, capped.actual, to)?;
            if received.is_zero() {
                return Err(VaultError::ReserveWithdrawFailed {
                    requested: capped.actual,
                });
            }
        }
        totals
            .paid_out
            .checked_add(received)
            .ok_or(VaultError::ArithmeticOverflow)?;

        // every collaborator call is done; commit
        if let Some(receipt) = pending {
            self.commit_resolution(receipt)?;
        }
        let burned = self.ledger.zero_user(user);
        self.ledger.record_paid_out(received)?;

        let forfeited = capped.shortfall();
        if capped.is_capped() {
            tracing::warn!(
                %user,
                requested = %capped.requested,
                paid = %capped.actual,
                %forfeited,
                "payout capped by reserve liquidity, remainder forfeited"
            );
        }

        self.emit_event(EventPayload::Withdrawn(WithdrawnEvent {
            user,
            to,
            yes_burned: burned.yes_balance,
            no_burned: burned.no_balance,
            requested,
            received,
            forfeited,
        }));
        tracing::info!(
            %user,
            %to,
            yes_burned = %burned.yes_balance,
            no_burned = %burned.no_balance,
            %received,
            "withdrawal settled"
        );

        Ok(WithdrawalReceipt {
            user,
            to,
            yes_burned: burned.yes_balance,
            no_burned: burned.no_balance,
            requested,
            received,
            forfeited,
            resolution: pending,
        })
    }
}
