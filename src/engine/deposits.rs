// 8.2: deposits and matching. a deposit and the matching pass it triggers are one unit:
// the credit is staged, the match is planned against the staged totals, collaborators
// run, and only then is anything written to the ledger.

use super::core::{Externals, Vault};
use super::results::{DepositReceipt, MatchOutcome};
use crate::custody::{BatchClaimTransfer, ClaimTransfer};
use crate::error::{VaultError, VaultResult};
use crate::events::{DepositedEvent, EventPayload, MatchedEvent, SuppliedEvent};
use crate::ledger::PoolTotals;
use crate::matching::{plan_match, MatchPlan};
use crate::types::{Amount, Side, UserId};

impl<E: Externals> Vault<E> {
    /// Single-item deposit notification from the claim token layer.
    pub fn on_claim_received(&mut self, transfer: ClaimTransfer) -> VaultResult<DepositReceipt> {
        self.transact("deposit", |vault| {
            let item = transfer.validate(&vault.market)?;
            vault.apply_deposit(transfer.from, &[item])
        })
    }

    /// Batch deposit notification. Every item must be valid or nothing is credited.
    pub fn on_batch_received(&mut self, batch: BatchClaimTransfer) -> VaultResult<DepositReceipt> {
        self.transact("batch_deposit", |vault| {
            let items = batch.validate(&vault.market)?;
            vault.apply_deposit(batch.from, &items)
        })
    }

    /// Nets whatever is currently matchable. A no-op when the pool is already netted.
    pub fn match_pending(&mut self) -> VaultResult<MatchOutcome> {
        self.transact("match", |vault| {
            vault.ensure_unresolved()?;
            let plan = plan_match(vault.ledger.totals());
            let outcome = vault.execute_match(&plan)?;
            vault.commit_match(&outcome)?;
            Ok(outcome)
        })
    }

    fn apply_deposit(&mut self, user: UserId, items: &[(Side, Amount)]) -> VaultResult<DepositReceipt> {
        self.ensure_unresolved()?;

        let (yes_in, no_in) = sum_by_side(items)?;
        for (side, amount) in [(Side::Yes, yes_in), (Side::No, no_in)] {
            if !amount.is_zero() {
                self.ledger.check_credit(user, side, amount)?;
            }
        }

        let staged = staged_totals(self.ledger.totals(), yes_in, no_in)?;
        let plan = plan_match(&staged);
        tracing::debug!(
            %user,
            unmatched_yes = %plan.unmatched_yes,
            unmatched_no = %plan.unmatched_no,
            match_amount = %plan.match_amount,
            "deposit match plan"
        );
        let outcome = self.execute_match(&plan)?;
        // yielding/matched overflow must surface before the credit lands
        self.check_match_commit(&outcome)?;

        for (side, amount) in items {
            self.ledger.credit(user, *side, *amount)?;
            let new_balance = self.ledger.balance(user, *side);
            self.emit_event(EventPayload::Deposited(DepositedEvent {
                user,
                side: *side,
                amount: *amount,
                new_balance,
            }));
        }
        self.commit_match(&outcome)?;

        tracing::info!(
            %user,
            yes = %yes_in,
            no = %no_in,
            matched = %outcome.matched,
            supplied = %outcome.supplied,
            "deposit accepted"
        );

        Ok(DepositReceipt {
            user,
            credited: items.to_vec(),
            matching: outcome,
        })
    }

    // collaborator calls only. nothing in the ledger moves here.
    fn execute_match(&mut self, plan: &MatchPlan) -> VaultResult<MatchOutcome> {
        if plan.is_empty() {
            return Ok(MatchOutcome::default());
        }

        let market_id = self.market.id;
        let vault = self.market.vault_address;
        let asset = self.market.collateral;

        let produced = self.externals.merge_positions(market_id, plan.match_amount)?;
        tracing::debug!(amount = %plan.match_amount, %produced, "claims merged");

        // sweep the whole idle balance so dust from earlier operations goes too
        let idle = self.externals.collateral_balance(vault)?;
        if !idle.is_zero() {
            self.externals.supply(asset, idle, vault)?;
        }

        Ok(MatchOutcome {
            matched: plan.match_amount,
            supplied: idle,
        })
    }

    fn check_match_commit(&self, outcome: &MatchOutcome) -> VaultResult<()> {
        let totals = self.ledger.totals();
        totals
            .matched
            .checked_add(outcome.matched)
            .ok_or(VaultError::ArithmeticOverflow)?;
        totals
            .yielding
            .checked_add(outcome.supplied)
            .ok_or(VaultError::ArithmeticOverflow)?;
        Ok(())
    }

    fn commit_match(&mut self, outcome: &MatchOutcome) -> VaultResult<()> {
        if !outcome.matched.is_zero() {
            self.ledger.record_match(outcome.matched)?;
            let total_matched = self.ledger.totals().matched;
            self.emit_event(EventPayload::Matched(MatchedEvent {
                amount: outcome.matched,
                total_matched,
            }));
        }
        if !outcome.supplied.is_zero() {
            self.ledger.record_yielding(outcome.supplied)?;
            let total_yielding = self.ledger.totals().yielding;
            self.emit_event(EventPayload::SuppliedToReserve(SuppliedEvent {
                amount: outcome.supplied,
                total_yielding,
            }));
        }
        Ok(())
    }
}

fn sum_by_side(items: &[(Side, Amount)]) -> VaultResult<(Amount, Amount)> {
    let mut yes = Amount::ZERO;
    let mut no = Amount::ZERO;
    for (side, amount) in items {
        let slot = match side {
            Side::Yes => &mut yes,
            Side::No => &mut no,
        };
        *slot = slot.checked_add(*amount).ok_or(VaultError::ArithmeticOverflow)?;
    }
    Ok((yes, no))
}

fn staged_totals(current: &PoolTotals, yes_in: Amount, no_in: Amount) -> VaultResult<PoolTotals> {
    let mut staged = *current;
    staged.yes_deposits = staged
        .yes_deposits
        .checked_add(yes_in)
        .ok_or(VaultError::ArithmeticOverflow)?;
    staged.no_deposits = staged
        .no_deposits
        .checked_add(no_in)
        .ok_or(VaultError::ArithmeticOverflow)?;
    Ok(staged)
}
