// 8.3: resolution. reads the oracle once, redeems whatever winning claims were never
// matched and supplies the proceeds. losing-side leftovers are not redeemed.
//
// split into prepare (collaborator calls, nothing committed) and commit so a lazy
// resolution inside a withdrawal lands together with the withdrawal or not at all.
// a failure after the redeem rolls the collaborators back with everything else.

use super::core::{Externals, Vault};
use super::results::ResolutionReceipt;
use crate::error::{VaultError, VaultResult};
use crate::events::{EventPayload, ResolvedEvent, SuppliedEvent};
use crate::resolution::Resolution;
use crate::types::Amount;

impl<E: Externals> Vault<E> {
    /// Finalizes the market from the oracle. Callable by anyone; fails if the
    /// oracle hasn't reported or the market is already resolved.
    pub fn resolve(&mut self) -> VaultResult<ResolutionReceipt> {
        self.transact("resolve", |vault| {
            let receipt = vault.prepare_resolution()?;
            vault.commit_resolution(receipt)?;
            Ok(receipt)
        })
    }

    pub(super) fn prepare_resolution(&mut self) -> VaultResult<ResolutionReceipt> {
        self.ensure_unresolved()?;

        let report = self.externals.report(self.market.id)?;
        let resolution = Resolution::from_report(&report, self.current_time)?;
        let winner = resolution.winning_side;
        let remaining = self.ledger.totals().unmatched(winner);

        let mut received = Amount::ZERO;
        if !remaining.is_zero() {
            let vault = self.market.vault_address;
            let before = self.externals.collateral_balance(vault)?;
            self.externals
                .redeem_positions(self.market.id, winner.index_set(), remaining)?;
            let after = self.externals.collateral_balance(vault)?;
            received = after.saturating_sub(before);
            if !received.is_zero() {
                self.externals.supply(self.market.collateral, received, vault)?;
            }
        }

        self.ledger
            .totals()
            .yielding
            .checked_add(received)
            .ok_or(VaultError::ArithmeticOverflow)?;

        tracing::debug!(
            winner = %winner,
            remaining = %remaining,
            received = %received,
            "resolution prepared"
        );

        Ok(ResolutionReceipt {
            resolution,
            redeemed_claims: remaining,
            collateral_received: received,
        })
    }

    pub(super) fn commit_resolution(&mut self, receipt: ResolutionReceipt) -> VaultResult<()> {
        self.resolution.transition(receipt.resolution)?;

        if !receipt.collateral_received.is_zero() {
            self.ledger.record_yielding(receipt.collateral_received)?;
            let total_yielding = self.ledger.totals().yielding;
            self.emit_event(EventPayload::SuppliedToReserve(SuppliedEvent {
                amount: receipt.collateral_received,
                total_yielding,
            }));
        }

        let r = receipt.resolution;
        self.emit_event(EventPayload::Resolved(ResolvedEvent {
            winning_side: r.winning_side,
            payout_numerator: r.payout_numerator,
            payout_denominator: r.payout_denominator,
            redeemed_claims: receipt.redeemed_claims,
            collateral_received: receipt.collateral_received,
        }));

        tracing::info!(
            winner = %r.winning_side,
            payout_numerator = r.payout_numerator,
            payout_denominator = r.payout_denominator,
            redeemed = %receipt.redeemed_claims,
            received = %receipt.collateral_received,
            "market resolved"
        );
        Ok(())
    }
}
