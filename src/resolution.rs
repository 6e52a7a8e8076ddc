// 4.0: resolution state. Unresolved -> Resolved, never back.
// the oracle's payout vector decides the winner; the raw numerator is kept for audit
// and does not scale payouts.

use crate::error::{VaultError, VaultResult};
use crate::types::{Side, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// payout vector as reported by the oracle. denominator 0 = not finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleReport {
    pub yes_numerator: u128,
    pub no_numerator: u128,
    pub denominator: u128,
}

impl OracleReport {
    pub fn is_finalized(&self) -> bool {
        self.denominator != 0
    }

    pub fn numerator(&self, side: Side) -> u128 {
        match side {
            Side::Yes => self.yes_numerator,
            Side::No => self.no_numerator,
        }
    }
}

// 4.1: YES wins only on a strictly greater numerator. a tie goes to NO.
pub fn decide_winner(report: &OracleReport) -> VaultResult<Side> {
    if !report.is_finalized() {
        return Err(VaultError::OracleNotFinalized);
    }
    if report.yes_numerator > report.no_numerator {
        Ok(Side::Yes)
    } else {
        Ok(Side::No)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub winning_side: Side,
    pub payout_numerator: u128,
    pub payout_denominator: u128,
    pub resolved_at: Timestamp,
}

impl Resolution {
    pub fn from_report(report: &OracleReport, resolved_at: Timestamp) -> VaultResult<Self> {
        let winning_side = decide_winner(report)?;
        Ok(Self {
            winning_side,
            payout_numerator: report.numerator(winning_side),
            payout_denominator: report.denominator,
            resolved_at,
        })
    }

    // informational only. None if either side of the ratio doesn't fit a Decimal.
    pub fn payout_ratio(&self) -> Option<Decimal> {
        let num = Decimal::try_from_i128_with_scale(i128::try_from(self.payout_numerator).ok()?, 0).ok()?;
        let den = Decimal::try_from_i128_with_scale(i128::try_from(self.payout_denominator).ok()?, 0).ok()?;
        num.checked_div(den)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionState {
    #[default]
    Unresolved,
    Resolved(Resolution),
}

impl ResolutionState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionState::Resolved(_))
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        match self {
            ResolutionState::Resolved(r) => Some(r),
            ResolutionState::Unresolved => None,
        }
    }

    pub fn winning_side(&self) -> Option<Side> {
        self.resolution().map(|r| r.winning_side)
    }

    pub fn ensure_unresolved(&self) -> VaultResult<()> {
        if self.is_resolved() {
            Err(VaultError::AlreadyResolved)
        } else {
            Ok(())
        }
    }

    // the one write this type allows
    pub fn transition(&mut self, resolution: Resolution) -> VaultResult<()> {
        self.ensure_unresolved()?;
        *self = ResolutionState::Resolved(resolution);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn report(yes: u128, no: u128, den: u128) -> OracleReport {
        OracleReport {
            yes_numerator: yes,
            no_numerator: no,
            denominator: den,
        }
    }

    #[test]
    fn unfinalized_oracle_rejected() {
        assert_eq!(decide_winner(&report(1, 0, 0)), Err(VaultError::OracleNotFinalized));
    }

    #[test]
    fn strict_greater_wins() {
        assert_eq!(decide_winner(&report(1, 0, 1)), Ok(Side::Yes));
        assert_eq!(decide_winner(&report(0, 1, 1)), Ok(Side::No));
    }

    #[test]
    fn tie_goes_to_no() {
        assert_eq!(decide_winner(&report(1, 1, 2)), Ok(Side::No));
    }

    #[test]
    fn ratio_is_recorded_for_winner() {
        let r = Resolution::from_report(&report(3, 1, 4), Timestamp::from_millis(0)).unwrap();
        assert_eq!(r.winning_side, Side::Yes);
        assert_eq!(r.payout_numerator, 3);
        assert_eq!(r.payout_ratio(), Some(dec!(0.75)));
    }

    #[test]
    fn transition_happens_once() {
        let mut state = ResolutionState::default();
        let r = Resolution::from_report(&report(1, 0, 1), Timestamp::from_millis(5)).unwrap();
        state.transition(r).unwrap();
        assert!(state.is_resolved());

        let other = Resolution::from_report(&report(0, 1, 1), Timestamp::from_millis(9)).unwrap();
        assert_eq!(state.transition(other), Err(VaultError::AlreadyResolved));
        assert_eq!(state.winning_side(), Some(Side::Yes));
    }
}
