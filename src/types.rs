// 1.0: all the primitives live here. ids, sides, ledger amounts, timestamps.
// each is a newtype so the compiler catches a claim id passed where a user id belongs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

/// Fixed-point precision used for share computation (1e18).
pub const SCALE: u128 = 1_000_000_000_000_000_000;

// external market identifier (condition id on the settlement layer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketId(pub u64);

// position token id issued by the settlement layer for one side of a market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimId(pub u128);

// any address that can hold claims or collateral: users, the vault, the reserve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "market-{}", self.0)
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "claim-{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user-{}", self.0)
    }
}

// fungible collateral asset (USDC) as known to the yield reserve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub u32);

// Yes = claim pays out if the event happens. No = claim pays out if it doesn't.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Yes, Side::No];

    pub fn opposite(&self) -> Self {
        match self {
            Side::Yes => Side::No,
            Side::No => Side::Yes,
        }
    }

    // slot in the oracle payout vector
    pub fn outcome_index(&self) -> usize {
        match self {
            Side::Yes => 0,
            Side::No => 1,
        }
    }

    // bitmask form used by the conversion layer's redeem call
    pub fn index_set(&self) -> u32 {
        1 << self.outcome_index()
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Yes => write!(f, "YES"),
            Side::No => write!(f, "NO"),
        }
    }
}

// 1.1: integer ledger amount. claim units and collateral units both use this.
// never negative; every operation that could wrap is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn new(value: u128) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn checked_add(&self, other: Amount) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    #[must_use]
    pub fn checked_sub(&self, other: Amount) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(&self, other: Amount) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    // None when the value exceeds Decimal's 96-bit mantissa
    pub fn to_decimal(&self) -> Option<Decimal> {
        let signed = i128::try_from(self.0).ok()?;
        Decimal::try_from_i128_with_scale(signed, 0).ok()
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// saturates instead of wrapping; only used for reporting sums
impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| Self(acc.0.saturating_add(a.0)))
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// 1.2: millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn side_opposites_and_index_sets() {
        assert_eq!(Side::Yes.opposite(), Side::No);
        assert_eq!(Side::No.opposite(), Side::Yes);
        assert_eq!(Side::Yes.index_set(), 1);
        assert_eq!(Side::No.index_set(), 2);
    }

    #[test]
    fn amount_checked_math() {
        let a = Amount::new(10);
        assert_eq!(a.checked_add(Amount::new(5)), Some(Amount::new(15)));
        assert_eq!(a.checked_sub(Amount::new(11)), None);
        assert_eq!(a.saturating_sub(Amount::new(11)), Amount::ZERO);
        assert_eq!(Amount::new(u128::MAX).checked_add(Amount::new(1)), None);
    }

    #[test]
    fn amount_to_decimal() {
        assert_eq!(Amount::new(1100).to_decimal(), Some(dec!(1100)));
        assert_eq!(Amount::new(u128::MAX).to_decimal(), None);
    }

    #[test]
    fn amount_sum_saturates() {
        let total: Amount = [Amount::new(u128::MAX), Amount::new(1)].iter().sum();
        assert_eq!(total, Amount::new(u128::MAX));
    }
}
