// 8.0.2: receipts returned by engine operations.

use crate::resolution::Resolution;
use crate::types::{Amount, Side, UserId};
use serde::{Deserialize, Serialize};

// collaborator work done by one matching pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub matched: Amount,
    // idle collateral swept into the reserve, including earlier dust
    pub supplied: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    pub user: UserId,
    pub credited: Vec<(Side, Amount)>,
    pub matching: MatchOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReceipt {
    pub resolution: Resolution,
    // unmatched winning claims sent for redemption
    pub redeemed_claims: Amount,
    pub collateral_received: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReclaimReceipt {
    pub user: UserId,
    pub side: Side,
    pub amount: Amount,
    pub remaining_balance: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalReceipt {
    pub user: UserId,
    pub to: UserId,
    pub yes_burned: Amount,
    pub no_burned: Amount,
    pub requested: Amount,
    pub received: Amount,
    pub forfeited: Amount,
    // set when this withdrawal drove the market to resolution
    pub resolution: Option<ResolutionReceipt>,
}
