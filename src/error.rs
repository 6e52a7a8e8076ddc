//! Error types for the vault core.
//!
//! Every failure aborts the enclosing operation before any ledger state is
//! committed, so a caller receiving an `Err` can assume nothing changed.

use crate::types::{Amount, ClaimId, Side};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Insufficient {side} balance: requested {requested}, available {available}")]
    InsufficientBalance {
        side: Side,
        requested: Amount,
        available: Amount,
    },

    // claims already merged into collateral can no longer be handed back
    #[error("Insufficient unmatched {side} claims: requested {requested}, unmatched {available}")]
    InsufficientUnmatched {
        side: Side,
        requested: Amount,
        available: Amount,
    },

    #[error("Market already resolved")]
    AlreadyResolved,

    #[error("Oracle has not reported a final outcome")]
    OracleNotFinalized,

    #[error("No deposits on the winning side")]
    NoWinningDeposits,

    #[error("Nothing to withdraw")]
    NothingToWithdraw,

    #[error("Reserve returned nothing for a withdrawal of {requested}")]
    ReserveWithdrawFailed { requested: Amount },

    #[error("Claim id {0:?} is not registered with this vault")]
    InvalidClaimId(ClaimId),

    #[error("Batch length mismatch: {ids} ids, {amounts} amounts")]
    ArrayLengthMismatch { ids: usize, amounts: usize },

    #[error("Vault is already executing an operation")]
    Reentrant,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("External call failed: {0}")]
    External(#[from] ExternalError),
}

/// Failure reported by one of the external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExternalError {
    #[error("claim custody: {0}")]
    Custody(String),

    #[error("conversion: {0}")]
    Conversion(String),

    #[error("oracle: {0}")]
    Oracle(String),

    #[error("collateral token: {0}")]
    Collateral(String),

    #[error("yield reserve: {0}")]
    Reserve(String),
}

pub type VaultResult<T> = Result<T, VaultError>;
