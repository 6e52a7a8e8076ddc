// 6.0 custody.rs: claim token transfer boundary. inbound deposits arrive as
// notifications from the claim token layer; outbound reclaims go through ClaimCustody.
// the transfer mechanism itself lives outside this crate.

use crate::error::{ExternalError, VaultError, VaultResult};
use crate::market::Market;
use crate::types::{Amount, ClaimId, Side, UserId};
use serde::{Deserialize, Serialize};

// single item received by the vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimTransfer {
    pub operator: UserId,
    pub from: UserId,
    pub claim_id: ClaimId,
    pub amount: Amount,
}

// batch received by the vault. ids and amounts are parallel arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchClaimTransfer {
    pub operator: UserId,
    pub from: UserId,
    pub claim_ids: Vec<ClaimId>,
    pub amounts: Vec<Amount>,
}

impl ClaimTransfer {
    pub fn validate(&self, market: &Market) -> VaultResult<(Side, Amount)> {
        validate_item(market, self.claim_id, self.amount)
    }
}

impl BatchClaimTransfer {
    /// Validates every item; a single bad item rejects the whole batch.
    pub fn validate(&self, market: &Market) -> VaultResult<Vec<(Side, Amount)>> {
        if self.claim_ids.len() != self.amounts.len() {
            return Err(VaultError::ArrayLengthMismatch {
                ids: self.claim_ids.len(),
                amounts: self.amounts.len(),
            });
        }
        self.claim_ids
            .iter()
            .zip(&self.amounts)
            .map(|(id, amount)| validate_item(market, *id, *amount))
            .collect()
    }
}

fn validate_item(market: &Market, claim_id: ClaimId, amount: Amount) -> VaultResult<(Side, Amount)> {
    let side = market.side_of(claim_id)?;
    if amount.is_zero() {
        return Err(VaultError::InvalidAmount);
    }
    Ok((side, amount))
}

// Outbound claim movements and holdings. Implement for the claim token layer.
pub trait ClaimCustody {
    fn transfer_claims(
        &mut self,
        from: UserId,
        to: UserId,
        claim_id: ClaimId,
        amount: Amount,
    ) -> Result<(), ExternalError>;

    fn claim_balance(&self, holder: UserId, claim_id: ClaimId) -> Result<Amount, ExternalError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetId, MarketId};

    fn market() -> Market {
        Market::new(MarketId(1), ClaimId(11), ClaimId(12), AssetId(1), UserId(99))
    }

    fn batch(ids: Vec<u128>, amounts: Vec<u128>) -> BatchClaimTransfer {
        BatchClaimTransfer {
            operator: UserId(1),
            from: UserId(1),
            claim_ids: ids.into_iter().map(ClaimId).collect(),
            amounts: amounts.into_iter().map(Amount::new).collect(),
        }
    }

    #[test]
    fn single_transfer_resolves_side() {
        let t = ClaimTransfer {
            operator: UserId(1),
            from: UserId(1),
            claim_id: ClaimId(12),
            amount: Amount::new(40),
        };
        assert_eq!(t.validate(&market()), Ok((Side::No, Amount::new(40))));
    }

    #[test]
    fn zero_amount_rejected() {
        let t = ClaimTransfer {
            operator: UserId(1),
            from: UserId(1),
            claim_id: ClaimId(11),
            amount: Amount::ZERO,
        };
        assert_eq!(t.validate(&market()), Err(VaultError::InvalidAmount));
    }

    #[test]
    fn batch_mismatch_rejected() {
        let err = batch(vec![11, 12], vec![5]).validate(&market()).unwrap_err();
        assert_eq!(err, VaultError::ArrayLengthMismatch { ids: 2, amounts: 1 });
    }

    #[test]
    fn batch_with_foreign_id_rejected() {
        let err = batch(vec![11, 13], vec![5, 5]).validate(&market()).unwrap_err();
        assert_eq!(err, VaultError::InvalidClaimId(ClaimId(13)));
    }

    #[test]
    fn batch_items_in_order() {
        let items = batch(vec![12, 11], vec![3, 4]).validate(&market()).unwrap();
        assert_eq!(items, vec![(Side::No, Amount::new(3)), (Side::Yes, Amount::new(4))]);
    }
}
