// 2.0: market identity. one vault binds to exactly one market and the binding never
// changes after construction.

use crate::error::{VaultError, VaultResult};
use crate::types::{AssetId, ClaimId, MarketId, Side, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    pub id: MarketId,
    pub yes_claim: ClaimId,
    pub no_claim: ClaimId,
    // collateral the paired claims merge into, and the asset supplied to the reserve
    pub collateral: AssetId,
    // address the vault holds claims, collateral and reserve positions under
    pub vault_address: UserId,
}

impl Market {
    pub fn new(
        id: MarketId,
        yes_claim: ClaimId,
        no_claim: ClaimId,
        collateral: AssetId,
        vault_address: UserId,
    ) -> Self {
        Self {
            id,
            yes_claim,
            no_claim,
            collateral,
            vault_address,
        }
    }

    pub fn claim_id(&self, side: Side) -> ClaimId {
        match side {
            Side::Yes => self.yes_claim,
            Side::No => self.no_claim,
        }
    }

    // anything other than the two registered ids is rejected
    pub fn side_of(&self, claim_id: ClaimId) -> VaultResult<Side> {
        if claim_id == self.yes_claim {
            Ok(Side::Yes)
        } else if claim_id == self.no_claim {
            Ok(Side::No)
        } else {
            Err(VaultError::InvalidClaimId(claim_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market() -> Market {
        Market::new(MarketId(7), ClaimId(101), ClaimId(102), AssetId(1), UserId(900))
    }

    #[test]
    fn maps_registered_claims_to_sides() {
        let m = market();
        assert_eq!(m.side_of(ClaimId(101)), Ok(Side::Yes));
        assert_eq!(m.side_of(ClaimId(102)), Ok(Side::No));
        assert_eq!(m.claim_id(Side::No), ClaimId(102));
    }

    #[test]
    fn rejects_foreign_claim() {
        assert_eq!(
            market().side_of(ClaimId(5)),
            Err(VaultError::InvalidClaimId(ClaimId(5)))
        );
    }
}
