// 9.0 sim.rs: MOCKED. one in-memory chain standing in for every collaborator: claim
// token custody, the merge/redeem layer, the oracle, the collateral token and the
// yield reserve. balances only, no real transfers. faults can be armed per call
// site to exercise failure paths.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

use crate::conversion::{ConversionAdapter, OutcomeOracle};
use crate::custody::{BatchClaimTransfer, ClaimCustody, ClaimTransfer};
use crate::engine::{DepositReceipt, Transactional, Vault};
use crate::error::{ExternalError, VaultResult};
use crate::market::Market;
use crate::reserve::{CollateralToken, YieldReserve};
use crate::types::{AssetId, Amount, ClaimId, MarketId, Side, UserId};

// collaborator call sites a fault can be armed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    ClaimTransfer,
    Merge,
    Redeem,
    OracleRead,
    CollateralRead,
    Supply,
    Withdraw,
    // withdraw "succeeds" but delivers nothing
    WithdrawDeliversNothing,
}

#[derive(Debug, Clone)]
pub struct SimulatedChain {
    market: Market,
    claims: HashMap<(UserId, ClaimId), Amount>,
    collateral: HashMap<UserId, Amount>,
    // reserve positions per holder, principal plus yield
    reserve_positions: HashMap<UserId, Amount>,
    // underlying the reserve actually has on hand
    reserve_cash: Amount,
    payout_numerators: [u128; 2],
    payout_denominator: u128,
    faults: HashSet<Fault>,
}

impl SimulatedChain {
    pub fn new(market: &Market) -> Self {
        Self {
            market: market.clone(),
            claims: HashMap::new(),
            collateral: HashMap::new(),
            reserve_positions: HashMap::new(),
            reserve_cash: Amount::ZERO,
            payout_numerators: [0, 0],
            payout_denominator: 0,
            faults: HashSet::new(),
        }
    }

    pub fn arm(&mut self, fault: Fault) {
        self.faults.insert(fault);
    }

    pub fn disarm(&mut self, fault: Fault) {
        self.faults.remove(&fault);
    }

    pub fn disarm_all(&mut self) {
        self.faults.clear();
    }

    fn check(&self, fault: Fault, err: impl FnOnce() -> ExternalError) -> Result<(), ExternalError> {
        if self.faults.contains(&fault) {
            Err(err())
        } else {
            Ok(())
        }
    }

    // mint claims straight into a wallet, as if the user split collateral elsewhere
    pub fn mint_claims(&mut self, holder: UserId, side: Side, amount: Amount) {
        let id = self.market.claim_id(side);
        let slot = self.claims.entry((holder, id)).or_default();
        *slot = Amount::new(slot.value().saturating_add(amount.value()));
    }

    pub fn claims_of(&self, holder: UserId, side: Side) -> Amount {
        let id = self.market.claim_id(side);
        self.claims.get(&(holder, id)).copied().unwrap_or_default()
    }

    pub fn collateral_of(&self, holder: UserId) -> Amount {
        self.collateral.get(&holder).copied().unwrap_or_default()
    }

    // drop loose collateral on the vault, e.g. rounding dust from an earlier operation
    pub fn credit_collateral(&mut self, holder: UserId, amount: Amount) {
        let slot = self.collateral.entry(holder).or_default();
        *slot = Amount::new(slot.value().saturating_add(amount.value()));
    }

    pub fn report_outcome(&mut self, yes_numerator: u128, no_numerator: u128) {
        self.payout_numerators = [yes_numerator, no_numerator];
        self.payout_denominator = yes_numerator.saturating_add(no_numerator);
    }

    /// Grows every reserve position by `rate` (0.10 = 10%), paid in as cash.
    pub fn accrue_yield(&mut self, rate: Decimal) {
        let mut paid_in = 0u128;
        for position in self.reserve_positions.values_mut() {
            let interest = position
                .to_decimal()
                .and_then(|p| p.checked_mul(rate))
                .and_then(|i| i.floor().to_u128())
                .unwrap_or(0);
            *position = Amount::new(position.value().saturating_add(interest));
            paid_in = paid_in.saturating_add(interest);
        }
        self.reserve_cash = Amount::new(self.reserve_cash.value().saturating_add(paid_in));
    }

    /// Adds `amount` of yield to one holder's position.
    pub fn accrue_to(&mut self, holder: UserId, amount: Amount) {
        let slot = self.reserve_positions.entry(holder).or_default();
        *slot = Amount::new(slot.value().saturating_add(amount.value()));
        self.reserve_cash = Amount::new(self.reserve_cash.value().saturating_add(amount.value()));
    }

    /// Simulates borrowers drawing down reserve cash. Positions are unchanged.
    pub fn lend_out(&mut self, amount: Amount) {
        self.reserve_cash = self.reserve_cash.saturating_sub(amount);
    }

    pub fn reserve_cash(&self) -> Amount {
        self.reserve_cash
    }

    fn take_claims(&mut self, holder: UserId, id: ClaimId, amount: Amount) -> Result<(), ExternalError> {
        let slot = self.claims.entry((holder, id)).or_default();
        *slot = slot
            .checked_sub(amount)
            .ok_or_else(|| ExternalError::Custody(format!("{holder} holds too few {id}")))?;
        Ok(())
    }

    fn take_collateral(&mut self, holder: UserId, amount: Amount) -> Result<(), ExternalError> {
        let slot = self.collateral.entry(holder).or_default();
        *slot = slot
            .checked_sub(amount)
            .ok_or_else(|| ExternalError::Collateral(format!("{holder} holds too little collateral")))?;
        Ok(())
    }

    fn ensure_market(&self, market: MarketId) -> Result<(), ExternalError> {
        if market == self.market.id {
            Ok(())
        } else {
            Err(ExternalError::Conversion(format!("unknown {market}")))
        }
    }

    fn ensure_asset(&self, asset: AssetId) -> Result<(), ExternalError> {
        if asset == self.market.collateral {
            Ok(())
        } else {
            Err(ExternalError::Reserve(format!("unsupported asset {}", asset.0)))
        }
    }
}

impl ClaimCustody for SimulatedChain {
    fn transfer_claims(
        &mut self,
        from: UserId,
        to: UserId,
        claim_id: ClaimId,
        amount: Amount,
    ) -> Result<(), ExternalError> {
        self.check(Fault::ClaimTransfer, || ExternalError::Custody("transfer reverted".into()))?;
        self.take_claims(from, claim_id, amount)?;
        let slot = self.claims.entry((to, claim_id)).or_default();
        *slot = Amount::new(slot.value().saturating_add(amount.value()));
        Ok(())
    }

    fn claim_balance(&self, holder: UserId, claim_id: ClaimId) -> Result<Amount, ExternalError> {
        Ok(self.claims.get(&(holder, claim_id)).copied().unwrap_or_default())
    }
}

impl ConversionAdapter for SimulatedChain {
    fn merge_positions(&mut self, market: MarketId, amount: Amount) -> Result<Amount, ExternalError> {
        self.check(Fault::Merge, || ExternalError::Conversion("merge reverted".into()))?;
        self.ensure_market(market)?;
        let vault = self.market.vault_address;
        let (yes, no) = (self.market.yes_claim, self.market.no_claim);
        if self.claims_of(vault, Side::Yes) < amount || self.claims_of(vault, Side::No) < amount {
            return Err(ExternalError::Conversion("not enough pairs to merge".into()));
        }
        self.take_claims(vault, yes, amount)?;
        self.take_claims(vault, no, amount)?;
        self.credit_collateral(vault, amount);
        Ok(amount)
    }

    fn redeem_positions(
        &mut self,
        market: MarketId,
        index_set: u32,
        amount: Amount,
    ) -> Result<Amount, ExternalError> {
        self.check(Fault::Redeem, || ExternalError::Conversion("redeem reverted".into()))?;
        self.ensure_market(market)?;
        if self.payout_denominator == 0 {
            return Err(ExternalError::Conversion("outcome not reported".into()));
        }
        let side = match index_set {
            1 => Side::Yes,
            2 => Side::No,
            other => return Err(ExternalError::Conversion(format!("bad index set {other}"))),
        };
        let vault = self.market.vault_address;
        self.take_claims(vault, self.market.claim_id(side), amount)?;

        let numerator = self.payout_numerators[side.outcome_index()];
        let payout = amount
            .value()
            .checked_mul(numerator)
            .ok_or_else(|| ExternalError::Conversion("payout overflow".into()))?
            / self.payout_denominator;
        let payout = Amount::new(payout);
        self.credit_collateral(vault, payout);
        Ok(payout)
    }
}

impl OutcomeOracle for SimulatedChain {
    fn payout_numerator(&self, market: MarketId, side: Side) -> Result<u128, ExternalError> {
        self.check(Fault::OracleRead, || ExternalError::Oracle("oracle unavailable".into()))?;
        self.ensure_market(market)
            .map_err(|_| ExternalError::Oracle(format!("unknown {market}")))?;
        Ok(self.payout_numerators[side.outcome_index()])
    }

    fn payout_denominator(&self, market: MarketId) -> Result<u128, ExternalError> {
        self.check(Fault::OracleRead, || ExternalError::Oracle("oracle unavailable".into()))?;
        self.ensure_market(market)
            .map_err(|_| ExternalError::Oracle(format!("unknown {market}")))?;
        Ok(self.payout_denominator)
    }
}

impl CollateralToken for SimulatedChain {
    fn collateral_balance(&self, holder: UserId) -> Result<Amount, ExternalError> {
        self.check(Fault::CollateralRead, || ExternalError::Collateral("balance read failed".into()))?;
        Ok(self.collateral_of(holder))
    }
}

impl YieldReserve for SimulatedChain {
    fn supply(&mut self, asset: AssetId, amount: Amount, on_behalf_of: UserId) -> Result<(), ExternalError> {
        self.check(Fault::Supply, || ExternalError::Reserve("supply reverted".into()))?;
        self.ensure_asset(asset)?;
        self.take_collateral(self.market.vault_address, amount)?;
        let slot = self.reserve_positions.entry(on_behalf_of).or_default();
        *slot = Amount::new(slot.value().saturating_add(amount.value()));
        self.reserve_cash = Amount::new(self.reserve_cash.value().saturating_add(amount.value()));
        Ok(())
    }

    fn withdraw(&mut self, asset: AssetId, amount: Amount, to: UserId) -> Result<Amount, ExternalError> {
        self.check(Fault::Withdraw, || ExternalError::Reserve("withdraw reverted".into()))?;
        self.ensure_asset(asset)?;
        if self.faults.contains(&Fault::WithdrawDeliversNothing) {
            return Ok(Amount::ZERO);
        }
        let vault = self.market.vault_address;
        if amount > self.reserve_cash {
            return Err(ExternalError::Reserve("insufficient reserve liquidity".into()));
        }
        let slot = self.reserve_positions.entry(vault).or_default();
        *slot = slot
            .checked_sub(amount)
            .ok_or_else(|| ExternalError::Reserve("withdraw exceeds position".into()))?;
        self.reserve_cash = self.reserve_cash.saturating_sub(amount);
        self.credit_collateral(to, amount);
        Ok(amount)
    }

    fn reserve_balance(&self, asset: AssetId, holder: UserId) -> Result<Amount, ExternalError> {
        self.ensure_asset(asset)?;
        Ok(self.reserve_positions.get(&holder).copied().unwrap_or_default())
    }

    fn available_liquidity(&self, asset: AssetId) -> Result<Amount, ExternalError> {
        self.ensure_asset(asset)?;
        Ok(self.reserve_cash)
    }
}

// savepoints are whole-chain snapshots, armed faults included
impl Transactional for SimulatedChain {
    type Savepoint = SimulatedChain;

    fn savepoint(&self) -> Self::Savepoint {
        self.clone()
    }

    fn rollback(&mut self, savepoint: Self::Savepoint) {
        *self = savepoint;
    }
}

/// Moves `amount` of `side` claims from `user` into the vault and delivers the
/// deposit notification, the way the token layer calls back on a transfer.
pub fn deliver_claims(
    vault: &mut Vault<SimulatedChain>,
    user: UserId,
    side: Side,
    amount: Amount,
) -> VaultResult<DepositReceipt> {
    // the token transfer and the notification revert together
    vault.atomically(|vault| {
        let claim_id = vault.market().claim_id(side);
        let vault_address = vault.market().vault_address;
        vault
            .externals_mut()
            .transfer_claims(user, vault_address, claim_id, amount)?;
        vault.on_claim_received(ClaimTransfer {
            operator: user,
            from: user,
            claim_id,
            amount,
        })
    })
}

/// Batch form of [`deliver_claims`].
pub fn deliver_batch(
    vault: &mut Vault<SimulatedChain>,
    user: UserId,
    items: &[(Side, Amount)],
) -> VaultResult<DepositReceipt> {
    vault.atomically(|vault| {
        let vault_address = vault.market().vault_address;
        let mut claim_ids = Vec::with_capacity(items.len());
        let mut amounts = Vec::with_capacity(items.len());
        for (side, amount) in items {
            let claim_id = vault.market().claim_id(*side);
            vault
                .externals_mut()
                .transfer_claims(user, vault_address, claim_id, *amount)?;
            claim_ids.push(claim_id);
            amounts.push(*amount);
        }
        vault.on_batch_received(BatchClaimTransfer {
            operator: user,
            from: user,
            claim_ids,
            amounts,
        })
    })
}
