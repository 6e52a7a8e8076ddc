// 8.0 engine/core.rs: main engine. holds the market binding, ledger, resolution state
// and the collaborators it calls out to.

use super::config::EngineConfig;
use crate::config::VaultConfig;
use crate::conversion::{ConversionAdapter, OutcomeOracle};
use crate::custody::ClaimCustody;
use crate::error::{VaultError, VaultResult};
use crate::events::{Event, EventId, EventPayload, OperationRejectedEvent};
use crate::ledger::Ledger;
use crate::market::Market;
use crate::reserve::{CollateralToken, YieldReserve};
use crate::resolution::ResolutionState;
use crate::types::Timestamp;
use std::collections::VecDeque;

/// Savepoint and rollback over the collaborators' combined state.
///
/// Every vault operation takes a savepoint before its first collaborator call and
/// rolls back to it if any later step fails, so a redeem or supply that already
/// went through is undone along with the failed withdrawal. Hosts whose runtime
/// reverts the whole enclosing transaction on error can use `()` and a no-op
/// rollback.
pub trait Transactional {
    type Savepoint;

    fn savepoint(&self) -> Self::Savepoint;
    fn rollback(&mut self, savepoint: Self::Savepoint);
}

/// Everything the vault calls out to.
pub trait Externals:
    ClaimCustody + ConversionAdapter + OutcomeOracle + CollateralToken + YieldReserve + Transactional
{
}

impl<T> Externals for T where
    T: ClaimCustody + ConversionAdapter + OutcomeOracle + CollateralToken + YieldReserve + Transactional
{
}

/** 8.1: main vault struct. all mutable state lives here */
#[derive(Debug)]
pub struct Vault<E: Externals> {
    pub(super) market: Market,
    pub(super) config: EngineConfig,
    pub(super) externals: E,
    pub(super) ledger: Ledger,
    pub(super) resolution: ResolutionState,
    pub(super) events: VecDeque<Event>,
    pub(super) next_event_id: u64,
    pub(super) current_time: Timestamp,
}

impl<E: Externals> Vault<E> {
    pub fn new(market: Market, config: EngineConfig, externals: E) -> Self {
        Self {
            market,
            config,
            externals,
            ledger: Ledger::new(),
            resolution: ResolutionState::Unresolved,
            events: VecDeque::new(),
            next_event_id: 1,
            current_time: Timestamp::from_millis(0),
        }
    }

    pub fn from_config(config: VaultConfig, externals: E) -> Result<Self, crate::config::ConfigError> {
        config.validate()?;
        Ok(Self::new(config.market, config.engine, externals))
    }

    pub fn set_time(&mut self, timestamp: Timestamp) {
        self.current_time = timestamp;
    }

    pub fn time(&self) -> Timestamp {
        self.current_time
    }

    pub fn advance_time(&mut self, millis: i64) {
        self.current_time = Timestamp::from_millis(self.current_time.as_millis() + millis);
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn externals(&self) -> &E {
        &self.externals
    }

    // direct access for the host that also drives the collaborators (tests, simulation)
    pub fn externals_mut(&mut self) -> &mut E {
        &mut self.externals
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn ensure_unresolved(&self) -> VaultResult<()> {
        self.resolution.ensure_unresolved()
    }

    pub(super) fn emit_event(&mut self, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), self.current_time, payload);
        self.next_event_id += 1;
        if self.config.verbose {
            tracing::debug!(event_id = event.id.0, payload = ?event.payload, "vault event");
        }
        self.events.push_back(event);
        while self.events.len() > self.config.max_events {
            self.events.pop_front();
        }
    }

    /// Runs `op` as one unit: on error the collaborators are rolled back to where
    /// they were before `op` started. The ledger is only written once every call
    /// has succeeded, so it needs no rollback of its own.
    pub fn atomically<T>(&mut self, op: impl FnOnce(&mut Self) -> VaultResult<T>) -> VaultResult<T> {
        let savepoint = self.externals.savepoint();
        let result = op(self);
        if result.is_err() {
            self.externals.rollback(savepoint);
        }
        result
    }

    // atomically + rejection bookkeeping. every public mutating entry point goes through here
    pub(super) fn transact<T>(
        &mut self,
        operation: &str,
        op: impl FnOnce(&mut Self) -> VaultResult<T>,
    ) -> VaultResult<T> {
        match self.atomically(op) {
            Ok(value) => Ok(value),
            Err(e) => self.reject(operation, e),
        }
    }

    // records a failed operation for audit and hands the error back unchanged
    pub(super) fn reject<T>(&mut self, operation: &str, err: VaultError) -> VaultResult<T> {
        tracing::warn!(operation, error = %err, "vault operation rejected");
        self.emit_event(EventPayload::OperationRejected(OperationRejectedEvent {
            operation: operation.to_string(),
            reason: err.to_string(),
        }));
        Err(err)
    }
}
