// 11.0: every committed state change produces an event. used for audit trails and
// notifying external systems. failed operations leave an OperationRejected entry and
// nothing else.

use crate::types::{Amount, Side, Timestamp, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    // Ledger events
    Deposited(DepositedEvent),
    SideReclaimed(SideReclaimedEvent),
    Withdrawn(WithdrawnEvent),

    // Pool events
    Matched(MatchedEvent),
    SuppliedToReserve(SuppliedEvent),

    // Market events
    Resolved(ResolvedEvent),

    OperationRejected(OperationRejectedEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositedEvent {
    pub user: UserId,
    pub side: Side,
    pub amount: Amount,
    pub new_balance: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideReclaimedEvent {
    pub user: UserId,
    pub side: Side,
    pub amount: Amount,
    pub remaining_balance: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawnEvent {
    pub user: UserId,
    pub to: UserId,
    pub yes_burned: Amount,
    pub no_burned: Amount,
    pub requested: Amount,
    pub received: Amount,
    // entitlement lost to the liquidity cap
    pub forfeited: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedEvent {
    pub amount: Amount,
    pub total_matched: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuppliedEvent {
    pub amount: Amount,
    pub total_yielding: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedEvent {
    pub winning_side: Side,
    pub payout_numerator: u128,
    pub payout_denominator: u128,
    pub redeemed_claims: Amount,
    pub collateral_received: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRejectedEvent {
    pub operation: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn withdrawn_event_serializes() {
        let event = Event::new(
            EventId(3),
            Timestamp::from_millis(1000),
            EventPayload::Withdrawn(WithdrawnEvent {
                user: UserId(1),
                to: UserId(1),
                yes_burned: Amount::new(1000),
                no_burned: Amount::ZERO,
                requested: Amount::new(1100),
                received: Amount::new(800),
                forfeited: Amount::new(300),
            }),
        );

        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        match back.payload {
            EventPayload::Withdrawn(w) => assert_eq!(w.forfeited, Amount::new(300)),
            other => panic!("unexpected payload {other:?}"),
        }
    }
}
