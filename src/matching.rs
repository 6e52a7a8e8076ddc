// 3.0: symmetric greedy netting. every unmatched YES unit paired with an unmatched
// NO unit can be merged into one unit of collateral. the plan is always the maximum
// currently matchable amount, so only the side with the excess stays unmatched.

use crate::ledger::PoolTotals;
use crate::types::{Amount, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPlan {
    pub unmatched_yes: Amount,
    pub unmatched_no: Amount,
    pub match_amount: Amount,
}

impl MatchPlan {
    pub fn is_empty(&self) -> bool {
        self.match_amount.is_zero()
    }

    // side left holding unmatched claims after the plan executes
    pub fn excess_side(&self) -> Option<Side> {
        if self.unmatched_yes > self.unmatched_no {
            Some(Side::Yes)
        } else if self.unmatched_no > self.unmatched_yes {
            Some(Side::No)
        } else {
            None
        }
    }
}

// 3.1: plan from current totals. pure, so running it twice with no new deposit
// after committing the first plan always yields an empty plan.
pub fn plan_match(totals: &PoolTotals) -> MatchPlan {
    let unmatched_yes = totals.unmatched(Side::Yes);
    let unmatched_no = totals.unmatched(Side::No);
    MatchPlan {
        unmatched_yes,
        unmatched_no,
        match_amount: unmatched_yes.min(unmatched_no),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(yes: u128, no: u128, matched: u128) -> PoolTotals {
        PoolTotals {
            yes_deposits: Amount::new(yes),
            no_deposits: Amount::new(no),
            matched: Amount::new(matched),
            ..PoolTotals::default()
        }
    }

    #[test]
    fn nets_the_smaller_side() {
        let plan = plan_match(&totals(600, 400, 0));
        assert_eq!(plan.match_amount, Amount::new(400));
        assert_eq!(plan.excess_side(), Some(Side::Yes));
    }

    #[test]
    fn one_sided_pool_has_nothing_to_match() {
        let plan = plan_match(&totals(1000, 0, 0));
        assert!(plan.is_empty());
    }

    #[test]
    fn only_new_deposits_are_matched() {
        // 400 already merged, 100 new NO arrives against 200 unmatched YES
        let plan = plan_match(&totals(600, 500, 400));
        assert_eq!(plan.unmatched_yes, Amount::new(200));
        assert_eq!(plan.unmatched_no, Amount::new(100));
        assert_eq!(plan.match_amount, Amount::new(100));
    }

    #[test]
    fn committed_plan_is_idempotent() {
        let mut t = totals(750, 300, 0);
        let first = plan_match(&t);
        t.matched = t.matched.checked_add(first.match_amount).unwrap();
        let second = plan_match(&t);
        assert!(second.is_empty());
        assert_eq!(second.excess_side(), Some(Side::Yes));
    }
}
