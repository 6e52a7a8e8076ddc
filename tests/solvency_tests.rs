//! Property-based solvency tests.
//!
//! Random deposit, reclaim and settlement sequences against the in-memory
//! chain. The ledger must stay conserved and the vault must never owe more
//! than the reserve holds.

use outcome_vault::*;
use proptest::prelude::*;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
enum Op {
    Deposit { user: u64, side: Side, amount: u128 },
    Reclaim { user: u64, side: Side, amount: u128 },
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Yes), Just(Side::No)]
}

fn amount_strategy() -> impl Strategy<Value = u128> {
    1u128..10_000u128
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (1u64..=5, side_strategy(), amount_strategy())
            .prop_map(|(user, side, amount)| Op::Deposit { user, side, amount }),
        1 => (1u64..=5, side_strategy(), amount_strategy())
            .prop_map(|(user, side, amount)| Op::Reclaim { user, side, amount }),
    ]
}

fn deposits_strategy() -> impl Strategy<Value = Vec<(u64, Side, u128)>> {
    prop::collection::vec((1u64..=5, side_strategy(), amount_strategy()), 1..20)
}

fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=50i64).prop_map(|x| Decimal::new(x, 2)) // 0% to 50%
}

fn new_vault() -> Vault<SimulatedChain> {
    let config = VaultConfig::default();
    let chain = SimulatedChain::new(&config.market);
    Vault::new(config.market, config.engine, chain)
}

fn apply(vault: &mut Vault<SimulatedChain>, op: &Op) {
    match *op {
        Op::Deposit { user, side, amount } => {
            let user = UserId(user);
            vault.externals_mut().mint_claims(user, side, Amount::new(amount));
            let _ = deliver_claims(vault, user, side, Amount::new(amount));
        }
        Op::Reclaim { user, side, amount } => {
            let _ = vault.withdraw_side(UserId(user), side, Amount::new(amount));
        }
    }
}

fn deposit_all(vault: &mut Vault<SimulatedChain>, deposits: &[(u64, Side, u128)]) {
    for &(user, side, amount) in deposits {
        let user = UserId(user);
        vault.externals_mut().mint_claims(user, side, Amount::new(amount));
        deliver_claims(vault, user, side, Amount::new(amount)).unwrap();
    }
}

fn users(vault: &Vault<SimulatedChain>) -> Vec<UserId> {
    let mut users: Vec<UserId> = vault.ledger().users().map(|(u, _)| *u).collect();
    users.sort_by_key(|u| u.0);
    users
}

proptest! {
    /// Ledger sums match totals and custody after every operation
    #[test]
    fn ledger_conserved_under_random_ops(
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut vault = new_vault();
        let addr = vault.market().vault_address;

        for op in &ops {
            apply(&mut vault, op);

            prop_assert!(vault.check_invariants(), "invariants broken after {:?}", op);
            let totals = *vault.totals();
            prop_assert!(totals.matched <= totals.yes_deposits.min(totals.no_deposits));

            // unmatched claims stay in custody, matched ones sit in the reserve
            for side in Side::BOTH {
                prop_assert_eq!(vault.externals().claims_of(addr, side), vault.unmatched(side));
            }
            prop_assert_eq!(vault.reserve_value().unwrap(), totals.matched);
        }
    }

    /// Matching always leaves at least one side fully netted
    #[test]
    fn matching_nets_one_side(deposits in deposits_strategy()) {
        let mut vault = new_vault();
        deposit_all(&mut vault, &deposits);

        prop_assert!(vault.unmatched(Side::Yes).is_zero() || vault.unmatched(Side::No).is_zero());

        let before = *vault.totals();
        let again = vault.match_pending().unwrap();
        prop_assert_eq!(again, MatchOutcome::default());
        prop_assert_eq!(*vault.totals(), before);
    }

    /// Winners together take exactly the reserve; losers take nothing
    #[test]
    fn payouts_exhaust_reserve_exactly(
        deposits in deposits_strategy(),
        rate in rate_strategy(),
        yes_wins in any::<bool>(),
    ) {
        let mut vault = new_vault();
        deposit_all(&mut vault, &deposits);
        vault.externals_mut().accrue_yield(rate);

        if yes_wins {
            vault.externals_mut().report_outcome(1, 0);
        } else {
            vault.externals_mut().report_outcome(0, 1);
        }
        let receipt = vault.resolve().unwrap();
        let winner = receipt.resolution.winning_side;
        let reserve_at_resolution = vault.reserve_value().unwrap();

        let mut paid = 0u128;
        for user in users(&vault) {
            let had_winning = !vault.position(user).balance(winner).is_zero();
            let withdrawal = vault.withdraw(user, user).unwrap();
            prop_assert_eq!(withdrawal.forfeited, Amount::ZERO);
            if !had_winning {
                prop_assert_eq!(withdrawal.received, Amount::ZERO);
            }
            paid += withdrawal.received.value();
            prop_assert!(paid <= reserve_at_resolution.value());
        }

        if !vault.totals().deposits(winner).is_zero() {
            prop_assert!(false, "winning deposits left after every withdrawal");
        }
        if paid > 0 {
            prop_assert_eq!(paid, reserve_at_resolution.value());
            prop_assert_eq!(vault.reserve_value().unwrap(), Amount::ZERO);
        }
        prop_assert_eq!(vault.totals().paid_out, Amount::new(paid));
    }

    /// Liquidity shortfalls cap payouts but never let the vault overpay
    #[test]
    fn capped_payouts_never_exceed_cash(
        deposits in deposits_strategy(),
        rate in rate_strategy(),
        lent in 0u128..50_000u128,
    ) {
        let mut vault = new_vault();
        deposit_all(&mut vault, &deposits);
        vault.externals_mut().accrue_yield(rate);
        vault.externals_mut().lend_out(Amount::new(lent));
        vault.externals_mut().report_outcome(1, 0);
        vault.resolve().unwrap();

        let cash = vault.externals().reserve_cash();
        let mut paid = 0u128;
        for user in users(&vault) {
            match vault.withdraw(user, user) {
                Ok(w) => {
                    prop_assert!(w.received <= w.requested);
                    paid += w.received.value();
                }
                // reserve drained to zero under a positive entitlement
                Err(VaultError::ReserveWithdrawFailed { .. }) => {}
                Err(e) => prop_assert!(false, "unexpected error: {}", e),
            }
        }
        prop_assert!(paid <= cash.value());
        prop_assert!(vault.check_invariants());
    }

    /// Resolution is recorded once and later reports cannot move it
    #[test]
    fn resolution_is_one_way(
        deposits in deposits_strategy(),
        yes in 0u128..10,
        no in 0u128..10,
    ) {
        prop_assume!(yes + no > 0);
        let mut vault = new_vault();
        deposit_all(&mut vault, &deposits);
        vault.externals_mut().report_outcome(yes, no);

        let first = vault.resolve().unwrap().resolution.winning_side;
        let expected = if yes > no { Side::Yes } else { Side::No };
        prop_assert_eq!(first, expected);

        vault.externals_mut().report_outcome(no, yes);
        prop_assert_eq!(vault.resolve(), Err(VaultError::AlreadyResolved));
        prop_assert_eq!(vault.winning_side(), Some(first));

        vault.externals_mut().mint_claims(UserId(9), Side::Yes, Amount::new(1));
        prop_assert_eq!(
            deliver_claims(&mut vault, UserId(9), Side::Yes, Amount::new(1)),
            Err(VaultError::AlreadyResolved)
        );
        prop_assert_eq!(vault.winning_side(), Some(first));
    }

    /// A failing reserve supply leaves the ledger where it was
    #[test]
    fn failed_supply_changes_nothing(
        deposits in deposits_strategy(),
        amount in amount_strategy(),
    ) {
        let mut vault = new_vault();
        deposit_all(&mut vault, &deposits);
        let before = *vault.totals();
        let position = vault.position(UserId(7));

        vault.externals_mut().arm(Fault::Supply);
        let side = if vault.unmatched(Side::Yes).is_zero() { Side::Yes } else { Side::No };
        vault.externals_mut().mint_claims(UserId(7), side, Amount::new(amount));
        let result = deliver_claims(&mut vault, UserId(7), side, Amount::new(amount));

        // the delivery matches against the standing excess, so supply is reached
        let crosses = !vault.unmatched(side.opposite()).is_zero();
        if crosses {
            prop_assert!(result.is_err());
            prop_assert_eq!(*vault.totals(), before);
            prop_assert_eq!(vault.position(UserId(7)), position);
            prop_assert_eq!(vault.externals().claims_of(UserId(7), side), Amount::new(amount));
        }
    }
}
