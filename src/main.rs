//! Vault core simulation.
//!
//! Runs the deposit, matching, resolution and payout lifecycle against the
//! in-memory chain, including a liquidity-capped withdrawal and a pre-resolution
//! reclaim.

use outcome_vault::*;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Outcome Vault Core Simulation");
    println!("Single Market, Pooled Claims, Full Lifecycle\n");

    let scenarios: [(&str, fn() -> VaultResult<()>); 4] = [
        ("one-sided pool with yield", scenario_a_one_sided_yield),
        ("partial match then redemption", scenario_b_partial_match),
        ("liquidity-capped payout", scenario_c_capped_payout),
        ("pre-resolution reclaim", scenario_d_reclaim),
    ];

    for (name, run) in scenarios {
        if let Err(e) = run() {
            eprintln!("  scenario '{name}' failed: {e}");
            std::process::exit(1);
        }
    }

    println!("\nAll simulations completed successfully.");
}

const ALICE: UserId = UserId(1);
const BOB: UserId = UserId(2);

fn new_vault() -> Vault<SimulatedChain> {
    let config = Environment::Development.config();
    let chain = SimulatedChain::new(&config.market);
    Vault::new(config.market, config.engine, chain)
}

/// One YES holder, nothing to match, 10% yield before withdrawal.
fn scenario_a_one_sided_yield() -> VaultResult<()> {
    println!("Scenario A: One-Sided Pool With Yield\n");

    let mut vault = new_vault();
    vault.externals_mut().mint_claims(ALICE, Side::Yes, Amount::new(1000));
    deliver_claims(&mut vault, ALICE, Side::Yes, Amount::new(1000))?;
    println!("  Alice deposits 1000 YES, unmatched YES: {}", vault.unmatched(Side::Yes));

    vault.externals_mut().report_outcome(1, 0);
    vault.resolve()?;
    let vault_address = vault.market().vault_address;
    vault.externals_mut().accrue_to(vault_address, Amount::new(100));

    println!("  Reserve value after yield: {}", vault.reserve_value()?);
    println!("  Alice estimate: {}", vault.payout_estimate(ALICE, Side::Yes)?);

    let receipt = vault.withdraw(ALICE, ALICE)?;
    println!("  Alice withdraws {} (requested {})\n", receipt.received, receipt.requested);
    Ok(())
}

/// 600 YES vs 400 NO: 400 merged, 200 YES redeemed at resolution.
fn scenario_b_partial_match() -> VaultResult<()> {
    println!("Scenario B: Partial Match Then Redemption\n");

    let mut vault = new_vault();
    vault.externals_mut().mint_claims(ALICE, Side::Yes, Amount::new(600));
    vault.externals_mut().mint_claims(BOB, Side::No, Amount::new(400));
    deliver_claims(&mut vault, ALICE, Side::Yes, Amount::new(600))?;
    let receipt = deliver_claims(&mut vault, BOB, Side::No, Amount::new(400))?;

    println!("  Matched on Bob's deposit: {}", receipt.matching.matched);
    println!("  Unmatched YES: {}", vault.unmatched(Side::Yes));
    println!("  Alice preview: {}", vault.payout_estimate(ALICE, Side::Yes)?);

    vault.externals_mut().report_outcome(1, 0);
    let withdrawal = vault.withdraw(ALICE, ALICE)?;
    if let Some(resolution) = withdrawal.resolution {
        println!("  Lazy resolution redeemed {} claims", resolution.redeemed_claims);
    }
    println!("  Alice receives {}", withdrawal.received);

    let bob = vault.withdraw(BOB, BOB)?;
    println!("  Bob (losing side) receives {}, burns {} NO\n", bob.received, bob.no_burned);
    Ok(())
}

/// Entitlement of 1100 against 800 of reserve cash.
fn scenario_c_capped_payout() -> VaultResult<()> {
    println!("Scenario C: Liquidity-Capped Payout\n");

    let mut vault = new_vault();
    vault.externals_mut().mint_claims(ALICE, Side::Yes, Amount::new(500));
    vault.externals_mut().mint_claims(BOB, Side::No, Amount::new(500));
    deliver_claims(&mut vault, ALICE, Side::Yes, Amount::new(500))?;
    deliver_claims(&mut vault, BOB, Side::No, Amount::new(500))?;

    // 500 supplied, grows to 1100, borrowers leave 800 on hand
    vault.externals_mut().accrue_yield(dec!(1.2));
    vault.externals_mut().lend_out(Amount::new(300));
    println!("  Reserve value: {}", vault.reserve_value()?);
    println!("  Accrued yield: {}", vault.accrued_yield()?);

    vault.externals_mut().report_outcome(1, 0);
    let receipt = vault.withdraw(ALICE, ALICE)?;
    println!(
        "  Alice requested {}, received {}, forfeited {}",
        receipt.requested, receipt.received, receipt.forfeited
    );
    println!("  Alice YES balance after: {}\n", vault.position(ALICE).yes_balance);
    Ok(())
}

/// Half of a 1000 YES deposit handed back before resolution.
fn scenario_d_reclaim() -> VaultResult<()> {
    println!("Scenario D: Pre-Resolution Reclaim\n");

    let mut vault = new_vault();
    vault.externals_mut().mint_claims(ALICE, Side::Yes, Amount::new(1000));
    deliver_claims(&mut vault, ALICE, Side::Yes, Amount::new(1000))?;

    let receipt = vault.withdraw_side(ALICE, Side::Yes, Amount::new(500))?;
    println!("  Alice reclaims {} YES, ledger balance now {}", receipt.amount, receipt.remaining_balance);
    println!("  Alice wallet YES: {}", vault.externals().claims_of(ALICE, Side::Yes));
    Ok(())
}
