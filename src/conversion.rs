// Conversion and oracle boundary.
//
// The settlement layer turns a YES+NO pair into one unit of collateral (merge) and,
// once the market is reported, turns winning claims into collateral (redeem). It also
// hosts the payout vector the oracle writes. Both are consumed here through traits so
// the engine stays agnostic to which chain or contract provides them.

use crate::error::ExternalError;
use crate::resolution::OracleReport;
use crate::types::{Amount, MarketId, Side};

pub trait ConversionAdapter {
    /// Merge `amount` YES+NO pairs held by the vault into collateral credited to
    /// the vault. Returns the collateral produced.
    fn merge_positions(&mut self, market: MarketId, amount: Amount) -> Result<Amount, ExternalError>;

    /// Redeem `amount` claims of the outcome selected by `index_set` for collateral
    /// credited to the vault. Only valid once the oracle has reported.
    fn redeem_positions(
        &mut self,
        market: MarketId,
        index_set: u32,
        amount: Amount,
    ) -> Result<Amount, ExternalError>;
}

pub trait OutcomeOracle {
    fn payout_numerator(&self, market: MarketId, side: Side) -> Result<u128, ExternalError>;

    // zero until the outcome is finalized
    fn payout_denominator(&self, market: MarketId) -> Result<u128, ExternalError>;

    fn report(&self, market: MarketId) -> Result<OracleReport, ExternalError> {
        Ok(OracleReport {
            yes_numerator: self.payout_numerator(market, Side::Yes)?,
            no_numerator: self.payout_numerator(market, Side::No)?,
            denominator: self.payout_denominator(market)?,
        })
    }
}
