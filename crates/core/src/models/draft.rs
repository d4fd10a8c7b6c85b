use serde::{Deserialize, Serialize};

use super::instrument::Instrument;
use super::lenient;
use super::trade::Trade;

/// Position-size inputs used to derive PnL and risk %.
/// Not part of the submitted trade.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskHelper {
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub account_balance: Option<f64>,

    #[serde(deserialize_with = "lenient::opt_f64")]
    pub contracts: Option<f64>,

    /// Dollars per point. Filled from `instrument` when one is picked.
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub point_value: Option<f64>,

    pub instrument: Option<Instrument>,
}

impl RiskHelper {
    /// Pick an instrument and take its point value.
    pub fn select_instrument(&mut self, instrument: Instrument) {
        self.instrument = Some(instrument);
        self.point_value = Some(instrument.point_value());
    }
}

/// Dollar risk of a position between entry and first stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskEstimate {
    pub risk_amount: f64,
    /// Risk as % of account balance, rounded to 2 decimals
    pub risk_percent: f64,
}

/// The in-progress trade form, cached between sessions until submitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeDraft {
    pub trade: Trade,
    pub risk: RiskHelper,
    /// Last broker block pasted into the import box.
    #[serde(deserialize_with = "lenient::text")]
    pub raw_import: String,
}
