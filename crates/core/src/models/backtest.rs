use serde::{Deserialize, Deserializer, Serialize};

use super::lenient;

/// How a replayed setup played out. Missing or unrecognised labels are `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BacktestOutcome {
    Successful,
    Failed,
    Partial,
    #[default]
    Unknown,
}

impl BacktestOutcome {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "successful" => Self::Successful,
            "failed" => Self::Failed,
            "partial" => Self::Partial,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for BacktestOutcome {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(Self::from_label(&lenient::text(d)?))
    }
}

impl std::fmt::Display for BacktestOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BacktestOutcome::Successful => write!(f, "successful"),
            BacktestOutcome::Failed => write!(f, "failed"),
            BacktestOutcome::Partial => write!(f, "partial"),
            BacktestOutcome::Unknown => write!(f, "unknown"),
        }
    }
}

/// A chart-replay note: one ICT model tested by hand on historical data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Backtest {
    #[serde(deserialize_with = "lenient::opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(deserialize_with = "lenient::text")]
    pub time: String,
    #[serde(deserialize_with = "lenient::text")]
    pub symbol: String,
    #[serde(deserialize_with = "lenient::text")]
    pub timeframe: String,
    #[serde(deserialize_with = "lenient::text")]
    pub ict_setup: String,
    #[serde(deserialize_with = "lenient::text")]
    pub session: String,

    pub outcome: BacktestOutcome,

    #[serde(deserialize_with = "lenient::text")]
    pub what_happened: String,
    #[serde(deserialize_with = "lenient::text")]
    pub why_outcome: String,
    #[serde(deserialize_with = "lenient::text")]
    pub notes: String,

    /// The model was tweaked during the replay to make it work.
    #[serde(deserialize_with = "lenient::flag")]
    pub strategy_modification: bool,
    #[serde(deserialize_with = "lenient::text")]
    pub modification_details: String,

    #[serde(deserialize_with = "lenient::text")]
    pub screenshot_link: String,
}

impl Default for Backtest {
    fn default() -> Self {
        Self {
            id: None,
            date: String::new(),
            time: String::new(),
            symbol: String::new(),
            timeframe: "1m".to_string(),
            ict_setup: String::new(),
            session: String::new(),
            outcome: BacktestOutcome::Unknown,
            what_happened: String::new(),
            why_outcome: String::new(),
            notes: String::new(),
            strategy_modification: false,
            modification_details: String::new(),
            screenshot_link: String::new(),
        }
    }
}

impl Backtest {
    pub fn new(
        ict_setup: impl Into<String>,
        outcome: BacktestOutcome,
        strategy_modification: bool,
    ) -> Self {
        Self {
            ict_setup: ict_setup.into(),
            outcome,
            strategy_modification,
            ..Self::default()
        }
    }
}
