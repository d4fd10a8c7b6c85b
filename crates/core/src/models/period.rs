use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::trade::Trade;

/// Granularity of a bucketed view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Yearly,
    #[default]
    Monthly,
    Weekly,
    Daily,
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timeframe::Yearly => write!(f, "Yearly"),
            Timeframe::Monthly => write!(f, "Monthly"),
            Timeframe::Weekly => write!(f, "Weekly"),
            Timeframe::Daily => write!(f, "Daily"),
        }
    }
}

/// The four bucket keys derived from one calendar date.
///
/// Keys are plain strings so a UI can use them directly as labels and map
/// keys. Day, month and year keys are zero-padded and sort lexically; week
/// keys (`2024-W9`, `2024-W10`) are not padded and need
/// [`crate::services::bucketing::compare_keys`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodKeys {
    pub date: NaiveDate,
    /// `YYYY-MM-DD`
    pub day: String,
    /// `YYYY-W{n}`, journal week numbering (not ISO-8601)
    pub week: String,
    /// `YYYY-MM`
    pub month: String,
    /// `YYYY`
    pub year: String,
}

/// A trade whose date parsed, paired with its period keys.
///
/// Trades are normalized into this form once, when a snapshot is loaded;
/// records with unparseable dates never make it this far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedTrade {
    pub trade: Trade,
    pub keys: PeriodKeys,
}

impl PeriodKeys {
    pub fn key(&self, timeframe: Timeframe) -> &str {
        match timeframe {
            Timeframe::Yearly => &self.year,
            Timeframe::Monthly => &self.month,
            Timeframe::Weekly => &self.week,
            Timeframe::Daily => &self.day,
        }
    }
}
