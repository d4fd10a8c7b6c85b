use serde::{Deserialize, Serialize};

/// A single point of the equity curve.
///
/// Generated here and rendered as-is by the frontend. Only days
/// with at least one trade get a point; gaps are not filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// `YYYY-MM-DD`
    pub day_key: String,

    /// `MM/DD/YYYY`
    pub label: String,

    /// Net PnL of that day alone
    pub day_pnl: f64,

    /// Running sum of `day_pnl` up to and including this day
    pub cumulative_pnl: f64,
}

/// One bar of the weekly PnL chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPnlPoint {
    pub week_key: String,
    pub pnl: f64,
}

impl WeeklyPnlPoint {
    /// Net profitable week (drawn blue); losing weeks are drawn red.
    pub fn is_up(&self) -> bool {
        self.pnl > 0.0
    }
}
