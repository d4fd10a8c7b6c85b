use serde::{Deserialize, Serialize};

use super::trade::{Direction, TradeResult};

/// One closed position as copied out of the TopstepX trade list.
///
/// Numeric fields are `None` when the line didn't hold a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopstepFill {
    pub trade_id: String,
    /// Contract symbol without the leading `/`.
    pub symbol: String,
    pub size: String,
    /// Entry date/time exactly as the platform printed them.
    pub entered_raw: String,
    pub exited_raw: String,
    /// `YYYY-MM-DD` / `HH:MM` of the entry, when the timestamp parsed.
    pub entry_date: Option<String>,
    pub entry_time: Option<String>,
    pub entry_price_raw: String,
    pub exit_price_raw: String,
    pub pnl_raw: String,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub pnl: Option<f64>,
    pub commission: String,
    pub extra_metric: String,
    pub direction: Direction,
    /// Derived from the PnL sign; `Pending` if the PnL didn't parse.
    pub result: TradeResult,
}
