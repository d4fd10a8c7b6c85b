use serde::{Deserialize, Deserializer, Serialize};

use super::lenient;

/// Final result of a journaled trade.
///
/// Only `Win`, `Loss` and `Breakeven` count as *finished*. `Pending` is the
/// form default; anything the backend sends that we don't recognise lands in
/// `Unknown` and is treated like pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeResult {
    Win,
    Loss,
    Breakeven,
    #[default]
    Pending,
    Unknown,
}

impl TradeResult {
    /// Parse a backend label, case-insensitively. Never fails.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "win" => Self::Win,
            "loss" => Self::Loss,
            "breakeven" => Self::Breakeven,
            "pending" | "" => Self::Pending,
            _ => Self::Unknown,
        }
    }

    /// Win, loss or breakeven.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Win | Self::Loss | Self::Breakeven)
    }
}

impl<'de> Deserialize<'de> for TradeResult {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(Self::from_label(&lenient::text(d)?))
    }
}

impl std::fmt::Display for TradeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeResult::Win => write!(f, "win"),
            TradeResult::Loss => write!(f, "loss"),
            TradeResult::Breakeven => write!(f, "breakeven"),
            TradeResult::Pending => write!(f, "pending"),
            TradeResult::Unknown => write!(f, "unknown"),
        }
    }
}

/// Position direction. Unrecognised labels default to long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Long,
    Short,
}

impl Direction {
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("short") {
            Self::Short
        } else {
            Self::Long
        }
    }

    /// +1 for long, -1 for short.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(Self::from_label(&lenient::text(d)?))
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

/// A stop-loss or take-profit level with the reason it was placed there.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceLevel {
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub price: Option<f64>,

    #[serde(deserialize_with = "lenient::text")]
    pub reason: String,
}

impl PriceLevel {
    pub fn new(price: f64, reason: impl Into<String>) -> Self {
        Self {
            price: Some(price),
            reason: reason.into(),
        }
    }
}

/// One journaled futures trade, as stored by the backend.
///
/// Every field has a default so that partially filled records still parse;
/// the analytics only rely on `date`, `result`, `pnl`, `ict_setup` and the
/// boolean flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trade {
    #[serde(deserialize_with = "lenient::opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "String::is_empty")]
    pub username: String,

    /// Calendar date as sent by the backend (usually `YYYY-MM-DD`).
    /// Kept raw; bucketing decides whether it parses.
    #[serde(deserialize_with = "lenient::text")]
    pub date: String,

    /// Entry time, `HH:MM`.
    #[serde(deserialize_with = "lenient::text")]
    pub time: String,

    #[serde(deserialize_with = "lenient::text")]
    pub symbol: String,

    pub direction: Direction,

    #[serde(deserialize_with = "lenient::text")]
    pub session: String,

    #[serde(deserialize_with = "lenient::text")]
    pub timeframe: String,

    #[serde(deserialize_with = "lenient::opt_f64")]
    pub risk_percent: Option<f64>,

    #[serde(deserialize_with = "lenient::opt_f64")]
    pub entry_price: Option<f64>,

    #[serde(deserialize_with = "lenient::opt_f64")]
    pub exit_price: Option<f64>,

    pub result: TradeResult,

    /// Realised PnL in account currency. Non-numeric input reads as 0.
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub pnl: f64,

    #[serde(deserialize_with = "lenient::opt_f64")]
    pub r_multiple: Option<f64>,

    #[serde(deserialize_with = "lenient::text")]
    pub ict_setup: String,

    #[serde(deserialize_with = "lenient::text")]
    pub higher_tf_bias: String,

    // ── Strategy tags ───────────────────────────────────────────────
    #[serde(deserialize_with = "lenient::flag")]
    pub ifvg_used: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub ob_used: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub breaker_used: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub liquidity_sweep_used: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub mitigation_block_used: bool,

    // ── Psychology / behavior ───────────────────────────────────────
    #[serde(deserialize_with = "lenient::text")]
    pub pre_trade_emotion: String,
    #[serde(deserialize_with = "lenient::text")]
    pub post_trade_emotion: String,
    #[serde(deserialize_with = "lenient::text")]
    pub trade_grade: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub followed_plan: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub emotional_trade: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub took_profit_early: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub missed_trade: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub moved_stop_loss: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub moved_take_profit: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub revenge_trade: bool,

    #[serde(deserialize_with = "lenient::text")]
    pub notes: String,

    #[serde(deserialize_with = "lenient::objects")]
    pub stop_levels: Vec<PriceLevel>,
    #[serde(deserialize_with = "lenient::objects")]
    pub take_profit_levels: Vec<PriceLevel>,
}

impl Default for Trade {
    fn default() -> Self {
        Self {
            id: None,
            username: String::new(),
            date: String::new(),
            time: String::new(),
            symbol: String::new(),
            direction: Direction::Long,
            session: String::new(),
            timeframe: "1m".to_string(),
            risk_percent: None,
            entry_price: None,
            exit_price: None,
            result: TradeResult::Pending,
            pnl: 0.0,
            r_multiple: None,
            ict_setup: String::new(),
            higher_tf_bias: "1H".to_string(),
            ifvg_used: false,
            ob_used: false,
            breaker_used: false,
            liquidity_sweep_used: false,
            mitigation_block_used: false,
            pre_trade_emotion: String::new(),
            post_trade_emotion: String::new(),
            trade_grade: String::new(),
            followed_plan: true,
            emotional_trade: false,
            took_profit_early: false,
            missed_trade: false,
            moved_stop_loss: false,
            moved_take_profit: false,
            revenge_trade: false,
            notes: String::new(),
            stop_levels: vec![PriceLevel::default()],
            take_profit_levels: vec![PriceLevel::default()],
        }
    }
}

impl Trade {
    /// Minimal trade carrying only what the analytics read.
    pub fn new(date: impl Into<String>, result: TradeResult, pnl: f64) -> Self {
        Self {
            date: date.into(),
            result,
            pnl,
            ..Self::default()
        }
    }

    /// Builder-style setter for the ICT setup label.
    pub fn with_setup(mut self, setup: impl Into<String>) -> Self {
        self.ict_setup = setup.into();
        self
    }
}
