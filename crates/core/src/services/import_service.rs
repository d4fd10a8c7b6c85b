use chrono::NaiveDateTime;

use crate::errors::CoreError;
use crate::models::draft::TradeDraft;
use crate::models::import::TopstepFill;
use crate::models::instrument::Instrument;
use crate::models::trade::{Direction, TradeResult};

/// Lines a TopstepX row must have at minimum; the direction line is optional.
pub const MIN_TOPSTEP_LINES: usize = 11;

const TOPSTEP_DATETIME_FORMATS: [&str; 4] = [
    "%B %d %Y %I:%M:%S %p",
    "%B %d %Y %I:%M %p",
    "%b %d %Y %I:%M:%S %p",
    "%b %d %Y %I:%M %p",
];

/// Parses broker copy-outs and merges them into the trade form.
pub struct ImportService;

impl ImportService {
    pub fn new() -> Self {
        Self
    }

    /// Parse one TopstepX row pasted as one field per line.
    ///
    /// Line layout after dropping blank lines: id, symbol, size, entered,
    /// exited, duration, entry price, exit price, PnL, commission, extra
    /// metric, direction.
    pub fn parse_topstep(&self, raw: &str) -> Result<TopstepFill, CoreError> {
        let lines: Vec<&str> = raw
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        if lines.len() < MIN_TOPSTEP_LINES {
            return Err(CoreError::ValidationError(format!(
                "This doesn't look like a full TopstepX block: expected at least {MIN_TOPSTEP_LINES} lines, got {}",
                lines.len()
            )));
        }
        let line = |i: usize| lines.get(i).copied().unwrap_or_default();

        let entered = parse_topstep_datetime(line(3));
        let pnl = parse_amount(line(8));
        let direction_line = line(11).to_ascii_lowercase();
        let direction = if direction_line.contains("long") {
            Direction::Long
        } else if direction_line.contains("short") {
            Direction::Short
        } else {
            Direction::Long
        };
        let result = match pnl {
            Some(p) if p > 0.0 => TradeResult::Win,
            Some(p) if p < 0.0 => TradeResult::Loss,
            Some(_) => TradeResult::Breakeven,
            None => TradeResult::Pending,
        };

        let fill = TopstepFill {
            trade_id: line(0).to_string(),
            symbol: line(1).trim_start_matches('/').trim().to_string(),
            size: line(2).to_string(),
            entered_raw: line(3).to_string(),
            exited_raw: line(4).to_string(),
            entry_date: entered.map(|dt| dt.format("%Y-%m-%d").to_string()),
            entry_time: entered.map(|dt| dt.format("%H:%M").to_string()),
            entry_price_raw: line(6).to_string(),
            exit_price_raw: line(7).to_string(),
            pnl_raw: line(8).to_string(),
            entry_price: parse_amount(line(6)),
            exit_price: parse_amount(line(7)),
            pnl,
            commission: line(9).to_string(),
            extra_metric: line(10).to_string(),
            direction,
            result,
        };
        tracing::debug!(trade_id = %fill.trade_id, symbol = %fill.symbol, "Parsed TopstepX row");
        Ok(fill)
    }

    /// The sentence appended to the trade notes for an imported fill.
    pub fn narrative(&self, fill: &TopstepFill) -> String {
        let symbol = if fill.symbol.is_empty() {
            "unknown symbol"
        } else {
            fill.symbol.as_str()
        };
        let commission = if fill.commission.is_empty() {
            "$0"
        } else {
            fill.commission.as_str()
        };
        let extra = if fill.extra_metric.is_empty() {
            "not provided"
        } else {
            fill.extra_metric.as_str()
        };
        format!(
            "TopstepX copy output: Trade ID {}, size {} contract(s) on {symbol}, \
             entered around \"{}\" and exited around \"{}\". \
             Entry price was {}, exit price was {}, realized PnL was {}, \
             commissions were {commission}, and the extra metric reported was {extra}.",
            fill.trade_id,
            fill.size,
            fill.entered_raw,
            fill.exited_raw,
            fill.entry_price_raw,
            fill.exit_price_raw,
            fill.pnl_raw,
        )
    }

    /// Parse `raw` and fold it into the draft.
    ///
    /// Fields that didn't parse keep their previous value. Direction and
    /// result are always overwritten. The narrative is appended to existing
    /// notes after a blank line. A recognised contract root also fills the
    /// position-size helper.
    pub fn apply_to_draft(&self, draft: &mut TradeDraft, raw: &str) -> Result<TopstepFill, CoreError> {
        let fill = self.parse_topstep(raw)?;
        let trade = &mut draft.trade;

        if let Some(date) = &fill.entry_date {
            trade.date = date.clone();
        }
        if let Some(time) = &fill.entry_time {
            trade.time = time.clone();
        }
        if !fill.symbol.is_empty() {
            trade.symbol = fill.symbol.clone();
        }
        trade.direction = fill.direction;
        trade.entry_price = fill.entry_price.or(trade.entry_price);
        trade.exit_price = fill.exit_price.or(trade.exit_price);
        if let Some(pnl) = fill.pnl {
            trade.pnl = pnl;
        }
        trade.result = fill.result;

        let sentence = self.narrative(&fill);
        if trade.notes.is_empty() {
            trade.notes = sentence;
        } else {
            trade.notes = format!("{}\n\n{sentence}", trade.notes);
        }

        if let Some(instrument) = Instrument::from_symbol(&fill.symbol) {
            draft.risk.select_instrument(instrument);
        }
        if let Some(size) = parse_amount(&fill.size).filter(|s| *s > 0.0) {
            draft.risk.contracts = Some(size);
        }
        draft.raw_import = raw.to_string();

        Ok(fill)
    }
}

impl Default for ImportService {
    fn default() -> Self {
        Self::new()
    }
}

/// `"$1,234.50"` → `1234.5`. Accepts a leading sign or parentheses for negatives.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    let cleaned = cleaned.trim();
    let (negative, body) = match cleaned.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => (false, cleaned),
    };
    let value: f64 = body.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// `"November 25 2025 @ 9:59:53 am"` in the platform's local time.
pub fn parse_topstep_datetime(raw: &str) -> Option<NaiveDateTime> {
    let cleaned = raw
        .replace('@', " ")
        .split_whitespace()
        .map(|part| match part.to_ascii_lowercase().as_str() {
            "am" => "AM".to_string(),
            "pm" => "PM".to_string(),
            _ => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");

    TOPSTEP_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&cleaned, fmt).ok())
}
