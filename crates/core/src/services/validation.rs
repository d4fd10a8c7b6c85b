use crate::errors::CoreError;
use crate::models::backtest::{Backtest, BacktestOutcome};
use crate::models::trade::Trade;
use crate::services::bucketing;

/// Check a trade before it is submitted.
///
/// All problems are collected into one `ValidationError`, one sentence each.
pub fn validate_trade(trade: &Trade) -> Result<(), CoreError> {
    let mut errors: Vec<String> = Vec::new();

    let required_text = [
        (&trade.date, "Date"),
        (&trade.time, "Time"),
        (&trade.symbol, "Symbol"),
        (&trade.session, "Session"),
        (&trade.timeframe, "Timeframe"),
        (&trade.ict_setup, "ICT Setup"),
        (&trade.higher_tf_bias, "Higher Timeframe Bias"),
        (&trade.pre_trade_emotion, "Pre-trade Emotion"),
        (&trade.post_trade_emotion, "Post-trade Emotion"),
        (&trade.trade_grade, "Trade Grade"),
        (&trade.notes, "Notes"),
    ];
    for (value, label) in required_text {
        if value.trim().is_empty() {
            errors.push(format!("{label} is required."));
        }
    }

    let required_numbers = [
        (trade.risk_percent, "Risk %"),
        (trade.entry_price, "Entry Price"),
        (trade.exit_price, "Exit Price"),
        (trade.r_multiple, "R-Multiple"),
    ];
    for (value, label) in required_numbers {
        if value.is_none() {
            errors.push(format!("{label} is required."));
        }
    }

    if !trade.date.trim().is_empty() && bucketing::parse_date(&trade.date).is_none() {
        errors.push(format!("Date '{}' is not a valid calendar date.", trade.date));
    }

    let first_stop = trade.stop_levels.first();
    if first_stop.and_then(|l| l.price).is_none() {
        errors.push("At least one Stop Loss price is required.".into());
    }
    if first_stop.map_or(true, |l| l.reason.trim().is_empty()) {
        errors.push("A reason for the first Stop Loss is required.".into());
    }
    let first_tp = trade.take_profit_levels.first();
    if first_tp.and_then(|l| l.price).is_none() {
        errors.push("At least one Take Profit price is required.".into());
    }
    if first_tp.map_or(true, |l| l.reason.trim().is_empty()) {
        errors.push("A reason for the first Take Profit is required.".into());
    }

    // Exits always happen at a planned level.
    if let Some(exit) = trade.exit_price {
        let hits_level = trade
            .stop_levels
            .iter()
            .chain(&trade.take_profit_levels)
            .any(|l| l.price == Some(exit));
        if !hits_level {
            errors.push(
                "Exit Price must match at least one Stop Loss or Take Profit level.".into(),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::ValidationError(errors.join(" ")))
    }
}

/// Check a backtest note before it is submitted.
pub fn validate_backtest(backtest: &Backtest) -> Result<(), CoreError> {
    let mut errors: Vec<String> = Vec::new();

    if bucketing::parse_date(&backtest.date).is_none() {
        errors.push("Date is required and must be a valid calendar date.".into());
    }
    if backtest.symbol.trim().is_empty() {
        errors.push("Symbol is required.".into());
    }
    if backtest.outcome == BacktestOutcome::Unknown {
        errors.push("Outcome must be successful, failed, or partial.".into());
    }
    if backtest.strategy_modification && backtest.modification_details.trim().is_empty() {
        errors.push("Describe the modification when strategy modification is ticked.".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::ValidationError(errors.join(" ")))
    }
}
