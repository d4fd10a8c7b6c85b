use crate::errors::CoreError;
use crate::models::draft::{RiskEstimate, TradeDraft};
use crate::models::trade::Direction;
use crate::services::math::round2;

/// Realised PnL of a futures position, rounded to cents.
///
/// `None` when any input is missing/non-finite or when contracts or the
/// point value are not positive; the form then keeps whatever PnL was typed.
pub fn compute_pnl(
    entry: Option<f64>,
    exit: Option<f64>,
    direction: Direction,
    contracts: Option<f64>,
    point_value: Option<f64>,
) -> Option<f64> {
    let (entry, exit, contracts, point_value) = (
        finite(entry)?,
        finite(exit)?,
        finite(contracts)?,
        finite(point_value)?,
    );
    if contracts <= 0.0 || point_value <= 0.0 {
        return None;
    }
    Some(round2((exit - entry) * direction.sign() * point_value * contracts))
}

/// Dollar and percentage risk between entry and the first stop.
pub fn estimate_risk(
    entry: Option<f64>,
    first_stop: Option<f64>,
    account_balance: Option<f64>,
    contracts: Option<f64>,
    point_value: Option<f64>,
) -> Result<RiskEstimate, CoreError> {
    let missing = || {
        CoreError::ValidationError(
            "Entry, first Stop, Account Balance, Contracts, and Point Value are all required to calculate Risk %"
                .into(),
        )
    };
    let entry = finite(entry).ok_or_else(missing)?;
    let stop = finite(first_stop).ok_or_else(missing)?;
    let balance = finite(account_balance).ok_or_else(missing)?;
    let contracts = finite(contracts).ok_or_else(missing)?;
    let point_value = finite(point_value).ok_or_else(missing)?;

    if balance <= 0.0 {
        return Err(CoreError::ValidationError(format!(
            "Account balance must be positive, got {balance}"
        )));
    }

    let risk_amount = (entry - stop).abs() * point_value * contracts;
    Ok(RiskEstimate {
        risk_amount,
        risk_percent: round2(risk_amount / balance * 100.0),
    })
}

/// Recompute the draft's PnL from its prices and position size.
/// Leaves the PnL untouched (and returns `None`) if it can't be derived.
pub fn refresh_draft_pnl(draft: &mut TradeDraft) -> Option<f64> {
    let pnl = compute_pnl(
        draft.trade.entry_price,
        draft.trade.exit_price,
        draft.trade.direction,
        draft.risk.contracts,
        draft.risk.point_value,
    )?;
    draft.trade.pnl = pnl;
    Some(pnl)
}

/// Estimate risk from the draft's first stop level and write the
/// percentage into `risk_percent`.
pub fn apply_risk_estimate(draft: &mut TradeDraft) -> Result<RiskEstimate, CoreError> {
    let first_stop = draft.trade.stop_levels.first().and_then(|l| l.price);
    let estimate = estimate_risk(
        draft.trade.entry_price,
        first_stop,
        draft.risk.account_balance,
        draft.risk.contracts,
        draft.risk.point_value,
    )?;
    draft.trade.risk_percent = Some(estimate.risk_percent);
    Ok(estimate)
}

fn finite(x: Option<f64>) -> Option<f64> {
    x.filter(|v| v.is_finite())
}
