use std::collections::{BTreeMap, HashMap};

use crate::models::chart::{EquityPoint, WeeklyPnlPoint};
use crate::models::period::DatedTrade;
use crate::services::bucketing;

/// Builds the chart series: equity curve and weekly PnL bars.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Cumulative PnL, one point per day that has trades.
    ///
    /// Day keys are zero-padded, so the `BTreeMap` order is chronological.
    /// Days without trades are skipped rather than filled.
    pub fn equity_curve(&self, trades: &[DatedTrade]) -> Vec<EquityPoint> {
        let mut by_day: BTreeMap<&str, f64> = BTreeMap::new();
        for dated in trades {
            *by_day.entry(dated.keys.day.as_str()).or_insert(0.0) += dated.trade.pnl;
        }

        let mut running = 0.0;
        by_day
            .into_iter()
            .map(|(day, day_pnl)| {
                running += day_pnl;
                EquityPoint {
                    day_key: day.to_string(),
                    label: bucketing::day_label(day),
                    day_pnl,
                    cumulative_pnl: running,
                }
            })
            .collect()
    }

    /// Net PnL per journal week, oldest week first.
    pub fn weekly_pnl(&self, trades: &[DatedTrade]) -> Vec<WeeklyPnlPoint> {
        let mut by_week: HashMap<&str, f64> = HashMap::new();
        for dated in trades {
            *by_week.entry(dated.keys.week.as_str()).or_insert(0.0) += dated.trade.pnl;
        }

        let mut points: Vec<WeeklyPnlPoint> = by_week
            .into_iter()
            .map(|(week, pnl)| WeeklyPnlPoint {
                week_key: week.to_string(),
                pnl,
            })
            .collect();
        points.sort_by(|a, b| bucketing::compare_keys(&a.week_key, &b.week_key));
        points
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
