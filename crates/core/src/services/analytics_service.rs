use std::collections::HashMap;

use crate::models::analytics::{Bucket, OverallStats, RecentDay};
use crate::models::period::{DatedTrade, Timeframe};
use crate::models::trade::{Trade, TradeResult};
use crate::services::bucketing;
use crate::services::grading;
use crate::services::math::percent;

/// Computes trade analytics: overall stats, per-period buckets, drill-downs.
///
/// Pure business logic, no I/O. Every method is total: empty input gives
/// `None` or an empty `Vec`, never an error.
pub struct AnalyticsService;

/// Running counts for one group of trades.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    trades: usize,
    wins: usize,
    losses: usize,
    breakeven: usize,
    pnl: f64,
}

impl Tally {
    fn add(&mut self, trade: &Trade) {
        self.trades += 1;
        match trade.result {
            TradeResult::Win => self.wins += 1,
            TradeResult::Loss => self.losses += 1,
            TradeResult::Breakeven => self.breakeven += 1,
            TradeResult::Pending | TradeResult::Unknown => {}
        }
        self.pnl += trade.pnl;
    }

    fn into_bucket(self, key: String, label: String) -> Bucket {
        Bucket {
            key,
            label,
            trades: self.trades,
            wins: self.wins,
            losses: self.losses,
            breakeven: self.breakeven,
            pnl: self.pnl,
        }
    }
}

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Attach period keys to every trade with a parseable date and order them
    /// oldest first. Trades whose date does not parse are dropped.
    pub fn normalize(&self, trades: Vec<Trade>) -> Vec<DatedTrade> {
        let mut dated: Vec<DatedTrade> = trades
            .into_iter()
            .filter_map(|trade| {
                let keys = bucketing::period_keys(&trade.date)?;
                Some(DatedTrade { trade, keys })
            })
            .collect();
        dated.sort_by_key(|t| t.keys.date);
        dated
    }

    /// Whole-dataset summary, `None` for no trades.
    ///
    /// PnL is summed over every trade. Win/loss/breakeven, emotional and
    /// early-TP rates are over finished trades; the missed rate is over all.
    pub fn overall_stats<'a>(
        &self,
        trades: impl IntoIterator<Item = &'a Trade>,
    ) -> Option<OverallStats> {
        let mut tally = Tally::default();
        let mut emotional = 0;
        let mut early_tp = 0;
        let mut missed = 0;

        for trade in trades {
            tally.add(trade);
            if trade.result.is_finished() {
                emotional += usize::from(trade.emotional_trade);
                early_tp += usize::from(trade.took_profit_early);
            }
            missed += usize::from(trade.missed_trade);
        }

        if tally.trades == 0 {
            return None;
        }

        let finished = tally.wins + tally.losses + tally.breakeven;
        let win_rate = percent(tally.wins, finished);
        let emotional_rate = percent(emotional, finished);

        Some(OverallStats {
            total_trades: tally.trades,
            finished_trades: finished,
            wins: tally.wins,
            losses: tally.losses,
            breakeven: tally.breakeven,
            win_rate,
            loss_rate: percent(tally.losses, finished),
            breakeven_rate: percent(tally.breakeven, finished),
            total_pnl: tally.pnl,
            emotional_count: emotional,
            emotional_rate,
            early_tp_count: early_tp,
            early_tp_rate: percent(early_tp, finished),
            missed_count: missed,
            missed_rate: percent(missed, tally.trades),
            grade: grading::grade(win_rate, emotional_rate, tally.pnl),
            profitable: tally.pnl > 0.0,
        })
    }

    /// One bucket per period key, oldest first.
    pub fn buckets(&self, trades: &[DatedTrade], timeframe: Timeframe) -> Vec<Bucket> {
        let mut tallies: HashMap<&str, Tally> = HashMap::new();
        for dated in trades {
            tallies
                .entry(dated.keys.key(timeframe))
                .or_default()
                .add(&dated.trade);
        }

        let mut buckets: Vec<Bucket> = tallies
            .into_iter()
            .map(|(key, tally)| tally.into_bucket(key.to_string(), bucketing::label(timeframe, key)))
            .collect();
        buckets.sort_by(|a, b| bucketing::compare_keys(&a.key, &b.key));
        buckets
    }

    /// A single bucket, for drilling into one period.
    pub fn bucket(&self, trades: &[DatedTrade], timeframe: Timeframe, key: &str) -> Option<Bucket> {
        let mut tally = Tally::default();
        for dated in trades.iter().filter(|t| t.keys.key(timeframe) == key) {
            tally.add(&dated.trade);
        }
        (tally.trades > 0)
            .then(|| tally.into_bucket(key.to_string(), bucketing::label(timeframe, key)))
    }

    /// The last `days` trading days (days with at least one trade), newest first.
    pub fn recent_days(&self, trades: &[DatedTrade], days: usize) -> Vec<RecentDay> {
        let daily = self.buckets(trades, Timeframe::Daily);
        let skip = daily.len().saturating_sub(days);
        daily
            .into_iter()
            .skip(skip)
            .rev()
            .map(|bucket| RecentDay {
                weekday: bucketing::weekday_name(&bucket.key),
                bucket,
            })
            .collect()
    }

    /// Trades of one day, latest entry time first.
    pub fn trades_on_day<'a>(&self, trades: &'a [DatedTrade], day_key: &str) -> Vec<&'a Trade> {
        let mut day: Vec<&Trade> = trades
            .iter()
            .filter(|t| t.keys.day == day_key)
            .map(|t| &t.trade)
            .collect();
        day.sort_by(|a, b| b.time.cmp(&a.time));
        day
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
