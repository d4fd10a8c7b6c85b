use std::collections::HashMap;

use crate::models::backtest::{Backtest, BacktestOutcome};
use crate::models::breakdown::{
    BacktestSetupStats, BacktestStats, IctFlagStats, ModificationGroup, SetupStats,
};
use crate::models::trade::{Trade, TradeResult};
use crate::services::math::percent;

/// Group label for records with a blank ICT setup.
pub const UNSPECIFIED_SETUP: &str = "Unspecified";

/// Categorical breakdowns: per ICT setup, per strategy tag, per
/// modification status.
///
/// Grouped results are sorted by group size, largest first; equal sizes keep
/// the order in which the groups first appeared.
pub struct BreakdownService;

/// Insertion-ordered grouping.
struct Groups<T> {
    index: HashMap<String, usize>,
    rows: Vec<T>,
}

impl<T> Groups<T> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            rows: Vec::new(),
        }
    }

    fn entry(&mut self, key: &str, make: impl FnOnce() -> T) -> &mut T {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.rows.push(make());
                self.index.insert(key.to_string(), self.rows.len() - 1);
                self.rows.len() - 1
            }
        };
        &mut self.rows[idx]
    }
}

fn setup_label(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNSPECIFIED_SETUP
    } else {
        trimmed
    }
}

impl BreakdownService {
    pub fn new() -> Self {
        Self
    }

    /// Win/loss counts per ICT setup. Rates use the group total (pending
    /// trades included) as denominator.
    pub fn setup_stats<'a>(&self, trades: impl IntoIterator<Item = &'a Trade>) -> Vec<SetupStats> {
        let mut groups: Groups<SetupStats> = Groups::new();
        for trade in trades {
            let setup = setup_label(&trade.ict_setup);
            let row = groups.entry(setup, || SetupStats {
                setup: setup.to_string(),
                total: 0,
                wins: 0,
                losses: 0,
                breakeven: 0,
                win_rate: 0.0,
                loss_rate: 0.0,
            });
            row.total += 1;
            match trade.result {
                TradeResult::Win => row.wins += 1,
                TradeResult::Loss => row.losses += 1,
                TradeResult::Breakeven => row.breakeven += 1,
                TradeResult::Pending | TradeResult::Unknown => {}
            }
        }

        let mut rows = groups.rows;
        for row in &mut rows {
            row.win_rate = percent(row.wins, row.total);
            row.loss_rate = percent(row.losses, row.total);
        }
        rows.sort_by(|a, b| b.total.cmp(&a.total));
        rows
    }

    /// Usage of the strategy-tag checkboxes, `None` for no trades.
    pub fn flag_stats<'a>(&self, trades: impl IntoIterator<Item = &'a Trade>) -> Option<IctFlagStats> {
        let (mut total, mut ifvg, mut ob, mut ls, mut breaker, mut mb) = (0, 0, 0, 0, 0, 0);
        for trade in trades {
            total += 1;
            ifvg += usize::from(trade.ifvg_used);
            ob += usize::from(trade.ob_used);
            ls += usize::from(trade.liquidity_sweep_used);
            breaker += usize::from(trade.breaker_used);
            mb += usize::from(trade.mitigation_block_used);
        }
        if total == 0 {
            return None;
        }

        Some(IctFlagStats {
            total,
            ifvg,
            ob,
            liquidity_sweep: ls,
            breaker,
            mitigation_block: mb,
            ifvg_rate: percent(ifvg, total),
            ob_rate: percent(ob, total),
            liquidity_sweep_rate: percent(ls, total),
            breaker_rate: percent(breaker, total),
            mitigation_block_rate: percent(mb, total),
        })
    }

    /// Backtest summary with modification analysis, `None` for no backtests.
    ///
    /// The modified / not-modified success rates only look at successes and
    /// failures; partials sit out of that comparison.
    pub fn backtest_stats(&self, backtests: &[Backtest]) -> Option<BacktestStats> {
        if backtests.is_empty() {
            return None;
        }
        let total = backtests.len();

        let count = |outcome: BacktestOutcome, modified: Option<bool>| {
            backtests
                .iter()
                .filter(|b| b.outcome == outcome)
                .filter(|b| modified.map_or(true, |m| b.strategy_modification == m))
                .count()
        };

        let successes = count(BacktestOutcome::Successful, None);
        let fails = count(BacktestOutcome::Failed, None);
        let partials = count(BacktestOutcome::Partial, None);
        let modified_wins = count(BacktestOutcome::Successful, Some(true));
        let modified_fails = count(BacktestOutcome::Failed, Some(true));
        let unmodified_wins = count(BacktestOutcome::Successful, Some(false));
        let unmodified_fails = count(BacktestOutcome::Failed, Some(false));

        Some(BacktestStats {
            total,
            successes,
            fails,
            partials,
            success_rate: percent(successes, total),
            fail_rate: percent(fails, total),
            partial_rate: percent(partials, total),
            modified_count: backtests.iter().filter(|b| b.strategy_modification).count(),
            modified_wins,
            modified_fails,
            unmodified_wins,
            unmodified_fails,
            modified_success_rate: percent(modified_wins, modified_wins + modified_fails),
            unmodified_success_rate: percent(unmodified_wins, unmodified_wins + unmodified_fails),
            could_have_modified: unmodified_fails,
            setups: self.backtest_setup_stats(backtests),
        })
    }

    /// Per-setup backtest results, most-tested setup first.
    pub fn backtest_setup_stats(&self, backtests: &[Backtest]) -> Vec<BacktestSetupStats> {
        let mut groups: Groups<BacktestSetupStats> = Groups::new();
        for bt in backtests {
            let setup = setup_label(&bt.ict_setup);
            let row = groups.entry(setup, || BacktestSetupStats {
                ict_setup: setup.to_string(),
                total: 0,
                successful: 0,
                failed: 0,
                partial: 0,
                modified_count: 0,
                modified_wins: 0,
                success_rate: 0.0,
                modified_win_rate: 0.0,
            });
            row.total += 1;
            match bt.outcome {
                BacktestOutcome::Successful => row.successful += 1,
                BacktestOutcome::Failed => row.failed += 1,
                BacktestOutcome::Partial => row.partial += 1,
                BacktestOutcome::Unknown => {}
            }
            if bt.strategy_modification {
                row.modified_count += 1;
                if bt.outcome == BacktestOutcome::Successful {
                    row.modified_wins += 1;
                }
            }
        }

        let mut rows = groups.rows;
        for row in &mut rows {
            row.success_rate = percent(row.successful, row.total);
            row.modified_win_rate = percent(row.modified_wins, row.modified_count);
        }
        rows.sort_by(|a, b| b.total.cmp(&a.total));
        rows
    }

    /// Backtests split into `Modified` / `Unmodified`, larger group first.
    /// Empty groups are omitted.
    pub fn modification_breakdown(&self, backtests: &[Backtest]) -> Vec<ModificationGroup> {
        let mut groups: Groups<ModificationGroup> = Groups::new();
        for bt in backtests {
            let modified = bt.strategy_modification;
            let label = if modified { "Modified" } else { "Unmodified" };
            let row = groups.entry(label, || ModificationGroup {
                label: label.to_string(),
                modified,
                total: 0,
                successful: 0,
                failed: 0,
                partial: 0,
                success_rate: 0.0,
            });
            row.total += 1;
            match bt.outcome {
                BacktestOutcome::Successful => row.successful += 1,
                BacktestOutcome::Failed => row.failed += 1,
                BacktestOutcome::Partial => row.partial += 1,
                BacktestOutcome::Unknown => {}
            }
        }

        let mut rows = groups.rows;
        for row in &mut rows {
            row.success_rate = percent(row.successful, row.total);
        }
        rows.sort_by(|a, b| b.total.cmp(&a.total));
        rows
    }
}

impl Default for BreakdownService {
    fn default() -> Self {
        Self::new()
    }
}
