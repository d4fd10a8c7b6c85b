use serde::{Deserialize, Serialize};

/// Win statistics for one ICT setup across journaled trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupStats {
    pub setup: String,
    pub total: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
    /// wins / total × 100
    pub win_rate: f64,
    /// losses / total × 100
    pub loss_rate: f64,
}

/// How often each strategy-tag checkbox was ticked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IctFlagStats {
    pub total: usize,
    pub ifvg: usize,
    pub ob: usize,
    pub liquidity_sweep: usize,
    pub breaker: usize,
    pub mitigation_block: usize,
    pub ifvg_rate: f64,
    pub ob_rate: f64,
    pub liquidity_sweep_rate: f64,
    pub breaker_rate: f64,
    pub mitigation_block_rate: f64,
}

/// Per-setup backtest results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSetupStats {
    pub ict_setup: String,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub partial: usize,
    pub modified_count: usize,
    pub modified_wins: usize,
    /// successful / total × 100
    pub success_rate: f64,
    /// modified_wins / modified_count × 100
    pub modified_win_rate: f64,
}

/// Backtests grouped by whether the model was modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationGroup {
    /// `Modified` or `Unmodified`
    pub label: String,
    pub modified: bool,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub partial: usize,
    /// successful / total × 100
    pub success_rate: f64,
}

/// Whole-dataset backtest summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestStats {
    pub total: usize,
    pub successes: usize,
    pub fails: usize,
    pub partials: usize,
    pub success_rate: f64,
    pub fail_rate: f64,
    pub partial_rate: f64,

    pub modified_count: usize,
    pub modified_wins: usize,
    pub modified_fails: usize,
    pub unmodified_wins: usize,
    pub unmodified_fails: usize,
    /// modified_wins / (modified_wins + modified_fails) × 100
    pub modified_success_rate: f64,
    /// unmodified_wins / (unmodified_wins + unmodified_fails) × 100
    pub unmodified_success_rate: f64,
    /// Failures where the model was left as-is; a tweak might have saved them.
    pub could_have_modified: usize,

    /// Sorted by total, most-tested first
    pub setups: Vec<BacktestSetupStats>,
}
