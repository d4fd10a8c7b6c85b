use serde::{Deserialize, Serialize};

use crate::services::math::percent;

/// Letter grade for a trading period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

/// What the psychology card should nudge the trader about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusHint {
    /// Emotional rate above 30%
    ControlEmotions,
    /// Took-profit-early rate above 25%
    LetWinnersRun,
    /// Missed rate above 20%
    ReviewMissedTrades,
    OnTrack,
}

impl std::fmt::Display for FocusHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            FocusHint::ControlEmotions => {
                "Too much emotion in the seat — tighten rules & journaling."
            }
            FocusHint::LetWinnersRun => {
                "You're getting paid but cutting winners early. Work on letting targets hit."
            }
            FocusHint::ReviewMissedTrades => {
                "Lots of missed plays. Review alerting, schedule, and hesitation."
            }
            FocusHint::OnTrack => {
                "Nice! Emotions are somewhat under control. Keep refining entries, not chasing."
            }
        };
        f.write_str(text)
    }
}

/// Whole-dataset performance summary.
///
/// Win/loss/breakeven, emotional and early-TP rates use *finished* trades as
/// the denominator. `missed_rate` alone uses `total_trades`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_trades: usize,
    pub finished_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
    pub win_rate: f64,
    pub loss_rate: f64,
    pub breakeven_rate: f64,
    pub total_pnl: f64,
    pub emotional_count: usize,
    pub emotional_rate: f64,
    pub early_tp_count: usize,
    pub early_tp_rate: f64,
    pub missed_count: usize,
    pub missed_rate: f64,
    pub grade: Grade,
    pub profitable: bool,
}

/// Aggregate for one period key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub key: String,
    /// Display label, e.g. `01/2024` for month `2024-01`
    pub label: String,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
    pub pnl: f64,
}

impl Bucket {
    pub fn finished(&self) -> usize {
        self.wins + self.losses + self.breakeven
    }

    /// Win rate over finished trades; 0 when nothing finished.
    pub fn win_rate(&self) -> f64 {
        percent(self.wins, self.finished())
    }
}

/// A row in the recent-days table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentDay {
    pub bucket: Bucket,
    /// Short weekday name (`Mon`, `Tue`, ...)
    pub weekday: String,
}
