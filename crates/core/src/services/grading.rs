use crate::models::analytics::{FocusHint, Grade, OverallStats};

/// Letter grade for a period.
///
/// Rules are checked in order and the first match wins; thresholds are
/// inclusive. Non-finite rates count as 0.
///
/// | Grade | win rate | emotional rate | PnL |
/// |-------|----------|----------------|-----|
/// | A     | ≥ 65     | ≤ 20           | > 0 |
/// | B     | ≥ 55     | ≤ 30           | > 0 |
/// | C     | ≥ 50     | ≤ 40           |     |
/// | D     | ≥ 40     |                |     |
/// | F     | otherwise                       |
pub fn grade(win_rate: f64, emotional_rate: f64, total_pnl: f64) -> Grade {
    let wr = finite_or_zero(win_rate);
    let er = finite_or_zero(emotional_rate);
    let profitable = total_pnl > 0.0;

    if wr >= 65.0 && er <= 20.0 && profitable {
        Grade::A
    } else if wr >= 55.0 && er <= 30.0 && profitable {
        Grade::B
    } else if wr >= 50.0 && er <= 40.0 {
        Grade::C
    } else if wr >= 40.0 {
        Grade::D
    } else {
        Grade::F
    }
}

/// The single behavior to work on, by priority: emotions, then cutting
/// winners early, then missed trades.
pub fn focus_hint(stats: &OverallStats) -> FocusHint {
    if stats.emotional_rate > 30.0 {
        FocusHint::ControlEmotions
    } else if stats.early_tp_rate > 25.0 {
        FocusHint::LetWinnersRun
    } else if stats.missed_rate > 20.0 {
        FocusHint::ReviewMissedTrades
    } else {
        FocusHint::OnTrack
    }
}

fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}
