//! Scoring module - line clear points, level progression and gravity speed
//!
//! All functions are pure. Scores use the classic table multiplied by
//! `level + 1`, where `level` is the level *before* the clear that earned them.

use crate::types::{
    BASE_DROP_MS, DROP_INTERVAL_OFFSET_MS, LINES_PER_LEVEL, LINE_SCORES, SOFT_DROP_DIVISOR,
};

/// Points for clearing `lines` rows at `level`
///
/// Anything outside 0..=4 lines scores nothing.
///
/// # Examples
///
/// ```
/// use tetra_quest_core::scoring::score_delta;
///
/// assert_eq!(score_delta(1, 0), 40);
/// assert_eq!(score_delta(4, 2), 3600);
/// assert_eq!(score_delta(5, 0), 0);
/// ```
pub fn score_delta(lines: u32, level: u32) -> u32 {
    match LINE_SCORES.get(lines as usize) {
        Some(&base) => base.saturating_mul(level.saturating_add(1)),
        None => 0,
    }
}

/// Level management
/// Level increases every 10 lines cleared
pub fn level_of(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL
}

/// Gravity interval for a level (in milliseconds)
///
/// `1000 / (level + 1) + 200`, floored. Approaches 200ms but never reaches it.
pub fn drop_interval_ms(level: u32) -> u32 {
    BASE_DROP_MS / level.saturating_add(1) + DROP_INTERVAL_OFFSET_MS
}

/// One-shot gravity interval scheduled after a soft drop
pub fn soft_drop_interval_ms(level: u32) -> u32 {
    (drop_interval_ms(level) / SOFT_DROP_DIVISOR).max(1)
}
