use serde::{Deserialize, Serialize};

const BASE_XP: u64 = 100;
const XP_STEP: u64 = 25;

/// Level summary derived from a total amount of experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelingInfo {
    pub total_xp: u64,
    pub level: u64,
    /// Experience earned inside the current level.
    pub xp: u64,
    pub xp_remaining: u64,
    pub xp_for_next_level: u64,
}

/// XP needed to go from level `n` to level `n + 1`.
///
/// Level 1 => 2 takes 100, 2 => 3 takes 125, 3 => 4 takes 150, ...
#[must_use]
pub fn xp_required_at_level(n: u64) -> u64 {
    BASE_XP.saturating_add(XP_STEP.saturating_mul(n.saturating_sub(1)))
}

/// Minimum total XP at which `level` is reached.
///
/// Sum of `xp_required_at_level(1..level)`, which folds into
/// `25 * (level - 1) * (level + 6) / 2`. Wide enough that the level after the
/// one reached at `u64::MAX` still has a threshold above it.
#[must_use]
pub fn level_to_xp(level: u64) -> u128 {
    cumulative_xp(level)
}

/// Level reached with `xp` total experience.
#[must_use]
pub fn xp_to_level(xp: u64) -> u64 {
    // Root of `level^2 + 5 level - 6 - xp / 12.5 = 0`.
    let discriminant = (49.0 + 8.0 * xp as f64 / 25.0).sqrt();
    let mut level = (((discriminant - 5.0) / 2.0).floor() as u64).max(1);

    // The float estimate can land one off near large boundaries.
    let xp = u128::from(xp);
    while level > 1 && cumulative_xp(level) > xp {
        level -= 1;
    }
    while cumulative_xp(level + 1) <= xp {
        level += 1;
    }
    level
}

#[must_use]
pub fn get_level(total_xp: u64) -> LevelingInfo {
    let level = xp_to_level(total_xp);
    // `xp_to_level` keeps the threshold at or below `total_xp`.
    let floor = u64::try_from(level_to_xp(level)).unwrap_or(total_xp);
    let xp = total_xp - floor;
    let xp_for_next_level = xp_required_at_level(level);
    LevelingInfo {
        total_xp,
        level,
        xp,
        xp_remaining: xp_for_next_level - xp,
        xp_for_next_level,
    }
}

fn cumulative_xp(level: u64) -> u128 {
    let level = u128::from(level.max(1));
    u128::from(XP_STEP) * (level - 1) * (level + 6) / 2
}
