//! Scoring, leveling, and drop-speed rules

use std::time::Duration;

/// Points per cleared gem before multipliers
pub const BASE_CLEAR: u64 = 10;
/// Gems cleared per level step
pub const GEMS_PER_LEVEL: u32 = 15;
/// Auto-drop interval at level 0, shrinking per level down to the floor
pub const BASE_DROP_MS: u64 = 800;
pub const MIN_DROP_MS: u64 = 100;
pub const SPEED_STEP_MS: u64 = 40;

/// Chain multiplier: each successive cascade within one lock scores more
/// per gem than the last
pub fn chain_multiplier(depth: u32) -> u64 {
    depth as u64
}

/// Level-dependent scale applied to a resolution's total before rounding
pub fn speed_bonus(level: u32) -> f64 {
    1.0 + f64::from(level) * 0.05
}

/// Score tracking
#[derive(Debug, Clone)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level, derived from gems cleared
    pub level: u32,
    /// Total gems cleared
    pub gems_cleared: u32,
    /// Longest cascade chain achieved this game
    pub best_chain: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            gems_cleared: 0,
            best_chain: 0,
        }
    }

    /// Fold one finished resolution into the totals: update gems cleared and
    /// level first, then award the accumulated raw points scaled by the
    /// speed bonus for the new level. Returns the points awarded.
    pub fn settle_resolution(&mut self, cleared: u32, raw_points: u64, chain: u32) -> u64 {
        self.gems_cleared += cleared;
        self.level = self.gems_cleared / GEMS_PER_LEVEL + 1;
        self.best_chain = self.best_chain.max(chain);
        let awarded = (raw_points as f64 * speed_bonus(self.level)).round() as u64;
        self.points += awarded;
        awarded
    }

    /// Auto-drop interval for the current level, floored at the minimum
    pub fn drop_interval(&self) -> Duration {
        let ms = BASE_DROP_MS
            .saturating_sub(u64::from(self.level) * SPEED_STEP_MS)
            .max(MIN_DROP_MS);
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_up_every_fifteen_gems() {
        let mut score = Score::new();
        assert_eq!(score.level, 1);
        score.settle_resolution(14, 0, 1);
        assert_eq!(score.level, 1);
        score.settle_resolution(1, 0, 1);
        assert_eq!(score.level, 2);
    }

    #[test]
    fn test_speed_bonus_scales_points() {
        let mut score = Score::new();
        // 3 gems * 10 * chain 1 = 30 raw, level stays 1 -> 30 * 1.05 = 31.5
        let awarded = score.settle_resolution(3, 30, 1);
        assert_eq!(awarded, 32);
        assert_eq!(score.points, 32);
    }

    #[test]
    fn test_chain_multiplier_is_monotonic() {
        for depth in 1..20 {
            assert!(chain_multiplier(depth + 1) > chain_multiplier(depth));
        }
    }

    #[test]
    fn test_deeper_chain_beats_flat_clear() {
        // 2-deep cascade of 3 + 3 gems vs a single 6-gem clear:
        // 3*10*1 + 3*10*2 = 90 raw > 6*10*1 = 60 raw
        let cascade = 3 * BASE_CLEAR * chain_multiplier(1) + 3 * BASE_CLEAR * chain_multiplier(2);
        let flat = 6 * BASE_CLEAR * chain_multiplier(1);
        assert!(cascade > flat);
    }

    #[test]
    fn test_drop_interval_shrinks_and_floors() {
        let mut score = Score::new();
        assert_eq!(score.drop_interval(), Duration::from_millis(760));
        score.level = 10;
        assert_eq!(score.drop_interval(), Duration::from_millis(400));
        score.level = 50;
        assert_eq!(score.drop_interval(), Duration::from_millis(MIN_DROP_MS));
    }

    #[test]
    fn test_best_chain_keeps_maximum() {
        let mut score = Score::new();
        score.settle_resolution(3, 30, 2);
        score.settle_resolution(3, 30, 1);
        assert_eq!(score.best_chain, 2);
    }
}
