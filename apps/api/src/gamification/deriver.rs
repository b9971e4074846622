use chrono::NaiveDate;
use serde::Serialize;

use crate::gamification::badges::{aggregates, derive_badges, Badge};
use crate::progress::store::LearnerProgress;

pub const XP_PER_MODULE: u64 = 100;
pub const XP_PER_LEVEL: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelInfo {
    pub xp: u64,
    pub level: u64,
    pub xp_to_next_level: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GamificationSummary {
    pub total_completed_modules: usize,
    pub certified_standards: usize,
    pub current_streak: u32,
    #[serde(flatten)]
    pub level: LevelInfo,
    pub unlocked_badges: usize,
    pub badges: Vec<Badge>,
}

/// Flat XP curve: every level costs the same 500 XP.
pub fn level_for_xp(xp: u64) -> LevelInfo {
    LevelInfo {
        xp,
        level: xp / XP_PER_LEVEL + 1,
        xp_to_next_level: XP_PER_LEVEL - xp % XP_PER_LEVEL,
    }
}

pub fn derive_summary(progress: &LearnerProgress, today: NaiveDate) -> GamificationSummary {
    let agg = aggregates(progress, today);
    let badges = derive_badges(progress, today);
    let xp = agg.total_completed as u64 * XP_PER_MODULE;

    GamificationSummary {
        total_completed_modules: agg.total_completed,
        certified_standards: agg.certified_standards,
        current_streak: agg.current_streak,
        level: level_for_xp(xp),
        unlocked_badges: badges.iter().filter(|b| b.unlocked).count(),
        badges,
    }
}
