//! Badge table and unlock derivation.
//!
//! Each badge is an independent threshold over aggregate progress. Unlock state is
//! recomputed from the snapshot on every read; `unlocked_at` is recovered by replaying
//! the recorded completion timestamps in order.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::gamification::streak::{completion_days, current_streak, run_ending_at};
use crate::models::catalog::BadgeBenefitRow;
use crate::progress::store::LearnerProgress;

/// Completed modules in one standard that count as a certification.
pub const CERTIFICATION_MODULE_THRESHOLD: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    Progress,
    Streak,
    Certification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeRule {
    CompletedModules(usize),
    StreakDays(u32),
    CertifiedStandards(usize),
}

/// Aggregate figures the badge rules are evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressAggregates {
    pub total_completed: usize,
    pub certified_standards: usize,
    pub current_streak: u32,
}

impl BadgeRule {
    pub fn is_met(&self, agg: &ProgressAggregates) -> bool {
        match *self {
            BadgeRule::CompletedModules(n) => agg.total_completed >= n,
            BadgeRule::StreakDays(n) => agg.current_streak >= n,
            BadgeRule::CertifiedStandards(n) => agg.certified_standards >= n,
        }
    }
}

pub struct BadgeDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: BadgeCategory,
    pub rarity: Rarity,
    pub rule: BadgeRule,
}

pub const BADGE_DEFINITIONS: &[BadgeDefinition] = &[
    BadgeDefinition {
        id: "first-module",
        name: "First Step",
        description: "Complete your first module",
        icon: "footprints",
        category: BadgeCategory::Progress,
        rarity: Rarity::Common,
        rule: BadgeRule::CompletedModules(1),
    },
    BadgeDefinition {
        id: "week-streak",
        name: "Week Warrior",
        description: "Study seven days in a row",
        icon: "flame",
        category: BadgeCategory::Streak,
        rarity: Rarity::Rare,
        rule: BadgeRule::StreakDays(7),
    },
    BadgeDefinition {
        id: "speed-learner",
        name: "Speed Learner",
        description: "Complete five modules",
        icon: "zap",
        category: BadgeCategory::Progress,
        rarity: Rarity::Common,
        rule: BadgeRule::CompletedModules(5),
    },
    BadgeDefinition {
        id: "first-certification",
        name: "Certified",
        description: "Complete eight modules of a single standard",
        icon: "award",
        category: BadgeCategory::Certification,
        rarity: Rarity::Rare,
        rule: BadgeRule::CertifiedStandards(1),
    },
    BadgeDefinition {
        id: "dedication",
        name: "Dedication",
        description: "Complete fifty modules",
        icon: "mountain",
        category: BadgeCategory::Progress,
        rarity: Rarity::Epic,
        rule: BadgeRule::CompletedModules(50),
    },
    BadgeDefinition {
        id: "perfectionist",
        name: "Perfectionist",
        description: "Study thirty days in a row",
        icon: "gem",
        category: BadgeCategory::Streak,
        rarity: Rarity::Legendary,
        rule: BadgeRule::StreakDays(30),
    },
    BadgeDefinition {
        id: "scholar",
        name: "Scholar",
        description: "Reach certification level in five standards",
        icon: "graduation-cap",
        category: BadgeCategory::Certification,
        rarity: Rarity::Legendary,
        rule: BadgeRule::CertifiedStandards(5),
    },
    BadgeDefinition {
        id: "early-bird",
        name: "Early Bird",
        description: "Complete three modules",
        icon: "sunrise",
        category: BadgeCategory::Progress,
        rarity: Rarity::Common,
        rule: BadgeRule::CompletedModules(3),
    },
];

/// Typed perks attached to a badge from the `badge_benefits` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeBenefit {
    pub discount_pct: u32,
    pub premium_access_days: u32,
    pub special_features: Vec<String>,
}

impl From<&BadgeBenefitRow> for BadgeBenefit {
    fn from(row: &BadgeBenefitRow) -> Self {
        BadgeBenefit {
            discount_pct: row.discount_pct.clamp(0, 100) as u32,
            premium_access_days: row.premium_access_days.max(0) as u32,
            special_features: row.special_features.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: BadgeCategory,
    pub rarity: Rarity,
    pub unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
    pub benefit: Option<BadgeBenefit>,
}

pub fn aggregates(progress: &LearnerProgress, today: NaiveDate) -> ProgressAggregates {
    ProgressAggregates {
        total_completed: progress.total_completed(),
        certified_standards: progress
            .iter()
            .filter(|(_, p)| p.completed_count() >= CERTIFICATION_MODULE_THRESHOLD)
            .count(),
        current_streak: current_streak(&completion_days(progress), today),
    }
}

/// Evaluates every badge against the current snapshot.
///
/// `unlocked_at` is the completion at which the rule first held when the recorded
/// completions are replayed chronologically (streaks measured as of that day).
pub fn derive_badges(progress: &LearnerProgress, today: NaiveDate) -> Vec<Badge> {
    let current = aggregates(progress, today);
    let completions = progress.completions();

    let mut first_met: Vec<Option<DateTime<Utc>>> = vec![None; BADGE_DEFINITIONS.len()];
    let mut per_standard: HashMap<&str, usize> = HashMap::new();
    let mut days: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut replay = ProgressAggregates::default();

    for record in &completions {
        let count = per_standard.entry(record.standard_code).or_insert(0);
        *count += 1;
        if *count == CERTIFICATION_MODULE_THRESHOLD {
            replay.certified_standards += 1;
        }
        replay.total_completed += 1;

        let day = record.completed_at.date_naive();
        days.insert(day);
        replay.current_streak = run_ending_at(&days, day);

        for (slot, def) in first_met.iter_mut().zip(BADGE_DEFINITIONS) {
            if slot.is_none() && def.rule.is_met(&replay) {
                *slot = Some(record.completed_at);
            }
        }
    }

    let last_completion = completions.last().map(|c| c.completed_at);

    BADGE_DEFINITIONS
        .iter()
        .zip(first_met)
        .map(|(def, met_at)| {
            let unlocked = def.rule.is_met(&current);
            Badge {
                id: def.id.to_string(),
                name: def.name.to_string(),
                description: def.description.to_string(),
                icon: def.icon.to_string(),
                category: def.category,
                rarity: def.rarity,
                unlocked,
                unlocked_at: if unlocked { met_at.or(last_completion) } else { None },
                benefit: None,
            }
        })
        .collect()
}

/// Joins benefit rows onto badges by id. Badges without a row keep `None`.
pub fn attach_benefits(badges: Vec<Badge>, benefits: &[BadgeBenefitRow]) -> Vec<Badge> {
    let by_id: HashMap<&str, &BadgeBenefitRow> =
        benefits.iter().map(|b| (b.badge_id.as_str(), b)).collect();
    badges
        .into_iter()
        .map(|badge| {
            let benefit = by_id.get(badge.id.as_str()).map(|row| BadgeBenefit::from(*row));
            Badge { benefit, ..badge }
        })
        .collect()
}
