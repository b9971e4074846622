//! Derived progress figures: enrollment, per-module gating, and completion percentage.
//!
//! Everything here is a pure function of a `LearnerProgress` snapshot and a catalog entry.

use serde::{Deserialize, Serialize};

use crate::models::catalog::Standard;
use crate::progress::store::LearnerProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    Locked,
    Unlocked,
    Completed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleState {
    pub id: String,
    pub title: String,
    pub duration: String,
    pub is_practical: bool,
    pub status: ModuleStatus,
}

/// Per-standard view returned to the learner dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct StandardSummary {
    pub code: String,
    pub title: String,
    pub category: String,
    pub percent: u32,
    pub completed_modules: usize,
    pub total_modules: usize,
    pub modules: Vec<ModuleState>,
}

pub fn is_enrolled(progress: &LearnerProgress, code: &str) -> bool {
    progress.get(code).is_some()
}

/// Linear gating: a module unlocks once the one before it (catalog order) is completed.
/// Completion takes precedence over the lock check.
pub fn module_status(
    progress: &LearnerProgress,
    standard: &Standard,
    module_id: &str,
    module_index: usize,
) -> ModuleStatus {
    let Some(standard_progress) = progress.get(&standard.code) else {
        return ModuleStatus::Locked;
    };

    if standard_progress.is_completed(module_id) {
        return ModuleStatus::Completed;
    }

    if module_index == 0 {
        return ModuleStatus::Unlocked;
    }

    match standard.modules.get(module_index - 1) {
        Some(previous) if standard_progress.is_completed(&previous.id) => ModuleStatus::Unlocked,
        _ => ModuleStatus::Locked,
    }
}

/// `round(completed / total * 100)`; 0 for a standard with no modules.
/// Only completed ids that belong to the standard are counted.
pub fn certification_percent(progress: &LearnerProgress, standard: &Standard) -> u32 {
    let completed = completed_in_catalog(progress, standard);
    ratio_percent(completed, standard.modules.len()).unwrap_or(0)
}

/// Rounded percentage of `part` over `whole`, half rounding up. `None` when `whole` is 0.
pub fn ratio_percent(part: usize, whole: usize) -> Option<u32> {
    if whole == 0 {
        return None;
    }
    Some(((part * 200 + whole) / (2 * whole)) as u32)
}

pub fn summarize(progress: &LearnerProgress, standard: &Standard) -> StandardSummary {
    let modules = standard
        .modules
        .iter()
        .enumerate()
        .map(|(i, m)| ModuleState {
            id: m.id.clone(),
            title: m.title.clone(),
            duration: m.duration.clone(),
            is_practical: m.is_practical,
            status: module_status(progress, standard, &m.id, i),
        })
        .collect();

    StandardSummary {
        code: standard.code.clone(),
        title: standard.title.clone(),
        category: standard.category.clone(),
        percent: certification_percent(progress, standard),
        completed_modules: completed_in_catalog(progress, standard),
        total_modules: standard.modules.len(),
        modules,
    }
}

fn completed_in_catalog(progress: &LearnerProgress, standard: &Standard) -> usize {
    match progress.get(&standard.code) {
        Some(p) => standard
            .modules
            .iter()
            .filter(|m| p.is_completed(&m.id))
            .count(),
        None => 0,
    }
}
