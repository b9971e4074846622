//! Learner progress snapshots.
//!
//! A `LearnerProgress` is immutable from the caller's point of view: `enroll`
//! and `toggle_module` return a new snapshot and leave `self` untouched, so
//! handlers can compute, persist, and only then swap in the result.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::catalog::Standard;
use crate::progress::calculator::{is_enrolled, module_status, ModuleStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("Learner is not enrolled in standard {0}")]
    NotEnrolled(String),

    #[error("Module {module_id} does not belong to standard {code}")]
    UnknownModule { code: String, module_id: String },

    #[error("Module {module_id} of standard {code} is locked until the previous module is completed")]
    ModuleLocked { code: String, module_id: String },
}

/// Progress in a single standard. Presence of this record is what "enrolled" means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardProgress {
    pub enrolled_at: DateTime<Utc>,
    /// Completed module id → instant the completion was recorded.
    #[serde(default)]
    pub completed: BTreeMap<String, DateTime<Utc>>,
}

impl StandardProgress {
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn is_completed(&self, module_id: &str) -> bool {
        self.completed.contains_key(module_id)
    }
}

/// One recorded module completion, flattened out of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRecord<'a> {
    pub standard_code: &'a str,
    pub module_id: &'a str,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearnerProgress {
    standards: BTreeMap<String, StandardProgress>,
}

impl LearnerProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code: &str) -> Option<&StandardProgress> {
        self.standards.get(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StandardProgress)> {
        self.standards.iter().map(|(code, p)| (code.as_str(), p))
    }

    /// Codes of every standard the learner is enrolled in (completed or not).
    pub fn enrolled_codes(&self) -> Vec<String> {
        self.standards.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.standards.is_empty()
    }

    pub fn is_completed(&self, code: &str, module_id: &str) -> bool {
        self.standards
            .get(code)
            .map(|p| p.is_completed(module_id))
            .unwrap_or(false)
    }

    pub fn total_completed(&self) -> usize {
        self.standards.values().map(StandardProgress::completed_count).sum()
    }

    /// All completions ordered by timestamp (ties broken by code, then module id).
    pub fn completions(&self) -> Vec<CompletionRecord<'_>> {
        let mut records: Vec<_> = self
            .standards
            .iter()
            .flat_map(|(code, p)| {
                p.completed.iter().map(move |(module_id, at)| CompletionRecord {
                    standard_code: code.as_str(),
                    module_id: module_id.as_str(),
                    completed_at: *at,
                })
            })
            .collect();
        records.sort_by(|a, b| {
            a.completed_at
                .cmp(&b.completed_at)
                .then_with(|| a.standard_code.cmp(b.standard_code))
                .then_with(|| a.module_id.cmp(b.module_id))
        });
        records
    }

    /// Returns a snapshot enrolled in `code`. Enrolling twice is a no-op.
    pub fn enroll(&self, code: &str, at: DateTime<Utc>) -> LearnerProgress {
        let mut next = self.clone();
        next.standards
            .entry(code.to_string())
            .or_insert_with(|| StandardProgress {
                enrolled_at: at,
                completed: BTreeMap::new(),
            });
        next
    }

    /// Flips the completion state of one module and returns the new snapshot.
    ///
    /// Completed modules become uncompleted. Unlocked modules become completed at `at`.
    /// Locked modules are rejected, which keeps completion in catalog order.
    pub fn toggle_module(
        &self,
        standard: &Standard,
        module_id: &str,
        at: DateTime<Utc>,
    ) -> Result<LearnerProgress, ProgressError> {
        let index = standard
            .module_index(module_id)
            .ok_or_else(|| ProgressError::UnknownModule {
                code: standard.code.clone(),
                module_id: module_id.to_string(),
            })?;

        if !is_enrolled(self, &standard.code) {
            return Err(ProgressError::NotEnrolled(standard.code.clone()));
        }

        let status = module_status(self, standard, module_id, index);
        let mut next = self.clone();
        let entry = next
            .standards
            .get_mut(&standard.code)
            .ok_or_else(|| ProgressError::NotEnrolled(standard.code.clone()))?;

        match status {
            ModuleStatus::Completed => {
                entry.completed.remove(module_id);
            }
            ModuleStatus::Unlocked => {
                entry.completed.insert(module_id.to_string(), at);
            }
            ModuleStatus::Locked => {
                return Err(ProgressError::ModuleLocked {
                    code: standard.code.clone(),
                    module_id: module_id.to_string(),
                });
            }
        }

        Ok(next)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::catalog::Module;
    use chrono::TimeZone;

    pub(crate) fn make_standard(code: &str, module_count: usize) -> Standard {
        Standard {
            code: code.to_string(),
            title: format!("Standard {code}"),
            description: String::new(),
            category: "general".to_string(),
            modules: (1..=module_count)
                .map(|i| Module {
                    id: format!("m{i}"),
                    title: format!("Module {i}"),
                    duration: "1h".to_string(),
                    is_practical: i % 2 == 0,
                })
                .collect(),
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_enroll_is_idempotent_and_keeps_first_timestamp() {
        let p = LearnerProgress::new().enroll("EC0217.01", at(1, 9));
        let again = p.enroll("EC0217.01", at(2, 9));
        assert_eq!(p, again);
        assert_eq!(again.get("EC0217.01").unwrap().enrolled_at, at(1, 9));
    }

    #[test]
    fn test_enroll_does_not_mutate_original_snapshot() {
        let original = LearnerProgress::new();
        let _ = original.enroll("EC0217.01", at(1, 9));
        assert!(original.is_empty());
    }

    #[test]
    fn test_toggle_completes_first_module() {
        let standard = make_standard("EC0217.01", 3);
        let p = LearnerProgress::new().enroll("EC0217.01", at(1, 9));
        let next = p.toggle_module(&standard, "m1", at(1, 10)).unwrap();
        assert!(next.is_completed("EC0217.01", "m1"));
        assert!(!p.is_completed("EC0217.01", "m1"));
    }

    #[test]
    fn test_toggle_twice_restores_exact_prior_state() {
        let standard = make_standard("EC0217.01", 3);
        let before = LearnerProgress::new()
            .enroll("EC0217.01", at(1, 9))
            .toggle_module(&standard, "m1", at(1, 10))
            .unwrap();
        let after = before
            .toggle_module(&standard, "m2", at(2, 10))
            .unwrap()
            .toggle_module(&standard, "m2", at(2, 11))
            .unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_toggle_rejects_locked_module() {
        let standard = make_standard("EC0217.01", 3);
        let p = LearnerProgress::new().enroll("EC0217.01", at(1, 9));
        let err = p.toggle_module(&standard, "m3", at(1, 10)).unwrap_err();
        assert_eq!(
            err,
            ProgressError::ModuleLocked {
                code: "EC0217.01".to_string(),
                module_id: "m3".to_string()
            }
        );
    }

    #[test]
    fn test_toggle_requires_enrollment() {
        let standard = make_standard("EC0217.01", 3);
        let err = LearnerProgress::new()
            .toggle_module(&standard, "m1", at(1, 10))
            .unwrap_err();
        assert_eq!(err, ProgressError::NotEnrolled("EC0217.01".to_string()));
    }

    #[test]
    fn test_toggle_unknown_module() {
        let standard = make_standard("EC0217.01", 2);
        let p = LearnerProgress::new().enroll("EC0217.01", at(1, 9));
        assert!(matches!(
            p.toggle_module(&standard, "m9", at(1, 10)),
            Err(ProgressError::UnknownModule { .. })
        ));
    }

    #[test]
    fn test_completions_sorted_chronologically() {
        let a = make_standard("EC0217.01", 2);
        let b = make_standard("EC0301", 2);
        let p = LearnerProgress::new()
            .enroll("EC0217.01", at(1, 9))
            .enroll("EC0301", at(1, 9))
            .toggle_module(&b, "m1", at(3, 8))
            .unwrap()
            .toggle_module(&a, "m1", at(2, 8))
            .unwrap();
        let order: Vec<_> = p
            .completions()
            .into_iter()
            .map(|c| c.standard_code)
            .collect();
        assert_eq!(order, vec!["EC0217.01", "EC0301"]);
        assert_eq!(p.total_completed(), 2);
    }

    #[test]
    fn test_snapshot_serializes_as_plain_map() {
        let p = LearnerProgress::new().enroll("EC0217.01", at(1, 9));
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("EC0217.01").is_some());
        let back: LearnerProgress = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
