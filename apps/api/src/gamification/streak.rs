use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::progress::store::LearnerProgress;

/// UTC calendar days on which at least one module completion was recorded.
pub fn completion_days(progress: &LearnerProgress) -> BTreeSet<NaiveDate> {
    progress
        .completions()
        .into_iter()
        .map(|c| c.completed_at.date_naive())
        .collect()
}

/// Consecutive active days ending today or yesterday. 0 once a day is missed.
pub fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    if days.contains(&today) {
        return run_ending_at(days, today);
    }
    match today.pred_opt() {
        Some(yesterday) if days.contains(&yesterday) => run_ending_at(days, yesterday),
        _ => 0,
    }
}

/// Length of the unbroken run of active days that ends on `day`.
pub fn run_ending_at(days: &BTreeSet<NaiveDate>, day: NaiveDate) -> u32 {
    let mut length = 0;
    let mut cursor = Some(day);
    while let Some(d) = cursor {
        if !days.contains(&d) {
            break;
        }
        length += 1;
        cursor = d.pred_opt();
    }
    length
}
