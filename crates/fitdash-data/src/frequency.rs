//! Exercise frequency across the whole log.

use std::collections::HashMap;

use fitdash_core::models::{DayRecord, ExerciseCount};

/// Count how often each exercise appears across all workout entries.
///
/// A workout cell is a free-text comma list ("Push, Pull"). All
/// whitespace is stripped before splitting, so "Bench Press" and
/// "BenchPress" land on the same token. Results come back sorted by
/// descending count; ties keep the order the log introduced them.
pub fn exercise_frequency(records: &[DayRecord]) -> Vec<ExerciseCount> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u32> = HashMap::new();

    for record in records {
        let Some(workout) = &record.workout else {
            continue;
        };
        let despaced: String = workout.chars().filter(|c| !c.is_whitespace()).collect();
        for token in despaced.split(',') {
            if token.is_empty() {
                continue;
            }
            match counts.get_mut(token) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(token.to_string(), 1);
                    order.push(token.to_string());
                }
            }
        }
    }

    let mut rows: Vec<ExerciseCount> = order
        .into_iter()
        .map(|name| {
            let occurrences = counts.get(&name).copied().unwrap_or(0);
            ExerciseCount { name, occurrences }
        })
        .collect();
    // Stable sort, so equal counts keep their first-seen order.
    rows.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
    rows
}

// ── Tests ─────────────────────────────────────────────────────────────────────
