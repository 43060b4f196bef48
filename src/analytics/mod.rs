//! Descriptive statistics, outlier detection, and section comparison over
//! transformed rosters.
//!
//! Everything here only reads records. Functions that need a minimum
//! sample return a documented empty result instead of failing.

pub mod outliers;
pub mod sections;
pub mod summary;

use crate::record::{Field, StudentRecord};

/// Defined final grades in roster order, the usual input for the
/// statistics functions.
pub fn final_grades(records: &[StudentRecord]) -> Vec<f64> {
    records.iter().filter_map(|r| r.final_grade).collect()
}

/// Mean score per quiz over the students who took it. Quizzes nobody took
/// are omitted.
pub fn quiz_means(records: &[StudentRecord]) -> Vec<(Field, f64)> {
    let quiz_fields = [Field::Quiz1, Field::Quiz2, Field::Quiz3, Field::Quiz4, Field::Quiz5];

    quiz_fields
        .into_iter()
        .enumerate()
        .filter_map(|(i, field)| {
            let scores: Vec<f64> = records.iter().filter_map(|r| r.quizzes()[i]).collect();
            if scores.is_empty() {
                None
            } else {
                Some((field, scores.iter().sum::<f64>() / scores.len() as f64))
            }
        })
        .collect()
}
