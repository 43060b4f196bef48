//! The grade transformer: derives `quiz_avg`, `final_grade`, and
//! `letter_grade` for every record.
//!
//! Missing scores propagate: an absent component makes the dependent
//! derived field absent, never zero. Weights are applied exactly as
//! configured, without normalization.

use crate::config::{Config, GradeScale, Weights};
use crate::record::{LetterGrade, StudentRecord};

/// Weighted final grade, or `None` if any component is missing.
///
/// All four components are required; there is no partial credit for a
/// partially complete record.
pub fn compute_final(
    quiz_avg: Option<f64>,
    midterm: Option<f64>,
    final_exam: Option<f64>,
    attendance: Option<f64>,
    weights: &Weights,
) -> Option<f64> {
    let (quiz_avg, midterm, final_exam, attendance) =
        (quiz_avg?, midterm?, final_exam?, attendance?);

    Some(
        quiz_avg * weights.quizzes
            + midterm * weights.midterm
            + final_exam * weights.final_exam
            + attendance * weights.attendance,
    )
}

/// Maps a final grade onto the configured scale, highest bound first and
/// boundary-inclusive. Below the D bound grades F; a missing final grade
/// has no letter grade.
pub fn letter_for(final_grade: Option<f64>, scale: &GradeScale) -> Option<LetterGrade> {
    let grade = final_grade?;
    Some(match grade {
        g if g >= scale.a => LetterGrade::A,
        g if g >= scale.b => LetterGrade::B,
        g if g >= scale.c => LetterGrade::C,
        g if g >= scale.d => LetterGrade::D,
        _ => LetterGrade::F,
    })
}

/// Mean of the present quiz scores, `None` when all five are missing.
fn quiz_average(record: &StudentRecord) -> Option<f64> {
    let present: Vec<f64> = record.quizzes().into_iter().flatten().collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64)
}

/// Recomputes all derived fields on a single record.
pub fn transform_record(mut record: StudentRecord, config: &Config) -> StudentRecord {
    record.quiz_avg = quiz_average(&record);
    record.final_grade = compute_final(
        record.quiz_avg,
        record.midterm,
        record.final_exam,
        record.attendance_percent,
        &config.weights,
    );
    record.letter_grade = letter_for(record.final_grade, &config.grade_scale);
    record
}

/// Recomputes derived fields for every record, superseding any prior
/// derived values. Pure: the input collection is consumed and a fully
/// consistent one returned.
pub fn transform(records: Vec<StudentRecord>, config: &Config) -> Vec<StudentRecord> {
    records
        .into_iter()
        .map(|r| transform_record(r, config))
        .collect()
}
