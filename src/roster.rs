//! Relational operators over the student roster.
//!
//! A small algebra independent of where the records came from. Every
//! operator is pure: inputs are borrowed or consumed, outputs are new
//! collections, and original relative order is preserved unless an
//! operator sorts.

use crate::config::Config;
use crate::record::{Field, StudentRecord};
use crate::transform::transform;

/// Records matching an arbitrary predicate, in their original order.
pub fn select<F>(records: &[StudentRecord], predicate: F) -> Vec<StudentRecord>
where
    F: Fn(&StudentRecord) -> bool,
{
    records.iter().filter(|r| predicate(r)).cloned().collect()
}

/// Restricts records to the named fields; every other field is reset to
/// its missing/empty value. Unknown field names are silently ignored.
pub fn project(records: &[StudentRecord], fields: &[&str]) -> Vec<StudentRecord> {
    let keep: Vec<Field> = fields.iter().filter_map(|name| Field::parse(name)).collect();

    records
        .iter()
        .map(|record| {
            let mut out = StudentRecord::default();
            for field in &keep {
                match field {
                    Field::StudentId => out.student_id = record.student_id.clone(),
                    Field::LastName => out.last_name = record.last_name.clone(),
                    Field::FirstName => out.first_name = record.first_name.clone(),
                    Field::Section => out.section = record.section.clone(),
                    Field::Quiz1 => out.quiz1 = record.quiz1,
                    Field::Quiz2 => out.quiz2 = record.quiz2,
                    Field::Quiz3 => out.quiz3 = record.quiz3,
                    Field::Quiz4 => out.quiz4 = record.quiz4,
                    Field::Quiz5 => out.quiz5 = record.quiz5,
                    Field::Midterm => out.midterm = record.midterm,
                    Field::FinalExam => out.final_exam = record.final_exam,
                    Field::AttendancePercent => out.attendance_percent = record.attendance_percent,
                    Field::QuizAvg => out.quiz_avg = record.quiz_avg,
                    Field::FinalGrade => out.final_grade = record.final_grade,
                    Field::LetterGrade => out.letter_grade = record.letter_grade,
                }
            }
            out
        })
        .collect()
}

/// Stable sort on one field. Records missing the key sort after all
/// present values in both directions; ties keep original relative order.
pub fn sort_by_field(
    records: &[StudentRecord],
    field: Field,
    descending: bool,
) -> Vec<StudentRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| field.compare(a, b, descending));
    sorted
}

/// Appends one record and re-transforms the whole collection, so any
/// collection returned here has fully consistent derived fields.
pub fn insert_one(
    records: Vec<StudentRecord>,
    new_record: StudentRecord,
    config: &Config,
) -> Vec<StudentRecord> {
    let mut records = records;
    records.push(new_record);
    transform(records, config)
}

/// Appends a batch of records and re-transforms the whole collection.
pub fn insert_bulk(
    records: Vec<StudentRecord>,
    new_records: Vec<StudentRecord>,
    config: &Config,
) -> Vec<StudentRecord> {
    let mut records = records;
    records.extend(new_records);
    transform(records, config)
}

/// Removes the first record with the given id. Zero matches returns the
/// collection unchanged.
pub fn delete_by_id(records: Vec<StudentRecord>, id: &str) -> Vec<StudentRecord> {
    let mut records = records;
    if let Some(pos) = records.iter().position(|r| r.student_id == id) {
        records.remove(pos);
    }
    records
}

/// The `n` highest final grades among records that have one, descending,
/// ties broken by original order.
pub fn top_n(records: &[StudentRecord], n: usize) -> Vec<StudentRecord> {
    let graded = select(records, |r| r.final_grade.is_some());
    let mut sorted = sort_by_field(&graded, Field::FinalGrade, true);
    sorted.truncate(n);
    sorted
}

/// Records with a defined final grade below `threshold`, ascending by
/// grade. This is the at-risk query when `threshold` comes from config.
pub fn below_threshold(records: &[StudentRecord], threshold: f64) -> Vec<StudentRecord> {
    let matching = select(records, |r| {
        r.final_grade.is_some_and(|g| g < threshold)
    });
    sort_by_field(&matching, Field::FinalGrade, false)
}
