//! CSV ingestion: maps raw gradebook rows to [`StudentRecord`]s.
//!
//! Score validation happens here at the boundary. An unparseable or
//! out-of-range score becomes a missing value, never an error, so that one
//! bad cell cannot take down a whole roster.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use crate::record::{Field, StudentRecord};

/// Parses a raw score cell into a bounded score.
///
/// Empty or whitespace-only cells, non-numeric text, and values outside
/// `[0, 100]` all map to `None`.
pub fn validate_score(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(score) if (0.0..=100.0).contains(&score) => Some(score),
        _ => None,
    }
}

/// Reads student records from any CSV source with a header row.
///
/// Column order is irrelevant; columns are matched by header name and
/// unknown headers are skipped. Text fields are trimmed.
///
/// # Errors
///
/// Returns an error if the CSV cannot be read or has no header row.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<StudentRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers().context("reading CSV header")?.clone();
    if headers.is_empty() {
        bail!("CSV input has no header row");
    }

    let columns: Vec<Option<Field>> = headers.iter().map(|h| Field::parse(h.trim())).collect();
    if columns.iter().all(Option::is_none) {
        bail!("CSV header contains no recognized gradebook columns");
    }

    let mut students = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let row = result.with_context(|| format!("reading CSV row {}", line + 2))?;

        let mut student = StudentRecord::default();
        for (field, value) in columns.iter().zip(row.iter()) {
            let Some(field) = field else { continue };
            match field {
                Field::StudentId => student.student_id = value.trim().to_string(),
                Field::LastName => student.last_name = value.trim().to_string(),
                Field::FirstName => student.first_name = value.trim().to_string(),
                Field::Section => student.section = value.trim().to_string(),
                Field::Quiz1 => student.quiz1 = validate_score(value),
                Field::Quiz2 => student.quiz2 = validate_score(value),
                Field::Quiz3 => student.quiz3 = validate_score(value),
                Field::Quiz4 => student.quiz4 = validate_score(value),
                Field::Quiz5 => student.quiz5 = validate_score(value),
                Field::Midterm => student.midterm = validate_score(value),
                Field::FinalExam => student.final_exam = validate_score(value),
                Field::AttendancePercent => student.attendance_percent = validate_score(value),
                // Derived columns in the input are recomputed downstream.
                Field::QuizAvg | Field::FinalGrade | Field::LetterGrade => {}
            }
        }

        if student.student_id.is_empty() {
            warn!(row = line + 2, "row has no student_id");
        }
        students.push(student);
    }

    debug!(count = students.len(), "CSV rows ingested");
    Ok(students)
}

/// Reads student records from a CSV file on disk.
pub fn read_csv_file<P: AsRef<Path>>(path: P) -> Result<Vec<StudentRecord>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("opening CSV file {}", path.display()))?;
    read_records(file).with_context(|| format!("parsing CSV file {}", path.display()))
}
