//! CSV persistence for student records.
//!
//! Supports appending single rows to a running file and exporting whole
//! rosters. Exported numeric cells are rounded to two decimals; a record
//! with no letter grade exports the cell as `N/A`.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::record::StudentRecord;

/// The flat row shape written to CSV exports.
#[derive(Debug, Serialize)]
struct ExportRow {
    student_id: String,
    last_name: String,
    first_name: String,
    section: String,
    quiz1: Option<f64>,
    quiz2: Option<f64>,
    quiz3: Option<f64>,
    quiz4: Option<f64>,
    quiz5: Option<f64>,
    quiz_avg: Option<f64>,
    midterm: Option<f64>,
    #[serde(rename = "final")]
    final_exam: Option<f64>,
    attendance_percent: Option<f64>,
    final_grade: Option<f64>,
    letter_grade: String,
}

fn round2(value: Option<f64>) -> Option<f64> {
    value.map(|v| (v * 100.0).round() / 100.0)
}

impl From<&StudentRecord> for ExportRow {
    fn from(r: &StudentRecord) -> Self {
        ExportRow {
            student_id: r.student_id.clone(),
            last_name: r.last_name.clone(),
            first_name: r.first_name.clone(),
            section: r.section.clone(),
            quiz1: round2(r.quiz1),
            quiz2: round2(r.quiz2),
            quiz3: round2(r.quiz3),
            quiz4: round2(r.quiz4),
            quiz5: round2(r.quiz5),
            quiz_avg: round2(r.quiz_avg),
            midterm: round2(r.midterm),
            final_exam: round2(r.final_exam),
            attendance_percent: round2(r.attendance_percent),
            final_grade: round2(r.final_grade),
            letter_grade: r
                .letter_grade
                .map(|l| l.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

/// Appends one record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &StudentRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(ExportRow::from(record))?;
    writer.flush()?;

    Ok(())
}

/// Writes a full roster to a new CSV file, one row per record.
pub fn export_records<P: AsRef<Path>>(path: P, records: &[StudentRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV file {}", path.display()))?;

    for record in records {
        writer.serialize(ExportRow::from(record))?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = records.len(), "CSV export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::LetterGrade;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_record() -> StudentRecord {
        StudentRecord {
            student_id: "S001".to_string(),
            last_name: "Smith".to_string(),
            first_name: "Jane".to_string(),
            section: "A".to_string(),
            final_grade: Some(91.0061),
            letter_grade: Some(LetterGrade::A),
            ..Default::default()
        }
    }

    #[test]
    fn test_append_record_creates_file() {
        let path = temp_path("gradebook_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_record(&path, &sample_record()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("S001"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("gradebook_test_header.csv");
        let _ = fs::remove_file(&path);

        append_record(&path, &sample_record()).unwrap();
        append_record(&path, &sample_record()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("student_id")).count();
        assert_eq!(header_count, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_export_rounds_and_marks_na() {
        let path = temp_path("gradebook_test_export.csv");
        let _ = fs::remove_file(&path);

        let mut ungraded = sample_record();
        ungraded.final_grade = None;
        ungraded.letter_grade = None;

        export_records(&path, &[sample_record(), ungraded]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("91.01"));
        assert!(content.contains("N/A"));

        fs::remove_file(&path).unwrap();
    }
}
