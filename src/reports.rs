//! Text reports and file exports over a transformed roster.
//!
//! Mirrors what instructors actually hand out: a class summary, section
//! breakdowns, an at-risk list, top performers, and per-student sheets.
//! Chart rendering is a separate consumer; this module only deals in text
//! and CSV/JSON files.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::record::{LetterGrade, StudentRecord};
use crate::roster::{below_threshold, select, sort_by_field, top_n};

const RULE: &str = "================================================================================";

fn fmt_score(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "Missing".to_string(),
    }
}

/// Generates the text reports and file exports for one roster snapshot.
pub struct ReportGenerator<'a> {
    records: &'a [StudentRecord],
    config: &'a Config,
    timestamp: String,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(records: &'a [StudentRecord], config: &'a Config) -> Self {
        ReportGenerator {
            records,
            config,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    fn graded(&self) -> Vec<StudentRecord> {
        select(self.records, |r| r.final_grade.is_some())
    }

    fn letter_counts(records: &[StudentRecord]) -> BTreeMap<LetterGrade, usize> {
        let mut counts = BTreeMap::new();
        for grade in LetterGrade::ALL {
            counts.insert(grade, 0usize);
        }
        for record in records {
            if let Some(letter) = record.letter_grade {
                *counts.entry(letter).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Overall class summary: counts, average grade, letter distribution,
    /// and the first ten at-risk students.
    pub fn summary_report(&self) -> String {
        let graded = self.graded();
        let final_grades: Vec<f64> = graded.iter().filter_map(|r| r.final_grade).collect();
        let avg_grade = if final_grades.is_empty() {
            0.0
        } else {
            final_grades.iter().sum::<f64>() / final_grades.len() as f64
        };

        let at_risk_threshold = self.config.thresholds.at_risk;
        let at_risk = below_threshold(self.records, at_risk_threshold);

        let mut out = String::new();
        let _ = writeln!(out, "STUDENT PERFORMANCE SUMMARY REPORT");
        let _ = writeln!(out, "Generated: {}", self.timestamp);
        let _ = writeln!(out);

        let _ = writeln!(out, "OVERVIEW:");
        let _ = writeln!(out, "  Total Students: {}", self.records.len());
        let _ = writeln!(out, "  Students with Complete Data: {}", graded.len());
        let _ = writeln!(
            out,
            "  Students with Missing Data: {}",
            self.records.len() - graded.len()
        );
        let _ = writeln!(out, "  Average Final Grade: {avg_grade:.2}");
        let _ = writeln!(out);

        let _ = writeln!(out, "LETTER GRADE DISTRIBUTION:");
        for (grade, count) in Self::letter_counts(&graded) {
            let percentage = if graded.is_empty() {
                0.0
            } else {
                count as f64 / graded.len() as f64 * 100.0
            };
            let _ = writeln!(out, "  {grade}: {count} students ({percentage:.1}%)");
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "AT-RISK STUDENTS (Below {at_risk_threshold}):");
        let _ = writeln!(out, "  Total: {} students", at_risk.len());
        for student in at_risk.iter().take(10) {
            let _ = writeln!(
                out,
                "    - {} (ID: {}): {:.2}",
                student.full_name(),
                student.student_id,
                student.final_grade.unwrap_or_default()
            );
        }
        if at_risk.len() > 10 {
            let _ = writeln!(out, "    ... and {} more", at_risk.len() - 10);
        }
        let _ = writeln!(out);
        let _ = write!(out, "{RULE}");
        out
    }

    /// Per-student sheet with quiz, exam, attendance, and grade breakdown.
    pub fn student_report(&self, student: &StudentRecord) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "INDIVIDUAL STUDENT REPORT");
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "Student ID: {}", student.student_id);
        let _ = writeln!(out, "Name: {}", student.full_name());
        let _ = writeln!(out, "Section: {}", student.section);
        let _ = writeln!(out);

        let _ = writeln!(out, "QUIZ SCORES:");
        for (i, score) in student.quizzes().into_iter().enumerate() {
            let _ = writeln!(out, "  Quiz {}: {}", i + 1, fmt_score(score));
        }
        if let Some(quiz_avg) = student.quiz_avg {
            let _ = writeln!(out, "  Quiz Average: {quiz_avg:.2}");
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "EXAM SCORES:");
        let _ = writeln!(out, "  Midterm: {}", fmt_score(student.midterm));
        let _ = writeln!(out, "  Final: {}", fmt_score(student.final_exam));
        let _ = writeln!(out);

        let _ = writeln!(out, "ATTENDANCE:");
        let _ = writeln!(out, "  Attendance: {}", fmt_score(student.attendance_percent));
        let _ = writeln!(out);

        let _ = writeln!(out, "FINAL GRADE:");
        match (student.final_grade, student.letter_grade) {
            (Some(grade), Some(letter)) => {
                let _ = writeln!(out, "  Numeric: {grade:.2}");
                let _ = writeln!(out, "  Letter: {letter}");
            }
            _ => {
                let _ = writeln!(out, "  Grade cannot be calculated (missing data)");
            }
        }
        let _ = writeln!(out);
        let _ = write!(out, "{RULE}");
        out
    }

    /// Section overview with letter distribution and a ranked roster.
    pub fn section_report(&self, section: &str) -> String {
        let section_students = select(self.records, |r| r.section == section);
        if section_students.is_empty() {
            return format!("No students found in section {section}");
        }

        let graded = select(&section_students, |r| r.final_grade.is_some());
        let final_grades: Vec<f64> = graded.iter().filter_map(|r| r.final_grade).collect();
        let avg_grade = if final_grades.is_empty() {
            0.0
        } else {
            final_grades.iter().sum::<f64>() / final_grades.len() as f64
        };

        let mut out = String::new();
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "SECTION {section} REPORT");
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "Generated: {}", self.timestamp);
        let _ = writeln!(out);

        let _ = writeln!(out, "SECTION OVERVIEW:");
        let _ = writeln!(out, "  Total Students: {}", section_students.len());
        let _ = writeln!(out, "  Students with Complete Data: {}", graded.len());
        let _ = writeln!(
            out,
            "  Students with Missing Data: {}",
            section_students.len() - graded.len()
        );
        let _ = writeln!(out, "  Average Grade: {avg_grade:.2}");
        let _ = writeln!(out);

        let _ = writeln!(out, "LETTER GRADE DISTRIBUTION:");
        for (grade, count) in Self::letter_counts(&graded) {
            let percentage = if graded.is_empty() {
                0.0
            } else {
                count as f64 / graded.len() as f64 * 100.0
            };
            let _ = writeln!(out, "  {grade}: {count} students ({percentage:.1}%)");
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "STUDENT LIST:");
        let ranked = sort_by_field(&graded, crate::record::Field::FinalGrade, true);
        for (i, student) in ranked.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} - {:.2} ({})",
                i + 1,
                student.full_name(),
                student.final_grade.unwrap_or_default(),
                student.letter_grade.map(|l| l.to_string()).unwrap_or_else(|| "N/A".into())
            );
        }
        let _ = writeln!(out);
        let _ = write!(out, "{RULE}");
        out
    }

    /// Detailed at-risk list, lowest grade first, with a component
    /// breakdown for each student.
    pub fn at_risk_report(&self) -> String {
        let at_risk_threshold = self.config.thresholds.at_risk;
        let at_risk = below_threshold(self.records, at_risk_threshold);

        let mut out = String::new();
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "AT-RISK STUDENTS REPORT");
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "Generated: {}", self.timestamp);
        let _ = writeln!(out, "Threshold: Below {at_risk_threshold}");
        let _ = writeln!(out);
        let _ = writeln!(out, "TOTAL AT-RISK STUDENTS: {}", at_risk.len());
        let _ = writeln!(out);

        if at_risk.is_empty() {
            let _ = writeln!(out, "No students are currently at risk!");
        } else {
            let _ = writeln!(out, "DETAILED LIST:");
            for (i, student) in at_risk.iter().enumerate() {
                let _ = writeln!(out);
                let _ = writeln!(out, "{}. {}", i + 1, student.full_name());
                let _ = writeln!(out, "   Student ID: {}", student.student_id);
                let _ = writeln!(out, "   Section: {}", student.section);
                let _ = writeln!(
                    out,
                    "   Final Grade: {:.2} ({})",
                    student.final_grade.unwrap_or_default(),
                    student.letter_grade.map(|l| l.to_string()).unwrap_or_else(|| "N/A".into())
                );
                let _ = writeln!(out, "   Component Breakdown:");
                if let Some(quiz_avg) = student.quiz_avg {
                    let _ = writeln!(out, "     Quiz Average: {quiz_avg:.2}");
                }
                if let Some(midterm) = student.midterm {
                    let _ = writeln!(out, "     Midterm: {midterm:.2}");
                }
                if let Some(final_exam) = student.final_exam {
                    let _ = writeln!(out, "     Final Exam: {final_exam:.2}");
                }
                if let Some(attendance) = student.attendance_percent {
                    let _ = writeln!(out, "     Attendance: {attendance:.2}");
                }
            }
        }

        let _ = writeln!(out);
        let _ = write!(out, "{RULE}");
        out
    }

    /// The `top_n` highest final grades with identifying details.
    pub fn top_performers_report(&self, count: usize) -> String {
        let top = top_n(self.records, count);

        let mut out = String::new();
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "TOP {count} PERFORMERS");
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "Generated: {}", self.timestamp);
        let _ = writeln!(out);

        for (i, student) in top.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, student.full_name());
            let _ = writeln!(out, "   Student ID: {}", student.student_id);
            let _ = writeln!(out, "   Section: {}", student.section);
            let _ = writeln!(
                out,
                "   Final Grade: {:.2} ({})",
                student.final_grade.unwrap_or_default(),
                student.letter_grade.map(|l| l.to_string()).unwrap_or_else(|| "N/A".into())
            );
            let _ = writeln!(out);
        }

        let _ = write!(out, "{RULE}");
        out
    }

    /// Exports the roster plus run metadata as pretty-printed JSON.
    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        #[derive(Serialize)]
        struct Metadata<'a> {
            generated: &'a str,
            total_students: usize,
            config: &'a Config,
        }
        #[derive(Serialize)]
        struct Export<'a> {
            metadata: Metadata<'a>,
            students: &'a [StudentRecord],
        }

        let export = Export {
            metadata: Metadata {
                generated: &self.timestamp,
                total_students: self.records.len(),
                config: self.config,
            },
            students: self.records,
        };

        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing JSON export {}", path.display()))?;
        Ok(())
    }

    /// Exports one section's roster to CSV. An unknown section writes
    /// nothing.
    pub fn export_section_csv<P: AsRef<Path>>(&self, section: &str, path: P) -> Result<()> {
        let section_students = select(self.records, |r| r.section == section);
        if section_students.is_empty() {
            return Ok(());
        }
        crate::output::export_records(path, &section_students)
    }

    /// Exports at-risk students to CSV, lowest grade first. No at-risk
    /// students writes nothing.
    pub fn export_at_risk_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let at_risk = below_threshold(self.records, self.config.thresholds.at_risk);
        if at_risk.is_empty() {
            return Ok(());
        }
        crate::output::export_records(path, &at_risk)
    }

    /// Writes the at-risk CSV plus one CSV per section into `folder`,
    /// creating it if needed.
    pub fn save_all<P: AsRef<Path>>(&self, folder: P) -> Result<()> {
        let folder = folder.as_ref();
        std::fs::create_dir_all(folder)
            .with_context(|| format!("creating output folder {}", folder.display()))?;

        self.export_at_risk_csv(folder.join("at_risk_students.csv"))?;

        let mut sections: Vec<&str> = self
            .records
            .iter()
            .map(|r| r.section.as_str())
            .filter(|s| !s.is_empty())
            .collect();
        sections.sort_unstable();
        sections.dedup();

        for section in sections {
            self.export_section_csv(section, folder.join(format!("section_{section}.csv")))?;
        }

        info!(folder = %folder.display(), "CSV reports exported");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::transform;

    fn roster() -> Vec<StudentRecord> {
        let mk = |id: &str, section: &str, quiz: f64, midterm: Option<f64>, final_exam: f64, att: f64| {
            StudentRecord {
                student_id: id.to_string(),
                first_name: "Test".to_string(),
                last_name: id.to_uppercase(),
                section: section.to_string(),
                quiz1: Some(quiz),
                midterm,
                final_exam: Some(final_exam),
                attendance_percent: Some(att),
                ..Default::default()
            }
        };
        transform(
            vec![
                mk("a1", "A", 95.0, Some(95.0), 95.0, 100.0), // high A
                mk("a2", "A", 40.0, Some(40.0), 40.0, 50.0),  // at risk
                mk("b1", "B", 80.0, None, 80.0, 90.0),        // incomplete
            ],
            &Config::default(),
        )
    }

    #[test]
    fn test_summary_report_counts() {
        let records = roster();
        let report = ReportGenerator::new(&records, &Config::default()).summary_report();

        assert!(report.contains("Total Students: 3"));
        assert!(report.contains("Students with Complete Data: 2"));
        assert!(report.contains("Students with Missing Data: 1"));
        assert!(report.contains("AT-RISK STUDENTS (Below 60):"));
        assert!(report.contains("Total: 1 students"));
    }

    #[test]
    fn test_student_report_missing_markers() {
        let records = roster();
        let config = Config::default();
        let generator = ReportGenerator::new(&records, &config);

        let report = generator.student_report(&records[2]);
        assert!(report.contains("Midterm: Missing"));
        assert!(report.contains("Grade cannot be calculated"));
    }

    #[test]
    fn test_section_report_unknown_section() {
        let records = roster();
        let config = Config::default();
        let report = ReportGenerator::new(&records, &config).section_report("Z");
        assert_eq!(report, "No students found in section Z");
    }

    #[test]
    fn test_section_report_ranks_descending() {
        let records = roster();
        let config = Config::default();
        let report = ReportGenerator::new(&records, &config).section_report("A");

        let a1_pos = report.find("Test A1").unwrap();
        let a2_pos = report.find("Test A2").unwrap();
        assert!(a1_pos < a2_pos);
    }

    #[test]
    fn test_at_risk_report_lists_components() {
        let records = roster();
        let config = Config::default();
        let report = ReportGenerator::new(&records, &config).at_risk_report();

        assert!(report.contains("TOTAL AT-RISK STUDENTS: 1"));
        assert!(report.contains("Test A2"));
        assert!(report.contains("Quiz Average: 40.00"));
    }

    #[test]
    fn test_save_all_writes_expected_files() {
        let records = roster();
        let config = Config::default();
        let dir = std::env::temp_dir().join("gradebook_reports_test");
        let _ = std::fs::remove_dir_all(&dir);

        ReportGenerator::new(&records, &config).save_all(&dir).unwrap();

        assert!(dir.join("at_risk_students.csv").exists());
        assert!(dir.join("section_A.csv").exists());
        assert!(dir.join("section_B.csv").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_export_json_shape() {
        let records = roster();
        let config = Config::default();
        let path = std::env::temp_dir().join("gradebook_export_test.json");
        let _ = std::fs::remove_file(&path);

        ReportGenerator::new(&records, &config).export_json(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["metadata"]["total_students"], 3);
        assert_eq!(parsed["students"].as_array().unwrap().len(), 3);

        std::fs::remove_file(&path).unwrap();
    }
}
