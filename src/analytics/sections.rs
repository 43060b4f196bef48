//! Per-section aggregation and the most-improved ranking.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analytics::summary::{Summary, describe};
use crate::record::{LetterGrade, StudentRecord};

/// How many students the most-improved ranking returns at most.
const MOST_IMPROVED_LIMIT: usize = 10;

/// Aggregate view of one section, computed over its students with a
/// defined final grade.
#[derive(Debug, Serialize)]
pub struct SectionStats {
    pub statistics: Summary,
    /// Number of students with a defined final grade.
    pub count: usize,
    /// Letter-grade frequency; only earned grades are counted, so the
    /// values sum to `count`.
    pub letter_grades: BTreeMap<LetterGrade, usize>,
}

impl SectionStats {
    /// Share of graded students earning A, B, or C, in percent.
    pub fn pass_rate(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let passing: usize = [LetterGrade::A, LetterGrade::B, LetterGrade::C]
            .iter()
            .filter_map(|g| self.letter_grades.get(g))
            .sum();
        passing as f64 / self.count as f64 * 100.0
    }
}

/// One student's midterm-to-final change.
#[derive(Debug, Clone, Serialize)]
pub struct Improvement {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub midterm: f64,
    pub final_exam: f64,
    pub improvement: f64,
}

/// Groups records by section and summarizes each. Sections where no
/// student has a defined final grade are omitted, as are records with a
/// blank section name.
pub fn compare_sections(records: &[StudentRecord]) -> BTreeMap<String, SectionStats> {
    let mut grades_by_section: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut letters_by_section: BTreeMap<String, BTreeMap<LetterGrade, usize>> = BTreeMap::new();

    for record in records {
        if record.section.is_empty() {
            continue;
        }
        if let Some(grade) = record.final_grade {
            grades_by_section
                .entry(record.section.clone())
                .or_default()
                .push(grade);
            if let Some(letter) = record.letter_grade {
                *letters_by_section
                    .entry(record.section.clone())
                    .or_default()
                    .entry(letter)
                    .or_insert(0) += 1;
            }
        }
    }

    grades_by_section
        .into_iter()
        .filter_map(|(section, grades)| {
            let statistics = describe(&grades)?;
            let letter_grades = letters_by_section.remove(&section).unwrap_or_default();
            Some((
                section,
                SectionStats {
                    statistics,
                    count: grades.len(),
                    letter_grades,
                },
            ))
        })
        .collect()
}

/// Students with both a midterm and a final exam score, ranked by
/// `final_exam - midterm` descending, truncated to the top ten. Ties keep
/// roster order.
pub fn most_improved(records: &[StudentRecord]) -> Vec<Improvement> {
    let mut improvements: Vec<Improvement> = records
        .iter()
        .filter_map(|record| {
            let midterm = record.midterm?;
            let final_exam = record.final_exam?;
            Some(Improvement {
                student_id: record.student_id.clone(),
                first_name: record.first_name.clone(),
                last_name: record.last_name.clone(),
                midterm,
                final_exam,
                improvement: final_exam - midterm,
            })
        })
        .collect();

    improvements.sort_by(|a, b| b.improvement.total_cmp(&a.improvement));
    improvements.truncate(MOST_IMPROVED_LIMIT);
    improvements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::transform::transform;

    fn student(id: &str, section: &str, midterm: Option<f64>, final_exam: Option<f64>) -> StudentRecord {
        StudentRecord {
            student_id: id.to_string(),
            section: section.to_string(),
            quiz1: Some(80.0),
            midterm,
            final_exam,
            attendance_percent: Some(100.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_sections_with_no_grades_omitted() {
        let records = transform(
            vec![
                student("a1", "A", Some(85.0), Some(95.0)),
                student("a2", "A", Some(70.0), Some(60.0)),
                // Section B: no final grades at all
                student("b1", "B", None, Some(90.0)),
            ],
            &Config::default(),
        );

        let sections = compare_sections(&records);
        assert!(sections.contains_key("A"));
        assert!(!sections.contains_key("B"));

        let a = &sections["A"];
        assert_eq!(a.count, 2);
        let letter_total: usize = a.letter_grades.values().sum();
        assert_eq!(letter_total, a.count);
    }

    #[test]
    fn test_blank_section_omitted() {
        let records = transform(
            vec![student("x", "", Some(80.0), Some(80.0))],
            &Config::default(),
        );
        assert!(compare_sections(&records).is_empty());
    }

    #[test]
    fn test_section_letter_counts() {
        let records = transform(
            vec![
                // quiz 80, mid 100, final 100, att 100 -> 94 -> A
                student("a", "A", Some(100.0), Some(100.0)),
                // quiz 80, mid 60, final 60, att 100 -> 70 -> C
                student("c", "A", Some(60.0), Some(60.0)),
            ],
            &Config::default(),
        );

        let sections = compare_sections(&records);
        let a = &sections["A"];
        assert_eq!(a.letter_grades.get(&LetterGrade::A), Some(&1));
        assert_eq!(a.letter_grades.get(&LetterGrade::C), Some(&1));
        assert_eq!(a.statistics.mean, 82.0);
    }

    #[test]
    fn test_pass_rate() {
        let records = transform(
            vec![
                student("a", "A", Some(100.0), Some(100.0)), // A
                student("f", "A", Some(0.0), Some(0.0)),     // F
            ],
            &Config::default(),
        );
        let sections = compare_sections(&records);
        assert_eq!(sections["A"].pass_rate(), 50.0);
    }

    #[test]
    fn test_most_improved_ordering_and_filter() {
        let records = vec![
            student("up", "A", Some(60.0), Some(90.0)),
            student("down", "A", Some(90.0), Some(70.0)),
            student("partial", "A", Some(80.0), None),
            student("flat", "A", Some(75.0), Some(75.0)),
        ];

        let ranked = most_improved(&records);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].student_id, "up");
        assert_eq!(ranked[0].improvement, 30.0);
        assert_eq!(ranked[1].student_id, "flat");
        assert_eq!(ranked[2].student_id, "down");
        assert_eq!(ranked[2].improvement, -20.0);
    }

    #[test]
    fn test_most_improved_caps_at_ten() {
        let records: Vec<StudentRecord> = (0..15)
            .map(|i| student(&format!("s{i}"), "A", Some(50.0), Some(50.0 + i as f64)))
            .collect();
        let ranked = most_improved(&records);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].improvement, 14.0);
    }
}
