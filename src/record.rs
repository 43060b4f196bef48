//! Student record types shared across the pipeline.

use serde::{Deserialize, Serialize};

/// Letter grades in descending order of achievement.
///
/// A record whose final grade cannot be computed carries no letter grade at
/// all (`Option<LetterGrade>` is `None`); that case must never be folded
/// into [`LetterGrade::F`], which is a real earned grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    /// All grades in report display order.
    pub const ALL: [LetterGrade; 5] = [
        LetterGrade::A,
        LetterGrade::B,
        LetterGrade::C,
        LetterGrade::D,
        LetterGrade::F,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }
}

impl std::fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single student row with raw scores and derived fields.
///
/// All scores are in `[0, 100]`; `None` means the score is missing, which is
/// a normal state (partial rosters), never an error and never zero.
/// `quiz_avg`, `final_grade`, and `letter_grade` are derived and overwritten
/// on every [`transform`](crate::transform::transform) call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub last_name: String,
    pub first_name: String,
    pub section: String,

    pub quiz1: Option<f64>,
    pub quiz2: Option<f64>,
    pub quiz3: Option<f64>,
    pub quiz4: Option<f64>,
    pub quiz5: Option<f64>,
    pub midterm: Option<f64>,
    pub final_exam: Option<f64>,
    pub attendance_percent: Option<f64>,

    #[serde(default)]
    pub quiz_avg: Option<f64>,
    #[serde(default)]
    pub final_grade: Option<f64>,
    #[serde(default)]
    pub letter_grade: Option<LetterGrade>,
}

impl StudentRecord {
    /// The five quiz scores in order.
    pub fn quizzes(&self) -> [Option<f64>; 5] {
        [self.quiz1, self.quiz2, self.quiz3, self.quiz4, self.quiz5]
    }

    /// Full name as shown in reports.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Every addressable record field, named by its CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    StudentId,
    LastName,
    FirstName,
    Section,
    Quiz1,
    Quiz2,
    Quiz3,
    Quiz4,
    Quiz5,
    Midterm,
    FinalExam,
    AttendancePercent,
    QuizAvg,
    FinalGrade,
    LetterGrade,
}

/// A field value pulled out of a record for sorting. One comparison only
/// ever sees values from a single field, so cross-variant ordering is moot.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Letter(LetterGrade),
}

impl FieldValue {
    fn cmp_same(&self, other: &FieldValue) -> std::cmp::Ordering {
        use FieldValue::*;
        match (self, other) {
            (Text(a), Text(b)) => a.cmp(b),
            (Number(a), Number(b)) => a.total_cmp(b),
            (Letter(a), Letter(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl Field {
    /// Parses a CSV header name. Unknown names yield `None`; callers that
    /// take field-name lists treat those as silently ignored.
    pub fn parse(name: &str) -> Option<Field> {
        Some(match name {
            "student_id" => Field::StudentId,
            "last_name" => Field::LastName,
            "first_name" => Field::FirstName,
            "section" => Field::Section,
            "quiz1" => Field::Quiz1,
            "quiz2" => Field::Quiz2,
            "quiz3" => Field::Quiz3,
            "quiz4" => Field::Quiz4,
            "quiz5" => Field::Quiz5,
            "midterm" => Field::Midterm,
            "final" | "final_exam" => Field::FinalExam,
            "attendance_percent" => Field::AttendancePercent,
            "quiz_avg" => Field::QuizAvg,
            "final_grade" => Field::FinalGrade,
            "letter_grade" => Field::LetterGrade,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Field::StudentId => "student_id",
            Field::LastName => "last_name",
            Field::FirstName => "first_name",
            Field::Section => "section",
            Field::Quiz1 => "quiz1",
            Field::Quiz2 => "quiz2",
            Field::Quiz3 => "quiz3",
            Field::Quiz4 => "quiz4",
            Field::Quiz5 => "quiz5",
            Field::Midterm => "midterm",
            Field::FinalExam => "final",
            Field::AttendancePercent => "attendance_percent",
            Field::QuizAvg => "quiz_avg",
            Field::FinalGrade => "final_grade",
            Field::LetterGrade => "letter_grade",
        }
    }

    /// Extracts this field's value from a record, `None` when missing.
    /// Text fields are considered missing when empty.
    pub fn value(&self, record: &StudentRecord) -> Option<FieldValue> {
        let text = |s: &str| {
            if s.is_empty() {
                None
            } else {
                Some(FieldValue::Text(s.to_string()))
            }
        };
        match self {
            Field::StudentId => text(&record.student_id),
            Field::LastName => text(&record.last_name),
            Field::FirstName => text(&record.first_name),
            Field::Section => text(&record.section),
            Field::Quiz1 => record.quiz1.map(FieldValue::Number),
            Field::Quiz2 => record.quiz2.map(FieldValue::Number),
            Field::Quiz3 => record.quiz3.map(FieldValue::Number),
            Field::Quiz4 => record.quiz4.map(FieldValue::Number),
            Field::Quiz5 => record.quiz5.map(FieldValue::Number),
            Field::Midterm => record.midterm.map(FieldValue::Number),
            Field::FinalExam => record.final_exam.map(FieldValue::Number),
            Field::AttendancePercent => record.attendance_percent.map(FieldValue::Number),
            Field::QuizAvg => record.quiz_avg.map(FieldValue::Number),
            Field::FinalGrade => record.final_grade.map(FieldValue::Number),
            Field::LetterGrade => record.letter_grade.map(FieldValue::Letter),
        }
    }

    /// Compares two records on this field. Missing values sort after all
    /// present values regardless of direction; present values compare
    /// normally (reversed by the caller for descending order).
    pub fn compare(
        &self,
        a: &StudentRecord,
        b: &StudentRecord,
        descending: bool,
    ) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self.value(a), self.value(b)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(va), Some(vb)) => {
                let ord = va.cmp_same(&vb);
                if descending { ord.reverse() } else { ord }
            }
        }
    }
}
