//! Run configuration: grade weights, letter-grade scale, thresholds.
//!
//! Loaded once from a JSON file and passed explicitly to every transform
//! and statistics call. The core never mutates it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::LetterGrade;

/// Raised when the configuration file is structurally unusable. Missing
/// score data in student rows is never a config error; only absent or
/// malformed weight/scale/threshold keys are.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Weight coefficients for the final-grade formula. Applied exactly as
/// configured; the core never normalizes them to sum to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weights {
    pub quizzes: f64,
    pub midterm: f64,
    #[serde(rename = "final")]
    pub final_exam: f64,
    pub attendance: f64,
}

/// Lower bound for each letter grade, evaluated highest-first and
/// boundary-inclusive. `f` is the floor of the scale and is carried for
/// completeness; anything below the D bound grades F.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeScale {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "C")]
    pub c: f64,
    #[serde(rename = "D")]
    pub d: f64,
    #[serde(rename = "F")]
    pub f: f64,
}

impl GradeScale {
    /// Lower bound for a given letter grade.
    pub fn lower_bound(&self, grade: LetterGrade) -> f64 {
        match grade {
            LetterGrade::A => self.a,
            LetterGrade::B => self.b,
            LetterGrade::C => self.c,
            LetterGrade::D => self.d,
            LetterGrade::F => self.f,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    pub at_risk: f64,
}

/// Optional output locations; everything else in the file is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paths {
    #[serde(default)]
    pub output_folder: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub weights: Weights,
    pub grade_scale: GradeScale,
    pub thresholds: Thresholds,
    #[serde(default)]
    pub paths: Paths,
}

impl Config {
    /// Loads the config from a JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or any required
    /// weight, scale, or threshold key is absent or malformed.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Folder for generated reports, `data/output` unless configured.
    pub fn output_folder(&self) -> &str {
        self.paths.output_folder.as_deref().unwrap_or("data/output")
    }
}

impl Default for Config {
    /// The standard course setup: 30/30/30/10 weights, 90/80/70/60 scale,
    /// at-risk below 60.
    fn default() -> Self {
        Config {
            weights: Weights {
                quizzes: 0.3,
                midterm: 0.3,
                final_exam: 0.3,
                attendance: 0.1,
            },
            grade_scale: GradeScale {
                a: 90.0,
                b: 80.0,
                c: 70.0,
                d: 60.0,
                f: 0.0,
            },
            thresholds: Thresholds { at_risk: 60.0 },
            paths: Paths::default(),
        }
    }
}
