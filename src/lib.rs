//! Gradebook ingestion, grade transformation, and class analytics.
//!
//! The pipeline ingests per-student CSV rows, derives quiz averages,
//! weighted final grades, and letter grades, then feeds the transformed
//! roster into relational queries, descriptive statistics, outlier
//! detection, section comparison, and text reports.

pub mod analytics;
pub mod config;
pub mod ingest;
pub mod output;
pub mod record;
pub mod reports;
pub mod roster;
pub mod transform;

pub use config::{Config, ConfigError};
pub use record::{Field, LetterGrade, StudentRecord};
