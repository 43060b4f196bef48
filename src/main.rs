//! CLI entry point for the gradebook analyzer.
//!
//! Provides subcommands for generating class reports, dumping the
//! statistics suite, and exporting a transformed roster.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use gradebook_analyzer::analytics::outliers::{
    DEFAULT_Z_THRESHOLD, detect_outliers_iqr, detect_outliers_zscore,
};
use gradebook_analyzer::analytics::sections::{compare_sections, most_improved};
use gradebook_analyzer::analytics::summary::{describe, percentiles};
use gradebook_analyzer::analytics::{final_grades, quiz_means};
use gradebook_analyzer::config::Config;
use gradebook_analyzer::ingest::read_csv_file;
use gradebook_analyzer::output::export_records;
use gradebook_analyzer::record::StudentRecord;
use gradebook_analyzer::reports::ReportGenerator;
use gradebook_analyzer::transform::transform;

#[derive(Parser)]
#[command(name = "gradebook_analyzer")]
#[command(about = "A tool to grade and analyze student gradebook CSVs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the summary report and export all CSV reports
    Report {
        /// Gradebook CSV to analyze
        #[arg(value_name = "INPUT_CSV")]
        input: String,

        /// JSON config with weights, grade scale, and thresholds
        #[arg(short, long)]
        config: Option<String>,

        /// Directory for exported reports (overrides the config's folder)
        #[arg(short, long)]
        output_dir: Option<String>,
    },
    /// Compute descriptive statistics, outliers, and section comparisons
    Stats {
        /// Gradebook CSV to analyze
        #[arg(value_name = "INPUT_CSV")]
        input: String,

        /// JSON config with weights, grade scale, and thresholds
        #[arg(short, long)]
        config: Option<String>,

        /// Emit the full statistics bundle as JSON on stdout
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Z-score cutoff for outlier detection
        #[arg(long, default_value_t = DEFAULT_Z_THRESHOLD)]
        z_threshold: f64,
    },
    /// Ingest, transform, and export the full roster with derived fields
    Transform {
        /// Gradebook CSV to transform
        #[arg(value_name = "INPUT_CSV")]
        input: String,

        /// JSON config with weights, grade scale, and thresholds
        #[arg(short, long)]
        config: Option<String>,

        /// CSV file to write the transformed roster to
        #[arg(short, long, default_value = "transformed.csv")]
        output: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/gradebook_analyzer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gradebook_analyzer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            input,
            config,
            output_dir,
        } => {
            let config = load_config(config.as_deref())?;
            let records = load_roster(&input, &config)?;

            let generator = ReportGenerator::new(&records, &config);
            println!("{}", generator.summary_report());
            println!();

            let folder = output_dir.as_deref().unwrap_or_else(|| config.output_folder());
            generator.save_all(folder)?;
        }
        Commands::Stats {
            input,
            config,
            json,
            z_threshold,
        } => {
            let config = load_config(config.as_deref())?;
            let records = load_roster(&input, &config)?;
            run_stats(&records, json, z_threshold)?;
        }
        Commands::Transform {
            input,
            config,
            output,
        } => {
            let config = load_config(config.as_deref())?;
            let records = load_roster(&input, &config)?;
            export_records(&output, &records)?;
            info!(output, rows = records.len(), "Transformed roster exported");
        }
    }

    Ok(())
}

/// Loads the config file, or the standard course setup when none given.
fn load_config(path: Option<&str>) -> Result<Config> {
    match path {
        Some(path) => {
            let config = Config::load(path)?;
            info!(path, "Config loaded");
            Ok(config)
        }
        None => {
            warn!("No config file given, using default weights and scale");
            Ok(Config::default())
        }
    }
}

/// Ingests and transforms a roster CSV.
fn load_roster(input: &str, config: &Config) -> Result<Vec<StudentRecord>> {
    let records = read_csv_file(input).context("ingesting gradebook CSV")?;
    info!(input, rows = records.len(), "Roster ingested");
    Ok(transform(records, config))
}

/// Computes and emits the full statistics bundle, either as log lines or
/// one JSON document on stdout.
fn run_stats(records: &[StudentRecord], as_json: bool, z_threshold: f64) -> Result<()> {
    let grades = final_grades(records);
    if grades.is_empty() {
        warn!("No records have a defined final grade; nothing to analyze");
    }

    let summary = describe(&grades);
    let pct = percentiles(&grades);
    let iqr = detect_outliers_iqr(&grades);
    let z_outliers = detect_outliers_zscore(&grades, z_threshold);
    let sections = compare_sections(records);
    let improved = most_improved(records);
    let quizzes: Vec<(&str, f64)> = quiz_means(records)
        .into_iter()
        .map(|(field, mean)| (field.name(), mean))
        .collect();

    if as_json {
        let bundle = json!({
            "final_grades": {
                "count": grades.len(),
                "summary": summary,
                "percentiles": pct,
            },
            "outliers": {
                "iqr": iqr,
                "z_score": z_outliers,
                "z_threshold": z_threshold,
            },
            "sections": sections,
            "most_improved": improved,
            "quiz_means": quizzes.iter().map(|(name, mean)| json!({"quiz": name, "mean": mean})).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&bundle)?);
        return Ok(());
    }

    if let Some(summary) = &summary {
        info!(
            count = grades.len(),
            mean = summary.mean,
            median = summary.median,
            std_dev = summary.std_dev,
            min = summary.min,
            max = summary.max,
            "Final grade summary"
        );
    }
    if let Some(pct) = &pct {
        info!(p25 = pct.p25, p50 = pct.p50, p75 = pct.p75, p90 = pct.p90, p95 = pct.p95, "Percentiles");
    }
    info!(
        iqr_outliers = iqr.count(),
        z_outliers = z_outliers.len(),
        "Outlier detection"
    );
    for (section, stats) in &sections {
        info!(
            section = %section,
            count = stats.count,
            mean = stats.statistics.mean,
            pass_rate = stats.pass_rate(),
            "Section"
        );
    }
    for entry in improved.iter().take(3) {
        info!(
            student_id = %entry.student_id,
            improvement = entry.improvement,
            "Most improved"
        );
    }
    for (quiz, mean) in &quizzes {
        info!(quiz, mean, "Quiz average");
    }

    Ok(())
}
