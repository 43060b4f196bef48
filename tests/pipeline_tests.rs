//! End-to-end pipeline tests over a fixture roster: ingest -> transform ->
//! relational queries -> statistics -> reports.

use gradebook_analyzer::analytics::sections::{compare_sections, most_improved};
use gradebook_analyzer::analytics::summary::{describe, percentile_rank};
use gradebook_analyzer::analytics::{final_grades, quiz_means};
use gradebook_analyzer::config::Config;
use gradebook_analyzer::ingest::read_records;
use gradebook_analyzer::record::{LetterGrade, StudentRecord};
use gradebook_analyzer::reports::ReportGenerator;
use gradebook_analyzer::roster::{below_threshold, delete_by_id, top_n};
use gradebook_analyzer::transform::transform;

const FIXTURE: &str = include_str!("fixtures/students.csv");

fn fixture_roster() -> Vec<StudentRecord> {
    let records = read_records(FIXTURE.as_bytes()).expect("fixture CSV should parse");
    transform(records, &Config::default())
}

fn by_id<'a>(records: &'a [StudentRecord], id: &str) -> &'a StudentRecord {
    records
        .iter()
        .find(|r| r.student_id == id)
        .unwrap_or_else(|| panic!("no record {id}"))
}

#[test]
fn test_full_pipeline_ingest_and_transform() {
    let records = fixture_roster();
    assert_eq!(records.len(), 10);

    // Fully specified student: 95*0.3 + 85*0.3 + 90*0.3 + 100*0.1 = 91.0
    let s001 = by_id(&records, "S001");
    assert_eq!(s001.quiz_avg, Some(95.0));
    assert_eq!(s001.final_grade, Some(91.0));
    assert_eq!(s001.letter_grade, Some(LetterGrade::A));

    // Partial quizzes average only the present scores
    let s002 = by_id(&records, "S002");
    assert_eq!(s002.quiz_avg, Some(90.0));
    assert_eq!(s002.letter_grade, Some(LetterGrade::C));

    // Out-of-range midterm (120) was rejected at ingest, so the final
    // grade cannot be computed
    let s010 = by_id(&records, "S010");
    assert_eq!(s010.midterm, None);
    assert_eq!(s010.final_grade, None);
    assert_eq!(s010.letter_grade, None);

    // Blank row: everything missing, nothing derived
    let s006 = by_id(&records, "S006");
    assert_eq!(s006.quiz_avg, None);
    assert_eq!(s006.final_grade, None);
}

#[test]
fn test_missing_component_never_yields_a_grade() {
    let records = fixture_roster();
    for record in &records {
        let complete = record.quiz_avg.is_some()
            && record.midterm.is_some()
            && record.final_exam.is_some()
            && record.attendance_percent.is_some();
        assert_eq!(record.final_grade.is_some(), complete, "record {}", record.student_id);
        assert_eq!(record.letter_grade.is_some(), complete, "record {}", record.student_id);
    }
}

#[test]
fn test_letter_grades_consistent_with_scale() {
    let records = fixture_roster();
    let scale = Config::default().grade_scale;

    for record in &records {
        let (Some(grade), Some(letter)) = (record.final_grade, record.letter_grade) else {
            continue;
        };
        assert!(grade >= scale.lower_bound(letter), "record {}", record.student_id);
        // And below the next bound up
        match letter {
            LetterGrade::A => {}
            LetterGrade::B => assert!(grade < scale.a),
            LetterGrade::C => assert!(grade < scale.b),
            LetterGrade::D => assert!(grade < scale.c),
            LetterGrade::F => assert!(grade < scale.d),
        }
    }
}

#[test]
fn test_roster_queries() {
    let records = fixture_roster();

    let top = top_n(&records, 3);
    assert_eq!(top[0].student_id, "S008");
    assert_eq!(top[1].student_id, "S004");
    assert_eq!(top[2].student_id, "S001");

    let at_risk = below_threshold(&records, 60.0);
    let ids: Vec<&str> = at_risk.iter().map(|r| r.student_id.as_str()).collect();
    assert_eq!(ids, vec!["S009", "S003"]);

    let after_delete = delete_by_id(records.clone(), "S001");
    assert_eq!(after_delete.len(), 9);
    let unchanged = delete_by_id(records.clone(), "S999");
    assert_eq!(unchanged, records);
}

#[test]
fn test_statistics_over_fixture() {
    let records = fixture_roster();
    let grades = final_grades(&records);
    assert_eq!(grades.len(), 7);

    let summary = describe(&grades).unwrap();
    assert!((summary.min - 24.28).abs() < 1e-9);
    assert_eq!(summary.max, 100.0);
    assert!(summary.mean > summary.min && summary.mean < summary.max);

    // The class maximum sits above 100*(n-1)/n percent of the class
    let rank = percentile_rank(summary.max, &grades).unwrap();
    assert_eq!(rank.rank, grades.len());
    assert!((rank.percent - 100.0 * 6.0 / 7.0).abs() < 1e-9);
}

#[test]
fn test_section_comparison_over_fixture() {
    let records = fixture_roster();
    let sections = compare_sections(&records);

    // Section C's only student has no final grade, so C is omitted
    assert_eq!(sections.len(), 2);
    assert!(sections.contains_key("A"));
    assert!(sections.contains_key("B"));
    assert!(!sections.contains_key("C"));

    let a = &sections["A"];
    assert_eq!(a.count, 4);
    let letters: usize = a.letter_grades.values().sum();
    assert_eq!(letters, a.count);
    assert_eq!(a.letter_grades.get(&LetterGrade::A), Some(&2));
}

#[test]
fn test_most_improved_over_fixture() {
    let records = fixture_roster();
    let ranked = most_improved(&records);

    // Only students with both exam scores qualify
    assert_eq!(ranked.len(), 7);
    // Three students tied at +5 keep roster order
    assert_eq!(ranked[0].student_id, "S001");
    assert_eq!(ranked[0].improvement, 5.0);
    assert_eq!(ranked[1].student_id, "S002");
    assert_eq!(ranked[2].student_id, "S005");
    // The biggest declines come last
    assert_eq!(ranked[6].student_id, "S009");
}

#[test]
fn test_quiz_means_over_fixture() {
    let records = fixture_roster();
    let means = quiz_means(&records);
    // All five quizzes were taken by someone
    assert_eq!(means.len(), 5);
    for (_, mean) in means {
        assert!((0.0..=100.0).contains(&mean));
    }
}

#[test]
fn test_reports_over_fixture() {
    let records = fixture_roster();
    let config = Config::default();
    let generator = ReportGenerator::new(&records, &config);

    let summary = generator.summary_report();
    assert!(summary.contains("Total Students: 10"));
    assert!(summary.contains("Students with Complete Data: 7"));
    assert!(summary.contains("Students with Missing Data: 3"));
    assert!(summary.contains("Total: 2 students"));

    let section = generator.section_report("C");
    assert!(section.contains("Total Students: 1"));
    assert!(section.contains("Students with Complete Data: 0"));
}
