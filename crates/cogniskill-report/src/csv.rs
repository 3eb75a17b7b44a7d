//! CSV export of the record table.
//!
//! Columns follow the JSON field order. Fields containing a comma, quote or
//! line break are quoted with inner quotes doubled. List columns are joined
//! with `"; "`.

use std::path::Path;

use anyhow::Result;

use cogniskill_core::model::{CognitiveSkill, StudentRecord};

use crate::atomic::write_atomic;

pub const HEADER: [&str; 16] = [
    "student_id",
    "name",
    "class",
    "age",
    "comprehension",
    "attention",
    "focus",
    "retention",
    "assessment_score",
    "engagement_time",
    "study_hours_per_week",
    "attendance_rate",
    "learning_style",
    "preferred_subject",
    "improvement_areas",
    "strengths",
];

pub const LIST_SEPARATOR: &str = "; ";

fn escape(field: &str) -> String {
    if field.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Floats keep at least one decimal place so `80.0` stays distinguishable
/// from an integer column.
fn float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn skills(list: &[CognitiveSkill]) -> String {
    list.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

fn row(r: &StudentRecord) -> [String; 16] {
    [
        r.student_id.clone(),
        r.name.clone(),
        r.class_name.clone(),
        r.age.to_string(),
        float(r.comprehension),
        float(r.attention),
        float(r.focus),
        float(r.retention),
        float(r.assessment_score),
        float(r.engagement_time),
        float(r.study_hours_per_week),
        float(r.attendance_rate),
        r.learning_style.to_string(),
        r.preferred_subject.to_string(),
        skills(&r.improvement_areas),
        skills(&r.strengths),
    ]
}

/// Render the table with a header row and `\n` line endings.
pub fn records_to_csv(records: &[StudentRecord]) -> String {
    let mut out = HEADER.join(",");
    out.push('\n');
    for r in records {
        let fields: Vec<String> = row(r).iter().map(|f| escape(f)).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

pub fn write_records_csv(path: &Path, records: &[StudentRecord]) -> Result<()> {
    write_atomic(path, records_to_csv(records).as_bytes())
}
