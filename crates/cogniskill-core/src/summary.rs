//! Dashboard summary of a generated dataset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{round1, StudentRecord};
use crate::statistics::mean;

/// Number of students listed in each ranking.
pub const RANKING_SIZE: usize = 10;

/// Averages of the four cognitive scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognitiveAverages {
    pub comprehension: f64,
    pub attention: f64,
    pub focus: f64,
    pub retention: f64,
}

/// A student entry in a ranking list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStudent {
    pub student_id: String,
    pub name: String,
    pub assessment_score: f64,
}

/// Aggregate view consumed by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_students: usize,
    pub average_assessment_score: f64,
    pub average_engagement_time: f64,
    pub average_attendance_rate: f64,
    pub cognitive_skills_avg: CognitiveAverages,
    pub class_distribution: BTreeMap<String, usize>,
    pub learning_style_distribution: BTreeMap<String, usize>,
    pub top_performing_students: Vec<RankedStudent>,
    pub students_needing_support: Vec<RankedStudent>,
}

fn average(records: &[StudentRecord], f: fn(&StudentRecord) -> f64) -> f64 {
    let values: Vec<f64> = records.iter().map(f).collect();
    round1(mean(&values))
}

fn ranked(records: &[&StudentRecord]) -> Vec<RankedStudent> {
    records
        .iter()
        .take(RANKING_SIZE)
        .map(|r| RankedStudent {
            student_id: r.student_id.clone(),
            name: r.name.clone(),
            assessment_score: r.assessment_score,
        })
        .collect()
}

/// Build the dashboard summary.
///
/// Rankings use a stable sort, so students with equal scores keep their
/// table order.
pub fn summarize(records: &[StudentRecord]) -> DashboardSummary {
    let mut class_distribution = BTreeMap::new();
    let mut learning_style_distribution = BTreeMap::new();
    for r in records {
        *class_distribution.entry(r.class_name.clone()).or_insert(0) += 1;
        *learning_style_distribution
            .entry(r.learning_style.to_string())
            .or_insert(0) += 1;
    }

    let mut by_score: Vec<&StudentRecord> = records.iter().collect();
    by_score.sort_by(|a, b| b.assessment_score.total_cmp(&a.assessment_score));
    let top_performing_students = ranked(&by_score);
    by_score.sort_by(|a, b| a.assessment_score.total_cmp(&b.assessment_score));
    let students_needing_support = ranked(&by_score);

    DashboardSummary {
        total_students: records.len(),
        average_assessment_score: average(records, |r| r.assessment_score),
        average_engagement_time: average(records, |r| r.engagement_time),
        average_attendance_rate: average(records, |r| r.attendance_rate),
        cognitive_skills_avg: CognitiveAverages {
            comprehension: average(records, |r| r.comprehension),
            attention: average(records, |r| r.attention),
            focus: average(records, |r| r.focus),
            retention: average(records, |r| r.retention),
        },
        class_distribution,
        learning_style_distribution,
        top_performing_students,
        students_needing_support,
    }
}
