//! Core data model types for cogniskill.
//!
//! A [`StudentRecord`] is built once by the generator, validated, and never
//! mutated afterwards. All analysis stages read records by reference.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PipelineError;

/// One of the four simulated cognitive abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CognitiveSkill {
    Comprehension,
    Attention,
    Focus,
    Retention,
}

impl CognitiveSkill {
    /// All skills in their fixed tie-breaking order.
    pub const ALL: [CognitiveSkill; 4] = [
        CognitiveSkill::Comprehension,
        CognitiveSkill::Attention,
        CognitiveSkill::Focus,
        CognitiveSkill::Retention,
    ];
}

impl fmt::Display for CognitiveSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CognitiveSkill::Comprehension => write!(f, "Comprehension"),
            CognitiveSkill::Attention => write!(f, "Attention"),
            CognitiveSkill::Focus => write!(f, "Focus"),
            CognitiveSkill::Retention => write!(f, "Retention"),
        }
    }
}

/// The four cognitive scores of a student, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CognitiveScores {
    pub comprehension: f64,
    pub attention: f64,
    pub focus: f64,
    pub retention: f64,
}

impl CognitiveScores {
    pub fn get(&self, skill: CognitiveSkill) -> f64 {
        match skill {
            CognitiveSkill::Comprehension => self.comprehension,
            CognitiveSkill::Attention => self.attention,
            CognitiveSkill::Focus => self.focus,
            CognitiveSkill::Retention => self.retention,
        }
    }

    /// Scores as a feature vector in [`CognitiveSkill::ALL`] order.
    pub fn to_array(&self) -> [f64; 4] {
        [self.comprehension, self.attention, self.focus, self.retention]
    }

    /// Skills ordered from highest to lowest score.
    ///
    /// The sort is stable, so equal scores keep the order of
    /// [`CognitiveSkill::ALL`].
    pub fn ranked(&self) -> [CognitiveSkill; 4] {
        let mut skills = CognitiveSkill::ALL;
        skills.sort_by(|a, b| self.get(*b).total_cmp(&self.get(*a)));
        skills
    }

    /// The two highest-scoring skills.
    pub fn strengths(&self) -> Vec<CognitiveSkill> {
        self.ranked()[..2].to_vec()
    }

    /// The two lowest-scoring skills, in descending score order.
    pub fn improvement_areas(&self) -> Vec<CognitiveSkill> {
        self.ranked()[2..].to_vec()
    }
}

/// Preferred mode of learning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LearningStyle {
    Visual,
    Auditory,
    Kinesthetic,
    #[serde(rename = "Reading/Writing")]
    ReadingWriting,
}

impl LearningStyle {
    pub const ALL: [LearningStyle; 4] = [
        LearningStyle::Visual,
        LearningStyle::Auditory,
        LearningStyle::Kinesthetic,
        LearningStyle::ReadingWriting,
    ];
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LearningStyle::Visual => write!(f, "Visual"),
            LearningStyle::Auditory => write!(f, "Auditory"),
            LearningStyle::Kinesthetic => write!(f, "Kinesthetic"),
            LearningStyle::ReadingWriting => write!(f, "Reading/Writing"),
        }
    }
}

/// School subject a student gravitates towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Mathematics,
    Science,
    Literature,
    Art,
    Music,
    #[serde(rename = "Physical Education")]
    PhysicalEducation,
    History,
    #[serde(rename = "Social Studies")]
    SocialStudies,
    Languages,
}

impl Subject {
    /// Candidate subjects for a cognitive profile.
    ///
    /// Strong comprehension (> 80) wins over strong attention (> 75).
    pub fn candidates(scores: &CognitiveScores) -> [Subject; 3] {
        if scores.comprehension > 80.0 {
            [Subject::Mathematics, Subject::Science, Subject::Literature]
        } else if scores.attention > 75.0 {
            [Subject::Art, Subject::Music, Subject::PhysicalEducation]
        } else {
            [Subject::History, Subject::SocialStudies, Subject::Languages]
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Subject::Mathematics => "Mathematics",
            Subject::Science => "Science",
            Subject::Literature => "Literature",
            Subject::Art => "Art",
            Subject::Music => "Music",
            Subject::PhysicalEducation => "Physical Education",
            Subject::History => "History",
            Subject::SocialStudies => "Social Studies",
            Subject::Languages => "Languages",
        };
        f.write_str(name)
    }
}

/// One synthetic student.
///
/// Field order matches the exported column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub age: u32,
    pub comprehension: f64,
    pub attention: f64,
    pub focus: f64,
    pub retention: f64,
    pub assessment_score: f64,
    pub engagement_time: f64,
    pub study_hours_per_week: f64,
    pub attendance_rate: f64,
    pub learning_style: LearningStyle,
    pub preferred_subject: Subject,
    pub improvement_areas: Vec<CognitiveSkill>,
    pub strengths: Vec<CognitiveSkill>,
}

/// Numeric columns of the record table, in export order.
pub const NUMERIC_COLUMNS: [&str; 9] = [
    "age",
    "comprehension",
    "attention",
    "focus",
    "retention",
    "assessment_score",
    "engagement_time",
    "study_hours_per_week",
    "attendance_rate",
];

impl StudentRecord {
    /// The record's four cognitive scores.
    pub fn scores(&self) -> CognitiveScores {
        CognitiveScores {
            comprehension: self.comprehension,
            attention: self.attention,
            focus: self.focus,
            retention: self.retention,
        }
    }

    /// Look up a numeric column by name.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        let value = match column {
            "age" => self.age as f64,
            "comprehension" => self.comprehension,
            "attention" => self.attention,
            "focus" => self.focus,
            "retention" => self.retention,
            "assessment_score" => self.assessment_score,
            "engagement_time" => self.engagement_time,
            "study_hours_per_week" => self.study_hours_per_week,
            "attendance_rate" => self.attendance_rate,
            _ => return None,
        };
        Some(value)
    }

    /// Check bounds and the strengths/improvement-areas invariants.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let bounded = [
            ("comprehension", self.comprehension, 0.0, 100.0),
            ("attention", self.attention, 0.0, 100.0),
            ("focus", self.focus, 0.0, 100.0),
            ("retention", self.retention, 0.0, 100.0),
            ("assessment_score", self.assessment_score, 0.0, 100.0),
            ("engagement_time", self.engagement_time, 10.0, 90.0),
            ("study_hours_per_week", self.study_hours_per_week, 2.0, 25.0),
            ("attendance_rate", self.attendance_rate, 60.0, 100.0),
        ];
        for (column, value, lo, hi) in bounded {
            if !(lo..=hi).contains(&value) {
                return Err(self.invalid(format!("{column} = {value} outside [{lo}, {hi}]")));
            }
        }

        if self.strengths.len() != 2 || self.improvement_areas.len() != 2 {
            return Err(self.invalid("strengths and improvement areas must hold two skills each"));
        }
        if self
            .strengths
            .iter()
            .any(|s| self.improvement_areas.contains(s))
        {
            return Err(self.invalid("strengths overlap improvement areas"));
        }
        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> PipelineError {
        PipelineError::InvalidRecord {
            student_id: self.student_id.clone(),
            reason: reason.into(),
        }
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}


#[cfg(test)]
mod tests {
    use super::*;

    fn scores(c: f64, a: f64, f: f64, r: f64) -> CognitiveScores {
        CognitiveScores {
            comprehension: c,
            attention: a,
            focus: f,
            retention: r,
        }
    }

    #[test]
    fn ranking_breaks_ties_by_fixed_order() {
        let s = scores(70.0, 70.0, 70.0, 70.0);
        assert_eq!(s.ranked(), CognitiveSkill::ALL);
        assert_eq!(
            s.strengths(),
            vec![CognitiveSkill::Comprehension, CognitiveSkill::Attention]
        );
        assert_eq!(
            s.improvement_areas(),
            vec![CognitiveSkill::Focus, CognitiveSkill::Retention]
        );
    }

    #[test]
    fn ranking_orders_by_score() {
        let s = scores(60.0, 90.0, 50.0, 80.0);
        assert_eq!(
            s.strengths(),
            vec![CognitiveSkill::Attention, CognitiveSkill::Retention]
        );
        assert_eq!(
            s.improvement_areas(),
            vec![CognitiveSkill::Comprehension, CognitiveSkill::Focus]
        );
    }

    #[test]
    fn partial_tie_keeps_fixed_order() {
        let s = scores(50.0, 80.0, 80.0, 50.0);
        assert_eq!(
            s.strengths(),
            vec![CognitiveSkill::Attention, CognitiveSkill::Focus]
        );
        assert_eq!(
            s.improvement_areas(),
            vec![CognitiveSkill::Comprehension, CognitiveSkill::Retention]
        );
    }

    #[test]
    fn subject_candidates_follow_thresholds() {
        assert_eq!(
            Subject::candidates(&scores(85.0, 90.0, 0.0, 0.0))[0],
            Subject::Mathematics
        );
        assert_eq!(
            Subject::candidates(&scores(80.0, 76.0, 0.0, 0.0))[0],
            Subject::Art
        );
        assert_eq!(
            Subject::candidates(&scores(80.0, 75.0, 0.0, 0.0))[0],
            Subject::History
        );
    }

    #[test]
    fn record_serializes_with_export_names() {
        let rec = fixtures::record(7, [80.0, 60.0, 70.0, 90.0], 72.5);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["student_id"], "STU007");
        assert_eq!(json["class"], "10A");
        assert_eq!(json["learning_style"], "Visual");
        assert_eq!(json["strengths"][0], "Retention");
        assert_eq!(json["improvement_areas"][1], "Attention");
        let style = serde_json::to_value(LearningStyle::ReadingWriting).unwrap();
        assert_eq!(style, "Reading/Writing");
        let subject = serde_json::to_value(Subject::SocialStudies).unwrap();
        assert_eq!(subject, "Social Studies");
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let mut rec = fixtures::record(1, [80.0, 60.0, 70.0, 90.0], 72.5);
        assert!(rec.validate().is_ok());
        rec.engagement_time = 95.0;
        let err = rec.validate().unwrap_err();
        assert!(err.to_string().contains("engagement_time"));
    }

    #[test]
    fn validate_rejects_overlapping_skills() {
        let mut rec = fixtures::record(1, [80.0, 60.0, 70.0, 90.0], 72.5);
        rec.improvement_areas = vec![CognitiveSkill::Retention, CognitiveSkill::Attention];
        assert!(rec.validate().is_err());
    }

    #[test]
    fn numeric_column_lookup() {
        let rec = fixtures::record(1, [80.0, 60.0, 70.0, 90.0], 72.5);
        for column in NUMERIC_COLUMNS {
            assert!(rec.numeric(column).is_some(), "missing column {column}");
        }
        assert_eq!(rec.numeric("focus"), Some(70.0));
        assert_eq!(rec.numeric("name"), None);
    }

    #[test]
    fn skill_display() {
        assert_eq!(CognitiveSkill::Retention.to_string(), "Retention");
    }

    #[test]
    fn round_to_one_decimal() {
        assert_eq!(round1(72.34), 72.3);
        assert_eq!(round1(72.36), 72.4);
        assert_eq!(round1(0.0), 0.0);
    }
}
