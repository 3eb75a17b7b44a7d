//! Derived metric calculator.
//!
//! Everything a record carries beyond its four cognitive scores is a function
//! of those scores plus noise drawn from the caller's RNG.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::model::{round1, CognitiveScores, CognitiveSkill, LearningStyle, Subject};

/// Weights of the assessment score model, in [`CognitiveSkill::ALL`] order
/// followed by engagement time.
pub const ASSESSMENT_WEIGHTS: [f64; 5] = [0.25, 0.20, 0.20, 0.25, 0.10];

/// Metrics computed from a cognitive profile.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub engagement_time: f64,
    pub assessment_score: f64,
    pub study_hours_per_week: f64,
    pub attendance_rate: f64,
    pub learning_style: LearningStyle,
    pub preferred_subject: Subject,
    pub strengths: Vec<CognitiveSkill>,
    pub improvement_areas: Vec<CognitiveSkill>,
}

/// Draw from `N(mean, sd)`.
pub(crate) fn normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, sd: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + sd * z
}

/// Compute all derived metrics for one student.
///
/// `scores` are the unrounded cognitive scores; numeric outputs are rounded
/// to one decimal. Skill rankings use the rounded scores so they agree with
/// the exported table.
pub fn derive<R: Rng + ?Sized>(scores: &CognitiveScores, rng: &mut R) -> DerivedMetrics {
    let engagement_base = (scores.attention + scores.focus) / 2.0;
    let engagement_time = normal(rng, engagement_base * 0.6 + 15.0, 8.0).clamp(10.0, 90.0);

    let [wc, wa, wf, wr, we] = ASSESSMENT_WEIGHTS;
    let assessment_score = (wc * scores.comprehension
        + wa * scores.attention
        + wf * scores.focus
        + wr * scores.retention
        + we * engagement_time
        + normal(rng, 0.0, 6.0))
    .clamp(0.0, 100.0);

    let study_hours_per_week = normal(rng, engagement_time * 0.15 + 5.0, 3.0).clamp(2.0, 25.0);
    let attendance_rate =
        normal(rng, 85.0 + (assessment_score - 70.0) * 0.3, 8.0).clamp(60.0, 100.0);

    let learning_style = *LearningStyle::ALL
        .choose(rng)
        .unwrap_or(&LearningStyle::Visual);
    let preferred_subject = *Subject::candidates(scores)
        .choose(rng)
        .unwrap_or(&Subject::History);

    let rounded = CognitiveScores {
        comprehension: round1(scores.comprehension),
        attention: round1(scores.attention),
        focus: round1(scores.focus),
        retention: round1(scores.retention),
    };

    DerivedMetrics {
        engagement_time: round1(engagement_time),
        assessment_score: round1(assessment_score),
        study_hours_per_week: round1(study_hours_per_week),
        attendance_rate: round1(attendance_rate),
        learning_style,
        preferred_subject,
        strengths: rounded.strengths(),
        improvement_areas: rounded.improvement_areas(),
    }
}
