//! Seeded synthetic student generator.
//!
//! Each record shares a "base ability" draw across its cognitive scores, which
//! is what gives the correlation and clustering stages something to find.
//! A single `StdRng` drives every draw in a fixed order, so the same seed and
//! record count always produce the same table.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::{validate_class_weights, ClassWeight};
use crate::derived::{derive, normal};
use crate::error::PipelineError;
use crate::model::{round1, CognitiveScores, StudentRecord};

const FIRST_NAMES: &[&str] = &[
    "Emma", "Liam", "Olivia", "Noah", "Ava", "Ethan", "Sophia", "Mason", "Isabella", "William",
    "Mia", "James", "Charlotte", "Benjamin", "Amelia", "Lucas", "Harper", "Henry", "Evelyn",
    "Alexander", "Abigail", "Michael", "Emily", "Daniel", "Elizabeth", "Jacob", "Sofia", "Logan",
    "Avery", "Jackson", "Ella", "Levi", "Madison", "Sebastian", "Scarlett", "Mateo", "Victoria",
    "Jack", "Aria", "Owen", "Grace", "Theodore", "Chloe", "Aiden", "Camila", "Samuel", "Penelope",
    "Joseph", "Riley", "John", "Layla", "David", "Lillian", "Wyatt", "Nora", "Matthew", "Zoey",
    "Luke", "Mila", "Asher", "Aubrey", "Carter", "Hannah", "Julian", "Lily", "Grayson", "Addison",
    "Leo", "Eleanor", "Jayden", "Natalie", "Gabriel", "Luna", "Isaac", "Savannah", "Oliver",
    "Brooklyn", "Jonathan", "Leah", "Ezra", "Zoe", "Thomas", "Stella", "Charles", "Hazel",
    "Christopher", "Ellie", "Jaxon", "Paisley", "Maverick",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King", "Wright",
    "Scott", "Torres", "Nguyen", "Hill", "Flores", "Green", "Adams", "Nelson", "Baker", "Hall",
    "Rivera", "Campbell", "Mitchell", "Carter", "Roberts",
];

/// Categorical sampler over class sections.
///
/// Construction validates the weights, so an invalid vector never reaches
/// the sampling loop.
#[derive(Debug, Clone)]
pub struct ClassSampler {
    classes: Vec<(String, u32)>,
    index: WeightedIndex<f64>,
}

impl ClassSampler {
    pub fn new(classes: &[ClassWeight]) -> Result<Self, PipelineError> {
        validate_class_weights(classes)?;
        let index = WeightedIndex::new(classes.iter().map(|c| c.weight))
            .map_err(|e| PipelineError::InvalidWeights(e.to_string()))?;
        let classes = classes
            .iter()
            .map(|c| {
                let grade = c.grade().ok_or_else(|| {
                    PipelineError::InvalidConfig(format!("class '{}' has no grade", c.name))
                })?;
                Ok((c.name.clone(), grade))
            })
            .collect::<Result<Vec<_>, PipelineError>>()?;
        Ok(Self { classes, index })
    }

    /// Draw a class name and its grade.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (&str, u32) {
        let (name, grade) = &self.classes[self.index.sample(rng)];
        (name, *grade)
    }
}

/// Format the sequential identifier for the `index`-th student (1-based).
pub fn student_id(index: usize) -> String {
    format!("STU{index:03}")
}

/// Draw the four correlated cognitive scores (unrounded, clipped to [0, 100]).
pub fn cognitive_profile<R: Rng + ?Sized>(rng: &mut R) -> CognitiveScores {
    let base = normal(rng, 75.0, 12.0);

    let comprehension_mean = base + normal(rng, 0.0, 8.0);
    let comprehension = normal(rng, comprehension_mean, 10.0).clamp(0.0, 100.0);

    let attention_mean = base + normal(rng, -5.0, 10.0);
    let attention = normal(rng, attention_mean, 12.0).clamp(0.0, 100.0);

    let focus_mean = attention + normal(rng, 2.0, 8.0);
    let focus = normal(rng, focus_mean, 10.0).clamp(0.0, 100.0);

    let retention_mean = comprehension + normal(rng, -3.0, 9.0);
    let retention = normal(rng, retention_mean, 11.0).clamp(0.0, 100.0);

    CognitiveScores {
        comprehension,
        attention,
        focus,
        retention,
    }
}

/// Generate `count` student records from `seed`.
pub fn generate(
    count: usize,
    seed: u64,
    classes: &[ClassWeight],
) -> Result<Vec<StudentRecord>, PipelineError> {
    if count == 0 {
        return Err(PipelineError::InvalidRecordCount(count));
    }
    let sampler = ClassSampler::new(classes)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let records = (1..=count)
        .map(|i| generate_one(i, &sampler, &mut rng))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(count, seed, "generated student records");
    Ok(records)
}

fn generate_one(
    index: usize,
    sampler: &ClassSampler,
    rng: &mut StdRng,
) -> Result<StudentRecord, PipelineError> {
    let scores = cognitive_profile(rng);
    let metrics = derive(&scores, rng);

    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Student");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or_default();
    let (class_name, grade) = sampler.sample(rng);
    let age_offset: i64 = rng.gen_range(-1..=1);
    let age = (grade as i64 + 5 + age_offset).max(0) as u32;

    let record = StudentRecord {
        student_id: student_id(index),
        name: format!("{first} {last}"),
        class_name: class_name.to_string(),
        age,
        comprehension: round1(scores.comprehension),
        attention: round1(scores.attention),
        focus: round1(scores.focus),
        retention: round1(scores.retention),
        assessment_score: metrics.assessment_score,
        engagement_time: metrics.engagement_time,
        study_hours_per_week: metrics.study_hours_per_week,
        attendance_rate: metrics.attendance_rate,
        learning_style: metrics.learning_style,
        preferred_subject: metrics.preferred_subject,
        improvement_areas: metrics.improvement_areas,
        strengths: metrics.strengths,
    };
    record.validate()?;
    Ok(record)
}
