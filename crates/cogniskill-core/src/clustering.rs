//! Learning-persona clustering.
//!
//! k-means over the four cognitive scores with seeded k-means++ seeding and
//! several restarts. Raw k-means labels are arbitrary, so clusters are
//! renumbered by mean assessment score (highest first) before the fixed
//! persona names are attached.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::model::StudentRecord;

/// Number of personas in the primary analysis.
pub const PERSONA_COUNT: usize = 4;

/// Persona names indexed by relabelled cluster id.
pub const PERSONA_NAMES: [&str; PERSONA_COUNT] = [
    "Comprehensive Thinkers",
    "Balanced Achievers",
    "Attention-Focused Learners",
    "High-Potential Strugglers",
];

/// Range of k evaluated for the elbow curve.
pub const ELBOW_RANGE: std::ops::RangeInclusive<usize> = 2..=7;

const STAGE: &str = "clustering";

/// k-means parameters.
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    pub k: usize,
    /// Independent restarts; the lowest inertia wins.
    pub n_init: usize,
    pub max_iter: usize,
    /// Convergence threshold on the summed squared centroid shift.
    pub tol: f64,
    pub seed: u64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: PERSONA_COUNT,
            n_init: 10,
            max_iter: 300,
            tol: 1e-4,
            seed: 42,
        }
    }
}

/// Result of a k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    pub centroids: Vec<Vec<f64>>,
    pub labels: Vec<usize>,
    /// Sum of squared distances to the assigned centroid.
    pub inertia: f64,
    pub iterations: usize,
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = squared_distance(point, c);
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

/// Run k-means. Every one of the `k` labels is used in the result.
pub fn kmeans(points: &[Vec<f64>], config: &KMeansConfig) -> Result<KMeansFit, PipelineError> {
    if config.k == 0 {
        return Err(PipelineError::InvalidConfig("k must be at least 1".into()));
    }
    if points.len() < config.k {
        return Err(PipelineError::insufficient(
            STAGE,
            format!("{} records for {} clusters", points.len(), config.k),
        ));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut best: Option<KMeansFit> = None;
    for run in 0..config.n_init.max(1) {
        let fit = lloyd(points, config, &mut rng);
        tracing::debug!(run, inertia = fit.inertia, iterations = fit.iterations, "k-means run");
        if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
            best = Some(fit);
        }
    }
    best.ok_or_else(|| PipelineError::insufficient(STAGE, "no k-means runs"))
}

/// k-means++ seeding.
fn init_centroids<R: Rng + ?Sized>(points: &[Vec<f64>], k: usize, rng: &mut R) -> Vec<Vec<f64>> {
    let mut centroids = vec![points[rng.gen_range(0..points.len())].clone()];
    while centroids.len() < k {
        let weights: Vec<f64> = points
            .iter()
            .map(|p| {
                centroids
                    .iter()
                    .map(|c| squared_distance(p, c))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        // All-zero weights mean every point coincides with a centroid.
        let next = match WeightedIndex::new(&weights) {
            Ok(dist) => dist.sample(rng),
            Err(_) => rng.gen_range(0..points.len()),
        };
        centroids.push(points[next].clone());
    }
    centroids
}

fn assign(points: &[Vec<f64>], centroids: &[Vec<f64>], labels: &mut [usize]) {
    for (label, p) in labels.iter_mut().zip(points) {
        *label = nearest(p, centroids);
    }
}

/// Move the farthest point of a multi-member cluster into each empty one.
fn repair_empty(points: &[Vec<f64>], centroids: &mut [Vec<f64>], labels: &mut [usize]) {
    let k = centroids.len();
    let mut counts = vec![0usize; k];
    for &l in labels.iter() {
        counts[l] += 1;
    }
    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }
        let donor = labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| counts[l] > 1)
            .map(|(i, &l)| (i, squared_distance(&points[i], &centroids[l])))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i);
        if let Some(i) = donor {
            counts[labels[i]] -= 1;
            labels[i] = empty;
            counts[empty] = 1;
            centroids[empty] = points[i].clone();
        }
    }
}

fn means(points: &[Vec<f64>], labels: &[usize], k: usize) -> Vec<Vec<f64>> {
    let dims = points[0].len();
    let mut sums = vec![vec![0.0; dims]; k];
    let mut counts = vec![0usize; k];
    for (p, &l) in points.iter().zip(labels) {
        counts[l] += 1;
        for (s, v) in sums[l].iter_mut().zip(p) {
            *s += v;
        }
    }
    for (sum, count) in sums.iter_mut().zip(counts) {
        let n = count.max(1) as f64;
        sum.iter_mut().for_each(|s| *s /= n);
    }
    sums
}

fn lloyd<R: Rng + ?Sized>(points: &[Vec<f64>], config: &KMeansConfig, rng: &mut R) -> KMeansFit {
    let mut centroids = init_centroids(points, config.k, rng);
    let mut labels = vec![0usize; points.len()];
    let mut iterations = 0;

    for _ in 0..config.max_iter {
        iterations += 1;
        assign(points, &centroids, &mut labels);
        repair_empty(points, &mut centroids, &mut labels);
        let updated = means(points, &labels, config.k);
        let shift: f64 = centroids
            .iter()
            .zip(&updated)
            .map(|(a, b)| squared_distance(a, b))
            .sum();
        centroids = updated;
        if shift <= config.tol {
            break;
        }
    }

    assign(points, &centroids, &mut labels);
    repair_empty(points, &mut centroids, &mut labels);
    let centroids = means(points, &labels, config.k);
    let inertia = points
        .iter()
        .zip(&labels)
        .map(|(p, &l)| squared_distance(p, &centroids[l]))
        .sum();

    KMeansFit {
        centroids,
        labels,
        inertia,
        iterations,
    }
}

/// Mean values of one persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaStats {
    pub comprehension: f64,
    pub attention: f64,
    pub focus: f64,
    pub retention: f64,
    pub assessment_score: f64,
    pub engagement_time: f64,
}

/// A named cluster of students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub id: usize,
    pub name: String,
    pub stats: PersonaStats,
    pub student_count: usize,
}

/// Which persona a student belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaAssignment {
    pub student_id: String,
    pub persona_id: usize,
}

/// Inertia of the best fit for one value of k.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElbowPoint {
    pub k: usize,
    pub inertia: f64,
}

/// Output of the persona stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaReport {
    pub personas: Vec<Persona>,
    /// One entry per record, in record order.
    pub assignments: Vec<PersonaAssignment>,
    pub inertia: f64,
    pub elbow: Vec<ElbowPoint>,
}

/// Cognitive-score feature vectors of the records.
pub fn cluster_features(records: &[StudentRecord]) -> Vec<Vec<f64>> {
    records.iter().map(|r| r.scores().to_array().to_vec()).collect()
}

/// Inertia for each k in [`ELBOW_RANGE`] that the data can support.
pub fn elbow_curve(points: &[Vec<f64>], seed: u64) -> Result<Vec<ElbowPoint>, PipelineError> {
    ELBOW_RANGE
        .filter(|&k| k <= points.len())
        .map(|k| {
            let config = KMeansConfig {
                k,
                seed,
                ..Default::default()
            };
            Ok(ElbowPoint {
                k,
                inertia: kmeans(points, &config)?.inertia,
            })
        })
        .collect()
}

fn persona_stats(members: &[&StudentRecord]) -> PersonaStats {
    let n = members.len().max(1) as f64;
    let avg = |f: fn(&StudentRecord) -> f64| members.iter().map(|r| f(r)).sum::<f64>() / n;
    PersonaStats {
        comprehension: avg(|r| r.comprehension),
        attention: avg(|r| r.attention),
        focus: avg(|r| r.focus),
        retention: avg(|r| r.retention),
        assessment_score: avg(|r| r.assessment_score),
        engagement_time: avg(|r| r.engagement_time),
    }
}

/// Cluster records into the fixed set of personas.
pub fn assign_personas(
    records: &[StudentRecord],
    seed: u64,
) -> Result<PersonaReport, PipelineError> {
    let points = cluster_features(records);
    let fit = kmeans(
        &points,
        &KMeansConfig {
            seed,
            ..Default::default()
        },
    )?;

    // Renumber clusters by mean assessment score, highest first; raw label
    // breaks ties.
    let mut groups: Vec<Vec<&StudentRecord>> = vec![Vec::new(); PERSONA_COUNT];
    for (record, &label) in records.iter().zip(&fit.labels) {
        groups[label].push(record);
    }
    let raw_stats: Vec<PersonaStats> = groups.iter().map(|g| persona_stats(g)).collect();
    let mut order: Vec<usize> = (0..PERSONA_COUNT).collect();
    order.sort_by(|&a, &b| {
        raw_stats[b]
            .assessment_score
            .total_cmp(&raw_stats[a].assessment_score)
            .then(a.cmp(&b))
    });
    let mut relabel = [0usize; PERSONA_COUNT];
    for (rank, &raw) in order.iter().enumerate() {
        relabel[raw] = rank;
    }

    let personas: Vec<Persona> = order
        .iter()
        .enumerate()
        .map(|(rank, &raw)| Persona {
            id: rank,
            name: PERSONA_NAMES[rank].to_string(),
            stats: raw_stats[raw].clone(),
            student_count: groups[raw].len(),
        })
        .collect();

    let assignments = records
        .iter()
        .zip(&fit.labels)
        .map(|(r, &label)| PersonaAssignment {
            student_id: r.student_id.clone(),
            persona_id: relabel[label],
        })
        .collect();

    let elbow = elbow_curve(&points, seed)?;

    for p in &personas {
        tracing::info!(
            persona = %p.name,
            students = p.student_count,
            assessment = p.stats.assessment_score,
            "persona identified"
        );
    }

    Ok(PersonaReport {
        personas,
        assignments,
        inertia: fit.inertia,
        elbow,
    })
}
