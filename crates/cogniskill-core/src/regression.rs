//! Assessment-score regression.
//!
//! Ordinary least squares on a seeded train/test split. Fit-quality metrics
//! are only ever computed on the held-out partition.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::model::StudentRecord;

/// Predictor columns, in coefficient order.
pub const FEATURES: [&str; 5] = [
    "comprehension",
    "attention",
    "focus",
    "retention",
    "engagement_time",
];

/// Column being predicted.
pub const TARGET: &str = "assessment_score";

const STAGE: &str = "regression";

/// Row indices of the two partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with `seed` and hold out `ceil(n * test_fraction)` rows.
///
/// Both partitions are returned in ascending index order.
pub fn train_test_split(
    n: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit, PipelineError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PipelineError::InvalidConfig(format!(
            "test_fraction must be in (0, 1), got {test_fraction}"
        )));
    }
    // The epsilon keeps exact products such as 200 * 0.2 from rounding up.
    let n_test = ((n as f64 * test_fraction) - 1e-9).ceil().max(0.0) as usize;
    if n_test == 0 || n_test >= n {
        return Err(PipelineError::insufficient(
            STAGE,
            format!("{n} records cannot fill both a train and a test partition"),
        ));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let mut test = indices[..n_test].to_vec();
    let mut train = indices[n_test..].to_vec();
    test.sort_unstable();
    train.sort_unstable();
    Ok(TrainTestSplit { train, test })
}

/// A fitted linear model `y = Σ wᵢ·xᵢ + b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    /// Least-squares fit with intercept.
    ///
    /// Solves the centred normal equations, which keeps the system well
    /// conditioned for features on a 0–100 scale.
    pub fn fit(x: &[Vec<f64>], y: &[f64]) -> Result<Self, PipelineError> {
        let Some(p) = x.first().map(Vec::len) else {
            return Err(PipelineError::insufficient(STAGE, "no training rows"));
        };
        if x.len() != y.len() {
            return Err(PipelineError::InvalidConfig(format!(
                "{} feature rows but {} targets",
                x.len(),
                y.len()
            )));
        }
        if x.len() < p + 1 {
            return Err(PipelineError::insufficient(
                STAGE,
                format!("{} training rows for {p} features", x.len()),
            ));
        }

        let n = x.len() as f64;
        let x_mean: Vec<f64> = (0..p)
            .map(|j| x.iter().map(|row| row[j]).sum::<f64>() / n)
            .collect();
        let y_mean = y.iter().sum::<f64>() / n;

        let mut xtx = vec![vec![0.0; p]; p];
        let mut xty = vec![0.0; p];
        for (row, &target) in x.iter().zip(y) {
            let centred: Vec<f64> = row.iter().zip(&x_mean).map(|(v, m)| v - m).collect();
            let dy = target - y_mean;
            for i in 0..p {
                xty[i] += centred[i] * dy;
                for j in 0..p {
                    xtx[i][j] += centred[i] * centred[j];
                }
            }
        }

        let coefficients = solve(xtx, xty)?;
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_mean)
                .map(|(w, m)| w * m)
                .sum::<f64>();

        Ok(Self {
            coefficients,
            intercept,
        })
    }

    pub fn predict(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

/// Solve `a · w = b` by Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, PipelineError> {
    let n = b.len();
    let scale = a
        .iter()
        .enumerate()
        .map(|(i, row)| row[i].abs())
        .fold(0.0, f64::max);
    let tolerance = scale.max(1.0) * 1e-12;

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() <= tolerance {
            return Err(PipelineError::SingularSystem(format!(
                "feature {col} is constant or collinear with the others"
            )));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut w = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * w[k]).sum();
        w[row] = (b[row] - tail) / a[row][row];
    }
    Ok(w)
}

/// Fit-quality metrics on held-out data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitMetrics {
    /// Coefficient of determination; `None` if the targets are constant.
    pub r2_score: Option<f64>,
    pub mae: f64,
    pub mse: f64,
}

/// Compare predictions against the true targets.
pub fn evaluate(y_true: &[f64], y_pred: &[f64]) -> FitMetrics {
    let n = y_true.len().max(1) as f64;
    let mean = y_true.iter().sum::<f64>() / n;
    let mut abs_err = 0.0;
    let mut sq_err = 0.0;
    let mut total = 0.0;
    for (t, p) in y_true.iter().zip(y_pred) {
        abs_err += (t - p).abs();
        sq_err += (t - p).powi(2);
        total += (t - mean).powi(2);
    }
    FitMetrics {
        r2_score: (total > 0.0).then(|| 1.0 - sq_err / total),
        mae: abs_err / n,
        mse: sq_err / n,
    }
}

/// The fitted assessment-score model and its held-out metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionModel {
    pub feature_names: Vec<String>,
    pub model: LinearModel,
    pub metrics: FitMetrics,
    pub train_size: usize,
    pub test_size: usize,
}

impl RegressionModel {
    /// Coefficient for a named feature.
    pub fn coefficient(&self, feature: &str) -> Option<f64> {
        let i = self.feature_names.iter().position(|f| f == feature)?;
        self.model.coefficients.get(i).copied()
    }
}

fn feature_row(record: &StudentRecord) -> Vec<f64> {
    FEATURES
        .iter()
        .map(|f| record.numeric(f).unwrap_or_default())
        .collect()
}

fn target(record: &StudentRecord) -> f64 {
    record.assessment_score
}

/// Split, fit on the training rows, and evaluate on the test rows.
pub fn fit_assessment_model(
    records: &[StudentRecord],
    test_fraction: f64,
    seed: u64,
) -> Result<RegressionModel, PipelineError> {
    let split = train_test_split(records.len(), test_fraction, seed)?;

    let x_train: Vec<Vec<f64>> = split.train.iter().map(|&i| feature_row(&records[i])).collect();
    let y_train: Vec<f64> = split.train.iter().map(|&i| target(&records[i])).collect();
    let model = LinearModel::fit(&x_train, &y_train)?;

    let y_test: Vec<f64> = split.test.iter().map(|&i| target(&records[i])).collect();
    let y_pred: Vec<f64> = split
        .test
        .iter()
        .map(|&i| model.predict(&feature_row(&records[i])))
        .collect();
    let metrics = evaluate(&y_test, &y_pred);

    tracing::info!(
        train = split.train.len(),
        test = split.test.len(),
        r2 = ?metrics.r2_score,
        mae = metrics.mae,
        "fitted assessment model"
    );

    Ok(RegressionModel {
        feature_names: FEATURES.iter().map(|f| f.to_string()).collect(),
        model,
        metrics,
        train_size: split.train.len(),
        test_size: split.test.len(),
    })
}
