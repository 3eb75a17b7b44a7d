//! Pipeline orchestrator.
//!
//! Runs generation, then the three analysis stages, over an explicit
//! [`PipelineContext`]. Nothing is shared between runs.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::clustering::{assign_personas, PersonaReport};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::generator::generate;
use crate::model::{StudentRecord, NUMERIC_COLUMNS};
use crate::regression::{fit_assessment_model, RegressionModel, TARGET};
use crate::statistics::{correlation_matrix, describe, ColumnSummary, CorrelationMatrix};
use crate::summary::{summarize, DashboardSummary};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generate,
    Describe,
    Regression,
    Clustering,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Generate => write!(f, "generate"),
            Stage::Describe => write!(f, "describe"),
            Stage::Regression => write!(f, "regression"),
            Stage::Clustering => write!(f, "clustering"),
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter {
    fn on_stage_start(&self, stage: Stage);
    fn on_stage_complete(&self, stage: Stage, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_stage_start(&self, _: Stage) {}
    fn on_stage_complete(&self, _: Stage, _: Duration) {}
}

/// Everything a run needs, passed explicitly to every stage.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    config: PipelineConfig,
}

impl PipelineContext {
    /// Validate the configuration and build a context.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Seed shared by every stage. Each stage builds its own generator
    /// from it.
    pub fn seed(&self) -> u64 {
        self.config.seed
    }
}

/// Generated table plus its dashboard summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub records: Vec<StudentRecord>,
    pub summary: DashboardSummary,
}

/// Output of the analysis stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub descriptive: Vec<ColumnSummary>,
    pub correlation: CorrelationMatrix,
    /// Correlation of every other column with the assessment score.
    pub assessment_correlations: Vec<(String, Option<f64>)>,
    pub regression: RegressionModel,
    pub personas: PersonaReport,
}

/// Complete result of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub dataset: Dataset,
    pub analysis: Analysis,
}

fn timed<T>(
    stage: Stage,
    progress: &dyn ProgressReporter,
    f: impl FnOnce() -> Result<T, PipelineError>,
) -> Result<T, PipelineError> {
    progress.on_stage_start(stage);
    let start = Instant::now();
    let out = f()?;
    let elapsed = start.elapsed();
    tracing::debug!(%stage, elapsed_ms = elapsed.as_millis() as u64, "stage complete");
    progress.on_stage_complete(stage, elapsed);
    Ok(out)
}

/// Generate the record table and its summary.
pub fn run_generation(
    ctx: &PipelineContext,
    progress: &dyn ProgressReporter,
) -> Result<Dataset, PipelineError> {
    timed(Stage::Generate, progress, || {
        let config = ctx.config();
        let records = generate(config.students, ctx.seed(), &config.classes)?;
        let summary = summarize(&records);
        Ok(Dataset { records, summary })
    })
}

/// Run the descriptive, regression, and clustering stages.
pub fn run_analysis(
    ctx: &PipelineContext,
    records: &[StudentRecord],
    progress: &dyn ProgressReporter,
) -> Result<Analysis, PipelineError> {
    let (descriptive, correlation) = timed(Stage::Describe, progress, || {
        Ok((describe(records), correlation_matrix(records, &NUMERIC_COLUMNS)))
    })?;
    let assessment_correlations = correlation.ranked_against(TARGET);

    let regression = timed(Stage::Regression, progress, || {
        fit_assessment_model(
            records,
            ctx.config().test_fraction,
            ctx.seed(),
        )
    })?;

    let personas = timed(Stage::Clustering, progress, || {
        assign_personas(records, ctx.seed())
    })?;

    Ok(Analysis {
        descriptive,
        correlation,
        assessment_correlations,
        regression,
        personas,
    })
}

/// Run the whole pipeline once.
pub fn run(
    ctx: &PipelineContext,
    progress: &dyn ProgressReporter,
) -> Result<PipelineOutput, PipelineError> {
    let start = Instant::now();
    let dataset = run_generation(ctx, progress)?;
    let analysis = run_analysis(ctx, &dataset.records, progress)?;
    tracing::info!(
        students = dataset.records.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "pipeline complete"
    );
    Ok(PipelineOutput { dataset, analysis })
}
