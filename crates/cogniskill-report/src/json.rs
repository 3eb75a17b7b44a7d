//! JSON artifacts.
//!
//! The record table and dashboard summary serialize straight from the core
//! types. The model and persona files are reshaped into the layout the
//! dashboard reads.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;

use cogniskill_core::clustering::{PersonaReport, PersonaStats};
use cogniskill_core::pipeline::Analysis;
use cogniskill_core::regression::RegressionModel;

use crate::atomic::write_atomic;

/// Pretty-print `value` to `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {}", path.display()))?;
    json.push('\n');
    write_atomic(path, json.as_bytes())
}

/// Build the `model_data.json` document.
pub fn model_data(model: &RegressionModel) -> serde_json::Value {
    let coefficients: serde_json::Map<String, serde_json::Value> = model
        .feature_names
        .iter()
        .zip(&model.model.coefficients)
        .map(|(name, coef)| (name.clone(), json!(coef)))
        .collect();

    json!({
        "coefficients": coefficients,
        "intercept": model.model.intercept,
        "r2_score": model.metrics.r2_score,
        "mae": model.metrics.mae,
        "mse": model.metrics.mse,
        "feature_names": model.feature_names,
    })
}

pub fn write_model_data(path: &Path, model: &RegressionModel) -> Result<()> {
    write_json(path, &model_data(model))
}

#[derive(Serialize)]
struct PersonaEntry<'a> {
    name: &'a str,
    stats: &'a PersonaStats,
    student_count: usize,
}

fn persona_entries(report: &PersonaReport) -> BTreeMap<String, PersonaEntry<'_>> {
    report
        .personas
        .iter()
        .map(|p| {
            (
                p.id.to_string(),
                PersonaEntry {
                    name: &p.name,
                    stats: &p.stats,
                    student_count: p.student_count,
                },
            )
        })
        .collect()
}

/// Persona id (as a string key) to name, mean stats and size.
pub fn write_persona_data(path: &Path, report: &PersonaReport) -> Result<()> {
    write_json(path, &persona_entries(report))
}

/// Build the `analysis_summary.json` document.
pub fn analysis_summary(analysis: &Analysis) -> serde_json::Value {
    let assessment_correlations: Vec<serde_json::Value> = analysis
        .assessment_correlations
        .iter()
        .map(|(column, r)| json!({ "column": column, "correlation": r }))
        .collect();

    json!({
        "descriptive_statistics": analysis.descriptive,
        "correlation_matrix": analysis.correlation,
        "assessment_correlations": assessment_correlations,
        "elbow": analysis.personas.elbow,
        "kmeans_inertia": analysis.personas.inertia,
        "persona_assignments": analysis.personas.assignments,
        "train_size": analysis.regression.train_size,
        "test_size": analysis.regression.test_size,
    })
}

pub fn write_analysis_summary(path: &Path, analysis: &Analysis) -> Result<()> {
    write_json(path, &analysis_summary(analysis))
}
