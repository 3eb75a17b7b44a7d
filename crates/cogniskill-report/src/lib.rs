//! cogniskill-report: Flat-file artifacts for the dashboard.
//!
//! Each artifact is written with a single atomic replace, independently of
//! the others.

mod atomic;
pub mod csv;
pub mod json;

use std::path::{Path, PathBuf};

use anyhow::Result;

use cogniskill_core::pipeline::{Analysis, Dataset};

pub use atomic::write_atomic;

pub const DATASET_JSON: &str = "enhanced_student_data.json";
pub const DATASET_CSV: &str = "enhanced_student_data.csv";
pub const DASHBOARD_SUMMARY: &str = "dashboard_summary.json";
pub const MODEL_DATA: &str = "model_data.json";
pub const PERSONA_DATA: &str = "persona_data.json";
pub const ANALYSIS_SUMMARY: &str = "analysis_summary.json";

/// Write the record table (JSON and CSV) and the dashboard summary.
pub fn export_dataset(dataset: &Dataset, dir: &Path) -> Result<Vec<PathBuf>> {
    let records_json = dir.join(DATASET_JSON);
    json::write_json(&records_json, &dataset.records)?;

    let records_csv = dir.join(DATASET_CSV);
    csv::write_records_csv(&records_csv, &dataset.records)?;

    let summary = dir.join(DASHBOARD_SUMMARY);
    json::write_json(&summary, &dataset.summary)?;

    Ok(vec![records_json, records_csv, summary])
}

/// Write the model, persona, and analysis summary artifacts.
pub fn export_analysis(analysis: &Analysis, dir: &Path) -> Result<Vec<PathBuf>> {
    let model = dir.join(MODEL_DATA);
    json::write_model_data(&model, &analysis.regression)?;

    let personas = dir.join(PERSONA_DATA);
    json::write_persona_data(&personas, &analysis.personas)?;

    let summary = dir.join(ANALYSIS_SUMMARY);
    json::write_analysis_summary(&summary, analysis)?;

    Ok(vec![model, personas, summary])
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogniskill_core::config::PipelineConfig;
    use cogniskill_core::pipeline::{run, NoopReporter, PipelineContext};

    #[test]
    fn exports_every_artifact() {
        let ctx = PipelineContext::new(PipelineConfig {
            students: 40,
            ..Default::default()
        })
        .unwrap();
        let out = run(&ctx, &NoopReporter).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let mut written = export_dataset(&out.dataset, dir.path()).unwrap();
        written.extend(export_analysis(&out.analysis, dir.path()).unwrap());

        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                DATASET_JSON,
                DATASET_CSV,
                DASHBOARD_SUMMARY,
                MODEL_DATA,
                PERSONA_DATA,
                ANALYSIS_SUMMARY
            ]
        );
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn missing_output_directory_is_created() {
        let ctx = PipelineContext::new(PipelineConfig {
            students: 12,
            ..Default::default()
        })
        .unwrap();
        let dataset = cogniskill_core::pipeline::run_generation(&ctx, &NoopReporter).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("nested");
        export_dataset(&dataset, &nested).unwrap();
        assert!(nested.join(DATASET_JSON).exists());
    }
}
