//! The `cogniskill run` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use cogniskill_core::pipeline::{run, Analysis, Dataset};
use cogniskill_report::{export_analysis, export_dataset};

use super::{build_context, output_dir, print_written, ConsoleReporter, PipelineArgs};

pub fn execute(args: PipelineArgs) -> Result<()> {
    let ctx = build_context(&args)?;
    eprintln!(
        "cogniskill v{}: Running pipeline for {} students (seed {})",
        env!("CARGO_PKG_VERSION"),
        ctx.config().students,
        ctx.config().seed
    );
    eprintln!();

    let output = run(&ctx, &ConsoleReporter)?;

    print_dataset(&output.dataset);
    print_model(&output.analysis);
    print_personas(&output.analysis);

    let dir = output_dir(&ctx);
    let mut written = export_dataset(&output.dataset, dir)?;
    written.extend(export_analysis(&output.analysis, dir)?);
    eprintln!();
    print_written(&written);

    Ok(())
}

fn print_dataset(dataset: &Dataset) {
    let s = &dataset.summary;
    let mut table = Table::new();
    table.set_header(vec!["Students", "Avg Score", "Avg Engagement", "Avg Attendance"]);
    table.add_row(vec![
        Cell::new(s.total_students),
        Cell::new(format!("{:.1}", s.average_assessment_score)),
        Cell::new(format!("{:.1} min", s.average_engagement_time)),
        Cell::new(format!("{:.1}%", s.average_attendance_rate)),
    ]);
    eprintln!("\n{table}");
}

fn print_model(analysis: &Analysis) {
    let regression = &analysis.regression;
    let mut table = Table::new();
    table.set_header(vec!["Feature", "Coefficient", "Correlation"]);
    for (name, coef) in regression
        .feature_names
        .iter()
        .zip(&regression.model.coefficients)
    {
        let r = analysis
            .correlation
            .get(name, cogniskill_core::regression::TARGET)
            .map(|r| format!("{r:.3}"))
            .unwrap_or_else(|| "n/a".to_string());
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format!("{coef:.4}")),
            Cell::new(r),
        ]);
    }
    table.add_row(vec![
        Cell::new("(intercept)"),
        Cell::new(format!("{:.4}", regression.model.intercept)),
        Cell::new(""),
    ]);
    eprintln!("\n{table}");

    let r2 = regression
        .metrics
        .r2_score
        .map(|r| format!("{r:.3}"))
        .unwrap_or_else(|| "undefined".to_string());
    eprintln!(
        "R² {r2}  MAE {:.3}  MSE {:.3}  (train {}, test {})",
        regression.metrics.mae, regression.metrics.mse, regression.train_size, regression.test_size
    );
}

fn print_personas(analysis: &Analysis) {
    let mut table = Table::new();
    table.set_header(vec![
        "Persona",
        "Students",
        "Assessment",
        "Comprehension",
        "Attention",
        "Focus",
        "Retention",
        "Engagement",
    ]);
    for p in &analysis.personas.personas {
        table.add_row(vec![
            Cell::new(format!("{} {}", p.id, p.name)),
            Cell::new(p.student_count),
            Cell::new(format!("{:.1}", p.stats.assessment_score)),
            Cell::new(format!("{:.1}", p.stats.comprehension)),
            Cell::new(format!("{:.1}", p.stats.attention)),
            Cell::new(format!("{:.1}", p.stats.focus)),
            Cell::new(format!("{:.1}", p.stats.retention)),
            Cell::new(format!("{:.1}", p.stats.engagement_time)),
        ]);
    }
    eprintln!("\n{table}");
}
