//! The `cogniskill init` command.

use std::path::Path;

use anyhow::{Context, Result};

use cogniskill_core::config::CONFIG_FILE_NAME;

pub fn execute() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);
    if path.exists() {
        println!("{CONFIG_FILE_NAME} already exists, skipping.");
    } else {
        std::fs::write(path, SAMPLE_CONFIG)
            .with_context(|| format!("failed to write {CONFIG_FILE_NAME}"))?;
        println!("Created {CONFIG_FILE_NAME}");
    }

    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE_NAME} to change the cohort size or class mix");
    println!("  2. Run: cogniskill validate");
    println!("  3. Run: cogniskill run");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# cogniskill configuration

students = 200
seed = 42
test_fraction = 0.2
output_dir = "."

# Class names must start with the grade number. Weights must sum to 1.
[[classes]]
name = "9A"
weight = 0.1

[[classes]]
name = "9B"
weight = 0.1

[[classes]]
name = "10A"
weight = 0.15

[[classes]]
name = "10B"
weight = 0.15

[[classes]]
name = "10C"
weight = 0.15

[[classes]]
name = "11A"
weight = 0.1

[[classes]]
name = "11B"
weight = 0.1

[[classes]]
name = "11C"
weight = 0.1

[[classes]]
name = "12A"
weight = 0.025

[[classes]]
name = "12B"
weight = 0.025
"#;
