//! The `cogniskill validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use cogniskill_core::config::load_config_from;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    config.validate().context("invalid configuration")?;

    println!(
        "Config valid: {} students, seed {}, test fraction {}, output {}",
        config.students,
        config.seed,
        config.test_fraction,
        config.output_dir.display()
    );
    for class in &config.classes {
        println!("  {:<4} weight {:.3}", class.name, class.weight);
    }

    Ok(())
}
