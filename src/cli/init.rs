//! Init command implementation.
//!
//! Writes a `glowbrush.yaml` holding the default canvas configuration, so
//! there is something to edit rather than a blank file.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::{CanvasConfig, CONFIG_FILENAME};
use crate::error::{GlowError, Result};
use crate::output::{display_path, Printer};

/// Write a default glowbrush.yaml
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write into (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing glowbrush.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let config_path = args.path.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        return Err(GlowError::Config {
            message: format!("{} already exists", CONFIG_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    if !args.path.exists() {
        fs::create_dir_all(&args.path).map_err(|e| GlowError::Io {
            path: args.path.clone(),
            message: format!("Failed to create directory: {}", e),
        })?;
    }

    let yaml = CanvasConfig::default().to_yaml()?;
    fs::write(&config_path, &yaml).map_err(|e| GlowError::Io {
        path: config_path.clone(),
        message: format!("Failed to write config: {}", e),
    })?;

    printer.success("Created", &display_path(&config_path));
    Ok(())
}
