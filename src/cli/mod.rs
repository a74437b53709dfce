pub mod completions;
pub mod init;
pub mod paint;

use clap::{Parser, Subcommand};

/// glowbrush - Layered glow brush painting from stroke scripts
#[derive(Parser, Debug)]
#[command(name = "glowbrush")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show engine diagnostics (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress status output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a stroke script and write the painted canvas
    Paint(paint::PaintArgs),

    /// Write a default glowbrush.yaml
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

impl Cli {
    /// Tracing filter directive for the verbosity level.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "glowbrush=debug",
            _ => "glowbrush=trace",
        }
    }
}
