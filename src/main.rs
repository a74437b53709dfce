use clap::Parser;
use glowbrush::cli::{Cli, Commands};
use glowbrush::output::Printer;
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let printer = if cli.quiet { Printer::quiet() } else { Printer::new() };

    match cli.command {
        Commands::Paint(args) => glowbrush::cli::paint::run(args, &printer)?,
        Commands::Init(args) => glowbrush::cli::init::run(args, &printer)?,
        Commands::Completions(args) => glowbrush::cli::completions::run(args)?,
    }

    Ok(())
}
