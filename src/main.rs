use clap::Parser;
use tracing_subscriber::EnvFilter;

mod align;
mod circularise;
mod cli;
mod core;
mod parsing;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("contig_circulariser=debug,info")
    } else {
        EnvFilter::new("contig_circulariser=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Circularise(args) => {
            cli::circularise::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Overlaps(args) => {
            cli::overlaps::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
