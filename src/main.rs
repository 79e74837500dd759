use clap::Parser;
use fileflow::config::Config;
use fileflow::output::OutputFormatter;
use fileflow::{run_organize, run_watch};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Organize files into category folders by extension.
#[derive(Parser)]
#[command(name = "fileflow", version, about)]
struct Cli {
    /// Directory to organize
    dir: PathBuf,

    /// Keep watching the directory, organizing files as they appear
    #[arg(long)]
    watch: bool,

    /// Scan for duplicate file content after organizing
    #[arg(long, conflicts_with = "watch")]
    duplicates: bool,

    /// Write a JSON report of the run
    #[arg(long)]
    report: bool,

    /// Path to a configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fileflow=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            process::exit(1);
        }
    };

    let result = if cli.watch {
        run_watch(&cli.dir, &config, cli.report)
    } else {
        run_organize(&cli.dir, &config, cli.duplicates, cli.report)
    };

    if let Err(message) = result {
        OutputFormatter::error(&message);
        process::exit(1);
    }
}
