use clap::Parser;
use kcfg::cli::{Cli, run};
use kcfg::schema::TracingSink;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    match run(&cli, &mut stdout, &mut TracingSink) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("kcfg: {err:#}");
            ExitCode::FAILURE
        }
    }
}
