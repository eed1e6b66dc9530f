//! `mehko` binary: county ingestion, bulk processing, validation, seeding.

use std::process::ExitCode;

use clap::Parser;
use mehko_sync::HttpFetcher;

mod bulk;
mod cli;
mod config;
mod process;
mod seed;
mod validate;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args = cli::Cli::parse();
    let paths = config::Paths::new(args.data_dir, args.applications_dir);

    let result = match args.command {
        cli::Command::Process { county_id } => run_process(&paths, &county_id).await,
        cli::Command::Bulk => run_bulk(&paths).await,
        cli::Command::Validate {
            file,
            all,
            skip_pdf_check,
        } => validate::run(&paths, file, all, skip_pdf_check).await,
        cli::Command::Seed(seed_args) => seed::run(seed_args).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_process(paths: &config::Paths, county_id: &str) -> anyhow::Result<bool> {
    let fetcher = HttpFetcher::new();
    let outcome = process::CountyProcessor::new(paths, &fetcher)
        .run(county_id)
        .await?;
    outcome.print();
    Ok(true)
}

/// Per-county failures are reported in the summary but never fail the run.
async fn run_bulk(paths: &config::Paths) -> anyhow::Result<bool> {
    let fetcher = HttpFetcher::new();
    let summary = bulk::run_all(paths, &fetcher).await?;
    summary.print();
    Ok(true)
}
