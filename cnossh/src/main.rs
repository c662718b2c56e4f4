use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::debug;

use cnossh::cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the outcome JSON.
    let mut logger = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(filter) = &cli.log_level {
        logger.parse_filters(filter);
    }
    logger.target(env_logger::Target::Stderr).init();

    let args = cli
        .command
        .into_module_args()
        .context("Invalid task parameters")?;
    debug!("Task: {}", args.task.name());

    let outcome = cnossh::task::run(args).await;
    println!("{}", serde_json::to_string(&outcome)?);

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
