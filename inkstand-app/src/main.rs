use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use inkstand_common::init_logging;
use inkstand_medium::MediumError;
use inkstand_web::ArticleError;

mod cli;
mod commands;
mod settings;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // 1) Load config (env wins over files)
    let cfg = settings::load(cli.config.as_deref())?;

    // 2) Logging from the resolved config
    let log_path = init_logging(settings::log_config(&cfg.logging, cli.verbose)?)?;
    tracing::debug!(log_path = %log_path.display(), "logging.ready");

    commands::dispatch(cli.command, &cfg).await
}

/// Log once with the error code where there is one, then print the bare message.
fn report(err: &anyhow::Error) {
    if let Some(medium) = err.downcast_ref::<MediumError>() {
        tracing::error!(code = medium.code(), error = %medium, "medium request failed");
        eprintln!("Error: {medium}");
    } else if let Some(article) = err.downcast_ref::<ArticleError>() {
        tracing::error!(error = %article, "article fetch failed");
        eprintln!("Error: {article}");
    } else {
        let message = format!("{err:#}");
        tracing::error!(error = %message, "command failed");
        eprintln!("Error: {message}");
    }
}
