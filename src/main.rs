use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

use ytapi_cli::cli::commands::{languages, load_config, translate};
use ytapi_cli::cli::{Args, Command};
use ytapi_cli::error::Error;
use ytapi_cli::ui::Style;

/// Failure of a run, split by the stage that produced it.
enum Failure {
    Config(anyhow::Error),
    Run(anyhow::Error),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(failure) = run(args).await {
        let code = match &failure {
            Failure::Config(e) => {
                eprintln!("{} {e:#}", Style::error("Error:"));
                exitcode::CONFIG
            }
            Failure::Run(e) => {
                eprintln!("{} {e}", Style::error("Error:"));
                run_exit_code(e)
            }
        };
        std::process::exit(code);
    }
}

async fn run(args: Args) -> Result<(), Failure> {
    let config = load_config(args.config.as_deref(), args.debug).map_err(Failure::Config)?;
    let debug = config.debug;
    init_logging(debug);

    let ctx = config
        .into_context(!args.reset_cache)
        .map_err(Failure::Config)?;
    let ctx = Arc::new(ctx);
    let deadline = Instant::now() + Duration::from_secs(args.timeout);

    // Spinner output would interleave with debug logs.
    let show_spinner = !debug;

    let result = match args.command {
        Some(Command::Languages) => languages::run_languages(ctx, deadline, show_spinner).await,
        None => {
            let options = translate::TranslateOptions {
                words: args.words,
                direction: args.direction,
                show_spinner,
            };
            translate::run_translate(options, ctx, deadline).await
        }
    };

    result.map_err(Failure::Run)
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("ytapi_cli=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_exit_code(err: &anyhow::Error) -> exitcode::ExitCode {
    match err.downcast_ref::<Error>() {
        Some(e) if e.is_timeout() => exitcode::TEMPFAIL,
        Some(Error::Direction(_)) => exitcode::USAGE,
        Some(_) => exitcode::UNAVAILABLE,
        None => exitcode::SOFTWARE,
    }
}
