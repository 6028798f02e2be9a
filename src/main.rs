mod cli;
mod engine;
mod error;
mod input;
mod model;
mod orchestrator;
mod session;
mod storage;
#[cfg(test)]
mod test_support;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up PROFILE_ANALYZER_* from a local .env before clap reads the environment.
    let _ = dotenvy::dotenv();

    let args = cli::Cli::parse();
    cli::init_tracing(&args)?;
    let is_one_shot = args.is_one_shot();

    match cli::run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            if is_one_shot {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            }
            Err(e)
        }
    }
}
