mod cli;
mod error;
mod lineage;
mod logging;
mod model;
mod regions;
mod session;

use anyhow::Result;
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let _log_guard = logging::init(args.verbose, args.quiet);

    match cli::run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("{e:#}");
            Err(e)
        }
    }
}
