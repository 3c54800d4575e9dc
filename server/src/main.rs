//! Survey backend server entry point

use clap::Parser;
use survey_server::cli::{Cli, Commands};
use survey_server::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Error: failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Some(Commands::Serve(args)) => survey_server::cli::serve::execute(&args).await,
        Some(Commands::Routes) => survey_server::cli::routes::execute(),
        Some(Commands::Fixtures(args)) => survey_server::cli::fixtures::execute(&args).await,
        None => survey_server::cli::serve::execute(&Default::default()).await,
    };

    if let Err(e) = result {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
