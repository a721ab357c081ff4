//! Survey Intake Server Entry Point

use clap::Parser;
use survey_intake::cli::{Cli, Commands};
use survey_intake::config::IntakeConfig;
use survey_intake::{logging, server, AppState};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let guard = match logging::init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let config = match cli.command {
        Some(Commands::Serve(args)) => args.apply(IntakeConfig::from_env()),
        None => IntakeConfig::from_env(),
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        data_path = %config.data_path.display(),
        "Starting survey intake"
    );

    let bind_addr = config.bind_addr();
    let state = AppState::new(config);

    if let Err(e) = server::run(state, &bind_addr).await {
        error!("Server error: {}", e);
        drop(guard);
        std::process::exit(1);
    }
}
