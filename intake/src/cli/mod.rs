//! CLI module for survey-intake

/// serve サブコマンド
pub mod serve;

use clap::{Parser, Subcommand};

/// Survey intake - validates, anonymizes and appends survey submissions to NDJSON
#[derive(Parser, Debug)]
#[command(name = "survey-intake")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    SURVEY_HOST             Bind address (default: 127.0.0.1, legacy: HOST)
    SURVEY_PORT             Listen port (default: 5000, legacy: PORT)
    SURVEY_DATA_PATH        NDJSON log path (default: data/survey.ndjson, legacy: RESULTS_PATH)
    SURVEY_CORS_ORIGINS     Allowed origins for /v1/*, comma separated (default: *)
    SURVEY_LOG_LEVEL        Log filter (default: info, legacy: RUST_LOG)
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the intake server
    Serve(serve::ServeArgs),
}
