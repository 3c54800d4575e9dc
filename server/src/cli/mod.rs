//! CLI module for survey-server
//!
//! Provides the command-line interface for serving the API and managing fixtures.

/// fixtures サブコマンド
pub mod fixtures;
/// routes サブコマンド
pub mod routes;
/// serve サブコマンド
pub mod serve;

use clap::{Parser, Subcommand};

/// Survey backend - REST API for surveys, questions and anonymous answers
#[derive(Parser, Debug)]
#[command(name = "survey-server")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    SURVEY_HOST               Bind address (default: 0.0.0.0)
    SURVEY_PORT               Listen port (default: 8000)
    SURVEY_DATABASE_URL       Database URL (default: sqlite://data/survey.db)
    SURVEY_INSTALLED_MODULES  Comma-separated modules to activate (default: host.docs,server,survey)
    SURVEY_API_PREFIX         Mount prefix for endpoints (default: api)
    SURVEY_LOG_LEVEL          Log level (default: info)
    SURVEY_LOG_DIR            Also write JSON logs with daily rotation into this directory
    SURVEY_ADMIN_USERNAME     Initial admin username (default: admin)
    SURVEY_ADMIN_PASSWORD     Initial admin password (admin is created only when set)
"#)]
pub struct Cli {
    /// Subcommand to execute (default: serve)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the API server
    Serve(serve::ServeArgs),
    /// Run endpoint discovery and print the route table
    Routes,
    /// Render or load fixtures
    Fixtures(fixtures::FixturesArgs),
}
