//! fixtures サブコマンド

use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Args, Subcommand};
use survey_common::config::SurveyConfig;

use crate::{db, fixtures};

/// fixtures サブコマンドの引数
#[derive(Args, Debug)]
pub struct FixturesArgs {
    /// 実行する操作
    #[command(subcommand)]
    pub command: FixturesCommand,
}

/// fixtures の操作
#[derive(Subcommand, Debug)]
pub enum FixturesCommand {
    /// Replace {%TODAY±N%} templates in raw/*.json and write the results to ready/
    Render {
        /// Directory with raw fixture files
        #[arg(long, default_value = "fixtures/raw")]
        raw: PathBuf,
        /// Output directory for ready fixture files
        #[arg(long, default_value = "fixtures/ready")]
        ready: PathBuf,
    },
    /// Load ready fixture files into the database
    Load {
        /// Fixture files (each one is loaded in its own transaction)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// fixtures サブコマンドを実行する
pub async fn execute(args: &FixturesArgs) -> anyhow::Result<()> {
    match &args.command {
        FixturesCommand::Render { raw, ready } => {
            let today = Local::now().date_naive();
            let names = fixtures::render_dir(raw, ready, today)
                .with_context(|| format!("Failed to render fixtures from {}", raw.display()))?;
            for name in names {
                println!("{}", ready.join(name).display());
            }
        }
        FixturesCommand::Load { files } => {
            let config = SurveyConfig::from_env();
            let pool = db::migrations::initialize_database(&config.database_url).await?;
            for file in files {
                let count = fixtures::load_file(&pool, file)
                    .await
                    .with_context(|| format!("Failed to load {}", file.display()))?;
                println!("{}: {} objects", file.display(), count);
            }
        }
    }
    Ok(())
}
