mod jobs;
mod map;
mod table;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use jobmap_core::AppConfig;
use jobmap_db::{RecordStore, SqliteJobs};
use tracing_subscriber::EnvFilter;

use crate::jobs::{NewJobArgs, UpdateJobArgs};

#[derive(Debug, Parser)]
#[command(name = "jobmap")]
#[command(about = "Job posting records and a job-density map by location")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load job rows from a JSON or tab-separated file
    Import {
        /// Table file; `.json` is read as an array of string arrays, anything
        /// else as tab-separated text
        file: PathBuf,
    },
    /// Geocode job locations and write a GeoJSON density map
    Map {
        file: PathBuf,
        /// Output path (defaults to `JOBMAP_MAP_OUTPUT`)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List stored jobs in order
    List,
    /// Show one job by list index
    Show { index: usize },
    /// Create a job
    Add(NewJobArgs),
    /// Edit a job by list index; omitted fields keep their values
    Update {
        index: usize,
        #[command(flatten)]
        fields: UpdateJobArgs,
    },
    /// Delete a job by list index
    Delete { index: usize },
    /// Compare the loaded records with the database
    Check,
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Verify the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = jobmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Commands::Map { file, output } = &command {
        return map::run_map(&config, file, output.as_deref()).await;
    }

    let pool_config = jobmap_db::PoolConfig::from_app_config(&config);
    let pool = jobmap_db::connect_pool(&config.database_url, pool_config).await?;
    let result = run_with_pool(&pool, &config, command).await;
    pool.close().await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "command failed");
    }
    result
}

async fn run_with_pool(
    pool: &sqlx::SqlitePool,
    config: &AppConfig,
    command: Commands,
) -> anyhow::Result<()> {
    if let Commands::Db { command } = command {
        return match command {
            DbCommands::Ping => {
                jobmap_db::health_check(pool).await?;
                println!("database ok ({})", config.env);
                Ok(())
            }
            DbCommands::Migrate => {
                let applied = jobmap_db::run_migrations(pool).await?;
                println!("applied {applied} migration(s)");
                Ok(())
            }
        };
    }

    jobmap_db::run_migrations(pool).await?;
    let mut store = RecordStore::open(SqliteJobs::new(pool.clone())).await?;

    match command {
        Commands::Import { file } => jobs::run_import(&mut store, &file).await,
        Commands::List => {
            jobs::run_list(&store);
            Ok(())
        }
        Commands::Show { index } => jobs::run_show(&store, index),
        Commands::Add(args) => jobs::run_add(&mut store, args).await,
        Commands::Update { index, fields } => jobs::run_update(&mut store, index, fields).await,
        Commands::Delete { index } => jobs::run_delete(&mut store, index).await,
        Commands::Check => jobs::run_check(&store).await,
        Commands::Map { .. } | Commands::Db { .. } => Ok(()),
    }
}
