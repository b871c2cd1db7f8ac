//! Launchpad CLI: local environment setup, offline upload validation and
//! health checks against a running server.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use launchpad_cli::docker::{self, ContainerSpec};
use launchpad_cli::env_file::{self, DevSettings, EnvFileOutcome};
use launchpad_cli::report;
use launchpad_cli::{init_tracing, print_json};
use launchpad_upload::BatchPolicy;

#[derive(Parser)]
#[command(name = "launchpad", about = "Launchpad developer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a development .env and start Postgres and MinIO in docker
    Setup {
        /// Only write .env
        #[arg(long)]
        skip_docker: bool,
        /// Overwrite an existing .env
        #[arg(long)]
        force: bool,
        /// Where to write the env file
        #[arg(long, default_value = ".env")]
        env_file: PathBuf,
    },
    /// Run the upload validator over files on disk
    Validate {
        /// Files to validate, treated as one upload batch
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Report every rejected file instead of stopping at the first
        #[arg(long)]
        collect_all: bool,
    },
    /// Check a running server's health endpoint
    Health {
        /// Server base URL
        #[arg(long, default_value = "http://localhost:3000")]
        url: String,
    },
}

async fn setup(skip_docker: bool, force: bool, env_path: PathBuf) -> anyhow::Result<()> {
    let settings = DevSettings::default();
    let contents = env_file::render_env_file(&settings, &env_file::generate_auth_secret());

    match env_file::write_env_file(&env_path, &contents, force)? {
        EnvFileOutcome::Created => tracing::info!(path = %env_path.display(), "Wrote env file"),
        EnvFileOutcome::Overwritten => {
            tracing::warn!(path = %env_path.display(), "Overwrote env file")
        }
        EnvFileOutcome::Kept => tracing::info!(
            path = %env_path.display(),
            "Env file exists, leaving it alone (use --force to replace)"
        ),
    }

    if skip_docker {
        return Ok(());
    }

    docker::ensure_container(&ContainerSpec::postgres(&settings)).await?;
    docker::ensure_container(&ContainerSpec::minio(&settings)).await?;
    docker::ensure_bucket(&settings).await?;

    tracing::info!(
        database_url = %settings.database_url(),
        s3_endpoint = %settings.s3_endpoint(),
        "Local services ready. Start the server with `cargo run -p launchpad-api`"
    );
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Setup {
            skip_docker,
            force,
            env_file,
        } => {
            setup(skip_docker, force, env_file).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate { paths, collect_all } => {
            let policy = if collect_all {
                BatchPolicy::CollectAll
            } else {
                BatchPolicy::FailFast
            };
            let report = report::validate_paths(&paths, policy).await?;
            print_json(&report)?;
            Ok(if report.ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Health { url } => {
            let client = reqwest::Client::new();
            let report = report::check_health(&client, &url).await?;
            print_json(&report)?;
            Ok(if report.healthy {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    dotenvy::dotenv().ok();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
