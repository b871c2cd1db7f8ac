//! Local Postgres and MinIO containers, driven through the `docker` binary.

use std::io::ErrorKind;
use std::process::Output;
use std::time::Duration;

use anyhow::{bail, Context};
use tokio::process::Command;

use crate::env_file::DevSettings;

pub const POSTGRES_CONTAINER: &str = "launchpad-postgres";
pub const MINIO_CONTAINER: &str = "launchpad-minio";

const BUCKET_ATTEMPTS: u32 = 10;

/// A container `setup` keeps running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: &'static str,
    pub image: &'static str,
    /// `(host, container)` port pairs
    pub ports: Vec<(u16, u16)>,
    pub env: Vec<(&'static str, String)>,
    /// Arguments passed to the image entrypoint
    pub command: Vec<String>,
}

impl ContainerSpec {
    pub fn postgres(settings: &DevSettings) -> Self {
        Self {
            name: POSTGRES_CONTAINER,
            image: "postgres:16",
            ports: vec![(settings.db_port, 5432)],
            env: vec![
                ("POSTGRES_USER", settings.db_user.clone()),
                ("POSTGRES_PASSWORD", settings.db_password.clone()),
                ("POSTGRES_DB", settings.db_name.clone()),
            ],
            command: Vec::new(),
        }
    }

    pub fn minio(settings: &DevSettings) -> Self {
        Self {
            name: MINIO_CONTAINER,
            image: "minio/minio:latest",
            ports: vec![
                (settings.minio_port, 9000),
                (settings.minio_console_port, 9001),
            ],
            env: vec![
                ("MINIO_ROOT_USER", settings.minio_user.clone()),
                ("MINIO_ROOT_PASSWORD", settings.minio_password.clone()),
            ],
            command: vec![
                "server".to_string(),
                "/data".to_string(),
                "--console-address".to_string(),
                ":9001".to_string(),
            ],
        }
    }

    /// Arguments for `docker run`
    pub fn run_args(&self) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "-d".to_string(),
            "--name".to_string(),
            self.name.to_string(),
        ];
        for (host, container) in &self.ports {
            args.push("-p".to_string());
            args.push(format!("{}:{}", host, container));
        }
        for (key, value) in &self.env {
            args.push("-e".to_string());
            args.push(format!("{}={}", key, value));
        }
        args.push(self.image.to_string());
        args.extend(self.command.iter().cloned());
        args
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Stopped,
    Missing,
}

/// Interpret `docker inspect -f {{.State.Running}}`. `None` means inspect failed,
/// which docker does for unknown containers.
pub fn parse_inspect_state(stdout: Option<&str>) -> ContainerState {
    match stdout.map(str::trim) {
        Some("true") => ContainerState::Running,
        Some(_) => ContainerState::Stopped,
        None => ContainerState::Missing,
    }
}

async fn docker(args: &[String]) -> anyhow::Result<Output> {
    Command::new("docker")
        .args(args)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                anyhow::anyhow!("docker is not installed or not on PATH")
            } else {
                anyhow::Error::new(e).context("Run docker")
            }
        })
}

fn ensure_success(output: &Output, what: &str) -> anyhow::Result<()> {
    if output.status.success() {
        return Ok(());
    }
    bail!(
        "{} failed ({}): {}",
        what,
        output.status,
        String::from_utf8_lossy(&output.stderr).trim()
    )
}

async fn inspect(name: &str) -> anyhow::Result<ContainerState> {
    let output = docker(&[
        "inspect".to_string(),
        "-f".to_string(),
        "{{.State.Running}}".to_string(),
        name.to_string(),
    ])
    .await?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_inspect_state(output.status.success().then_some(&*stdout)))
}

/// Start the container, reusing an existing one with the same name.
/// Returns the state it was found in.
pub async fn ensure_container(container: &ContainerSpec) -> anyhow::Result<ContainerState> {
    let state = inspect(container.name).await?;
    match state {
        ContainerState::Running => {
            tracing::info!(container = container.name, "Already running");
        }
        ContainerState::Stopped => {
            let output = docker(&["start".to_string(), container.name.to_string()]).await?;
            ensure_success(&output, &format!("docker start {}", container.name))?;
            tracing::info!(container = container.name, "Started existing container");
        }
        ContainerState::Missing => {
            let output = docker(&container.run_args()).await?;
            ensure_success(&output, &format!("docker run {}", container.name))?;
            tracing::info!(container = container.name, image = container.image, "Created container");
        }
    }
    Ok(state)
}

/// Create the upload bucket with the `mc` client bundled in the MinIO image.
/// Retries while the server inside the container is still starting.
pub async fn ensure_bucket(settings: &DevSettings) -> anyhow::Result<()> {
    let exec = |args: &[&str]| {
        let mut full = vec![
            "exec".to_string(),
            MINIO_CONTAINER.to_string(),
            "mc".to_string(),
        ];
        full.extend(args.iter().map(|a| a.to_string()));
        full
    };
    let alias = exec(&[
        "alias",
        "set",
        "local",
        "http://localhost:9000",
        settings.minio_user.as_str(),
        settings.minio_password.as_str(),
    ]);
    let target = format!("local/{}", settings.bucket);
    let make_bucket = exec(&["mb", "--ignore-existing", target.as_str()]);

    let mut last_error = None;
    for attempt in 1..=BUCKET_ATTEMPTS {
        let result = async {
            ensure_success(&docker(&alias).await?, "mc alias set")?;
            ensure_success(&docker(&make_bucket).await?, "mc mb")
        }
        .await;

        match result {
            Ok(()) => {
                tracing::info!(bucket = %settings.bucket, "Bucket ready");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(attempt, error = %e, "MinIO not ready yet");
                last_error = Some(e);
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| anyhow::anyhow!("mc mb did not run"))
        .context(format!("Create bucket {}", settings.bucket)))
}
