//! Development `.env` generation for `launchpad setup`.

use std::fs;
use std::path::Path;

use anyhow::Context;

/// Settings shared by the generated `.env` and the containers `setup` starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevSettings {
    pub port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_port: u16,
    pub minio_user: String,
    pub minio_password: String,
    pub minio_port: u16,
    pub minio_console_port: u16,
    pub bucket: String,
    pub region: String,
}

impl Default for DevSettings {
    fn default() -> Self {
        Self {
            port: 3000,
            db_user: "launchpad".to_string(),
            db_password: "launchpad".to_string(),
            db_name: "launchpad".to_string(),
            db_port: 5432,
            minio_user: "launchpad".to_string(),
            // MinIO refuses root passwords shorter than 8 characters
            minio_password: "launchpad-secret".to_string(),
            minio_port: 9000,
            minio_console_port: 9001,
            bucket: "launchpad".to_string(),
            region: "us-east-1".to_string(),
        }
    }
}

impl DevSettings {
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@localhost:{}/{}",
            self.db_user, self.db_password, self.db_port, self.db_name
        )
    }

    pub fn s3_endpoint(&self) -> String {
        format!("http://localhost:{}", self.minio_port)
    }
}

/// What [`write_env_file`] did with the target path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvFileOutcome {
    Created,
    Overwritten,
    Kept,
}

/// 32 random bytes, hex encoded.
pub fn generate_auth_secret() -> String {
    hex::encode(rand::random::<[u8; 32]>())
}

pub fn render_env_file(settings: &DevSettings, auth_secret: &str) -> String {
    format!(
        "# Generated by `launchpad setup`. Safe to edit.
ENVIRONMENT=development
PORT={port}
RUST_LOG=info

DATABASE_URL={database_url}

AUTH_SECRET={auth_secret}
AUTH_BASE_URL=http://localhost:{port}

STORAGE_BACKEND=s3
S3_BUCKET={bucket}
S3_REGION={region}
S3_ENDPOINT={endpoint}
AWS_ACCESS_KEY_ID={minio_user}
AWS_SECRET_ACCESS_KEY={minio_password}

# Switch to STORAGE_BACKEND=local to skip MinIO
LOCAL_STORAGE_PATH=./data/uploads
LOCAL_STORAGE_BASE_URL=http://localhost:{port}/media
",
        port = settings.port,
        database_url = settings.database_url(),
        bucket = settings.bucket,
        region = settings.region,
        endpoint = settings.s3_endpoint(),
        minio_user = settings.minio_user,
        minio_password = settings.minio_password,
    )
}

/// Write `contents` to `path`. An existing file is left alone unless `force`.
pub fn write_env_file(path: &Path, contents: &str, force: bool) -> anyhow::Result<EnvFileOutcome> {
    let existed = path.exists();
    if existed && !force {
        return Ok(EnvFileOutcome::Kept);
    }

    fs::write(path, contents).with_context(|| format!("Write {}", path.display()))?;

    Ok(if existed {
        EnvFileOutcome::Overwritten
    } else {
        EnvFileOutcome::Created
    })
}
