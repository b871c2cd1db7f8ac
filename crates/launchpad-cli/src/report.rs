//! JSON reports printed by `launchpad validate` and `launchpad health`.

use std::path::PathBuf;

use anyhow::Context;
use launchpad_upload::{
    validate_batch_with, BatchPolicy, BatchReport, FileUpload, UploadRejection, ValidatedUpload,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RejectionEntry {
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub message: String,
}

impl From<&UploadRejection> for RejectionEntry {
    fn from(rejection: &UploadRejection) -> Self {
        Self {
            code: rejection.code(),
            filename: rejection.filename().map(str::to_string),
            message: rejection.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub accepted: Vec<ValidatedUpload>,
    pub rejected: Vec<RejectionEntry>,
}

impl From<BatchReport> for ValidationReport {
    fn from(report: BatchReport) -> Self {
        Self {
            ok: report.is_accepted(),
            rejected: report.rejected.iter().map(RejectionEntry::from).collect(),
            accepted: report.accepted,
        }
    }
}

/// Run the upload validator over files on disk, in the given order.
pub async fn validate_paths(
    paths: &[PathBuf],
    policy: BatchPolicy,
) -> anyhow::Result<ValidationReport> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = FileUpload::open(path)
            .await
            .with_context(|| format!("Open {}", path.display()))?;
        files.push(file);
    }

    Ok(validate_batch_with(&files, policy).await.into())
}

/// `{base}/api/health`, tolerating a trailing slash on the base URL.
pub fn health_url(base: &str) -> String {
    format!("{}/api/health", base.trim_end_matches('/'))
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub status_code: u16,
    pub body: serde_json::Value,
}

/// GET the health endpoint. Any non-2xx answer counts as unhealthy; a body
/// that is not JSON is reported as a string.
pub async fn check_health(client: &reqwest::Client, base: &str) -> anyhow::Result<HealthReport> {
    let url = health_url(base);
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("GET {}", url))?;

    let status = response.status();
    let text = response.text().await.context("Read health response")?;
    let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));

    Ok(HealthReport {
        healthy: status.is_success(),
        status_code: status.as_u16(),
        body,
    })
}
