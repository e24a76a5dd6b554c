//! One-shot export run.
//!
//! Sequences credential resolution, the API fetch, script extraction,
//! and the bundle write, then reports an [`ExportSummary`]. Credential
//! and fetch failures abort the run; per-record write failures and
//! extraction warnings are collected and the run continues.

use std::path::PathBuf;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::{ApiClient, ApiConfig};
use crate::credentials::{self, KeyringStore, SecretStore};
use crate::error::{Error, Result};
use crate::extract;
use crate::writer::BundleWriter;

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub server: String,
    pub account: String,
    pub service: String,
    pub password: Option<String>,
    pub output: PathBuf,
    pub content_root: Option<PathBuf>,
    pub limit: Option<u32>,
    pub insecure: bool,
    pub prune: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportOutcome {
    Success,
    PartialSuccess,
    Failure,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub run_id: String,
    pub server: String,
    pub output: String,
    pub outcome: ExportOutcome,
    pub started_at: String,
    pub finished_at: String,
    pub duration_ms: u64,
    pub records_fetched: usize,
    pub records_written: usize,
    pub scripts_extracted: usize,
    pub scripts_written: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pruned: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Runs an export against the real secret store and HTTP transport.
pub fn run(config: &ExportConfig) -> Result<ExportSummary> {
    let client = ApiClient::new(&api_config(config))?;
    run_with(config, &KeyringStore, client)
}

pub fn api_config(config: &ExportConfig) -> ApiConfig {
    ApiConfig {
        base_url: config.server.clone(),
        limit: config.limit,
        insecure: config.insecure,
    }
}

/// Runs an export with injected capabilities.
pub fn run_with(
    config: &ExportConfig,
    store: &dyn SecretStore,
    client: ApiClient,
) -> Result<ExportSummary> {
    let started = Instant::now();
    let started_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let run_id = Uuid::new_v4().to_string();

    let mut warnings: Vec<String> = Vec::new();
    let mut errors: Vec<String> = Vec::new();

    let credential = credentials::resolve_credential(
        store,
        &config.account,
        &config.service,
        config.password.as_deref(),
    )?;

    log_status!(
        "export",
        "Exporting applications from {} to {}",
        config.server,
        config.output.display()
    );

    let records = client.fetch_applications(&credential)?;
    let records_fetched = records.len();

    let mut writer = BundleWriter::create(&config.output)?;

    let mut records_written = 0usize;
    let mut scripts_extracted = 0usize;
    let mut scripts_written = 0usize;

    for record in &records {
        match writer.write_record(record) {
            Ok(_) => records_written += 1,
            Err(err) => {
                errors.push(format!("record {}: {}", record.id, describe(&err)));
                continue;
            }
        }

        let extraction = extract::extract_scripts(record, config.content_root.as_deref());
        scripts_extracted += extraction.scripts.len();
        warnings.extend(extraction.warnings);

        for script in &extraction.scripts {
            match writer.write_script(&record.id, script) {
                Ok(Some(_)) => scripts_written += 1,
                Ok(None) => {}
                Err(err) => {
                    errors.push(format!(
                        "record {}: script {}: {}",
                        record.id, script.file_name, describe(&err)
                    ));
                }
            }
        }
    }

    log_status!(
        "extract",
        "Extracted {} scripts, wrote {}",
        scripts_extracted,
        scripts_written
    );

    let mut pruned = Vec::new();
    if config.prune {
        let (removed, prune_warnings) = writer.prune();
        pruned = removed;
        warnings.extend(prune_warnings);
    }

    let outcome = if records_fetched > 0 && records_written == 0 {
        ExportOutcome::Failure
    } else if warnings.is_empty() && errors.is_empty() {
        ExportOutcome::Success
    } else {
        ExportOutcome::PartialSuccess
    };

    let finished_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    Ok(ExportSummary {
        run_id,
        server: config.server.clone(),
        output: config.output.display().to_string(),
        outcome,
        started_at,
        finished_at,
        duration_ms: started.elapsed().as_millis() as u64,
        records_fetched,
        records_written,
        scripts_extracted,
        scripts_written,
        pruned,
        warnings,
        errors,
    })
}

fn describe(err: &Error) -> String {
    format!("{} ({})", err.message, err.code.as_str())
}
