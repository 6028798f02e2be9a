//! JSON export of analysis results.

use crate::model::{AnalysisRequest, AnalysisResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A saved analysis: the result plus what was asked and where.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRecord {
    pub timestamp_utc: String,
    pub base_url: String,
    pub query: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_information: String,
    pub result: AnalysisResult,
}

impl ExportRecord {
    pub fn new(base_url: &str, request: &AnalysisRequest, result: &AnalysisResult) -> Self {
        Self {
            timestamp_utc: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| "now".into()),
            base_url: base_url.to_string(),
            query: request.query.clone(),
            user_information: request.user_information.clone(),
            result: result.clone(),
        }
    }

    /// File name derived from the query and timestamp, safe on every platform.
    pub fn default_file_name(&self) -> String {
        let slug: String = self
            .query
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        let slug = slug
            .split('-')
            .filter(|s| !s.is_empty())
            .take(6)
            .collect::<Vec<_>>()
            .join("-");
        let stamp = self.timestamp_utc.replace(':', "-").replace('T', "_");
        let slug = if slug.is_empty() { "profile".into() } else { slug };
        format!("profile-analysis-{slug}-{stamp}.json")
    }
}

/// Default directory for saves triggered from the TUI.
pub fn default_export_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("profile-analyzer-cli").join("exports"))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn export_json(path: &Path, record: &ExportRecord) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create export directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(record).context("serialize export")?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write the record under `dir` using its default file name.
pub fn save_record(dir: &Path, record: &ExportRecord) -> Result<PathBuf> {
    let path = dir.join(record.default_file_name());
    export_json(&path, record)?;
    Ok(path)
}
