//! Post-analysis processing.
//!
//! Handles `--export-json` after an attempt succeeds.

use crate::cli::Cli;
use crate::model::{AnalysisRequest, AnalysisResult};
use crate::storage::{self, ExportRecord};

/// Result of post-analysis processing, ready for presentation layers.
pub(crate) struct ProcessedAnalysis {
    pub record: ExportRecord,
    pub export_messages: Vec<String>,
}

/// Build the export record for a successful attempt and write it if requested.
pub(crate) fn process_success(
    args: &Cli,
    request: &AnalysisRequest,
    result: &AnalysisResult,
) -> ProcessedAnalysis {
    let record = ExportRecord::new(&args.base_url, request, result);

    let mut export_messages = Vec::new();
    if let Some(export_path) = args.export_json.as_deref() {
        match storage::export_json(export_path, &record) {
            Ok(_) => export_messages.push(format!("Exported JSON: {}", export_path.display())),
            Err(e) => export_messages.push(format!("Export JSON failed: {e:#}")),
        }
    }

    ProcessedAnalysis {
        record,
        export_messages,
    }
}
