//! JSON output of a pipeline result.
//!
//! Writes the topic, articles and summaries of a [`PipelineState`] next to
//! the PDF name it belongs to, e.g. `news_summary_ai_20240305_143007.json`.
//! The report bytes themselves are not included.

use crate::error::Result;
use crate::models::PipelineState;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `state` as pretty-printed JSON into `json_output_dir`.
///
/// `report_filename` is the PDF name; its `.pdf` extension is swapped for
/// `.json`. Returns the path written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_state(
    state: &PipelineState,
    json_output_dir: &str,
    report_filename: &str,
) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(state)?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(%json_output_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = Path::new(json_output_dir).join(report_filename).with_extension("json");
    info!(path = %path.display(), "Writing JSON");
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON file");

    Ok(path)
}
