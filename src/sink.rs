// =============================================================================
// Report Persistence — overwrite the latest report on disk
// =============================================================================
//
// Uses the same atomic tmp + rename pattern as config saving so a reader
// polling the file never observes a half-written report.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Replace the file at `path` with `text`.
pub fn persist_report(path: impl AsRef<Path>, text: &str) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create report directory {}", parent.display()))?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, text)
        .with_context(|| format!("failed to write tmp report to {}", tmp_path.display()))?;

    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to rename tmp report to {}", path.display()))?;

    debug!(path = %path.display(), bytes = text.len(), "report persisted");
    Ok(())
}
