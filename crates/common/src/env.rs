//! Environment/runtime helpers
//!
//! Sanity checks to ensure the data directory exists before the stores open.

use std::path::Path;

use tracing::{debug, warn};

/// Ensure the parent directory of the guest data file exists.
pub async fn ensure_data_dir(data_file: &str) -> anyhow::Result<()> {
    let Some(parent) = Path::new(data_file).parent() else { return Ok(()) };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    if tokio::fs::metadata(parent).await.is_err() {
        warn!(dir = %parent.display(), "data directory missing; creating it");
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    debug!(dir = %parent.display(), "data directory ready");
    Ok(())
}
