//! Task runner - recovers a single tracked file

use super::OutcomeRecord;
use crate::decode::decode;
use crate::targets::Target;
use crate::transport::Transport;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Recover one file: fetch its pristine copy, decode it, write it under `output_dir`.
///
/// Every failure is reported through the returned record. Each file is
/// attempted exactly once.
pub async fn recover(
    transport: &dyn Transport,
    target: &Target,
    file: &str,
    output_dir: &Path,
    control_dir: &str,
) -> OutcomeRecord {
    let Some(relative) = safe_relative_path(file) else {
        warn!(file, "Refusing path that escapes the output directory");
        return OutcomeRecord::failed(file, 0);
    };

    let url = target.pristine_url(control_dir, file);
    info!(url = %url, "Downloading");

    let response = transport.get(url.as_str()).await;
    if !response.is_success() {
        warn!(
            file,
            status = ?response.status_code,
            "Failed to download"
        );
        return OutcomeRecord::failed(file, 0);
    }

    let size = response.body.len() as u64;

    let Some(decoded) = decode(&response.body) else {
        warn!(file, size, "Could not decode");
        return OutcomeRecord::undecodable(file, size);
    };
    debug!(file, encoding = ?decoded.encoding, "Decoded");

    let output_path = output_dir.join(relative);
    match write_file(&output_path, decoded.text.as_bytes()).await {
        Ok(()) => {
            info!(file, size, path = %output_path.display(), "Saved decoded file");
            OutcomeRecord::ok(file, size, output_path)
        }
        Err(e) => {
            warn!(file, path = %output_path.display(), error = %e, "Failed to write file");
            OutcomeRecord::failed(file, size)
        }
    }
}

async fn write_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        // Tolerates directories created concurrently by sibling workers
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await
}

/// Map a manifest path onto a relative path that stays inside the output directory
fn safe_relative_path(file: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(file).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative)
    }
}
