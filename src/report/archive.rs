//! Zip packaging of an output directory

use super::{ARCHIVE_PREFIX, ReportError};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::FileOptions;

/// Compress everything under `output_dir` into `recovered_<stamp>.zip`.
///
/// Earlier archives in the directory root are left out, so repeated runs do
/// not nest archives inside each other.
pub fn package(output_dir: &Path, stamp: &str) -> Result<PathBuf, ReportError> {
    let archive_path = output_dir.join(format!("{ARCHIVE_PREFIX}{stamp}.zip"));
    let file = File::create(&archive_path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = 0usize;
    for entry in WalkDir::new(output_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if path == archive_path || is_previous_archive(output_dir, path) {
            continue;
        }

        let Some(name) = archive_name(output_dir, path) else {
            continue;
        };

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
        } else if entry.file_type().is_file() {
            debug!(name, "Adding to archive");
            zip.start_file(name, options)?;
            let mut source = File::open(path)?;
            io::copy(&mut source, &mut zip)?;
            entries += 1;
        }
    }

    zip.finish()?;
    info!(path = %archive_path.display(), files = entries, "Archive written");
    Ok(archive_path)
}

fn is_previous_archive(output_dir: &Path, path: &Path) -> bool {
    path.parent() == Some(output_dir)
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(ARCHIVE_PREFIX) && n.ends_with(".zip"))
}

/// Relative, `/`-separated entry name
fn archive_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_package_contains_tree() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/lib")).unwrap();
        fs::write(root.join("index.php"), "<?php ?>").unwrap();
        fs::write(root.join("src/lib/util.php"), "util").unwrap();

        let archive_path = package(root, "20250101_000000").unwrap();
        assert_eq!(archive_path, root.join("recovered_20250101_000000.zip"));

        let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        let mut contents = String::new();
        archive
            .by_name("src/lib/util.php")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "util");
        assert!(archive.by_name("index.php").is_ok());
    }

    #[test]
    fn test_package_skips_archives() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.txt"), "a").unwrap();

        package(root, "20250101_000000").unwrap();
        let second = package(root, "20250101_000001").unwrap();

        let archive = zip::ZipArchive::new(File::open(second).unwrap()).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert_eq!(names, vec!["a.txt"]);
    }
}
