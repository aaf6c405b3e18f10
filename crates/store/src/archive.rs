//! Gzip-compressed tar export of artifact blobs

use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;
use modhost_errors::{Error, StorageError};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use uuid::Uuid;

/// Pack `(file_name, bytes)` entries into a `.tar.gz` at `dest`
///
/// The archive is written next to `dest` and renamed into place once
/// complete. Returns the number of entries written.
///
/// # Errors
///
/// Returns an error if an entry name is unsafe, if the archive cannot be
/// written, or if the final rename fails.
pub async fn pack_artifacts(entries: Vec<(String, Vec<u8>)>, dest: &Path) -> Result<usize, Error> {
    for (name, _) in &entries {
        crate::validate_file_name(name)?;
    }

    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let parent = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        std::fs::create_dir_all(&parent).map_err(|e| StorageError::from_io_with_path(&e, &parent))?;

        let temp = parent.join(format!(".export.{}.tmp", Uuid::new_v4()));
        let written = write_archive(&entries, &temp).inspect_err(|_| {
            let _ = std::fs::remove_file(&temp);
        })?;

        std::fs::rename(&temp, &dest).map_err(|e| {
            let _ = std::fs::remove_file(&temp);
            StorageError::AtomicRenameFailed {
                message: format!("{}: {e}", dest.display()),
            }
        })?;

        Ok::<usize, Error>(written)
    })
    .await
    .map_err(|e| Error::internal(format!("archive task failed: {e}")))?
}

fn write_archive(entries: &[(String, Vec<u8>)], path: &Path) -> Result<usize, Error> {
    let file = File::create(path).map_err(|e| StorageError::from_io_with_path(&e, path))?;
    let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    let mtime = u64::try_from(Utc::now().timestamp()).unwrap_or(0);

    for (name, bytes) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(mtime);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        builder
            .append_data(&mut header, name, bytes.as_slice())
            .map_err(|e| StorageError::IoError {
                message: format!("failed to add {name} to archive: {e}"),
            })?;
    }

    let encoder = builder.into_inner().map_err(|e| StorageError::IoError {
        message: format!("failed to finish archive: {e}"),
    })?;
    encoder.finish().map_err(|e| StorageError::IoError {
        message: format!("failed to finish compression: {e}"),
    })?;

    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    #[tokio::test]
    async fn packs_entries_readable_by_tar() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out").join("mods.tar.gz");
        let entries = vec![
            ("a.jar".to_string(), b"alpha".to_vec()),
            ("b.jar".to_string(), b"beta".to_vec()),
        ];

        let count = pack_artifacts(entries, &dest).await.unwrap();
        assert_eq!(count, 2);

        let file = File::open(&dest).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        let mut seen = Vec::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            let name = entry.path().unwrap().to_string_lossy().to_string();
            let mut body = String::new();
            entry.read_to_string(&mut body).unwrap();
            seen.push((name, body));
        }
        assert_eq!(
            seen,
            vec![
                ("a.jar".to_string(), "alpha".to_string()),
                ("b.jar".to_string(), "beta".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn rejects_unsafe_entry_names() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("mods.tar.gz");
        let result = pack_artifacts(vec![("../x.jar".to_string(), vec![])], &dest).await;
        assert!(result.is_err());
        assert!(!dest.exists());
    }
}
