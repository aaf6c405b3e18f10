//! Filesystem-backed blob store

use crate::{validate_file_name, ArtifactLocation, BlobStore};
use chrono::Utc;
use modhost_errors::{Error, StorageError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Blob store over three directories: documents, live artifacts, backups
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    data_dir: PathBuf,
    artifacts_dir: PathBuf,
    backups_dir: PathBuf,
    extension: String,
}

impl LocalBlobStore {
    #[must_use]
    pub fn new(
        data_dir: impl Into<PathBuf>,
        artifacts_dir: impl Into<PathBuf>,
        backups_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            artifacts_dir: artifacts_dir.into(),
            backups_dir: backups_dir.into(),
            extension: "jar".to_string(),
        }
    }

    /// Only files carrying this extension are treated as managed artifacts
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    #[must_use]
    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    fn dir_for(&self, location: &ArtifactLocation) -> Result<PathBuf, Error> {
        match location {
            ArtifactLocation::Active => Ok(self.artifacts_dir.clone()),
            ArtifactLocation::Backup(name) => {
                validate_file_name(name)?;
                Ok(self.backups_dir.join(name))
            }
        }
    }

    fn is_managed(&self, path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some(self.extension.as_str())
    }
}

/// Write `bytes` to `dir/name` through a temporary sibling and a rename
async fn write_atomic(dir: &Path, name: &str, bytes: &[u8]) -> Result<(), Error> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| StorageError::from_io_with_path(&e, dir))?;

    let dest = dir.join(name);
    let temp = dir.join(format!(".{name}.{}.tmp", Uuid::new_v4()));

    if let Err(e) = fs::write(&temp, bytes).await {
        let _ = fs::remove_file(&temp).await;
        return Err(StorageError::from_io_with_path(&e, &temp).into());
    }

    if let Err(e) = fs::rename(&temp, &dest).await {
        let _ = fs::remove_file(&temp).await;
        return Err(StorageError::AtomicRenameFailed {
            message: format!("{}: {e}", dest.display()),
        }
        .into());
    }

    Ok(())
}

#[async_trait::async_trait]
impl BlobStore for LocalBlobStore {
    async fn read_document(&self, name: &str) -> Result<Option<Vec<u8>>, Error> {
        validate_file_name(name)?;
        let path = self.data_dir.join(name);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::from_io_with_path(&e, &path).into()),
        }
    }

    async fn write_document(&self, name: &str, bytes: &[u8]) -> Result<(), Error> {
        validate_file_name(name)?;
        write_atomic(&self.data_dir, name, bytes).await
    }

    async fn list_artifacts(&self, location: &ArtifactLocation) -> Result<Vec<String>, Error> {
        let dir = self.dir_for(location)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::from_io_with_path(&e, &dir).into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &dir))?
        {
            let path = entry.path();
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file || !self.is_managed(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn read_artifact(
        &self,
        location: &ArtifactLocation,
        file_name: &str,
    ) -> Result<Vec<u8>, Error> {
        validate_file_name(file_name)?;
        let path = self.dir_for(location)?.join(file_name);
        fs::read(&path)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &path).into())
    }

    async fn place_artifact(&self, file_name: &str, bytes: &[u8]) -> Result<(), Error> {
        validate_file_name(file_name)?;
        if !self.is_managed(Path::new(file_name)) {
            return Err(StorageError::UnmanagedArtifact {
                file_name: file_name.to_string(),
                extension: self.extension.clone(),
            }
            .into());
        }
        write_atomic(&self.artifacts_dir, file_name, bytes).await
    }

    async fn copy_artifact(
        &self,
        from: &ArtifactLocation,
        to: &ArtifactLocation,
        file_name: &str,
    ) -> Result<(), Error> {
        validate_file_name(file_name)?;
        let source = self.dir_for(from)?.join(file_name);
        let dest_dir = self.dir_for(to)?;
        fs::create_dir_all(&dest_dir)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &dest_dir))?;

        let temp = dest_dir.join(format!(".{file_name}.{}.tmp", Uuid::new_v4()));
        if let Err(e) = fs::copy(&source, &temp).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StorageError::from_io_with_path(&e, &source).into());
        }

        let dest = dest_dir.join(file_name);
        if let Err(e) = fs::rename(&temp, &dest).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StorageError::AtomicRenameFailed {
                message: format!("{}: {e}", dest.display()),
            }
            .into());
        }
        Ok(())
    }

    async fn delete_artifact(
        &self,
        location: &ArtifactLocation,
        file_name: &str,
    ) -> Result<bool, Error> {
        validate_file_name(file_name)?;
        let path = self.dir_for(location)?.join(file_name);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::from_io_with_path(&e, &path).into()),
        }
    }

    async fn clear_active(&self) -> Result<usize, Error> {
        let names = self.list_artifacts(&ArtifactLocation::Active).await?;
        let mut removed = 0;
        for name in &names {
            if self.delete_artifact(&ArtifactLocation::Active, name).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn create_backup(&self) -> Result<String, Error> {
        fs::create_dir_all(&self.backups_dir)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &self.backups_dir))?;

        let stamp = Utc::now().format("%Y%m%d_%H%M%S_%3f").to_string();
        let mut attempt = 0u32;
        loop {
            let name = if attempt == 0 {
                format!("backup_{stamp}")
            } else {
                format!("backup_{stamp}_{attempt}")
            };
            let path = self.backups_dir.join(&name);
            match fs::create_dir(&path).await {
                Ok(()) => return Ok(name),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(StorageError::from_io_with_path(&e, &path).into()),
            }
        }
    }

    async fn list_backups(&self) -> Result<Vec<String>, Error> {
        let mut entries = match fs::read_dir(&self.backups_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::from_io_with_path(&e, &self.backups_dir).into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, &self.backups_dir))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            if !is_dir {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with("backup_") {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
