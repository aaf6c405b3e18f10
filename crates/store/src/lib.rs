#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Blob storage for modhost
//!
//! Two kinds of blobs live here: small JSON documents (the package lists and
//! the command log) and artifact files placed in the live directory the
//! server loads from. Every write goes through a temporary sibling and a
//! rename so readers never observe a half-written blob.

mod archive;
mod local;

pub use archive::pack_artifacts;
pub use local::LocalBlobStore;

use modhost_errors::Error;
use std::fmt;

/// Where an artifact blob lives
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactLocation {
    /// The live directory read by the server
    Active,
    /// A named backup created before an install
    Backup(String),
}

impl fmt::Display for ArtifactLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Backup(name) => write!(f, "backup {name}"),
        }
    }
}

#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Read a document; `None` when it has never been written
    async fn read_document(&self, name: &str) -> Result<Option<Vec<u8>>, Error>;

    /// Replace a document atomically
    async fn write_document(&self, name: &str, bytes: &[u8]) -> Result<(), Error>;

    /// Managed artifact file names at a location, sorted. A missing
    /// directory holds no artifacts.
    async fn list_artifacts(&self, location: &ArtifactLocation) -> Result<Vec<String>, Error>;

    async fn read_artifact(
        &self,
        location: &ArtifactLocation,
        file_name: &str,
    ) -> Result<Vec<u8>, Error>;

    /// Write an artifact into the live directory atomically. Names that
    /// backup and clear would not see are refused.
    async fn place_artifact(&self, file_name: &str, bytes: &[u8]) -> Result<(), Error>;

    async fn copy_artifact(
        &self,
        from: &ArtifactLocation,
        to: &ArtifactLocation,
        file_name: &str,
    ) -> Result<(), Error>;

    /// Returns false when the artifact was already absent
    async fn delete_artifact(
        &self,
        location: &ArtifactLocation,
        file_name: &str,
    ) -> Result<bool, Error>;

    /// Delete every managed artifact from the live directory. Stops at the
    /// first failure.
    async fn clear_active(&self) -> Result<usize, Error>;

    /// Create a new, never-before-used backup location
    async fn create_backup(&self) -> Result<String, Error>;

    /// Backup names, oldest first
    async fn list_backups(&self) -> Result<Vec<String>, Error>;
}

/// Reject names that could escape their directory
pub(crate) fn validate_file_name(name: &str) -> Result<(), Error> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if invalid {
        return Err(modhost_errors::StorageError::InvalidPath {
            path: name.to_string(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_validation() {
        assert!(validate_file_name("sodium-0.5.jar").is_ok());
        assert!(validate_file_name("..").is_err());
        assert!(validate_file_name("../escape.jar").is_err());
        assert!(validate_file_name("nested/mod.jar").is_err());
        assert!(validate_file_name("").is_err());
    }

    #[test]
    fn location_display() {
        assert_eq!(ArtifactLocation::Active.to_string(), "active");
        assert_eq!(
            ArtifactLocation::Backup("backup_1".into()).to_string(),
            "backup backup_1"
        );
    }
}
