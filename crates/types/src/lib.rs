#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for modhost
//!
//! This crate provides the records persisted by the package lists, the
//! registry view the resolver consumes, and the reports returned by
//! install and removal operations.

pub mod command;
pub mod host;
pub mod package;
pub mod registry;
pub mod reports;
pub mod resolution;

// Re-export commonly used types
pub use command::CommandRecord;
pub use host::ContainerState;
pub use package::{ListName, PackageRecord, ProjectLookup};
pub use registry::{
    DependencyType, ProjectDetails, ProjectFile, ProjectVersion, RegistryDependency, SearchHit,
    SearchPage, VersionFile, VersionRecord,
};
pub use reports::{InstallOutcome, InstallReport, RemovalReport, SkippedRecord, StageReport};
pub use resolution::{KnownEdge, Resolution};

/// Current time as unix seconds, the timestamp format used in persisted documents
#[must_use]
pub fn unix_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
