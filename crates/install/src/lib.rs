#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Install pipeline and removal cascade for modhost
//!
//! The [`Installer`] promotes every record in the ready list into the
//! installed list, placing its artifact in the live directory. The
//! [`Uninstaller`] takes a record and its orphaned dependencies out of one
//! list. Both hold the package list lock for their whole run.

mod installer;
mod uninstaller;

pub use installer::Installer;
pub use uninstaller::Uninstaller;

use std::time::Duration;

/// Default bound on a single artifact download
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);
