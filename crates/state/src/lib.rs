#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Persistent state for modhost
//!
//! Owns the `ready` and `installed` package lists and the console command
//! log. List documents are JSON arrays of package records written through
//! the blob store.

pub mod cascade;
mod codec;
pub mod commands;
pub mod lists;
pub mod merge;

pub use cascade::{plan_removal, CascadePlan};
pub use commands::{CommandLog, COMMANDS_DOCUMENT};
pub use lists::{ListTxn, PackageState};
