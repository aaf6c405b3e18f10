#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Dependency resolution for modhost
//!
//! Walks the required dependencies of a registry version depth-first and
//! returns every project not already tracked, each as a package record
//! carrying the version ids that required it. The walk only needs a
//! read-only set of known project ids; merging the result into the package
//! lists is the caller's job.

mod resolver;

pub use resolver::Resolver;
