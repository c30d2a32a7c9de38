//! Parsing of GSD plan documents.
//!
//! A plan document is one unit of work inside a project's `.planning/`
//! directory, stored as `{phase}-{sequence}-PLAN.<ext>`. This crate turns the
//! file name and the semi-structured body of such a document into typed
//! values without touching the filesystem:
//!
//! - [`PlanId`]: the `(phase, sequence)` key of a plan
//! - [`PlanFileName`]: recognition of plan document file names
//! - [`PlanDocument`]: name, task markers and dependency references
//! - [`Warning`]: non-fatal problems found while parsing

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod document;
pub mod error;
pub mod file_name;
pub mod id;
pub mod reference;
pub mod warning;

pub use document::{PlanDocument, UNKNOWN_PLAN_NAME};
pub use error::{Error, Result};
pub use file_name::PlanFileName;
pub use id::PlanId;
pub use reference::{PlanRef, parse_references};
pub use warning::Warning;
