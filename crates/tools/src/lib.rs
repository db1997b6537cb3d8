//! Developer Tooling: point-cloud inspector used by the debug panel and CLI.
//!
//! # Invariants
//! - Inspection is read-only.

pub mod inspector;

pub use inspector::{CloudInspector, CloudSummary, PointInfo};
