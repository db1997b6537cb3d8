//! Shared value types used across the galaxy workspace.
//!
//! # Invariants
//! - Colors are linear RGB triples with channels in `[0, 1]`.
//! - Cloud ids are never reused.

pub mod color;
pub mod types;

pub use color::{ColorParseError, Rgb};
pub use types::CloudId;
