//! Core types, axis constraints, and error types for the Trellis grid engine.
//!
//! This crate provides the foundational types shared by the sizing engine:
//! - Geometry (bounds, insets) and alignment values
//! - Grow priorities and content orientation
//! - Row/column constraints with their size sentinels
//! - Configuration errors

pub mod constraints;
pub mod errors;
pub mod types;

pub use constraints::*;
pub use errors::*;
pub use types::*;
