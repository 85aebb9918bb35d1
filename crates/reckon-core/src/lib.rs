//! # reckon-core
//!
//! Core cell model for the reckon spreadsheet engine.
//!
//! This crate provides the foundation types the evaluation engine is built
//! on:
//! - [`CellLabel`] - Validated A1-style cell labels
//! - [`CellError`] - The error-classification vocabulary shared with the
//!   store and UI layers
//! - [`Cell`] - A cell's raw formula tokens, computed value, and error state
//! - [`Sheet`] and the [`CellSource`] trait - Sparse storage and the
//!   read-only lookup seam the evaluator consumes
//!
//! ## Example
//!
//! ```rust
//! use reckon_core::{CellLabel, Sheet};
//!
//! let mut sheet = Sheet::new();
//! let a1 = CellLabel::parse("A1").unwrap();
//! sheet.set_value(a1, 42.0);
//!
//! assert_eq!(sheet.cell(a1).unwrap().value(), 42.0);
//! ```

pub mod cell;
pub mod error;
pub mod label;
pub mod sheet;

// Re-exports for convenience
pub use cell::{Cell, CellError};
pub use error::{Error, Result};
pub use label::CellLabel;
pub use sheet::{CellSource, Sheet};

/// Maximum number of rows in a sheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a sheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
