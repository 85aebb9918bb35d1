//! # reckon-formula
//!
//! Formula evaluation engine for reckon.
//!
//! This crate provides:
//! - Token classification (raw token strings → tagged [`Token`]s)
//! - Infix-to-postfix conversion (shunting-yard with inline cell resolution)
//! - Postfix evaluation (stack reduction to a single number)
//! - Structured outcomes carrying the error vocabulary shared with the cell
//!   store and UI
//!
//! Tokenization of raw formula text happens upstream; this crate consumes
//! pre-split token sequences and reads cell values through the
//! [`reckon_core::CellSource`] seam.
//!
//! ## Example
//!
//! ```rust
//! use reckon_core::{CellLabel, Sheet};
//! use reckon_formula::{classify_formula, Evaluator};
//!
//! let mut sheet = Sheet::new();
//! sheet.set_value(CellLabel::parse("A1").unwrap(), 2.0);
//!
//! let formula = classify_formula(&["(", "1", "+", "A1", ")", "*", "3"]).unwrap();
//! let outcome = Evaluator::new(&sheet).evaluate(&formula);
//! assert_eq!(outcome.value(), Some(9.0));
//! ```

pub mod error;
pub mod evaluator;
pub mod token;

pub use error::{FormulaError, FormulaResult};
pub use evaluator::{EvalOutcome, Evaluator};
pub use token::{classify_formula, Formula, Operator, Token};
