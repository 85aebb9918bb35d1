//! Cell record and the shared error-classification vocabulary

use std::fmt;

/// Error classification attached to a cell or produced by evaluation
///
/// These are the opaque identifiers shared across the whole system (engine,
/// cell store, UI). Display strings are significant to callers and must not
/// be re-invented per layer; several classifications intentionally share the
/// generic `#ERR` rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellError {
    /// #EMPTY! - Cell has no formula yet
    EmptyFormula,
    /// #DIV/0! - Division by zero
    DivideByZero,
    /// #REF! - Invalid cell reference
    InvalidCell,
    /// #ERR - Malformed formula (operand underflow, junk structure)
    InvalidFormula,
    /// #ERR - Malformed numeric literal
    InvalidNumber,
    /// #ERR - Operator in an illegal position
    InvalidOperator,
    /// #ERR - Unbalanced or empty parenthesis pair
    MissingParentheses,
    /// #ERR - Formula entry is incomplete
    Partial,
}

impl CellError {
    /// Get the display string for this classification
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::EmptyFormula => "#EMPTY!",
            CellError::DivideByZero => "#DIV/0!",
            CellError::InvalidCell => "#REF!",
            CellError::InvalidFormula => "#ERR",
            CellError::InvalidNumber => "#ERR",
            CellError::InvalidOperator => "#ERR",
            CellError::MissingParentheses => "#ERR",
            CellError::Partial => "#ERR",
        }
    }

    /// Parse a display string
    ///
    /// Five classifications share the `#ERR` rendering, so parsing is lossy:
    /// `#ERR` maps to [`CellError::InvalidFormula`], the general
    /// malformed-formula classification.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "#EMPTY!" => Some(CellError::EmptyFormula),
            "#DIV/0!" => Some(CellError::DivideByZero),
            "#REF!" => Some(CellError::InvalidCell),
            "#ERR" => Some(CellError::InvalidFormula),
            _ => None,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single cell: raw formula tokens, last computed value, current error
///
/// The formula is kept as the token strings the upstream tokenizer produced;
/// this crate never interprets them beyond emptiness. The value is whatever
/// the last evaluation computed (0 before any evaluation), and the error is
/// the classification currently attached to the cell, if any.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Raw formula tokens as entered
    formula: Vec<String>,
    /// Last computed value
    value: f64,
    /// Current error classification
    error: Option<CellError>,
}

impl Cell {
    /// Create an empty cell (no formula, value 0, no error)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cell holding a numeric literal
    ///
    /// The literal becomes both the cell's formula and its computed value,
    /// as if the number had been entered directly.
    pub fn with_value(value: f64) -> Self {
        Self {
            formula: vec![value.to_string()],
            value,
            error: None,
        }
    }

    /// Create a cell carrying an error classification
    pub fn with_error(error: CellError) -> Self {
        Self {
            formula: Vec::new(),
            value: 0.0,
            error: Some(error),
        }
    }

    /// Get the raw formula tokens
    pub fn formula(&self) -> &[String] {
        &self.formula
    }

    /// Get the formula as display text
    pub fn formula_text(&self) -> String {
        self.formula.join(" ")
    }

    /// Check if the cell has no formula
    pub fn is_empty(&self) -> bool {
        self.formula.is_empty()
    }

    /// Get the last computed value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Get the current error classification
    pub fn error(&self) -> Option<CellError> {
        self.error
    }

    /// Replace the formula tokens
    pub fn set_formula(&mut self, tokens: Vec<String>) {
        self.formula = tokens;
    }

    /// Set the computed value
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Set or clear the error classification
    pub fn set_error(&mut self, error: Option<CellError>) {
        self.error = error;
    }
}
