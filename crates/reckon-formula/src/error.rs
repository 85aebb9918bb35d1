//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur at the token classification boundary
///
/// Everything that can go wrong *during* evaluation is reported as data in
/// the returned outcome, not as an `Err`; this type covers only input that
/// never becomes a token sequence at all.
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Token is not a number, cell label, operator, or parenthesis
    #[error("Unrecognized token: '{0}'")]
    UnrecognizedToken(String),
}
