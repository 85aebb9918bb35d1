//! Cell label type

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use lazy_regex::regex_captures;
use std::fmt;
use std::str::FromStr;

/// A validated cell label (e.g., "A1", "ZZ99")
///
/// Labels are column letters followed by a 1-based row number. The accepted
/// grammar is strict: uppercase ASCII letters and a row with no leading zero
/// (`^[A-Z]+[1-9][0-9]*$`). This is the same rule the surrounding system's
/// tokenizer and UI apply, so a token either is a label everywhere or
/// nowhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellLabel {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: u16,
}

impl CellLabel {
    /// Create a label from row and column indices
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse a label from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use reckon_core::CellLabel;
    ///
    /// let label = CellLabel::parse("A1").unwrap();
    /// assert_eq!(label.row, 0);
    /// assert_eq!(label.col, 0);
    ///
    /// let label = CellLabel::parse("AB12").unwrap();
    /// assert_eq!(label.row, 11);
    /// assert_eq!(label.col, 27);
    ///
    /// assert!(CellLabel::parse("a1").is_err());
    /// assert!(CellLabel::parse("A0").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let (_, letters, digits) = match regex_captures!(r"^([A-Z]+)([1-9][0-9]*)$", s) {
            Some(captures) => captures,
            None => return Err(Error::InvalidLabel(s.to_string())),
        };

        let col = Self::letters_to_column(letters)?;

        let row: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidLabel(s.to_string()))?;

        // Rows are 1-based in labels, 0-based internally
        let row = row - 1;
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }

        Ok(Self { row, col })
    }

    /// Check whether a token is a syntactically valid cell label
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidLabel("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_uppercase() {
                return Err(Error::InvalidLabel(format!("invalid column letter '{}'", c)));
            }
            col = col * 26 + (c as u32 - 'A' as u32 + 1);
            if col > MAX_COLS as u32 {
                let col = (col - 1).min(u16::MAX as u32) as u16;
                return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
            }
        }

        Ok((col - 1) as u16) // Convert to 0-based
    }

    /// Format as an A1-style string
    pub fn to_a1_string(&self) -> String {
        let mut result = Self::column_to_letters(self.col);
        result.push_str(&(self.row + 1).to_string());
        result
    }
}

impl fmt::Display for CellLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
