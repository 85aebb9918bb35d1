//! Formula token model

use std::fmt;

use reckon_core::CellLabel;

use crate::error::{FormulaError, FormulaResult};

/// An ordered token sequence forming one formula (infix on input, postfix
/// after conversion)
pub type Formula = Vec<Token>;

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Binding strength used by the infix-to-postfix conversion
    ///
    /// Additive operators bind at 1, multiplicative at 2. Conversion treats
    /// anything else on its stack (an open parenthesis) as 0.
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide => 2,
        }
    }

    /// Apply the operator with standard floating-point semantics
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
        }
    }

    /// The operator's surface symbol
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One token of a tokenized formula
///
/// Tokens arrive from the upstream tokenizer as strings and are tagged once
/// at [`Token::classify`]; everything downstream works on the tagged form
/// and never re-derives a token's kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Numeric literal, already parsed
    Number(f64),
    /// Reference to another cell
    CellRef(CellLabel),
    /// Binary arithmetic operator
    Op(Operator),
    /// Open parenthesis
    LParen,
    /// Close parenthesis
    RParen,
}

impl Token {
    /// Classify one raw token string
    ///
    /// Classification order matches the rest of the system: numeric
    /// parseability first, then cell-label validity, then the fixed operator
    /// and parenthesis set. Anything else is unrecognized.
    pub fn classify(raw: &str) -> FormulaResult<Self> {
        if let Ok(number) = raw.parse::<f64>() {
            return Ok(Token::Number(number));
        }
        if let Ok(label) = CellLabel::parse(raw) {
            return Ok(Token::CellRef(label));
        }
        match raw {
            "+" => Ok(Token::Op(Operator::Add)),
            "-" => Ok(Token::Op(Operator::Subtract)),
            "*" => Ok(Token::Op(Operator::Multiply)),
            "/" => Ok(Token::Op(Operator::Divide)),
            "(" => Ok(Token::LParen),
            ")" => Ok(Token::RParen),
            _ => Err(FormulaError::UnrecognizedToken(raw.to_string())),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::CellRef(label) => write!(f, "{}", label),
            Token::Op(op) => write!(f, "{}", op),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

/// Classify a whole pre-split token sequence
///
/// Fails on the first unrecognized token; a sequence either becomes a
/// [`Formula`] in full or not at all.
pub fn classify_formula<S: AsRef<str>>(raw: &[S]) -> FormulaResult<Formula> {
    raw.iter().map(|s| Token::classify(s.as_ref())).collect()
}
