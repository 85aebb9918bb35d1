//! The formula evaluation engine
//!
//! Evaluation runs two stages over a tokenized infix formula: a
//! shunting-yard rewrite into postfix order that resolves cell references to
//! numeric literals as it goes, then a stack reduction of the postfix
//! sequence to a single number. Every failure is reported as a
//! classification inside the returned [`EvalOutcome`], never as a panic or
//! an `Err`; the surrounding system stores these classifications in cells
//! and shows them in the UI.

use reckon_core::{CellError, CellLabel, CellSource};

use crate::token::{Formula, Operator, Token};

/// The outcome of one `evaluate` call
///
/// Carries the numeric result together with the error classification
/// recorded while producing it, if any. A halted reduction still surfaces
/// the residual value at the point of failure; only a parenthesis problem
/// aborts before reduction and yields no value at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalOutcome {
    value: Option<f64>,
    error: Option<CellError>,
}

impl EvalOutcome {
    /// A successful outcome
    pub fn ok(value: f64) -> Self {
        Self {
            value: Some(value),
            error: None,
        }
    }

    /// An outcome that halted with an error but still carries a value
    pub fn with_error(value: f64, error: CellError) -> Self {
        Self {
            value: Some(value),
            error: Some(error),
        }
    }

    /// An outcome aborted before reduction; carries no value
    ///
    /// Callers holding a previous result keep it as-is: an aborted call
    /// produced nothing to replace it with.
    pub fn aborted(error: CellError) -> Self {
        Self {
            value: None,
            error: Some(error),
        }
    }

    /// The numeric result, absent only for aborted calls
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// The recorded error classification, if any
    pub fn error(&self) -> Option<CellError> {
        self.error
    }

    /// Check whether an error classification was recorded
    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }
}

/// Evaluates tokenized infix formulas against a cell source
///
/// The evaluator borrows a [`CellSource`] once and is reused across calls;
/// all per-call state (stacks, output) is local, so a shared reference is
/// all it ever needs.
///
/// # Examples
/// ```
/// use reckon_core::{CellLabel, Sheet};
/// use reckon_formula::{classify_formula, Evaluator};
///
/// let mut sheet = Sheet::new();
/// sheet.set_value(CellLabel::parse("A1").unwrap(), 4.0);
///
/// let formula = classify_formula(&["3", "+", "A1", "*", "2"]).unwrap();
/// let outcome = Evaluator::new(&sheet).evaluate(&formula);
///
/// assert_eq!(outcome.value(), Some(11.0));
/// assert!(!outcome.is_err());
/// ```
pub struct Evaluator<'a, S: CellSource> {
    source: &'a S,
}

impl<'a, S: CellSource> Evaluator<'a, S> {
    /// Create an evaluator reading from the given cell source
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Evaluate a tokenized infix formula to a single outcome
    ///
    /// A missing-parentheses error detected during conversion aborts the
    /// call before reduction; the outcome then carries no value. Every
    /// other recorded error still runs reduction on whatever postfix was
    /// built, so a divide-by-zero yields a visible infinity next to its
    /// classification, and a cell-resolution failure surfaces the value
    /// computed up to that token.
    pub fn evaluate(&self, formula: &[Token]) -> EvalOutcome {
        let (postfix, conversion_error) = self.convert(formula);

        if conversion_error == Some(CellError::MissingParentheses) {
            return EvalOutcome::aborted(CellError::MissingParentheses);
        }

        let (value, reduction_error) = reduce(&postfix);

        // The first recorded classification wins: a propagated cell error
        // must reach the caller unchanged even when the partial postfix
        // also fails to reduce.
        match conversion_error.or(reduction_error) {
            Some(error) => EvalOutcome::with_error(value, error),
            None => EvalOutcome::ok(value),
        }
    }

    /// Convert an infix formula to postfix order
    ///
    /// The conversion-only entry point for callers that want the rewritten
    /// sequence itself. Cell references are resolved to numeric literals,
    /// so the result contains only numbers and operators.
    pub fn to_postfix(&self, formula: &[Token]) -> Result<Formula, CellError> {
        match self.convert(formula) {
            (postfix, None) => Ok(postfix),
            (_, Some(error)) => Err(error),
        }
    }

    /// Shunting-yard rewrite with inline cell resolution
    ///
    /// Returns the postfix sequence built so far plus the first error
    /// recorded. On error the scan stops where it stands: later tokens are
    /// never examined and the operator stack is discarded.
    fn convert(&self, formula: &[Token]) -> (Formula, Option<CellError>) {
        let mut output: Formula = Vec::with_capacity(formula.len());
        let mut ops: Vec<Token> = Vec::new();

        for (index, token) in formula.iter().enumerate() {
            match *token {
                Token::Number(number) => output.push(Token::Number(number)),
                Token::CellRef(label) => match self.resolve_cell(label) {
                    Ok(value) => output.push(Token::Number(value)),
                    Err(error) => return (output, Some(error)),
                },
                Token::LParen => ops.push(Token::LParen),
                Token::RParen => {
                    // A close at the start, or right after an open, means an
                    // empty pair
                    if index == 0 || matches!(formula[index - 1], Token::LParen) {
                        return (output, Some(CellError::MissingParentheses));
                    }
                    loop {
                        match ops.pop() {
                            Some(Token::LParen) => break,
                            Some(op) => output.push(op),
                            // Ran out of stack without a matching open
                            None => return (output, Some(CellError::MissingParentheses)),
                        }
                    }
                }
                Token::Op(op) => {
                    // Equal precedence pops first, giving left-to-right
                    // associativity; an open parenthesis sits at 0 and
                    // never pops.
                    while let Some(&top) = ops.last() {
                        if stack_precedence(&top) < op.precedence() {
                            break;
                        }
                        ops.pop();
                        output.push(top);
                    }
                    ops.push(Token::Op(op));
                }
            }
        }

        // Drain the stack; an open parenthesis surviving to this point was
        // never closed
        while let Some(top) = ops.pop() {
            if matches!(top, Token::LParen) {
                return (output, Some(CellError::MissingParentheses));
            }
            output.push(top);
        }

        (output, None)
    }

    /// Resolve a cell reference to the number it contributes
    ///
    /// Reads only the external source. An error on the referenced cell
    /// propagates unchanged, unless it is the empty-formula marker; a cell
    /// with no stored formula (including a cell absent from the source
    /// entirely) is an invalid reference.
    fn resolve_cell(&self, label: CellLabel) -> Result<f64, CellError> {
        let cell = match self.source.cell(label) {
            Some(cell) => cell,
            None => return Err(CellError::InvalidCell),
        };

        if let Some(error) = cell.error() {
            if error != CellError::EmptyFormula {
                return Err(error);
            }
        }

        if cell.is_empty() {
            return Err(CellError::InvalidCell);
        }

        Ok(cell.value())
    }
}

// Parentheses on the stack act as a precedence-0 floor so operators never
// pop across them
fn stack_precedence(token: &Token) -> u8 {
    match token {
        Token::Op(op) => op.precedence(),
        _ => 0,
    }
}

/// Reduce a postfix sequence to a single value
///
/// Returns the value plus the error recorded, if any. Once an error is
/// recorded no further tokens are evaluated, but the partially-computed
/// value at the failure point is still surfaced.
fn reduce(postfix: &[Token]) -> (f64, Option<CellError>) {
    let mut stack: Vec<f64> = Vec::new();

    for token in postfix {
        match *token {
            Token::Number(number) => stack.push(number),
            Token::Op(op) => {
                // The right operand sits on top of the stack
                let right = match stack.pop() {
                    Some(value) => value,
                    None => return (0.0, Some(CellError::InvalidFormula)),
                };
                let left = match stack.pop() {
                    Some(value) => value,
                    // Underflow surfaces the operand that was popped
                    None => return (right, Some(CellError::InvalidFormula)),
                };
                if op == Operator::Divide && right == 0.0 {
                    return (f64::INFINITY, Some(CellError::DivideByZero));
                }
                stack.push(op.apply(left, right));
            }
            // Conversion resolves references and consumes parentheses, so
            // neither can appear in a postfix sequence it produced
            Token::CellRef(_) | Token::LParen | Token::RParen => {
                let residual = stack.first().copied().unwrap_or(0.0);
                return (residual, Some(CellError::InvalidFormula));
            }
        }
    }

    // The bottom of the stack is the result; an over-full stack (adjacent
    // literals) keeps the first value, an empty one falls back to 0
    (stack.first().copied().unwrap_or(0.0), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::classify_formula;
    use pretty_assertions::assert_eq;
    use reckon_core::{Cell, Sheet};

    fn eval(sheet: &Sheet, raw: &[&str]) -> EvalOutcome {
        let formula = classify_formula(raw).unwrap();
        Evaluator::new(sheet).evaluate(&formula)
    }

    fn eval_empty(raw: &[&str]) -> EvalOutcome {
        eval(&Sheet::new(), raw)
    }

    fn label(s: &str) -> CellLabel {
        CellLabel::parse(s).unwrap()
    }

    #[test]
    fn test_single_number() {
        assert_eq!(eval_empty(&["7"]), EvalOutcome::ok(7.0));
        assert_eq!(eval_empty(&["2.5"]), EvalOutcome::ok(2.5));
    }

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(eval_empty(&["3", "+", "4"]), EvalOutcome::ok(7.0));
        assert_eq!(eval_empty(&["10", "-", "4"]), EvalOutcome::ok(6.0));
        assert_eq!(eval_empty(&["6", "*", "7"]), EvalOutcome::ok(42.0));
        assert_eq!(eval_empty(&["7", "/", "2"]), EvalOutcome::ok(3.5));
    }

    #[test]
    fn test_precedence() {
        // Multiplication binds before addition
        assert_eq!(eval_empty(&["3", "+", "4", "*", "2"]), EvalOutcome::ok(11.0));
        assert_eq!(eval_empty(&["2", "*", "3", "+", "4"]), EvalOutcome::ok(10.0));
    }

    #[test]
    fn test_left_associativity() {
        // Equal precedence evaluates left to right: (10 - 3) - 2, not 10 - (3 - 2)
        assert_eq!(eval_empty(&["10", "-", "3", "-", "2"]), EvalOutcome::ok(5.0));
        assert_eq!(eval_empty(&["20", "/", "4", "/", "5"]), EvalOutcome::ok(1.0));
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(
            eval_empty(&["(", "3", "+", "4", ")", "*", "2"]),
            EvalOutcome::ok(14.0)
        );
        assert_eq!(
            eval_empty(&["2", "*", "(", "3", "+", "4", ")"]),
            EvalOutcome::ok(14.0)
        );
        assert_eq!(
            eval_empty(&["(", "(", "1", "+", "2", ")", ")", "*", "3"]),
            EvalOutcome::ok(9.0)
        );
    }

    #[test]
    fn test_empty_formula() {
        assert_eq!(eval_empty(&[]), EvalOutcome::ok(0.0));
    }

    #[test]
    fn test_divide_by_zero() {
        let outcome = eval_empty(&["5", "/", "0"]);
        assert_eq!(outcome.value(), Some(f64::INFINITY));
        assert_eq!(outcome.error(), Some(CellError::DivideByZero));
    }

    #[test]
    fn test_divide_by_computed_zero() {
        let outcome = eval_empty(&["1", "/", "(", "2", "-", "2", ")"]);
        assert_eq!(outcome.value(), Some(f64::INFINITY));
        assert_eq!(outcome.error(), Some(CellError::DivideByZero));
    }

    #[test]
    fn test_empty_parenthesis_pair() {
        let outcome = eval_empty(&["(", ")"]);
        assert_eq!(outcome.value(), None);
        assert_eq!(outcome.error(), Some(CellError::MissingParentheses));
    }

    #[test]
    fn test_unbalanced_parentheses() {
        // Close with nothing before it
        assert_eq!(
            eval_empty(&[")"]),
            EvalOutcome::aborted(CellError::MissingParentheses)
        );
        // Open that never closes
        assert_eq!(
            eval_empty(&["(", "5"]),
            EvalOutcome::aborted(CellError::MissingParentheses)
        );
        // Close without a matching open
        assert_eq!(
            eval_empty(&["5", ")"]),
            EvalOutcome::aborted(CellError::MissingParentheses)
        );
    }

    #[test]
    fn test_aborted_call_leaves_prior_result_alone() {
        let sheet = Sheet::new();
        let good = eval(&sheet, &["6", "*", "7"]);
        let mut last_result = good.value().unwrap();

        // The caller's update pattern: only overwrite when a value came back
        let aborted = eval(&sheet, &["(", ")"]);
        if let Some(value) = aborted.value() {
            last_result = value;
        }

        assert_eq!(last_result, 42.0);
        assert_eq!(aborted.error(), Some(CellError::MissingParentheses));
    }

    #[test]
    fn test_cell_reference() {
        let mut sheet = Sheet::new();
        sheet.set_value(label("A1"), 5.0);

        assert_eq!(eval(&sheet, &["A1", "+", "2"]), EvalOutcome::ok(7.0));
        assert_eq!(eval(&sheet, &["A1", "*", "A1"]), EvalOutcome::ok(25.0));
    }

    #[test]
    fn test_reference_to_empty_cell() {
        // Absent cell
        let outcome = eval_empty(&["A1"]);
        assert_eq!(outcome.value(), Some(0.0));
        assert_eq!(outcome.error(), Some(CellError::InvalidCell));

        // Present cell without a formula
        let mut sheet = Sheet::new();
        sheet.set_cell(label("A1"), Cell::new());
        let outcome = eval(&sheet, &["A1"]);
        assert_eq!(outcome.error(), Some(CellError::InvalidCell));

        // Present cell carrying only the empty-formula marker
        let mut sheet = Sheet::new();
        sheet.set_formula(label("A1"), Vec::new());
        let outcome = eval(&sheet, &["A1"]);
        assert_eq!(outcome.value(), Some(0.0));
        assert_eq!(outcome.error(), Some(CellError::InvalidCell));
    }

    #[test]
    fn test_propagated_cell_error() {
        let mut sheet = Sheet::new();
        sheet.set_error(label("B2"), CellError::DivideByZero);

        // The referenced cell's own classification comes through unchanged
        let outcome = eval(&sheet, &["B2", "+", "1"]);
        assert_eq!(outcome.value(), Some(0.0));
        assert_eq!(outcome.error(), Some(CellError::DivideByZero));
    }

    #[test]
    fn test_resolution_failure_keeps_partial_value() {
        // Conversion stops at the bad reference; the output built so far
        // still reduces
        let outcome = eval_empty(&["3", "+", "A1"]);
        assert_eq!(outcome.value(), Some(3.0));
        assert_eq!(outcome.error(), Some(CellError::InvalidCell));
    }

    #[test]
    fn test_conversion_error_wins_over_reduction_error() {
        // The partial postfix "2 *" underflows, but the invalid reference
        // was recorded first and must be the one surfaced
        let outcome = eval_empty(&["2", "*", "+", "A1"]);
        assert_eq!(outcome.value(), Some(2.0));
        assert_eq!(outcome.error(), Some(CellError::InvalidCell));
    }

    #[test]
    fn test_lone_operator() {
        let outcome = eval_empty(&["+"]);
        assert_eq!(outcome.value(), Some(0.0));
        assert_eq!(outcome.error(), Some(CellError::InvalidFormula));
    }

    #[test]
    fn test_underflow_surfaces_popped_operand() {
        // "5 + +" converts to postfix "5 + +"; the first operator pops 5
        // and then underflows
        let outcome = eval_empty(&["5", "+", "+"]);
        assert_eq!(outcome.value(), Some(5.0));
        assert_eq!(outcome.error(), Some(CellError::InvalidFormula));
    }

    #[test]
    fn test_adjacent_literals_keep_stack_bottom() {
        // No operator ever runs; the first value entered is the result
        assert_eq!(eval_empty(&["1", "2"]), EvalOutcome::ok(1.0));
    }

    #[test]
    fn test_idempotence() {
        let mut sheet = Sheet::new();
        sheet.set_value(label("A1"), 4.0);
        let raw = ["A1", "*", "(", "2", "+", "1", ")"];

        let first = eval(&sheet, &raw);
        let second = eval(&sheet, &raw);
        assert_eq!(first, second);
        assert_eq!(first, EvalOutcome::ok(12.0));
    }

    #[test]
    fn test_to_postfix() {
        let sheet = Sheet::new();
        let evaluator = Evaluator::new(&sheet);

        let formula = classify_formula(&["3", "+", "4", "*", "2"]).unwrap();
        let postfix = evaluator.to_postfix(&formula).unwrap();
        let rendered: Vec<String> = postfix.iter().map(|t| t.to_string()).collect();
        assert_eq!(rendered.join(" "), "3 4 2 * +");

        let formula = classify_formula(&["(", "3", "+", "4", ")", "*", "2"]).unwrap();
        let postfix = evaluator.to_postfix(&formula).unwrap();
        let rendered: Vec<String> = postfix.iter().map(|t| t.to_string()).collect();
        assert_eq!(rendered.join(" "), "3 4 + 2 *");
    }

    #[test]
    fn test_to_postfix_resolves_references() {
        let mut sheet = Sheet::new();
        sheet.set_value(label("A1"), 5.0);
        let evaluator = Evaluator::new(&sheet);

        let formula = classify_formula(&["A1", "+", "1"]).unwrap();
        let postfix = evaluator.to_postfix(&formula).unwrap();
        assert_eq!(postfix[0], Token::Number(5.0));
    }

    #[test]
    fn test_to_postfix_errors() {
        let sheet = Sheet::new();
        let evaluator = Evaluator::new(&sheet);

        let formula = classify_formula(&["(", ")"]).unwrap();
        assert_eq!(
            evaluator.to_postfix(&formula),
            Err(CellError::MissingParentheses)
        );

        let formula = classify_formula(&["A1"]).unwrap();
        assert_eq!(evaluator.to_postfix(&formula), Err(CellError::InvalidCell));
    }
}
