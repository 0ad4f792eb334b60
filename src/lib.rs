//! Integer arithmetic through postfix notation.
//!
//! An expression such as `2+3*sqrt(16)` is checked for balanced parentheses,
//! converted to postfix (`2 3 16 sqrt * +`) and folded on a value stack.
//! Supported: integer literals, `+ - * / ^`, parentheses, postfix `!` and the
//! functions `sin cos tan` (degrees), `log` (base 10) and `sqrt`.
//!
//! ```
//! use postfix_calc::{Calculator, History};
//!
//! let history = History::new();
//! let calc = Calculator::new("2 + 3 * 4")?;
//! assert_eq!(calc.to_postfix()?.to_string(), "2 3 4 * +");
//! assert_eq!(calc.evaluate(&history)?, 14.0);
//! assert_eq!(history.snapshot()[0].formatted_result(), "14.00000000");
//! # Ok::<(), postfix_calc::CalcError>(())
//! ```

pub mod error;
pub mod eval;
pub mod history;
pub mod lex;
pub mod postfix;
pub mod validate;

pub use error::{CalcError, Result};
pub use eval::evaluate_postfix;
pub use history::{History, HistoryEntry};
pub use lex::Lexer;
pub use postfix::{Postfix, PostfixToken};

/// One validated expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculator {
    expression: String,
}

impl Calculator {
    /// Strips all whitespace from `input` and checks its parentheses.
    pub fn new(input: &str) -> Result<Self> {
        let expression: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        validate::check_parentheses(&expression)?;
        Ok(Self { expression })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn to_postfix(&self) -> Result<Postfix> {
        postfix::to_postfix(&self.expression)
    }

    /// Evaluates without touching any history.
    pub fn value(&self) -> Result<f64> {
        self.to_postfix()?.evaluate()
    }

    /// Evaluates and, on success only, appends the result to `history`.
    pub fn evaluate(&self, history: &History) -> Result<f64> {
        let postfix = self.to_postfix()?;
        let result = postfix.evaluate()?;
        history.record(self.expression.as_str(), postfix.to_string(), result);
        Ok(result)
    }
}
