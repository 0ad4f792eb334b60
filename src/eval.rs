use miette::SourceSpan;
use tracing::{debug, warn};

use crate::error::{FactorialDomain, InvalidToken, Result, StackUnderflow};
use crate::postfix::{BinaryOp, Function, Postfix, PostfixToken};

/// Largest `n` whose factorial is still finite as an `f64`.
pub const MAX_FACTORIAL: u32 = 170;

/// Evaluates space-separated postfix text such as `"2 3 4 * +"`.
pub fn evaluate_postfix(text: &str) -> Result<f64> {
    Postfix::from_text(text).evaluate()
}

pub struct Evaluator<'a> {
    postfix: &'a Postfix,
    /// Rendered postfix text; error labels point into it.
    source: String,
    stack: Vec<f64>,
}

impl<'a> Evaluator<'a> {
    pub fn new(postfix: &'a Postfix) -> Self {
        Self {
            postfix,
            source: postfix.to_string(),
            stack: Vec::with_capacity(postfix.len()),
        }
    }

    pub fn run(mut self) -> Result<f64> {
        let postfix = self.postfix;
        let mut offset = 0;
        for token in postfix.tokens() {
            let text = token.to_string();
            let span = SourceSpan::from(offset..offset + text.len());
            offset += text.len() + 1;

            let value = match token {
                PostfixToken::Number { value, .. } => *value,
                PostfixToken::BinaryOp(op) => {
                    let [lhs, rhs] = self.operands::<2>(&text, span)?;
                    apply_operator(*op, lhs, rhs)
                }
                PostfixToken::Function(function) => {
                    let [operand] = self.operands::<1>(&text, span)?;
                    apply_function(*function, operand)
                }
                PostfixToken::Factorial => {
                    let [operand] = self.operands::<1>(&text, span)?;
                    factorial(operand)
                        .ok_or_else(|| FactorialDomain::at(&self.source, span, operand))?
                }
                PostfixToken::Name(name) => {
                    return Err(InvalidToken::at(&self.source, span, name).into());
                }
            };
            self.stack.push(value);
        }

        let Some(result) = self.stack.pop() else {
            return Err(StackUnderflow::empty(&self.source).into());
        };
        if !self.stack.is_empty() {
            warn!(
                postfix = %self.source,
                leftover = self.stack.len(),
                "operands left on the stack, returning the top value"
            );
        }
        debug!(postfix = %self.source, result, "evaluated postfix");
        Ok(result)
    }

    /// Pops the top `N` values, deepest first.
    fn operands<const N: usize>(&mut self, token: &str, span: SourceSpan) -> Result<[f64; N]> {
        let found = self.stack.len();
        let underflow = |source: &str| StackUnderflow::at(source, span, token, N, found);
        let Some(at) = found.checked_sub(N) else {
            return Err(underflow(&self.source).into());
        };
        self.stack
            .split_off(at)
            .try_into()
            .map_err(|_| underflow(&self.source).into())
    }
}

pub fn apply_operator(op: BinaryOp, lhs: f64, rhs: f64) -> f64 {
    match op {
        BinaryOp::Add => lhs + rhs,
        BinaryOp::Sub => lhs - rhs,
        BinaryOp::Mul => lhs * rhs,
        BinaryOp::Div => lhs / rhs,
        BinaryOp::Pow => lhs.powf(rhs),
    }
}

/// Trigonometric functions take degrees; `log` is base 10.
pub fn apply_function(function: Function, operand: f64) -> f64 {
    match function {
        Function::Sin => operand.to_radians().sin(),
        Function::Cos => operand.to_radians().cos(),
        Function::Tan => operand.to_radians().tan(),
        Function::Log => operand.log10(),
        Function::Sqrt => operand.sqrt(),
    }
}

/// Factorial of `operand` truncated toward zero.
///
/// Returns `None` for NaN and for operands that truncate below zero. Anything
/// past [`MAX_FACTORIAL`] is `+inf`, which keeps the recursion depth bounded.
pub fn factorial(operand: f64) -> Option<f64> {
    let n = operand.trunc();
    if n.is_nan() || n < 0.0 {
        return None;
    }
    if n > f64::from(MAX_FACTORIAL) {
        return Some(f64::INFINITY);
    }
    Some(product_down_from(n as u32))
}

fn product_down_from(n: u32) -> f64 {
    if n <= 1 {
        return 1.0;
    }
    f64::from(n) * product_down_from(n - 1)
}
