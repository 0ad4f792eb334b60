//! Infix to postfix conversion.
//!
//! The converter is a two-stack shunting-yard: operands go straight to the
//! output, operators wait on a pending stack until something of lower
//! precedence arrives. Function names rank below every binary operator, so
//! nothing displaces them; they leave the pending stack only when an enclosing
//! `)` closes or the input ends. `sin(30)+1` therefore converts to
//! `30 1 + sin`.

use std::fmt::Display;
use std::str::FromStr;

use tracing::debug;

use crate::Lexer;
use crate::error::Result;
use crate::lex::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Pow => '^',
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
            BinaryOp::Pow => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Log,
    Sqrt,
}

impl Function {
    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Log => "log",
            Function::Sqrt => "sqrt",
        }
    }
}

impl FromStr for Function {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sin" => Ok(Function::Sin),
            "cos" => Ok(Function::Cos),
            "tan" => Ok(Function::Tan),
            "log" => Ok(Function::Log),
            "sqrt" => Ok(Function::Sqrt),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostfixToken {
    /// Integer operand. `literal` is kept so the postfix text reproduces the
    /// digits exactly as typed.
    Number { value: f64, literal: String },
    BinaryOp(BinaryOp),
    Function(Function),
    Factorial,
    /// Letter run that is not a known function. Conversion lets it through;
    /// evaluation rejects it.
    Name(String),
}

impl PostfixToken {
    /// Classifies one whitespace-free piece of postfix text.
    pub fn from_text(text: &str) -> Self {
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            return PostfixToken::Number {
                value: text.parse().unwrap_or(f64::INFINITY),
                literal: text.to_string(),
            };
        }
        match text {
            "+" => PostfixToken::BinaryOp(BinaryOp::Add),
            "-" => PostfixToken::BinaryOp(BinaryOp::Sub),
            "*" => PostfixToken::BinaryOp(BinaryOp::Mul),
            "/" => PostfixToken::BinaryOp(BinaryOp::Div),
            "^" => PostfixToken::BinaryOp(BinaryOp::Pow),
            "!" => PostfixToken::Factorial,
            _ => match text.parse() {
                Ok(function) => PostfixToken::Function(function),
                Err(()) => PostfixToken::Name(text.to_string()),
            },
        }
    }
}

impl Display for PostfixToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostfixToken::Number { literal, .. } => write!(f, "{literal}"),
            PostfixToken::BinaryOp(op) => write!(f, "{}", op.symbol()),
            PostfixToken::Function(function) => write!(f, "{}", function.name()),
            PostfixToken::Factorial => write!(f, "!"),
            PostfixToken::Name(name) => write!(f, "{name}"),
        }
    }
}

/// A postfix token sequence in evaluation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Postfix {
    tokens: Vec<PostfixToken>,
}

impl Postfix {
    /// Splits postfix text on whitespace. Unknown pieces become
    /// [`PostfixToken::Name`] and fail at evaluation time.
    pub fn from_text(text: &str) -> Self {
        Postfix {
            tokens: text.split_whitespace().map(PostfixToken::from_text).collect(),
        }
    }

    pub fn tokens(&self) -> &[PostfixToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn evaluate(&self) -> Result<f64> {
        crate::eval::Evaluator::new(self).run()
    }
}

impl From<Vec<PostfixToken>> for Postfix {
    fn from(tokens: Vec<PostfixToken>) -> Self {
        Postfix { tokens }
    }
}

impl Display for Postfix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tokens = self.tokens.iter();
        if let Some(first) = tokens.next() {
            write!(f, "{first}")?;
        }
        for token in tokens {
            write!(f, " {token}")?;
        }
        Ok(())
    }
}

/// Entries of the pending (operator) stack.
#[derive(Debug, Clone, Copy)]
enum Pending<'de> {
    Operator(BinaryOp),
    Name(&'de str),
    LeftParen,
}

impl Pending<'_> {
    fn precedence(&self) -> u8 {
        match self {
            Pending::Operator(op) => op.precedence(),
            Pending::Name(_) | Pending::LeftParen => 0,
        }
    }

    fn into_output(self) -> Option<PostfixToken> {
        match self {
            Pending::Operator(op) => Some(PostfixToken::BinaryOp(op)),
            Pending::Name(name) => Some(match name.parse() {
                Ok(function) => PostfixToken::Function(function),
                Err(()) => PostfixToken::Name(name.to_string()),
            }),
            Pending::LeftParen => None,
        }
    }
}

/// Converts an infix expression to postfix.
///
/// Parentheses are assumed balanced; a stray `)` simply drains the pending
/// stack and a stray `(` is dropped at the end.
pub fn to_postfix(expression: &str) -> Result<Postfix> {
    let mut pending: Vec<Pending<'_>> = Vec::new();
    let mut output: Vec<PostfixToken> = Vec::new();

    for token in Lexer::new(None, expression) {
        let token = token?;
        match token.kind {
            TokenKind::Number(value) => output.push(PostfixToken::Number {
                value,
                literal: token.literal.to_string(),
            }),
            TokenKind::Name => pending.push(Pending::Name(token.literal)),
            TokenKind::Operator(op) => {
                // `>=` makes equal precedence pop first, so `^` groups left too
                while let Some(top) = pending.pop_if(|top| top.precedence() >= op.precedence()) {
                    output.extend(top.into_output());
                }
                pending.push(Pending::Operator(op));
            }
            TokenKind::LeftParen => pending.push(Pending::LeftParen),
            TokenKind::RightParen => {
                while let Some(top) = pending.pop() {
                    if matches!(top, Pending::LeftParen) {
                        break;
                    }
                    output.extend(top.into_output());
                }
            }
            TokenKind::Bang => output.push(PostfixToken::Factorial),
        }
    }

    while let Some(top) = pending.pop() {
        output.extend(top.into_output());
    }

    let postfix = Postfix::from(output);
    debug!(expression, postfix = %postfix, "converted to postfix");
    Ok(postfix)
}
