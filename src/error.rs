use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

const EXPRESSION: &str = "<expression>";
const POSTFIX: &str = "<postfix>";

#[derive(Error, Debug, Diagnostic)]
#[error("unmatched `{paren}` in expression")]
#[diagnostic(
    code(calc::imbalanced_parentheses),
    help("every `(` needs a matching `)` somewhere after it")
)]
pub struct ImbalancedParentheses {
    #[source_code]
    src: NamedSource<String>,

    #[label("this parenthesis")]
    bad_bit: SourceSpan,

    pub paren: char,
}

impl ImbalancedParentheses {
    pub(crate) fn at(expression: &str, offset: usize, paren: char) -> Self {
        Self {
            src: NamedSource::new(EXPRESSION, expression.to_string()),
            bad_bit: SourceSpan::from(offset..offset + paren.len_utf8()),
            paren,
        }
    }

    /// Byte offset of the offending parenthesis in the stripped expression.
    pub fn offset(&self) -> usize {
        self.bad_bit.offset()
    }
}

#[derive(Error, Debug, Diagnostic)]
#[error("Unsupported character '{token}'")]
#[diagnostic(
    code(calc::unsupported_character),
    help("expressions may only use digits, `+ - * / ^ !`, parentheses and sin, cos, tan, log, sqrt")
)]
pub struct UnsupportedCharacter {
    #[source_code]
    src: NamedSource<String>,

    #[label("this character")]
    bad_bit: SourceSpan,

    pub token: char,
}

impl UnsupportedCharacter {
    pub(crate) fn at(name: Option<&str>, whole: &str, offset: usize, token: char) -> Self {
        Self {
            src: NamedSource::new(name.unwrap_or(EXPRESSION), whole.to_string()),
            bad_bit: SourceSpan::from(offset..offset + token.len_utf8()),
            token,
        }
    }

    pub fn offset(&self) -> usize {
        self.bad_bit.offset()
    }
}

#[derive(Error, Debug, Diagnostic)]
#[error("Invalid token '{token}'")]
#[diagnostic(
    code(calc::invalid_token),
    help("postfix tokens are integers, `+ - * / ^ !` or one of sin, cos, tan, log, sqrt")
)]
pub struct InvalidToken {
    #[source_code]
    src: NamedSource<String>,

    #[label("not an operand or operator")]
    bad_bit: SourceSpan,

    pub token: String,
}

impl InvalidToken {
    pub(crate) fn at(postfix: &str, span: SourceSpan, token: &str) -> Self {
        Self {
            src: NamedSource::new(POSTFIX, postfix.to_string()),
            bad_bit: span,
            token: token.to_string(),
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
#[error("stack underflow: {context}")]
#[diagnostic(
    code(calc::stack_underflow),
    help("every operator and function needs its operands earlier in the postfix sequence")
)]
pub struct StackUnderflow {
    #[source_code]
    src: NamedSource<String>,

    #[label("missing operand")]
    bad_bit: Option<SourceSpan>,

    pub context: String,
}

impl StackUnderflow {
    pub(crate) fn at(
        postfix: &str,
        span: SourceSpan,
        token: &str,
        needed: usize,
        found: usize,
    ) -> Self {
        let noun = if needed == 1 { "operand" } else { "operands" };
        Self {
            src: NamedSource::new(POSTFIX, postfix.to_string()),
            bad_bit: Some(span),
            context: format!("`{token}` needs {needed} {noun} but only {found} available"),
        }
    }

    pub(crate) fn empty(postfix: &str) -> Self {
        Self {
            src: NamedSource::new(POSTFIX, postfix.to_string()),
            bad_bit: None,
            context: "no value left to return".to_string(),
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
#[error("factorial is undefined for {operand}")]
#[diagnostic(
    code(calc::factorial_domain),
    help("`!` accepts non-negative operands only")
)]
pub struct FactorialDomain {
    #[source_code]
    src: NamedSource<String>,

    #[label("applied here")]
    bad_bit: SourceSpan,

    pub operand: f64,
}

impl FactorialDomain {
    pub(crate) fn at(postfix: &str, span: SourceSpan, operand: f64) -> Self {
        Self {
            src: NamedSource::new(POSTFIX, postfix.to_string()),
            bad_bit: span,
            operand,
        }
    }
}

/// Every way building, converting or evaluating an expression can fail.
#[derive(Error, Debug, Diagnostic)]
pub enum CalcError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    ImbalancedParentheses(#[from] ImbalancedParentheses),

    #[error(transparent)]
    #[diagnostic(transparent)]
    UnsupportedCharacter(#[from] UnsupportedCharacter),

    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidToken(#[from] InvalidToken),

    #[error(transparent)]
    #[diagnostic(transparent)]
    StackUnderflow(#[from] StackUnderflow),

    #[error(transparent)]
    #[diagnostic(transparent)]
    FactorialDomain(#[from] FactorialDomain),
}

pub type Result<T> = std::result::Result<T, CalcError>;
