use std::fmt::Display;

use crate::error::{CalcError, UnsupportedCharacter};
use crate::postfix::BinaryOp;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'de> {
    pub kind: TokenKind,
    pub literal: &'de str,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    Bang,
    Operator(BinaryOp),
    /// A maximal run of letters; only some runs name a known function.
    Name,
    Number(f64),
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.literal;
        match self.kind {
            TokenKind::LeftParen => write!(f, "LEFT_PAREN {lit} null"),
            TokenKind::RightParen => write!(f, "RIGHT_PAREN {lit} null"),
            TokenKind::Bang => write!(f, "BANG {lit} null"),
            TokenKind::Operator(BinaryOp::Add) => write!(f, "PLUS {lit} null"),
            TokenKind::Operator(BinaryOp::Sub) => write!(f, "MINUS {lit} null"),
            TokenKind::Operator(BinaryOp::Mul) => write!(f, "STAR {lit} null"),
            TokenKind::Operator(BinaryOp::Div) => write!(f, "SLASH {lit} null"),
            TokenKind::Operator(BinaryOp::Pow) => write!(f, "CARET {lit} null"),
            TokenKind::Name => write!(f, "NAME {lit} null"),
            TokenKind::Number(n) => write!(f, "NUMBER {lit} {n}"),
        }
    }
}

pub struct Lexer<'de> {
    name: Option<&'de str>,
    whole: &'de str,
    rest: &'de str,
    pub byte: usize,
}

impl<'de> Lexer<'de> {
    pub fn new(name: Option<&'de str>, input: &'de str) -> Self {
        Lexer {
            name,
            whole: input,
            rest: input,
            byte: 0,
        }
    }
}

impl<'de> Iterator for Lexer<'de> {
    type Item = Result<Token<'de>, CalcError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut chars = self.rest.chars();
            let c = chars.next()?;
            let literal = &self.rest[..c.len_utf8()];
            let offset = self.byte;
            let cur = self.rest;
            self.rest = chars.as_str();
            self.byte += c.len_utf8();

            enum Started {
                Number,
                Name,
            }

            let process = |kind: TokenKind| {
                Some(Ok(Token {
                    kind,
                    literal,
                    offset,
                }))
            };

            let started = match c {
                '(' => return process(TokenKind::LeftParen),
                ')' => return process(TokenKind::RightParen),
                '!' => return process(TokenKind::Bang),
                '+' => return process(TokenKind::Operator(BinaryOp::Add)),
                '-' => return process(TokenKind::Operator(BinaryOp::Sub)),
                '*' => return process(TokenKind::Operator(BinaryOp::Mul)),
                '/' => return process(TokenKind::Operator(BinaryOp::Div)),
                '^' => return process(TokenKind::Operator(BinaryOp::Pow)),
                '0'..='9' => Started::Number,
                c if c.is_alphabetic() => Started::Name,
                c if c.is_whitespace() => continue,
                c => {
                    return Some(Err(UnsupportedCharacter::at(
                        self.name,
                        self.whole,
                        offset,
                        c,
                    )
                    .into()));
                }
            };

            let end = match started {
                Started::Number => cur.find(|c: char| !c.is_ascii_digit()),
                Started::Name => cur.find(|c: char| !c.is_alphabetic()),
            }
            .unwrap_or(cur.len());

            let literal = &cur[..end];
            let extra_bytes = literal.len() - c.len_utf8();
            self.byte += extra_bytes;
            self.rest = &self.rest[extra_bytes..];

            let kind = match started {
                // a digit run always parses; absurdly long ones come back as infinity
                Started::Number => TokenKind::Number(literal.parse().unwrap_or(f64::INFINITY)),
                Started::Name => TokenKind::Name,
            };

            return Some(Ok(Token {
                kind,
                literal,
                offset,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(None, input)
            .map(|token| token.map(|token| token.kind))
            .collect::<Result<_, _>>()
            .expect("lexes")
    }

    #[test]
    fn digit_and_letter_runs_are_single_tokens() {
        assert_eq!(
            kinds("12+sqrt(345)"),
            vec![
                TokenKind::Number(12.0),
                TokenKind::Operator(BinaryOp::Add),
                TokenKind::Name,
                TokenKind::LeftParen,
                TokenKind::Number(345.0),
                TokenKind::RightParen,
            ]
        );
    }

    #[test]
    fn literals_and_offsets_point_into_input() {
        let tokens: Vec<_> = Lexer::new(None, "log(100)!")
            .collect::<Result<_, _>>()
            .expect("lexes");
        let seen: Vec<_> = tokens.iter().map(|t| (t.literal, t.offset)).collect();
        assert_eq!(
            seen,
            vec![("log", 0), ("(", 3), ("100", 4), (")", 7), ("!", 8)]
        );
    }

    #[test]
    fn whitespace_is_skipped() {
        assert_eq!(
            kinds(" 2 ^\t3 "),
            vec![
                TokenKind::Number(2.0),
                TokenKind::Operator(BinaryOp::Pow),
                TokenKind::Number(3.0),
            ]
        );
    }

    #[test]
    fn unsupported_character_reports_its_offset() {
        let err = Lexer::new(None, "1+2%3")
            .find_map(Result::err)
            .expect("fails on `%`");
        match err {
            CalcError::UnsupportedCharacter(e) => {
                assert_eq!(e.token, '%');
                assert_eq!(e.offset(), 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decimal_point_is_unsupported() {
        let err = Lexer::new(None, "1.5").find_map(Result::err);
        assert!(matches!(
            err,
            Some(CalcError::UnsupportedCharacter(ref e)) if e.token == '.'
        ));
    }

    #[test]
    fn display_matches_token_listing() {
        let listing: Vec<_> = Lexer::new(None, "7*x")
            .map(|token| token.expect("lexes").to_string())
            .collect();
        assert_eq!(listing, vec!["NUMBER 7 7", "STAR * null", "NAME x null"]);
    }
}
