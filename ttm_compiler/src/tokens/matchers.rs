//! Ordered lexeme recognizers
//!
//! Matchers are tried top to bottom and the first one that accepts a raw
//! token decides its kind. Fixed keyword and operator forms come before the
//! identifier pattern so `fn` or `main` never classify as identifiers.

use super::kind::LexemeKind;
use crate::config::compile_time::lexical::MAX_IDENTIFIER_LENGTH;

/// What a matcher accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Exact(&'static str),
    /// `[A-Za-z_][A-Za-z0-9_]*` up to the identifier length limit
    Identifier,
    /// `'...'` with no quote inside
    StringLiteral,
    /// One or more ASCII digits
    IntegerLiteral,
}

/// One recognizer in the ordered list
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    pub kind: LexemeKind,
    pub pattern: Pattern,
}

impl Matcher {
    const fn exact(kind: LexemeKind, text: &'static str) -> Self {
        Self {
            kind,
            pattern: Pattern::Exact(text),
        }
    }

    pub fn accepts(&self, text: &str) -> bool {
        match self.pattern {
            Pattern::Exact(expected) => text == expected,
            Pattern::Identifier => is_identifier(text),
            Pattern::StringLiteral => is_string_literal(text),
            Pattern::IntegerLiteral => is_integer_literal(text),
        }
    }
}

pub const MATCHERS: [Matcher; 30] = [
    Matcher::exact(LexemeKind::I32, "i32"),
    Matcher::exact(LexemeKind::Str, "str"),
    Matcher::exact(LexemeKind::Fn, "fn"),
    Matcher::exact(LexemeKind::If, "if"),
    Matcher::exact(LexemeKind::Else, "else"),
    Matcher::exact(LexemeKind::Let, "let"),
    Matcher::exact(LexemeKind::Ret, "ret"),
    Matcher::exact(LexemeKind::Echo, "echo"),
    Matcher::exact(LexemeKind::Main, "main"),
    Matcher::exact(LexemeKind::OpenParen, "("),
    Matcher::exact(LexemeKind::CloseParen, ")"),
    Matcher::exact(LexemeKind::Semicolon, ";"),
    Matcher::exact(LexemeKind::Comma, ","),
    Matcher::exact(LexemeKind::OpenBrace, "{"),
    Matcher::exact(LexemeKind::CloseBrace, "}"),
    Matcher::exact(LexemeKind::Plus, "+"),
    Matcher::exact(LexemeKind::Minus, "-"),
    Matcher::exact(LexemeKind::Star, "*"),
    Matcher::exact(LexemeKind::Slash, "/"),
    Matcher::exact(LexemeKind::Percent, "%"),
    Matcher::exact(LexemeKind::Equals, "=="),
    Matcher::exact(LexemeKind::NotEquals, "!="),
    Matcher::exact(LexemeKind::LessOrEquals, "<="),
    Matcher::exact(LexemeKind::GreaterOrEquals, ">="),
    Matcher::exact(LexemeKind::Assign, "="),
    Matcher::exact(LexemeKind::Less, "<"),
    Matcher::exact(LexemeKind::Greater, ">"),
    Matcher {
        kind: LexemeKind::Identifier,
        pattern: Pattern::Identifier,
    },
    Matcher {
        kind: LexemeKind::StringLiteral,
        pattern: Pattern::StringLiteral,
    },
    Matcher {
        kind: LexemeKind::IntegerLiteral,
        pattern: Pattern::IntegerLiteral,
    },
];

/// Kind of the first matcher accepting `text`
pub fn classify(text: &str) -> Option<LexemeKind> {
    MATCHERS
        .iter()
        .find(|matcher| matcher.accepts(text))
        .map(|matcher| matcher.kind)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    text.len() <= MAX_IDENTIFIER_LENGTH && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_string_literal(text: &str) -> bool {
    text.len() >= 2
        && text.starts_with('\'')
        && text.ends_with('\'')
        && !text[1..text.len() - 1].contains('\'')
}

fn is_integer_literal(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
