//! Lexeme categories produced by the scanner

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of lexeme families
///
/// `I32`, `Str`, `IntegerLiteral` and `StringLiteral` are what the matchers
/// recognize; the scanner re-tags them to `Datatype` and `Literal` before they
/// reach the lexeme table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LexemeKind {
    // === KEYWORDS ===
    I32,
    Str,
    Datatype,
    Fn,
    If,
    Else,
    Let,
    Ret,
    Echo,
    Main,

    // === NAMES AND VALUES ===
    Identifier,
    /// Call target after postfix conversion
    Call,
    IntegerLiteral,
    StringLiteral,
    Literal,

    // === PUNCTUATION ===
    Semicolon,
    Comma,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,

    // === OPERATORS ===
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    Equals,
    NotEquals,
    LessOrEquals,
    GreaterOrEquals,
    Less,
    Greater,

    /// Padding left behind by postfix conversion
    Forbidden,
}

impl LexemeKind {
    /// Single-character code used in table dumps
    pub fn tag(&self) -> char {
        match self {
            LexemeKind::I32 => 'n',
            LexemeKind::Str => 's',
            LexemeKind::Datatype => 't',
            LexemeKind::Fn => 'f',
            LexemeKind::If => 'I',
            LexemeKind::Else => 'E',
            LexemeKind::Let => 'd',
            LexemeKind::Ret => 'r',
            LexemeKind::Echo => 'p',
            LexemeKind::Main => 'm',
            LexemeKind::Identifier => 'i',
            LexemeKind::Call => '@',
            LexemeKind::IntegerLiteral => '1',
            LexemeKind::StringLiteral => '2',
            LexemeKind::Literal => 'l',
            LexemeKind::Semicolon => ';',
            LexemeKind::Comma => ',',
            LexemeKind::OpenBrace => '{',
            LexemeKind::CloseBrace => '}',
            LexemeKind::OpenParen => '(',
            LexemeKind::CloseParen => ')',
            LexemeKind::Plus => '+',
            LexemeKind::Minus => '-',
            LexemeKind::Star => '*',
            LexemeKind::Slash => '/',
            LexemeKind::Percent => '%',
            LexemeKind::Assign => '=',
            LexemeKind::Equals => 'q',
            LexemeKind::NotEquals => '!',
            LexemeKind::LessOrEquals => 'L',
            LexemeKind::GreaterOrEquals => 'G',
            LexemeKind::Less => '<',
            LexemeKind::Greater => '>',
            LexemeKind::Forbidden => '#',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LexemeKind::I32 => "i32",
            LexemeKind::Str => "str",
            LexemeKind::Datatype => "datatype",
            LexemeKind::Fn => "fn",
            LexemeKind::If => "if",
            LexemeKind::Else => "else",
            LexemeKind::Let => "let",
            LexemeKind::Ret => "ret",
            LexemeKind::Echo => "echo",
            LexemeKind::Main => "main",
            LexemeKind::Identifier => "identifier",
            LexemeKind::Call => "call",
            LexemeKind::IntegerLiteral => "integer literal",
            LexemeKind::StringLiteral => "string literal",
            LexemeKind::Literal => "literal",
            LexemeKind::Semicolon => ";",
            LexemeKind::Comma => ",",
            LexemeKind::OpenBrace => "{",
            LexemeKind::CloseBrace => "}",
            LexemeKind::OpenParen => "(",
            LexemeKind::CloseParen => ")",
            LexemeKind::Plus => "+",
            LexemeKind::Minus => "-",
            LexemeKind::Star => "*",
            LexemeKind::Slash => "/",
            LexemeKind::Percent => "%",
            LexemeKind::Assign => "=",
            LexemeKind::Equals => "==",
            LexemeKind::NotEquals => "!=",
            LexemeKind::LessOrEquals => "<=",
            LexemeKind::GreaterOrEquals => ">=",
            LexemeKind::Less => "<",
            LexemeKind::Greater => ">",
            LexemeKind::Forbidden => "forbidden",
        }
    }

    /// Binary arithmetic operators handled by postfix conversion
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            LexemeKind::Plus
                | LexemeKind::Minus
                | LexemeKind::Star
                | LexemeKind::Slash
                | LexemeKind::Percent
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            LexemeKind::Equals
                | LexemeKind::NotEquals
                | LexemeKind::LessOrEquals
                | LexemeKind::GreaterOrEquals
                | LexemeKind::Less
                | LexemeKind::Greater
        )
    }

    /// Precedence for the operator stack; `None` for non-operators
    pub fn priority(&self) -> Option<u8> {
        match self {
            LexemeKind::OpenParen | LexemeKind::CloseParen => Some(1),
            LexemeKind::Plus | LexemeKind::Minus => Some(2),
            LexemeKind::Star | LexemeKind::Slash | LexemeKind::Percent => Some(3),
            _ => None,
        }
    }
}

impl fmt::Display for LexemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_match_dump_format() {
        assert_eq!(LexemeKind::Datatype.tag(), 't');
        assert_eq!(LexemeKind::Identifier.tag(), 'i');
        assert_eq!(LexemeKind::Literal.tag(), 'l');
        assert_eq!(LexemeKind::Call.tag(), '@');
        assert_eq!(LexemeKind::Let.tag(), 'd');
        assert_eq!(LexemeKind::Echo.tag(), 'p');
        assert_eq!(LexemeKind::Forbidden.tag(), '#');
    }

    #[test]
    fn test_priorities() {
        assert_eq!(LexemeKind::OpenParen.priority(), Some(1));
        assert_eq!(LexemeKind::Minus.priority(), Some(2));
        assert_eq!(LexemeKind::Percent.priority(), Some(3));
        assert_eq!(LexemeKind::Assign.priority(), None);
        assert!(LexemeKind::Star.is_arithmetic());
        assert!(!LexemeKind::Assign.is_arithmetic());
        assert!(LexemeKind::GreaterOrEquals.is_comparison());
    }
}
