//! Lexeme system for the TTM scanner
//!
//! - [`LexemeKind`] - closed set of lexeme families with their dump tags
//! - [`matchers`] - ordered recognizers mapping raw tokens to kinds
//! - [`LexemeTable`] - the scanner's output stream, rewritten in place by
//!   postfix conversion

pub mod kind;
pub mod lexeme_table;
pub mod matchers;

pub use kind::LexemeKind;
pub use lexeme_table::{LexemeEntry, LexemeTable, LexemeTableError, SpanRewrite};
pub use matchers::{classify, Matcher, Pattern, MATCHERS};
