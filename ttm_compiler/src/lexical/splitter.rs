//! Token splitter: preprocessed text to line-annotated raw tokens

use super::classifier::{DELIMITER, NEWLINE};
use super::error::LexerError;
use crate::config::compile_time::lexical::MAX_TOKEN_COUNT;
use crate::{log_debug, log_error};
use serde::Serialize;

/// A raw token string and the source line it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawToken {
    pub text: String,
    pub line: u32,
}

impl RawToken {
    pub fn new(text: impl Into<String>, line: u32) -> Self {
        Self {
            text: text.into(),
            line,
        }
    }
}

/// Splits preprocessed text on the delimiter byte
#[derive(Debug, Clone)]
pub struct TokenSplitter {
    max_tokens: usize,
    trace_tokens: bool,
}

impl TokenSplitter {
    pub fn new() -> Self {
        Self {
            max_tokens: MAX_TOKEN_COUNT,
            trace_tokens: false,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Log every emitted token at debug level
    pub fn with_token_tracing(mut self, enabled: bool) -> Self {
        self.trace_tokens = enabled;
        self
    }

    /// Produce tokens in source order; newline-marker segments only advance the line
    pub fn split(&self, text: &[u8]) -> Result<Vec<RawToken>, LexerError> {
        let mut tokens = Vec::new();
        let mut line: u32 = 1;

        for segment in text.split(|&b| b == DELIMITER) {
            if segment.is_empty() {
                continue;
            }

            if segment.iter().all(|&b| b == NEWLINE) {
                line += segment.len() as u32;
                continue;
            }

            if tokens.len() >= self.max_tokens {
                let error = LexerError::TooManyTokens {
                    count: tokens.len() + 1,
                    max: self.max_tokens,
                    line,
                };
                log_error!(error.error_code(), "Token limit exceeded",
                    "limit" => self.max_tokens,
                    "line" => line
                );
                return Err(error);
            }

            // Bytes map one-to-one onto Latin-1 code points
            let token = RawToken::new(segment.iter().map(|&b| b as char).collect::<String>(), line);

            if self.trace_tokens {
                log_debug!("Raw token", "text" => &token.text, "line" => line);
            }

            tokens.push(token);
        }

        Ok(tokens)
    }
}

impl Default for TokenSplitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::Preprocessor;
    use assert_matches::assert_matches;

    fn split_source(source: &str) -> Vec<RawToken> {
        let text = Preprocessor::default().preprocess(source.as_bytes()).unwrap();
        TokenSplitter::new().split(&text).unwrap()
    }

    #[test]
    fn test_tokens_carry_lines() {
        let tokens = split_source("fn i32 main()\n{\n\nret 0;\n}");

        let expected = vec![
            RawToken::new("fn", 1),
            RawToken::new("i32", 1),
            RawToken::new("main", 1),
            RawToken::new("(", 1),
            RawToken::new(")", 1),
            RawToken::new("{", 2),
            RawToken::new("ret", 4),
            RawToken::new("0", 4),
            RawToken::new(";", 4),
            RawToken::new("}", 5),
        ];
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_no_empty_tokens() {
        let tokens = split_source("  a ;  ;\n\n");
        assert!(tokens.iter().all(|t| !t.text.is_empty()));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_comment_lines_are_counted() {
        let tokens = split_source("// header\nx;");
        assert_eq!(tokens[0], RawToken::new("x", 2));
    }

    #[test]
    fn test_latin1_decoding() {
        let text = Preprocessor::default()
            .preprocess(&[b'\'', 0xE9, b'\''])
            .unwrap();
        let tokens = TokenSplitter::new().split(&text).unwrap();
        assert_eq!(tokens[0].text, "'\u{e9}'");
    }

    #[test]
    fn test_token_limit() {
        let text = Preprocessor::default().preprocess(b"a b c").unwrap();
        let result = TokenSplitter::new().with_max_tokens(2).split(&text);
        assert_matches!(
            result,
            Err(LexerError::TooManyTokens { count: 3, max: 2, line: 1 })
        );
    }
}
