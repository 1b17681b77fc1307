//! Preprocessor: raw bytes to delimiter-separated token text
//!
//! Comments are stripped, runs of text bytes are grouped, operators and
//! separators are isolated, and string literals are copied verbatim.
//! Newlines survive as markers so the token splitter can number lines.

use super::classifier::{CharCategory, Classifier, COMMENT, DELIMITER, NEWLINE};
use super::error::LexerError;
use crate::config::compile_time::lexical::MAX_STRING_LENGTH;
use crate::log_error;
use crate::utils::SourcePosition;

/// Counters collected during one preprocessing run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PreprocessMetrics {
    pub bytes_read: usize,
    pub lines: u32,
    pub ignored_bytes: usize,
    pub comments: usize,
    pub string_literals: usize,
    pub output_bytes: usize,
}

/// Byte-level preprocessor driven by an immutable `Classifier`
pub struct Preprocessor {
    classifier: Classifier,
    max_string_length: usize,
    metrics: PreprocessMetrics,
}

impl Preprocessor {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier,
            max_string_length: MAX_STRING_LENGTH,
            metrics: PreprocessMetrics::default(),
        }
    }

    /// Override the string literal content limit
    pub fn with_max_string_length(mut self, max_string_length: usize) -> Self {
        self.max_string_length = max_string_length;
        self
    }

    pub fn metrics(&self) -> &PreprocessMetrics {
        &self.metrics
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Turn raw source bytes into delimiter-separated token text
    pub fn preprocess(&mut self, bytes: &[u8]) -> Result<Vec<u8>, LexerError> {
        self.metrics = PreprocessMetrics {
            bytes_read: bytes.len(),
            ..Default::default()
        };

        let mut out: Vec<u8> = Vec::with_capacity(bytes.len() + bytes.len() / 2);
        let mut line: u32 = 1;
        let mut column: u32 = 0;
        let mut i = 0;

        while i < bytes.len() {
            let byte = bytes[i];
            i += 1;
            column += 1;

            if byte == NEWLINE {
                line += 1;
                column = 0;
                end_line(&mut out);
                continue;
            }

            if byte == COMMENT && bytes.get(i) == Some(&COMMENT) {
                self.metrics.comments += 1;
                match bytes[i..].iter().position(|&b| b == NEWLINE) {
                    Some(offset) => {
                        self.metrics.ignored_bytes += offset + 2;
                        i += offset + 1;
                        line += 1;
                        column = 0;
                        end_line(&mut out);
                    }
                    None => {
                        self.metrics.ignored_bytes += bytes.len() - i + 1;
                        i = bytes.len();
                    }
                }
                continue;
            }

            match self.classifier.classify(byte) {
                CharCategory::Text => {
                    if let Some(&last) = out.last() {
                        if last != DELIMITER && !self.classifier.is_text(last) {
                            out.push(DELIMITER);
                        }
                    }
                    out.push(byte);
                }

                CharCategory::Forbidden => {
                    return Err(self.forbidden(byte, line, column));
                }

                CharCategory::Ignored => {
                    self.metrics.ignored_bytes += 1;
                }

                CharCategory::Operator => {
                    // `==`, `!=`, `<=` and `>=` stay one token
                    let glued = byte == b'='
                        && matches!(out.last(), Some(b'=') | Some(b'!') | Some(b'<') | Some(b'>'));
                    if !glued {
                        push_delimiter(&mut out);
                    }
                    out.push(byte);
                }

                CharCategory::Quote => {
                    push_delimiter(&mut out);
                    out.push(byte);
                    let mut content_length = 0;

                    while let Some(&next) = bytes.get(i) {
                        if next == NEWLINE {
                            break;
                        }
                        if next == DELIMITER {
                            return Err(self.forbidden(next, line, column + 1));
                        }
                        let closes = self.classifier.is_quote(next);
                        if !closes && content_length >= self.max_string_length {
                            break;
                        }

                        i += 1;
                        column += 1;
                        out.push(next);

                        if closes {
                            break;
                        }
                        content_length += 1;
                    }

                    self.metrics.string_literals += 1;
                }

                CharCategory::Separator => {
                    push_delimiter(&mut out);
                    out.push(byte);
                    out.push(DELIMITER);
                }

                CharCategory::Substitute(substitute) => {
                    if let Some(&last) = out.last() {
                        if last != DELIMITER {
                            out.push(substitute);
                        }
                    }
                }
            }
        }

        let quote_count = out.iter().filter(|&&b| self.classifier.is_quote(b)).count();
        if quote_count % 2 != 0 {
            let error = LexerError::UnbalancedQuotes { count: quote_count };
            log_error!(error.error_code(), "Unbalanced quote characters",
                "quotes" => quote_count
            );
            return Err(error);
        }

        self.metrics.lines = line;
        self.metrics.output_bytes = out.len();

        Ok(out)
    }

    fn forbidden(&self, byte: u8, line: u32, column: u32) -> LexerError {
        let error = LexerError::ForbiddenCharacter { byte, line, column };
        log_error!(error.error_code(), "Forbidden character in source",
            position = SourcePosition::new(line, column),
            "byte" => format!("0x{:02X}", byte)
        );
        error
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(Classifier::ttm())
    }
}

fn push_delimiter(out: &mut Vec<u8>) {
    if let Some(&last) = out.last() {
        if last != DELIMITER {
            out.push(DELIMITER);
        }
    }
}

fn end_line(out: &mut Vec<u8>) {
    push_delimiter(out);
    out.push(NEWLINE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn run(source: &str) -> Result<Vec<u8>, LexerError> {
        Preprocessor::default().preprocess(source.as_bytes())
    }

    fn segments(text: &[u8]) -> Vec<String> {
        text.split(|&b| b == DELIMITER)
            .filter(|s| !s.is_empty())
            .map(|s| s.iter().map(|&b| b as char).collect())
            .collect()
    }

    #[test]
    fn test_statement_is_split_into_tokens() {
        let text = run("let i32 x = a+b;").unwrap();
        assert_eq!(
            segments(&text),
            vec!["let", "i32", "x", "=", "a", "+", "b", ";"]
        );
    }

    #[test]
    fn test_operators_are_never_merged_except_comparisons() {
        let text = run("a--b").unwrap();
        assert_eq!(segments(&text), vec!["a", "-", "-", "b"]);

        let text = run("a<=b!=c==d>=e").unwrap();
        assert_eq!(
            segments(&text),
            vec!["a", "<=", "b", "!=", "c", "==", "d", ">=", "e"]
        );

        let text = run("a = =b").unwrap();
        assert_eq!(segments(&text), vec!["a", "=", "=", "b"]);
    }

    #[test]
    fn test_newlines_become_markers() {
        let text = run("a\nb").unwrap();
        assert_eq!(text, vec![b'a', DELIMITER, NEWLINE, DELIMITER, b'b']);
    }

    #[test]
    fn test_comment_is_stripped() {
        let text = run("x; // note ' here\ny;").unwrap();
        assert_eq!(segments(&text), vec!["x", ";", "\n", "y", ";"]);

        let mut preprocessor = Preprocessor::default();
        preprocessor.preprocess(b"// only\n").unwrap();
        assert_eq!(preprocessor.metrics().comments, 1);
    }

    #[test]
    fn test_single_slash_is_an_operator() {
        let text = run("a/b").unwrap();
        assert_eq!(segments(&text), vec!["a", "/", "b"]);
    }

    #[test]
    fn test_string_literal_is_verbatim() {
        let text = run("echo 'a b;c';").unwrap();
        assert_eq!(segments(&text), vec!["echo", "'a b;c'", ";"]);
    }

    #[test]
    fn test_string_may_hold_non_ascii() {
        let text = Preprocessor::default()
            .preprocess(&[b'\'', 0xE9, b'\'', b';'])
            .unwrap();
        assert_eq!(text, vec![b'\'', 0xE9, b'\'', DELIMITER, b';', DELIMITER]);
    }

    #[test]
    fn test_forbidden_character_position() {
        let result = run("let i32 x;\nx = 1 # 2;");
        assert_matches!(
            result,
            Err(LexerError::ForbiddenCharacter { byte: b'#', line: 2, column: 7 })
        );
    }

    #[test]
    fn test_forbidden_after_comment_keeps_line_count() {
        let result = run("// c\n\n  @");
        assert_matches!(
            result,
            Err(LexerError::ForbiddenCharacter { byte: b'@', line: 3, column: 3 })
        );
    }

    #[test]
    fn test_delimiter_byte_inside_string_is_forbidden() {
        let result = Preprocessor::default().preprocess(&[b'\'', b'a', DELIMITER, b'\'']);
        assert_matches!(
            result,
            Err(LexerError::ForbiddenCharacter { byte: DELIMITER, line: 1, column: 3 })
        );
    }

    #[test]
    fn test_unbalanced_quotes() {
        assert_matches!(run("x = 'abc;"), Err(LexerError::UnbalancedQuotes { count: 1 }));
        assert_matches!(run("x = 'ab\nc;"), Err(LexerError::UnbalancedQuotes { count: 1 }));
    }

    #[test]
    fn test_long_string_stops_at_limit() {
        let mut preprocessor = Preprocessor::default().with_max_string_length(3);
        let text = preprocessor.preprocess(b"'abc'").unwrap();
        assert_eq!(segments(&text), vec!["'abc'"]);

        let text = preprocessor.preprocess(b"'abcd'").unwrap();
        assert!(!segments(&text).contains(&"'abcd'".to_string()));
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        let text = run("a  \t b\r\n").unwrap();
        assert_eq!(text, vec![b'a', DELIMITER, b'b', DELIMITER, NEWLINE]);
    }

    #[test]
    fn test_metrics() {
        let mut preprocessor = Preprocessor::default();
        preprocessor.preprocess(b"x = 'a';\r\ny;").unwrap();

        let metrics = preprocessor.metrics();
        assert_eq!(metrics.bytes_read, 12);
        assert_eq!(metrics.lines, 2);
        assert_eq!(metrics.ignored_bytes, 1);
        assert_eq!(metrics.string_literals, 1);
    }
}
