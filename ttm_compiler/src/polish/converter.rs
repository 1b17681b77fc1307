//! Shunting-yard conversion of statement spans to postfix order
//!
//! A span runs from a start index to the first `;`. It is rewritten in place:
//! the postfix form occupies the front of the span and any slots freed by
//! dropped parentheses are filled with sentinel entries.

use super::error::PolishError;
use crate::config::compile_time::conversion::MAX_STATEMENT_LENGTH;
use crate::config::runtime::ConversionPreferences;
use crate::symbols::SymbolTable;
use crate::tokens::{LexemeEntry, LexemeKind, LexemeTable, SpanRewrite};
use crate::{log_debug, log_error};

/// Counters collected over a conversion pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionMetrics {
    pub statements: usize,
    pub calls: usize,
    pub padding: usize,
}

/// Convert the statement starting at `start`; false leaves the table untouched
pub fn convert_statement(start: usize, lexemes: &mut LexemeTable, symbols: &SymbolTable) -> bool {
    try_convert_statement(start, lexemes, symbols).is_ok()
}

/// Convert the statement starting at `start`, reporting why it was rejected
pub fn try_convert_statement(
    start: usize,
    lexemes: &mut LexemeTable,
    symbols: &SymbolTable,
) -> Result<SpanRewrite, PolishError> {
    let end = lexemes
        .find_terminator(start)
        .ok_or_else(|| PolishError::MissingTerminator {
            start,
            line: lexemes.get(start).map(|e| e.line),
        })?;

    let span = &lexemes.entries()[start..=end];
    let line = span[0].line;
    let malformed = |reason: String| PolishError::MalformedExpression {
        start,
        line,
        reason,
    };

    if span.len() > MAX_STATEMENT_LENGTH {
        return Err(malformed(format!(
            "statement of {} lexemes exceeds the limit of {}",
            span.len(),
            MAX_STATEMENT_LENGTH
        )));
    }

    let infix = mark_calls(span, symbols).map_err(malformed)?;
    let postfix = to_postfix(&infix).map_err(|reason| malformed(reason.to_string()))?;

    Ok(lexemes.overwrite_span(start, infix.len(), &postfix)?)
}

/// Validate operand and parenthesis counts and retag call targets
fn mark_calls(span: &[LexemeEntry], symbols: &SymbolTable) -> Result<Vec<LexemeEntry>, String> {
    let mut operands: i64 = 0;
    let mut operators: i64 = 0;
    let mut opened = 0usize;
    let mut closed = 0usize;
    let mut infix = Vec::with_capacity(span.len());

    for (offset, entry) in span.iter().enumerate() {
        match entry.kind {
            LexemeKind::Identifier if symbols.is_function(entry.symbol) => {
                // A call nets zero operands unless its argument list is empty
                let no_arguments = matches!(
                    (span.get(offset + 1), span.get(offset + 2)),
                    (Some(open), Some(close))
                        if open.kind == LexemeKind::OpenParen && close.kind == LexemeKind::CloseParen
                );
                if no_arguments {
                    operands += 1;
                }
                infix.push(LexemeEntry {
                    kind: LexemeKind::Call,
                    ..*entry
                });
                continue;
            }
            LexemeKind::Identifier | LexemeKind::Literal => operands += 1,
            LexemeKind::Comma => operands -= 1,
            LexemeKind::OpenParen => opened += 1,
            LexemeKind::CloseParen => closed += 1,
            LexemeKind::Semicolon => {}
            kind if kind.is_arithmetic() => operators += 1,
            kind => return Err(format!("'{}' cannot appear in an expression", kind)),
        }
        infix.push(*entry);
    }

    if opened != closed {
        return Err(format!("{} '(' against {} ')'", opened, closed));
    }
    if operands - operators != 1 {
        return Err(format!(
            "{} operands for {} operators",
            operands, operators
        ));
    }

    Ok(infix)
}

fn to_postfix(infix: &[LexemeEntry]) -> Result<Vec<LexemeEntry>, &'static str> {
    let mut output = Vec::with_capacity(infix.len());
    let mut stack: Vec<LexemeEntry> = Vec::new();
    let mut terminator = None;

    for entry in infix {
        match entry.kind {
            LexemeKind::Semicolon => {
                terminator = Some(*entry);
                break;
            }
            LexemeKind::Call | LexemeKind::OpenParen => stack.push(*entry),
            LexemeKind::Comma => {
                while let Some(top) = stack.last() {
                    if top.kind == LexemeKind::OpenParen {
                        break;
                    }
                    output.extend(stack.pop());
                }
            }
            LexemeKind::CloseParen => {
                loop {
                    match stack.pop() {
                        Some(top) if top.kind == LexemeKind::OpenParen => break,
                        Some(top) => output.push(top),
                        None => return Err("')' without a matching '('"),
                    }
                }
                if stack.last().map(|top| top.kind) == Some(LexemeKind::Call) {
                    output.extend(stack.pop());
                }
            }
            kind if kind.is_arithmetic() => {
                let priority = kind.priority();
                while let Some(top) = stack.last() {
                    if !top.kind.is_arithmetic() || top.kind.priority() < priority {
                        break;
                    }
                    output.extend(stack.pop());
                }
                stack.push(*entry);
            }
            _ => output.push(*entry),
        }
    }

    while let Some(top) = stack.pop() {
        if top.kind != LexemeKind::OpenParen {
            output.push(top);
        }
    }
    output.extend(terminator);

    Ok(output)
}

/// Convert every expression statement with default preferences
pub fn convert_all(
    lexemes: &mut LexemeTable,
    symbols: &SymbolTable,
) -> Result<ConversionMetrics, PolishError> {
    convert_all_with_preferences(lexemes, symbols, &ConversionPreferences::default())
}

/// Convert the span after each `=`, `ret` and `echo`, and every statement
/// that starts with a call
pub fn convert_all_with_preferences(
    lexemes: &mut LexemeTable,
    symbols: &SymbolTable,
    preferences: &ConversionPreferences,
) -> Result<ConversionMetrics, PolishError> {
    let mut metrics = ConversionMetrics::default();
    let mut previous: Option<LexemeKind> = None;
    let mut index = 0;

    while let Some(&entry) = lexemes.get(index) {
        if entry.is_sentinel() {
            index += 1;
            continue;
        }

        let start = match entry.kind {
            LexemeKind::Assign | LexemeKind::Ret | LexemeKind::Echo => Some(index + 1),
            LexemeKind::Identifier
                if symbols.is_function(entry.symbol)
                    && matches!(
                        previous,
                        None | Some(LexemeKind::Semicolon)
                            | Some(LexemeKind::OpenBrace)
                            | Some(LexemeKind::CloseBrace)
                    ) =>
            {
                Some(index)
            }
            _ => None,
        };

        let Some(start) = start else {
            previous = Some(entry.kind);
            index += 1;
            continue;
        };

        let rewrite = try_convert_statement(start, lexemes, symbols).map_err(report)?;
        let converted = &lexemes.entries()[start..start + rewrite.new_len];

        metrics.statements += 1;
        metrics.calls += converted
            .iter()
            .filter(|e| e.kind == LexemeKind::Call)
            .count();
        metrics.padding += rewrite.padding;

        if preferences.log_conversions {
            let tags: String = converted.iter().map(|e| e.kind.tag()).collect();
            log_debug!("Statement converted",
                "line" => entry.line,
                "postfix" => tags,
                "padding" => rewrite.padding
            );
        }

        previous = Some(LexemeKind::Semicolon);
        index = start + rewrite.new_len + rewrite.padding;
    }

    Ok(metrics)
}

fn report(error: PolishError) -> PolishError {
    match error.position() {
        Some(position) => {
            log_error!(error.error_code(), &error.to_string(), position = position);
        }
        None => {
            log_error!(error.error_code(), &error.to_string());
        }
    }
    error
}
