//! Scanner: classifies raw tokens, tracks declarations and scope, and fills
//! the symbol and lexeme tables

use super::error::ScanError;
use super::scope::{ScopeFault, ScopeStack};
use crate::config::compile_time::scanner::MAX_SCOPE_DEPTH;
use crate::config::runtime::ScannerPreferences;
use crate::lexical::RawToken;
use crate::symbols::{
    register_builtins, DataType, SymbolEntry, SymbolError, SymbolKind, SymbolTable, GLOBAL_SCOPE,
};
use crate::tokens::{classify, LexemeEntry, LexemeKind, LexemeTable};
use crate::{log_debug, log_error};

const ENTRY_POINT: &str = "main";

/// Counters collected during one scan
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanMetrics {
    pub tokens: usize,
    pub lexemes: usize,
    pub symbols: usize,
    pub declarations: usize,
    pub literals_interned: usize,
    pub literal_reuses: usize,
    pub unary_rewrites: usize,
    pub max_scope_depth: usize,
}

/// Stateless front door; all per-run state lives in `ScanState`
#[derive(Debug, Clone)]
pub struct Scanner {
    preferences: ScannerPreferences,
    max_scope_depth: usize,
}

impl Scanner {
    pub fn new() -> Self {
        Self::with_preferences(ScannerPreferences::default())
    }

    pub fn with_preferences(preferences: ScannerPreferences) -> Self {
        Self {
            preferences,
            max_scope_depth: MAX_SCOPE_DEPTH,
        }
    }

    pub fn with_max_scope_depth(mut self, max_scope_depth: usize) -> Self {
        self.max_scope_depth = max_scope_depth;
        self
    }

    /// Scan `tokens` in order, appending to `lexemes` and `symbols`
    pub fn scan(
        &self,
        tokens: &[RawToken],
        symbols: &mut SymbolTable,
        lexemes: &mut LexemeTable,
    ) -> Result<ScanMetrics, ScanError> {
        let mut state = ScanState {
            symbols,
            lexemes,
            preferences: &self.preferences,
            scopes: ScopeStack::new(self.max_scope_depth),
            last_function_name: GLOBAL_SCOPE.to_string(),
            pending_kind: SymbolKind::Unknown,
            pending_type: DataType::Undefined,
            close_unary: false,
            metrics: ScanMetrics::default(),
        };

        let first_line = tokens.first().map(|t| t.line).unwrap_or(1);
        register_builtins(state.symbols).map_err(|e| symbol_error(e, first_line))?;

        for (index, token) in tokens.iter().enumerate() {
            let next_is_call = tokens
                .get(index + 1)
                .map(|next| next.text == "(")
                .unwrap_or(false);
            state.scan_token(token, next_is_call)?;
        }

        state.check_structure()?;

        state.metrics.tokens = tokens.len();
        state.metrics.lexemes = state.lexemes.len();
        state.metrics.symbols = state.symbols.len();
        state.metrics.max_scope_depth = state.scopes.deepest();
        Ok(state.metrics)
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

struct ScanState<'a> {
    symbols: &'a mut SymbolTable,
    lexemes: &'a mut LexemeTable,
    preferences: &'a ScannerPreferences,
    scopes: ScopeStack,
    last_function_name: String,
    pending_kind: SymbolKind,
    pending_type: DataType,
    /// A synthetic `(0 - x)` group is waiting for its `)`
    close_unary: bool,
    metrics: ScanMetrics,
}

impl<'a> ScanState<'a> {
    fn scan_token(&mut self, token: &RawToken, next_is_call: bool) -> Result<(), ScanError> {
        let line = token.line;
        let kind = classify(&token.text).ok_or_else(|| {
            report(ScanError::UnrecognizedToken {
                token: token.text.clone(),
                line,
            })
        })?;

        match kind {
            LexemeKind::I32 => {
                self.pending_type = DataType::I32;
                self.emit(LexemeKind::Datatype, line, None)?;
            }
            LexemeKind::Str => {
                self.pending_type = DataType::Str;
                self.emit(LexemeKind::Datatype, line, None)?;
            }
            LexemeKind::Main => self.scan_main(line)?,
            LexemeKind::Identifier => self.scan_identifier(&token.text, line, next_is_call)?,
            LexemeKind::IntegerLiteral => {
                let value: i32 = token.text.parse().map_err(|_| {
                    report(ScanError::IntegerOutOfRange {
                        literal: token.text.clone(),
                        line,
                    })
                })?;
                self.scan_literal(DataType::I32, &value.to_string(), line)?;
            }
            LexemeKind::StringLiteral => {
                let content = &token.text[1..token.text.len() - 1];
                if content.is_empty() {
                    return Err(report(ScanError::EmptyStringLiteral { line }));
                }
                self.scan_literal(DataType::Str, content, line)?;
            }
            LexemeKind::OpenBrace | LexemeKind::OpenParen => {
                self.enter_scope(line)?;
                self.emit(kind, line, None)?;
            }
            LexemeKind::CloseBrace | LexemeKind::CloseParen => {
                self.exit_scope(line)?;
                self.emit(kind, line, None)?;
            }
            LexemeKind::Minus if self.in_unary_position() => self.scan_unary_minus(line)?,
            _ => {
                self.emit(kind, line, None)?;
            }
        }

        Ok(())
    }

    // ========================================================================
    // DECLARATIONS AND REFERENCES
    // ========================================================================

    fn scan_identifier(&mut self, name: &str, line: u32, next_is_call: bool) -> Result<(), ScanError> {
        if name == self.scopes.current() && !next_is_call {
            return Err(report(ScanError::SelfReference {
                name: name.to_string(),
                line,
            }));
        }

        // Call targets always resolve against global functions
        let lookup_scope = if next_is_call {
            GLOBAL_SCOPE
        } else {
            self.scopes.current()
        };

        let symbol = match self.symbols.lookup(lookup_scope, name) {
            Some(index) => {
                if self.in_declaration_context() {
                    return Err(report(ScanError::DuplicateDeclaration {
                        name: name.to_string(),
                        line,
                    }));
                }
                index
            }
            None => self.declare(name, line)?,
        };

        self.emit(LexemeKind::Identifier, line, Some(symbol))?;

        if self.close_unary && !self.symbols.is_function(Some(symbol)) {
            self.close_unary_group(line)?;
        }
        Ok(())
    }

    fn declare(&mut self, name: &str, line: u32) -> Result<usize, ScanError> {
        if self.lexemes.declared_function() {
            self.last_function_name = name.to_string();
            self.scopes.reset_to_global();
            self.pending_kind = SymbolKind::Function;
        } else if self.lexemes.declared_variable() {
            self.pending_kind = SymbolKind::Variable;
        } else if self.lexemes.declared_datatype() {
            self.pending_kind = SymbolKind::Parameter;
        } else {
            return Err(report(ScanError::UndeclaredIdentifier {
                name: name.to_string(),
                line,
            }));
        }

        self.insert_declaration(name, line)
    }

    /// `main` follows the function declaration rules and must return `i32`
    fn scan_main(&mut self, line: u32) -> Result<(), ScanError> {
        let symbol = match self.symbols.lookup(GLOBAL_SCOPE, ENTRY_POINT) {
            Some(index) => {
                if self.lexemes.declared_function() {
                    return Err(report(ScanError::DuplicateMain { line }));
                }
                index
            }
            None => {
                if !self.lexemes.declared_function() {
                    return Err(report(ScanError::MissingDeclarationKind {
                        name: ENTRY_POINT.to_string(),
                        line,
                    }));
                }
                if self.pending_type != DataType::I32 {
                    return Err(report(ScanError::MissingDeclarationType {
                        name: ENTRY_POINT.to_string(),
                        line,
                    }));
                }

                self.last_function_name = ENTRY_POINT.to_string();
                self.scopes.reset_to_global();
                self.pending_kind = SymbolKind::Function;
                self.insert_declaration(ENTRY_POINT, line)?
            }
        };

        self.emit(LexemeKind::Main, line, Some(symbol))?;
        Ok(())
    }

    fn insert_declaration(&mut self, name: &str, line: u32) -> Result<usize, ScanError> {
        if self.pending_kind == SymbolKind::Unknown {
            return Err(report(ScanError::MissingDeclarationKind {
                name: name.to_string(),
                line,
            }));
        }
        if self.pending_type == DataType::Undefined {
            return Err(report(ScanError::MissingDeclarationType {
                name: name.to_string(),
                line,
            }));
        }

        let entry = SymbolEntry::declared(
            name,
            self.scopes.current(),
            self.lexemes.len(),
            self.pending_type,
            self.pending_kind,
        );
        let index = self
            .symbols
            .insert(entry)
            .map_err(|e| symbol_error(e, line))?;

        if self.preferences.log_symbol_insertions {
            log_debug!("Symbol declared",
                "name" => name,
                "scope" => self.scopes.current(),
                "kind" => self.pending_kind,
                "type" => self.pending_type,
                "line" => line
            );
        }

        self.pending_kind = SymbolKind::Unknown;
        self.pending_type = DataType::Undefined;
        self.metrics.declarations += 1;
        Ok(index)
    }

    fn in_declaration_context(&self) -> bool {
        self.lexemes.declared_variable()
            || self.lexemes.declared_function()
            || self.lexemes.declared_datatype()
    }

    // ========================================================================
    // LITERALS AND UNARY MINUS
    // ========================================================================

    fn scan_literal(&mut self, data_type: DataType, value: &str, line: u32) -> Result<(), ScanError> {
        let symbol = self.intern(data_type, value, line)?;
        self.emit(LexemeKind::Literal, line, Some(symbol))?;

        if self.close_unary {
            self.close_unary_group(line)?;
        }
        Ok(())
    }

    fn intern(&mut self, data_type: DataType, value: &str, line: u32) -> Result<usize, ScanError> {
        let position = self.lexemes.len();
        let (symbol, created) = self
            .symbols
            .intern_literal(data_type, value, position)
            .map_err(|e| symbol_error(e, line))?;

        if created {
            self.metrics.literals_interned += 1;
        } else {
            self.metrics.literal_reuses += 1;
        }
        Ok(symbol)
    }

    /// `-` directly after `=`, `(` or `ret` can only be a sign
    fn in_unary_position(&self) -> bool {
        matches!(
            self.lexemes.last().map(|entry| entry.kind),
            Some(LexemeKind::Assign) | Some(LexemeKind::OpenParen) | Some(LexemeKind::Ret)
        )
    }

    /// Rewrite `-x` as `(0 - x`; the `)` follows the next operand
    fn scan_unary_minus(&mut self, line: u32) -> Result<(), ScanError> {
        self.emit(LexemeKind::OpenParen, line, None)?;
        let zero = self.intern(DataType::I32, "0", line)?;
        self.emit(LexemeKind::Literal, line, Some(zero))?;
        self.emit(LexemeKind::Minus, line, None)?;

        self.close_unary = true;
        self.metrics.unary_rewrites += 1;
        Ok(())
    }

    fn close_unary_group(&mut self, line: u32) -> Result<(), ScanError> {
        self.emit(LexemeKind::CloseParen, line, None)?;
        self.close_unary = false;
        Ok(())
    }

    // ========================================================================
    // SCOPES
    // ========================================================================

    fn enter_scope(&mut self, line: u32) -> Result<(), ScanError> {
        let target = self.last_function_name.clone();
        self.scopes.enter(&target).map_err(|fault| match fault {
            ScopeFault::TooDeep { max } => report(ScanError::ScopeTooDeep { max, line }),
            ScopeFault::Underflow => report(ScanError::UnbalancedBrackets {
                detail: "scope stack underflow".to_string(),
                line: Some(line),
            }),
        })?;

        if self.preferences.log_scope_transitions {
            log_debug!("Scope entered", "scope" => &target, "depth" => self.scopes.depth(), "line" => line);
        }
        Ok(())
    }

    fn exit_scope(&mut self, line: u32) -> Result<(), ScanError> {
        self.scopes.exit().map_err(|_| {
            report(ScanError::UnbalancedBrackets {
                detail: "closing bracket without an opening bracket".to_string(),
                line: Some(line),
            })
        })?;

        if self.preferences.log_scope_transitions {
            log_debug!("Scope exited", "scope" => self.scopes.current(), "depth" => self.scopes.depth(), "line" => line);
        }
        Ok(())
    }

    // ========================================================================
    // OUTPUT AND WHOLE-PROGRAM CHECKS
    // ========================================================================

    fn emit(&mut self, kind: LexemeKind, line: u32, symbol: Option<usize>) -> Result<usize, ScanError> {
        let max = self.lexemes.capacity();
        self.lexemes
            .push(LexemeEntry { kind, line, symbol })
            .map_err(|_| {
                report(ScanError::CapacityExceeded {
                    table: "lexeme",
                    max,
                    line,
                })
            })
    }

    fn check_structure(&self) -> Result<(), ScanError> {
        if !self.lexemes.has_kind(LexemeKind::Main) {
            return Err(report(ScanError::MissingMain));
        }

        let pairs = [
            (LexemeKind::OpenParen, LexemeKind::CloseParen),
            (LexemeKind::OpenBrace, LexemeKind::CloseBrace),
        ];
        for (open, close) in pairs {
            let opened = self.lexemes.count_kind(open);
            let closed = self.lexemes.count_kind(close);
            if opened != closed {
                return Err(report(ScanError::UnbalancedBrackets {
                    detail: format!("{} '{}' against {} '{}'", opened, open, closed, close),
                    line: None,
                }));
            }
        }

        Ok(())
    }
}

fn symbol_error(error: SymbolError, line: u32) -> ScanError {
    let error = match error {
        SymbolError::CapacityExceeded { max } => ScanError::CapacityExceeded {
            table: "symbol",
            max,
            line,
        },
        SymbolError::DuplicateKey { name, .. } => ScanError::DuplicateDeclaration { name, line },
    };
    report(error)
}

/// Log a scan error once, where it is raised
fn report(error: ScanError) -> ScanError {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize_source;
    use assert_matches::assert_matches;

    fn scan_with(
        scanner: &Scanner,
        source: &str,
    ) -> Result<(SymbolTable, LexemeTable, ScanMetrics), ScanError> {
        let tokens = tokenize_source(source.as_bytes()).unwrap().tokens;
        let mut symbols = SymbolTable::new();
        let mut lexemes = LexemeTable::new();
        let metrics = scanner.scan(&tokens, &mut symbols, &mut lexemes)?;
        Ok((symbols, lexemes, metrics))
    }

    fn scan_source(source: &str) -> Result<(SymbolTable, LexemeTable, ScanMetrics), ScanError> {
        scan_with(&Scanner::new(), source)
    }

    #[test]
    fn test_unary_minus_after_ret() {
        let (symbols, lexemes, metrics) = scan_source("fn i32 main() {\n  ret -5;\n}").unwrap();

        let ret = lexemes
            .iter()
            .position(|e| e.kind == LexemeKind::Ret)
            .unwrap();
        let kinds: Vec<LexemeKind> = lexemes.kinds()[ret..ret + 7].to_vec();
        assert_eq!(
            kinds,
            vec![
                LexemeKind::Ret,
                LexemeKind::OpenParen,
                LexemeKind::Literal,
                LexemeKind::Minus,
                LexemeKind::Literal,
                LexemeKind::CloseParen,
                LexemeKind::Semicolon,
            ]
        );

        let zero = symbols.get(lexemes.get(ret + 2).unwrap().symbol.unwrap()).unwrap();
        let five = symbols.get(lexemes.get(ret + 4).unwrap().symbol.unwrap()).unwrap();
        assert_eq!(zero.literal_value.as_deref(), Some("0"));
        assert_eq!(five.literal_value.as_deref(), Some("5"));
        assert_eq!(lexemes.get(ret).unwrap().line, 2);
        assert_eq!(metrics.unary_rewrites, 1);
    }

    #[test]
    fn test_unary_minus_after_assign_and_paren() {
        let (_, lexemes, _) =
            scan_source("fn i32 main() { let i32 x; x = -x; x = (-2); ret 0; }").unwrap();
        let tags: String = lexemes.iter().map(|e| e.kind.tag()).collect();
        assert!(tags.contains("i=(l-i);"));
        assert!(tags.contains("i=((l-l));"));
    }

    #[test]
    fn test_literals_are_interned() {
        let source = "fn i32 main() {\n let i32 x;\n x = 5;\n x = 5 + 5;\n echo '5';\n ret 0;\n}";
        let (symbols, lexemes, metrics) = scan_source(source).unwrap();

        let five = symbols.lookup_literal(DataType::I32, "5").unwrap();
        let uses = lexemes.iter().filter(|e| e.symbol == Some(five)).count();
        assert_eq!(uses, 3);

        let text = symbols.lookup_literal(DataType::Str, "5").unwrap();
        assert_ne!(five, text);
        assert_eq!(symbols.get(text).unwrap().data_type, DataType::Str);
        assert_eq!(metrics.literal_reuses, 2);

        let entry = symbols.get(five).unwrap();
        assert_eq!(entry.kind, SymbolKind::Literal);
        assert_eq!(entry.name, format!("L{}", entry.lex_position.unwrap()));
    }

    #[test]
    fn test_datatype_keywords_are_retagged() {
        let (_, lexemes, _) = scan_source("fn i32 main() { let str s; ret 0; }").unwrap();
        assert_eq!(lexemes.count_kind(LexemeKind::Datatype), 2);
        assert!(!lexemes.has_kind(LexemeKind::I32));
        assert!(!lexemes.has_kind(LexemeKind::Str));
        assert_eq!(lexemes.render_by_line(), "0001 ftm(){dti;rl;}\n");
    }

    #[test]
    fn test_declarations_and_scopes() {
        let source = "fn i32 add(i32 a, i32 b) {\n ret a + b;\n}\n\
                      fn i32 main() {\n let i32 x;\n x = add(1, 2);\n echo x;\n ret 0;\n}";
        let (symbols, lexemes, metrics) = scan_source(source).unwrap();

        let add = symbols.lookup("", "add").unwrap();
        assert_eq!(symbols.get(add).unwrap().kind, SymbolKind::Function);

        let a = symbols.lookup("add", "a").unwrap();
        assert_eq!(symbols.get(a).unwrap().kind, SymbolKind::Parameter);
        assert_eq!(symbols.get(a).unwrap().data_type, DataType::I32);

        let x = symbols.lookup("main", "x").unwrap();
        assert_eq!(symbols.get(x).unwrap().kind, SymbolKind::Variable);

        let call_sites = lexemes.iter().filter(|e| e.symbol == Some(add)).count();
        assert_eq!(call_sites, 2);
        assert_eq!(lexemes.count_kind(LexemeKind::Datatype), 5);
        assert!(!lexemes.has_kind(LexemeKind::I32));
        assert_eq!(metrics.declarations, 5);
        assert_eq!(metrics.max_scope_depth, 2);
    }

    #[test]
    fn test_builtins_resolve() {
        let source = "fn i32 main() { let str s; s = concat('a', 'b'); ret parseInt(s); }";
        let (symbols, lexemes, _) = scan_source(source).unwrap();

        let concat = symbols.lookup("", "concat").unwrap();
        assert!(lexemes.iter().any(|e| e.symbol == Some(concat)));
        assert_eq!(symbols.get(concat).unwrap().lex_position, None);
    }

    #[test]
    fn test_missing_main() {
        assert_matches!(
            scan_source("fn i32 f() { ret 1; }"),
            Err(ScanError::MissingMain)
        );
        assert_eq!(ScanError::MissingMain.error_code().value(), 130);
    }

    #[test]
    fn test_duplicate_main() {
        let result = scan_source("fn i32 main() { ret 0; }\nfn i32 main() { ret 1; }");
        assert_matches!(result, Err(ScanError::DuplicateMain { line: 2 }));
    }

    #[test]
    fn test_main_must_return_i32() {
        assert_matches!(
            scan_source("fn str main() { ret 'x'; }"),
            Err(ScanError::MissingDeclarationType { line: 1, .. })
        );
        assert_matches!(
            scan_source("let main;"),
            Err(ScanError::MissingDeclarationKind { line: 1, .. })
        );
    }

    #[test]
    fn test_unbalanced_brackets() {
        assert_matches!(
            scan_source("fn i32 main() {\n ret 0;\n"),
            Err(ScanError::UnbalancedBrackets { line: None, .. })
        );
        assert_matches!(
            scan_source("fn i32 main() {\n ret 0;\n}\n}"),
            Err(ScanError::UnbalancedBrackets { line: Some(4), .. })
        );
        assert_matches!(
            scan_source("fn i32 main() {\n ret (0;\n}"),
            Err(ScanError::UnbalancedBrackets { .. })
        );
    }

    #[test]
    fn test_undeclared_identifier() {
        assert_matches!(
            scan_source("fn i32 main() {\n y = 1;\n ret 0;\n}"),
            Err(ScanError::UndeclaredIdentifier { line: 2, .. })
        );
    }

    #[test]
    fn test_duplicate_declaration() {
        assert_matches!(
            scan_source("fn i32 main() { let i32 x; let i32 x; ret 0; }"),
            Err(ScanError::DuplicateDeclaration { .. })
        );
        assert_matches!(
            scan_source("fn i32 f() { ret 1; } fn i32 f() { ret 2; } fn i32 main() { ret 0; }"),
            Err(ScanError::DuplicateDeclaration { .. })
        );
    }

    #[test]
    fn test_same_name_in_different_scopes() {
        let source = "fn i32 f(i32 a) { ret a; } fn i32 g(i32 a) { ret a; } fn i32 main() { ret 0; }";
        let (symbols, _, _) = scan_source(source).unwrap();
        assert!(symbols.lookup("f", "a").is_some());
        assert!(symbols.lookup("g", "a").is_some());
    }

    #[test]
    fn test_self_reference() {
        let source = "fn i32 f(i32 n) {\n ret f;\n}\nfn i32 main() { ret 0; }";
        assert_matches!(
            scan_source(source),
            Err(ScanError::SelfReference { line: 2, .. })
        );

        let recursive = "fn i32 f(i32 n) { ret f(n - 1); } fn i32 main() { ret 0; }";
        assert!(scan_source(recursive).is_ok());
    }

    #[test]
    fn test_literal_errors() {
        assert_matches!(
            scan_source("fn i32 main() { echo ''; ret 0; }"),
            Err(ScanError::EmptyStringLiteral { line: 1 })
        );
        assert_matches!(
            scan_source("fn i32 main() { ret 2147483648; }"),
            Err(ScanError::IntegerOutOfRange { .. })
        );
        assert!(scan_source("fn i32 main() { ret 2147483647; }").is_ok());
    }

    #[test]
    fn test_unrecognized_token() {
        assert_matches!(
            scan_source("fn i32 main() {\n ret 0 ! 1;\n}"),
            Err(ScanError::UnrecognizedToken { line: 2, .. })
        );
    }

    #[test]
    fn test_scope_depth_limit() {
        let scanner = Scanner::new().with_max_scope_depth(1);
        assert_matches!(
            scan_with(&scanner, "fn i32 main() { ret (1); }"),
            Err(ScanError::ScopeTooDeep { max: 1, line: 1 })
        );
    }

    #[test]
    fn test_symbol_capacity() {
        let tokens = tokenize_source(b"fn i32 main() { ret 0; }").unwrap().tokens;
        let mut symbols = SymbolTable::with_capacity_limit(5);
        let mut lexemes = LexemeTable::new();

        assert_matches!(
            Scanner::new().scan(&tokens, &mut symbols, &mut lexemes),
            Err(ScanError::CapacityExceeded { table: "symbol", .. })
        );
    }

    #[test]
    fn test_lexeme_capacity() {
        let tokens = tokenize_source(b"fn i32 main() { ret 0; }").unwrap().tokens;
        let mut symbols = SymbolTable::new();
        let mut lexemes = LexemeTable::with_capacity_limit(3);

        assert_matches!(
            Scanner::new().scan(&tokens, &mut symbols, &mut lexemes),
            Err(ScanError::CapacityExceeded { table: "lexeme", max: 3, .. })
        );
    }
}
