// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Whether to require the .ttm extension
    pub require_ttm_extension: bool,

    /// Whether to enable detailed performance logging
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_ttm_extension: env::var(env_vars::REQUIRE_TTM_EXTENSION)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_performance_logging: env::var(env_vars::ENABLE_PERFORMANCE_LOGGING)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether to collect preprocessing metrics (comments, ignored bytes, quotes)
    pub collect_detailed_metrics: bool,

    /// Whether to log every raw token produced by the splitter at debug level
    pub trace_tokens: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env::var(env_vars::LEXICAL_DETAILED_METRICS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            trace_tokens: env::var(env_vars::LEXICAL_TRACE_TOKENS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerPreferences {
    /// Whether to log each symbol table insertion at debug level
    pub log_symbol_insertions: bool,

    /// Whether to log scope stack transitions at debug level
    pub log_scope_transitions: bool,
}

impl Default for ScannerPreferences {
    fn default() -> Self {
        Self {
            log_symbol_insertions: env::var(env_vars::SCANNER_LOG_SYMBOLS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_scope_transitions: env::var(env_vars::SCANNER_LOG_SCOPES)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionPreferences {
    /// Whether to log each converted statement at debug level
    pub log_conversions: bool,
}

impl Default for ConversionPreferences {
    fn default() -> Self {
        Self {
            log_conversions: env::var(env_vars::CONVERSION_LOG_STATEMENTS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Preferred minimum log level
    pub min_log_level: LogLevel,

    /// Whether to enable cargo-style error reporting
    pub enable_cargo_style_output: bool,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            enable_cargo_style_output: env::var(env_vars::LOGGING_CARGO_STYLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            include_file_context: env::var(env_vars::LOGGING_INCLUDE_FILE_CONTEXT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Errors loading a runtime configuration file
#[derive(Debug, thiserror::Error)]
pub enum RuntimeConfigError {
    #[error("Failed to read configuration file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Invalid TOML in configuration file '{path}': {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub scanner: ScannerPreferences,
    pub conversion: ConversionPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse preferences from TOML text; missing sections fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load preferences from a TOML file
    pub fn load(path: &Path) -> Result<Self, RuntimeConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| RuntimeConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_toml_str(&content).map_err(|e| RuntimeConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_TTM_EXTENSION: &str = "TTM_REQUIRE_TTM_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "TTM_ENABLE_PERFORMANCE_LOGGING";

    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "TTM_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_TRACE_TOKENS: &str = "TTM_LEXICAL_TRACE_TOKENS";

    // Scanner
    pub const SCANNER_LOG_SYMBOLS: &str = "TTM_SCANNER_LOG_SYMBOLS";
    pub const SCANNER_LOG_SCOPES: &str = "TTM_SCANNER_LOG_SCOPES";

    // Conversion
    pub const CONVERSION_LOG_STATEMENTS: &str = "TTM_CONVERSION_LOG_STATEMENTS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "TTM_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "TTM_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "TTM_LOGGING_MIN_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "TTM_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "TTM_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("invalid"), None);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [scanner]
            log_symbol_insertions = true

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert!(config.scanner.log_symbol_insertions);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(RuntimeConfig::from_toml_str("[scanner\nlog = ").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = RuntimeConfig::load(Path::new("does/not/exist.toml"));
        assert!(matches!(result, Err(RuntimeConfigError::Io { .. })));
    }

    #[test]
    fn test_env_var_names_use_prefix() {
        assert!(env_vars::LOGGING_MIN_LEVEL.starts_with("TTM_"));
        assert!(env_vars::SCANNER_LOG_SCOPES.starts_with("TTM_"));
    }
}
