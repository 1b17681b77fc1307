//! Event system for TTM compiler logging

use super::codes::{self, Code};
use crate::utils::SourcePosition;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::SystemTime;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
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
}

/// Core log event structure
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: SystemTime,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub position: Option<SourcePosition>,
    pub context: HashMap<String, String>,
}

impl LogEvent {
    fn with_level(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            level,
            code,
            message: message.to_string(),
            position: None,
            context: HashMap::new(),
        }
    }

    /// Create a new error event
    pub fn error(error_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Error, error_code, message)
    }

    /// Create a new warning event (warnings may not have codes)
    pub fn warning(message: &str) -> Self {
        Self::with_level(LogLevel::Warning, Code::NONE, message)
    }

    /// Create warning with specific code
    pub fn warning_with_code(warning_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Warning, warning_code, message)
    }

    /// Create a new info event
    pub fn info(message: &str) -> Self {
        Self::with_level(LogLevel::Info, Code::NONE, message)
    }

    /// Create a success event (info with success code)
    pub fn success(success_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Info, success_code, message)
    }

    /// Create a debug event
    pub fn debug(message: &str) -> Self {
        Self::with_level(LogLevel::Debug, Code::NONE, message)
    }

    /// Attach a source position
    pub fn with_position(mut self, position: SourcePosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Add context data
    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn is_info(&self) -> bool {
        self.level == LogLevel::Info
    }

    pub fn is_debug(&self) -> bool {
        self.level == LogLevel::Debug
    }

    /// Check if this event requires halting
    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.code)
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.code).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.code)
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.code)
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.code)
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.code)
    }

    /// Format for display
    pub fn format(&self) -> String {
        let position_str = self
            .position
            .map(|p| format!(" at {}", p))
            .unwrap_or_default();

        format!(
            "[{}] {} - {}{}",
            self.level.as_str(),
            self.code,
            self.message,
            position_str
        )
    }

    /// Format with detailed error information
    pub fn format_detailed(&self) -> String {
        let mut output = self.format();

        output.push_str(&format!("\n  Category: {}", self.category()));
        output.push_str(&format!("\n  Severity: {}", self.severity()));

        if self.is_error() {
            output.push_str(&format!("\n  Recoverable: {}", self.is_recoverable()));
            output.push_str(&format!("\n  Requires halt: {}", self.requires_halt()));
        }

        let description = self.description();
        if description != "Unknown error" {
            output.push_str(&format!("\n  Description: {}", description));
        }

        let action = self.recommended_action();
        if action != "No specific action available" {
            output.push_str(&format!("\n  Recommended action: {}", action));
        }

        if !self.context.is_empty() {
            output.push_str("\n  Context:");
            let mut keys: Vec<_> = self.context.keys().collect();
            keys.sort();
            for key in keys {
                output.push_str(&format!("\n    {}: {}", key, self.context[key]));
            }
        }

        output
    }

    /// Format as JSON for structured logging
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let timestamp: DateTime<Utc> = self.timestamp.into();

        let mut json = serde_json::json!({
            "timestamp": timestamp.to_rfc3339(),
            "level": self.level.as_str(),
            "code": self.code.value(),
            "message": self.message,
            "category": self.category(),
            "severity": self.severity(),
        });

        if self.is_error() {
            json["error_metadata"] = serde_json::json!({
                "recoverable": self.is_recoverable(),
                "requires_halt": self.requires_halt(),
                "description": self.description(),
                "recommended_action": self.recommended_action(),
            });
        }

        if let Some(position) = &self.position {
            json["position"] = serde_json::json!({
                "line": position.line,
                "column": position.column,
            });
        }

        if !self.context.is_empty() {
            json["context"] = serde_json::Value::Object(
                self.context
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect(),
            );
        }

        serde_json::to_string(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_error_event_creation() {
        let event = LogEvent::error(codes::file_processing::FILE_OPEN_FAILURE, "Cannot open");

        assert!(event.is_error());
        assert_eq!(event.code.value(), 110);
        assert_eq!(event.message, "Cannot open");
        assert_eq!(event.category(), "FileProcessing");
    }

    #[test]
    fn test_success_event_creation() {
        let event = LogEvent::success(codes::success::SCAN_COMPLETE, "Scan done");

        assert!(event.is_info());
        assert_eq!(event.category(), "Success");
    }

    #[test]
    fn test_event_formatting_with_position() {
        let event = LogEvent::error(codes::lexical::FORBIDDEN_CHARACTER, "Forbidden character")
            .with_position(SourcePosition::new(4, 9));
        let formatted = event.format();

        assert_eq!(formatted, "[ERROR] 111 - Forbidden character at 4:9");
    }

    #[test]
    fn test_generic_codes() {
        assert_eq!(LogEvent::warning("w").code, Code::NONE);
        assert_eq!(LogEvent::info("i").code, Code::NONE);
        assert_eq!(LogEvent::debug("d").code, Code::NONE);
    }

    #[test]
    fn test_detailed_format_includes_metadata() {
        let event = LogEvent::error(codes::structural::MISSING_ENTRY_POINT, "No main")
            .with_context("file", "prog.ttm");
        let detailed = event.format_detailed();

        assert!(detailed.contains("Category: Structural"));
        assert!(detailed.contains("Requires halt: true"));
        assert!(detailed.contains("file: prog.ttm"));
    }

    #[test]
    fn test_json_formatting() {
        let event = LogEvent::error(codes::declarations::SELF_REFERENCE, "Self reference")
            .with_position(SourcePosition::at_line(7))
            .with_context("name", "fact");

        let json = event.format_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["code"], 125);
        assert_eq!(value["position"]["line"], 7);
        assert!(value["position"]["column"].is_null());
        assert_eq!(value["context"]["name"], "fact");
    }
}
