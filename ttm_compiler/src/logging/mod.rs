//! Global logging module for the TTM compiler
//!
//! Provides thread-safe global logging with per-file event collection,
//! cargo-style error reporting, and clean macro interface.

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::utils::SourcePosition;

// Re-export main types
pub use codes::Code;
pub use collector::{ErrorCollector, FileProcessingContext, ProcessingSummary};
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();
static GLOBAL_ERROR_COLLECTOR: OnceLock<Arc<ErrorCollector>> = OnceLock::new();

thread_local! {
    static FILE_CONTEXT: RefCell<Option<FileProcessingContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging system with console output only
pub fn init_global_logging() -> Result<(), String> {
    init_global_logging_with_log_file(None)
}

/// Initialize global logging, mirroring events into `log_file` when given
pub fn init_global_logging_with_log_file(log_file: Option<&Path>) -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = match log_file {
        None => Arc::new(service::create_configured_service()),
        Some(path) => {
            let multi = service::create_configured_multi_logger(Some(path))
                .map_err(|e| format!("Cannot open log file '{}': {}", path.display(), e))?;
            Arc::new(LoggingService::new(
                Arc::new(multi),
                config::get_min_log_level(),
            ))
        }
    };

    init_global_logging_with_service(logging_service.clone())?;

    codes::ensure_registered(
        "logging",
        &[
            codes::system::INTERNAL_ERROR,
            codes::file_processing::FILE_OPEN_FAILURE,
            codes::structural::MISSING_ENTRY_POINT,
            codes::conversion::MALFORMED_EXPRESSION,
        ],
    )?;

    let event = events::LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    );
    logging_service.log_event(event);

    Ok(())
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized")?;

    GLOBAL_ERROR_COLLECTOR
        .set(Arc::new(ErrorCollector::new()))
        .map_err(|_| "Global error collector already initialized")?;

    Ok(())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some() && GLOBAL_ERROR_COLLECTOR.get().is_some()
}

// ============================================================================
// GLOBAL ACCESS
// ============================================================================

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Safe access to global error collector
pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_ERROR_COLLECTOR
        .get()
        .map(|collector| collector.as_ref())
}

// ============================================================================
// FILE CONTEXT MANAGEMENT
// ============================================================================

/// Set file context for current thread
pub fn set_file_context(file_path: PathBuf, file_id: usize) {
    let context = FileProcessingContext::new(file_path, file_id);

    if let Some(collector) = try_get_global_error_collector() {
        collector.record_file_context(context.clone());
    }

    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(context);
    });
}

/// Clear file context for current thread
pub fn clear_file_context() {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Execute function with file context
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_file_context(file_path, file_id);
    let result = f();
    clear_file_context();
    result
}

/// Get current file context (used by macros)
pub fn get_current_file_context() -> Option<FileProcessingContext> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn attach_file_context(event: LogEvent) -> LogEvent {
    if !config::include_file_context() {
        return event;
    }
    match get_current_file_context() {
        Some(file_ctx) => event
            .with_context("file", &file_ctx.file_path.display().to_string())
            .with_context("file_id", &file_ctx.file_id.to_string()),
        None => event,
    }
}

/// Send an event to the global logger and the per-file collector
pub fn dispatch_with_file_context(event: LogEvent) {
    let event = attach_file_context(event);

    if event.is_error() || event.is_warning() {
        if let (Some(file_ctx), Some(collector)) =
            (get_current_file_context(), try_get_global_error_collector())
        {
            collector.record_event(&file_ctx.file_path, event.clone());
        }
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

fn with_pairs(mut event: LogEvent, context: Vec<(&str, &str)>) -> LogEvent {
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    event
}

/// Backs `log_error!`
pub fn log_error_with_context(
    code: Code,
    message: &str,
    position: Option<SourcePosition>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, message);
    if let Some(p) = position {
        event = event.with_position(p);
    }
    dispatch_with_file_context(with_pairs(event, context));
}

/// Backs `log_success!` and `log_performance!`
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch_with_file_context(with_pairs(LogEvent::success(code, message), context));
}

/// Backs `log_info!`
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch_with_file_context(with_pairs(LogEvent::info(message), context));
}

// ============================================================================
// SUMMARY AND REPORTING
// ============================================================================

/// Errors and warnings recorded for one source file
pub fn get_file_errors(file_path: &Path) -> Vec<LogEvent> {
    try_get_global_error_collector()
        .map(|collector| collector.get_file_errors(file_path))
        .unwrap_or_default()
}

/// Render collected diagnostics cargo-style
pub fn cargo_style_summary() -> Option<String> {
    if !config::use_cargo_style_output() {
        return None;
    }
    try_get_global_error_collector().map(collector::format_cargo_style_errors)
}

/// Print cargo-style summary to stderr
pub fn print_cargo_style_summary() {
    if let Some(summary) = cargo_style_summary() {
        eprint!("{}", summary);
    }
}
