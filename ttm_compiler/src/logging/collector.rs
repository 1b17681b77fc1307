//! Error collector with cargo-style output
//!
//! Groups events by source file so a compile run can print every diagnostic
//! under the file it belongs to.

use super::events::LogEvent;
use crate::config::compile_time::logging::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

// ============================================================================
// FILE PROCESSING CONTEXT
// ============================================================================

/// Context information for the file currently being compiled
#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
    pub start_time: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self {
            file_path,
            file_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

// ============================================================================
// PROCESSING SUMMARY
// ============================================================================

/// Summary of collected events across files
#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_processing_time: Duration,
}

impl ProcessingSummary {
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0
    }
}

// ============================================================================
// ERROR COLLECTOR
// ============================================================================

/// Thread-safe collector of per-file events
pub struct ErrorCollector {
    file_events: Mutex<BTreeMap<PathBuf, Vec<LogEvent>>>,
    file_contexts: Mutex<BTreeMap<PathBuf, FileProcessingContext>>,
    processing_start: Instant,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            file_events: Mutex::new(BTreeMap::new()),
            file_contexts: Mutex::new(BTreeMap::new()),
            processing_start: Instant::now(),
        }
    }

    fn events(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Vec<LogEvent>>> {
        self.file_events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn contexts(&self) -> MutexGuard<'_, BTreeMap<PathBuf, FileProcessingContext>> {
        self.file_contexts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Record an event for a specific file
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut events = self.events();

        let total: usize = events.values().map(Vec::len).sum();
        if total >= MAX_ERROR_COLLECTION {
            return;
        }

        let file_events = events.entry(file_path.to_path_buf()).or_default();

        if file_events.len() < MAX_LOG_EVENTS_PER_FILE {
            file_events.push(event);
        } else if file_events.len() == MAX_LOG_EVENTS_PER_FILE {
            file_events.push(LogEvent::warning(&format!(
                "Too many events for file (limit: {})",
                MAX_LOG_EVENTS_PER_FILE
            )));
        }
    }

    /// Record file processing context
    pub fn record_file_context(&self, context: FileProcessingContext) {
        self.contexts().insert(context.file_path.clone(), context);
    }

    /// Get all events for a specific file
    pub fn get_file_events(&self, file_path: &Path) -> Vec<LogEvent> {
        self.events().get(file_path).cloned().unwrap_or_default()
    }

    /// Get errors for a specific file
    pub fn get_file_errors(&self, file_path: &Path) -> Vec<LogEvent> {
        self.events()
            .get(file_path)
            .map(|events| events.iter().filter(|e| e.is_error()).cloned().collect())
            .unwrap_or_default()
    }

    pub fn file_has_errors(&self, file_path: &Path) -> bool {
        self.events()
            .get(file_path)
            .is_some_and(|events| events.iter().any(|e| e.is_error()))
    }

    /// Get all file events (for cargo-style output)
    pub fn get_all_file_events(&self) -> BTreeMap<PathBuf, Vec<LogEvent>> {
        self.events().clone()
    }

    /// Time spent on a file since its context was recorded
    pub fn get_file_elapsed(&self, file_path: &Path) -> Option<Duration> {
        self.contexts().get(file_path).map(|context| context.elapsed())
    }

    /// Get processing summary
    pub fn get_summary(&self) -> ProcessingSummary {
        let events = self.events();

        let mut summary = ProcessingSummary {
            total_files: events.len(),
            total_processing_time: self.processing_start.elapsed(),
            ..Default::default()
        };

        for file_events in events.values() {
            if file_events.iter().any(|e| e.is_error()) {
                summary.failed_files += 1;
            } else {
                summary.successful_files += 1;
            }

            summary.total_errors += file_events.iter().filter(|e| e.is_error()).count();
            summary.total_warnings += file_events.iter().filter(|e| e.is_warning()).count();
        }

        summary
    }

    pub fn clear(&self) {
        self.events().clear();
        self.contexts().clear();
    }

    pub fn total_event_count(&self) -> usize {
        self.events().values().map(Vec::len).sum()
    }

    /// Current event count, configured maximum, and fill ratio
    pub fn get_capacity_info(&self) -> (usize, usize, f64) {
        let current = self.total_event_count();
        let ratio = current as f64 / MAX_ERROR_COLLECTION as f64;
        (current, MAX_ERROR_COLLECTION, ratio)
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CARGO-STYLE FORMATTING
// ============================================================================

fn format_location(file_path: &Path, event: &LogEvent) -> String {
    match event.position {
        Some(position) => format!("\n  --> {}:{}", file_path.display(), position),
        None => String::new(),
    }
}

fn push_context(output: &mut String, event: &LogEvent) {
    let mut keys: Vec<_> = event
        .context
        .keys()
        .filter(|key| *key != "file" && *key != "file_id")
        .collect();
    keys.sort();
    for key in keys {
        output.push_str(&format!("  = {}: {}\n", key, event.context[key]));
    }
}

/// Format collected errors and warnings the way cargo reports diagnostics
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (file_path, events) in &collector.get_all_file_events() {
        let errors: Vec<_> = events.iter().filter(|e| e.is_error()).collect();
        let warnings: Vec<_> = events.iter().filter(|e| e.is_warning()).collect();

        if errors.is_empty() && warnings.is_empty() {
            continue;
        }

        for event in errors {
            output.push_str(&format!(
                "error[{}]: {}{}\n",
                event.code,
                event.message,
                format_location(file_path, event)
            ));
            push_context(&mut output, event);

            let action = event.recommended_action();
            if action != "No specific action available" {
                output.push_str(&format!("  = help: {}\n", action));
            }
        }

        for event in warnings {
            output.push_str(&format!(
                "warning: {}{}\n",
                event.message,
                format_location(file_path, event)
            ));
            push_context(&mut output, event);
        }

        output.push('\n');
    }

    let summary = collector.get_summary();
    if summary.has_errors() {
        output.push_str(&format!("Total errors: {}\n", summary.total_errors));
    }
    if summary.has_warnings() {
        output.push_str(&format!("Total warnings: {}\n", summary.total_warnings));
    }

    output
}
