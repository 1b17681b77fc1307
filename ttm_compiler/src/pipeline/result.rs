use super::output::PipelineOutput;
use crate::file_processor::FileMetadata;
use crate::lexical::PreprocessMetrics;
use crate::logging::codes;
use crate::polish::ConversionMetrics;
use crate::scanner::ScanMetrics;
use crate::symbols::SymbolTable;
use crate::tokens::LexemeTable;
use std::time::Duration;

/// Completed tables plus the counters gathered by every stage
#[derive(Debug)]
pub struct PipelineResult {
    pub symbols: SymbolTable,
    pub lexemes: LexemeTable,
    /// Absent when compiling from memory
    pub file_metadata: Option<FileMetadata>,
    pub lexical_metrics: PreprocessMetrics,
    pub scan_metrics: ScanMetrics,
    pub conversion_metrics: ConversionMetrics,
    pub token_count: usize,
    pub processing_duration: Duration,
}

impl PipelineResult {
    /// Borrowed view of the two tables for serialization
    pub fn output(&self) -> PipelineOutput<'_> {
        PipelineOutput::new(&self.symbols, &self.lexemes)
    }

    pub fn log_success(&self, source: &str) {
        let seconds = self.processing_duration.as_secs_f64();
        let tokens_per_sec = if seconds > 0.0 {
            self.token_count as f64 / seconds
        } else {
            0.0
        };

        crate::log_success!(
            codes::success::PIPELINE_COMPLETE,
            "TTM compilation succeeded",
            "source" => source,
            "tokens" => self.token_count,
            "lexemes" => self.lexemes.len(),
            "symbols" => self.symbols.len(),
            "statements" => self.conversion_metrics.statements,
            "duration_ms" => format!("{:.2}", seconds * 1000.0),
            "processing_rate_tokens_per_sec" => format!("{:.0}", tokens_per_sec)
        );
    }
}
