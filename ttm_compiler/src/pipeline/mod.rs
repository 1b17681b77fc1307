//! End-to-end driver: file -> preprocess -> split -> scan -> convert

mod error;
mod info;
pub mod output;
mod result;
mod validation;

pub use error::{Diagnostic, PipelineError};
pub use info::{get_pipeline_info, PipelineInfo};
pub use output::PipelineOutput;
pub use result::PipelineResult;
pub use validation::validate_pipeline;

use crate::config::runtime::RuntimeConfig;
use crate::logging;
use std::path::PathBuf;
use std::time::Instant;

/// Compile a source file with default preferences
pub fn compile_file(file_path: &str) -> Result<PipelineResult, PipelineError> {
    compile_file_with_config(file_path, &RuntimeConfig::default())
}

/// Compile a source file; events are grouped under the file's path
pub fn compile_file_with_config(
    file_path: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    logging::with_file_context(PathBuf::from(file_path), 0, || {
        crate::log_info!("Starting TTM compilation", "file" => file_path);

        let file_result =
            crate::file_processor::create_processor_from_preferences(&config.file_processor)
                .process_file(file_path)?;

        let mut result = run_stages(&file_result.bytes, config, start_time)?;
        result.file_metadata = Some(file_result.metadata);

        result.log_success(file_path);
        Ok(result)
    })
}

/// Compile in-memory source with default preferences
pub fn compile_source(bytes: &[u8]) -> Result<PipelineResult, PipelineError> {
    compile_source_with_config(bytes, &RuntimeConfig::default())
}

pub fn compile_source_with_config(
    bytes: &[u8],
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let result = run_stages(bytes, config, Instant::now())?;
    result.log_success("<memory>");
    Ok(result)
}

fn run_stages(
    bytes: &[u8],
    config: &RuntimeConfig,
    start_time: Instant,
) -> Result<PipelineResult, PipelineError> {
    let lexical = crate::lexical::tokenize_source_with_preferences(bytes, &config.lexical)?;

    let (symbols, mut lexemes, scan_metrics) =
        crate::scanner::scan_tokens_with_preferences(&lexical.tokens, config.scanner.clone())?;

    let conversion_metrics =
        crate::polish::convert_program(&mut lexemes, &symbols, &config.conversion)?;

    Ok(PipelineResult {
        symbols,
        lexemes,
        file_metadata: None,
        lexical_metrics: lexical.metrics,
        scan_metrics,
        conversion_metrics,
        token_count: lexical.tokens.len(),
        processing_duration: start_time.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::LexemeKind;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    const PROGRAM: &str = "\
fn i32 square(i32 n) {
    ret n * n;
}
// entry point
fn i32 main() {
    let i32 x;
    let str s;
    x = -2 + square(3);
    s = concat('a', 'b');
    echo x;
    ret 0;
}
";

    #[test]
    fn test_validate_pipeline() {
        let _ = crate::logging::init_global_logging();
        assert!(validate_pipeline().is_ok());
    }

    #[test]
    fn test_compile_source() {
        let result = compile_source(PROGRAM.as_bytes()).unwrap();

        assert!(result.file_metadata.is_none());
        assert_eq!(result.conversion_metrics.statements, 5);
        assert_eq!(result.conversion_metrics.calls, 2);
        assert!(result.symbols.lookup("main", "x").is_some());
        assert!(result.symbols.lookup("square", "n").is_some());
        assert_eq!(result.lexemes.count_kind(LexemeKind::Call), 2);

        let rows: Vec<String> = result.lexemes.render_by_line().lines().map(String::from).collect();
        assert_eq!(rows[1], "0002 rii*;");
        assert_eq!(rows[6], "0008 i=ll-l@+;");
        assert_eq!(rows[7], "0009 i=ll@;");
    }

    #[test]
    fn test_compile_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prog.ttm");
        fs::write(&path, PROGRAM).unwrap();

        let result = compile_file(path.to_str().unwrap()).unwrap();

        let metadata = result.file_metadata.as_ref().unwrap();
        assert!(metadata.is_ttm_file);
        assert_eq!(metadata.size, PROGRAM.len() as u64);

        let json = result.output().to_json().unwrap();
        assert!(json.contains("\"square\""));
    }

    #[test]
    fn test_missing_file() {
        let error = compile_file("does/not/exist.ttm").unwrap_err();
        assert_matches!(error, PipelineError::FileProcessing(_));
        assert_eq!(error.diagnostic().code, 110);
    }

    #[test]
    fn test_first_error_stops_the_pipeline() {
        let error = compile_source(b"fn i32 main() {\n ret y;\n}").unwrap_err();
        assert_matches!(error, PipelineError::Scanning(_));
        assert_eq!(
            error.diagnostic(),
            Diagnostic {
                code: 124,
                line: Some(2),
                column: None
            }
        );
    }

    #[test]
    fn test_conversion_failure() {
        let error = compile_source(b"fn i32 main() { ret 1 +; }").unwrap_err();
        assert_matches!(error, PipelineError::Conversion(_));
        assert_eq!(error.diagnostic().code, 140);
    }
}
