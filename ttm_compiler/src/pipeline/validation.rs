/// Validate that the pipeline is properly configured
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating complete pipeline configuration");

    crate::file_processor::init_file_processor_logging()?;
    crate::lexical::init_lexical_logging()?;
    crate::scanner::init_scanner_logging()?;
    crate::polish::init_polish_logging()?;

    if crate::tokens::classify("main") != Some(crate::tokens::LexemeKind::Main) {
        return Err("Lexeme matchers do not recognize the entry point keyword".to_string());
    }

    crate::log_success!(
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Complete pipeline validation succeeded",
        "stages_validated" => 4,
        "file_processing" => true,
        "lexical_analysis" => true,
        "scanning" => true,
        "conversion" => true
    );

    Ok(())
}
