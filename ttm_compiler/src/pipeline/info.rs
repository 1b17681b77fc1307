use crate::config::compile_time::{file_processing, scanner};

/// Information about pipeline capabilities
#[derive(Debug, Clone)]
pub struct PipelineInfo {
    pub pipeline_stages: usize,
    pub stage_names: Vec<&'static str>,
    pub max_file_size: u64,
    pub max_symbols: usize,
    pub max_lexemes: usize,
    pub supported_extensions: Vec<String>,
    pub cargo_style_output: bool,
}

impl PipelineInfo {
    pub fn report(&self) -> String {
        format!(
            "TTM Front End Pipeline:\n\
             - Pipeline Stages: {} ({})\n\
             - Max File Size: {} KB\n\
             - Symbol Table Capacity: {}\n\
             - Lexeme Table Capacity: {}\n\
             - Supported Extensions: {}\n\
             - Cargo-style Output: {}",
            self.pipeline_stages,
            self.stage_names.join(" -> "),
            self.max_file_size / 1024,
            self.max_symbols,
            self.max_lexemes,
            self.supported_extensions.join(", "),
            self.cargo_style_output
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "{}-stage TTM front end for .{} sources",
            self.pipeline_stages,
            self.supported_extensions.join(", .")
        )
    }
}

/// Get pipeline capabilities information
pub fn get_pipeline_info() -> PipelineInfo {
    let stage_names = vec!["read", "preprocess", "split", "scan", "convert"];
    PipelineInfo {
        pipeline_stages: stage_names.len(),
        stage_names,
        max_file_size: file_processing::MAX_FILE_SIZE,
        max_symbols: scanner::MAX_SYMBOLS,
        max_lexemes: scanner::MAX_LEXEMES,
        supported_extensions: vec!["ttm".to_string()],
        cargo_style_output: crate::logging::config::use_cargo_style_output(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let info = get_pipeline_info();
        assert_eq!(info.pipeline_stages, 5);
        assert_eq!(info.summary(), "5-stage TTM front end for .ttm sources");
        assert!(info.report().contains("scan -> convert"));
    }
}
