// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    file_processing: FileProcessingLimits,
    lexical: LexicalLimits,
    scanner: ScannerLimits,
    conversion: ConversionLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct FileProcessingLimits {
    max_file_size: u64,
    large_file_threshold: u64,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_string_length: usize,
    max_identifier_length: usize,
    max_token_count: usize,
}

#[derive(serde::Deserialize)]
struct ScannerLimits {
    max_scope_depth: usize,
    max_symbols: usize,
    max_lexemes: usize,
}

#[derive(serde::Deserialize)]
struct ConversionLimits {
    max_statement_length: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    max_error_collection: usize,
    log_buffer_size: usize,
    max_log_events_per_file: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=TTM_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=TTM_CONFIG_DIR");

    let profile = env::var("TTM_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("TTM_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the ttm_compiler directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);

    println!(
        "cargo:warning=Generated constants from {}",
        config_path.display()
    );
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 1_000_000_000;
    const ABSOLUTE_MAX_SCOPE_DEPTH: usize = 1024;

    if config.file_processing.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("LIMITS: max_file_size exceeds absolute maximum");
    }

    if config.file_processing.large_file_threshold > config.file_processing.max_file_size {
        panic!("LIMITS: large_file_threshold exceeds max_file_size");
    }

    if config.lexical.max_string_length < 2 {
        panic!("LIMITS: max_string_length must leave room for both quotes");
    }

    if config.scanner.max_scope_depth == 0
        || config.scanner.max_scope_depth > ABSOLUTE_MAX_SCOPE_DEPTH
    {
        panic!("LIMITS: max_scope_depth must be within 1..={}", ABSOLUTE_MAX_SCOPE_DEPTH);
    }

    if config.scanner.max_lexemes < config.lexical.max_token_count {
        panic!("LIMITS: max_lexemes must cover max_token_count");
    }

    if config.logging.max_log_events_per_file > config.logging.log_buffer_size {
        panic!("LIMITS: max_log_events_per_file exceeds log_buffer_size");
    }

    if profile == "production" && config.file_processing.max_file_size > 50_000_000 {
        panic!("PRODUCTION: max_file_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod file_processing {{
        pub const MAX_FILE_SIZE: u64 = {};
        pub const LARGE_FILE_THRESHOLD: u64 = {};
    }}

    pub mod lexical {{
        pub const MAX_STRING_LENGTH: usize = {};
        pub const MAX_IDENTIFIER_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
    }}

    pub mod scanner {{
        pub const MAX_SCOPE_DEPTH: usize = {};
        pub const MAX_SYMBOLS: usize = {};
        pub const MAX_LEXEMES: usize = {};
    }}

    pub mod conversion {{
        pub const MAX_STATEMENT_LENGTH: usize = {};
    }}

    pub mod logging {{
        pub const MAX_ERROR_COLLECTION: usize = {};
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_EVENTS_PER_FILE: usize = {};
    }}
}}
"#,
        profile,
        // File Processing
        config.file_processing.max_file_size,
        config.file_processing.large_file_threshold,
        // Lexical
        config.lexical.max_string_length,
        config.lexical.max_identifier_length,
        config.lexical.max_token_count,
        // Scanner
        config.scanner.max_scope_depth,
        config.scanner.max_symbols,
        config.scanner.max_lexemes,
        // Conversion
        config.conversion.max_statement_length,
        // Logging
        config.logging.max_error_collection,
        config.logging.log_buffer_size,
        config.logging.max_log_events_per_file,
    );

    fs::write(&output_path, constants_code).unwrap_or_else(|e| {
        panic!(
            "Failed to write generated constants to {}: {}",
            output_path.display(),
            e
        )
    });
}
