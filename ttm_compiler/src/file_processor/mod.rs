//! File processor module with compile-time limits and global logging integration

mod processor;

use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::log_debug;
pub use processor::{
    count_lines, FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError,
};

/// Read a file with default settings
pub fn process_file(file_path: &str) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(file_path)
}

/// Create a file processor from runtime preferences structure
pub fn create_processor_from_preferences(prefs: &FileProcessorPreferences) -> FileProcessor {
    FileProcessor::from_preferences(prefs)
}

/// Get the compile-time maximum file size limit
pub fn get_max_file_size() -> u64 {
    MAX_FILE_SIZE
}

/// Initialize file processor logging validation (for system startup)
pub fn init_file_processor_logging() -> Result<(), String> {
    codes::ensure_registered(
        "File processor",
        &[
            codes::file_processing::FILE_OPEN_FAILURE,
            codes::file_processing::FILE_TOO_LARGE,
        ],
    )?;

    log_debug!("File processor compile-time configuration loaded",
        "max_file_size" => MAX_FILE_SIZE,
        "large_file_threshold" => LARGE_FILE_THRESHOLD
    );

    Ok(())
}
