//! File processor implementation with compile-time limits and global logging integration

use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success, log_warning};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// File processor specific errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .ttm, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },
}

impl FileProcessorError {
    /// Every failure to obtain the source bytes is a file-open failure,
    /// except the size limit which has its own code
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::FileNotFound { .. }
            | FileProcessorError::InvalidExtension { .. }
            | FileProcessorError::PermissionDenied { .. }
            | FileProcessorError::IoError { .. }
            | FileProcessorError::InvalidPath { .. } => codes::file_processing::FILE_OPEN_FAILURE,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code())
    }

    fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => FileProcessorError::FileNotFound {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                path: path.display().to_string(),
            },
            _ => FileProcessorError::IoError {
                message: format!("'{}': {}", path.display(), error),
            },
        }
    }
}

/// File metadata collected during processing
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Lowercased file extension (if any)
    pub extension: Option<String>,
    /// Number of source lines
    pub line_count: usize,
    /// Whether file has .ttm extension
    pub is_ttm_file: bool,
    pub modified: Option<std::time::SystemTime>,
}

impl FileMetadata {
    /// Get file size in human-readable format
    pub fn human_readable_size(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = self.size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", self.size, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Check if file is above the compile-time large file threshold
    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

/// Raw source bytes plus metadata
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    /// File contents, untouched; the preprocessor classifies every byte
    pub bytes: Vec<u8>,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    pub fn byte_count(&self) -> usize {
        self.bytes.len()
    }

    /// Bytes read per millisecond
    pub fn processing_rate(&self) -> f64 {
        let duration_ms = self.processing_duration.as_secs_f64() * 1000.0;
        if duration_ms > 0.0 {
            self.byte_count() as f64 / duration_ms
        } else {
            0.0
        }
    }
}

/// Count source lines the way the preprocessor numbers them
pub fn count_lines(bytes: &[u8]) -> usize {
    if bytes.is_empty() {
        return 0;
    }
    let newlines = bytes.iter().filter(|&&b| b == b'\n').count();
    if bytes.last() == Some(&b'\n') {
        newlines
    } else {
        newlines + 1
    }
}

/// File processor with compile-time size limits and runtime preferences
#[derive(Debug, Clone)]
pub struct FileProcessor {
    /// Whether to require the .ttm extension
    pub require_ttm_extension: bool,
    /// Whether to log detailed throughput metrics
    pub enable_performance_logging: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            require_ttm_extension: false,
            enable_performance_logging: true,
        }
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_ttm_extension: prefs.require_ttm_extension,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_ttm_extension_required(mut self, required: bool) -> Self {
        self.require_ttm_extension = required;
        self
    }

    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    /// Get the compile-time maximum file size
    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    /// Read a source file and return its bytes with metadata
    pub fn process_file(
        &self,
        file_path: &str,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();

        log_debug!("Starting file processing", "file" => file_path);

        let path = self.validate_path(file_path)?;
        let mut metadata = self.get_metadata(&path)?;
        self.validate_file(&metadata, file_path)?;

        let bytes = fs::read(&path).map_err(|e| {
            let error = FileProcessorError::from_io(&path, e);
            log_error!(error.error_code(), "Failed to read source file",
                "file" => file_path,
                "reason" => &error
            );
            error
        })?;

        metadata.line_count = count_lines(&bytes);

        let result = FileProcessingResult {
            bytes,
            metadata,
            processing_duration: start_time.elapsed(),
        };

        self.log_processing_success(&result, file_path);

        Ok(result)
    }

    fn log_processing_success(&self, result: &FileProcessingResult, file_path: &str) {
        if result.metadata.is_large_file() {
            log_warning!("Source file is above the large file threshold",
                "file" => file_path,
                "size" => result.metadata.human_readable_size(),
                "threshold_bytes" => LARGE_FILE_THRESHOLD
            );
        }

        if self.enable_performance_logging {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File read with performance metrics",
                "file" => file_path,
                "size_bytes" => result.metadata.size,
                "size_human" => result.metadata.human_readable_size(),
                "lines" => result.metadata.line_count,
                "duration_ms" => format!("{:.2}", result.processing_duration.as_secs_f64() * 1000.0),
                "bytes_per_ms" => format!("{:.2}", result.processing_rate())
            );
        } else {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File read",
                "file" => file_path,
                "size_bytes" => result.metadata.size,
                "lines" => result.metadata.line_count
            );
        }
    }

    fn validate_path(&self, file_path: &str) -> Result<PathBuf, FileProcessorError> {
        if file_path.is_empty() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }

        let path = Path::new(file_path);

        if !path.exists() {
            let error = FileProcessorError::FileNotFound {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "File not found", "path" => file_path);
            return Err(error);
        }

        if !path.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Path is not a file", "path" => file_path);
            return Err(error);
        }

        path.canonicalize().map_err(|e| {
            let error = FileProcessorError::from_io(path, e);
            log_error!(error.error_code(), "Failed to canonicalize path",
                "path" => file_path,
                "reason" => &error
            );
            error
        })
    }

    fn get_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| {
            let error = FileProcessorError::from_io(path, e);
            log_error!(error.error_code(), "Failed to read file metadata",
                "path" => path.display(),
                "reason" => &error
            );
            error
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());
        let is_ttm_file = extension.as_deref() == Some("ttm");

        let file_metadata = FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            line_count: 0,
            is_ttm_file,
            modified: metadata.modified().ok(),
        };

        log_debug!("File metadata collected",
            "size_bytes" => file_metadata.size,
            "extension" => file_metadata.extension.as_deref().unwrap_or("none"),
            "is_ttm" => is_ttm_file
        );

        Ok(file_metadata)
    }

    fn validate_file(
        &self,
        metadata: &FileMetadata,
        file_path: &str,
    ) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds compile-time maximum size limit",
                "file" => file_path,
                "size_bytes" => metadata.size,
                "limit_bytes" => MAX_FILE_SIZE
            );
            return Err(error);
        }

        if self.require_ttm_extension && !metadata.is_ttm_file {
            let error = FileProcessorError::InvalidExtension {
                extension: metadata.extension.clone(),
            };
            log_error!(error.error_code(), "File does not have required .ttm extension",
                "file" => file_path,
                "extension" => metadata.extension.as_deref().unwrap_or("none")
            );
            return Err(error);
        }

        Ok(())
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_process_valid_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("prog.ttm");
        let content = "fn i32 main()\n{\nret 0;\n}";
        fs::write(&file_path, content).unwrap();

        let result = FileProcessor::new()
            .process_file(file_path.to_str().unwrap())
            .unwrap();

        assert_eq!(result.bytes, content.as_bytes());
        assert_eq!(result.metadata.line_count, 4);
        assert!(result.metadata.is_ttm_file);
        assert_eq!(result.byte_count(), content.len());
    }

    #[test]
    fn test_non_utf8_bytes_are_preserved() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("latin1.ttm");
        fs::write(&file_path, [b'a', 0xE9, b'\n']).unwrap();

        let result = FileProcessor::new()
            .process_file(file_path.to_str().unwrap())
            .unwrap();

        assert_eq!(result.bytes, vec![b'a', 0xE9, b'\n']);
        assert_eq!(result.metadata.line_count, 1);
    }

    #[test]
    fn test_file_not_found() {
        let result = FileProcessor::new().process_file("nonexistent.ttm");

        let error = result.unwrap_err();
        assert_matches!(error, FileProcessorError::FileNotFound { .. });
        assert_eq!(error.error_code().value(), 110);
    }

    #[test]
    fn test_directory_is_invalid_path() {
        let dir = tempdir().unwrap();
        let result = FileProcessor::new().process_file(dir.path().to_str().unwrap());

        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_empty_path() {
        let result = FileProcessor::new().process_file("");
        assert_matches!(result, Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_extension_requirement() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("prog.txt");
        fs::write(&file_path, "content").unwrap();

        let processor = FileProcessor::new().with_ttm_extension_required(true);
        let result = processor.process_file(file_path.to_str().unwrap());

        assert_matches!(result, Err(FileProcessorError::InvalidExtension { extension: Some(ref e) }) if e == "txt");
    }

    #[test]
    fn test_empty_file_is_read() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("empty.ttm");
        fs::write(&file_path, "").unwrap();

        let result = FileProcessor::new()
            .process_file(file_path.to_str().unwrap())
            .unwrap();
        assert!(result.bytes.is_empty());
        assert_eq!(result.metadata.line_count, 0);
    }

    #[test]
    fn test_error_codes() {
        let too_large = FileProcessorError::FileTooLarge {
            size: MAX_FILE_SIZE + 1,
            max_size: MAX_FILE_SIZE,
        };
        assert_eq!(too_large.error_code().value(), 112);
        assert!(too_large.requires_halt());
        assert_eq!(too_large.category(), "FileProcessing");

        let denied = FileProcessorError::PermissionDenied {
            path: "prog.ttm".to_string(),
        };
        assert_eq!(denied.error_code().value(), 110);
    }

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines(b""), 0);
        assert_eq!(count_lines(b"a"), 1);
        assert_eq!(count_lines(b"a\n"), 1);
        assert_eq!(count_lines(b"a\nb"), 2);
        assert_eq!(count_lines(b"\n\n"), 2);
    }

    #[test]
    fn test_human_readable_size() {
        let metadata = FileMetadata {
            path: PathBuf::from("prog.ttm"),
            size: 2048,
            extension: Some("ttm".to_string()),
            line_count: 1,
            is_ttm_file: true,
            modified: None,
        };
        assert_eq!(metadata.human_readable_size(), "2.00 KB");
        assert!(!metadata.is_large_file() || LARGE_FILE_THRESHOLD < 2048);
    }

    #[test]
    fn test_from_preferences() {
        let prefs = FileProcessorPreferences {
            require_ttm_extension: true,
            enable_performance_logging: false,
        };

        let processor = FileProcessor::from_preferences(&prefs);
        assert!(processor.require_ttm_extension);
        assert!(!processor.enable_performance_logging);
    }
}
