// Internal modules
pub mod config;
pub mod file_processor;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod polish;
pub mod scanner;
pub mod symbols;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use pipeline::{compile_file, compile_source, Diagnostic, PipelineError, PipelineResult};

// Re-export pipeline output for downstream code generators
pub use pipeline::output::PipelineOutput;
