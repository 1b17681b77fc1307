//! Shared primitive types for the TTM front end

pub mod position;

pub use position::SourcePosition;
