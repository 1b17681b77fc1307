//! Symbol table for declared functions, variables, parameters and literals

pub mod builtins;
pub mod error;
pub mod table;

pub use builtins::{register_builtins, Builtin, BUILTINS};
pub use error::{SymbolError, SymbolResult};
pub use table::{DataType, SymbolEntry, SymbolKind, SymbolTable, GLOBAL_SCOPE};
