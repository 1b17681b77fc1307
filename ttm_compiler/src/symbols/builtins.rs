//! Standard library functions known before scanning starts

use super::error::SymbolResult;
use super::table::{DataType, SymbolEntry, SymbolKind, SymbolTable, GLOBAL_SCOPE};

/// A library function signature
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub returns: DataType,
    pub parameters: &'static [DataType],
}

pub const BUILTINS: [Builtin; 2] = [
    Builtin {
        name: "parseInt",
        returns: DataType::I32,
        parameters: &[DataType::Str],
    },
    Builtin {
        name: "concat",
        returns: DataType::Str,
        parameters: &[DataType::Str, DataType::Str],
    },
];

/// Insert every built-in function and its parameters; parameters are
/// scoped to the function name and named `arg0`, `arg1`, ...
pub fn register_builtins(table: &mut SymbolTable) -> SymbolResult<usize> {
    let mut registered = 0;

    for builtin in BUILTINS.iter() {
        if table.lookup(GLOBAL_SCOPE, builtin.name).is_some() {
            continue;
        }

        table.insert(SymbolEntry::builtin(
            builtin.name,
            GLOBAL_SCOPE,
            builtin.returns,
            SymbolKind::Function,
        ))?;

        for (position, &data_type) in builtin.parameters.iter().enumerate() {
            table.insert(SymbolEntry::builtin(
                format!("arg{}", position),
                builtin.name,
                data_type,
                SymbolKind::Parameter,
            ))?;
        }

        registered += 1;
    }

    Ok(registered)
}
