// This file is part of msh, a POSIX-subset shell implementation.

//! The shell variable table.

use std::collections::HashMap;

/// `NAME -> VALUE` mapping built by `variable_assignment` statements.
///
/// Keys are case-sensitive, matching POSIX shell variable names. This table
/// is intentionally simpler than a full shell's (no arrays, no attributes
/// like `readonly`/`export` per-variable): every assignment here is also
/// exported to the process environment, so there is no distinct "exported"
/// subset to track.
#[derive(Clone, Debug, Default)]
pub struct VariableTable {
    values: HashMap<String, String>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a variable. Returns `None` if unset; the expander treats
    /// that the same as an empty string (see SPEC_FULL.md's open question
    /// on unset-vs-empty).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }
}
