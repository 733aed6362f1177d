//! Reading and writing the `#define` surface of firmware configuration headers.

use std::collections::BTreeMap;

use thiserror::Error;

mod conditions;
mod defines;
mod sheets_block;

pub use self::sheets_block::{
    AUTOSAVE_SYMBOL, FEATURE_SYMBOL, SHOW_ON_STATUS_SYMBOL, defines_sheet_symbols,
    render_sheets_block, slot_symbol,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("line {line}: #{directive} without a matching #if")]
    UnbalancedDirective { line: usize, directive: String },

    #[error("line {line}: duplicate #else")]
    DuplicateElse { line: usize },

    #[error("line {line}: conditional block is never closed with #endif")]
    Unterminated { line: usize },

    #[error("line {line}: malformed #define")]
    MalformedDefine { line: usize },

    #[error("{name}: expected {expected}, found `{value}`")]
    InvalidValue {
        name: String,
        value: String,
        expected: &'static str,
    },
}

/// Symbols left defined after running a header through the preprocessor rules
/// firmforge understands. Values are the raw replacement text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DefineTable {
    defines: BTreeMap<String, String>,
}

impl DefineTable {
    pub fn is_defined(&self, name: &str) -> bool {
        self.defines.contains_key(name)
    }

    /// `ENABLED(name)` as the firmware evaluates it: defined and not set to
    /// `false` or `0`.
    pub fn is_enabled(&self, name: &str) -> bool {
        match self.defines.get(name) {
            Some(v) => !matches!(v.as_str(), "false" | "0"),
            None => false,
        }
    }

    pub fn raw(&self, name: &str) -> Option<&str> {
        self.defines.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defines.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.defines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    pub fn bool_value(&self, name: &str) -> Result<Option<bool>, HeaderError> {
        let Some(value) = self.raw(name) else {
            return Ok(None);
        };
        match value {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(HeaderError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
                expected: "true, false, 1 or 0",
            }),
        }
    }

    pub fn str_value(&self, name: &str) -> Result<Option<String>, HeaderError> {
        let Some(value) = self.raw(name) else {
            return Ok(None);
        };
        defines::decode_c_string(value)
            .map(Some)
            .ok_or_else(|| HeaderError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
                expected: "a string literal",
            })
    }

    fn insert(&mut self, name: String, value: String) {
        self.defines.insert(name, value);
    }

    fn remove(&mut self, name: &str) {
        self.defines.remove(name);
    }
}
