use std::fmt::Write as _;

use crate::model::{SHEET_SLOTS, SheetsConfig};

use super::defines::encode_c_string;
use super::{DefineTable, HeaderError};

pub const FEATURE_SYMBOL: &str = "SHEETS_FEATURE";
pub const SHOW_ON_STATUS_SYMBOL: &str = "SHEETS_SHOW_ON_STATUS_SCREEN";
pub const AUTOSAVE_SYMBOL: &str = "SHEETS_AUTOSAVE_EEPROM";

const SYMBOL_PREFIX: &str = "SHEETS_";

/// `SHEETS_SHEET_<slot>` for a 1-based slot.
pub fn slot_symbol(slot: usize) -> String {
    format!("SHEETS_SHEET_{}", slot)
}

/// Render the sheets block for `Configuration_adv.h`.
///
/// A disabled feature leaves the flag commented out and emits no dependent
/// symbols.
pub fn render_sheets_block(sheets: Option<&SheetsConfig>) -> String {
    let mut out = String::new();
    out.push_str("/**\n * Sheets feature\n */\n");

    let Some(sheets) = sheets else {
        let _ = writeln!(out, "//#define {}", FEATURE_SYMBOL);
        return out;
    };

    let _ = writeln!(out, "#define {}", FEATURE_SYMBOL);
    let _ = writeln!(out, "#if ENABLED({})", FEATURE_SYMBOL);
    let _ = writeln!(
        out,
        "  #define {:<30}{}",
        SHOW_ON_STATUS_SYMBOL, sheets.show_on_status_screen
    );
    let _ = writeln!(
        out,
        "  #define {:<30}{}",
        AUTOSAVE_SYMBOL, sheets.autosave_eeprom
    );
    out.push('\n');
    for (idx, name) in sheets.sheet_names.iter().enumerate() {
        let _ = writeln!(
            out,
            "  #define {} {}",
            slot_symbol(idx + 1),
            encode_c_string(name)
        );
    }
    out.push_str("#endif\n");
    out
}

/// True if the table carries any sheets symbol, enabled or not.
pub fn defines_sheet_symbols(table: &DefineTable) -> bool {
    table.names().any(|n| n.starts_with(SYMBOL_PREFIX))
}

impl SheetsConfig {
    /// Recover the sheets configuration from parsed header symbols.
    ///
    /// Returns `None` when `SHEETS_FEATURE` is not defined. Dependent symbols
    /// that are missing keep their default values.
    pub fn from_defines(table: &DefineTable) -> Result<Option<Self>, HeaderError> {
        if !table.is_enabled(FEATURE_SYMBOL) {
            return Ok(None);
        }

        let mut cfg = SheetsConfig::default();
        if let Some(show) = table.bool_value(SHOW_ON_STATUS_SYMBOL)? {
            cfg.show_on_status_screen = show;
        }
        if let Some(autosave) = table.bool_value(AUTOSAVE_SYMBOL)? {
            cfg.autosave_eeprom = autosave;
        }
        for slot in 1..=SHEET_SLOTS {
            if let Some(name) = table.str_value(&slot_symbol(slot))? {
                cfg.sheet_names[slot - 1] = name;
            }
        }
        Ok(Some(cfg))
    }
}

#[cfg(test)]
#[path = "../tests/header/sheets_block_tests.rs"]
mod tests;
