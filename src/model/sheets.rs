use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of sheet profile slots the firmware reserves.
pub const SHEET_SLOTS: usize = 8;

/// Longest sheet name the printer's status line can show.
pub const DEFAULT_DISPLAY_WIDTH: usize = 7;

pub const DEFAULT_SHEET_NAMES: [&str; SHEET_SLOTS] = [
    "PEI1", "PEI2", "Text1", "Sheet4", "Sheet5", "Sheet6", "Sheet7", "Sheet8",
];

/// Named build plates compiled into the firmware when the sheets feature is on.
///
/// A disabled feature is represented by the absence of this value
/// (`Option<SheetsConfig>`), never by a zeroed instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetsConfig {
    #[serde(default = "default_true")]
    pub show_on_status_screen: bool,

    #[serde(default = "default_true")]
    pub autosave_eeprom: bool,

    #[serde(default = "default_sheet_names")]
    pub sheet_names: [String; SHEET_SLOTS],
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("sheet {slot}: name is {len} characters, display fits {max}")]
    NameTooLong { slot: usize, len: usize, max: usize },

    #[error("sheet {slot}: name is empty")]
    EmptyName { slot: usize },

    #[error("sheet {slot}: character {ch:?} cannot be shown on the display")]
    InvalidCharacter { slot: usize, ch: char },

    #[error("sheet slot {slot} out of range (slots: 1..={max})")]
    SlotOutOfRange { slot: usize, max: usize },
}

fn default_true() -> bool {
    true
}

fn default_sheet_names() -> [String; SHEET_SLOTS] {
    DEFAULT_SHEET_NAMES.map(str::to_string)
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            show_on_status_screen: true,
            autosave_eeprom: true,
            sheet_names: default_sheet_names(),
        }
    }
}

impl SheetsConfig {
    /// Name of a 1-based slot.
    pub fn name(&self, slot: usize) -> Result<&str, ConfigValidationError> {
        let idx = slot_index(slot)?;
        Ok(&self.sheet_names[idx])
    }

    /// Replace the name of a 1-based slot. The name is checked against
    /// `display_width` before it is stored.
    pub fn set_name(
        &mut self,
        slot: usize,
        name: &str,
        display_width: usize,
    ) -> Result<(), ConfigValidationError> {
        let idx = slot_index(slot)?;
        validate_name(slot, name, display_width)?;
        self.sheet_names[idx] = name.to_string();
        Ok(())
    }

    pub fn validate(&self, display_width: usize) -> Result<(), ConfigValidationError> {
        for (idx, name) in self.sheet_names.iter().enumerate() {
            validate_name(idx + 1, name, display_width)?;
        }
        Ok(())
    }

    /// All problems at once, for reporting.
    pub fn validation_errors(&self, display_width: usize) -> Vec<ConfigValidationError> {
        self.sheet_names
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| validate_name(idx + 1, name, display_width).err())
            .collect()
    }
}

fn slot_index(slot: usize) -> Result<usize, ConfigValidationError> {
    if slot == 0 || slot > SHEET_SLOTS {
        return Err(ConfigValidationError::SlotOutOfRange {
            slot,
            max: SHEET_SLOTS,
        });
    }
    Ok(slot - 1)
}

fn validate_name(slot: usize, name: &str, max: usize) -> Result<(), ConfigValidationError> {
    if name.is_empty() {
        return Err(ConfigValidationError::EmptyName { slot });
    }
    if let Some(ch) = name
        .chars()
        .find(|c| !c.is_ascii() || c.is_ascii_control() || *c == '"' || *c == '\\')
    {
        return Err(ConfigValidationError::InvalidCharacter { slot, ch });
    }
    let len = name.chars().count();
    if len > max {
        return Err(ConfigValidationError::NameTooLong { slot, len, max });
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/model/sheets_tests.rs"]
mod tests;
