mod config;
mod sheets;

pub use self::config::{BuildRecord, BuildState, ForgeConfig, MachineConfig, SourcesConfig};
pub use self::sheets::{
    ConfigValidationError, DEFAULT_DISPLAY_WIDTH, DEFAULT_SHEET_NAMES, SHEET_SLOTS, SheetsConfig,
};
