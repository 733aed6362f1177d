use serde::{Deserialize, Serialize};

use crate::patch::PatchRule;

use super::sheets::{DEFAULT_DISPLAY_WIDTH, SheetsConfig};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForgeConfig {
    pub version: u32,

    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub machine: MachineConfig,

    /// Marker appended (as a comment) to every line the recipe rewrites.
    #[serde(default = "default_modification_tag")]
    pub modification_tag: String,

    /// Maximum sheet name length the display can render.
    #[serde(default = "default_display_width")]
    pub display_width: usize,

    /// `None` compiles the sheets feature out entirely.
    #[serde(default)]
    pub sheets: Option<SheetsConfig>,

    /// User rules applied after the built-in recipe.
    #[serde(default)]
    pub extra_patches: Vec<PatchRule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub marlin_repo: String,
    pub marlin_branch: String,
    pub config_repo: String,
    pub config_branch: String,
    /// Directory under `config/examples/` in the configurations repo.
    pub config_base: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    pub platformio_env: String,
    pub author: String,
    pub machine_name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BuildState {
    pub version: u32,

    #[serde(default)]
    pub last_build: Option<BuildRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub built_at: String,
    pub firmware: String,
    pub blake3: String,
    pub bytes: u64,
}

fn default_modification_tag() -> String {
    "MYMOD".to_string()
}

fn default_display_width() -> usize {
    DEFAULT_DISPLAY_WIDTH
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            sources: SourcesConfig::default(),
            machine: MachineConfig::default(),
            modification_tag: default_modification_tag(),
            display_width: default_display_width(),
            sheets: Some(SheetsConfig::default()),
            extra_patches: Vec::new(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            marlin_repo: "https://github.com/rtheuns/Marlin".to_string(),
            marlin_branch: "2.0.8-custom-prusa".to_string(),
            config_repo: "https://github.com/Marlinfirmware/Configurations".to_string(),
            config_branch: "release-2.0.8".to_string(),
            config_base: "Prusa/MK3S-BigTreeTech-BTT002".to_string(),
        }
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            platformio_env: "BIGTREE_BTT002".to_string(),
            author: "Prusa Research".to_string(),
            machine_name: "Prusa MK3S+".to_string(),
        }
    }
}
