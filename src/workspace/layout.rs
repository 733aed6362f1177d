use std::path::{Path, PathBuf};

use crate::patch::ConfigFile;

const VENV_DIR: &str = "PlatformIO";
const FIRMWARE_DIR: &str = "Marlin";
const CONFIGS_DIR: &str = "Configurations";
const EXTRA_CONFIG_DIR: &str = "Extraconfig";
const BUILD_DIR: &str = "Build";

/// Where each piece of a firmware build lives under the workspace root.
#[derive(Clone, Debug)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn venv_dir(&self) -> PathBuf {
        self.root.join(VENV_DIR)
    }

    pub fn venv_bin(&self, program: &str) -> PathBuf {
        self.venv_dir().join("bin").join(program)
    }

    pub fn firmware_dir(&self) -> PathBuf {
        self.root.join(FIRMWARE_DIR)
    }

    pub fn configs_dir(&self) -> PathBuf {
        self.root.join(CONFIGS_DIR)
    }

    pub fn extra_config_dir(&self) -> PathBuf {
        self.root.join(EXTRA_CONFIG_DIR)
    }

    /// Stock configuration header for the chosen machine, e.g.
    /// `Configurations/config/examples/<base>/Configuration.h`.
    pub fn base_config(&self, config_base: &str, file_name: &str) -> PathBuf {
        self.configs_dir()
            .join("config/examples")
            .join(config_base)
            .join(file_name)
    }

    pub fn extra_config(&self, file_name: &str) -> PathBuf {
        self.extra_config_dir().join(file_name)
    }

    pub fn firmware_file(&self, file: ConfigFile) -> PathBuf {
        self.firmware_dir().join(file.relative_path())
    }

    /// Artifact PlatformIO leaves behind for an environment.
    pub fn pio_firmware(&self, env: &str) -> PathBuf {
        self.firmware_dir()
            .join(".pio/build")
            .join(env)
            .join("firmware.bin")
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    pub fn build_firmware(&self) -> PathBuf {
        self.build_dir().join("firmware.bin")
    }
}
