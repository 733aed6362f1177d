use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::model::{ForgeConfig, SheetsConfig};
use crate::store::LocalStore;

mod layout;
mod root_lifecycle;
mod sheets_ops;

pub use self::layout::Layout;
pub(crate) use self::sheets_ops::validate_config_sheets;

#[derive(Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub store: LocalStore,
}

impl Workspace {
    pub fn layout(&self) -> Layout {
        Layout::new(&self.root)
    }
}
