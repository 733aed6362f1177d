use super::*;

use crate::header::DefineTable;

impl Workspace {
    pub fn sheets(&self) -> Result<Option<SheetsConfig>> {
        Ok(self.store.read_config()?.sheets)
    }

    /// Turn the sheets feature on, starting from the firmware defaults if it
    /// was off.
    pub fn enable_sheets(&self) -> Result<SheetsConfig> {
        let mut cfg = self.store.read_config()?;
        let sheets = cfg.sheets.get_or_insert_with(SheetsConfig::default).clone();
        self.store.write_config(&cfg)?;
        Ok(sheets)
    }

    pub fn disable_sheets(&self) -> Result<()> {
        let mut cfg = self.store.read_config()?;
        cfg.sheets = None;
        self.store.write_config(&cfg)
    }

    pub fn set_sheet_name(&self, slot: usize, name: &str) -> Result<()> {
        self.update_sheets(|sheets, display_width| {
            sheets
                .set_name(slot, name, display_width)
                .context("invalid sheet name")
        })
    }

    pub fn set_sheet_flags(
        &self,
        show_on_status_screen: Option<bool>,
        autosave_eeprom: Option<bool>,
    ) -> Result<SheetsConfig> {
        let mut updated = None;
        self.update_sheets(|sheets, _| {
            if let Some(show) = show_on_status_screen {
                sheets.show_on_status_screen = show;
            }
            if let Some(autosave) = autosave_eeprom {
                sheets.autosave_eeprom = autosave;
            }
            updated = Some(sheets.clone());
            Ok(())
        })?;
        updated.context("sheets not updated")
    }

    /// Check every slot against the configured display width.
    pub fn validate_sheets(&self) -> Result<()> {
        let cfg = self.store.read_config()?;
        validate_config_sheets(&cfg)
    }

    /// Replace the stored sheets with whatever a configuration header defines.
    pub fn import_sheets(&self, header: &Path) -> Result<Option<SheetsConfig>> {
        let text = fs::read_to_string(header)
            .with_context(|| format!("read {}", header.display()))?;
        let table =
            DefineTable::parse(&text).with_context(|| format!("parse {}", header.display()))?;
        let sheets = SheetsConfig::from_defines(&table)
            .with_context(|| format!("decode sheets from {}", header.display()))?;

        let mut cfg = self.store.read_config()?;
        cfg.sheets = sheets.clone();
        validate_config_sheets(&cfg)?;
        self.store.write_config(&cfg)?;
        log::info!(
            "imported sheets from {} ({})",
            header.display(),
            if sheets.is_some() { "enabled" } else { "disabled" }
        );
        Ok(sheets)
    }

    fn update_sheets(
        &self,
        f: impl FnOnce(&mut SheetsConfig, usize) -> Result<()>,
    ) -> Result<()> {
        let mut cfg = self.store.read_config()?;
        let display_width = cfg.display_width;
        let sheets = cfg
            .sheets
            .as_mut()
            .context("sheets feature is disabled (run `firmforge sheets enable`)")?;
        f(sheets, display_width)?;
        self.store.write_config(&cfg)
    }
}

pub(crate) fn validate_config_sheets(cfg: &ForgeConfig) -> Result<()> {
    let Some(sheets) = &cfg.sheets else {
        return Ok(());
    };
    let errors = sheets.validation_errors(cfg.display_width);
    if errors.is_empty() {
        return Ok(());
    }
    let lines: Vec<String> = errors.iter().map(|e| format!("- {}", e)).collect();
    anyhow::bail!("invalid sheets configuration:\n{}", lines.join("\n"))
}

#[cfg(test)]
#[path = "../tests/workspace/sheets_ops_tests.rs"]
mod tests;
