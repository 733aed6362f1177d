    use super::*;

    fn workspace() -> Result<(tempfile::TempDir, Workspace)> {
        let tmp = tempfile::tempdir().context("create tempdir")?;
        let ws = Workspace::init(tmp.path(), false)?;
        Ok((tmp, ws))
    }

    #[test]
    fn new_workspace_has_default_sheets() -> Result<()> {
        let (_tmp, ws) = workspace()?;
        assert_eq!(ws.sheets()?, Some(SheetsConfig::default()));
        ws.validate_sheets()?;
        Ok(())
    }

    #[test]
    fn disabling_drops_every_slot_and_enabling_restores_defaults() -> Result<()> {
        let (_tmp, ws) = workspace()?;
        ws.set_sheet_name(1, "Satin")?;
        ws.disable_sheets()?;
        assert_eq!(ws.sheets()?, None);

        let err = ws.set_sheet_name(1, "PEI1").unwrap_err();
        assert!(err.to_string().contains("disabled"), "{}", err);

        let sheets = ws.enable_sheets()?;
        assert_eq!(sheets, SheetsConfig::default());
        Ok(())
    }

    #[test]
    fn enable_keeps_existing_names() -> Result<()> {
        let (_tmp, ws) = workspace()?;
        ws.set_sheet_name(5, "Smooth")?;
        let sheets = ws.enable_sheets()?;
        assert_eq!(sheets.sheet_names[4], "Smooth");
        Ok(())
    }

    #[test]
    fn rename_respects_display_width() -> Result<()> {
        let (_tmp, ws) = workspace()?;
        let err = ws.set_sheet_name(2, "Powder coated").unwrap_err();
        assert!(format!("{:#}", err).contains("display fits 7"), "{:#}", err);
        assert_eq!(ws.sheets()?.expect("enabled").sheet_names[1], "PEI2");

        let mut cfg = ws.store.read_config()?;
        cfg.display_width = 16;
        ws.store.write_config(&cfg)?;
        ws.set_sheet_name(2, "Powder coated")?;
        Ok(())
    }

    #[test]
    fn flags_update_independently() -> Result<()> {
        let (_tmp, ws) = workspace()?;
        let sheets = ws.set_sheet_flags(Some(false), None)?;
        assert!(!sheets.show_on_status_screen);
        assert!(sheets.autosave_eeprom);
        assert_eq!(ws.sheets()?, Some(sheets));
        Ok(())
    }

    #[test]
    fn validate_lists_every_bad_slot() -> Result<()> {
        let (_tmp, ws) = workspace()?;
        let mut cfg = ws.store.read_config()?;
        let sheets = cfg.sheets.as_mut().expect("enabled");
        sheets.sheet_names[0] = "Textured1".to_string();
        sheets.sheet_names[3] = String::new();
        ws.store.write_config(&cfg)?;

        let err = ws.validate_sheets().unwrap_err().to_string();
        assert!(err.contains("sheet 1:"), "{}", err);
        assert!(err.contains("sheet 4: name is empty"), "{}", err);
        Ok(())
    }

    #[test]
    fn import_reads_header_block() -> Result<()> {
        let (tmp, ws) = workspace()?;
        let header = tmp.path().join("Configuration_adv.h");
        fs::write(
            &header,
            "#define SHEETS_FEATURE\n#if ENABLED(SHEETS_FEATURE)\n  #define SHEETS_SHOW_ON_STATUS_SCREEN false\n  #define SHEETS_SHEET_3 \"Satin\"\n#endif\n",
        )
        .context("write header")?;

        let sheets = ws.import_sheets(&header)?.expect("enabled");
        assert!(!sheets.show_on_status_screen);
        assert_eq!(sheets.sheet_names[2], "Satin");
        assert_eq!(ws.sheets()?, Some(sheets));
        Ok(())
    }

    #[test]
    fn import_of_header_without_feature_disables_sheets() -> Result<()> {
        let (tmp, ws) = workspace()?;
        let header = tmp.path().join("Configuration_adv.h");
        fs::write(&header, "//#define SHEETS_FEATURE\n").context("write header")?;
        assert_eq!(ws.import_sheets(&header)?, None);
        assert_eq!(ws.sheets()?, None);
        Ok(())
    }

    #[test]
    fn import_rejects_names_the_display_cannot_show() -> Result<()> {
        let (tmp, ws) = workspace()?;
        let header = tmp.path().join("Configuration_adv.h");
        fs::write(
            &header,
            "#define SHEETS_FEATURE\n#define SHEETS_SHEET_1 \"Much too long\"\n",
        )
        .context("write header")?;
        assert!(ws.import_sheets(&header).is_err());
        assert_eq!(ws.sheets()?, Some(SheetsConfig::default()));
        Ok(())
    }
