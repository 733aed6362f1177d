    use super::*;

    #[test]
    fn default_sheets_match_firmware_literals() {
        let cfg = SheetsConfig::default();
        assert!(cfg.show_on_status_screen);
        assert!(cfg.autosave_eeprom);
        assert_eq!(cfg.sheet_names.len(), SHEET_SLOTS);
        assert_eq!(
            cfg.sheet_names,
            [
                "PEI1", "PEI2", "Text1", "Sheet4", "Sheet5", "Sheet6", "Sheet7", "Sheet8"
            ]
            .map(String::from)
        );
        cfg.validate(DEFAULT_DISPLAY_WIDTH).expect("defaults validate");
    }

    #[test]
    fn json_roundtrip_preserves_names_and_flags() {
        let mut cfg = SheetsConfig {
            show_on_status_screen: false,
            ..SheetsConfig::default()
        };
        cfg.set_name(3, "Satin", DEFAULT_DISPLAY_WIDTH)
            .expect("set name");

        let json = serde_json::to_string(&cfg).expect("serialize");
        let back: SheetsConfig = serde_json::from_str(&json).expect("parse");
        assert_eq!(cfg, back);
    }

    #[test]
    fn missing_json_fields_fall_back_to_defaults() {
        let cfg: SheetsConfig = serde_json::from_str("{}").expect("parse empty object");
        assert_eq!(cfg, SheetsConfig::default());
    }

    #[test]
    fn json_with_wrong_slot_count_is_rejected() {
        let res: Result<SheetsConfig, _> =
            serde_json::from_str(r#"{"sheet_names":["a","b","c"]}"#);
        assert!(res.is_err());
    }

    #[test]
    fn duplicate_names_are_allowed() {
        let mut cfg = SheetsConfig::default();
        cfg.set_name(2, "PEI1", DEFAULT_DISPLAY_WIDTH)
            .expect("duplicate name");
        assert_eq!(cfg.name(1).expect("slot 1"), cfg.name(2).expect("slot 2"));
    }

    #[test]
    fn name_longer_than_display_is_rejected() {
        let mut cfg = SheetsConfig::default();
        let err = cfg.set_name(4, "Textured", 7).unwrap_err();
        assert_eq!(
            err,
            ConfigValidationError::NameTooLong {
                slot: 4,
                len: 8,
                max: 7
            }
        );
        assert_eq!(cfg.name(4).expect("slot 4"), "Sheet4");
    }

    #[test]
    fn validate_reports_first_bad_slot_and_collects_all() {
        let mut cfg = SheetsConfig::default();
        cfg.sheet_names[1] = String::new();
        cfg.sheet_names[6] = "say \"hi\"".to_string();

        assert_eq!(
            cfg.validate(20).unwrap_err(),
            ConfigValidationError::EmptyName { slot: 2 }
        );

        let all = cfg.validation_errors(20);
        assert_eq!(all.len(), 2);
        assert_eq!(
            all[1],
            ConfigValidationError::InvalidCharacter { slot: 7, ch: '"' }
        );
    }

    #[test]
    fn slots_are_one_based() {
        let cfg = SheetsConfig::default();
        assert_eq!(cfg.name(1).expect("slot 1"), "PEI1");
        assert_eq!(cfg.name(8).expect("slot 8"), "Sheet8");
        assert_eq!(
            cfg.name(0).unwrap_err(),
            ConfigValidationError::SlotOutOfRange { slot: 0, max: 8 }
        );
        assert!(cfg.name(9).is_err());
    }

    #[test]
    fn non_ascii_names_are_rejected() {
        let mut cfg = SheetsConfig::default();
        let err = cfg.set_name(1, "Glätt", 7).unwrap_err();
        assert_eq!(err, ConfigValidationError::InvalidCharacter { slot: 1, ch: 'ä' });
    }
