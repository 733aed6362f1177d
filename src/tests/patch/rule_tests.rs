    use super::*;

    const CONFIG_H: &str = "\
#define HEATER_0_MAXTEMP 275
#define BED_MAXTEMP      120
//#define NOZZLE_PARK_FEATURE
  #define NOZZLE_PARK_POINT { (X_MIN_POS + 10), (Y_MAX_POS - 10), 20 }
";

    #[test]
    fn rewrites_matching_lines_and_appends_tag() -> Result<()> {
        let rule = PatchRule::new(
            ConfigFile::ConfigurationH,
            r"#define BED_MAXTEMP.*",
            "#define BED_MAXTEMP      100",
        );
        let (out, matched) = rule.apply_to_text(CONFIG_H, "MYMOD")?;
        assert_eq!(matched, 1);
        assert!(out.contains("#define BED_MAXTEMP      100 // [MYMOD]\n"));
        assert!(out.contains("#define HEATER_0_MAXTEMP 275\n"));
        assert_eq!(out.lines().count(), CONFIG_H.lines().count());
        Ok(())
    }

    #[test]
    fn ini_files_use_hash_comments() -> Result<()> {
        let rule = PatchRule::new(
            ConfigFile::PlatformioIni,
            r"default_envs = .*",
            "default_envs = BIGTREE_BTT002",
        );
        let (out, matched) = rule.apply_to_text("[platformio]\ndefault_envs = mega2560\n", "MYMOD")?;
        assert_eq!(matched, 1);
        assert_eq!(out, "[platformio]\ndefault_envs = BIGTREE_BTT002 # [MYMOD]\n");
        Ok(())
    }

    #[test]
    fn reapplying_a_rule_does_not_stack_tags() -> Result<()> {
        let rule = PatchRule::new(
            ConfigFile::ConfigurationH,
            r".*#define NOZZLE_PARK_FEATURE",
            "#define NOZZLE_PARK_FEATURE",
        );
        let (once, _) = rule.apply_to_text(CONFIG_H, "MYMOD")?;
        let (twice, matched) = rule.apply_to_text(&once, "MYMOD")?;
        assert_eq!(matched, 1);
        assert_eq!(once, twice);
        assert!(twice.contains("\n#define NOZZLE_PARK_FEATURE // [MYMOD]\n"));
        Ok(())
    }

    #[test]
    fn reapplying_a_partial_line_rule_is_stable() -> Result<()> {
        let rule = PatchRule::new(
            ConfigFile::ConfigurationAdvH,
            r".*#define SHOW_REMAINING_TIME",
            "  #define SHOW_REMAINING_TIME       // Display estimated time to completion",
        );
        let text = "  //#define SHOW_REMAINING_TIME       // Display estimated time to completion\n";
        let (once, first) = rule.apply_to_text(text, "MYMOD")?;
        let (twice, second) = rule.apply_to_text(&once, "MYMOD")?;
        assert_eq!((first, second), (1, 1));
        assert_eq!(once, twice);
        assert_eq!(once.matches("[MYMOD]").count(), 1);
        assert!(once.starts_with(
            "  #define SHOW_REMAINING_TIME       // Display estimated time to completion // [MYMOD]"
        ));
        Ok(())
    }

    #[test]
    fn ini_rule_with_trailing_text_is_stable() -> Result<()> {
        let rule = PatchRule::new(ConfigFile::PlatformioIni, r"default_envs =", "default_envs = ");
        let text = "default_envs = mega2560\n";
        let (once, _) = rule.apply_to_text(text, "MYMOD")?;
        assert_eq!(once, "default_envs =  # [MYMOD] mega2560\n");
        let (twice, matched) = rule.apply_to_text(&once, "MYMOD")?;
        assert_eq!(matched, 1);
        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn replacement_is_literal() -> Result<()> {
        let rule = PatchRule::new(
            ConfigFile::ConfigurationH,
            r"(#define HEATER_0_MAXTEMP) .*",
            "$1 cost $5",
        );
        let (out, _) = rule.apply_to_text(CONFIG_H, "T")?;
        assert!(out.starts_with("$1 cost $5 // [T]\n"), "{}", out);
        Ok(())
    }

    #[test]
    fn replacement_may_insert_lines() -> Result<()> {
        let rule = PatchRule::new(
            ConfigFile::ConfigurationH,
            r".*#define CUSTOM_VERSION_FILE.*",
            "\n#define STRING_DISTRIBUTION_DATE \"2026-10-16\"",
        );
        let text = "//#define CUSTOM_VERSION_FILE Version.h // Path from the root directory (no quotes)\nrest\n";
        let (out, matched) = rule.apply_to_text(text, "MYMOD")?;
        assert_eq!(matched, 1);
        assert_eq!(
            out,
            "\n#define STRING_DISTRIBUTION_DATE \"2026-10-16\" // [MYMOD]\nrest\n"
        );
        Ok(())
    }

    #[test]
    fn line_endings_are_preserved() -> Result<()> {
        let rule = PatchRule::new(ConfigFile::ConfigurationH, r"^#define A .*$", "#define A 2");
        let (out, matched) = rule.apply_to_text("#define A 1\r\n#define B 1", "X")?;
        assert_eq!(matched, 1);
        assert_eq!(out, "#define A 2 // [X]\r\n#define B 1");
        Ok(())
    }

    #[test]
    fn unmatched_rule_leaves_text_alone() -> Result<()> {
        let rule = PatchRule::new(ConfigFile::ConfigurationH, r"#define TMC_DEBUG", "#define TMC_DEBUG");
        let (out, matched) = rule.apply_to_text(CONFIG_H, "MYMOD")?;
        assert_eq!(matched, 0);
        assert_eq!(out, CONFIG_H);
        Ok(())
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let rule = PatchRule::new(ConfigFile::ConfigurationH, r"#define (", "x");
        let err = rule.apply_to_text(CONFIG_H, "MYMOD").unwrap_err();
        assert!(err.to_string().contains("compile pattern"), "{}", err);
    }

    #[test]
    fn merge_config_separates_with_blank_line() {
        assert_eq!(merge_config("base", "extra"), "base\n\nextra");
    }

    #[test]
    fn config_file_serializes_snake_case() {
        let json = serde_json::to_string(&ConfigFile::ConfigurationAdvH).expect("serialize");
        assert_eq!(json, "\"configuration_adv_h\"");
    }
