    use super::*;

    #[test]
    fn parse_collects_defines_and_skips_comments() {
        let text = r#"
/**
 * #define INSIDE_BLOCK_COMMENT 1
 */
#define HEATER_0_MAXTEMP 275 // [MYMOD]
//#define ARC_SUPPORT
  #define EVENT_GCODE_SD_ABORT "G27 P2"   // park on abort
#define EMPTY_FLAG
/* inline */ #define AFTER_INLINE 3
"#;
        let table = DefineTable::parse(text).expect("parse header");
        assert_eq!(table.raw("HEATER_0_MAXTEMP"), Some("275"));
        assert!(!table.is_defined("ARC_SUPPORT"));
        assert!(!table.is_defined("INSIDE_BLOCK_COMMENT"));
        assert_eq!(
            table.str_value("EVENT_GCODE_SD_ABORT").expect("string"),
            Some("G27 P2".to_string())
        );
        assert!(table.is_enabled("EMPTY_FLAG"));
        assert_eq!(table.raw("AFTER_INLINE"), Some("3"));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn comment_markers_inside_strings_are_kept() {
        let table = DefineTable::parse("#define URL \"http://example.org\"\n")
            .expect("parse header");
        assert_eq!(
            table.str_value("URL").expect("string"),
            Some("http://example.org".to_string())
        );
    }

    #[test]
    fn conditionals_gate_definitions() {
        let text = "\
#define FEATURE_A
//#define FEATURE_B
#if ENABLED(FEATURE_A)
  #define A_ON 1
#endif
#if ENABLED(FEATURE_B)
  #define B_ON 1
#else
  #define B_OFF 1
#endif
#if DISABLED(FEATURE_B)
  #define B_DISABLED 1
#endif
#ifdef FEATURE_A
  #if 0
    #define NEVER 1
  #elif ANY(FEATURE_A, FEATURE_B)
    #define NESTED 1
  #endif
#endif
";
        let table = DefineTable::parse(text).expect("parse header");
        assert!(table.is_defined("A_ON"));
        assert!(!table.is_defined("B_ON"));
        assert!(table.is_defined("B_OFF"));
        assert!(table.is_defined("B_DISABLED"));
        assert!(!table.is_defined("NEVER"));
        assert!(table.is_defined("NESTED"));
    }

    #[test]
    fn inactive_parent_disables_else_branch() {
        let text = "\
#if 0
  #if ENABLED(X)
  #else
    #define HIDDEN 1
  #endif
#endif
";
        let table = DefineTable::parse(text).expect("parse header");
        assert!(!table.is_defined("HIDDEN"));
    }

    #[test]
    fn flag_defined_false_is_not_enabled() {
        let text = "#define SDSORT_GCODE false\n#undef MISSING\n";
        let table = DefineTable::parse(text).expect("parse header");
        assert!(table.is_defined("SDSORT_GCODE"));
        assert!(!table.is_enabled("SDSORT_GCODE"));
        assert_eq!(table.bool_value("SDSORT_GCODE").expect("bool"), Some(false));
    }

    #[test]
    fn undef_removes_symbol() {
        let table = DefineTable::parse("#define X 1\n#undef X\n").expect("parse header");
        assert!(!table.is_defined("X"));
    }

    #[test]
    fn function_like_macros_keep_body() {
        let table = DefineTable::parse("#define SQ(x) ((x)*(x))\n").expect("parse header");
        assert_eq!(table.raw("SQ"), Some("((x)*(x))"));
    }

    #[test]
    fn unbalanced_directives_report_line() {
        let err = DefineTable::parse("#define A\n#endif\n").unwrap_err();
        assert_eq!(
            err,
            HeaderError::UnbalancedDirective {
                line: 2,
                directive: "endif".to_string()
            }
        );

        let err = DefineTable::parse("#if 1\n#else\n#else\n#endif\n").unwrap_err();
        assert_eq!(err, HeaderError::DuplicateElse { line: 3 });

        let err = DefineTable::parse("#define A\n#if ENABLED(A)\n#define B\n").unwrap_err();
        assert_eq!(err, HeaderError::Unterminated { line: 2 });
    }

    #[test]
    fn malformed_define_is_an_error() {
        let err = DefineTable::parse("#define\n").unwrap_err();
        assert_eq!(err, HeaderError::MalformedDefine { line: 1 });
    }

    #[test]
    fn bad_values_are_reported_with_symbol_name() {
        let table = DefineTable::parse("#define FLAG maybe\n#define NAME PEI1\n")
            .expect("parse header");
        let err = table.bool_value("FLAG").unwrap_err();
        assert!(err.to_string().contains("FLAG"), "{}", err);
        assert!(table.str_value("NAME").is_err());
        assert_eq!(table.bool_value("ABSENT").expect("absent"), None);
    }

    #[test]
    fn c_string_escapes_roundtrip() {
        let encoded = encode_c_string("a\"b\\c");
        assert_eq!(encoded, r#""a\"b\\c""#);
        assert_eq!(decode_c_string(&encoded), Some("a\"b\\c".to_string()));
        assert_eq!(decode_c_string("\"unterminated\\\""), None);
        assert_eq!(decode_c_string("bare"), None);
    }
