//! The built-in set of configuration tweaks applied on top of the stock
//! MK3S / BTT002 configuration.

use serde::Serialize;

use crate::model::ForgeConfig;
use crate::patch::ConfigFile::{
    ConfigurationAdvH as ADV, ConfigurationH as CFG, PlatformioIni as INI,
};
use crate::patch::{ConfigFile, PatchRule};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PatchSection {
    pub name: String,
    pub rules: Vec<PatchRule>,
}

/// Values substituted into the recipe at build time.
#[derive(Clone, Debug)]
pub struct RecipeContext {
    pub platformio_env: String,
    pub author: String,
    pub machine_name: String,
    /// `YYYY-MM-DD`
    pub build_date: String,
}

impl RecipeContext {
    pub fn from_config(cfg: &ForgeConfig, build_date: &str) -> Self {
        Self {
            platformio_env: cfg.machine.platformio_env.clone(),
            author: cfg.machine.author.clone(),
            machine_name: cfg.machine.machine_name.clone(),
            build_date: build_date.to_string(),
        }
    }
}

/// Today's date (UTC) in the form the firmware's version string expects.
pub fn build_date_today() -> anyhow::Result<String> {
    let fmt = time::macros::format_description!("[year]-[month]-[day]");
    let date = time::OffsetDateTime::now_utc().format(&fmt)?;
    Ok(date)
}

/// Every section for a workspace, built-in first, then the user's rules.
pub fn recipe_for(cfg: &ForgeConfig, ctx: &RecipeContext) -> Vec<PatchSection> {
    let mut sections = default_recipe(ctx);
    if !cfg.extra_patches.is_empty() {
        sections.push(PatchSection {
            name: "custom".to_string(),
            rules: cfg.extra_patches.clone(),
        });
    }
    sections
}

pub fn default_recipe(ctx: &RecipeContext) -> Vec<PatchSection> {
    vec![
        section("environment", environment(ctx)),
        section("info", info(ctx)),
        section("safety", safety()),
        section("homing", homing()),
        section("probing", probing()),
        section("features", features()),
        section("lcd", lcd()),
        section("convenience", convenience()),
        section("hardware", hardware()),
    ]
}

fn section(name: &str, rules: Vec<PatchRule>) -> PatchSection {
    PatchSection {
        name: name.to_string(),
        rules,
    }
}

fn rule(file: ConfigFile, pattern: &str, replacement: &str) -> PatchRule {
    PatchRule::new(file, pattern, replacement)
}

fn environment(ctx: &RecipeContext) -> Vec<PatchRule> {
    vec![rule(
        INI,
        r"default_envs = .*",
        &format!("default_envs = {}", ctx.platformio_env),
    )]
}

fn info(ctx: &RecipeContext) -> Vec<PatchRule> {
    vec![
        rule(
            CFG,
            r"#define STRING_CONFIG_H_AUTHOR .*",
            &format!("#define STRING_CONFIG_H_AUTHOR \"{}\"", ctx.author),
        ),
        rule(
            CFG,
            r".*#define CUSTOM_VERSION_FILE.*",
            &format!("\n#define STRING_DISTRIBUTION_DATE \"{}\"", ctx.build_date),
        ),
        rule(
            CFG,
            r".*#define CUSTOM_MACHINE_NAME .*",
            &format!("#define CUSTOM_MACHINE_NAME \"{}\"", ctx.machine_name),
        ),
    ]
}

fn safety() -> Vec<PatchRule> {
    vec![
        // max temperatures
        rule(CFG, r"#define HEATER_0_MAXTEMP.*", "#define HEATER_0_MAXTEMP 275"),
        rule(CFG, r"#define BED_MAXTEMP.*", "#define BED_MAXTEMP      100"),
        // temperature window and hysteresis
        rule(
            CFG,
            r"#define TEMP_WINDOW.*",
            "#define TEMP_WINDOW              3  // (°C) Temperature proximity for the \"temperature reached\" timer",
        ),
        rule(
            CFG,
            r"#define TEMP_HYSTERESIS.*",
            "#define TEMP_HYSTERESIS          8  // (°C) Temperature proximity considered \"close enough\" to the target",
        ),
        rule(
            CFG,
            r"#define TEMP_BED_WINDOW.*",
            "#define TEMP_BED_WINDOW          3  // (°C) Temperature proximity for the \"temperature reached\" timer",
        ),
        rule(
            CFG,
            r"#define TEMP_BED_HYSTERESIS.*",
            "#define TEMP_BED_HYSTERESIS      8  // (°C) Temperature proximity considered \"close enough\" to the target",
        ),
        // idle timeout
        rule(ADV, r"//#define HOTEND_IDLE_TIMEOUT.*", "#define HOTEND_IDLE_TIMEOUT"),
        rule(
            ADV,
            r".*#define HOTEND_IDLE_TIMEOUT_SEC .*",
            "  #define HOTEND_IDLE_TIMEOUT_SEC (15*60)    // (seconds) Time without extruder movement to trigger protection",
        ),
        rule(CFG, r"#define Z_MIN_POS.*", "#define Z_MIN_POS 0.15"),
        rule(ADV, r".*#define EXPECTED_PRINTER_CHECK", "#define EXPECTED_PRINTER_CHECK"),
        // homing rules
        rule(
            CFG,
            r".*#define NO_MOTION_BEFORE_HOMING.*",
            "#define NO_MOTION_BEFORE_HOMING // Inhibit movement until all axes have been homed. Also enable HOME_AFTER_DEACTIVATE for extra safety.",
        ),
        rule(
            CFG,
            r".*#define HOME_AFTER_DEACTIVATE.*",
            "#define HOME_AFTER_DEACTIVATE   // Require rehoming after steppers are deactivated. Also enable NO_MOTION_BEFORE_HOMING for extra safety.",
        ),
    ]
}

fn homing() -> Vec<PatchRule> {
    vec![
        rule(CFG, r"#define MANUAL_Y_HOME_POS.*", "#define MANUAL_Y_HOME_POS -7"),
        rule(
            CFG,
            r"#define HOMING_FEEDRATE_MM_M.*",
            "#define HOMING_FEEDRATE_MM_M { (40*60), (30*60), (8*60) }",
        ),
        rule(
            CFG,
            r".*#define Z_AFTER_HOMING.*",
            "#define Z_AFTER_HOMING  40      // (mm) Height to move to after homing Z",
        ),
        rule(
            ADV,
            r".#define IMPROVE_HOMING_RELIABILITY",
            "  #define IMPROVE_HOMING_RELIABILITY",
        ),
    ]
}

fn probing() -> Vec<PatchRule> {
    vec![
        rule(
            CFG,
            r".*#define AUTO_BED_LEVELING_BILINEAR",
            "#define AUTO_BED_LEVELING_BILINEAR",
        ),
        rule(CFG, r"#define PROBING_MARGIN.*", "#define PROBING_MARGIN 30"),
        rule(CFG, r".*#define GRID_MAX_POINTS_X.*", "  #define GRID_MAX_POINTS_X 3"),
        rule(CFG, r"#define MULTIPLE_PROBING.*", "#define MULTIPLE_PROBING 2"),
        rule(CFG, r".*#define EXTRA_PROBING.*", "#define EXTRA_PROBING    1"),
        rule(
            CFG,
            r"#define XY_PROBE_FEEDRATE.*",
            "#define XY_PROBE_FEEDRATE (133*60)",
        ),
        rule(
            CFG,
            r".*#define Z_AFTER_PROBING.*",
            "#define Z_AFTER_PROBING            20 // Z position after probing is done",
        ),
    ]
}

fn features() -> Vec<PatchRule> {
    vec![
        rule(
            ADV,
            r".*#define ARC_SUPPORT .*",
            "//#define ARC_SUPPORT                 // Disable this feature to save ~3226 bytes",
        ),
        rule(CFG, r".*#define S_CURVE_ACCELERATION.*", "//#define S_CURVE_ACCELERATION"),
        rule(
            ADV,
            r".*#define EXPERIMENTAL_SCURVE.*",
            "  //#define EXPERIMENTAL_SCURVE   // Enable this option to permit S-Curve Acceleration",
        ),
        rule(ADV, r".*#define POWER_LOSS_RECOVERY.*", "  //#define POWER_LOSS_RECOVERY"),
        // nozzle parking
        rule(CFG, r".*#define NOZZLE_PARK_FEATURE", "#define NOZZLE_PARK_FEATURE"),
        rule(
            CFG,
            r".*#define NOZZLE_PARK_POINT.*",
            "  #define NOZZLE_PARK_POINT { 10, 200, 50 }",
        ),
        rule(
            CFG,
            r".*#define NOZZLE_PARK_Z_FEEDRATE.*",
            "  #define NOZZLE_PARK_Z_FEEDRATE   10   // (mm/s) Z axis feedrate (not used for delta printers)",
        ),
        rule(
            ADV,
            r".*#define EVENT_GCODE_SD_ABORT.*",
            "  #define EVENT_GCODE_SD_ABORT \"G27 P2\"",
        ),
        // host actions (OctoPrint)
        rule(ADV, r".*#define HOST_ACTION_COMMANDS", "#define HOST_ACTION_COMMANDS"),
        rule(ADV, r".*#define HOST_PROMPT_SUPPORT", "  #define HOST_PROMPT_SUPPORT"),
        // filament change
        rule(
            ADV,
            r".*#define FILAMENT_CHANGE_FAST_LOAD_LENGTH.*",
            "  #define FILAMENT_CHANGE_FAST_LOAD_LENGTH    45 // (mm) Load length of filament, from extruder gear to nozzle.",
        ),
        rule(
            ADV,
            r".*#define ADVANCED_PAUSE_PURGE_LENGTH.*",
            "  #define ADVANCED_PAUSE_PURGE_LENGTH         40  // (mm) Length to extrude after loading",
        ),
    ]
}

fn lcd() -> Vec<PatchRule> {
    vec![
        rule(
            ADV,
            r".*#define BOOTSCREEN_TIMEOUT.*",
            "    #define BOOTSCREEN_TIMEOUT 4000      // (ms) Total Duration to display the boot screen(s)",
        ),
        rule(CFG, r"#define LCD_INFO_SCREEN_STYLE.*", "#define LCD_INFO_SCREEN_STYLE 0"),
        // babystepping
        rule(
            ADV,
            r".*#define BABYSTEP_MULTIPLICATOR_Z .*",
            "  #define BABYSTEP_MULTIPLICATOR_Z  3       // (steps or mm) Steps or millimeter distance for each Z babystep",
        ),
        rule(
            ADV,
            r".*#define BABYSTEP_MULTIPLICATOR_XY .*",
            "  #define BABYSTEP_MULTIPLICATOR_XY 5       // (steps or mm) Steps or millimeter distance for each XY babystep",
        ),
        // print progress
        rule(
            ADV,
            r".*#define SHOW_REMAINING_TIME",
            "  #define SHOW_REMAINING_TIME       // Display estimated time to completion",
        ),
        rule(
            ADV,
            r".*#define ROTATE_PROGRESS_DISPLAY .*",
            "    #define ROTATE_PROGRESS_DISPLAY    // Display (P)rogress, (E)lapsed, and (R)emaining time",
        ),
        rule(
            ADV,
            r".*#define USE_M73_REMAINING_TIME.*",
            "    #define USE_M73_REMAINING_TIME  // Use remaining time from M73 command instead of estimation",
        ),
        rule(
            ADV,
            r".*#define LCD_SET_PROGRESS_MANUALLY",
            "  #define LCD_SET_PROGRESS_MANUALLY",
        ),
        rule(
            ADV,
            r"^    //#define LCD_PROGRESS_BAR.*",
            "    #define LCD_PROGRESS_BAR            // Show a progress bar on HD44780 LCDs for SD printing",
        ),
    ]
}

fn convenience() -> Vec<PatchRule> {
    vec![
        rule(
            ADV,
            r".*#define BROWSE_MEDIA_ON_INSERT.*",
            "  #define BROWSE_MEDIA_ON_INSERT          // Open the file browser when media is inserted",
        ),
        rule(
            ADV,
            r".*#define SDSORT_GCODE.*",
            "    #define SDSORT_GCODE       true  // Allow turning sorting on/off with LCD and M34 G-code.",
        ),
    ]
}

fn hardware() -> Vec<PatchRule> {
    vec![
        // no temperature sensor on the SuperPINDA probe
        rule(CFG, r"#define TEMP_SENSOR_PROBE.*", "#define TEMP_SENSOR_PROBE 0"),
        // sensorless homing
        rule(
            ADV,
            r".*#define X_STALL_SENSITIVITY.*",
            "    #define X_STALL_SENSITIVITY  90",
        ),
        rule(
            ADV,
            r".*#define Y_STALL_SENSITIVITY.*",
            "    #define Y_STALL_SENSITIVITY  95",
        ),
        rule(ADV, r".*#define ADAPTIVE_STEP_SMOOTHING.*", "#define ADAPTIVE_STEP_SMOOTHING"),
        rule(ADV, r".*#define SQUARE_WAVE_STEPPING.*", "  #define SQUARE_WAVE_STEPPING"),
        rule(ADV, r"#define FAN_KICKSTART_TIME .*", "#define FAN_KICKSTART_TIME 800"),
        rule(
            CFG,
            r".*#define EEPROM_AUTO_INIT.*",
            "  //#define EEPROM_AUTO_INIT  // Init EEPROM automatically on any errors.",
        ),
        rule(ADV, r".*#define TMC_DEBUG", "#define TMC_DEBUG"),
    ]
}

#[cfg(test)]
#[path = "tests/recipe_tests.rs"]
mod tests;
