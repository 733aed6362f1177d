use anyhow::{Context, Result};

use firmforge::header::render_sheets_block;
use firmforge::model::SheetsConfig;
use firmforge::patch::PatchReport;
use firmforge::pipeline::{BuildOptions, Pipeline, SystemRunner};
use firmforge::recipe::{RecipeContext, build_date_today, recipe_for};
use firmforge::workspace::Workspace;

use crate::SheetsCommands;

pub(super) fn handle_sheets_command(ws: &Workspace, command: SheetsCommands) -> Result<()> {
    match command {
        SheetsCommands::Show { json } => {
            let sheets = ws.sheets()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&sheets).context("serialize sheets json")?
                );
            } else if let Some(sheets) = sheets {
                print_sheets(&sheets);
            } else {
                println!("sheets: disabled");
            }
        }
        SheetsCommands::Enable => {
            let sheets = ws.enable_sheets()?;
            print_sheets(&sheets);
        }
        SheetsCommands::Disable => {
            ws.disable_sheets()?;
            println!("sheets: disabled");
        }
        SheetsCommands::Set { slot, name } => {
            ws.set_sheet_name(slot, &name)?;
            println!("sheet {}: {}", slot, name);
        }
        SheetsCommands::Flags {
            show_on_status_screen,
            autosave_eeprom,
        } => {
            if show_on_status_screen.is_none() && autosave_eeprom.is_none() {
                anyhow::bail!("nothing to change (use --show-on-status-screen or --autosave-eeprom)");
            }
            let sheets = ws.set_sheet_flags(show_on_status_screen, autosave_eeprom)?;
            print_sheets(&sheets);
        }
        SheetsCommands::Validate => {
            ws.validate_sheets()?;
            match ws.sheets()? {
                Some(_) => println!("sheets: ok"),
                None => println!("sheets: disabled"),
            }
        }
        SheetsCommands::Render => {
            print!("{}", render_sheets_block(ws.sheets()?.as_ref()));
        }
        SheetsCommands::Import { header } => match ws.import_sheets(&header)? {
            Some(sheets) => print_sheets(&sheets),
            None => println!("sheets: disabled"),
        },
    }
    Ok(())
}

fn print_sheets(sheets: &SheetsConfig) {
    println!("sheets: enabled");
    println!("show_on_status_screen: {}", sheets.show_on_status_screen);
    println!("autosave_eeprom: {}", sheets.autosave_eeprom);
    for (idx, name) in sheets.sheet_names.iter().enumerate() {
        println!("{}: {}", idx + 1, name);
    }
}

pub(super) fn handle_recipe(ws: &Workspace, json: bool) -> Result<()> {
    let cfg = ws.store.read_config()?;
    let ctx = RecipeContext::from_config(&cfg, &build_date_today()?);
    let sections = recipe_for(&cfg, &ctx);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&sections).context("serialize recipe json")?
        );
        return Ok(());
    }

    for section in sections {
        println!("[{}]", section.name);
        for rule in section.rules {
            println!(
                "  {}: {} -> {}",
                rule.file.relative_path(),
                rule.pattern,
                rule.replacement.trim_start_matches('\n')
            );
        }
    }
    Ok(())
}

pub(super) fn handle_patch(ws: &Workspace, strict: bool, json: bool) -> Result<()> {
    let pipeline = Pipeline::new(ws, SystemRunner)?;
    let report = pipeline.apply_recipe(&build_date_today()?, strict)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize patch report json")?
        );
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &PatchReport) {
    for section in &report.sections {
        let matched = section.rules.iter().filter(|r| r.matched_lines > 0).count();
        println!("{}: {}/{} rules applied", section.name, matched, section.rules.len());
    }
    for (section, rule) in report.unmatched() {
        println!(
            "unmatched: [{}] {} in {}",
            section,
            rule.pattern,
            rule.file.relative_path()
        );
    }
}

pub(super) fn handle_build(ws: &Workspace, strict: bool) -> Result<()> {
    let pipeline = Pipeline::new(ws, SystemRunner)?;
    let outcome = pipeline.run(BuildOptions { strict })?;
    print_report(&outcome.report);
    println!(
        "built {} for {} ({} bytes, blake3 {})",
        outcome.record.firmware,
        pipeline.config().machine.platformio_env,
        outcome.record.bytes,
        outcome.record.blake3
    );
    Ok(())
}

pub(super) fn handle_status(ws: &Workspace, json: bool) -> Result<()> {
    let state = ws.store.read_state()?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&state.last_build).context("serialize status json")?
        );
        return Ok(());
    }
    match state.last_build {
        Some(record) => {
            println!("firmware: {}", record.firmware);
            println!("built_at: {}", record.built_at);
            println!("bytes: {}", record.bytes);
            println!("blake3: {}", record.blake3);
        }
        None => println!("No build yet"),
    }
    Ok(())
}
