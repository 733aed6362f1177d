//! End-to-end firmware build: toolchain, sources, configuration, compile.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use time::format_description::well_known::Rfc3339;

use crate::header::{DefineTable, defines_sheet_symbols, render_sheets_block};
use crate::model::{BuildRecord, ForgeConfig};
use crate::patch::{ConfigFile, PatchReport, apply_sections, merge_config};
use crate::recipe::{RecipeContext, build_date_today, recipe_for};
use crate::store::write_atomic;
use crate::workspace::{Layout, Workspace, validate_config_sheets};

/// One external program call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, args: &[&str], cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.to_path_buf(),
        }
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs the external tools a build needs (python, git, PlatformIO).
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Spawns real processes and fails on a non-zero exit status.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        log::debug!("running `{}` in {}", invocation, invocation.cwd.display());
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .status()
            .with_context(|| format!("spawn `{}`", invocation))?;
        if !status.success() {
            anyhow::bail!("`{}` failed ({})", invocation, status);
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BuildOptions {
    /// Fail when a recipe rule matches nothing.
    pub strict: bool,
}

#[derive(Clone, Debug)]
pub struct BuildOutcome {
    pub report: PatchReport,
    pub record: BuildRecord,
}

pub struct Pipeline<'a, R: CommandRunner> {
    ws: &'a Workspace,
    cfg: ForgeConfig,
    layout: Layout,
    runner: R,
}

impl<'a, R: CommandRunner> Pipeline<'a, R> {
    pub fn new(ws: &'a Workspace, runner: R) -> Result<Self> {
        let cfg = ws.store.read_config()?;
        Ok(Self {
            ws,
            cfg,
            layout: ws.layout(),
            runner,
        })
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.cfg
    }

    pub fn run(&self, opts: BuildOptions) -> Result<BuildOutcome> {
        validate_config_sheets(&self.cfg)?;

        self.create_venv().context("create python environment")?;
        self.load_codebase().context("load firmware sources")?;
        let report = self
            .apply_recipe(&build_date_today()?, opts.strict)
            .context("configure firmware")?;
        let firmware = self.build_codebase().context("build firmware")?;
        let record = self.record_build(&firmware)?;
        Ok(BuildOutcome { report, record })
    }

    pub fn create_venv(&self) -> Result<()> {
        let venv = self.layout.venv_dir();
        if venv.exists() {
            log::info!("reusing existing {}", venv.display());
            return Ok(());
        }

        log::info!("creating python environment in {}", venv.display());
        let venv_arg = venv.to_string_lossy();
        self.runner.run(&Invocation::new(
            "python3",
            &["-m", "venv", &venv_arg],
            &self.ws.root,
        ))?;
        let pip = self.layout.venv_bin("pip");
        for package in ["wheel", "platformio"] {
            self.runner.run(&Invocation::new(
                &pip,
                &["install", "-U", package, "--no-cache-dir"],
                &self.ws.root,
            ))?;
        }
        Ok(())
    }

    pub fn load_codebase(&self) -> Result<()> {
        let sources = &self.cfg.sources;
        self.clone_checkout(
            &sources.config_repo,
            &sources.config_branch,
            &self.layout.configs_dir(),
        )?;
        self.clone_checkout(
            &sources.marlin_repo,
            &sources.marlin_branch,
            &self.layout.firmware_dir(),
        )?;
        Ok(())
    }

    fn clone_checkout(&self, repo: &str, branch: &str, dest: &Path) -> Result<()> {
        if dest.exists() {
            log::info!("{} already exists, not cloning", dest.display());
            return Ok(());
        }
        log::info!("cloning {} ({}) into {}", repo, branch, dest.display());
        let dest_arg = dest.to_string_lossy();
        self.runner.run(&Invocation::new(
            "git",
            &["clone", repo, &dest_arg],
            &self.ws.root,
        ))?;
        self.runner.run(&Invocation::new(
            "git",
            &["-C", &dest_arg, "checkout", branch],
            &self.ws.root,
        ))?;
        Ok(())
    }

    /// Write `Configuration.h` and `Configuration_adv.h` into the firmware
    /// tree: stock machine config, then `Extraconfig/` additions, then (for the
    /// advanced header) the sheets block.
    pub fn merge_configs(&self) -> Result<()> {
        for (file, text) in self.merged_headers()? {
            let dest = self.layout.firmware_file(file);
            write_atomic(&dest, text.as_bytes())
                .with_context(|| format!("write {}", dest.display()))?;
        }
        Ok(())
    }

    fn merged_headers(&self) -> Result<BTreeMap<ConfigFile, String>> {
        validate_config_sheets(&self.cfg)?;

        let mut merged = BTreeMap::new();
        for file in [ConfigFile::ConfigurationH, ConfigFile::ConfigurationAdvH] {
            let name = file_name(file);
            let base_path = self.layout.base_config(&self.cfg.sources.config_base, name);
            let mut text = fs::read_to_string(&base_path)
                .with_context(|| format!("read {}", base_path.display()))?;

            let extra_path = self.layout.extra_config(name);
            let extra = if extra_path.exists() {
                let extra = fs::read_to_string(&extra_path)
                    .with_context(|| format!("read {}", extra_path.display()))?;
                text = merge_config(&text, &extra);
                log::info!("merged {} into {}", extra_path.display(), name);
                Some(extra)
            } else {
                None
            };

            if file == ConfigFile::ConfigurationAdvH
                && let Some(sheets) = &self.cfg.sheets
            {
                if let Some(extra) = &extra {
                    let table = DefineTable::parse(extra)
                        .with_context(|| format!("parse {}", extra_path.display()))?;
                    if defines_sheet_symbols(&table) {
                        anyhow::bail!(
                            "{} already defines the sheets block; remove it there, or run `firmforge sheets disable` to build with the block from that file instead",
                            extra_path.display()
                        );
                    }
                }
                text = merge_config(&text, &render_sheets_block(Some(sheets)));
                log::info!("added sheets block to {}", name);
            }

            merged.insert(file, text);
        }
        Ok(merged)
    }

    /// Merge the configuration headers and apply the recipe over the result.
    ///
    /// Merging happens in memory, so a strict run that fails leaves the
    /// checkout untouched.
    pub fn apply_recipe(&self, build_date: &str, strict: bool) -> Result<PatchReport> {
        let merged = self.merged_headers().context("merge configuration headers")?;
        let ctx = RecipeContext::from_config(&self.cfg, build_date);
        let sections = recipe_for(&self.cfg, &ctx);
        let report = apply_sections(
            &self.layout.firmware_dir(),
            merged,
            &sections,
            &self.cfg.modification_tag,
            strict,
        )
        .context("apply recipe")?;
        log::info!(
            "recipe applied: {} section(s), {} line(s) rewritten",
            report.sections.len(),
            report.total_matched()
        );
        Ok(report)
    }

    /// Compile with PlatformIO and copy the image to `Build/firmware.bin`.
    pub fn build_codebase(&self) -> Result<PathBuf> {
        let out = self.layout.build_firmware();
        if out.exists() {
            fs::remove_file(&out).with_context(|| format!("remove {}", out.display()))?;
        }
        fs::create_dir_all(self.layout.build_dir()).context("create build dir")?;

        let firmware_dir = self.layout.firmware_dir();
        let firmware_arg = firmware_dir.to_string_lossy();
        log::info!("building environment {}", self.cfg.machine.platformio_env);
        self.runner.run(&Invocation::new(
            self.layout.venv_bin("platformio"),
            &["run", "-d", &firmware_arg],
            &self.ws.root,
        ))?;

        let built = self.layout.pio_firmware(&self.cfg.machine.platformio_env);
        fs::copy(&built, &out)
            .with_context(|| format!("copy {} -> {}", built.display(), out.display()))?;
        log::info!("firmware written to {}", out.display());
        Ok(out)
    }

    pub fn record_build(&self, firmware: &Path) -> Result<BuildRecord> {
        let bytes = fs::read(firmware).with_context(|| format!("read {}", firmware.display()))?;
        let built_at = time::OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .context("format built_at")?;
        let shown = firmware.strip_prefix(&self.ws.root).unwrap_or(firmware);
        let record = BuildRecord {
            built_at,
            firmware: shown.to_string_lossy().to_string(),
            blake3: blake3::hash(&bytes).to_hex().to_string(),
            bytes: bytes.len() as u64,
        };
        self.ws.store.set_last_build(record.clone())?;
        Ok(record)
    }
}

fn file_name(file: ConfigFile) -> &'static str {
    let path = file.relative_path();
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
