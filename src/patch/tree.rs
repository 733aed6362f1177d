use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::recipe::PatchSection;
use crate::store::write_atomic;

use super::{ConfigFile, RuleOutcome};

#[derive(Clone, Debug, Default, Serialize)]
pub struct PatchReport {
    pub sections: Vec<SectionReport>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SectionReport {
    pub name: String,
    pub rules: Vec<RuleOutcome>,
}

impl PatchReport {
    pub fn unmatched(&self) -> impl Iterator<Item = (&str, &RuleOutcome)> {
        self.sections.iter().flat_map(|s| {
            s.rules
                .iter()
                .filter(|r| r.matched_lines == 0)
                .map(move |r| (s.name.as_str(), r))
        })
    }

    pub fn total_matched(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| s.rules.iter())
            .map(|r| r.matched_lines)
            .sum()
    }
}

/// Apply recipe sections to the configuration files of a firmware checkout.
///
/// `staged` holds file contents that replace what is on disk (freshly merged
/// headers); they are always written. Other files are read once, rewritten by
/// their rules in recipe order and written back only if their content
/// changed. With `strict`, any rule that matches nothing fails the whole run
/// before a file is touched.
pub fn apply_sections(
    firmware_dir: &Path,
    staged: BTreeMap<ConfigFile, String>,
    sections: &[PatchSection],
    tag: &str,
    strict: bool,
) -> Result<PatchReport> {
    let mut originals: BTreeMap<ConfigFile, String> = BTreeMap::new();
    let mut texts = staged;
    let mut report = PatchReport::default();

    for section in sections {
        let mut rules = Vec::with_capacity(section.rules.len());
        for rule in &section.rules {
            if !texts.contains_key(&rule.file) {
                let path = firmware_dir.join(rule.file.relative_path());
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("read {}", path.display()))?;
                originals.insert(rule.file, text.clone());
                texts.insert(rule.file, text);
            }
            let Some(text) = texts.get_mut(&rule.file) else {
                continue;
            };

            let (patched, matched_lines) = rule
                .apply_to_text(text, tag)
                .with_context(|| format!("apply {} rule", section.name))?;
            *text = patched;
            rules.push(RuleOutcome {
                file: rule.file,
                pattern: rule.pattern.clone(),
                matched_lines,
            });
        }
        report.sections.push(SectionReport {
            name: section.name.clone(),
            rules,
        });
    }

    let unmatched: Vec<String> = report
        .unmatched()
        .map(|(section, r)| format!("{}: `{}` in {}", section, r.pattern, r.file.relative_path()))
        .collect();
    if strict && !unmatched.is_empty() {
        anyhow::bail!(
            "{} rule(s) matched nothing:\n{}",
            unmatched.len(),
            unmatched.join("\n")
        );
    }
    for line in &unmatched {
        log::warn!("rule matched nothing ({})", line);
    }

    for (file, text) in &texts {
        if originals.get(file) == Some(text) {
            continue;
        }
        let path = firmware_dir.join(file.relative_path());
        write_atomic(&path, text.as_bytes())
            .with_context(|| format!("write {}", path.display()))?;
        log::info!("patched {}", file.relative_path());
    }

    Ok(report)
}

#[cfg(test)]
#[path = "../tests/patch/tree_tests.rs"]
mod tests;
