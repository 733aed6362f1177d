//! Line-level rewriting of firmware configuration files.

use anyhow::{Context, Result};
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

mod tree;

pub use self::tree::{PatchReport, SectionReport, apply_sections};

/// Files inside the firmware checkout that recipes may rewrite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigFile {
    PlatformioIni,
    ConfigurationH,
    ConfigurationAdvH,
}

impl ConfigFile {
    /// Path relative to the root of the firmware checkout.
    pub fn relative_path(self) -> &'static str {
        match self {
            ConfigFile::PlatformioIni => "platformio.ini",
            ConfigFile::ConfigurationH => "Marlin/Configuration.h",
            ConfigFile::ConfigurationAdvH => "Marlin/Configuration_adv.h",
        }
    }

    pub fn comment_symbol(self) -> &'static str {
        match self {
            ConfigFile::PlatformioIni => "#",
            ConfigFile::ConfigurationH | ConfigFile::ConfigurationAdvH => "//",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRule {
    pub file: ConfigFile,
    /// Regular expression matched against each line, without its terminator.
    pub pattern: String,
    /// Literal text substituted for every match.
    pub replacement: String,
}

/// Result of a single rule over one file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub file: ConfigFile,
    pub pattern: String,
    pub matched_lines: usize,
}

impl PatchRule {
    pub fn new(file: ConfigFile, pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            file,
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    pub fn compile(&self) -> Result<Regex> {
        Regex::new(&self.pattern).with_context(|| format!("compile pattern `{}`", self.pattern))
    }

    /// Suffix appended to every rewritten line.
    pub fn tag_suffix(&self, tag: &str) -> String {
        format!(" {} [{}]", self.file.comment_symbol(), tag)
    }

    /// Rewrite `text` line by line.
    ///
    /// A line that already carries the tag suffix was rewritten by an earlier
    /// run. It is only matched (on the text before the first suffix) and
    /// kept as is, so applying a rule again leaves the text unchanged.
    pub fn apply_to_text(&self, text: &str, tag: &str) -> Result<(String, usize)> {
        let re = self.compile()?;
        let suffix = self.tag_suffix(tag);
        let replacement = format!("{}{}", self.replacement, suffix);

        let mut out = String::with_capacity(text.len() + 64);
        let mut matched = 0;
        for line in text.split_inclusive('\n') {
            let (body, terminator) = split_terminator(line);
            match body.find(suffix.as_str()) {
                Some(at) => {
                    if re.is_match(&body[..at]) {
                        matched += 1;
                    }
                    out.push_str(body);
                }
                None if re.is_match(body) => {
                    matched += 1;
                    out.push_str(&re.replace_all(body, NoExpand(&replacement)));
                }
                None => out.push_str(body),
            }
            out.push_str(terminator);
        }
        log::debug!(
            "{}: `{}` matched {} line(s)",
            self.file.relative_path(),
            self.pattern,
            matched
        );
        Ok((out, matched))
    }
}

fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Append an extra configuration header to a base one.
pub fn merge_config(base: &str, extra: &str) -> String {
    let mut merged = String::with_capacity(base.len() + extra.len() + 2);
    merged.push_str(base);
    merged.push_str("\n\n");
    merged.push_str(extra);
    merged
}

#[cfg(test)]
#[path = "tests/patch/rule_tests.rs"]
mod tests;
