//! Comparison options: force-text columns, tolerance profile, sampling and caps.
//!
//! Options are an explicit value handed to every comparison call. They can be
//! loaded from a YAML file where every field is optional; command-line flags
//! are layered on top by the caller.

use std::{collections::BTreeSet, fmt, fs::File, io::BufReader, num::NonZeroUsize, path::Path};

use anyhow::{Context, Result, ensure};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FORCE_TEXT_COLUMNS: &[&str] = &["UW_Year", "Loss_Period"];
pub const DEFAULT_SAMPLE_ROWS: usize = 100;
pub const DEFAULT_MAX_TEXT_DIFFERENCES: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(cap) => cap,
    None => NonZeroUsize::MIN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum ToleranceProfile {
    /// 1e-6, relative above magnitude 1 and absolute below
    #[default]
    Relaxed,
    /// 1e-10, same rule as relaxed
    Strict,
}

impl ToleranceProfile {
    pub fn epsilon(self) -> f64 {
        match self {
            ToleranceProfile::Relaxed => 1e-6,
            ToleranceProfile::Strict => 1e-10,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToleranceProfile::Relaxed => "relaxed",
            ToleranceProfile::Strict => "strict",
        }
    }
}

impl fmt::Display for ToleranceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareOptions {
    pub force_text: BTreeSet<String>,
    pub tolerance: ToleranceProfile,
    /// Prefix rows inspected by the classifier; 0 scans the whole column.
    pub sample_rows: usize,
    /// Cap on value-count differences listed per text column; never zero, so a
    /// differing column always lists at least one entry.
    pub max_text_differences: NonZeroUsize,
    pub compare_std: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            force_text: DEFAULT_FORCE_TEXT_COLUMNS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            tolerance: ToleranceProfile::default(),
            sample_rows: DEFAULT_SAMPLE_ROWS,
            max_text_differences: DEFAULT_MAX_TEXT_DIFFERENCES,
            compare_std: false,
        }
    }
}

impl CompareOptions {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening options file {path:?}"))?;
        let reader = BufReader::new(file);
        let options: CompareOptions =
            serde_yaml::from_reader(reader).context("Parsing options YAML")?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let options: CompareOptions = serde_yaml::from_str(input).context("Parsing options YAML")?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.force_text.iter().all(|name| !name.is_empty()),
            "force_text entries cannot be empty"
        );
        Ok(())
    }

    pub fn is_force_text(&self, column: &str) -> bool {
        self.force_text.contains(column)
    }

    pub fn epsilon(&self) -> f64 {
        self.tolerance.epsilon()
    }
}
