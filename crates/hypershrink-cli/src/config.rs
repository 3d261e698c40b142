//! Batch configuration: presets and resolved settings for one run.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::ValueEnum;
use hypershrink_core::Budget;

/// Default size limit, in megabytes.
pub const DEFAULT_LIMIT_MB: u32 = 16;
/// Largest limit the adjustable preset accepts, in megabytes.
pub const MAX_LIMIT_MB: u32 = 50;

/// Named ways of running a batch. They differ only in where the budget comes
/// from and how outputs are named.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Fixed 16 MB limit for messaging apps.
    Whatsapp,
    /// Adjustable limit (1-50 MB).
    Xtreme,
}

impl Preset {
    /// Output folder created inside the input folder.
    pub fn folder_name(self) -> &'static str {
        match self {
            Preset::Whatsapp => "Listas_WhatsApp",
            Preset::Xtreme => "X-TREME_COMPRESSED",
        }
    }

    /// Suffix appended to each output file stem.
    pub fn suffix(self) -> &'static str {
        match self {
            Preset::Whatsapp => "whatsapp",
            Preset::Xtreme => "XTREME",
        }
    }

    pub fn allows_custom_limit(self) -> bool {
        matches!(self, Preset::Xtreme)
    }
}

/// Everything a batch run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub suffix: String,
    pub budget: Budget,
}

impl BatchConfig {
    /// Resolve a preset plus optional overrides into a config.
    pub fn resolve(
        input_dir: &Path,
        preset: Preset,
        limit_mb: Option<u32>,
        output_dir: Option<PathBuf>,
        suffix: Option<String>,
    ) -> Result<Self> {
        let limit_mb = match limit_mb {
            Some(_) if !preset.allows_custom_limit() => {
                bail!("the {:?} preset has a fixed {DEFAULT_LIMIT_MB} MB limit", preset)
            }
            Some(mb) if mb == 0 || mb > MAX_LIMIT_MB => {
                bail!("limit must be between 1 and {MAX_LIMIT_MB} MB, got {mb}")
            }
            Some(mb) => mb,
            None => DEFAULT_LIMIT_MB,
        };

        let suffix = suffix.unwrap_or_else(|| preset.suffix().to_string());
        if suffix.is_empty() || suffix.contains(['/', '\\']) {
            bail!("invalid output suffix {suffix:?}");
        }

        Ok(Self {
            input_dir: input_dir.to_path_buf(),
            output_dir: output_dir.unwrap_or_else(|| input_dir.join(preset.folder_name())),
            suffix,
            budget: Budget::from_megabytes(limit_mb)?,
        })
    }
}
