//! Sort run configuration.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Top-level folder a batch is sorted under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Mode {
    #[default]
    #[strum(to_string = "SFW", serialize = "s")]
    #[serde(rename = "SFW")]
    Sfw,
    #[strum(to_string = "NSFW", serialize = "n")]
    #[serde(rename = "NSFW")]
    Nsfw,
}

impl Mode {
    /// Guess the mode from a metadata file name (`nsfw`/`nswf`, else `sfw`/`swf`).
    pub fn detect_from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        if name.contains("nsfw") || name.contains("nswf") {
            Some(Self::Nsfw)
        } else if name.contains("sfw") || name.contains("swf") {
            Some(Self::Sfw)
        } else {
            None
        }
    }
}

/// What to do when the planned destination is already taken.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Place beside the existing file as `stem_2`, `stem_3`, ...
    #[default]
    Dup,
    /// Leave the source where it is.
    Skip,
    /// Replace the existing file.
    Overwrite,
    /// Skip when identical content is already in the folder, else `Dup`.
    Hash,
}

/// Whether placement moves or copies the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Transfer {
    #[default]
    Move,
    Copy,
}

/// Configuration for one sort run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct SortConfig {
    /// Directory holding the images; also the root of the output tree.
    pub source_dir: PathBuf,

    #[builder(default)]
    #[serde(default)]
    pub mode: Mode,

    #[builder(default)]
    #[serde(default)]
    pub transfer: Transfer,

    /// Plan and report only; touch neither files nor the sheet.
    #[builder(default = "false")]
    #[serde(default)]
    pub dry_run: bool,

    #[builder(default)]
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,

    /// Descend into subdirectories of the source directory.
    #[builder(default = "false")]
    #[serde(default)]
    pub recursive: bool,

    /// Files smaller than this many bytes are skipped.
    #[builder(default = "1")]
    #[serde(default = "default_min_bytes")]
    pub min_bytes: u64,

    /// Marker appended to the saved sheet's stem.
    #[builder(default = "default_output_suffix()")]
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Extra folder below the date folder.
    #[builder(default)]
    #[serde(default)]
    pub batch_tag: Option<String>,
}

fn default_min_bytes() -> u64 {
    1
}

fn default_output_suffix() -> String {
    "画像仕分け済み".to_string()
}

impl SortConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.source_dir {
            Some(ref dir) if dir.as_os_str().is_empty() => Err("Source directory cannot be empty".to_string()),
            Some(_) => Ok(()),
            None => Err("Source directory is required".to_string()),
        }
    }
}

impl SortConfig {
    /// Create a new config builder.
    pub fn builder() -> SortConfigBuilder {
        SortConfigBuilder::default()
    }

    /// Create a default config for a source directory.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            mode: Mode::default(),
            transfer: Transfer::default(),
            dry_run: false,
            conflict_policy: ConflictPolicy::default(),
            recursive: false,
            min_bytes: default_min_bytes(),
            output_suffix: default_output_suffix(),
            batch_tag: None,
        }
    }

    /// Batch tag, if set and non-blank.
    pub fn batch_tag(&self) -> Option<&str> {
        self.batch_tag.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}
