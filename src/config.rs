use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

pub const DEFAULT_PLAY_MARKER: &str = "PLAY [";
pub const DEFAULT_TASK_MARKER: &str = "TASK [";
pub const DEFAULT_RECAP_MARKER: &str = "PLAY RECAP";
pub const DEFAULT_INLINE_SEPARATOR: &str = "=>";

/// What the scanner does with a line it has no rule for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tolerance {
    #[default]
    Ignore,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanOptions {
    pub play_marker_prefix: String,
    pub task_marker_prefix: String,
    pub recap_marker: String,
    pub inline_value_separator: String,
    /// Non-blank lines inside a play that match no marker or status prefix.
    pub unrecognized_lines: Tolerance,
    /// Status lines seen inside a play before its first task.
    pub orphan_outcomes: Tolerance,
    /// Record unparseable inline payloads as raw text instead of failing.
    pub lenient_inline_values: bool,
    /// Count `fatal:` lines in the failed bucket.
    pub fatal_as_failed: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            play_marker_prefix: DEFAULT_PLAY_MARKER.to_string(),
            task_marker_prefix: DEFAULT_TASK_MARKER.to_string(),
            recap_marker: DEFAULT_RECAP_MARKER.to_string(),
            inline_value_separator: DEFAULT_INLINE_SEPARATOR.to_string(),
            unrecognized_lines: Tolerance::Ignore,
            orphan_outcomes: Tolerance::Ignore,
            lenient_inline_values: false,
            fatal_as_failed: false,
        }
    }
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on unrecognized lines and on outcomes outside a task.
    pub fn strict() -> Self {
        ScanOptions {
            unrecognized_lines: Tolerance::Reject,
            orphan_outcomes: Tolerance::Reject,
            ..Self::default()
        }
    }
}

pub fn load_options<R: Read>(reader: R) -> Result<ScanOptions> {
    let options: Option<ScanOptions> = serde_yaml::from_reader(reader)?;
    Ok(options.unwrap_or_default())
}

pub fn load_options_file(path: &Path) -> Result<ScanOptions> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("could not open config file {}", path.display()))?;
    load_options(file).with_context(|| format!("could not parse config file {}", path.display()))
}
