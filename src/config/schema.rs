//! KDL schema for `config.kdl`.
//!
//! ```kdl
//! output-format "human"  // or "json"
//! default-priority 1
//! action-log #true
//! ```
//!
//! Unknown nodes are ignored so newer files still load.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use kdl::{KdlDocument, KdlValue};
use serde::{Deserialize, Serialize};

use crate::models::MAX_PRIORITY;
use crate::{Error, Result};

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON envelope on stdout
    Json,
    /// Human-readable output (default)
    #[default]
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Preferences read from one `config.kdl`. Unset keys stay `None` so the
/// resolver can fall through to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnankeConfig {
    pub output_format: Option<OutputFormat>,

    /// Priority given to `task create` when `--priority` is omitted (0-4)
    pub default_priority: Option<u8>,

    /// Append each invocation to `.ananke/logs/actions.jsonl`
    pub action_log: Option<bool>,
}

impl AnankeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config from a KDL document.
    ///
    /// A recognised key with a value of the wrong type or out of range is an
    /// error.
    pub fn from_kdl(doc: &KdlDocument) -> std::result::Result<Self, String> {
        let mut config = Self::new();

        if let Some(value) = first_value(doc, "output-format") {
            let format = value
                .as_string()
                .and_then(OutputFormat::parse)
                .ok_or_else(|| format!("output-format must be \"json\" or \"human\", got {}", value))?;
            config.output_format = Some(format);
        }

        if let Some(value) = first_value(doc, "default-priority") {
            let priority = value
                .as_integer()
                .filter(|p| (0..=MAX_PRIORITY as i128).contains(p))
                .ok_or_else(|| {
                    format!("default-priority must be 0-{}, got {}", MAX_PRIORITY, value)
                })?;
            config.default_priority = Some(priority as u8);
        }

        if let Some(value) = first_value(doc, "action-log") {
            let enabled = value
                .as_bool()
                .ok_or_else(|| format!("action-log must be #true or #false, got {}", value))?;
            config.action_log = Some(enabled);
        }

        Ok(config)
    }

    /// Parse config from KDL text.
    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        let doc: KdlDocument = text.parse().map_err(|e| format!("{}", e))?;
        Self::from_kdl(&doc)
    }

    /// Load `path`; a missing file yields an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(Error::Config(format!("{}: {}", path.display(), e))),
        };
        Self::parse(&text).map_err(|reason| Error::Config(format!("{}: {}", path.display(), reason)))
    }
}

fn first_value<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a KdlValue> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .map(|entry| entry.value())
}
