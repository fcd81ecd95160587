//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Workspace config (`<root>/.ananke/config.kdl`)
//! 3. System config (`<config_dir>/ananke/config.kdl`)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::Result;
use crate::config::{AnankeConfig, OutputFormat};
use crate::models::DEFAULT_PRIORITY;
use crate::storage::WorkspacePaths;

/// Overrides the system config directory (mainly for tests).
pub const CONFIG_DIR_ENV: &str = "ANANKE_CONFIG_DIR";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from the workspace `.ananke/config.kdl`
    Workspace,
    /// Value from the per-user config file
    System,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Workspace => write!(f, "workspace"),
            ValueSource::System => write!(f, "system"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub output_format: Resolved<OutputFormat>,
    pub default_priority: Resolved<u8>,
    pub action_log: Resolved<bool>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            output_format: Resolved::new(OutputFormat::default(), ValueSource::Default),
            default_priority: Resolved::new(DEFAULT_PRIORITY, ValueSource::Default),
            action_log: Resolved::new(false, ValueSource::Default),
        }
    }
}

impl ResolvedConfig {
    pub fn output_format(&self) -> OutputFormat {
        self.output_format.value
    }

    pub fn default_priority(&self) -> u8 {
        self.default_priority.value
    }

    pub fn action_log_enabled(&self) -> bool {
        self.action_log.value
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Output format forced by `--json`
    pub output_format: Option<OutputFormat>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }
}

/// Location of the per-user config file, if one can be determined.
///
/// `ANANKE_CONFIG_DIR` replaces `<config_dir>/ananke` entirely.
pub fn system_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir).join("config.kdl"));
    }
    dirs::config_dir().map(|dir| dir.join("ananke").join("config.kdl"))
}

/// Resolve configuration for the workspace at `root`.
///
/// The workspace file is consulted even when `.ananke` is not initialized
/// (it simply will not exist).
pub fn resolve_config(root: &Path, overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let system = match system_config_path() {
        Some(path) => AnankeConfig::load(&path)?,
        None => AnankeConfig::default(),
    };
    let workspace = AnankeConfig::load(&WorkspacePaths::new(root).config_file)?;

    let resolved = merge_layers(overrides, &workspace, &system);
    debug!(
        output_format = %resolved.output_format.value,
        output_format_source = %resolved.output_format.source,
        default_priority = resolved.default_priority.value,
        action_log = resolved.action_log.value,
        "resolved configuration"
    );
    Ok(resolved)
}

fn merge_layers(
    overrides: &ConfigOverrides,
    workspace: &AnankeConfig,
    system: &AnankeConfig,
) -> ResolvedConfig {
    let mut result = ResolvedConfig::default();

    if let Some(format) = overrides.output_format {
        result.output_format = Resolved::new(format, ValueSource::CliFlag);
    } else if let Some(format) = workspace.output_format {
        result.output_format = Resolved::new(format, ValueSource::Workspace);
    } else if let Some(format) = system.output_format {
        result.output_format = Resolved::new(format, ValueSource::System);
    }

    if let Some(priority) = workspace.default_priority {
        result.default_priority = Resolved::new(priority, ValueSource::Workspace);
    } else if let Some(priority) = system.default_priority {
        result.default_priority = Resolved::new(priority, ValueSource::System);
    }

    if let Some(enabled) = workspace.action_log {
        result.action_log = Resolved::new(enabled, ValueSource::Workspace);
    } else if let Some(enabled) = system.action_log {
        result.action_log = Resolved::new(enabled, ValueSource::System);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    #[test]
    fn test_defaults() {
        let resolved = merge_layers(
            &ConfigOverrides::new(),
            &AnankeConfig::default(),
            &AnankeConfig::default(),
        );
        assert_eq!(resolved, ResolvedConfig::default());
        assert_eq!(resolved.output_format(), OutputFormat::Human);
        assert_eq!(resolved.default_priority(), 2);
        assert!(!resolved.action_log_enabled());
    }

    #[test]
    fn test_workspace_beats_system() {
        let workspace = AnankeConfig {
            default_priority: Some(1),
            ..Default::default()
        };
        let system = AnankeConfig {
            default_priority: Some(3),
            action_log: Some(true),
            ..Default::default()
        };

        let resolved = merge_layers(&ConfigOverrides::new(), &workspace, &system);
        assert_eq!(resolved.default_priority, Resolved::new(1, ValueSource::Workspace));
        assert_eq!(resolved.action_log, Resolved::new(true, ValueSource::System));
    }

    #[test]
    fn test_cli_beats_files() {
        let workspace = AnankeConfig {
            output_format: Some(OutputFormat::Human),
            ..Default::default()
        };
        let overrides = ConfigOverrides::new().with_output_format(OutputFormat::Json);

        let resolved = merge_layers(&overrides, &workspace, &AnankeConfig::default());
        assert_eq!(resolved.output_format.value, OutputFormat::Json);
        assert_eq!(resolved.output_format.source, ValueSource::CliFlag);
    }

    #[test]
    fn test_resolve_reads_workspace_file() {
        let env = TestEnv::init();
        std::fs::write(
            WorkspacePaths::new(env.path()).config_file,
            "default-priority 0\n",
        )
        .unwrap();

        let resolved = resolve_config(env.path(), &ConfigOverrides::new()).unwrap();
        assert_eq!(resolved.default_priority.value, 0);
        assert_eq!(resolved.default_priority.source, ValueSource::Workspace);
    }

    #[test]
    fn test_resolve_rejects_invalid_workspace_file() {
        let env = TestEnv::init();
        std::fs::write(
            WorkspacePaths::new(env.path()).config_file,
            "output-format \"xml\"\n",
        )
        .unwrap();

        let err = resolve_config(env.path(), &ConfigOverrides::new()).unwrap_err();
        assert_eq!(err.code(), "UNEXPECTED_ERROR");
    }

    #[test]
    fn test_value_source_display() {
        assert_eq!(ValueSource::CliFlag.to_string(), "cli");
        assert_eq!(ValueSource::Workspace.to_string(), "workspace");
    }
}
