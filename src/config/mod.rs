//! Configuration for ananke.
//!
//! Preferences live in KDL `config.kdl` files at two levels:
//!
//! - System: `<config_dir>/ananke/config.kdl` (`$ANANKE_CONFIG_DIR/config.kdl`
//!   when set)
//! - Workspace: `<root>/.ananke/config.kdl`
//!
//! Keys:
//! - `output-format` - "json" or "human"
//! - `default-priority` - Priority for new tasks (0-4)
//! - `action-log` - Record invocations in `.ananke/logs/actions.jsonl`
//!
//! ## Precedence
//!
//! CLI flag > workspace config > system config > defaults
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    CONFIG_DIR_ENV, ConfigOverrides, Resolved, ResolvedConfig, ValueSource, resolve_config,
    system_config_path,
};
pub use schema::{AnankeConfig, OutputFormat};
