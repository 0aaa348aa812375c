use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::session::controller::SessionOptions;
use crate::transfer::import::UnknownFieldPolicy;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "sso-intake",
    version,
    about = "Capture, save and exchange SSO application onboarding answers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding the local form store
    #[arg(long, global = true)]
    pub store_dir: Option<String>,

    /// Path to config file (default: sso-intake.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show progress, visible sections and export state
    Status {
        /// Output format: console or json
        #[arg(long, default_value = "console")]
        format: String,
    },

    /// Answer one field and save
    Set {
        /// Field key, e.g. appName or ssoProtocol
        field: String,

        /// New value (checkboxes: true/false, radio groups: option or empty)
        value: String,
    },

    /// Export saved progress to a JSON file
    ExportProgress {
        /// Output directory (default from config, else current dir)
        #[arg(short, long)]
        output_dir: Option<String>,
    },

    /// Import progress from a previously exported JSON file
    ImportProgress {
        /// Path of the JSON file to import
        file: String,
    },

    /// Export the onboarding report as a self-contained HTML file
    ExportReport {
        /// Output directory (default from config, else current dir)
        #[arg(short, long)]
        output_dir: Option<String>,
    },

    /// Delete all saved form data and start over
    Clear {
        /// Confirm the deletion; nothing is cleared without it
        #[arg(long)]
        yes: bool,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `sso-intake.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub autosave: AutosaveConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_dir")]
    pub dir: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: default_store_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutosaveConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,
}

// Serde default helpers
fn default_store_dir() -> String { ".sso-intake".to_string() }
fn default_debounce_ms() -> u64 { 500 }
fn default_output_dir() -> String { ".".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("sso-intake.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = config_path, error = %e, "ignoring malformed config");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Session tunables from the resolved config.
pub fn build_session_options(config: &AppConfig) -> SessionOptions {
    SessionOptions {
        debounce: Duration::from_millis(config.autosave.debounce_ms),
        unknown_fields: config.import.unknown_fields,
    }
}

/// Store directory: CLI > config > default.
pub fn resolve_store_dir<'a>(cli_dir: Option<&'a str>, config: &'a AppConfig) -> &'a str {
    cli_dir.unwrap_or(&config.store.dir)
}

/// Output directory: CLI > config > default.
pub fn resolve_output_dir<'a>(cli_dir: Option<&'a str>, config: &'a AppConfig) -> &'a str {
    cli_dir.unwrap_or(&config.export.output_dir)
}
