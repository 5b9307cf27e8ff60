//! Logging
//!
//! `tracing` subscriber setup for the library and CLI. Gradebook operations log
//! through `tracing` macros; nothing is written until [`init_logging`] installs
//! a subscriber.
//!
//! Environment overrides, applied over the configured values:
//! `GRADETREE_LOG` (filter directives), `GRADETREE_LOG_MODULES`
//! (`module=level,...`), `GRADETREE_LOG_FORMAT`, `GRADETREE_LOG_OUTPUT` and
//! `GRADETREE_LOG_FILE`.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const ENV_FILTER: &str = "GRADETREE_LOG";
const ENV_MODULES: &str = "GRADETREE_LOG_MODULES";
const ENV_FORMAT: &str = "GRADETREE_LOG_FORMAT";
const ENV_OUTPUT: &str = "GRADETREE_LOG_OUTPUT";
const ENV_FILE: &str = "GRADETREE_LOG_FILE";

const LOG_FILE_NAME: &str = "gradetree.log";

/// Line format of emitted events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ApiError::ConfigError(format!(
                "Invalid log format: {} (must be 'json' or 'text')",
                other
            ))),
        }
    }
}

/// Where events are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    #[default]
    Stderr,
    File,
    #[serde(rename = "file+stderr")]
    #[value(name = "file+stderr")]
    FileAndStderr,
    /// stdout and stderr
    Both,
}

impl LogOutput {
    fn writes_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::FileAndStderr)
    }
}

impl FromStr for LogOutput {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "stdout" => Ok(LogOutput::Stdout),
            "stderr" => Ok(LogOutput::Stderr),
            "file" => Ok(LogOutput::File),
            "file+stderr" => Ok(LogOutput::FileAndStderr),
            "both" => Ok(LogOutput::Both),
            other => Err(ApiError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', 'file+stderr', or 'both')",
                other
            ))),
        }
    }
}

/// Logging section of the configuration.
///
/// CLI flags are folded into this by the binary before [`init_logging`] runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,

    /// Base level: trace, debug, info, warn, error or off.
    pub level: String,

    pub format: LogFormat,

    pub output: LogOutput,

    /// Log file when `output` includes a file; the state directory default otherwise.
    pub file: Option<PathBuf>,

    /// ANSI colors for text written to a terminal stream.
    pub color: bool,

    /// Per-module levels, e.g. `gradetree::store = "debug"`.
    pub modules: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "warn".to_string(),
            format: LogFormat::Text,
            output: LogOutput::Stderr,
            file: None,
            color: true,
            modules: HashMap::new(),
        }
    }
}

/// Log file location: `GRADETREE_LOG_FILE`, then the configured file, then
/// `gradetree.log` in the platform state directory.
pub fn resolve_log_file_path(configured: Option<&Path>) -> Result<PathBuf, ApiError> {
    let from_env = std::env::var_os(ENV_FILE)
        .map(PathBuf::from)
        .filter(|p| !p.as_os_str().is_empty());
    if let Some(path) = from_env {
        return Ok(path);
    }
    match configured.filter(|p| !p.as_os_str().is_empty()) {
        Some(path) => Ok(path.to_path_buf()),
        None => default_log_file_path(),
    }
}

fn default_log_file_path() -> Result<PathBuf, ApiError> {
    let dirs = directories::ProjectDirs::from("", "gradetree", "gradetree").ok_or_else(|| {
        ApiError::ConfigError("Could not determine platform directories for log file".to_string())
    })?;
    // no state dir on macOS or Windows
    let dir = dirs.state_dir().unwrap_or_else(|| dirs.data_local_dir());
    Ok(dir.join(LOG_FILE_NAME))
}

/// Install the global subscriber.
///
/// Environment overrides win over `config`, which wins over the defaults.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    if !config.enabled {
        Registry::default()
            .with(EnvFilter::new("off"))
            .with(fmt::layer().with_writer(std::io::sink))
            .init();
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let format = env_override(ENV_FORMAT)?.unwrap_or(config.format);
    let output = env_override(ENV_OUTPUT)?.unwrap_or(config.output);
    let writer = build_writer(output, config.file.as_deref())?;

    let layer = fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);
    let subscriber = Registry::default().with(filter);
    match format {
        LogFormat::Json => subscriber.with(layer.json()).init(),
        LogFormat::Text => subscriber
            .with(layer.with_ansi(config.color && !output.writes_file()))
            .init(),
    }

    Ok(())
}

fn env_override<T: FromStr<Err = ApiError>>(var: &str) -> Result<Option<T>, ApiError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => value.parse().map(Some),
        _ => Ok(None),
    }
}

fn build_writer(output: LogOutput, file: Option<&Path>) -> Result<BoxMakeWriter, ApiError> {
    let writer = match output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::Both => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
        LogOutput::File => BoxMakeWriter::new(open_log_file(&resolve_log_file_path(file)?)?),
        LogOutput::FileAndStderr => BoxMakeWriter::new(
            open_log_file(&resolve_log_file_path(file)?)?.and(std::io::stderr),
        ),
    };
    Ok(writer)
}

fn open_log_file(path: &Path) -> Result<Arc<File>, ApiError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::ConfigError(format!("Failed to create log directory {}: {}", parent.display(), e))
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            ApiError::ConfigError(format!("Failed to open log file {}: {}", path.display(), e))
        })?;
    Ok(Arc::new(file))
}

/// `GRADETREE_LOG` replaces everything; otherwise the base level plus
/// configured and `GRADETREE_LOG_MODULES` per-module directives.
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env(ENV_FILTER) {
        return Ok(filter);
    }
    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let from_env = std::env::var(ENV_MODULES).unwrap_or_default();
    let env_modules = from_env
        .split(',')
        .filter_map(|entry| entry.split_once('='))
        .map(|(module, level)| (module.trim(), level.trim()));
    let configured = config
        .modules
        .iter()
        .map(|(module, level)| (module.as_str(), level.as_str()));

    configured
        .chain(env_modules)
        .try_fold(EnvFilter::new(&config.level), |filter, (module, level)| -> Result<EnvFilter, ApiError> {
            Ok(filter.add_directive(module_directive(module, level)?))
        })
}

fn module_directive(module: &str, level: &str) -> Result<Directive, ApiError> {
    format!("{}={}", module, level)
        .parse()
        .map_err(|e| ApiError::ConfigError(format!("Invalid log directive {}={}: {}", module, level, e)))
}
