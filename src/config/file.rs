//! Loading configuration from a JSON file
//!
//! The document layout:
//!
//! ```json
//! {
//!   "kloggingMinLogLevel": "WARN",
//!   "minDirectLogLevel": "ERROR",
//!   "sinks": {
//!     "stdout": { "sendTo": "STDOUT", "renderWith": "RENDER_ANSI" },
//!     "audit": { "sendTo": "FILE", "path": "audit.jsonl", "renderWith": "RENDER_JSON", "queueCapacity": 1000 }
//!   },
//!   "logging": [
//!     {
//!       "fromLoggerBase": "com.example",
//!       "stopOnMatch": true,
//!       "levelRanges": [
//!         { "fromMinLevel": "INFO", "toSinks": ["stdout"] },
//!         { "fromMinLevel": "ERROR", "toMaxLevel": "FATAL", "toSinks": ["audit"] }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! `"configName": "DEFAULT_CONSOLE"` (or `"ANSI_CONSOLE"`) starts from a
//! built-in configuration sending INFO and above from every logger to stdout;
//! anything else in the document is appended to it.

use super::configuration::{KloggingConfiguration, LoggingConfig};
use super::sink_config::SinkConfiguration;
use crate::core::{KloggingError, Level, Result};
use crate::sinks::{FileSink, Renderer};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "KLOGGING_CONFIG_PATH";

/// Environment variable overriding `kloggingMinLogLevel`
pub const MIN_LOG_LEVEL_ENV: &str = "KLOGGING_MIN_LOG_LEVEL";

/// File looked for in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "klogging.json";

/// Built-in configuration: INFO and above to stdout
pub const DEFAULT_CONSOLE: &str = "DEFAULT_CONSOLE";

/// Built-in configuration: INFO and above to stdout with coloured levels
pub const ANSI_CONSOLE: &str = "ANSI_CONSOLE";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FileConfiguration {
    config_name: Option<String>,
    klogging_min_log_level: Option<Level>,
    min_direct_log_level: Option<Level>,
    #[serde(default)]
    sinks: HashMap<String, FileSinkConfiguration>,
    #[serde(default)]
    logging: Vec<FileLoggingConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FileSinkConfiguration {
    send_to: Destination,
    #[serde(default)]
    render_with: RenderWith,
    path: Option<PathBuf>,
    queue_capacity: Option<usize>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum Destination {
    Stdout,
    Stderr,
    File,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
enum RenderWith {
    #[default]
    #[serde(rename = "RENDER_SIMPLE")]
    Simple,
    #[serde(rename = "RENDER_ANSI")]
    Ansi,
    #[serde(rename = "RENDER_JSON")]
    Json,
}

impl From<RenderWith> for Renderer {
    fn from(render: RenderWith) -> Self {
        match render {
            RenderWith::Simple => Renderer::Simple,
            RenderWith::Ansi => Renderer::Ansi,
            RenderWith::Json => Renderer::Json,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FileLoggingConfig {
    from_logger_base: Option<String>,
    exact_logger: Option<String>,
    #[serde(default)]
    stop_on_match: bool,
    #[serde(default)]
    level_ranges: Vec<FileLevelRange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FileLevelRange {
    from_min_level: Level,
    to_max_level: Option<Level>,
    #[serde(default)]
    to_sinks: Vec<String>,
}

/// Find and load the configuration file, if there is one.
///
/// Looks at `KLOGGING_CONFIG_PATH` first, then `klogging.json` in the
/// working directory. Applies the `KLOGGING_MIN_LOG_LEVEL` override.
pub fn load_configuration() -> Result<Option<KloggingConfiguration>> {
    load_configuration_in(
        Path::new("."),
        std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from),
        std::env::var(MIN_LOG_LEVEL_ENV).ok(),
    )
}

/// Discovery with the environment passed in: an explicit `config_path`
/// wins, otherwise `klogging.json` in `dir` is used if it exists.
fn load_configuration_in(
    dir: &Path,
    config_path: Option<PathBuf>,
    min_log_level: Option<String>,
) -> Result<Option<KloggingConfiguration>> {
    let path = match config_path {
        Some(path) => path,
        None => {
            let default = dir.join(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                return Ok(None);
            }
            default
        }
    };

    let mut config = load_from_path(&path)?;
    if let Some(level) = min_log_level {
        config.klogging_min_log_level = level
            .parse()
            .map_err(|e: String| KloggingError::config(MIN_LOG_LEVEL_ENV, e))?;
    }
    Ok(Some(config))
}

/// Load and validate the configuration in the JSON file at `path`
pub fn load_from_path(path: impl AsRef<Path>) -> Result<KloggingConfiguration> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| {
        KloggingError::io_operation("reading configuration", path.display().to_string(), e)
    })?;
    let document: FileConfiguration =
        serde_json::from_str(&json).map_err(|source| KloggingError::ConfigParse {
            path: path.display().to_string(),
            source,
        })?;
    build(document)
}

/// Parse and validate a JSON configuration document
pub fn parse_json(json: &str) -> Result<KloggingConfiguration> {
    let document: FileConfiguration = serde_json::from_str(json)?;
    build(document)
}

/// Built-in configuration by name
pub fn builtin(name: &str) -> Option<KloggingConfiguration> {
    let renderer = match name {
        DEFAULT_CONSOLE => RenderWith::Simple,
        ANSI_CONSOLE => RenderWith::Ansi,
        _ => return None,
    };
    let sink = console_sink(Destination::Stdout, renderer.into()).ok()?;
    Some(
        KloggingConfiguration::builder()
            .sink("console", sink)
            .logging(LoggingConfig::new().from_min_level(Level::Info, ["console"]))
            .build(),
    )
}

fn build(document: FileConfiguration) -> Result<KloggingConfiguration> {
    let mut config = match &document.config_name {
        Some(name) => builtin(name).ok_or_else(|| {
            KloggingError::config("configName", format!("unknown built-in '{}'", name))
        })?,
        None => KloggingConfiguration::default(),
    };

    let mut extra = KloggingConfiguration::builder()
        .klogging_min_log_level(
            document
                .klogging_min_log_level
                .unwrap_or(config.klogging_min_log_level),
        )
        .min_direct_log_level(
            document
                .min_direct_log_level
                .unwrap_or(config.min_direct_log_level),
        );
    for (name, sink) in document.sinks {
        let sink_config = build_sink(&name, sink)?;
        extra = extra.sink(name, sink_config);
    }
    for logging in document.logging {
        extra = extra.logging(build_logging(logging)?);
    }

    config.append(extra.build());
    config.validate()?;
    Ok(config)
}

fn build_sink(name: &str, sink: FileSinkConfiguration) -> Result<SinkConfiguration> {
    let renderer: Renderer = sink.render_with.into();
    let config = match sink.send_to {
        Destination::Stdout | Destination::Stderr => console_sink(sink.send_to, renderer)?,
        Destination::File => {
            let path = sink.path.ok_or_else(|| {
                KloggingError::config(format!("sinks.{}", name), "FILE destination needs a path")
            })?;
            SinkConfiguration::new(FileSink::with_renderer(path, renderer)?)
        }
    };
    Ok(match sink.queue_capacity {
        Some(capacity) => config.queued(capacity),
        None => config,
    })
}

#[cfg(feature = "console")]
fn console_sink(destination: Destination, renderer: Renderer) -> Result<SinkConfiguration> {
    use crate::sinks::{ConsoleSink, ConsoleStream};
    let stream = match destination {
        Destination::Stderr => ConsoleStream::Stderr,
        _ => ConsoleStream::Stdout,
    };
    Ok(SinkConfiguration::new(
        ConsoleSink::new().with_stream(stream).with_renderer(renderer),
    ))
}

#[cfg(not(feature = "console"))]
fn console_sink(_destination: Destination, _renderer: Renderer) -> Result<SinkConfiguration> {
    Err(KloggingError::config(
        "sendTo",
        "console destinations need the `console` feature",
    ))
}

fn build_logging(logging: FileLoggingConfig) -> Result<LoggingConfig> {
    let mut config = match (logging.from_logger_base, logging.exact_logger) {
        (Some(_), Some(_)) => {
            return Err(KloggingError::config(
                "logging",
                "use either fromLoggerBase or exactLogger, not both",
            ))
        }
        (Some(base), None) => LoggingConfig::from_logger_base(base),
        (None, Some(exact)) => LoggingConfig::exact_logger(exact),
        (None, None) => LoggingConfig::new(),
    };
    if logging.stop_on_match {
        config = config.stop_on_match();
    }
    for range in logging.level_ranges {
        config = config.level_range(
            range.from_min_level,
            range.to_max_level.unwrap_or(Level::Fatal),
            range.to_sinks,
        );
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DispatchMode;
    use tempfile::TempDir;

    #[test]
    fn test_parse_file_sinks_and_rules() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let log_path = temp_dir.path().join("app.log");
        let json = format!(
            r#"{{
                "kloggingMinLogLevel": "WARN",
                "sinks": {{
                    "file": {{ "sendTo": "FILE", "path": {:?}, "queueCapacity": 10 }}
                }},
                "logging": [
                    {{
                        "fromLoggerBase": "com.example",
                        "levelRanges": [ {{ "fromMinLevel": "DEBUG", "toSinks": ["file"] }} ]
                    }}
                ]
            }}"#,
            log_path.display().to_string()
        );

        let config = parse_json(&json).unwrap();

        assert_eq!(config.klogging_min_log_level, Level::Warn);
        assert_eq!(config.min_direct_log_level, Level::Warn);
        assert_eq!(config.minimum_level_of("com.example.Repo"), Level::Debug);
        assert_eq!(config.minimum_level_of("other"), Level::None);
        assert_eq!(
            config.sinks["file"].dispatch(),
            DispatchMode::Queued { capacity: 10 }
        );
    }

    #[cfg(feature = "console")]
    #[test]
    fn test_builtin_default_console() {
        let config = parse_json(r#"{ "configName": "DEFAULT_CONSOLE" }"#).unwrap();
        assert_eq!(config.minimum_level_of("anything"), Level::Info);
        assert!(config.sinks.contains_key("console"));
    }

    #[test]
    fn test_unknown_builtin_is_rejected() {
        let result = parse_json(r#"{ "configName": "NO_SUCH_CONFIG" }"#);
        assert!(matches!(
            result,
            Err(KloggingError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_reference_to_undefined_sink_is_rejected() {
        let json = r#"{
            "logging": [ { "levelRanges": [ { "fromMinLevel": "INFO", "toSinks": ["missing"] } ] } ]
        }"#;
        assert!(matches!(
            parse_json(json),
            Err(KloggingError::UnknownSink { .. })
        ));
    }

    #[test]
    fn test_file_sink_requires_path() {
        let json = r#"{ "sinks": { "file": { "sendTo": "FILE" } } }"#;
        assert!(matches!(
            parse_json(json),
            Err(KloggingError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_both_name_matchers_rejected() {
        let json = r#"{
            "logging": [ { "fromLoggerBase": "a", "exactLogger": "a.b" } ]
        }"#;
        assert!(parse_json(json).is_err());
    }

    #[test]
    fn test_load_from_path_reports_parse_errors() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("klogging.json");
        std::fs::write(&config_path, "{ not json").unwrap();

        match load_from_path(&config_path) {
            Err(KloggingError::ConfigParse { path, .. }) => {
                assert!(path.ends_with("klogging.json"))
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    fn write_config(dir: &Path, file_name: &str, log_name: &str) -> PathBuf {
        let config_path = dir.join(file_name);
        let json = format!(
            r#"{{
                "sinks": {{ "file": {{ "sendTo": "FILE", "path": {:?} }} }},
                "logging": [ {{ "levelRanges": [ {{ "fromMinLevel": "INFO", "toSinks": ["file"] }} ] }} ]
            }}"#,
            dir.join(log_name).display().to_string()
        );
        std::fs::write(&config_path, json).unwrap();
        config_path
    }

    #[test]
    fn test_discovery_finds_default_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write_config(temp_dir.path(), DEFAULT_CONFIG_FILE, "app.log");

        let config = load_configuration_in(temp_dir.path(), None, None)
            .unwrap()
            .expect("Default file should be found");
        assert_eq!(config.minimum_level_of("any"), Level::Info);
        assert_eq!(config.klogging_min_log_level, Level::Info);
    }

    #[test]
    fn test_discovery_without_file_is_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = load_configuration_in(temp_dir.path(), None, None).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_explicit_path_wins_over_default_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write_config(temp_dir.path(), DEFAULT_CONFIG_FILE, "default.log");
        let other_dir = TempDir::new().expect("Failed to create temp dir");
        let explicit = write_config(other_dir.path(), "custom.json", "custom.log");

        let config = load_configuration_in(temp_dir.path(), Some(explicit), None)
            .unwrap()
            .unwrap();
        let sink_path = other_dir.path().join("custom.log");
        assert!(sink_path.exists());
        assert!(config.sinks.contains_key("file"));
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = load_configuration_in(
            temp_dir.path(),
            Some(temp_dir.path().join("absent.json")),
            None,
        );
        assert!(matches!(result, Err(KloggingError::IoOperation { .. })));
    }

    #[test]
    fn test_min_log_level_override() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        write_config(temp_dir.path(), DEFAULT_CONFIG_FILE, "app.log");

        let config = load_configuration_in(temp_dir.path(), None, Some("warn".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(config.klogging_min_log_level, Level::Warn);

        let result = load_configuration_in(temp_dir.path(), None, Some("LOUD".to_string()));
        assert!(matches!(
            result,
            Err(KloggingError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_load_from_missing_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = load_from_path(temp_dir.path().join("absent.json"));
        assert!(matches!(result, Err(KloggingError::IoOperation { .. })));
    }
}
