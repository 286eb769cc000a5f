//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables (`AIAFORGE__SECTION__KEY`)
//! 3. Config file (`--config FILE`, else `.aiaforge.toml`, else the user config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use aiaforge_adapters::GeminiConfig;

pub const ENV_PREFIX: &str = "AIAFORGE";
pub const LOCAL_FILE: &str = ".aiaforge.toml";

/// Every key `config get/set` understands.
pub const KEYS: &[&str] = &[
    "defaults.archetype",
    "defaults.enhance",
    "ai.endpoint",
    "ai.model",
    "ai.timeout_secs",
    "ai.api_key_env",
    "output.no_color",
    "output.format",
    "output.directory",
];

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for new projects.
    pub defaults: Defaults,
    /// AI completion service.
    pub ai: AiConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub archetype: String,
    pub enhance: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            archetype: "basic".into(),
            enhance: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        let gemini = GeminiConfig::default();
        Self {
            endpoint: gemini.endpoint,
            model: gemini.model,
            timeout_secs: gemini.timeout.as_secs(),
            api_key_env: "GEMINI_API_KEY".into(),
        }
    }
}

impl AiConfig {
    pub fn to_gemini(&self) -> GeminiConfig {
        GeminiConfig::default()
            .with_endpoint(self.endpoint.as_str())
            .with_model(self.model.as_str())
            .with_timeout(Duration::from_secs(self.timeout_secs.max(1)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
    /// Directory for generated archives when `--output` is not given.
    pub directory: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
            directory: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the active file, and the environment.
    ///
    /// An explicit `config_file` must exist; the implicit locations are optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::resolve(config_file.map(PathBuf::as_path), Some(environment()))
    }

    /// Defaults merged with a single file, environment ignored.
    ///
    /// Used by `config set` so values from the environment are never
    /// written back to disk.
    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::resolve(Some(path), None)
    }

    fn resolve(config_file: Option<&Path>, env: Option<Environment>) -> anyhow::Result<Self> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&Self::default()).context("failed to encode default config")?,
        );

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder
                .add_source(File::from(Self::config_path()).required(false))
                .add_source(File::from(Path::new(LOCAL_FILE)).required(false)),
        };

        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.aiaforge.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "aiaforge", "aiaforge")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_FILE))
    }

    /// The file `config set` writes to: explicit, else local if present,
    /// else the user file.
    pub fn active_path(config_file: Option<&PathBuf>) -> PathBuf {
        match config_file {
            Some(path) => path.clone(),
            None if Path::new(LOCAL_FILE).exists() => PathBuf::from(LOCAL_FILE),
            None => Self::config_path(),
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with(vars: &[(&str, &str)]) -> Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("aiaforge.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn default_archetype_is_basic() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.archetype, "basic");
        assert!(!cfg.defaults.enhance);
    }

    #[test]
    fn default_ai_section_matches_gemini_client() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.ai.timeout_secs, 20);
        assert_eq!(cfg.ai.api_key_env, "GEMINI_API_KEY");
        assert_eq!(cfg.ai.to_gemini(), GeminiConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[defaults]\narchetype = \"counter\"\n\n[ai]\nmodel = \"gemini-pro\"\n",
        );

        let cfg = AppConfig::resolve(Some(&path), None).unwrap();
        assert_eq!(cfg.defaults.archetype, "counter");
        assert_eq!(cfg.ai.model, "gemini-pro");
        assert_eq!(cfg.ai.timeout_secs, 20);
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[ai]\ntimeout_secs = 5\n");

        let cfg = AppConfig::resolve(
            Some(&path),
            Some(env_with(&[
                ("AIAFORGE__AI__TIMEOUT_SECS", "7"),
                ("AIAFORGE__DEFAULTS__ENHANCE", "true"),
            ])),
        )
        .unwrap();
        assert_eq!(cfg.ai.timeout_secs, 7);
        assert!(cfg.defaults.enhance);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let missing = PathBuf::from("/definitely/not/here/aiaforge.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn toml_round_trip() {
        let mut cfg = AppConfig::default();
        cfg.output.directory = Some(PathBuf::from("out"));
        let text = cfg.to_toml().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), &text);
        assert_eq!(AppConfig::load_file(&path).unwrap(), cfg);
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
