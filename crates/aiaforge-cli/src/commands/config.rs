//! `aiaforge config`: read and write configuration values.

use std::path::PathBuf;

use aiaforge_core::domain::Archetype;

use crate::{
    cli::ConfigCommands,
    config::{AppConfig, KEYS},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    config_file: Option<&PathBuf>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&value)?;
        }

        ConfigCommands::Set { key, value } => {
            let path = AppConfig::active_path(config_file);
            let mut on_disk = AppConfig::load_file(&path).map_err(|e| CliError::ConfigError {
                message: format!("Failed to read '{}': {e:#}", path.display()),
                source: Some(e.into()),
            })?;
            set_config_value(&mut on_disk, &key, &value)?;

            let text = on_disk.to_toml().map_err(|e| CliError::ConfigError {
                message: format!("Failed to serialise config: {e}"),
                source: Some(Box::new(e)),
            })?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_cli_context(|| {
                    format!("Failed to create config directory '{}'", parent.display())
                })?;
            }
            std::fs::write(&path, text)
                .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))?;

            output.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised = config.to_toml().map_err(|e| CliError::ConfigError {
                message: format!("Failed to serialise config: {e}"),
                source: Some(Box::new(e)),
            })?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::active_path(config_file).display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!("Unknown config key '{key}' (known: {})", KEYS.join(", ")),
        source: None,
    }
}

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let value = match key {
        "defaults.archetype" => config.defaults.archetype.clone(),
        "defaults.enhance" => config.defaults.enhance.to_string(),
        "ai.endpoint" => config.ai.endpoint.clone(),
        "ai.model" => config.ai.model.clone(),
        "ai.timeout_secs" => config.ai.timeout_secs.to_string(),
        "ai.api_key_env" => config.ai.api_key_env.clone(),
        "output.no_color" => config.output.no_color.to_string(),
        "output.format" => config.output.format.clone(),
        "output.directory" => config
            .output
            .directory
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_default(),
        _ => return Err(unknown_key(key)),
    };
    Ok(value)
}

fn set_config_value(config: &mut AppConfig, key: &str, value: &str) -> CliResult<()> {
    let invalid = |expected: &str| CliError::InvalidInput {
        message: format!("'{value}' is not a valid value for {key} (expected {expected})"),
        source: None,
    };
    let parse_bool = || value.parse::<bool>().map_err(|_| invalid("true or false"));

    match key {
        "defaults.archetype" => {
            let archetype: Archetype = value
                .parse()
                .map_err(|e| CliError::Core(aiaforge_core::error::ForgeError::Domain(e)))?;
            config.defaults.archetype = archetype.to_string();
        }
        "defaults.enhance" => config.defaults.enhance = parse_bool()?,
        "ai.endpoint" => config.ai.endpoint = value.to_string(),
        "ai.model" => config.ai.model = value.to_string(),
        "ai.timeout_secs" => {
            config.ai.timeout_secs = value
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| invalid("a positive number of seconds"))?;
        }
        "ai.api_key_env" => config.ai.api_key_env = value.to_string(),
        "output.no_color" => config.output.no_color = parse_bool()?,
        "output.format" => match value {
            "auto" | "human" | "plain" | "json" => config.output.format = value.to_string(),
            _ => return Err(invalid("auto, human, plain or json")),
        },
        "output.directory" => {
            config.output.directory = (!value.is_empty()).then(|| PathBuf::from(value));
        }
        _ => return Err(unknown_key(key)),
    }
    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────
