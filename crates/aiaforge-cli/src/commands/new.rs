//! Implementation of the `aiaforge new` command.
//!
//! Responsibility: translate CLI arguments into an `AppSpec`, wire the
//! adapters, call the core generate service, and write the archive. No build
//! rules live here.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, instrument};

use aiaforge_adapters::{GeminiClient, InMemoryCredentialStore, ZipPacker};
use aiaforge_core::{
    application::{ApiKey, CredentialStore, GenerateService, GeneratedArchive, SessionId},
    domain::{AppSpec, Archetype},
};

use crate::{
    cli::{NewArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `aiaforge new` command.
///
/// Dispatch sequence:
/// 1. Build and validate the `AppSpec` (flags over config defaults)
/// 2. Resolve the output path and check for an existing file
/// 3. Wire adapters (AI client only when enhancing)
/// 4. Generate, with a spinner while the AI call is in flight
/// 5. Report notes, then write (or just show, for `--dry-run`)
#[instrument(skip_all, fields(app = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Spec
    let spec = build_spec(&args, &config)?;
    let clean = spec.project_name()?.clean().to_string();
    debug!(
        archetype = %spec.archetype(),
        enhance = spec.enhance(),
        clean_name = %clean,
        "Spec resolved"
    );

    // 2. Output path
    let path = resolve_output_path(args.output.as_deref(), &config, &clean);
    if !args.dry_run && path.exists() && !args.force && !args.yes {
        if global.quiet || !std::io::stdin().is_terminal() {
            return Err(CliError::OutputExists { path });
        }
        if !confirm_overwrite(&path)? {
            return Err(CliError::Cancelled);
        }
    }

    // 3. Adapters
    let (service, session) = build_service(&spec, &args, &config)?;

    // 4. Generate
    let spinner = spec
        .enhance()
        .then(|| start_spinner(&output, "Asking the AI service for a layout..."));
    let result = service.generate_for_session(&spec, &session);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let archive = result?;

    // 5. Report
    for note in &archive.notes {
        output.warning(&note.to_string())?;
    }

    if args.dry_run {
        output.info(&format!(
            "Dry run: would write {} ({} bytes) to {}",
            archive.file_name,
            archive.bytes.len(),
            path.display()
        ))?;
        output.tree(&archive.document)?;
        return Ok(());
    }

    write_archive(&path, &archive)?;
    info!(path = %path.display(), bytes = archive.bytes.len(), "Archive written");

    output.success(&format!(
        "Created {} ({} components from {})",
        path.display(),
        archive.component_count,
        archive.source
    ))?;
    if !output.is_quiet() {
        output.print("")?;
        output.print("Next steps:")?;
        output.print("  Open https://ai2.appinventor.mit.edu and choose")?;
        output.print(&format!(
            "  Projects > Import project (.aia) > {}",
            archive.file_name
        ))?;
    }

    Ok(())
}

// ── Spec construction ─────────────────────────────────────────────────────────

fn build_spec(args: &NewArgs, config: &AppConfig) -> CliResult<AppSpec> {
    let archetype = match args.archetype {
        Some(archetype) => archetype.into(),
        None => config
            .defaults
            .archetype
            .parse::<Archetype>()
            .map_err(|e| CliError::ConfigError {
                message: format!("defaults.archetype: {e}"),
                source: Some(Box::new(e)),
            })?,
    };

    let spec = AppSpec::builder()
        .name(args.name.as_str())
        .archetype(archetype)
        .prompt(args.prompt.as_str())
        .enhance(args.enhance || config.defaults.enhance)
        .build()?;
    Ok(spec)
}

/// `--output` wins; otherwise `{clean}.aia` in `output.directory` or the CWD.
fn resolve_output_path(explicit: Option<&Path>, config: &AppConfig, clean: &str) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let file_name = format!("{clean}.aia");
            match &config.output.directory {
                Some(dir) => dir.join(file_name),
                None => PathBuf::from(file_name),
            }
        }
    }
}

/// `--api-key`, else the variable named by `ai.api_key_env`.
fn resolve_api_key(args: &NewArgs, config: &AppConfig) -> Option<ApiKey> {
    pick_api_key(args.api_key.as_deref(), || {
        std::env::var(&config.ai.api_key_env).ok()
    })
}

/// A blank flag counts as absent.
fn pick_api_key(flag: Option<&str>, env: impl FnOnce() -> Option<String>) -> Option<ApiKey> {
    flag.and_then(ApiKey::new)
        .or_else(|| env().and_then(ApiKey::new))
}

// ── Wiring ────────────────────────────────────────────────────────────────────

/// The session only lives for this invocation. Without a key the service
/// records the enhancement as skipped.
fn build_service(
    spec: &AppSpec,
    args: &NewArgs,
    config: &AppConfig,
) -> CliResult<(GenerateService, SessionId)> {
    let session = SessionId::generate();
    let service = GenerateService::new(Box::new(ZipPacker::new()));
    if !spec.enhance() {
        return Ok((service, session));
    }

    let store = InMemoryCredentialStore::new();
    if let Some(key) = resolve_api_key(args, config) {
        store.store(&session, key)?;
    }
    let client = GeminiClient::new(config.ai.to_gemini())?;
    debug!(model = %client.config().model, "AI enhancement enabled");

    Ok((
        service.with_enhancement(Arc::new(client), Arc::new(store)),
        session,
    ))
}

// ── I/O helpers ───────────────────────────────────────────────────────────────

fn write_archive(path: &Path, archive: &GeneratedArchive) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    std::fs::write(path, &archive.bytes)
        .with_cli_context(|| format!("Failed to write archive to '{}'", path.display()))
}

fn start_spinner(output: &OutputManager, message: &'static str) -> ProgressBar {
    if output.is_quiet() {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(feature = "interactive")]
fn confirm_overwrite(path: &Path) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(format!("{} already exists. Overwrite?", path.display()))
        .default(false)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: format!("confirmation failed: {e}"),
            source: Some(Box::new(e)),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm_overwrite(path: &Path) -> CliResult<bool> {
    Err(CliError::OutputExists {
        path: path.to_path_buf(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
