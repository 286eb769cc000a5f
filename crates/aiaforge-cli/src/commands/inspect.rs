//! Implementation of the `aiaforge inspect` command.

use serde_json::{Map, Value};
use tracing::instrument;

use aiaforge_adapters::ZipPacker;
use aiaforge_core::application::{ArchiveReport, GenerateService};

use crate::{
    cli::{InspectArgs, OutputFormat},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(file = %args.file.display()))]
pub fn execute(args: InspectArgs, output: OutputManager) -> CliResult<()> {
    if !args.file.is_file() {
        return Err(CliError::FileNotFound { path: args.file });
    }
    let bytes = std::fs::read(&args.file)
        .with_cli_context(|| format!("Failed to read '{}'", args.file.display()))?;

    let service = GenerateService::new(Box::new(ZipPacker::new()));
    let report = service
        .inspect(&bytes)
        .with_cli_context(|| format!("inspecting {}", args.file.display()))?;

    if output.format() == OutputFormat::Json {
        output.json(&report_json(&report))?;
        return Ok(());
    }

    output.header(&format!("{} ({} bytes)", args.file.display(), bytes.len()))?;
    output.print("")?;
    output.print("Members:")?;
    for path in &report.paths {
        output.print(&format!("  {path}"))?;
    }

    output.print("")?;
    output.print("Project:")?;
    for key in ["name", "aname", "versionname"] {
        if let Some(value) = report.project_properties.get(key) {
            output.print(&format!("  {key:<12} {value}"))?;
        }
    }

    output.print("")?;
    output.print(&format!(
        "Components ({}):",
        report.document.component_count()
    ))?;
    output.tree(&report.document)?;

    Ok(())
}

fn report_json(report: &ArchiveReport) -> Value {
    let properties: Map<String, Value> = report
        .project_properties
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect();

    serde_json::json!({
        "members": report.paths,
        "project": properties,
        "component_count": report.document.component_count(),
        "screen": report.document.to_json(),
    })
}
