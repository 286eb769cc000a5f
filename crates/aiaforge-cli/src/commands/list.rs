//! Implementation of the `aiaforge list` command.

use serde_json::json;

use aiaforge_core::application::{ArchetypeInfo, GenerateService};

use crate::{
    cli::{ListArgs, ListFormat},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, output: OutputManager) -> CliResult<()> {
    let archetypes = GenerateService::list_archetypes();

    match args.format {
        ListFormat::Table => {
            output.header("Available Archetypes:")?;
            for info in &archetypes {
                output.print(&table_row(info))?;
            }
        }

        // JSON must stay parseable in pipes, so it is never suppressed.
        ListFormat::Json => {
            let rows: Vec<_> = archetypes
                .iter()
                .map(|a| {
                    json!({
                        "id": a.id,
                        "title": a.title,
                        "description": a.description,
                        "has_logic": a.has_logic,
                    })
                })
                .collect();
            output.json(&serde_json::Value::Array(rows))?;
        }

        ListFormat::List => {
            for a in &archetypes {
                println!("{}", a.id);
            }
        }

        ListFormat::Csv => {
            println!("id,title,has_logic,description");
            for a in &archetypes {
                println!(
                    "{},{},{},{}",
                    a.id,
                    csv_field(&a.title),
                    a.has_logic,
                    csv_field(&a.description)
                );
            }
        }
    }

    Ok(())
}

fn table_row(info: &ArchetypeInfo) -> String {
    let logic = if info.has_logic { "blocks" } else { "layout only" };
    format!(
        "  {:<11} {:<22} {:<12} {}",
        info.id, info.title, logic, info.description
    )
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
