//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use aiaforge_core::domain::Archetype as CoreArchetype;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "aiaforge",
    bin_name = "aiaforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Generate MIT App Inventor projects (.aia)",
    long_about = "aiaforge builds ready-to-import MIT App Inventor project archives \
                  from an app name, an archetype, and an optional description. \
                  With --enhance, an AI service proposes the screen layout.",
    after_help = "EXAMPLES:\n\
        \x20 aiaforge new \"Tip Calculator\" --archetype calculator\n\
        \x20 aiaforge new Notes --archetype generic --prompt \"a list and an input box\"\n\
        \x20 aiaforge inspect Notes.aia\n\
        \x20 aiaforge completions bash > /usr/share/bash-completion/completions/aiaforge",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new .aia project archive.
    #[command(
        visible_alias = "n",
        about = "Generate a new project archive",
        after_help = "EXAMPLES:\n\
            \x20 aiaforge new Counter --archetype counter\n\
            \x20 aiaforge new Shop --archetype generic --prompt \"a shopping list\" --enhance\n\
            \x20 aiaforge new Calc --archetype calc --output build/calc.aia --force"
    )]
    New(NewArgs),

    /// List available archetypes.
    #[command(
        visible_alias = "ls",
        about = "List available archetypes",
        after_help = "EXAMPLES:\n\
            \x20 aiaforge list\n\
            \x20 aiaforge list --format json"
    )]
    List(ListArgs),

    /// Show what an existing archive contains.
    #[command(
        about = "Inspect an .aia archive",
        after_help = "EXAMPLES:\n\
            \x20 aiaforge inspect MyApp.aia\n\
            \x20 aiaforge --output-format json inspect MyApp.aia"
    )]
    Inspect(InspectArgs),

    /// Initialise an aiaforge configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 aiaforge init           # default location\n\
            \x20 aiaforge init --local   # .aiaforge.toml in CWD"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 aiaforge completions bash > ~/.local/share/bash-completion/completions/aiaforge\n\
            \x20 aiaforge completions zsh  > ~/.zfunc/_aiaforge\n\
            \x20 aiaforge completions fish > ~/.config/fish/completions/aiaforge.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the aiaforge configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 aiaforge config get ai.model\n\
            \x20 aiaforge config set defaults.archetype counter\n\
            \x20 aiaforge config list"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `aiaforge new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// App name as shown to users. The archive and package names are
    /// derived from it.
    #[arg(value_name = "NAME", help = "App name")]
    pub name: String,

    /// App archetype (defaults to `defaults.archetype` from config).
    #[arg(
        short = 'a',
        long = "archetype",
        value_name = "ARCHETYPE",
        value_enum,
        help = "App archetype"
    )]
    pub archetype: Option<Archetype>,

    /// Free-text description of the app.
    #[arg(
        short = 'p',
        long = "prompt",
        value_name = "TEXT",
        default_value = "",
        hide_default_value = true,
        help = "Describe the app (used by generic and --enhance)"
    )]
    pub prompt: String,

    /// Ask the AI service for the component layout.
    #[arg(short = 'e', long = "enhance", help = "Use AI to design the screen")]
    pub enhance: bool,

    /// API key for the AI service. Falls back to the variable named by
    /// `ai.api_key_env`.
    #[arg(
        long = "api-key",
        value_name = "KEY",
        help = "API key for --enhance"
    )]
    pub api_key: Option<String>,

    /// Where to write the archive.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output file (default: <name>.aia)"
    )]
    pub output: Option<PathBuf>,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Overwrite without asking")]
    pub yes: bool,

    /// Overwrite an existing archive (destructive).
    #[arg(long = "force", help = "Overwrite an existing file")]
    pub force: bool,

    /// Build the project and show it without writing anything.
    #[arg(long = "dry-run", help = "Show the component tree without writing")]
    pub dry_run: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `aiaforge list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── inspect ───────────────────────────────────────────────────────────────────

/// Arguments for `aiaforge inspect`.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Archive to read.
    #[arg(value_name = "FILE", help = "Path to an .aia archive")]
    pub file: PathBuf,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `aiaforge init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.aiaforge.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `aiaforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `aiaforge config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `ai.model`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Archetypes accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Archetype {
    Basic,
    /// Also accepted as `calc`.
    #[value(alias = "calc")]
    Calculator,
    Counter,
    Clicker,
    /// Also accepted as `custom` or `keyword`.
    #[value(alias = "custom", alias = "keyword")]
    Generic,
}

impl From<Archetype> for CoreArchetype {
    fn from(archetype: Archetype) -> Self {
        match archetype {
            Archetype::Basic => CoreArchetype::Basic,
            Archetype::Calculator => CoreArchetype::Calculator,
            Archetype::Counter => CoreArchetype::Counter,
            Archetype::Clicker => CoreArchetype::Clicker,
            Archetype::Generic => CoreArchetype::Generic,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn every_core_archetype_is_reachable() {
        for core in CoreArchetype::ALL {
            let parsed = Archetype::from_str(core.as_str(), true).unwrap();
            assert_eq!(CoreArchetype::from(parsed), core);
        }
    }

    #[test]
    fn parse_new_command() {
        let cli = Cli::parse_from([
            "aiaforge",
            "new",
            "My App",
            "--archetype",
            "counter",
            "--prompt",
            "count things",
        ]);
        match cli.command {
            Commands::New(args) => {
                assert_eq!(args.name, "My App");
                assert_eq!(args.archetype, Some(Archetype::Counter));
                assert_eq!(args.prompt, "count things");
                assert!(!args.enhance);
            }
            other => panic!("expected New command, got {other:?}"),
        }
    }

    #[test]
    fn archetype_aliases() {
        for (alias, expected) in [
            ("calc", Archetype::Calculator),
            ("custom", Archetype::Generic),
            ("keyword", Archetype::Generic),
        ] {
            let cli = Cli::parse_from(["aiaforge", "new", "x", "-a", alias]);
            if let Commands::New(args) = cli.command {
                assert_eq!(args.archetype, Some(expected));
            } else {
                panic!("expected New command");
            }
        }
    }

    #[test]
    fn unknown_archetype_is_rejected() {
        let result = Cli::try_parse_from(["aiaforge", "new", "x", "--archetype", "spaceship"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        // clap should reject --quiet --verbose together
        let result = Cli::try_parse_from(["aiaforge", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
