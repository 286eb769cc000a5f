//! Domain value objects: Archetype, ComponentType, ColorLiteral, ProjectName.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity.
//! Archetype behaviour (layouts, logic, palettes) lives in `archetypes.rs`;
//! this file only defines the types, their string forms, and their parsers.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. For an archetype, add an `ArchetypeDef` in `archetypes.rs`
//! 4. Done

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Archetype ─────────────────────────────────────────────────────────────────

/// A named app template with a deterministic default component set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    #[default]
    Basic,
    Calculator,
    Counter,
    Clicker,
    /// Keyword scan over the prompt.
    #[serde(alias = "custom", alias = "keyword")]
    Generic,
}

impl Archetype {
    pub const ALL: [Archetype; 5] = [
        Self::Basic,
        Self::Calculator,
        Self::Counter,
        Self::Clicker,
        Self::Generic,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Calculator => "calculator",
            Self::Counter => "counter",
            Self::Clicker => "clicker",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Archetype {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "calculator" | "calc" => Ok(Self::Calculator),
            "counter" => Ok(Self::Counter),
            "clicker" => Ok(Self::Clicker),
            "generic" | "custom" | "keyword" => Ok(Self::Generic),
            other => Err(DomainError::UnknownArchetype(other.to_string())),
        }
    }
}

// ── ComponentType ─────────────────────────────────────────────────────────────

/// The fixed component vocabulary accepted in a generated screen.
///
/// Anything outside this list is rejected during mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    Button,
    Label,
    TextBox,
    PasswordTextBox,
    CheckBox,
    Switch,
    Slider,
    Spinner,
    DatePicker,
    Image,
    ListView,
    WebViewer,
    HorizontalArrangement,
    VerticalArrangement,
    TableArrangement,
    Notifier,
    Clock,
    TinyDB,
}

/// Which palette entry a component's default color comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    Accent,
    Text,
}

impl ComponentType {
    pub const ALL: [ComponentType; 18] = [
        Self::Button,
        Self::Label,
        Self::TextBox,
        Self::PasswordTextBox,
        Self::CheckBox,
        Self::Switch,
        Self::Slider,
        Self::Spinner,
        Self::DatePicker,
        Self::Image,
        Self::ListView,
        Self::WebViewer,
        Self::HorizontalArrangement,
        Self::VerticalArrangement,
        Self::TableArrangement,
        Self::Notifier,
        Self::Clock,
        Self::TinyDB,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "Button",
            Self::Label => "Label",
            Self::TextBox => "TextBox",
            Self::PasswordTextBox => "PasswordTextBox",
            Self::CheckBox => "CheckBox",
            Self::Switch => "Switch",
            Self::Slider => "Slider",
            Self::Spinner => "Spinner",
            Self::DatePicker => "DatePicker",
            Self::Image => "Image",
            Self::ListView => "ListView",
            Self::WebViewer => "WebViewer",
            Self::HorizontalArrangement => "HorizontalArrangement",
            Self::VerticalArrangement => "VerticalArrangement",
            Self::TableArrangement => "TableArrangement",
            Self::Notifier => "Notifier",
            Self::Clock => "Clock",
            Self::TinyDB => "TinyDB",
        }
    }

    /// `$Version` written next to `$Type` in the screen definition.
    pub const fn schema_version(&self) -> &'static str {
        match self {
            Self::Button => "5",
            Self::Label => "4",
            Self::TextBox => "6",
            Self::PasswordTextBox => "5",
            Self::CheckBox => "2",
            Self::Switch => "1",
            Self::Slider => "2",
            Self::Spinner => "1",
            Self::DatePicker => "3",
            Self::Image => "4",
            Self::ListView => "6",
            Self::WebViewer => "10",
            Self::HorizontalArrangement => "4",
            Self::VerticalArrangement => "4",
            Self::TableArrangement => "1",
            Self::Notifier => "6",
            Self::Clock => "4",
            Self::TinyDB => "2",
        }
    }

    pub const fn is_container(&self) -> bool {
        matches!(
            self,
            Self::HorizontalArrangement | Self::VerticalArrangement | Self::TableArrangement
        )
    }

    /// Non-visible components sit below the screen and take no geometry.
    pub const fn is_visible(&self) -> bool {
        !matches!(self, Self::Notifier | Self::Clock | Self::TinyDB)
    }

    /// The color property that receives a palette default, if any.
    pub const fn color_property(&self) -> Option<(&'static str, ColorRole)> {
        match self {
            Self::Button => Some(("BackgroundColor", ColorRole::Accent)),
            Self::Label | Self::TextBox | Self::PasswordTextBox => {
                Some(("TextColor", ColorRole::Text))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = DomainError;

    /// Case-insensitive match against the vocabulary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::UnknownComponentType(wanted.to_string()))
    }
}

// ── ColorLiteral ──────────────────────────────────────────────────────────────

/// Color in App Inventor's `&HAARRGGBB` notation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorLiteral(String);

impl ColorLiteral {
    /// Parse a web color (`#RRGGBB` or `#AARRGGBB`) or an existing `&H` literal.
    ///
    /// The alpha channel is always forced to `FF`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let hex = if let Some(rest) = input.strip_prefix('#') {
            rest
        } else if let Some(rest) = input.strip_prefix("&H").or_else(|| input.strip_prefix("&h")) {
            rest
        } else {
            return None;
        };

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let rgb = match hex.len() {
            6 => hex,
            8 => &hex[2..],
            _ => return None,
        };
        Some(Self(format!("&HFF{}", rgb.to_ascii_uppercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColorLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── ProjectName ───────────────────────────────────────────────────────────────

/// The human-entered app name plus its archive-safe form.
///
/// `display` keeps the original text for `AppName`, `Title`, and `aname`;
/// `clean` is used in every archive path and in `main=`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName {
    display: String,
    clean: String,
}

impl ProjectName {
    pub const FALLBACK: &'static str = "MyApp";

    /// Control characters become spaces: `display` lands in the line-based
    /// `project.properties` file.
    pub fn new(display: impl Into<String>) -> Result<Self, DomainError> {
        let display: String = display
            .into()
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        let display = display.trim().to_string();
        if display.is_empty() {
            return Err(DomainError::MissingAppName);
        }
        let clean = sanitize(&display);
        Ok(Self { display, clean })
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn clean(&self) -> &str {
        &self.clean
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Keep ASCII letters and digits; the token must start with a letter.
fn sanitize(display: &str) -> String {
    let kept: String = display.chars().filter(char::is_ascii_alphanumeric).collect();
    match kept.chars().next() {
        None => ProjectName::FALLBACK.to_string(),
        Some(first) if first.is_ascii_digit() => format!("App{kept}"),
        Some(_) => kept,
    }
}
