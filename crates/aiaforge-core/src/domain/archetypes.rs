//! Archetype registry.
//!
//! Each archetype is described exactly once by an [`ArchetypeDef`]: its
//! palette, its default component layout, and (optionally) the block logic
//! that wires that layout together. The tree builder and the blocks
//! generator both dispatch through [`ARCHETYPE_REGISTRY`].
//!
//! # Adding a New Archetype
//!
//! 1. Add a variant to `Archetype` in `value_objects.rs`
//! 2. Add one [`ArchetypeDef`] entry to [`ARCHETYPE_REGISTRY`]
//! 3. No other files change

use crate::domain::blocks_generator::dsl;
use crate::domain::entities::{BlockNode, ComponentNode};
use crate::domain::value_objects::{Archetype, ColorRole, ComponentType, ProjectName};

/// Default colors applied to components that do not set their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Button background.
    pub accent: &'static str,
    /// Label and text box foreground.
    pub text: &'static str,
}

impl Palette {
    pub const fn color(&self, role: ColorRole) -> &'static str {
        match role {
            ColorRole::Accent => self.accent,
            ColorRole::Text => self.text,
        }
    }
}

/// Inputs a layout may draw on.
#[derive(Debug, Clone, Copy)]
pub struct LayoutInput<'a> {
    pub name: &'a ProjectName,
    pub prompt: &'a str,
}

/// Block logic for an archetype's default layout.
#[derive(Debug, Clone, Copy)]
pub struct LogicTemplate {
    /// Components (name, type) the handlers refer to. If any is missing from
    /// the tree, no logic is emitted.
    pub requires: &'static [(&'static str, ComponentType)],

    /// Top-level handlers, in canvas order.
    pub build: fn() -> Vec<BlockNode>,
}

#[derive(Debug, Clone, Copy)]
pub struct ArchetypeDef {
    pub archetype: Archetype,
    pub title: &'static str,
    pub description: &'static str,
    pub palette: Palette,
    pub layout: fn(LayoutInput<'_>) -> Vec<ComponentNode>,
    pub logic: Option<LogicTemplate>,
}

pub static ARCHETYPE_REGISTRY: &[ArchetypeDef] = &[
    ArchetypeDef {
        archetype: Archetype::Basic,
        title: "Basic app",
        description: "Welcome label, one action button, and a status line",
        palette: Palette {
            accent: "&HFF4CAF50",
            text: "&HFF212121",
        },
        layout: basic_layout,
        logic: Some(LogicTemplate {
            requires: &[
                ("ActionButton", ComponentType::Button),
                ("StatusLabel", ComponentType::Label),
            ],
            build: basic_logic,
        }),
    },
    ArchetypeDef {
        archetype: Archetype::Calculator,
        title: "Calculator",
        description: "Display plus a 4x4 keypad of digits and operators",
        palette: Palette {
            accent: "&HFFE0E0E0",
            text: "&HFF212121",
        },
        layout: calculator_layout,
        logic: Some(LogicTemplate {
            requires: &[
                ("ButtonClear", ComponentType::Button),
                ("DisplayLabel", ComponentType::Label),
            ],
            build: calculator_logic,
        }),
    },
    ArchetypeDef {
        archetype: Archetype::Counter,
        title: "Counter",
        description: "Count up, count down, and reset",
        palette: Palette {
            accent: "&HFF4CAF50",
            text: "&HFF212121",
        },
        layout: counter_layout,
        logic: Some(LogicTemplate {
            requires: &[
                ("CounterLabel", ComponentType::Label),
                ("IncrementButton", ComponentType::Button),
                ("DecrementButton", ComponentType::Button),
                ("ResetButton", ComponentType::Button),
            ],
            build: counter_logic,
        }),
    },
    ArchetypeDef {
        archetype: Archetype::Clicker,
        title: "Clicker game",
        description: "Tap the button to raise the score",
        palette: Palette {
            accent: "&HFF2196F3",
            text: "&HFF212121",
        },
        layout: clicker_layout,
        logic: Some(LogicTemplate {
            requires: &[
                ("ClickButton", ComponentType::Button),
                ("ScoreLabel", ComponentType::Label),
            ],
            build: clicker_logic,
        }),
    },
    ArchetypeDef {
        archetype: Archetype::Generic,
        title: "Generic",
        description: "Title plus components picked from keywords in the prompt",
        palette: Palette {
            accent: "&HFF3F51B5",
            text: "&HFF212121",
        },
        layout: generic_layout,
        logic: None,
    },
];

pub fn find_archetype(archetype: Archetype) -> Option<&'static ArchetypeDef> {
    ARCHETYPE_REGISTRY.iter().find(|d| d.archetype == archetype)
}

// ── Layouts ──────────────────────────────────────────────────────────────────

fn label(name: &str, text: impl Into<String>) -> ComponentNode {
    ComponentNode::new(name, ComponentType::Label).with_property("Text", text)
}

fn button(name: &str, text: impl Into<String>) -> ComponentNode {
    ComponentNode::new(name, ComponentType::Button).with_property("Text", text)
}

fn basic_layout(input: LayoutInput<'_>) -> Vec<ComponentNode> {
    vec![
        label("WelcomeLabel", format!("Welcome to {}!", input.name.display()))
            .with_property("FontSize", "20")
            .with_property("TextAlignment", "1")
            .with_property("Width", "-2")
            .with_property("Height", "80"),
        button("ActionButton", "Click Me")
            .with_property("FontSize", "18")
            .with_property("BackgroundColor", "&HFF4CAF50")
            .with_property("TextColor", "&HFFFFFFFF")
            .with_property("Height", "60"),
        label("StatusLabel", "Ready")
            .with_property("FontSize", "16")
            .with_property("TextAlignment", "1")
            .with_property("Height", "40")
            .with_property("BackgroundColor", "&HFFF5F5F5"),
    ]
}

/// Row-major keypad: (text, component name).
const KEYPAD: [(&str, &str); 16] = [
    ("7", "Button7"),
    ("8", "Button8"),
    ("9", "Button9"),
    ("/", "ButtonDivide"),
    ("4", "Button4"),
    ("5", "Button5"),
    ("6", "Button6"),
    ("*", "ButtonMultiply"),
    ("1", "Button1"),
    ("2", "Button2"),
    ("3", "Button3"),
    ("-", "ButtonMinus"),
    ("0", "Button0"),
    ("C", "ButtonClear"),
    ("=", "ButtonEquals"),
    ("+", "ButtonPlus"),
];
const KEYPAD_COLUMNS: usize = 4;

fn calculator_layout(_: LayoutInput<'_>) -> Vec<ComponentNode> {
    let display = label("DisplayLabel", "0")
        .with_property("FontSize", "24")
        .with_property("TextAlignment", "2")
        .with_property("BackgroundColor", "&HFFF5F5F5")
        .with_property("Height", "80");

    let mut grid = ComponentNode::new("ButtonGrid", ComponentType::TableArrangement)
        .with_property("Columns", KEYPAD_COLUMNS.to_string())
        .with_property("Rows", (KEYPAD.len() / KEYPAD_COLUMNS).to_string());

    grid.children = KEYPAD
        .iter()
        .enumerate()
        .map(|(i, (text, name))| {
            let key = ComponentNode::new(*name, ComponentType::Button)
                .with_property("Column", (i % KEYPAD_COLUMNS).to_string())
                .with_property("Row", (i / KEYPAD_COLUMNS).to_string())
                .with_property("Text", *text)
                .with_property("FontSize", "18")
                .with_property("Width", "80")
                .with_property("Height", "60");
            if text.chars().all(|c| c.is_ascii_digit()) {
                key
            } else {
                key.with_property("BackgroundColor", "&HFFFFA500")
            }
        })
        .collect();

    vec![display, grid]
}

fn counter_layout(_: LayoutInput<'_>) -> Vec<ComponentNode> {
    vec![
        label("CounterLabel", "0")
            .with_property("FontSize", "36")
            .with_property("TextAlignment", "1")
            .with_property("Height", "100")
            .with_property("BackgroundColor", "&HFFF0F0F0"),
        button("IncrementButton", "+1")
            .with_property("FontSize", "20")
            .with_property("BackgroundColor", "&HFF4CAF50")
            .with_property("TextColor", "&HFFFFFFFF")
            .with_property("Width", "120")
            .with_property("Height", "60"),
        button("DecrementButton", "-1")
            .with_property("FontSize", "20")
            .with_property("BackgroundColor", "&HFFF44336")
            .with_property("TextColor", "&HFFFFFFFF")
            .with_property("Width", "120")
            .with_property("Height", "60"),
        button("ResetButton", "Reset")
            .with_property("FontSize", "16")
            .with_property("BackgroundColor", "&HFF9E9E9E")
            .with_property("Width", "120")
            .with_property("Height", "50"),
    ]
}

fn clicker_layout(_: LayoutInput<'_>) -> Vec<ComponentNode> {
    vec![
        label("ScoreLabel", "Score: 0")
            .with_property("FontSize", "24")
            .with_property("TextAlignment", "1")
            .with_property("Height", "60"),
        button("ClickButton", "Click Me!")
            .with_property("FontSize", "20")
            .with_property("BackgroundColor", "&HFF2196F3")
            .with_property("TextColor", "&HFFFFFFFF")
            .with_property("Width", "200")
            .with_property("Height", "100"),
    ]
}

/// Keyword groups, in the order their components are added.
const KEYWORDS: [(&[&str], ComponentType, &str); 5] = [
    (&["button"], ComponentType::Button, "Button"),
    (&["label", "text"], ComponentType::Label, "Text"),
    (&["textbox", "input"], ComponentType::TextBox, "Enter text"),
    (&["image", "picture", "photo"], ComponentType::Image, ""),
    (&["list"], ComponentType::ListView, ""),
];

fn generic_layout(input: LayoutInput<'_>) -> Vec<ComponentNode> {
    let words: Vec<String> = input
        .prompt
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let w = w.to_ascii_lowercase();
            match w.strip_suffix('s') {
                Some(singular) if singular.len() > 2 => singular.to_string(),
                _ => w,
            }
        })
        .collect();

    let mut components = vec![
        label("TitleLabel", input.name.display())
            .with_property("FontSize", "22")
            .with_property("TextAlignment", "1"),
    ];

    for (keywords, component_type, text) in KEYWORDS {
        if !keywords.iter().any(|k| words.iter().any(|w| w == k)) {
            continue;
        }
        let node = ComponentNode::new(format!("{component_type}1"), component_type);
        let node = match component_type {
            ComponentType::Button | ComponentType::Label => node.with_property("Text", text),
            ComponentType::TextBox => node.with_property("Hint", text),
            _ => node,
        };
        components.push(node);
    }
    components
}

// ── Logic ────────────────────────────────────────────────────────────────────

fn basic_logic() -> Vec<BlockNode> {
    vec![dsl::on_event(
        "Button",
        "ActionButton",
        "Click",
        dsl::set_property("Label", "StatusLabel", "Text", dsl::text("Button clicked!")),
    )]
}

fn calculator_logic() -> Vec<BlockNode> {
    vec![dsl::on_event(
        "Button",
        "ButtonClear",
        "Click",
        dsl::set_property("Label", "DisplayLabel", "Text", dsl::text("0")),
    )]
}

fn counter_logic() -> Vec<BlockNode> {
    let step = |op: &str| {
        dsl::set_global(
            "count",
            dsl::math(op, dsl::get_global("count"), dsl::number("1")),
        )
        .slot("NEXT", show_count())
    };

    vec![
        dsl::global_declaration("count", dsl::number("0")),
        dsl::on_event("Button", "IncrementButton", "Click", step("math_add")),
        dsl::on_event("Button", "DecrementButton", "Click", step("math_subtract")),
        dsl::on_event(
            "Button",
            "ResetButton",
            "Click",
            dsl::set_global("count", dsl::number("0")).slot("NEXT", show_count()),
        ),
    ]
}

fn show_count() -> BlockNode {
    dsl::set_property("Label", "CounterLabel", "Text", dsl::get_global("count"))
}

fn clicker_logic() -> Vec<BlockNode> {
    vec![
        dsl::global_declaration("score", dsl::number("0")),
        dsl::on_event(
            "Button",
            "ClickButton",
            "Click",
            dsl::set_global(
                "score",
                dsl::math("math_add", dsl::get_global("score"), dsl::number("1")),
            )
            .slot(
                "NEXT",
                dsl::set_property(
                    "Label",
                    "ScoreLabel",
                    "Text",
                    dsl::join(dsl::text("Score: "), dsl::get_global("score")),
                ),
            ),
        ),
    ]
}
