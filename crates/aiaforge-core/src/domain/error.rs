// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so they can travel inside notes and reports)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Input Errors (400-level equivalent)
    // ========================================================================
    #[error("App name is required")]
    MissingAppName,

    #[error("Unknown archetype '{0}'")]
    UnknownArchetype(String),

    // ========================================================================
    // Component model violations
    // ========================================================================
    #[error("Unknown component type '{0}'")]
    UnknownComponentType(String),

    #[error("Duplicate component name: {name}")]
    DuplicateComponentName { name: String },

    #[error("Component '{name}' of type {component_type} cannot hold children")]
    ChildrenOnLeaf {
        name: String,
        component_type: String,
    },

    #[error("Archetype '{archetype}' produced no components")]
    EmptyComponentTree { archetype: String },

    #[error("Archetype '{archetype}' is not registered")]
    UnregisteredArchetype { archetype: String },

    #[error("Invalid block graph: {0}")]
    InvalidBlockGraph(String),

    // ========================================================================
    // Archive layout / serialization
    // ========================================================================
    #[error("Duplicate path in archive: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Archive is missing required member: {path}")]
    MissingArchiveMember { path: String },

    #[error("Failed to encode {member}: {reason}")]
    Encoding { member: String, reason: String },

    #[error("Malformed screen definition: {0}")]
    MalformedScreenDefinition(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingAppName => vec![
                "Provide a non-empty app name".into(),
                "Example: aiaforge new \"My App\" --archetype basic".into(),
            ],
            Self::UnknownArchetype(given) => vec![
                format!("'{}' is not a known archetype", given),
                "Available: basic, calculator, counter, clicker, generic".into(),
                "Try: aiaforge list".into(),
            ],
            Self::UnknownComponentType(given) => vec![
                format!("'{}' is not in the component vocabulary", given),
                "Components must use App Inventor type names such as Button or Label".into(),
            ],
            Self::EmptyComponentTree { archetype } | Self::UnregisteredArchetype { archetype } => {
                vec![
                    format!("The '{}' archetype is misconfigured", archetype),
                    "Please report this issue or pick a different archetype".into(),
                ]
            }
            Self::MalformedScreenDefinition(_) => vec![
                "The file does not look like an App Inventor screen definition".into(),
                "Check that the archive was produced by App Inventor or aiaforge".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingAppName | Self::UnknownArchetype(_) => ErrorCategory::Validation,
            Self::UnknownComponentType(_) | Self::MalformedScreenDefinition(_) => {
                ErrorCategory::Validation
            }
            Self::MissingArchiveMember { .. } => ErrorCategory::NotFound,
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}

/// A single AI-sourced component entry that could not be mapped.
///
/// Never fatal: the entry is dropped and the rest of the tree is built.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("component entry #{index}: {failure}")]
pub struct ComponentMappingError {
    /// Position of the entry in its list (depth-first for nested lists).
    pub index: usize,
    pub name: Option<String>,
    pub failure: MappingFailure,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MappingFailure {
    #[error("entry is not a JSON object")]
    NotAnObject,

    #[error("missing component type")]
    MissingType,

    #[error("unknown component type '{0}'")]
    UnknownType(String),

    #[error("{component_type} cannot hold children; nested entries dropped")]
    ChildrenOnLeaf { component_type: String },
}
