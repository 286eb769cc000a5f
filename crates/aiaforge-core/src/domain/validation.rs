use crate::domain::{
    entities::{AppSpec, ArchiveLayout, BlocksWorkspace, ProjectDocument},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_app_spec(spec: &AppSpec) -> Result<(), DomainError> {
        spec.validate()
    }

    pub fn validate_document(doc: &ProjectDocument) -> Result<(), DomainError> {
        if doc.components.is_empty() {
            return Err(DomainError::EmptyComponentTree {
                archetype: "unknown".into(),
            });
        }
        doc.validate()
    }

    pub fn validate_blocks(workspace: &BlocksWorkspace) -> Result<(), DomainError> {
        workspace.validate()
    }

    pub fn validate_layout(layout: &ArchiveLayout) -> Result<(), DomainError> {
        layout.validate()
    }
}
