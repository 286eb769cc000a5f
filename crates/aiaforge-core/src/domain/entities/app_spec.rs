use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::value_objects::{Archetype, ProjectName};

/// What the caller asked for. Immutable once built.
///
/// Deserialization does not validate; `validate` (called by the generate
/// use case) does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSpec {
    name: String,
    #[serde(default)]
    archetype: Archetype,
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    enhance: bool,
}

impl AppSpec {
    pub fn builder() -> AppSpecBuilder {
        AppSpecBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn enhance(&self) -> bool {
        self.enhance
    }

    pub fn project_name(&self) -> Result<ProjectName, DomainError> {
        ProjectName::new(self.name.as_str())
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.project_name().map(|_| ())
    }
}

#[derive(Debug, Default)]
pub struct AppSpecBuilder {
    name: Option<String>,
    archetype: Archetype,
    prompt: String,
    enhance: bool,
}

impl AppSpecBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn archetype(mut self, archetype: Archetype) -> Self {
        self.archetype = archetype;
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into().trim().to_string();
        self
    }

    pub fn enhance(mut self, enhance: bool) -> Self {
        self.enhance = enhance;
        self
    }

    pub fn build(self) -> Result<AppSpec, DomainError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(DomainError::MissingAppName)?;

        Ok(AppSpec {
            name,
            archetype: self.archetype,
            prompt: self.prompt,
            enhance: self.enhance,
        })
    }
}
