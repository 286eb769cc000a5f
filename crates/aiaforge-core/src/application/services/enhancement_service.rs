//! Enhancement Service - asks the completion service for a component list.
//!
//! Exactly one call per request, no retries. Every failure is returned as an
//! [`EnhancementError`] for the caller to record; none of them abort a build.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        EnhancementError,
        ports::{ApiKey, CompletionClient},
    },
    domain::{AppSpec, ComponentEntry, ComponentType, extract_components},
};

pub struct EnhancementService {
    client: Arc<dyn CompletionClient>,
}

impl EnhancementService {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// The single instruction prompt sent to the service.
    pub fn build_prompt(spec: &AppSpec) -> String {
        let allowed = ComponentType::ALL
            .iter()
            .map(ComponentType::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let description = if spec.prompt().is_empty() {
            "(none given)"
        } else {
            spec.prompt()
        };

        format!(
            "You are designing the single screen of an MIT App Inventor app.\n\
             App name: {name}\n\
             App type: {archetype}\n\
             Description: {description}\n\
             \n\
             Reply with JSON only, in exactly this shape:\n\
             {{\"components\": [{{\"type\": \"Button\", \"name\": \"StartButton\", \
             \"properties\": {{\"Text\": \"Start\", \"BackgroundColor\": \"#4CAF50\"}}, \
             \"children\": []}}]}}\n\
             \n\
             Allowed types: {allowed}.\n\
             Only HorizontalArrangement, VerticalArrangement and TableArrangement may have children.\n\
             Names must be unique identifiers. Colors use #RRGGBB.",
            name = spec.name(),
            archetype = spec.archetype(),
        )
    }

    #[instrument(skip_all, fields(app = %spec.name(), archetype = %spec.archetype()))]
    pub fn enhance(
        &self,
        key: Option<&ApiKey>,
        spec: &AppSpec,
    ) -> Result<Vec<ComponentEntry>, EnhancementError> {
        let result = self.try_enhance(key, spec);
        match &result {
            Ok(entries) => info!(entries = entries.len(), "AI enhancement returned components"),
            Err(e) => warn!(error = %e, "AI enhancement failed, continuing without it"),
        }
        result
    }

    fn try_enhance(
        &self,
        key: Option<&ApiKey>,
        spec: &AppSpec,
    ) -> Result<Vec<ComponentEntry>, EnhancementError> {
        let key = key.ok_or(EnhancementError::MissingCredential)?;
        let prompt = Self::build_prompt(spec);
        debug!(prompt_len = prompt.len(), "Calling completion service");

        let text = self.client.complete(key, &prompt)?;
        if text.trim().is_empty() {
            return Err(EnhancementError::MissingContent);
        }
        Ok(extract_components(&text)?)
    }
}
