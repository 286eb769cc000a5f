//! Generate Service - main application orchestrator.
//!
//! This service coordinates the entire generation workflow:
//! 1. Validate the `AppSpec`
//! 2. Optionally ask the AI service for a component list
//! 3. Build the component tree (AI output or archetype template)
//! 4. Build the block workspace
//! 5. Serialize and pack the archive
//!
//! Only steps 1, 3, 4 and 5 can fail the request.

use std::fmt;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError, EnhancementError, EnhancementService,
        ports::{ApiKey, ArchivePacker, CompletionClient, CredentialStore, SessionId},
    },
    domain::{
        ARCHETYPE_REGISTRY, AppSpec, ArchiveSerializer, BlocksWorkspaceGenerator,
        ComponentMappingError, ComponentTreeBuilder, DomainValidator as validator, LogicalMember,
        ProjectDocument, PropertyMap, TreeSource, parse_project_properties,
        parse_screen_definition,
    },
    error::{ForgeError, ForgeResult},
};

/// Information about an archetype for display purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchetypeInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub has_logic: bool,
}

/// Something worth telling the user that did not stop the build.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationNote {
    Enhancement(EnhancementError),
    ComponentDropped(ComponentMappingError),
    /// AI entries were returned but none could be used.
    TemplateFallback { dropped: usize },
}

impl fmt::Display for GenerationNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enhancement(e) => write!(f, "AI enhancement skipped: {e}"),
            Self::ComponentDropped(e) => write!(f, "Dropped AI {e}"),
            Self::TemplateFallback { dropped } => write!(
                f,
                "None of the {dropped} AI components were usable; used the archetype template"
            ),
        }
    }
}

/// A finished archive, ready to be written by the caller.
#[derive(Debug, Clone)]
pub struct GeneratedArchive {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub source: TreeSource,
    pub component_count: usize,
    pub document: ProjectDocument,
    pub notes: Vec<GenerationNote>,
}

/// What an existing archive contains.
#[derive(Debug, Clone)]
pub struct ArchiveReport {
    pub paths: Vec<String>,
    pub project_properties: PropertyMap,
    pub document: ProjectDocument,
}

type KeyLookup = Result<Option<ApiKey>, EnhancementError>;

struct Enhancement {
    service: EnhancementService,
    credentials: Arc<dyn CredentialStore>,
}

/// Main generation service.
pub struct GenerateService {
    packer: Box<dyn ArchivePacker>,
    enhancement: Option<Enhancement>,
}

impl GenerateService {
    /// Create a service that packs with `packer` and never calls out.
    pub fn new(packer: Box<dyn ArchivePacker>) -> Self {
        Self {
            packer,
            enhancement: None,
        }
    }

    /// Enable AI enhancement for specs that ask for it.
    pub fn with_enhancement(
        mut self,
        client: Arc<dyn CompletionClient>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        self.enhancement = Some(Enhancement {
            service: EnhancementService::new(client),
            credentials,
        });
        self
    }

    /// Generate without a session. Enhancement, if requested, has no
    /// credential and is recorded as skipped.
    pub fn generate(&self, spec: &AppSpec) -> ForgeResult<GeneratedArchive> {
        self.run(spec, Ok(None))
    }

    /// Generate using the API key stored for `session`.
    pub fn generate_for_session(
        &self,
        spec: &AppSpec,
        session: &SessionId,
    ) -> ForgeResult<GeneratedArchive> {
        let key = match (&self.enhancement, spec.enhance()) {
            (Some(enhancement), true) => enhancement.credentials.lookup(session).map_err(|e| {
                warn!(error = %e, "Credential lookup failed, continuing without enhancement");
                EnhancementError::CredentialLookup(e.to_string())
            }),
            _ => Ok(None),
        };
        self.run(spec, key)
    }

    #[instrument(
        skip_all,
        fields(
            app = %spec.name(),
            archetype = %spec.archetype(),
            enhance = spec.enhance()
        )
    )]
    /// A failed key lookup only matters if enhancement is requested.
    fn run(&self, spec: &AppSpec, key: KeyLookup) -> ForgeResult<GeneratedArchive> {
        // 1. Validate
        validator::validate_app_spec(spec).map_err(ForgeError::Domain)?;
        let name = spec.project_name()?;
        info!("Generating {} archive for '{}'", spec.archetype(), name);

        let mut notes = Vec::new();

        // 2. Optional AI enhancement
        let ai_entries = if spec.enhance() {
            match self.enhance(key, spec) {
                Ok(entries) => Some(entries),
                Err(e) => {
                    notes.push(GenerationNote::Enhancement(e));
                    None
                }
            }
        } else {
            None
        };

        // 3. Component tree
        let tree = ComponentTreeBuilder::build(spec, ai_entries.as_deref())?;
        if ai_entries.is_some() && tree.source == TreeSource::Template {
            notes.push(GenerationNote::TemplateFallback {
                dropped: tree.dropped.len(),
            });
        }
        notes.extend(
            tree.dropped
                .iter()
                .cloned()
                .map(GenerationNote::ComponentDropped),
        );
        validator::validate_document(&tree.document)?;
        info!(
            source = %tree.source,
            components = tree.document.component_count(),
            "Component tree ready"
        );

        // 4. Blocks
        let blocks = BlocksWorkspaceGenerator::build(spec.archetype(), &tree.document)?;
        validator::validate_blocks(&blocks)?;

        // 5. Serialize + pack
        let layout = ArchiveSerializer::serialize(&tree.document, &blocks, spec)?;
        let bytes = self.packer.pack(&layout)?;
        if bytes.is_empty() {
            return Err(ApplicationError::Packaging {
                reason: "packer returned no bytes".into(),
            }
            .into());
        }

        info!(bytes = bytes.len(), notes = notes.len(), "Archive generated");
        Ok(GeneratedArchive {
            file_name: format!("{}.aia", name.clean()),
            bytes,
            source: tree.source,
            component_count: tree.document.component_count(),
            document: tree.document,
            notes,
        })
    }

    fn enhance(
        &self,
        key: KeyLookup,
        spec: &AppSpec,
    ) -> Result<Vec<crate::domain::ComponentEntry>, EnhancementError> {
        match &self.enhancement {
            Some(enhancement) => enhancement.service.enhance(key?.as_ref(), spec),
            None => {
                warn!("Enhancement requested but no completion client is configured");
                Err(EnhancementError::NotConfigured)
            }
        }
    }

    /// Unpack an archive and parse its screen definition.
    #[instrument(skip_all, fields(bytes = bytes.len()))]
    pub fn inspect(&self, bytes: &[u8]) -> ForgeResult<ArchiveReport> {
        let layout = self.packer.unpack(bytes)?;
        validator::validate_layout(&layout)?;

        let text_of = |role: LogicalMember| -> ForgeResult<&str> {
            layout
                .find_role(role)
                .and_then(|m| m.text())
                .ok_or_else(|| {
                    ApplicationError::ValidationFailed(format!("{role:?} is not UTF-8 text"))
                        .into()
                })
        };

        let document = parse_screen_definition(text_of(LogicalMember::ScreenDefinition)?)?;
        let project_properties =
            parse_project_properties(text_of(LogicalMember::ProjectProperties)?);

        Ok(ArchiveReport {
            paths: layout.paths().map(str::to_string).collect(),
            project_properties,
            document,
        })
    }

    /// List all registered archetypes.
    pub fn list_archetypes() -> Vec<ArchetypeInfo> {
        ARCHETYPE_REGISTRY
            .iter()
            .map(|def| ArchetypeInfo {
                id: def.archetype.to_string(),
                title: def.title.to_string(),
                description: def.description.to_string(),
                has_logic: def.logic.is_some(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::application::ports::output::{
        MockArchivePacker, MockCompletionClient, MockCredentialStore,
    };
    use crate::domain::{Archetype, ArchiveLayout, ComponentType, DomainError};

    /// Packer that keeps the last layout so tests can look inside.
    #[derive(Default)]
    struct RecordingPacker {
        last: Arc<Mutex<Option<ArchiveLayout>>>,
    }

    impl ArchivePacker for RecordingPacker {
        fn pack(&self, layout: &ArchiveLayout) -> ForgeResult<Vec<u8>> {
            *self.last.lock().unwrap() = Some(layout.clone());
            Ok(layout.paths().collect::<Vec<_>>().join("\n").into_bytes())
        }

        fn unpack(&self, _bytes: &[u8]) -> ForgeResult<ArchiveLayout> {
            self.last
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ApplicationError::Packaging {
                    reason: "nothing packed".into(),
                }
                .into())
        }
    }

    fn recording() -> (GenerateService, Arc<Mutex<Option<ArchiveLayout>>>) {
        let packer = RecordingPacker::default();
        let last = packer.last.clone();
        (GenerateService::new(Box::new(packer)), last)
    }

    fn spec(name: &str, archetype: Archetype, enhance: bool) -> AppSpec {
        AppSpec::builder()
            .name(name)
            .archetype(archetype)
            .enhance(enhance)
            .build()
            .unwrap()
    }

    fn session_store(key: Option<&'static str>) -> MockCredentialStore {
        let mut store = MockCredentialStore::new();
        store
            .expect_lookup()
            .returning(move |_| Ok(key.and_then(ApiKey::new)));
        store
    }

    #[test]
    fn basic_spec_produces_welcome_label() {
        let (service, last) = recording();
        let archive = service
            .generate(&spec("TestApp", Archetype::Basic, false))
            .unwrap();

        assert_eq!(archive.file_name, "TestApp.aia");
        assert_eq!(archive.source, TreeSource::Template);
        assert!(archive.notes.is_empty());
        assert_eq!(
            archive.document.find("WelcomeLabel").and_then(|n| n.text()),
            Some("Welcome to TestApp!")
        );
        let layout = last.lock().unwrap().clone().unwrap();
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn calculator_buttons_in_keypad_order() {
        let (service, _) = recording();
        let archive = service
            .generate(&spec("Calc", Archetype::Calculator, false))
            .unwrap();
        let texts: Vec<_> = archive
            .document
            .iter()
            .filter(|n| n.component_type == ComponentType::Button)
            .filter_map(|n| n.text())
            .collect();
        assert_eq!(texts, "7 8 9 / 4 5 6 * 1 2 3 - 0 C = +".split(' ').collect::<Vec<_>>());
    }

    #[test]
    fn empty_name_fails_before_packing() {
        let mut packer = MockArchivePacker::new();
        packer.expect_pack().never();
        let service = GenerateService::new(Box::new(packer));

        let spec: AppSpec = serde_json::from_str(r#"{"name": "  "}"#).unwrap();
        let err = service.generate(&spec).unwrap_err();
        assert!(matches!(err, ForgeError::Domain(DomainError::MissingAppName)));
    }

    #[test]
    fn packer_failure_is_fatal() {
        let mut packer = MockArchivePacker::new();
        packer.expect_pack().returning(|_| {
            Err(ApplicationError::Packaging {
                reason: "boom".into(),
            }
            .into())
        });
        let service = GenerateService::new(Box::new(packer));

        assert!(service.generate(&spec("X", Archetype::Basic, false)).is_err());
    }

    #[test]
    fn enhancement_without_session_is_noted() {
        let mut client = MockCompletionClient::new();
        client.expect_complete().never();
        let (service, _) = recording();
        let service =
            service.with_enhancement(Arc::new(client), Arc::new(MockCredentialStore::new()));

        let archive = service.generate(&spec("A", Archetype::Counter, true)).unwrap();
        assert_eq!(
            archive.notes,
            vec![GenerationNote::Enhancement(EnhancementError::MissingCredential)]
        );
        assert_eq!(archive.source, TreeSource::Template);
    }

    #[test]
    fn enhancement_without_client_is_noted() {
        let (service, _) = recording();
        let archive = service.generate(&spec("A", Archetype::Basic, true)).unwrap();
        assert_eq!(
            archive.notes,
            vec![GenerationNote::Enhancement(EnhancementError::NotConfigured)]
        );
        assert_eq!(archive.source, TreeSource::Template);
    }

    #[test]
    fn failed_credential_lookup_is_noted() {
        let mut store = MockCredentialStore::new();
        store
            .expect_lookup()
            .times(1)
            .returning(|_| Err(ApplicationError::CredentialStoreLock.into()));
        let mut client = MockCompletionClient::new();
        client.expect_complete().never();
        let (service, _) = recording();
        let service = service.with_enhancement(Arc::new(client), Arc::new(store));

        let archive = service
            .generate_for_session(&spec("Locked", Archetype::Counter, true), &SessionId::new("s"))
            .unwrap();
        assert_eq!(archive.source, TreeSource::Template);
        assert!(matches!(
            archive.notes.as_slice(),
            [GenerationNote::Enhancement(EnhancementError::CredentialLookup(_))]
        ));
    }

    #[test]
    fn ai_components_replace_template() {
        let mut client = MockCompletionClient::new();
        client.expect_complete().times(1).returning(|_, _| {
            Ok(r#"{"components": [
                {"type": "Label", "name": "Greeting", "properties": {"Text": "Hi"}},
                {"type": "Teleporter"}
            ]}"#
                .into())
        });
        let (service, _) = recording();
        let service =
            service.with_enhancement(Arc::new(client), Arc::new(session_store(Some("key"))));

        let archive = service
            .generate_for_session(&spec("A", Archetype::Basic, true), &SessionId::new("s1"))
            .unwrap();
        assert_eq!(archive.source, TreeSource::Ai);
        assert_eq!(archive.component_count, 1);
        assert!(matches!(
            archive.notes.as_slice(),
            [GenerationNote::ComponentDropped(_)]
        ));
    }

    #[test]
    fn failed_enhancement_matches_plain_build() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .returning(|_, _| Err(EnhancementError::Timeout(Duration::from_secs(20))));
        let (plain_service, plain_last) = recording();
        let (service, enhanced_last) = recording();
        let service =
            service.with_enhancement(Arc::new(client), Arc::new(session_store(Some("key"))));

        let enhanced = service
            .generate_for_session(&spec("Same", Archetype::Clicker, true), &SessionId::new("s"))
            .unwrap();
        plain_service
            .generate(&spec("Same", Archetype::Clicker, false))
            .unwrap();

        let enhanced_layout = enhanced_last.lock().unwrap().clone().unwrap();
        let plain_layout = plain_last.lock().unwrap().clone().unwrap();
        assert_eq!(
            enhanced_layout.paths().collect::<Vec<_>>(),
            plain_layout.paths().collect::<Vec<_>>()
        );
        let names = |doc: &ProjectDocument| doc.iter().map(|n| n.name.clone()).collect::<Vec<_>>();
        assert_eq!(enhanced.source, TreeSource::Template);
        assert!(matches!(
            enhanced.notes.as_slice(),
            [GenerationNote::Enhancement(EnhancementError::Timeout(_))]
        ));
        let plain_doc = parse_screen_definition(
            plain_layout
                .find_role(LogicalMember::ScreenDefinition)
                .and_then(|m| m.text())
                .unwrap(),
        )
        .unwrap();
        assert_eq!(names(&enhanced.document), names(&plain_doc));
    }

    #[test]
    fn prose_reply_falls_back_silently_to_template() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .returning(|_, _| Ok("Here is a nice app idea without any JSON".into()));
        let (service, _) = recording();
        let service =
            service.with_enhancement(Arc::new(client), Arc::new(session_store(Some("key"))));

        let archive = service
            .generate_for_session(&spec("C", Archetype::Basic, true), &SessionId::new("s"))
            .unwrap();
        assert_eq!(archive.source, TreeSource::Template);
        assert!(
            archive
                .notes
                .iter()
                .all(|n| !matches!(n, GenerationNote::ComponentDropped(_)))
        );
    }

    #[test]
    fn all_dropped_records_fallback() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .returning(|_, _| Ok(r#"[{"type": "Hologram"}]"#.into()));
        let (service, _) = recording();
        let service =
            service.with_enhancement(Arc::new(client), Arc::new(session_store(Some("key"))));

        let archive = service
            .generate_for_session(&spec("D", Archetype::Counter, true), &SessionId::new("s"))
            .unwrap();
        assert_eq!(archive.source, TreeSource::Template);
        assert!(
            archive
                .notes
                .contains(&GenerationNote::TemplateFallback { dropped: 1 })
        );
    }

    #[test]
    fn session_lookup_skipped_when_not_enhancing() {
        let mut store = MockCredentialStore::new();
        store.expect_lookup().never();
        let (service, _) = recording();
        let service = service.with_enhancement(
            Arc::new(MockCompletionClient::new()),
            Arc::new(store),
        );
        assert!(
            service
                .generate_for_session(&spec("E", Archetype::Basic, false), &SessionId::new("s"))
                .is_ok()
        );
    }

    #[test]
    fn inspect_reads_back_what_was_generated() {
        let (service, _) = recording();
        let archive = service
            .generate(&spec("Look Inside", Archetype::Counter, false))
            .unwrap();

        let report = service.inspect(&archive.bytes).unwrap();
        assert_eq!(report.paths.len(), 6);
        assert_eq!(report.project_properties.get("name"), Some("LookInside"));
        assert_eq!(report.document, archive.document);
    }

    #[test]
    fn archetype_listing_covers_registry() {
        let infos = GenerateService::list_archetypes();
        assert_eq!(infos.len(), Archetype::ALL.len());
        assert!(infos.iter().any(|i| i.id == "generic" && !i.has_logic));
    }
}
