//! Integration tests for aiaforge-core.
//!
//! These drive `GenerateService` through its public API with hand-written
//! port implementations, so no zip or network code is involved.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use aiaforge_core::{
    application::{ApplicationError, EnhancementError, GenerationNote},
    domain::{
        ArchiveSerializer, DomainError, ProjectDocument, parse_screen_definition, paths,
    },
    error::{ForgeError, ForgeResult},
    prelude::*,
};

/// Keeps the last packed layout; the "archive" is just the member paths.
#[derive(Default)]
struct LayoutPacker {
    last: Mutex<Option<ArchiveLayout>>,
}

impl ArchivePacker for LayoutPacker {
    fn pack(&self, layout: &ArchiveLayout) -> ForgeResult<Vec<u8>> {
        *self.last.lock().unwrap() = Some(layout.clone());
        Ok(layout.paths().collect::<Vec<_>>().join("\n").into_bytes())
    }

    fn unpack(&self, _bytes: &[u8]) -> ForgeResult<ArchiveLayout> {
        self.last
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ApplicationError::ValidationFailed("nothing packed".into()).into())
    }
}

struct CannedClient(Result<String, EnhancementError>);

impl CompletionClient for CannedClient {
    fn complete(&self, _key: &ApiKey, _prompt: &str) -> Result<String, EnhancementError> {
        self.0.clone()
    }
}

#[derive(Default)]
struct MapStore(Mutex<HashMap<SessionId, ApiKey>>);

impl CredentialStore for MapStore {
    fn store(&self, session: &SessionId, key: ApiKey) -> ForgeResult<()> {
        self.0.lock().unwrap().insert(session.clone(), key);
        Ok(())
    }

    fn lookup(&self, session: &SessionId) -> ForgeResult<Option<ApiKey>> {
        Ok(self.0.lock().unwrap().get(session).cloned())
    }

    fn revoke(&self, session: &SessionId) -> ForgeResult<bool> {
        Ok(self.0.lock().unwrap().remove(session).is_some())
    }
}

fn spec(name: &str, archetype: Archetype) -> AppSpec {
    AppSpec::builder()
        .name(name)
        .archetype(archetype)
        .build()
        .unwrap()
}

fn service_with_client(reply: Result<String, EnhancementError>) -> (GenerateService, SessionId) {
    let store = Arc::new(MapStore::default());
    let session = SessionId::generate();
    store
        .store(&session, ApiKey::new("test-key").unwrap())
        .unwrap();
    let service = GenerateService::new(Box::new(LayoutPacker::default()))
        .with_enhancement(Arc::new(CannedClient(reply)), store);
    (service, session)
}

fn screen_of(service: &GenerateService, archive: &GeneratedArchive) -> ProjectDocument {
    service.inspect(&archive.bytes).unwrap().document
}

#[test]
fn test_basic_archive_has_five_members_and_welcome_label() {
    let service = GenerateService::new(Box::new(LayoutPacker::default()));
    let archive = service.generate(&spec("TestApp", Archetype::Basic)).unwrap();

    assert_eq!(archive.file_name, "TestApp.aia");
    assert_eq!(archive.source, TreeSource::Template);
    assert!(archive.notes.is_empty());

    let listing = String::from_utf8(archive.bytes.clone()).unwrap();
    for path in [
        paths::PROJECT_PROPERTIES.to_string(),
        paths::screen_definition("TestApp"),
        paths::blocks("TestApp"),
        paths::ASSETS_DIR.to_string(),
        paths::BUILD_DIR.to_string(),
        paths::MANIFEST.to_string(),
    ] {
        assert!(listing.lines().any(|l| l == path), "missing {path}");
    }

    let welcome = archive.document.find("WelcomeLabel").unwrap();
    assert_eq!(welcome.text(), Some("Welcome to TestApp!"));
}

#[test]
fn test_calculator_buttons_in_row_major_order() {
    let service = GenerateService::new(Box::new(LayoutPacker::default()));
    let archive = service.generate(&spec("Calc", Archetype::Calculator)).unwrap();

    let texts: Vec<_> = archive
        .document
        .iter()
        .filter(|n| n.component_type == ComponentType::Button)
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(
        texts,
        ["7", "8", "9", "/", "4", "5", "6", "*", "1", "2", "3", "-", "0", "C", "=", "+"]
    );
}

#[test]
fn test_screen_definition_round_trips() {
    let service = GenerateService::new(Box::new(LayoutPacker::default()));
    let archive = service.generate(&spec("Round Trip", Archetype::Counter)).unwrap();

    let parsed = screen_of(&service, &archive);
    assert_eq!(parsed, archive.document);
}

#[test]
fn test_empty_name_produces_no_archive() {
    let service = GenerateService::new(Box::new(LayoutPacker::default()));
    let err = AppSpec::builder().name("").build().unwrap_err();
    assert_eq!(err, DomainError::MissingAppName);

    let blank: AppSpec = serde_json::from_str(r#"{"name": "", "archetype": "basic"}"#).unwrap();
    let err = service.generate(&blank).unwrap_err();
    assert!(matches!(err, ForgeError::Domain(DomainError::MissingAppName)));
}

#[test]
fn test_ai_components_replace_the_template() {
    let reply = r##"Here you go:
```json
{"components": [
  {"type": "Label", "name": "Title", "Text": "Shopping", "BackgroundColor": "#4CAF50"},
  {"type": "TextBox", "name": "Item"},
  {"type": "Hologram", "name": "Nope"}
]}
```"##;
    let (service, session) = service_with_client(Ok(reply.into()));
    let request = AppSpec::builder()
        .name("Shop")
        .prompt("a shopping list")
        .enhance(true)
        .build()
        .unwrap();

    let archive = service.generate_for_session(&request, &session).unwrap();

    assert_eq!(archive.source, TreeSource::Ai);
    let title = archive.document.find("Title").unwrap();
    assert_eq!(title.properties.get("BackgroundColor"), Some("&HFF4CAF50"));
    assert!(archive.document.find("Item").is_some());
    assert!(archive.document.find("Nope").is_none());
    assert!(
        archive
            .notes
            .iter()
            .any(|n| matches!(n, GenerationNote::ComponentDropped(_)))
    );
}

#[test]
fn test_prose_reply_falls_back_to_template() {
    let (service, session) = service_with_client(Ok("Sorry, I can't design apps.".into()));
    let request = AppSpec::builder()
        .name("TestApp")
        .enhance(true)
        .build()
        .unwrap();

    let enhanced = service.generate_for_session(&request, &session).unwrap();
    let plain = GenerateService::new(Box::new(LayoutPacker::default()))
        .generate(&spec("TestApp", Archetype::Basic))
        .unwrap();

    assert_eq!(enhanced.source, TreeSource::Template);
    assert!(matches!(
        enhanced.notes.as_slice(),
        [GenerationNote::Enhancement(_)]
    ));
    assert_eq!(enhanced.bytes, plain.bytes);
    assert_eq!(enhanced.component_count, plain.component_count);
}

#[test]
fn test_timeout_is_a_note_not_an_error() {
    let timeout = EnhancementError::Timeout(std::time::Duration::from_secs(20));
    let (service, session) = service_with_client(Err(timeout.clone()));
    let request = AppSpec::builder()
        .name("Slow")
        .archetype(Archetype::Clicker)
        .enhance(true)
        .build()
        .unwrap();

    let archive = service.generate_for_session(&request, &session).unwrap();
    assert_eq!(archive.notes, vec![GenerationNote::Enhancement(timeout)]);
    assert_eq!(archive.source, TreeSource::Template);
}

#[test]
fn test_unknown_session_skips_enhancement() {
    let (service, _session) = service_with_client(Ok("{}".into()));
    let request = AppSpec::builder()
        .name("Anon")
        .enhance(true)
        .build()
        .unwrap();

    let archive = service
        .generate_for_session(&request, &SessionId::generate())
        .unwrap();
    assert_eq!(
        archive.notes,
        vec![GenerationNote::Enhancement(EnhancementError::MissingCredential)]
    );
}

#[test]
fn test_every_archetype_is_listed_and_generates() {
    let service = GenerateService::new(Box::new(LayoutPacker::default()));
    let listed = GenerateService::list_archetypes();
    assert_eq!(listed.len(), Archetype::ALL.len());

    for archetype in Archetype::ALL {
        let archive = service.generate(&spec("Every", archetype)).unwrap();
        assert!(archive.component_count > 0, "{archetype} produced no components");
        let scm = ArchiveSerializer::render_screen_definition(&archive.document).unwrap();
        assert_eq!(parse_screen_definition(&scm).unwrap(), archive.document);
    }
}
