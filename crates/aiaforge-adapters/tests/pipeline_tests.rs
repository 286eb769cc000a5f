//! End-to-end generation with the real zip packer.

use std::{
    fs::File,
    io::{Cursor, Read},
};

use zip::{CompressionMethod, ZipArchive};

use aiaforge_adapters::ZipPacker;
use aiaforge_core::prelude::*;

fn service() -> GenerateService {
    GenerateService::new(Box::new(ZipPacker::new()))
}

fn spec(name: &str, archetype: Archetype, prompt: &str) -> AppSpec {
    AppSpec::builder()
        .name(name)
        .archetype(archetype)
        .prompt(prompt)
        .build()
        .unwrap()
}

fn read_member<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>, path: &str) -> String {
    let mut text = String::new();
    archive
        .by_name(path)
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    text
}

#[test]
fn basic_archive_has_the_five_members_in_order() {
    let archive = service()
        .generate(&spec("TestApp", Archetype::Basic, ""))
        .unwrap();
    let mut zip = ZipArchive::new(Cursor::new(archive.bytes)).unwrap();

    let names: Vec<String> = (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(
        names,
        [
            "youngandroidproject/project.properties",
            "src/appinventor/ai_user/TestApp/Screen1.scm",
            "src/appinventor/ai_user/TestApp/Screen1.bky",
            "assets/",
            "build/",
            "META-INF/MANIFEST.MF",
        ]
    );

    for i in 0..zip.len() {
        let entry = zip.by_index(i).unwrap();
        if !entry.is_dir() {
            assert_eq!(entry.compression(), CompressionMethod::Deflated);
        }
    }

    assert_eq!(
        read_member(&mut zip, "META-INF/MANIFEST.MF"),
        "Manifest-Version: 1.0\nCreated-By: MIT App Inventor\n\n"
    );

    let properties = read_member(&mut zip, "youngandroidproject/project.properties");
    assert!(properties.starts_with("main=appinventor.ai_user.TestApp.Screen1\nname=TestApp\n"));
    assert!(properties.ends_with("actionbar=false"));

    let scm = read_member(&mut zip, "src/appinventor/ai_user/TestApp/Screen1.scm");
    assert!(scm.starts_with("#|\n$JSON\n{\n  \"YaVersion\": \"208\",\n  \"Source\": \"Form\","));
    assert!(scm.ends_with("\n|#"));
    assert!(scm.contains("\"Text\": \"Welcome to TestApp!\""));

    let bky = read_member(&mut zip, "src/appinventor/ai_user/TestApp/Screen1.bky");
    assert!(bky.starts_with("#|\n$JSON\n{\"YaVersion\":\"208\",\"Source\":\"Form\""));
    assert!(bky.contains("\"Blocks\":["));
}

#[test]
fn sanitized_name_drives_paths_but_display_name_is_kept() {
    let archive = service()
        .generate(&spec("9 Lives!", Archetype::Clicker, ""))
        .unwrap();
    assert_eq!(archive.file_name, "App9Lives.aia");

    let mut zip = ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
    let properties = read_member(&mut zip, "youngandroidproject/project.properties");
    assert!(properties.contains("\nname=App9Lives\n"));
    assert!(properties.contains("\naname=9 Lives!\n"));
    assert!(zip.by_name("src/appinventor/ai_user/App9Lives/Screen1.scm").is_ok());
}

#[test]
fn written_archive_round_trips_through_inspect() {
    let service = service();
    let archive = service
        .generate(&spec("Calc", Archetype::Calculator, ""))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(&archive.file_name);
    std::fs::write(&path, &archive.bytes).unwrap();

    let mut zip = ZipArchive::new(File::open(&path).unwrap()).unwrap();
    assert_eq!(zip.len(), 6);
    let scm = read_member(&mut zip, "src/appinventor/ai_user/Calc/Screen1.scm");
    assert!(scm.contains("\"$Type\": \"TableArrangement\""));

    let report = service.inspect(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(report.document, archive.document);
    assert_eq!(report.project_properties.get("aname"), Some("Calc"));
    assert_eq!(report.paths.len(), 6);

    let buttons = report
        .document
        .iter()
        .filter(|n| n.component_type == ComponentType::Button)
        .count();
    assert_eq!(buttons, 16);
}

#[test]
fn generic_prompt_keywords_end_up_in_the_archive() {
    let archive = service()
        .generate(&spec(
            "Notes",
            Archetype::Generic,
            "An input box, a button and a list of photos",
        ))
        .unwrap();
    let types: Vec<_> = archive
        .document
        .iter()
        .map(|n| n.component_type)
        .collect();
    assert_eq!(
        types,
        [
            ComponentType::Label,
            ComponentType::Button,
            ComponentType::TextBox,
            ComponentType::Image,
            ComponentType::ListView,
        ]
    );
}

#[test]
fn inspect_rejects_non_archives() {
    let err = service().inspect(b"PK but not really").unwrap_err();
    assert_eq!(err.category(), aiaforge_core::error::ErrorCategory::Validation);
}

#[test]
fn every_archetype_generates_a_valid_archive() {
    let service = service();
    for archetype in Archetype::ALL {
        let archive = service
            .generate(&spec("Every", archetype, "button label"))
            .unwrap();
        let report = service.inspect(&archive.bytes).unwrap();
        assert_eq!(report.paths.len(), 6, "{archetype}");
        assert!(archive.component_count >= 1, "{archetype}");
    }
}
