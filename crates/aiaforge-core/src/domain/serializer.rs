//! ArchiveSerializer: component tree + blocks + metadata → archive members.
//!
//! The consuming tool matches these files with string patterns, so the
//! markers, member paths, and JSON key order below are fixed.

use serde_json::{Value, json};

use crate::domain::entities::archive_layout::paths;
use crate::domain::entities::{
    AppSpec, ArchiveLayout, ArchiveMember, BlocksWorkspace, PropertyMap, ProjectDocument,
};
use crate::domain::entities::component::FORM_VERSION;
use crate::domain::error::DomainError;
use crate::domain::value_objects::ProjectName;

pub const YA_VERSION: &str = "208";

const SCREEN_HEADER: &str = "#|\n$JSON\n";
const SCREEN_FOOTER: &str = "\n|#";

pub const MANIFEST_BODY: &str = "Manifest-Version: 1.0\nCreated-By: MIT App Inventor\n\n";

pub struct ArchiveSerializer;

impl ArchiveSerializer {
    /// Render every member, in archive order.
    pub fn serialize(
        doc: &ProjectDocument,
        blocks: &BlocksWorkspace,
        spec: &AppSpec,
    ) -> Result<ArchiveLayout, DomainError> {
        let name = spec.project_name()?;
        let clean = name.clean();

        let mut layout = ArchiveLayout::new();
        layout.push(ArchiveMember::file(
            paths::PROJECT_PROPERTIES,
            Self::render_project_properties(&name),
        ))?;
        layout.push(ArchiveMember::file(
            paths::screen_definition(clean),
            Self::render_screen_definition(doc)?,
        ))?;
        layout.push(ArchiveMember::file(
            paths::blocks(clean),
            Self::render_blocks(doc, blocks)?,
        ))?;
        layout.push(ArchiveMember::directory(paths::ASSETS_DIR))?;
        layout.push(ArchiveMember::directory(paths::BUILD_DIR))?;
        layout.push(ArchiveMember::file(paths::MANIFEST, MANIFEST_BODY))?;

        layout.validate()?;
        Ok(layout)
    }

    pub fn render_project_properties(name: &ProjectName) -> String {
        let clean = name.clean();
        [
            format!("main=appinventor.ai_user.{clean}.Screen1"),
            format!("name={clean}"),
            "assets=../assets".to_string(),
            "source=../src".to_string(),
            "build=../build".to_string(),
            "versioncode=1".to_string(),
            "versionname=1.0".to_string(),
            "useslocation=false".to_string(),
            format!("aname={}", name.display()),
            "sizing=Responsive".to_string(),
            "actionbar=false".to_string(),
        ]
        .join("\n")
    }

    pub fn render_screen_definition(doc: &ProjectDocument) -> Result<String, DomainError> {
        let body = json!({
            "YaVersion": YA_VERSION,
            "Source": "Form",
            "Properties": doc.to_json(),
        });
        let pretty = serde_json::to_string_pretty(&body).map_err(|e| DomainError::Encoding {
            member: "Screen1.scm".into(),
            reason: e.to_string(),
        })?;
        Ok(format!("{SCREEN_HEADER}{pretty}{SCREEN_FOOTER}"))
    }

    pub fn render_blocks(
        doc: &ProjectDocument,
        blocks: &BlocksWorkspace,
    ) -> Result<String, DomainError> {
        let body = json!({
            "YaVersion": YA_VERSION,
            "Source": "Form",
            "Properties": {
                "$Name": "Screen1",
                "$Type": "Form",
                "$Version": FORM_VERSION,
                "Uuid": doc.screen_uuid().unwrap_or_default(),
                "Blocks": blocks.to_json(),
            },
        });
        let compact = serde_json::to_string(&body).map_err(|e| DomainError::Encoding {
            member: "Screen1.bky".into(),
            reason: e.to_string(),
        })?;
        Ok(format!("{SCREEN_HEADER}{compact}{SCREEN_FOOTER}"))
    }
}

/// Reverse of [`ArchiveSerializer::render_screen_definition`].
pub fn parse_screen_definition(text: &str) -> Result<ProjectDocument, DomainError> {
    let body = strip_markers(text)?;
    let value: Value = serde_json::from_str(body)
        .map_err(|e| DomainError::MalformedScreenDefinition(e.to_string()))?;

    if value.get("Source").and_then(Value::as_str) != Some("Form") {
        return Err(DomainError::MalformedScreenDefinition(
            "Source is not Form".into(),
        ));
    }
    let properties = value.get("Properties").ok_or_else(|| {
        DomainError::MalformedScreenDefinition("missing Properties object".into())
    })?;
    ProjectDocument::from_json(properties)
}

/// `key=value` lines of `project.properties`, in file order.
pub fn parse_project_properties(text: &str) -> PropertyMap {
    text.lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()))
        .collect()
}

fn strip_markers(text: &str) -> Result<&str, DomainError> {
    text.trim_end_matches(['\r', '\n'])
        .strip_prefix(SCREEN_HEADER)
        .and_then(|rest| rest.strip_suffix(SCREEN_FOOTER))
        .ok_or_else(|| {
            DomainError::MalformedScreenDefinition("missing #|/$JSON/|# markers".into())
        })
}
