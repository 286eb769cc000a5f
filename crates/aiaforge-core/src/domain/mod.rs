// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for aiaforge.
//!
//! This module contains the pure build pipeline for an App Inventor project:
//! component tree, block graph, and the archive member bodies. Network calls
//! and zip packing are handled via ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Few crates**: std + thiserror + serde_json (document bodies) + uuid
//! - **Value semantics**: All domain objects are Clone + PartialEq
//!
// Public API - what the world sees
pub mod archetypes;
pub mod blocks_generator;
pub mod entities;
pub mod error;
pub mod extraction;
pub mod serializer;
pub mod tree_builder;
pub mod value_objects;

mod validation;

// Re-exports for convenience
pub use archetypes::{ARCHETYPE_REGISTRY, ArchetypeDef, Palette, find_archetype};
pub use blocks_generator::BlocksWorkspaceGenerator;
pub use entities::{
    AppSpec, AppSpecBuilder, ArchiveLayout, ArchiveMember, BlockKind, BlockNode, BlocksWorkspace,
    ComponentNode, IdentityToken, LogicalMember, MemberKind, NameAllocator, ProjectDocument,
    PropertyMap, archive_layout::paths,
};
pub use error::{ComponentMappingError, DomainError, ErrorCategory, MappingFailure};
pub use extraction::{ExtractionError, MAX_COMPLETION_BYTES, extract_components};
pub use serializer::{ArchiveSerializer, parse_project_properties, parse_screen_definition};
pub use tree_builder::{ComponentEntry, ComponentTreeBuilder, TreeBuild, TreeSource};
pub use validation::DomainValidator;
pub use value_objects::{Archetype, ColorLiteral, ComponentType, ProjectName};

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn pipeline(spec: &AppSpec) -> (TreeBuild, BlocksWorkspace, ArchiveLayout) {
        let tree = ComponentTreeBuilder::build(spec, None).unwrap();
        let blocks = BlocksWorkspaceGenerator::build(spec.archetype(), &tree.document).unwrap();
        let layout = ArchiveSerializer::serialize(&tree.document, &blocks, spec).unwrap();
        (tree, blocks, layout)
    }

    fn spec(name: &str, archetype: Archetype, prompt: &str) -> AppSpec {
        AppSpec::builder()
            .name(name)
            .archetype(archetype)
            .prompt(prompt)
            .build()
            .unwrap()
    }

    // ========================================================================
    // Whole-pipeline properties
    // ========================================================================

    #[test]
    fn every_archetype_produces_all_logical_members() {
        for archetype in Archetype::ALL {
            let (_, _, layout) = pipeline(&spec("Prop Test", archetype, "button list"));
            assert!(DomainValidator::validate_layout(&layout).is_ok());
            for role in LogicalMember::ALL {
                assert!(layout.find_role(role).is_some(), "{archetype}: {role:?}");
            }
        }
    }

    #[test]
    fn component_names_are_unique_for_every_archetype() {
        for archetype in Archetype::ALL {
            let (tree, _, _) = pipeline(&spec("Names", archetype, "text input photo"));
            let mut seen = HashSet::new();
            for node in tree.document.iter() {
                assert!(seen.insert(node.name.clone()), "duplicate {}", node.name);
            }
        }
    }

    #[test]
    fn screen_definition_round_trips_for_every_archetype() {
        for archetype in Archetype::ALL {
            let (tree, _, layout) = pipeline(&spec("Round", archetype, "a list"));
            let text = layout
                .find_role(LogicalMember::ScreenDefinition)
                .and_then(ArchiveMember::text)
                .unwrap();
            assert_eq!(parse_screen_definition(text).unwrap(), tree.document);
        }
    }

    #[test]
    fn identity_tokens_are_unique_across_document() {
        let (tree, blocks, _) = pipeline(&spec("Ids", Archetype::Calculator, ""));
        let mut ids: HashSet<_> = tree.document.iter().map(|n| n.identity.clone()).collect();
        ids.insert(IdentityToken::from_existing(
            tree.document.screen_uuid().unwrap(),
        ));
        assert_eq!(ids.len(), tree.document.component_count() + 1);
        assert!(DomainValidator::validate_blocks(&blocks).is_ok());
    }

    #[test]
    fn sanitized_name_drives_every_path() {
        let (_, _, layout) = pipeline(&spec("9 Lives!", Archetype::Clicker, ""));
        assert!(layout.get(&paths::screen_definition("App9Lives")).is_some());
        assert!(layout.get(&paths::blocks("App9Lives")).is_some());
    }

    #[test]
    fn document_validator_rejects_empty_tree() {
        let doc = ProjectDocument::new(&ProjectName::new("Empty").unwrap());
        assert!(matches!(
            DomainValidator::validate_document(&doc),
            Err(DomainError::EmptyComponentTree { .. })
        ));
    }
}
