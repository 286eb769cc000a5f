//! ComponentTreeBuilder: archetype templates or AI-sourced entries → tree.
//!
//! AI entries are untrusted. Each one that cannot be mapped is dropped with a
//! [`ComponentMappingError`] and the build carries on; if nothing survives,
//! the archetype template is used instead.

use std::fmt;

use tracing::{debug, warn};

use crate::domain::archetypes::{LayoutInput, Palette, find_archetype};
use crate::domain::entities::{
    AppSpec, ComponentNode, NameAllocator, ProjectDocument, PropertyMap,
};
use crate::domain::error::{ComponentMappingError, DomainError, MappingFailure};
use crate::domain::value_objects::{ColorLiteral, ComponentType};

/// Geometry for visible components that set none. `-2` is fill-parent.
pub const DEFAULT_EXTENT: &str = "-2";

/// Keys that belong to the document structure, never to properties.
const RESERVED_KEYS: [&str; 5] = ["$Name", "$Type", "$Version", "Uuid", "$Components"];

/// One normalized component description, typically from the AI service.
///
/// Types and names are still raw strings; the builder validates them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentEntry {
    pub component_type: Option<String>,
    pub name: Option<String>,
    pub properties: PropertyMap,
    pub children: Vec<ComponentEntry>,
    /// False when the source value was not an object at all.
    pub is_object: bool,
}

impl ComponentEntry {
    pub fn new(component_type: impl Into<String>) -> Self {
        Self {
            component_type: Some(component_type.into()),
            is_object: true,
            ..Self::default()
        }
    }

    pub fn not_an_object() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.set(key, value);
        self
    }

    pub fn child(mut self, child: ComponentEntry) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeSource {
    Ai,
    Template,
}

impl fmt::Display for TreeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ai => "ai",
            Self::Template => "template",
        })
    }
}

#[derive(Debug, Clone)]
pub struct TreeBuild {
    pub document: ProjectDocument,
    pub source: TreeSource,
    pub dropped: Vec<ComponentMappingError>,
}

pub struct ComponentTreeBuilder;

impl ComponentTreeBuilder {
    pub fn build(
        spec: &AppSpec,
        ai_components: Option<&[ComponentEntry]>,
    ) -> Result<TreeBuild, DomainError> {
        let name = spec.project_name()?;
        let archetype = spec.archetype();
        let def = find_archetype(archetype).ok_or_else(|| DomainError::UnregisteredArchetype {
            archetype: archetype.to_string(),
        })?;

        let mut document = ProjectDocument::new(&name);
        let mut dropped = Vec::new();
        let mut source = TreeSource::Template;

        if let Some(entries) = ai_components.filter(|e| !e.is_empty()) {
            let mut mapper = EntryMapper::new(def.palette);
            let nodes: Vec<_> = entries.iter().filter_map(|e| mapper.map(e)).collect();
            dropped = mapper.dropped;

            if nodes.is_empty() {
                warn!(
                    dropped = dropped.len(),
                    "No AI component survived mapping, using archetype template"
                );
            } else {
                document.components = nodes;
                source = TreeSource::Ai;
            }
        }

        if source == TreeSource::Template {
            let mut names = NameAllocator::new();
            document.components = (def.layout)(LayoutInput {
                name: &name,
                prompt: spec.prompt(),
            })
            .into_iter()
            .map(|node| finish_template_node(node, &mut names, &def.palette))
            .collect();
        }

        if document.components.is_empty() {
            return Err(DomainError::EmptyComponentTree {
                archetype: archetype.to_string(),
            });
        }
        document.validate()?;

        debug!(
            %source,
            components = document.component_count(),
            dropped = dropped.len(),
            "Component tree built"
        );
        Ok(TreeBuild {
            document,
            source,
            dropped,
        })
    }
}

/// Apply defaults for one node; explicit properties keep their place first.
pub fn apply_defaults(node: &mut ComponentNode, palette: &Palette) {
    let ty = node.component_type;
    if ty.is_visible() {
        node.properties.set_if_absent("Width", DEFAULT_EXTENT);
        node.properties.set_if_absent("Height", DEFAULT_EXTENT);
    }
    if let Some((property, role)) = ty.color_property() {
        node.properties.set_if_absent(property, palette.color(role));
    }
}

fn finish_template_node(
    mut node: ComponentNode,
    names: &mut NameAllocator,
    palette: &Palette,
) -> ComponentNode {
    node.name = names.allocate(Some(node.name.as_str()), node.component_type);
    apply_defaults(&mut node, palette);
    node.children = std::mem::take(&mut node.children)
        .into_iter()
        .map(|child| finish_template_node(child, names, palette))
        .collect();
    node
}

struct EntryMapper {
    palette: Palette,
    names: NameAllocator,
    dropped: Vec<ComponentMappingError>,
    next_index: usize,
}

impl EntryMapper {
    fn new(palette: Palette) -> Self {
        Self {
            palette,
            names: NameAllocator::new(),
            dropped: Vec::new(),
            next_index: 0,
        }
    }

    fn drop_entry(&mut self, index: usize, entry: &ComponentEntry, failure: MappingFailure) {
        let error = ComponentMappingError {
            index,
            name: entry.name.clone(),
            failure,
        };
        warn!(error = %error, "Dropped component entry");
        self.dropped.push(error);
    }

    fn map(&mut self, entry: &ComponentEntry) -> Option<ComponentNode> {
        let index = self.next_index;
        self.next_index += 1;

        if !entry.is_object {
            self.drop_entry(index, entry, MappingFailure::NotAnObject);
            return None;
        }
        let Some(raw_type) = entry.component_type.as_deref().filter(|t| !t.trim().is_empty())
        else {
            self.drop_entry(index, entry, MappingFailure::MissingType);
            return None;
        };
        let component_type = match raw_type.parse::<ComponentType>() {
            Ok(t) => t,
            Err(_) => {
                self.drop_entry(
                    index,
                    entry,
                    MappingFailure::UnknownType(raw_type.trim().to_string()),
                );
                return None;
            }
        };

        let name = self.names.allocate(entry.name.as_deref(), component_type);
        let mut node = ComponentNode::new(name, component_type);

        for (key, value) in entry.properties.iter() {
            if RESERVED_KEYS.contains(&key) {
                continue;
            }
            if key.ends_with("Color") {
                match ColorLiteral::parse(value) {
                    Some(color) => node.properties.set(key, color.as_str()),
                    None => debug!(key, value, "Ignoring unparseable color"),
                }
            } else {
                node.properties.set(key, value);
            }
        }

        if !entry.children.is_empty() {
            if component_type.is_container() {
                node.children = entry.children.iter().filter_map(|c| self.map(c)).collect();
            } else {
                self.drop_entry(
                    index,
                    entry,
                    MappingFailure::ChildrenOnLeaf {
                        component_type: component_type.to_string(),
                    },
                );
            }
        }

        apply_defaults(&mut node, &self.palette);
        Some(node)
    }
}
