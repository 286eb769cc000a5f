//! Minimal event-handler graphs per archetype.

use tracing::debug;

use crate::domain::archetypes::find_archetype;
use crate::domain::entities::{BlockNode, BlocksWorkspace, ProjectDocument};
use crate::domain::error::DomainError;
use crate::domain::value_objects::Archetype;

/// Constructors for the handful of block types the logic templates use.
pub mod dsl {
    use crate::domain::entities::BlockNode;

    pub fn on_event(component_type: &str, instance: &str, event: &str, body: BlockNode) -> BlockNode {
        BlockNode::event("component_event")
            .field("component_type", component_type)
            .field("instance_name", instance)
            .field("event_name", event)
            .slot("DO", body)
    }

    pub fn screen_initialize() -> BlockNode {
        BlockNode::event("component_event")
            .field("component_type", "Form")
            .field("instance_name", "Screen1")
            .field("event_name", "Initialize")
            .empty_slot("DO")
    }

    pub fn global_declaration(name: &str, value: BlockNode) -> BlockNode {
        BlockNode::statement("global_declaration")
            .field("NAME", name)
            .slot("VALUE", value)
    }

    pub fn set_global(name: &str, value: BlockNode) -> BlockNode {
        BlockNode::statement("lexical_variable_set")
            .field("VAR", format!("global {name}"))
            .slot("VALUE", value)
    }

    pub fn get_global(name: &str) -> BlockNode {
        BlockNode::expression("lexical_variable_get").field("VAR", format!("global {name}"))
    }

    pub fn set_property(
        component_type: &str,
        instance: &str,
        property: &str,
        value: BlockNode,
    ) -> BlockNode {
        BlockNode::statement("component_set_get")
            .field("component_type", component_type)
            .field("instance_name", instance)
            .field("property_name", property)
            .slot("VALUE", value)
    }

    /// `math_add` / `math_subtract` style binary operation.
    pub fn math(op: &str, a: BlockNode, b: BlockNode) -> BlockNode {
        BlockNode::expression(op).slot("A", a).slot("B", b)
    }

    pub fn join(a: BlockNode, b: BlockNode) -> BlockNode {
        BlockNode::expression("text_join")
            .slot("ADD0", a)
            .slot("ADD1", b)
    }

    pub fn number(n: &str) -> BlockNode {
        BlockNode::literal("math_number").field("NUM", n)
    }

    pub fn text(s: &str) -> BlockNode {
        BlockNode::literal("text").field("TEXT", s)
    }
}

pub struct BlocksWorkspaceGenerator;

impl BlocksWorkspaceGenerator {
    /// Root `Screen1.Initialize` plus the archetype's handlers, when every
    /// component they reference is in `doc` with the expected type.
    pub fn build(
        archetype: Archetype,
        doc: &ProjectDocument,
    ) -> Result<BlocksWorkspace, DomainError> {
        let def = find_archetype(archetype).ok_or_else(|| DomainError::UnregisteredArchetype {
            archetype: archetype.to_string(),
        })?;

        let mut workspace = BlocksWorkspace::new(dsl::screen_initialize());

        if let Some(logic) = def.logic {
            let missing = logic.requires.iter().find(|(name, ty)| {
                doc.find(name)
                    .is_none_or(|node| node.component_type != *ty)
            });
            match missing {
                Some((name, _)) => {
                    debug!(%archetype, component = *name, "Logic skipped, component missing");
                }
                None => workspace.handlers = (logic.build)(),
            }
        }

        workspace.validate()?;
        Ok(workspace)
    }
}

/// Depth-first search for a block of `block_type` under `root`.
pub fn find_block<'a>(root: &'a BlockNode, block_type: &str) -> Option<&'a BlockNode> {
    root.walk().into_iter().find(|b| b.block_type == block_type)
}
