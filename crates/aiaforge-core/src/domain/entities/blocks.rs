//! Event-handler block graph.
//!
//! A workspace is one `Screen1.Initialize` root event plus a list of
//! top-level handlers (global declarations, component events). Each block
//! has named slots holding at most one child.

use std::collections::HashSet;

use serde_json::{Map, Value, json};

use super::common::{IdentityToken, PropertyMap};
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Event,
    Statement,
    Expression,
    Literal,
}

impl BlockKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Statement => "statement",
            Self::Expression => "expression",
            Self::Literal => "literal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockNode {
    pub kind: BlockKind,
    pub block_type: String,
    pub fields: PropertyMap,
    /// Ordered `name → child`. `None` is an empty slot.
    pub slots: Vec<(String, Option<BlockNode>)>,
    pub identity: IdentityToken,
}

impl BlockNode {
    pub fn new(kind: BlockKind, block_type: impl Into<String>) -> Self {
        Self {
            kind,
            block_type: block_type.into(),
            fields: PropertyMap::new(),
            slots: Vec::new(),
            identity: IdentityToken::generate(),
        }
    }

    pub fn event(block_type: impl Into<String>) -> Self {
        Self::new(BlockKind::Event, block_type)
    }

    pub fn statement(block_type: impl Into<String>) -> Self {
        Self::new(BlockKind::Statement, block_type)
    }

    pub fn expression(block_type: impl Into<String>) -> Self {
        Self::new(BlockKind::Expression, block_type)
    }

    pub fn literal(block_type: impl Into<String>) -> Self {
        Self::new(BlockKind::Literal, block_type)
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.set(key, value);
        self
    }

    pub fn slot(mut self, name: impl Into<String>, child: BlockNode) -> Self {
        self.slots.push((name.into(), Some(child)));
        self
    }

    pub fn empty_slot(mut self, name: impl Into<String>) -> Self {
        self.slots.push((name.into(), None));
        self
    }

    pub fn child(&self, slot: &str) -> Option<&BlockNode> {
        self.slots
            .iter()
            .find(|(name, _)| name == slot)
            .and_then(|(_, child)| child.as_ref())
    }

    /// This block and every block below it, pre-order.
    pub fn walk(&self) -> Vec<&BlockNode> {
        let mut out = vec![self];
        for (_, child) in &self.slots {
            if let Some(child) = child {
                out.extend(child.walk());
            }
        }
        out
    }

    fn validate_shape(&self) -> Result<(), DomainError> {
        if self.kind == BlockKind::Literal && !self.slots.is_empty() {
            return Err(DomainError::InvalidBlockGraph(format!(
                "literal block {} has slots",
                self.block_type
            )));
        }
        let mut names = HashSet::new();
        for (name, _) in &self.slots {
            if !names.insert(name.as_str()) {
                return Err(DomainError::InvalidBlockGraph(format!(
                    "slot {name} of {} holds more than one block",
                    self.block_type
                )));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        let fields: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        let slots: Map<String, Value> = self
            .slots
            .iter()
            .map(|(name, child)| {
                let value = child.as_ref().map_or(Value::Null, BlockNode::to_json);
                (name.clone(), value)
            })
            .collect();
        json!({
            "type": self.block_type,
            "id": self.identity.as_str(),
            "kind": self.kind.as_str(),
            "fields": fields,
            "slots": slots,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlocksWorkspace {
    pub root: BlockNode,
    pub handlers: Vec<BlockNode>,
}

impl BlocksWorkspace {
    const CANVAS_X: i64 = 20;
    const CANVAS_Y: i64 = 20;
    const ROW_HEIGHT: i64 = 160;

    pub fn new(root: BlockNode) -> Self {
        Self {
            root,
            handlers: Vec::new(),
        }
    }

    pub fn top_level(&self) -> impl Iterator<Item = &BlockNode> {
        std::iter::once(&self.root).chain(self.handlers.iter())
    }

    pub fn block_count(&self) -> usize {
        self.top_level().map(|b| b.walk().len()).sum()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.root.kind != BlockKind::Event {
            return Err(DomainError::InvalidBlockGraph(format!(
                "root block {} is not an event",
                self.root.block_type
            )));
        }
        let mut ids = HashSet::new();
        for block in self.top_level().flat_map(BlockNode::walk) {
            block.validate_shape()?;
            if !ids.insert(block.identity.as_str()) {
                return Err(DomainError::InvalidBlockGraph(format!(
                    "duplicate block id {}",
                    block.identity
                )));
            }
        }
        Ok(())
    }

    /// Top-level blocks with their canvas positions, root first.
    pub fn to_json(&self) -> Value {
        let blocks = self
            .top_level()
            .enumerate()
            .map(|(row, block)| {
                let mut value = block.to_json();
                if let Value::Object(obj) = &mut value {
                    obj.insert("x".into(), json!(Self::CANVAS_X));
                    obj.insert("y".into(), json!(Self::CANVAS_Y + row as i64 * Self::ROW_HEIGHT));
                }
                value
            })
            .collect();
        Value::Array(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(n: &str) -> BlockNode {
        BlockNode::literal("math_number").field("NUM", n)
    }

    #[test]
    fn literal_with_slot_is_invalid() {
        let ws = BlocksWorkspace::new(
            BlockNode::event("component_event").slot("DO", number("1").slot("X", number("2"))),
        );
        assert!(matches!(ws.validate(), Err(DomainError::InvalidBlockGraph(_))));
    }

    #[test]
    fn root_must_be_event() {
        let ws = BlocksWorkspace::new(BlockNode::statement("lexical_variable_set"));
        assert!(ws.validate().is_err());
    }

    #[test]
    fn slot_holds_one_child() {
        let root = BlockNode::event("component_event")
            .slot("DO", BlockNode::statement("a"))
            .slot("DO", BlockNode::statement("b"));
        assert!(BlocksWorkspace::new(root).validate().is_err());
    }

    #[test]
    fn duplicate_identity_is_invalid() {
        let shared = number("0");
        let mut ws = BlocksWorkspace::new(BlockNode::event("component_event").empty_slot("DO"));
        ws.handlers.push(shared.clone());
        ws.handlers.push(shared);
        assert!(ws.validate().is_err());
    }

    #[test]
    fn json_carries_positions_on_top_level_only() {
        let mut ws = BlocksWorkspace::new(BlockNode::event("component_event").empty_slot("DO"));
        ws.handlers
            .push(BlockNode::statement("global_declaration").slot("VALUE", number("0")));

        let json = ws.to_json();
        assert_eq!(json[0]["slots"]["DO"], Value::Null);
        assert_eq!(json[1]["y"], 180);
        assert!(json[1]["slots"]["VALUE"].get("x").is_none());
        assert_eq!(json[1]["slots"]["VALUE"]["fields"]["NUM"], "0");
        assert_eq!(ws.block_count(), 3);
    }
}
