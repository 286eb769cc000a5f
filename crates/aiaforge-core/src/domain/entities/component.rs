//! Component tree: `ComponentNode` and the per-screen `ProjectDocument`.

use serde_json::{Map, Value};

use super::common::{IdentityToken, NameAllocator, PropertyMap};
use crate::domain::error::DomainError;
use crate::domain::value_objects::{ComponentType, ProjectName};

/// `$Version` of the Form (screen) component.
pub const FORM_VERSION: &str = "25";

const KEY_NAME: &str = "$Name";
const KEY_TYPE: &str = "$Type";
const KEY_VERSION: &str = "$Version";
const KEY_UUID: &str = "Uuid";
const KEY_COMPONENTS: &str = "$Components";

/// One visual or non-visual component on the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentNode {
    pub name: String,
    pub component_type: ComponentType,
    pub properties: PropertyMap,
    pub children: Vec<ComponentNode>,
    pub identity: IdentityToken,
}

impl ComponentNode {
    pub fn new(name: impl Into<String>, component_type: ComponentType) -> Self {
        Self {
            name: name.into(),
            component_type,
            properties: PropertyMap::new(),
            children: Vec::new(),
            identity: IdentityToken::generate(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.set(key, value);
        self
    }

    /// Attach a child. Only containers accept children.
    pub fn push_child(&mut self, child: ComponentNode) -> Result<(), DomainError> {
        if !self.component_type.is_container() {
            return Err(DomainError::ChildrenOnLeaf {
                name: self.name.clone(),
                component_type: self.component_type.to_string(),
            });
        }
        self.children.push(child);
        Ok(())
    }

    pub fn with_child(mut self, child: ComponentNode) -> Result<Self, DomainError> {
        self.push_child(child)?;
        Ok(self)
    }

    pub fn text(&self) -> Option<&str> {
        self.properties.get("Text")
    }

    /// Depth-first, pre-order walk over this node and its descendants.
    pub fn walk(&self) -> Vec<&ComponentNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(KEY_NAME.into(), Value::String(self.name.clone()));
        obj.insert(
            KEY_TYPE.into(),
            Value::String(self.component_type.as_str().into()),
        );
        obj.insert(
            KEY_VERSION.into(),
            Value::String(self.component_type.schema_version().into()),
        );
        for (k, v) in self.properties.iter() {
            obj.insert(k.into(), Value::String(v.into()));
        }
        obj.insert(KEY_UUID.into(), Value::String(self.identity.to_string()));
        if !self.children.is_empty() {
            obj.insert(
                KEY_COMPONENTS.into(),
                Value::Array(self.children.iter().map(Self::to_json).collect()),
            );
        }
        Value::Object(obj)
    }

    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        let obj = value
            .as_object()
            .ok_or_else(|| malformed("component is not an object"))?;

        let name = required_str(obj, KEY_NAME)?;
        let component_type: ComponentType = required_str(obj, KEY_TYPE)?.parse()?;
        let identity = obj
            .get(KEY_UUID)
            .and_then(Value::as_str)
            .map(IdentityToken::from_existing)
            .unwrap_or_else(IdentityToken::generate);

        let mut node = ComponentNode {
            name: name.to_string(),
            component_type,
            properties: PropertyMap::new(),
            children: Vec::new(),
            identity,
        };

        for (key, value) in obj {
            match key.as_str() {
                KEY_NAME | KEY_TYPE | KEY_VERSION | KEY_UUID => {}
                KEY_COMPONENTS => {
                    let children = value
                        .as_array()
                        .ok_or_else(|| malformed("$Components is not an array"))?;
                    for child in children {
                        node.push_child(Self::from_json(child)?)?;
                    }
                }
                _ => node.properties.set(key.clone(), scalar_text(value)),
            }
        }
        Ok(node)
    }
}

/// The screen (`Screen1`) and everything on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDocument {
    pub screen_properties: PropertyMap,
    pub components: Vec<ComponentNode>,
}

impl ProjectDocument {
    /// A screen with the standard Form properties and no components.
    pub fn new(name: &ProjectName) -> Self {
        let screen_properties = PropertyMap::new()
            .with(KEY_NAME, NameAllocator::SCREEN_NAME)
            .with(KEY_TYPE, "Form")
            .with(KEY_VERSION, FORM_VERSION)
            .with("AppName", name.display())
            .with("Title", name.display())
            .with("AlignHorizontal", "1")
            .with("AlignVertical", "1")
            .with("BackgroundColor", "&HFFFFFFFF")
            .with("ScreenOrientation", "portrait")
            .with("Scrollable", "False")
            .with("TitleVisible", "True")
            .with("VersionCode", "1")
            .with("VersionName", "1.0")
            .with(KEY_UUID, IdentityToken::generate().as_str());
        Self {
            screen_properties,
            components: Vec::new(),
        }
    }

    pub fn screen_uuid(&self) -> Option<&str> {
        self.screen_properties.get(KEY_UUID)
    }

    /// Every node in the tree, depth-first.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentNode> {
        self.components.iter().flat_map(ComponentNode::walk)
    }

    pub fn component_count(&self) -> usize {
        self.iter().count()
    }

    pub fn find(&self, name: &str) -> Option<&ComponentNode> {
        self.iter().find(|node| node.name == name)
    }

    /// Names unique (Screen1 included), children only under containers.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = std::collections::HashSet::new();
        seen.insert(NameAllocator::SCREEN_NAME);
        for node in self.iter() {
            if !seen.insert(node.name.as_str()) {
                return Err(DomainError::DuplicateComponentName {
                    name: node.name.clone(),
                });
            }
            if !node.children.is_empty() && !node.component_type.is_container() {
                return Err(DomainError::ChildrenOnLeaf {
                    name: node.name.clone(),
                    component_type: node.component_type.to_string(),
                });
            }
        }
        Ok(())
    }

    /// The `Properties` object of the screen definition.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        for (k, v) in self.screen_properties.iter() {
            obj.insert(k.into(), Value::String(v.into()));
        }
        obj.insert(
            KEY_COMPONENTS.into(),
            Value::Array(self.components.iter().map(ComponentNode::to_json).collect()),
        );
        Value::Object(obj)
    }

    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        let obj = value
            .as_object()
            .ok_or_else(|| malformed("Properties is not an object"))?;

        let mut screen_properties = PropertyMap::new();
        let mut components = Vec::new();
        for (key, value) in obj {
            if key == KEY_COMPONENTS {
                let list = value
                    .as_array()
                    .ok_or_else(|| malformed("$Components is not an array"))?;
                components = list
                    .iter()
                    .map(ComponentNode::from_json)
                    .collect::<Result<_, _>>()?;
            } else {
                screen_properties.set(key.clone(), scalar_text(value));
            }
        }

        if screen_properties.get(KEY_TYPE) != Some("Form") {
            return Err(malformed("Properties.$Type is not Form"));
        }
        Ok(Self {
            screen_properties,
            components,
        })
    }
}

fn required_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a str, DomainError> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(&format!("component is missing {key}")))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn malformed(reason: &str) -> DomainError {
    DomainError::MalformedScreenDefinition(reason.to_string())
}
