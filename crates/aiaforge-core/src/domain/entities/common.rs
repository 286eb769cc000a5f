use std::collections::HashSet;
use std::fmt;

use uuid::Uuid;

use crate::domain::value_objects::ComponentType;

/// Insertion-ordered string → string mapping.
///
/// Invariant: keys are unique. `set` on an existing key replaces the value
/// in place, so the original position is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: Vec<(String, String)>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Append only if the key is not present yet.
    pub fn set_if_absent(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if !self.contains_key(&key) {
            self.entries.push((key, value.into()));
        }
    }

    /// Builder-style `set`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

/// Random v4 UUID string attached to components, blocks, and the screen.
///
/// Structural only; not security sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a token read back from an existing document.
    pub fn from_existing(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out component names that are unique across one tree.
///
/// `Screen1` is always taken.
#[derive(Debug, Clone)]
pub struct NameAllocator {
    taken: HashSet<String>,
}

impl Default for NameAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl NameAllocator {
    pub const SCREEN_NAME: &'static str = "Screen1";

    pub fn new() -> Self {
        let mut taken = HashSet::new();
        taken.insert(Self::SCREEN_NAME.to_string());
        Self { taken }
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Allocate a name for a component of `component_type`.
    ///
    /// The requested name is reduced to an identifier first; when nothing
    /// usable is left the name becomes `<Type><n>`. Collisions get a numeric
    /// suffix starting at 2.
    pub fn allocate(&mut self, requested: Option<&str>, component_type: ComponentType) -> String {
        let name = match requested.and_then(to_identifier) {
            Some(base) if !self.is_taken(&base) => base,
            Some(base) => self.next_free(&base, 2),
            None => self.next_free(component_type.as_str(), 1),
        };
        self.taken.insert(name.clone());
        name
    }

    fn next_free(&self, base: &str, start: usize) -> String {
        (start..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| !self.is_taken(candidate))
            .unwrap_or_else(|| format!("{base}{}", Uuid::new_v4().simple()))
    }
}

/// Reduce free text to `[A-Za-z][A-Za-z0-9_]*`, or `None` if nothing is left.
pub fn to_identifier(raw: &str) -> Option<String> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .skip_while(|c| !c.is_ascii_alphabetic())
        .collect();
    (!kept.is_empty()).then_some(kept)
}
