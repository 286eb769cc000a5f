//! The in-memory contents of a `.aia` archive, before packing.

use std::fmt;

use crate::domain::error::DomainError;

/// Canonical member paths.
pub mod paths {
    pub const PROJECT_PROPERTIES: &str = "youngandroidproject/project.properties";
    pub const ASSETS_DIR: &str = "assets/";
    pub const BUILD_DIR: &str = "build/";
    pub const MANIFEST: &str = "META-INF/MANIFEST.MF";

    const SOURCE_ROOT: &str = "src/appinventor/ai_user";

    pub fn screen_definition(clean_name: &str) -> String {
        format!("{SOURCE_ROOT}/{clean_name}/Screen1.scm")
    }

    pub fn blocks(clean_name: &str) -> String {
        format!("{SOURCE_ROOT}/{clean_name}/Screen1.bky")
    }

    pub(crate) fn is_source_member(path: &str, file_name: &str) -> bool {
        path.strip_prefix(SOURCE_ROOT)
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|rest| rest.strip_suffix(file_name))
            .is_some_and(|dir| {
                dir.ends_with('/') && dir.len() > 1 && !dir[..dir.len() - 1].contains('/')
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    File,
    Directory,
}

/// The five parts every archive must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalMember {
    ProjectProperties,
    ScreenDefinition,
    Blocks,
    /// `assets/` and `build/`; both are needed.
    PlaceholderDirectories,
    Manifest,
}

impl LogicalMember {
    pub const ALL: [LogicalMember; 5] = [
        Self::ProjectProperties,
        Self::ScreenDefinition,
        Self::Blocks,
        Self::PlaceholderDirectories,
        Self::Manifest,
    ];

    fn describe(&self) -> &'static str {
        match self {
            Self::ProjectProperties => paths::PROJECT_PROPERTIES,
            Self::ScreenDefinition => "src/appinventor/ai_user/<name>/Screen1.scm",
            Self::Blocks => "src/appinventor/ai_user/<name>/Screen1.bky",
            Self::PlaceholderDirectories => "assets/ and build/",
            Self::Manifest => paths::MANIFEST,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ArchiveMember {
    pub path: String,
    pub kind: MemberKind,
    pub bytes: Vec<u8>,
}

impl ArchiveMember {
    pub fn file(path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            kind: MemberKind::File,
            bytes: bytes.into(),
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.ends_with('/') {
            path.push('/');
        }
        Self {
            path,
            kind: MemberKind::Directory,
            bytes: Vec::new(),
        }
    }

    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    pub fn role(&self) -> Option<LogicalMember> {
        match (self.kind, self.path.as_str()) {
            (MemberKind::File, paths::PROJECT_PROPERTIES) => Some(LogicalMember::ProjectProperties),
            (MemberKind::File, paths::MANIFEST) => Some(LogicalMember::Manifest),
            (MemberKind::Directory, paths::ASSETS_DIR | paths::BUILD_DIR) => {
                Some(LogicalMember::PlaceholderDirectories)
            }
            (MemberKind::File, p) if paths::is_source_member(p, "Screen1.scm") => {
                Some(LogicalMember::ScreenDefinition)
            }
            (MemberKind::File, p) if paths::is_source_member(p, "Screen1.bky") => {
                Some(LogicalMember::Blocks)
            }
            _ => None,
        }
    }
}

impl fmt::Debug for ArchiveMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveMember")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Ordered archive members with unique, relative paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveLayout {
    members: Vec<ArchiveMember>,
}

impl ArchiveLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, member: ArchiveMember) -> Result<(), DomainError> {
        if is_absolute(&member.path) {
            return Err(DomainError::AbsolutePathNotAllowed { path: member.path });
        }
        if self.get(&member.path).is_some() {
            return Err(DomainError::DuplicatePath { path: member.path });
        }
        self.members.push(member);
        Ok(())
    }

    pub fn with(mut self, member: ArchiveMember) -> Result<Self, DomainError> {
        self.push(member)?;
        Ok(self)
    }

    pub fn members(&self) -> &[ArchiveMember] {
        &self.members
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.path.as_str())
    }

    pub fn get(&self, path: &str) -> Option<&ArchiveMember> {
        self.members.iter().find(|m| m.path == path)
    }

    pub fn find_role(&self, role: LogicalMember) -> Option<&ArchiveMember> {
        self.members.iter().find(|m| m.role() == Some(role))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Every logical member is present, and both placeholder directories.
    pub fn validate(&self) -> Result<(), DomainError> {
        for role in LogicalMember::ALL {
            if self.find_role(role).is_none() {
                return Err(DomainError::MissingArchiveMember {
                    path: role.describe().to_string(),
                });
            }
        }
        for dir in [paths::ASSETS_DIR, paths::BUILD_DIR] {
            if self.get(dir).is_none() {
                return Err(DomainError::MissingArchiveMember {
                    path: dir.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/')
        || path.starts_with('\\')
        || path.as_bytes().get(1) == Some(&b':')
}
