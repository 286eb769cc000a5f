pub mod app_spec;
pub mod archive_layout;
pub mod blocks;
pub mod common;
pub mod component;

pub use crate::domain::DomainError;
pub use app_spec::{AppSpec, AppSpecBuilder};
pub use archive_layout::{ArchiveLayout, ArchiveMember, LogicalMember, MemberKind};
pub use blocks::{BlockKind, BlockNode, BlocksWorkspace};
pub use common::{IdentityToken, NameAllocator, PropertyMap};
pub use component::{ComponentNode, ProjectDocument};
