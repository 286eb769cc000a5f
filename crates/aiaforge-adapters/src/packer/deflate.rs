//! Deflate zip packer.

use std::io::{Cursor, Read, Write};

use tracing::{debug, instrument};
use zip::{CompressionMethod, ZipArchive, ZipWriter, result::ZipError, write::FileOptions};

use aiaforge_core::{
    application::{ApplicationError, ports::ArchivePacker},
    domain::{ArchiveLayout, ArchiveMember, MemberKind},
    error::ForgeResult,
};

/// Largest member `unpack` will inflate. Project files are a few KiB.
const MAX_MEMBER_BYTES: u64 = 16 * 1024 * 1024;

/// Packs layouts into a deflate-compressed zip, members in layout order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipPacker;

impl ZipPacker {
    pub fn new() -> Self {
        Self
    }
}

fn packaging(context: &str, err: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Packaging {
        reason: format!("{context}: {err}"),
    }
}

/// Reads at most `limit` bytes. The declared size only sizes the buffer.
fn read_member(
    name: &str,
    reader: impl Read,
    declared: u64,
    limit: u64,
) -> Result<Vec<u8>, ApplicationError> {
    let mut content = Vec::with_capacity(declared.min(limit) as usize);
    reader
        .take(limit + 1)
        .read_to_end(&mut content)
        .map_err(|e| packaging(name, e))?;
    if content.len() as u64 > limit {
        return Err(ApplicationError::ValidationFailed(format!(
            "member '{name}' is larger than {limit} bytes"
        )));
    }
    Ok(content)
}

impl ArchivePacker for ZipPacker {
    #[instrument(skip_all, fields(members = layout.len()))]
    fn pack(&self, layout: &ArchiveLayout) -> ForgeResult<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = ZipWriter::new(&mut cursor);
            let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

            for member in layout.members() {
                match member.kind {
                    MemberKind::Directory => writer
                        .add_directory(member.path.as_str(), options)
                        .map_err(|e| packaging(&member.path, e))?,
                    MemberKind::File => {
                        writer
                            .start_file(member.path.as_str(), options)
                            .map_err(|e| packaging(&member.path, e))?;
                        writer
                            .write_all(&member.bytes)
                            .map_err(|e| packaging(&member.path, e))?;
                    }
                }
                debug!(path = %member.path, bytes = member.bytes.len(), "Packed member");
            }

            writer
                .finish()
                .map_err(|e| packaging("finalizing archive", e))?;
        }

        Ok(cursor.into_inner())
    }

    #[instrument(skip_all, fields(bytes = bytes.len()))]
    fn unpack(&self, bytes: &[u8]) -> ForgeResult<ArchiveLayout> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| match e {
            ZipError::InvalidArchive(_) | ZipError::UnsupportedArchive(_) => {
                ApplicationError::ValidationFailed(format!("not a zip archive: {e}"))
            }
            other => packaging("opening archive", other),
        })?;

        let mut layout = ArchiveLayout::new();
        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| packaging("reading entry", e))?;
            let name = entry.name().to_string();

            let member = if entry.is_dir() {
                ArchiveMember::directory(name)
            } else {
                let declared = entry.size();
                let content = read_member(&name, &mut entry, declared, MAX_MEMBER_BYTES)?;
                ArchiveMember::file(name, content)
            };
            layout.push(member)?;
        }

        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiaforge_core::error::ForgeError;

    fn layout() -> ArchiveLayout {
        ArchiveLayout::new()
            .with(ArchiveMember::file("a/one.txt", "hello"))
            .unwrap()
            .with(ArchiveMember::directory("assets"))
            .unwrap()
            .with(ArchiveMember::file("META-INF/MANIFEST.MF", "Manifest-Version: 1.0\n"))
            .unwrap()
    }

    #[test]
    fn members_come_back_in_stored_order() {
        let packer = ZipPacker::new();
        let bytes = packer.pack(&layout()).unwrap();
        let back = packer.unpack(&bytes).unwrap();

        let paths: Vec<_> = back.paths().collect();
        assert_eq!(paths, ["a/one.txt", "assets/", "META-INF/MANIFEST.MF"]);
        assert_eq!(back.get("a/one.txt").unwrap().text(), Some("hello"));
        assert_eq!(back.get("assets/").unwrap().kind, MemberKind::Directory);
    }

    #[test]
    fn entries_are_deflated() {
        let body = "x".repeat(4096);
        let layout = ArchiveLayout::new()
            .with(ArchiveMember::file("big.txt", body.as_str()))
            .unwrap();
        let bytes = ZipPacker.pack(&layout).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let entry = archive.by_name("big.txt").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
        assert!(entry.compressed_size() < entry.size());
    }

    #[test]
    fn member_over_limit_is_rejected() {
        let err = read_member("big.txt", &[7u8; 65][..], 64, 64).unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationFailed(_)));

        let exact = read_member("fits.txt", &[7u8; 64][..], 64, 64).unwrap();
        assert_eq!(exact.len(), 64);
    }

    #[test]
    fn declared_size_does_not_drive_allocation() {
        let content = read_member("liar.txt", &b"tiny"[..], u64::MAX, 64).unwrap();
        assert_eq!(content, b"tiny");
        assert!(content.capacity() <= 64);
    }

    #[test]
    fn garbage_is_rejected() {
        let err = ZipPacker.unpack(b"definitely not a zip").unwrap_err();
        assert!(matches!(
            err,
            ForgeError::Application(ApplicationError::ValidationFailed(_))
        ));
    }
}
