//! Attachment persistence: staged sources become durable files at send
//! time.
//!
//! [`FsAttachmentStore`] keeps attachments in a flat application files
//! directory. Names are made unique with a counter suffix, and every write
//! goes through a temp file in the same directory so a crash never leaves
//! a half-written attachment behind a final name.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Local;
use quill_protocol::byte_format::format_bytes;
use serde::Deserialize;
use serde::Serialize;

use crate::attachments::MAX_ATTACHMENT_BYTES;

/// Why an attachment could not be persisted. Size-limit rejections are
/// user-visible and distinct from I/O failures.
#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("file is too large: the maximum supported size is {}", format_bytes(*limit))]
    TooLarge { size: u64, limit: u64 },
    #[error("failed to store attachment")]
    Io(#[from] std::io::Error),
}

/// Name of a persisted attachment within the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentHandle(pub String);

impl AttachmentHandle {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttachmentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Durable storage for outgoing attachments.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Persist a still image picked by the user.
    async fn persist_image(&self, source: &Path) -> Result<AttachmentHandle, AttachmentError>;

    /// Persist an animated image byte-for-byte.
    async fn persist_animated_image(
        &self,
        source: &Path,
    ) -> Result<AttachmentHandle, AttachmentError>;

    /// Persist an arbitrary file under (a unique variant of) `name`.
    async fn persist_file(
        &self,
        source: &Path,
        name: &str,
    ) -> Result<AttachmentHandle, AttachmentError>;
}

/// Filesystem-backed [`AttachmentStore`].
///
/// The store copies sources as-is; producing display-ready image bytes
/// (decoding, downscaling) is the caller's concern.
pub struct FsAttachmentStore {
    dir: PathBuf,
    max_bytes: u64,
}

impl FsAttachmentStore {
    /// Store rooted at the default application files directory
    /// (`~/.quill/app_files`). `None` when no home directory is available.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::with_dir(home.join(".quill").join("app_files")))
    }

    pub fn with_dir(dir: PathBuf) -> Self {
        Self {
            dir,
            max_bytes: MAX_ATTACHMENT_BYTES,
        }
    }

    async fn persist(
        &self,
        source: &Path,
        dest_name: &str,
    ) -> Result<AttachmentHandle, AttachmentError> {
        let size = tokio::fs::metadata(source).await?.len();
        if size > self.max_bytes {
            return Err(AttachmentError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        tokio::fs::create_dir_all(&self.dir).await?;

        let unique = unique_name(&self.dir, dest_name);
        let bytes = tokio::fs::read(source).await?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        tmp.persist(self.dir.join(&unique))
            .map_err(|err| AttachmentError::Io(err.error))?;
        Ok(AttachmentHandle(unique))
    }
}

#[async_trait]
impl AttachmentStore for FsAttachmentStore {
    async fn persist_image(&self, source: &Path) -> Result<AttachmentHandle, AttachmentError> {
        let ext = normalized_extension(source).unwrap_or_else(|| "jpg".to_string());
        let name = format!("IMG_{}.{ext}", Local::now().format("%Y%m%d_%H%M%S"));
        self.persist(source, &name).await
    }

    async fn persist_animated_image(
        &self,
        source: &Path,
    ) -> Result<AttachmentHandle, AttachmentError> {
        let ext = normalized_extension(source).unwrap_or_else(|| "gif".to_string());
        let name = format!("IMG_{}.{ext}", Local::now().format("%Y%m%d_%H%M%S"));
        self.persist(source, &name).await
    }

    async fn persist_file(
        &self,
        source: &Path,
        name: &str,
    ) -> Result<AttachmentHandle, AttachmentError> {
        self.persist(source, name).await
    }
}

/// Lowercased source extension, rejecting anything that does not look like
/// an image/file suffix (fewer than 3 or more than 4 characters).
fn normalized_extension(source: &Path) -> Option<String> {
    let ext = source.extension()?.to_str()?.to_lowercase();
    ((3..=4).contains(&ext.len())).then_some(ext)
}

/// First variant of `name` that does not collide with an existing file:
/// `report.pdf`, `report_1.pdf`, `report_2.pdf`, ...
fn unique_name(dir: &Path, name: &str) -> String {
    if !dir.join(name).exists() {
        return name.to_string();
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    let mut n = 1usize;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{stem}_{n}.{ext}"),
            None => format!("{stem}_{n}"),
        };
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> (tempfile::TempDir, FsAttachmentStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("store dir");
        let src = tempfile::tempdir().expect("source dir");
        let store = FsAttachmentStore::with_dir(dir.path().to_path_buf());
        (dir, store, src)
    }

    #[tokio::test]
    async fn persists_file_under_its_own_name() {
        let (dir, store, src) = store();
        let source = src.path().join("report.pdf");
        tokio::fs::write(&source, b"content").await.expect("write");

        let handle = store
            .persist_file(&source, "report.pdf")
            .await
            .expect("persist");
        assert_eq!(handle.name(), "report.pdf");

        let stored = tokio::fs::read(dir.path().join("report.pdf"))
            .await
            .expect("read back");
        assert_eq!(stored, b"content");
    }

    #[tokio::test]
    async fn colliding_names_get_a_counter_suffix() {
        let (_dir, store, src) = store();
        let source = src.path().join("report.pdf");
        tokio::fs::write(&source, b"x").await.expect("write");

        let first = store
            .persist_file(&source, "report.pdf")
            .await
            .expect("first");
        let second = store
            .persist_file(&source, "report.pdf")
            .await
            .expect("second");
        let third = store
            .persist_file(&source, "report.pdf")
            .await
            .expect("third");

        assert_eq!(first.name(), "report.pdf");
        assert_eq!(second.name(), "report_1.pdf");
        assert_eq!(third.name(), "report_2.pdf");
    }

    #[tokio::test]
    async fn oversized_sources_are_rejected_before_any_write() {
        let (dir, _store, src) = store();
        let source = src.path().join("huge.bin");
        tokio::fs::write(&source, vec![0u8; 1024]).await.expect("write");

        let mut small = FsAttachmentStore::with_dir(dir.path().to_path_buf());
        small.max_bytes = 1023;
        let err = small
            .persist_file(&source, "huge.bin")
            .await
            .expect_err("too large");
        assert!(matches!(
            err,
            AttachmentError::TooLarge { size: 1024, limit: 1023 }
        ));
        assert!(!dir.path().join("huge.bin").exists());
    }

    #[tokio::test]
    async fn image_names_carry_a_timestamp_and_source_extension() {
        let (_dir, store, src) = store();
        let source = src.path().join("picked.PNG");
        tokio::fs::write(&source, b"png bytes").await.expect("write");

        let handle = store.persist_image(&source).await.expect("persist");
        assert!(handle.name().starts_with("IMG_"));
        assert!(handle.name().ends_with(".png"));
    }

    #[tokio::test]
    async fn strange_extensions_fall_back_per_kind() {
        let (_dir, store, src) = store();
        let source = src.path().join("clip.animation");
        tokio::fs::write(&source, b"gif bytes").await.expect("write");

        let handle = store
            .persist_animated_image(&source)
            .await
            .expect("persist");
        assert!(handle.name().ends_with(".gif"));
    }
}
