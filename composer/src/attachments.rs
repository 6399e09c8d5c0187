//! Attachment staging: what the user picked, before anything is persisted.
//!
//! Picked media stays in place on disk until send time; staging only
//! records the source and the downscaled preview produced by the caller at
//! pick time. The size ceiling is enforced twice — at staging for anything
//! the store cannot shrink, and again by the store itself.

use std::path::Path;
use std::path::PathBuf;

/// Maximum size of any attachment, in bytes.
pub const MAX_ATTACHMENT_BYTES: u64 = 8_000_000;

/// Where a picked image's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A still image; re-encoded/copied by the store at send time.
    Still { path: PathBuf },
    /// An animated image (gif/webp); persisted byte-for-byte, so it must
    /// fit the size ceiling as picked.
    Animated { path: PathBuf },
}

impl ImageSource {
    pub fn path(&self) -> &Path {
        match self {
            ImageSource::Still { path } | ImageSource::Animated { path } => path,
        }
    }

    pub(crate) fn is_animated(&self) -> bool {
        matches!(self, ImageSource::Animated { .. })
    }
}

/// An image chosen by the user, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedImage {
    pub source: ImageSource,
    pub size_bytes: u64,
    /// Downscaled base64 representation produced at pick time for display.
    pub preview: String,
}

/// A file chosen by the user, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
}

/// Runtime bookkeeping for staged-but-unsent attachment sources.
#[derive(Debug, Default)]
pub(crate) struct StagedAttachments {
    pub images: Vec<PickedImage>,
    /// Recorded voice file and its duration in milliseconds.
    pub voice: Option<(PathBuf, u32)>,
    pub file: Option<PickedFile>,
}

impl StagedAttachments {
    pub fn clear(&mut self) {
        self.images.clear();
        self.voice = None;
        self.file = None;
    }
}
