//! Errors surfaced by the composer engine.

use crate::api::SendError;
use crate::store::AttachmentError;

/// Why a composer operation was refused or failed.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// A send was requested while one is already outstanding.
    #[error("a send is already in progress")]
    SendInProgress,
    /// Attachments cannot be staged right now (editing, live session
    /// active, or another attachment already staged).
    #[error("attachments are not available right now")]
    AttachmentsUnavailable,
    /// Live mode cannot start while editing an existing message.
    #[error("live messages are not available while editing")]
    LiveUnavailable,
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
    /// Every part of the send failed; composer state was still cleared.
    #[error(transparent)]
    Send(#[from] SendError),
}
