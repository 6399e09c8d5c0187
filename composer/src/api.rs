//! Messaging API seam: the engine's view of the send/update surface.

use async_trait::async_trait;
use quill_protocol::ChatRef;
use quill_protocol::FormattedSpan;
use quill_protocol::Message;
use quill_protocol::MessageId;
use quill_protocol::MsgContent;

use crate::store::AttachmentHandle;

/// Failure of a Messaging API round trip. The engine never retries; retry
/// policy belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("send failed: {0}")]
pub struct SendError(pub String);

/// Operations the engine needs from the messaging layer.
///
/// `parse_formatting` is pure text analysis; implementations typically
/// delegate to [`quill_protocol::formatting::parse_spans`]. The async
/// operations are network round trips and must not assume they are called
/// from any particular task.
#[async_trait]
pub trait MessagingApi: Send + Sync {
    fn parse_formatting(&self, text: &str) -> Vec<FormattedSpan>;

    /// Send a brand-new message. Returns the identifier the chat now knows
    /// the message by.
    async fn send_message(
        &self,
        chat: ChatRef,
        content: MsgContent,
        quoted: Option<MessageId>,
        attachment: Option<AttachmentHandle>,
        live: bool,
    ) -> Result<MessageId, SendError>;

    /// Revise an already-sent message in place.
    async fn update_message(
        &self,
        chat: ChatRef,
        message_id: MessageId,
        content: MsgContent,
        live: bool,
    ) -> Result<Message, SendError>;
}
