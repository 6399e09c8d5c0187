//! The composer engine: the state machine behind one chat's message input.
//!
//! It is responsible for:
//!
//! - Owning the transient [`ComposerState`] of an in-progress outgoing
//!   message (text, staged attachment preview, quote/edit context, live
//!   session, sending flag).
//! - Deciding, on every local mutation, whether to mutate state only,
//!   schedule a debounced link-preview lookup, or emit a send/update against
//!   the Messaging API.
//! - Staging attachments (images, voice recordings, files) without
//!   persisting anything until send time.
//! - Driving the "live message" flow: send early, keep revising the sent
//!   message as the user types, truncated to whole words.
//!
//! The engine is a pure orchestration layer. Network transport, storage, and
//! link resolution are reached through the [`MessagingApi`],
//! [`AttachmentStore`], and [`LinkPreviewResolver`] seams; rendering,
//! pickers, permission dialogs, and the recorder belong to the caller.

pub mod api;
pub mod attachments;
mod emoji;
pub mod engine;
mod error;
mod link_preview;
pub mod resolver;
pub mod state;
pub mod store;
pub mod word_boundary;

pub use api::MessagingApi;
pub use api::SendError;
pub use attachments::ImageSource;
pub use attachments::MAX_ATTACHMENT_BYTES;
pub use attachments::PickedFile;
pub use attachments::PickedImage;
pub use emoji::TextSizeHint;
pub use engine::ComposerEngine;
pub use engine::SharedContent;
pub use error::ComposeError;
pub use resolver::HttpLinkPreviewResolver;
pub use resolver::LinkPreviewResolver;
pub use state::ComposeContext;
pub use state::ComposePreview;
pub use state::ComposerState;
pub use state::LiveMessage;
pub use state::RecordingState;
pub use store::AttachmentError;
pub use store::AttachmentHandle;
pub use store::AttachmentStore;
pub use store::FsAttachmentStore;
