//! Shared message-layer data model for the quill client crates.
//!
//! Everything here is plain data: chat and message identifiers, the message
//! content union, link-preview metadata, text formatting spans (with the
//! canonical span parser), and small formatting helpers. The composer engine
//! produces these values; Messaging API implementations put them on the wire.

pub mod byte_format;
pub mod formatting;
pub mod message;

pub use formatting::Format;
pub use formatting::FormattedSpan;
pub use message::ChatRef;
pub use message::ChatType;
pub use message::LinkPreviewData;
pub use message::Message;
pub use message::MessageId;
pub use message::MsgContent;
