//! Chat and message identifiers plus the message content model.
//!
//! `MsgContent` mirrors the wire content union: every variant carries the
//! user-visible `text`, rich variants add their payload alongside it. The
//! serialized form is tagged (`{"type": "image", ...}`) so either side can
//! dispatch on the kind without touching the payload.

use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;

/// Which kind of conversation a [`ChatRef`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatType {
    Direct,
    Group,
}

/// Reference to one open chat, as understood by the Messaging API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatRef {
    pub chat_type: ChatType,
    pub api_id: i64,
}

/// Identifier of a sent message within its chat.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Resolved metadata for a URL found in message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPreviewData {
    pub uri: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Downscaled base64 representation of the page image, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Content of an outgoing or stored message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MsgContent {
    Text {
        text: String,
    },
    Link {
        text: String,
        preview: LinkPreviewData,
    },
    /// `image` is the downscaled base64 representation shown while the full
    /// file transfers.
    Image {
        text: String,
        image: String,
    },
    /// `duration` is in whole seconds.
    Voice {
        text: String,
        duration: u32,
    },
    File {
        text: String,
    },
}

impl MsgContent {
    /// The user-visible text of this content; empty for caption-less items.
    pub fn text(&self) -> &str {
        match self {
            MsgContent::Text { text }
            | MsgContent::Link { text, .. }
            | MsgContent::Image { text, .. }
            | MsgContent::Voice { text, .. }
            | MsgContent::File { text } => text,
        }
    }
}

/// A message as returned by the Messaging API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub chat: ChatRef,
    pub content: MsgContent,
    /// Name of the attached file in the attachment store, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub sent_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn msg_content_serializes_with_type_tag() {
        let content = MsgContent::Image {
            text: "caption".to_string(),
            image: "AAAA".to_string(),
        };
        let json = serde_json::to_value(&content).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"type": "image", "text": "caption", "image": "AAAA"})
        );

        let back: MsgContent = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, content);
    }

    #[test]
    fn msg_content_kind_tag_matches_wire_tag() {
        let content = MsgContent::Voice {
            text: String::new(),
            duration: 6,
        };
        assert_eq!(content.to_string(), "voice");
    }

    #[test]
    fn text_accessor_reaches_every_variant() {
        let preview = LinkPreviewData {
            uri: "https://example.com".to_string(),
            title: "Example".to_string(),
            description: String::new(),
            image: None,
        };
        let contents = [
            MsgContent::Text {
                text: "a".to_string(),
            },
            MsgContent::Link {
                text: "b".to_string(),
                preview,
            },
            MsgContent::Image {
                text: "c".to_string(),
                image: String::new(),
            },
            MsgContent::Voice {
                text: "d".to_string(),
                duration: 1,
            },
            MsgContent::File {
                text: "e".to_string(),
            },
        ];
        let texts: Vec<&str> = contents.iter().map(MsgContent::text).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d", "e"]);
    }
}
