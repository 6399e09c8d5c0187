//! Composer state: the shape of one in-progress outgoing message.
//!
//! Everything here is a plain serializable record so the caller can persist
//! a draft across process death and restore it with
//! [`ComposerEngine::with_state`](crate::ComposerEngine::with_state). The
//! engine itself never persists anything.

use quill_protocol::LinkPreviewData;
use quill_protocol::Message;
use quill_protocol::MessageId;
use quill_protocol::MsgContent;
use serde::Deserialize;
use serde::Serialize;

/// Staged preview shown above the input field. At most one kind at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComposePreview {
    #[default]
    None,
    /// `preview: None` is the loading placeholder while resolution is
    /// pending.
    Link { preview: Option<LinkPreviewData> },
    /// Downscaled base64 representations of the staged images, in pick
    /// order.
    Images { previews: Vec<String> },
    Voice {
        path: String,
        duration_ms: u32,
        finished: bool,
    },
    File { name: String },
}

/// What the message being composed relates to, if anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComposeContext {
    #[default]
    None,
    Quoting { message_id: MessageId },
    Editing { message: Message },
}

/// An in-flight live message: sent early, progressively revised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveMessage {
    /// The already-sent message that live updates keep revising.
    pub message_id: MessageId,
    /// Last full text the user typed.
    pub typed_text: String,
    /// Last word-truncated text actually transmitted.
    pub sent_text: String,
}

/// Voice recorder lifecycle, reported into the engine by the caller's
/// recorder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordingState {
    #[default]
    NotStarted,
    Started { path: String, progress_ms: u32 },
    Finished { path: String, duration_ms: u32 },
}

impl RecordingState {
    /// Path of the recording file, once one exists.
    pub fn file_path(&self) -> Option<&str> {
        match self {
            RecordingState::NotStarted => None,
            RecordingState::Started { path, .. } | RecordingState::Finished { path, .. } => {
                Some(path)
            }
        }
    }
}

/// Transient state of the message being composed in one open chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposerState {
    pub text: String,
    pub live: Option<LiveMessage>,
    pub preview: ComposePreview,
    pub context: ComposeContext,
    /// True while a send/update round trip is outstanding.
    pub sending: bool,
    /// Per-session privacy policy; never changes while the chat is open.
    pub link_previews_enabled: bool,
}

impl ComposerState {
    pub fn new(link_previews_enabled: bool) -> Self {
        Self {
            text: String::new(),
            live: None,
            preview: ComposePreview::None,
            context: ComposeContext::None,
            sending: false,
            link_previews_enabled,
        }
    }

    /// State for editing an already-sent message: text and preview are
    /// seeded from the message content.
    pub fn editing(message: Message, link_previews_enabled: bool) -> Self {
        Self {
            text: message.content.text().to_string(),
            live: None,
            preview: message_preview(&message),
            context: ComposeContext::Editing { message },
            sending: false,
            link_previews_enabled,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.context, ComposeContext::Editing { .. })
    }

    /// Whether the send control should be active: there must be something
    /// to send and no round trip may be outstanding.
    pub fn send_enabled(&self) -> bool {
        let has_content = match &self.preview {
            ComposePreview::Images { .. }
            | ComposePreview::Voice { .. }
            | ComposePreview::File { .. } => true,
            ComposePreview::None | ComposePreview::Link { .. } => {
                !self.text.is_empty() || self.live.is_some()
            }
        };
        has_content && !self.sending
    }

    /// Link previews are offered only for plain text input, and only when
    /// the per-session policy allows them.
    pub fn link_preview_allowed(&self) -> bool {
        match self.preview {
            ComposePreview::Images { .. }
            | ComposePreview::Voice { .. }
            | ComposePreview::File { .. } => false,
            ComposePreview::None | ComposePreview::Link { .. } => self.link_previews_enabled,
        }
    }

    /// The resolved link preview, if one is staged.
    pub fn link_preview(&self) -> Option<&LinkPreviewData> {
        match &self.preview {
            ComposePreview::Link { preview } => preview.as_ref(),
            _ => None,
        }
    }

    /// Attachments cannot be staged while editing, while a live message is
    /// active, or while another attachment preview is already staged.
    pub fn attachment_disabled(&self) -> bool {
        if self.is_editing() || self.live.is_some() {
            return true;
        }
        !matches!(
            self.preview,
            ComposePreview::None | ComposePreview::Link { .. }
        )
    }
}

/// Preview to seed when entering edit mode on `message`.
pub fn message_preview(message: &Message) -> ComposePreview {
    match &message.content {
        MsgContent::Text { .. } => ComposePreview::None,
        MsgContent::Link { preview, .. } => ComposePreview::Link {
            preview: Some(preview.clone()),
        },
        MsgContent::Image { image, .. } => ComposePreview::Images {
            previews: vec![image.clone()],
        },
        MsgContent::Voice { duration, .. } => ComposePreview::Voice {
            path: message.file.clone().unwrap_or_default(),
            duration_ms: duration * 1000,
            finished: true,
        },
        MsgContent::File { .. } => ComposePreview::File {
            name: message.file.clone().unwrap_or_default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use quill_protocol::ChatRef;
    use quill_protocol::ChatType;

    fn message(content: MsgContent, file: Option<&str>) -> Message {
        Message {
            id: MessageId(7),
            chat: ChatRef {
                chat_type: ChatType::Direct,
                api_id: 1,
            },
            content,
            file: file.map(str::to_string),
            sent_at: Utc::now(),
        }
    }

    #[test]
    fn editing_seeds_text_and_preview_from_message() {
        let msg = message(
            MsgContent::Voice {
                text: "note".to_string(),
                duration: 6,
            },
            Some("voice_1.m4a"),
        );
        let state = ComposerState::editing(msg, true);

        assert_eq!(state.text, "note");
        assert!(state.is_editing());
        assert_eq!(
            state.preview,
            ComposePreview::Voice {
                path: "voice_1.m4a".to_string(),
                duration_ms: 6000,
                finished: true,
            }
        );
    }

    #[test]
    fn send_enabled_requires_content_and_no_outstanding_send() {
        let mut state = ComposerState::new(true);
        assert!(!state.send_enabled());

        state.text = "hi".to_string();
        assert!(state.send_enabled());

        state.sending = true;
        assert!(!state.send_enabled());

        let mut staged = ComposerState::new(true);
        staged.preview = ComposePreview::File {
            name: "report.pdf".to_string(),
        };
        assert!(staged.send_enabled());
    }

    #[test]
    fn attachment_disabled_for_editing_live_and_staged_previews() {
        let mut state = ComposerState::new(true);
        assert!(!state.attachment_disabled());

        state.preview = ComposePreview::Link { preview: None };
        assert!(!state.attachment_disabled());

        state.preview = ComposePreview::Images {
            previews: vec![String::new()],
        };
        assert!(state.attachment_disabled());

        let editing = ComposerState::editing(
            message(
                MsgContent::Text {
                    text: "x".to_string(),
                },
                None,
            ),
            true,
        );
        assert!(editing.attachment_disabled());

        let mut live = ComposerState::new(true);
        live.live = Some(LiveMessage {
            message_id: MessageId(1),
            typed_text: String::new(),
            sent_text: String::new(),
        });
        assert!(live.attachment_disabled());
    }

    #[test]
    fn link_previews_disallowed_once_an_attachment_is_staged() {
        let mut state = ComposerState::new(true);
        assert!(state.link_preview_allowed());

        state.preview = ComposePreview::Voice {
            path: "v.m4a".to_string(),
            duration_ms: 1200,
            finished: false,
        };
        assert!(!state.link_preview_allowed());

        let disabled = ComposerState::new(false);
        assert!(!disabled.link_preview_allowed());
    }

    #[test]
    fn draft_round_trips_through_serde() {
        let mut state = ComposerState::new(true);
        state.text = "see https://example.com".to_string();
        state.preview = ComposePreview::Link {
            preview: Some(LinkPreviewData {
                uri: "https://example.com".to_string(),
                title: "Example".to_string(),
                description: "desc".to_string(),
                image: None,
            }),
        };
        state.context = ComposeContext::Quoting {
            message_id: MessageId(41),
        };

        let json = serde_json::to_string(&state).expect("serialize draft");
        let back: ComposerState = serde_json::from_str(&json).expect("deserialize draft");
        assert_eq!(back, state);
    }
}
