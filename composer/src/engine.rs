//! The composer engine: per-chat orchestration of text, previews,
//! attachments, and sends.
//!
//! One [`ComposerEngine`] instance is bound to one open chat. All state
//! lives behind a single async mutex, so every mutation is serialized; the
//! caller reads via cloned [`ComposerState`] snapshots.
//!
//! # Link previews
//!
//! Every text change re-parses the input and looks for the first
//! previewable URI. A new URL schedules a background lookup after a
//! 1500 ms quiet period (0 ms when the same URL was scanned immediately
//! before, so a rapid retype re-fetches at once). Each scheduled lookup
//! carries a generation number; a lookup that is no longer current when
//! its timer fires skips the resolver entirely, and one superseded during
//! the fetch discards its result. Only the latest lookup ever writes the
//! preview.
//!
//! # Sending
//!
//! `send` snapshots the state under the lock, flips the `sending` guard
//! (double-submit protection), and performs all network and file I/O
//! outside the lock. Edit mode and live sessions update the target message
//! in place; everything else creates new messages — one per staged image,
//! spaced 100 ms apart so the transport observes staging order, with the
//! typed caption only on the last. The composer is cleared when the round
//! trip completes, whether or not it succeeded.
//!
//! # Live messages
//!
//! `start_live` sends the word-truncated text early and anchors a session
//! to the returned message id. The caller invokes `refresh_live` on its
//! own cadence; a refresh only touches the network when the truncated text
//! actually changed. `finalize_live` issues the last non-live send with
//! the full typed text so the recipient does not keep seeing an
//! in-progress message.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use quill_protocol::ChatRef;
use quill_protocol::Message;
use quill_protocol::MessageId;
use quill_protocol::MsgContent;
use tokio::sync::Mutex;

use crate::api::MessagingApi;
use crate::attachments::ImageSource;
use crate::attachments::MAX_ATTACHMENT_BYTES;
use crate::attachments::PickedFile;
use crate::attachments::PickedImage;
use crate::attachments::StagedAttachments;
use crate::emoji::TextSizeHint;
use crate::emoji::text_size_hint;
use crate::error::ComposeError;
use crate::link_preview::LinkTracker;
use crate::link_preview::PendingLookup;
use crate::link_preview::first_previewable_link;
use crate::resolver::LinkPreviewResolver;
use crate::state::ComposeContext;
use crate::state::ComposePreview;
use crate::state::ComposerState;
use crate::state::LiveMessage;
use crate::state::RecordingState;
use crate::store::AttachmentError;
use crate::store::AttachmentHandle;
use crate::store::AttachmentStore;
use crate::word_boundary::truncate_to_words;

/// Quiet period before a newly-typed URL is resolved.
const LINK_LOOKUP_DEBOUNCE: Duration = Duration::from_millis(1500);

/// Spacing between consecutive sends of a multi-attachment batch, so the
/// transport observes them in staging order.
const BATCH_SEND_SPACING: Duration = Duration::from_millis(100);

/// Content shared into the chat from outside (share sheet, another app).
#[derive(Debug, Clone, PartialEq)]
pub enum SharedContent {
    Text(String),
    Images {
        images: Vec<PickedImage>,
        text: Option<String>,
    },
    File {
        file: PickedFile,
        text: Option<String>,
    },
}

struct ComposerInner {
    state: ComposerState,
    link: LinkTracker,
    staged: StagedAttachments,
    recording: RecordingState,
    /// Voice files recorded this session that the caller must delete when
    /// the chat closes; sending one unregisters it.
    files_to_delete: HashSet<PathBuf>,
}

/// Everything a send needs, captured under the lock before any I/O.
struct SendJob {
    snapshot: ComposerState,
    cancelled: HashSet<String>,
    images: Vec<PickedImage>,
    voice: Option<(PathBuf, u32)>,
    file: Option<PickedFile>,
    msg_text: String,
    live: bool,
}

/// Engine for one open chat's composer. Cheap to clone; all clones share
/// the same state.
#[derive(Clone)]
pub struct ComposerEngine {
    chat: ChatRef,
    api: Arc<dyn MessagingApi>,
    store: Arc<dyn AttachmentStore>,
    resolver: Arc<dyn LinkPreviewResolver>,
    inner: Arc<Mutex<ComposerInner>>,
}

impl ComposerEngine {
    pub fn new(
        chat: ChatRef,
        api: Arc<dyn MessagingApi>,
        store: Arc<dyn AttachmentStore>,
        resolver: Arc<dyn LinkPreviewResolver>,
        link_previews_enabled: bool,
    ) -> Self {
        Self::with_state(
            chat,
            api,
            store,
            resolver,
            ComposerState::new(link_previews_enabled),
        )
    }

    /// Engine seeded with an existing state: a restored draft, or edit mode
    /// via [`ComposerState::editing`].
    pub fn with_state(
        chat: ChatRef,
        api: Arc<dyn MessagingApi>,
        store: Arc<dyn AttachmentStore>,
        resolver: Arc<dyn LinkPreviewResolver>,
        state: ComposerState,
    ) -> Self {
        Self {
            chat,
            api,
            store,
            resolver,
            inner: Arc::new(Mutex::new(ComposerInner {
                state,
                link: LinkTracker::default(),
                staged: StagedAttachments::default(),
                recording: RecordingState::NotStarted,
                files_to_delete: HashSet::new(),
            })),
        }
    }

    pub fn chat(&self) -> ChatRef {
        self.chat
    }

    /// Snapshot of the current state for rendering.
    pub async fn state(&self) -> ComposerState {
        self.inner.lock().await.state.clone()
    }

    /// Latest recorder state fed in via [`Self::recording_changed`].
    pub async fn recording(&self) -> RecordingState {
        self.inner.lock().await.recording.clone()
    }

    /// Voice files the caller must remove from disk when the chat closes.
    pub async fn files_pending_deletion(&self) -> Vec<PathBuf> {
        let inner = self.inner.lock().await;
        inner.files_to_delete.iter().cloned().collect()
    }

    /// Record new input text and re-evaluate the link preview.
    ///
    /// Returns the rendering hint for short all-emoji input; such input
    /// cannot contain a link, so no scan runs for it. Detection fully
    /// re-evaluates on every call — there is no incremental diffing.
    pub async fn text_changed(&self, text: &str) -> TextSizeHint {
        let mut inner = self.inner.lock().await;
        inner.state.text = text.to_string();
        let hint = text_size_hint(text);
        if hint != TextSizeHint::Normal {
            return hint;
        }
        if inner.state.link_preview_allowed() {
            if text.is_empty() {
                if matches!(inner.state.preview, ComposePreview::Link { .. }) {
                    inner.state.preview = ComposePreview::None;
                }
                inner.link.reset();
            } else {
                self.scan_links(&mut inner);
            }
        }
        hint
    }

    /// Route externally-shared content through the regular staging paths.
    pub async fn apply_shared(&self, shared: SharedContent) -> Result<(), ComposeError> {
        match shared {
            SharedContent::Text(text) => {
                self.text_changed(&text).await;
                Ok(())
            }
            SharedContent::Images { images, text } => self.stage_images(images, text).await,
            SharedContent::File { file, text } => self.stage_file(file, text).await,
        }
    }

    /// Stage picked images for sending. Nothing is persisted until send
    /// time; the downscaled previews become visible immediately.
    ///
    /// An oversized animated image cannot be shrunk at send time, so any
    /// such pick rejects the whole staging operation without touching the
    /// preview.
    pub async fn stage_images(
        &self,
        images: Vec<PickedImage>,
        shared_text: Option<String>,
    ) -> Result<(), ComposeError> {
        let mut inner = self.inner.lock().await;
        if inner.state.attachment_disabled() {
            return Err(ComposeError::AttachmentsUnavailable);
        }
        if images.is_empty() {
            return Ok(());
        }
        for image in &images {
            if image.source.is_animated() && image.size_bytes > MAX_ATTACHMENT_BYTES {
                return Err(AttachmentError::TooLarge {
                    size: image.size_bytes,
                    limit: MAX_ATTACHMENT_BYTES,
                }
                .into());
            }
        }
        if let Some(text) = shared_text {
            inner.state.text = text;
        }
        inner.state.preview = ComposePreview::Images {
            previews: images.iter().map(|image| image.preview.clone()).collect(),
        };
        // Staging supersedes any in-flight link lookup.
        inner.link.clear_pending();
        inner.staged.images = images;
        Ok(())
    }

    /// Stage a picked file for sending.
    pub async fn stage_file(
        &self,
        file: PickedFile,
        shared_text: Option<String>,
    ) -> Result<(), ComposeError> {
        let mut inner = self.inner.lock().await;
        if inner.state.attachment_disabled() {
            return Err(ComposeError::AttachmentsUnavailable);
        }
        if file.size_bytes > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge {
                size: file.size_bytes,
                limit: MAX_ATTACHMENT_BYTES,
            }
            .into());
        }
        if let Some(text) = shared_text {
            inner.state.text = text;
        }
        inner.state.preview = ComposePreview::File {
            name: file.name.clone(),
        };
        inner.link.clear_pending();
        inner.staged.file = Some(file);
        Ok(())
    }

    /// Feed a recorder transition into the composer. A started or finished
    /// recording stages the voice preview; the file is tracked for
    /// deletion until it is actually sent.
    pub async fn recording_changed(&self, recording: RecordingState) -> Result<(), ComposeError> {
        match recording {
            RecordingState::NotStarted => {
                self.inner.lock().await.recording = RecordingState::NotStarted;
                Ok(())
            }
            RecordingState::Started { path, progress_ms } => {
                self.voice_added(path, progress_ms, false).await
            }
            RecordingState::Finished { path, duration_ms } => {
                self.voice_added(path, duration_ms, true).await
            }
        }
    }

    async fn voice_added(
        &self,
        path: String,
        duration_ms: u32,
        finished: bool,
    ) -> Result<(), ComposeError> {
        let mut inner = self.inner.lock().await;
        let refreshable = matches!(
            inner.state.preview,
            ComposePreview::None | ComposePreview::Link { .. } | ComposePreview::Voice { .. }
        );
        if inner.state.is_editing() || inner.state.live.is_some() || !refreshable {
            return Err(ComposeError::AttachmentsUnavailable);
        }
        let file = PathBuf::from(&path);
        inner.files_to_delete.insert(file.clone());
        inner.staged.voice = Some((file, duration_ms));
        inner.recording = if finished {
            RecordingState::Finished {
                path: path.clone(),
                duration_ms,
            }
        } else {
            RecordingState::Started {
                path: path.clone(),
                progress_ms: duration_ms,
            }
        };
        inner.state.preview = ComposePreview::Voice {
            path,
            duration_ms,
            finished,
        };
        inner.link.clear_pending();
        Ok(())
    }

    /// Quote `message_id` with the next send.
    pub async fn quote(&self, message_id: MessageId) {
        let mut inner = self.inner.lock().await;
        inner.state.context = ComposeContext::Quoting { message_id };
    }

    /// Enter edit mode on an already-sent message, replacing the whole
    /// composer state as if the message were reopened in the input field.
    pub async fn edit(&self, message: Message) {
        let mut inner = self.inner.lock().await;
        let link_previews_enabled = inner.state.link_previews_enabled;
        inner.state = ComposerState::editing(message, link_previews_enabled);
        inner.link.reset();
        inner.staged.clear();
    }

    /// Drop the quoting context. Text, preview, and staged attachments are
    /// left alone.
    pub async fn cancel_context(&self) {
        let mut inner = self.inner.lock().await;
        inner.state.context = ComposeContext::None;
    }

    /// Unstage the picked images.
    pub async fn cancel_images(&self) {
        let mut inner = self.inner.lock().await;
        inner.state.preview = ComposePreview::None;
        inner.staged.images.clear();
    }

    /// Unstage the recorded voice message. The recorded file stays in the
    /// pending-deletion set; the caller's close-time sweep removes it.
    pub async fn cancel_voice(&self) {
        let mut inner = self.inner.lock().await;
        inner.state.preview = ComposePreview::None;
        inner.staged.voice = None;
        inner.recording = RecordingState::NotStarted;
    }

    /// Unstage the picked file.
    pub async fn cancel_file(&self) {
        let mut inner = self.inner.lock().await;
        inner.state.preview = ComposePreview::None;
        inner.staged.file = None;
    }

    /// Dismiss the current link preview. The URL is remembered so retyping
    /// the same text does not offer it again until tracking is reset.
    pub async fn cancel_link_preview(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(uri) = inner.state.link_preview().map(|lp| lp.uri.clone()) {
            inner.link.cancel(uri);
        } else {
            inner.link.clear_pending();
        }
        inner.state.preview = ComposePreview::None;
    }

    /// Forget all link tracking, including dismissed URLs.
    pub async fn reset_link_preview(&self) {
        self.inner.lock().await.link.reset();
    }

    /// Reset the composer to its initial empty shape and drop every staged
    /// handle.
    pub async fn clear_state(&self) {
        let mut inner = self.inner.lock().await;
        Self::clear_inner(&mut inner, false);
    }

    fn clear_inner(inner: &mut ComposerInner, live: bool) {
        if live {
            inner.state.sending = false;
            return;
        }
        let link_previews_enabled = inner.state.link_previews_enabled;
        inner.state = ComposerState::new(link_previews_enabled);
        inner.link.reset();
        inner.staged.clear();
        inner.recording = RecordingState::NotStarted;
    }

    /// Send the composed message, or apply the pending edit. The composer
    /// is cleared when the round trip completes, whether or not it
    /// succeeded; returns the last message id that went out.
    pub async fn send(&self) -> Result<Option<MessageId>, ComposeError> {
        self.send_inner(None, false).await
    }

    /// Send the current text early as a live message and anchor a session
    /// to it. Subsequent [`Self::refresh_live`] calls keep revising that
    /// message.
    pub async fn start_live(&self) -> Result<(), ComposeError> {
        let typed = {
            let inner = self.inner.lock().await;
            if inner.state.is_editing() {
                return Err(ComposeError::LiveUnavailable);
            }
            if inner.state.live.is_some() {
                return Ok(());
            }
            inner.state.text.clone()
        };
        let sent_text = truncate_to_words(&typed);
        if let Some(id) = self.send_inner(Some(sent_text.clone()), true).await? {
            let mut inner = self.inner.lock().await;
            inner.state.live = Some(LiveMessage {
                message_id: id,
                typed_text: typed,
                sent_text,
            });
        }
        Ok(())
    }

    /// Push the latest typed text into the live message. Intended to be
    /// called on a fixed interval by the caller; no network call is made
    /// while the word-truncated text is unchanged.
    pub async fn refresh_live(&self) -> Result<(), ComposeError> {
        let refresh = {
            let mut inner = self.inner.lock().await;
            let typed = inner.state.text.clone();
            let Some(session) = inner.state.live.clone() else {
                return Ok(());
            };
            match live_update_text(&session, &typed) {
                Some(sent_text) => Some((typed, sent_text)),
                None => {
                    if session.typed_text != typed
                        && let Some(live) = inner.state.live.as_mut()
                    {
                        live.typed_text = typed;
                    }
                    None
                }
            }
        };
        let Some((typed, sent_text)) = refresh else {
            return Ok(());
        };
        if let Some(id) = self.send_inner(Some(sent_text.clone()), true).await? {
            let mut inner = self.inner.lock().await;
            inner.state.live = Some(LiveMessage {
                message_id: id,
                typed_text: typed,
                sent_text,
            });
        }
        Ok(())
    }

    /// Finalize an active live session with one last non-live send carrying
    /// the full typed text, so the recipient does not keep seeing an
    /// in-progress message. Call when the composer is dismissed mid-live.
    pub async fn finalize_live(&self) -> Result<Option<MessageId>, ComposeError> {
        {
            let inner = self.inner.lock().await;
            if inner.state.live.is_none() {
                return Ok(None);
            }
        }
        self.send_inner(None, false).await
    }

    async fn send_inner(
        &self,
        explicit_text: Option<String>,
        live: bool,
    ) -> Result<Option<MessageId>, ComposeError> {
        let job = {
            let mut inner = self.inner.lock().await;
            if !live && inner.state.sending {
                return Err(ComposeError::SendInProgress);
            }
            let snapshot = inner.state.clone();
            if !live {
                inner.state.live = None;
                inner.state.sending = true;
            }
            SendJob {
                msg_text: explicit_text.unwrap_or_else(|| snapshot.text.clone()),
                cancelled: inner.link.cancelled_urls(),
                images: inner.staged.images.clone(),
                voice: inner.staged.voice.clone(),
                file: inner.staged.file.clone(),
                snapshot,
                live,
            }
        };

        let result = self.dispatch(job).await;

        let mut inner = self.inner.lock().await;
        Self::clear_inner(&mut inner, live);
        result
    }

    async fn dispatch(&self, job: SendJob) -> Result<Option<MessageId>, ComposeError> {
        if let ComposeContext::Editing { message } = &job.snapshot.context {
            let content = self.update_content(&message.content, &job);
            let updated = self
                .api
                .update_message(self.chat, message.id, content, job.live)
                .await?;
            return Ok(Some(updated.id));
        }
        if let Some(session) = &job.snapshot.live {
            let content = self.check_link_preview(&job);
            let updated = self
                .api
                .update_message(self.chat, session.message_id, content, job.live)
                .await?;
            return Ok(Some(updated.id));
        }
        self.send_new(job).await
    }

    async fn send_new(&self, job: SendJob) -> Result<Option<MessageId>, ComposeError> {
        let quoted = match &job.snapshot.context {
            ComposeContext::Quoting { message_id } => Some(*message_id),
            _ => None,
        };
        let had_images = !job.images.is_empty();
        let parts = self.build_parts(&job).await;

        let mut last_sent = None;
        let mut last_error = None;
        let last_index = parts.len().saturating_sub(1);
        for (index, (content, attachment)) in parts.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(BATCH_SEND_SPACING).await;
            }
            let quoted_part = if index == 0 { quoted } else { None };
            // Voice messages are never streamed live; otherwise only the
            // final part of a batch may carry the live flag.
            let live_part =
                job.live && index == last_index && !matches!(content, MsgContent::Voice { .. });
            match self
                .api
                .send_message(self.chat, content, quoted_part, attachment, live_part)
                .await
            {
                Ok(id) => last_sent = Some(id),
                Err(err) => {
                    tracing::warn!("send failed for batch part {index}: {err}");
                    last_error = Some(err);
                }
            }
        }

        // Degrade to plain text when nothing went out but images were
        // staged; the typed caption would otherwise be lost.
        if last_sent.is_none() && had_images {
            let content = MsgContent::Text {
                text: job.msg_text.clone(),
            };
            match self
                .api
                .send_message(self.chat, content, quoted, None, job.live)
                .await
            {
                Ok(id) => last_sent = Some(id),
                Err(err) => {
                    tracing::warn!("plain-text fallback send failed: {err}");
                    last_error = Some(err);
                }
            }
        }

        match (last_sent, last_error) {
            (Some(id), _) => Ok(Some(id)),
            (None, Some(err)) => Err(err.into()),
            (None, None) => Ok(None),
        }
    }

    async fn build_parts(&self, job: &SendJob) -> Vec<(MsgContent, Option<AttachmentHandle>)> {
        let mut parts = Vec::new();
        match &job.snapshot.preview {
            ComposePreview::None => parts.push((
                MsgContent::Text {
                    text: job.msg_text.clone(),
                },
                None,
            )),
            ComposePreview::Link { .. } => parts.push((self.check_link_preview(job), None)),
            ComposePreview::Images { previews } => {
                for (index, image) in job.images.iter().enumerate() {
                    let persisted = match &image.source {
                        ImageSource::Still { path } => self.store.persist_image(path).await,
                        ImageSource::Animated { path } => {
                            self.store.persist_animated_image(path).await
                        }
                    };
                    let handle = match persisted {
                        Ok(handle) => handle,
                        Err(err) => {
                            tracing::warn!("failed to persist staged image: {err}");
                            continue;
                        }
                    };
                    let caption = if index + 1 == job.images.len() {
                        job.msg_text.clone()
                    } else {
                        String::new()
                    };
                    parts.push((
                        MsgContent::Image {
                            text: caption,
                            image: previews.get(index).cloned().unwrap_or_default(),
                        },
                        Some(handle),
                    ));
                }
            }
            ComposePreview::Voice { .. } => {
                if let Some((path, duration_ms)) = &job.voice {
                    let name = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    {
                        let mut inner = self.inner.lock().await;
                        inner.files_to_delete.remove(path);
                    }
                    parts.push((
                        MsgContent::Voice {
                            text: job.msg_text.clone(),
                            duration: duration_ms / 1000,
                        },
                        Some(AttachmentHandle(name)),
                    ));
                }
            }
            ComposePreview::File { .. } => {
                if let Some(picked) = &job.file {
                    match self.store.persist_file(&picked.path, &picked.name).await {
                        Ok(handle) => parts.push((
                            MsgContent::File {
                                text: job.msg_text.clone(),
                            },
                            Some(handle),
                        )),
                        Err(err) => tracing::warn!("failed to persist staged file: {err}"),
                    }
                }
            }
        }
        parts
    }

    /// Re-validate the staged link preview against the final text: the user
    /// may have edited the message after the async resolution completed,
    /// and a live send truncates the text, either of which can detach the
    /// preview from what actually goes out.
    fn check_link_preview(&self, job: &SendJob) -> MsgContent {
        if let Some(lp) = job.snapshot.link_preview() {
            let spans = self.api.parse_formatting(&job.msg_text);
            if first_previewable_link(&spans, &job.cancelled) == Some(lp.uri.as_str()) {
                return MsgContent::Link {
                    text: job.msg_text.clone(),
                    preview: lp.clone(),
                };
            }
        }
        MsgContent::Text {
            text: job.msg_text.clone(),
        }
    }

    /// Content for an in-place update: rich payloads are kept, the text is
    /// replaced, and text/link content re-validates its preview.
    fn update_content(&self, old: &MsgContent, job: &SendJob) -> MsgContent {
        match old {
            MsgContent::Text { .. } | MsgContent::Link { .. } => self.check_link_preview(job),
            MsgContent::Image { image, .. } => MsgContent::Image {
                text: job.msg_text.clone(),
                image: image.clone(),
            },
            MsgContent::Voice { duration, .. } => MsgContent::Voice {
                text: job.msg_text.clone(),
                duration: *duration,
            },
            MsgContent::File { .. } => MsgContent::File {
                text: job.msg_text.clone(),
            },
        }
    }

    fn scan_links(&self, inner: &mut ComposerInner) {
        let spans = self.api.parse_formatting(&inner.state.text);
        let url = inner
            .link
            .first_previewable_link(&spans)
            .map(str::to_string);
        inner.link.record_scan(url.clone());
        let Some(url) = url else {
            inner.state.preview = ComposePreview::None;
            inner.link.clear_pending();
            return;
        };
        let already_resolved = inner
            .state
            .link_preview()
            .is_some_and(|lp| lp.uri == url);
        let already_pending = inner.link.pending_url() == Some(url.as_str());
        if already_resolved || already_pending {
            return;
        }
        let delay = if inner.link.previous_url() == Some(url.as_str()) {
            Duration::ZERO
        } else {
            LINK_LOOKUP_DEBOUNCE
        };
        inner.state.preview = ComposePreview::Link { preview: None };
        let lookup = inner.link.begin_lookup(url);
        self.spawn_lookup(lookup, delay);
    }

    fn spawn_lookup(&self, lookup: PendingLookup, delay: Duration) {
        let engine = self.clone();
        tokio::spawn(async move {
            engine.run_lookup(lookup, delay).await;
        });
    }

    async fn run_lookup(&self, lookup: PendingLookup, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        // A newer scan may have superseded this lookup while it waited; a
        // stale lookup must not even hit the resolver.
        {
            let inner = self.inner.lock().await;
            if !inner.link.is_current(&lookup) {
                tracing::debug!("superseded link lookup for {} dropped", lookup.url);
                return;
            }
        }
        let resolved = self.resolver.resolve(&lookup.url).await;
        let mut inner = self.inner.lock().await;
        // Re-check: the user may have moved on while the fetch ran.
        if !inner.link.is_current(&lookup) {
            tracing::debug!("superseded link lookup for {} dropped", lookup.url);
            return;
        }
        inner.link.complete(&lookup);
        inner.state.preview = match resolved {
            Some(preview) => ComposePreview::Link {
                preview: Some(preview),
            },
            None => ComposePreview::None,
        };
    }
}

/// Text to transmit for a live update, or `None` when the word-truncated
/// form is unchanged and the wire text would not move.
fn live_update_text(session: &LiveMessage, typed: &str) -> Option<String> {
    let next = truncate_to_words(typed);
    (next != session.sent_text).then_some(next)
}
