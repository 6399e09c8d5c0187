//! Link-preview bookkeeping: which URL is shown, which resolution is in
//! flight, and which URLs the user has dismissed.
//!
//! The debounce policy itself lives in the engine; this module owns the
//! tracking state and the URL classification rules. Every scheduled lookup
//! carries a generation number, and only the lookup whose generation is
//! still current may write the preview when it completes — a superseded
//! lookup is a true no-op.

use std::collections::HashSet;

use quill_protocol::Format;
use quill_protocol::FormattedSpan;
use url::Url;

/// Hosts whose links the app handles natively (invitation and contact
/// links); these never get a preview offer.
const OWN_LINK_HOSTS: [&str; 2] = ["quill.chat", "www.quill.chat"];

/// True for links on our own domain.
pub(crate) fn is_own_deep_link(link: &str) -> bool {
    Url::parse(link).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https")
            && url
                .host_str()
                .is_some_and(|host| OWN_LINK_HOSTS.iter().any(|own| host.eq_ignore_ascii_case(own)))
    })
}

/// First URI span eligible for a preview: not dismissed by the user, not
/// one of our own deep links.
pub(crate) fn first_previewable_link<'a>(
    spans: &'a [FormattedSpan],
    cancelled: &HashSet<String>,
) -> Option<&'a str> {
    spans
        .iter()
        .filter(|span| span.format == Some(Format::Uri))
        .map(|span| span.text.as_str())
        .find(|link| !cancelled.contains(*link) && !is_own_deep_link(link))
}

/// A scheduled link lookup. The generation ties a completing background
/// task back to the request that scheduled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingLookup {
    pub url: String,
    pub generation: u64,
}

/// Tracking state for link detection and the single-flight lookup.
#[derive(Debug, Default)]
pub(crate) struct LinkTracker {
    current_url: Option<String>,
    previous_url: Option<String>,
    pending: Option<PendingLookup>,
    generation: u64,
    cancelled: HashSet<String>,
}

impl LinkTracker {
    pub fn first_previewable_link<'a>(&self, spans: &'a [FormattedSpan]) -> Option<&'a str> {
        first_previewable_link(spans, &self.cancelled)
    }

    /// Record the outcome of a text scan. The previous scan's URL decides
    /// whether an immediate retype of the same URL skips the debounce.
    pub fn record_scan(&mut self, url: Option<String>) {
        self.previous_url = self.current_url.take();
        self.current_url = url;
    }

    pub fn previous_url(&self) -> Option<&str> {
        self.previous_url.as_deref()
    }

    pub fn pending_url(&self) -> Option<&str> {
        self.pending.as_ref().map(|lookup| lookup.url.as_str())
    }

    pub fn cancelled_urls(&self) -> HashSet<String> {
        self.cancelled.clone()
    }

    /// Start a lookup for `url`, superseding any lookup still in flight.
    pub fn begin_lookup(&mut self, url: String) -> PendingLookup {
        self.generation += 1;
        let lookup = PendingLookup {
            url,
            generation: self.generation,
        };
        self.pending = Some(lookup.clone());
        lookup
    }

    /// Whether `lookup` is still the one allowed to write the preview.
    pub fn is_current(&self, lookup: &PendingLookup) -> bool {
        self.pending.as_ref() == Some(lookup)
    }

    pub fn complete(&mut self, lookup: &PendingLookup) {
        if self.is_current(lookup) {
            self.pending = None;
        }
    }

    /// Drop any in-flight lookup without recording a dismissal.
    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    /// Dismiss `url`: it will not be offered again until [`Self::reset`].
    pub fn cancel(&mut self, url: String) {
        self.cancelled.insert(url);
        self.pending = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quill_protocol::formatting::parse_spans;

    #[test]
    fn own_deep_links_are_recognized() {
        assert!(is_own_deep_link("https://quill.chat/invitation#abc"));
        assert!(is_own_deep_link("http://WWW.QUILL.CHAT/contact"));
        assert!(!is_own_deep_link("https://example.com"));
        assert!(!is_own_deep_link("https://quill.chat.evil.com/x"));
        assert!(!is_own_deep_link("not a url"));
    }

    #[test]
    fn first_previewable_link_skips_dismissed_and_own_links() {
        let spans = parse_spans(
            "join https://quill.chat/invitation#x or read https://a.example and https://b.example",
        );
        let mut cancelled = HashSet::new();
        assert_eq!(
            first_previewable_link(&spans, &cancelled),
            Some("https://a.example")
        );

        cancelled.insert("https://a.example".to_string());
        assert_eq!(
            first_previewable_link(&spans, &cancelled),
            Some("https://b.example")
        );
    }

    #[test]
    fn newer_lookup_supersedes_older_one() {
        let mut tracker = LinkTracker::default();
        let first = tracker.begin_lookup("https://a.example".to_string());
        let second = tracker.begin_lookup("https://b.example".to_string());

        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));

        // Completing the stale lookup must not clear the live one.
        tracker.complete(&first);
        assert_eq!(tracker.pending_url(), Some("https://b.example"));

        tracker.complete(&second);
        assert_eq!(tracker.pending_url(), None);
    }

    #[test]
    fn record_scan_tracks_the_previous_url() {
        let mut tracker = LinkTracker::default();
        tracker.record_scan(Some("https://a.example".to_string()));
        assert_eq!(tracker.previous_url(), None);

        tracker.record_scan(Some("https://a.example".to_string()));
        assert_eq!(tracker.previous_url(), Some("https://a.example"));

        tracker.record_scan(None);
        tracker.record_scan(Some("https://b.example".to_string()));
        assert_eq!(tracker.previous_url(), None);
    }

    #[test]
    fn reset_forgets_dismissals() {
        let mut tracker = LinkTracker::default();
        tracker.cancel("https://a.example".to_string());
        let spans = parse_spans("https://a.example");
        assert_eq!(tracker.first_previewable_link(&spans), None);

        tracker.reset();
        assert_eq!(
            tracker.first_previewable_link(&spans),
            Some("https://a.example")
        );
    }
}
