//! Link-preview resolution.
//!
//! Resolution failure is never interesting to the composer: anything that
//! prevents a preview yields `None` and the message goes out as plain
//! text.

use std::time::Duration;

use async_trait::async_trait;
use quill_protocol::LinkPreviewData;

/// Resolves page metadata for a URL found in composer text.
#[async_trait]
pub trait LinkPreviewResolver: Send + Sync {
    async fn resolve(&self, url: &str) -> Option<LinkPreviewData>;
}

/// Resolver that fetches the page over HTTP and reads its Open Graph tags.
pub struct HttpLinkPreviewResolver {
    client: reqwest::Client,
}

/// Pages are read up to this many bytes; OG tags live in the head.
const MAX_PREVIEW_BODY_BYTES: usize = 512 * 1024;
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

impl HttpLinkPreviewResolver {
    pub fn new() -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("quill/", env!("CARGO_PKG_VERSION")))
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    async fn fetch(&self, url: &str) -> reqwest::Result<String> {
        let mut body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        if body.len() > MAX_PREVIEW_BODY_BYTES {
            let mut end = MAX_PREVIEW_BODY_BYTES;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body.truncate(end);
        }
        Ok(body)
    }
}

#[async_trait]
impl LinkPreviewResolver for HttpLinkPreviewResolver {
    async fn resolve(&self, url: &str) -> Option<LinkPreviewData> {
        let body = match self.fetch(url).await {
            Ok(body) => body,
            Err(err) => {
                tracing::debug!("link preview fetch failed for {url}: {err}");
                return None;
            }
        };
        parse_page_metadata(url, &body)
    }
}

/// Extract Open Graph metadata, falling back to the document title. `None`
/// when the page offers nothing worth previewing.
fn parse_page_metadata(url: &str, html: &str) -> Option<LinkPreviewData> {
    let title = meta_content(html, "og:title")
        .or_else(|| document_title(html))
        .filter(|title| !title.is_empty())?;
    Some(LinkPreviewData {
        uri: url.to_string(),
        title,
        description: meta_content(html, "og:description").unwrap_or_default(),
        image: meta_content(html, "og:image"),
    })
}

/// Value of the `<meta property="..." content="...">` tag named `property`.
/// Attribute order varies across sites, so both orders are accepted.
fn meta_content(html: &str, property: &str) -> Option<String> {
    for chunk in html.split("<meta").skip(1) {
        let Some(end) = chunk.find('>') else {
            break;
        };
        let tag = &chunk[..end];
        let name = attr_value(tag, "property").or_else(|| attr_value(tag, "name"));
        if name == Some(property) {
            return attr_value(tag, "content").map(decode_entities);
        }
    }
    None
}

fn document_title(html: &str) -> Option<String> {
    let start = html.find("<title>")? + "<title>".len();
    let end = html[start..].find("</title>")?;
    Some(decode_entities(html[start..start + end].trim()))
}

fn attr_value<'a>(tag: &'a str, attr: &str) -> Option<&'a str> {
    let mut search = 0;
    loop {
        let idx = tag[search..].find(attr)? + search;
        let rest = tag[idx + attr.len()..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            search = idx + attr.len();
            continue;
        };
        let rest = rest.trim_start();
        let quote = rest.chars().next()?;
        if quote != '"' && quote != '\'' {
            return None;
        }
        let value = &rest[1..];
        return Some(&value[..value.find(quote)?]);
    }
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_open_graph_tags_in_either_attribute_order() {
        let html = r#"<html><head>
            <meta property="og:title" content="A Page"/>
            <meta content="What it is about" property="og:description">
            <meta property="og:image" content="https://example.com/img.png">
        </head><body></body></html>"#;

        let preview = parse_page_metadata("https://example.com", html).expect("preview");
        assert_eq!(preview.title, "A Page");
        assert_eq!(preview.description, "What it is about");
        assert_eq!(
            preview.image.as_deref(),
            Some("https://example.com/img.png")
        );
        assert_eq!(preview.uri, "https://example.com");
    }

    #[test]
    fn falls_back_to_the_document_title() {
        let html = "<html><head><title>Fallback &amp; Title</title></head></html>";
        let preview = parse_page_metadata("https://example.com", html).expect("preview");
        assert_eq!(preview.title, "Fallback & Title");
        assert_eq!(preview.description, "");
        assert_eq!(preview.image, None);
    }

    #[test]
    fn pages_without_any_title_yield_nothing() {
        assert_eq!(
            parse_page_metadata("https://example.com", "<html><body>hi</body></html>"),
            None
        );
        assert_eq!(
            parse_page_metadata("https://example.com", "<title></title>"),
            None
        );
    }

    #[test]
    fn single_quoted_attributes_are_accepted() {
        let html = "<meta property='og:title' content='Quoted'>";
        assert_eq!(meta_content(html, "og:title").as_deref(), Some("Quoted"));
    }
}
