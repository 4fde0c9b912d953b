//! Markdown page loading: display title and local image references.
//!
//! The export stores pages as plain markdown. Consumers need two derived
//! facts next to the raw body: the display title (first `#` heading) and the
//! list of images the page embeds, so the serving layer can rewrite their
//! URLs. Extraction walks `pulldown-cmark` events rather than regex-matching
//! lines, which gets quoting and inline formatting right for free.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use crate::types::PageContent;

/// Title used when a document has no top-level heading.
pub const PLACEHOLDER_TITLE: &str = "Untitled";

/// Derive a [`PageContent`] from a markdown body.
///
/// - Title: text of the first `# ` heading in document order, trimmed;
///   [`PLACEHOLDER_TITLE`] when absent.
/// - Images: `![alt](target)` targets in document order, duplicates
///   preserved. Targets starting with `http://` or `https://` are external
///   and excluded; everything else is kept verbatim (the reference is
///   relative to the document's own directory and is resolved by
///   [`crate::images::resolve_image_ref`] when dereferenced).
pub fn extract(content: &str) -> PageContent {
    let mut title: Option<String> = None;
    let mut images = Vec::new();

    let mut heading_text: Option<String> = None;
    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) if title.is_none() => {
                heading_text = Some(String::new());
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(buf) = heading_text.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                if let Some(buf) = heading_text.take() {
                    let trimmed = buf.trim();
                    if title.is_none() && !trimmed.is_empty() {
                        title = Some(trimmed.to_string());
                    }
                }
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                if !is_external_target(&dest_url) {
                    images.push(dest_url.to_string());
                }
            }
            _ => {}
        }
    }

    PageContent {
        title: title.unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
        content: content.to_string(),
        images,
    }
}

/// A target is external iff it carries a recognized absolute-URL scheme.
fn is_external_target(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}
