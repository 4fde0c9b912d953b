//! Image dereferencing for the byte-serving collaborator.
//!
//! Pages embed images with paths relative to their own directory, usually
//! percent-encoded (`![shot](My%20Page%20abc123/screen.png)`). The serving
//! layer hands such a reference plus the document's directory to
//! [`resolve_image_ref`] and gets back a data-root-relative path it can
//! stream — or nothing, when the reference is external or would escape the
//! root. Byte streaming itself stays outside the core; [`mime_type`] is
//! provided so the collaborator can set a content type without its own
//! table.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

use crate::paths;

/// Resolve a document-relative image reference to a data-root-relative path.
///
/// `doc_dir` is the root-relative directory of the document that contains
/// the reference. Returns `None` for external targets and for references
/// escaping the data root — indistinguishable from not-found by design.
pub fn resolve_image_ref(doc_dir: &Path, reference: &str) -> Option<PathBuf> {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return None;
    }
    let decoded = percent_decode_str(reference).decode_utf8_lossy();
    paths::normalize(&doc_dir.join(decoded.as_ref()))
}

/// MIME type for an image path, by extension. Unknown extensions fall back
/// to `application/octet-stream`.
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
