//! Project document rules: link/upload exclusivity, file-type inference,
//! and embed-URL normalization for third-party preview hosts.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::CoreError;

/// File-type tag stored for link documents.
pub const FILE_TYPE_LINK: &str = "link";

// ---------------------------------------------------------------------------
// Source exclusivity
// ---------------------------------------------------------------------------

/// How a document's content is stored: as an external link or as an
/// uploaded blob. A document is exactly one of the two, never both,
/// never neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSource {
    Link,
    Upload,
}

/// Classify a document row by which of its two source columns is set.
pub fn classify_source(
    storage_path: Option<&str>,
    embed_url: Option<&str>,
) -> Result<DocumentSource, CoreError> {
    match (storage_path, embed_url) {
        (Some(_), None) => Ok(DocumentSource::Upload),
        (None, Some(_)) => Ok(DocumentSource::Link),
        (Some(_), Some(_)) => Err(CoreError::Validation(
            "A document cannot be both an upload and a link".into(),
        )),
        (None, None) => Err(CoreError::Validation(
            "A document must be either an upload or a link".into(),
        )),
    }
}

// ---------------------------------------------------------------------------
// File-type inference
// ---------------------------------------------------------------------------

/// Infer a file-type string for an upload from its declared MIME type,
/// falling back to the filename extension.
pub fn infer_file_type(declared_mime: Option<&str>, filename: &str) -> String {
    if let Some(mime) = declared_mime {
        let mime = mime.trim();
        if !mime.is_empty() {
            return mime.to_ascii_lowercase();
        }
    }

    match filename.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "pdf" => "application/pdf".into(),
        Some(ext) if ext == "png" => "image/png".into(),
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg".into(),
        Some(ext) if ext == "gif" => "image/gif".into(),
        Some(ext) if ext == "webp" => "image/webp".into(),
        Some(ext) if ext == "svg" => "image/svg+xml".into(),
        _ => "application/octet-stream".into(),
    }
}

// ---------------------------------------------------------------------------
// Preview resolution
// ---------------------------------------------------------------------------

/// How a document should be rendered once a preview URL is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewKind {
    /// Link document rendered in an iframe via its normalized embed URL.
    Embed,
    Image,
    Pdf,
    /// Anything else: offer a plain download/open link.
    Generic,
}

/// Choose the preview kind for an uploaded document from its file type.
pub fn upload_preview_kind(file_type: Option<&str>) -> PreviewKind {
    let t = file_type.unwrap_or("").to_ascii_lowercase();
    if t.starts_with("image/") {
        PreviewKind::Image
    } else if t.contains("pdf") {
        PreviewKind::Pdf
    } else {
        PreviewKind::Generic
    }
}

// ---------------------------------------------------------------------------
// Embed URL normalization
// ---------------------------------------------------------------------------

fn docs_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/(edit|view|copy).*$").expect("valid regex"))
}

fn drive_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/view.*$").expect("valid regex"))
}

/// Rewrite a share URL into its embeddable preview form.
///
/// Provider-specific rules:
/// - `docs.google.com`: a `/edit`, `/view`, or `/copy` path suffix becomes
///   `/preview` (query string preserved).
/// - `drive.google.com`: a `/view` path suffix becomes `/preview`.
/// - `figma.com`: the file link is wrapped into Figma's embed endpoint,
///   unless the URL is already in embed form.
///
/// Anything unrecognized (including unparseable URLs) is returned as-is.
pub fn normalize_embed_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    let (host_and_path, suffix) = match rest.find(['?', '#']) {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, ""),
    };
    let (host, path) = match host_and_path.find('/') {
        Some(i) => (&host_and_path[..i], &host_and_path[i..]),
        None => (host_and_path, ""),
    };

    if host.contains("docs.google.com") {
        let path = docs_suffix_re().replace(path, "/preview");
        return format!("{scheme}://{host}{path}{suffix}");
    }

    if host.contains("drive.google.com") {
        let path = drive_suffix_re().replace(path, "/preview");
        return format!("{scheme}://{host}{path}{suffix}");
    }

    if host.contains("figma.com") {
        if path.starts_with("/embed") {
            return url.to_string();
        }
        return format!(
            "https://www.figma.com/embed?embed_host=share&url={}",
            percent_encode(url)
        );
    }

    url.to_string()
}

/// Percent-encode a string the way `encodeURIComponent` does.
fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'!' | b'~' | b'*'
            | b'\'' | b'(' | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
