//! Origin-request handler mapping extension-less paths onto the `.html`
//! files produced by the site build.

use super::types::EdgeRequest;

/// `/blog/` -> `/blog/index.html`, `/about` -> `/about.html`; paths whose
/// last segment has an extension are returned unchanged.
pub fn normalize(uri: &str) -> String {
    let (dir, last) = match uri.rsplit_once('/') {
        Some((dir, last)) => (Some(dir), last),
        None => (None, uri),
    };

    let last = if last.is_empty() {
        "index.html".to_string()
    } else if has_extension(last) {
        return uri.to_string();
    } else {
        format!("{}.html", last)
    };

    match dir {
        Some(dir) => format!("{}/{}", dir, last),
        None => last,
    }
}

pub fn normalize_request(mut request: EdgeRequest) -> EdgeRequest {
    let normalized = normalize(&request.uri);
    if normalized != request.uri {
        tracing::debug!("🔀 {} -> {}", request.uri, normalized);
        request.uri = normalized;
    }
    request
}

/// A leading dot (`.well-known`) does not start an extension.
fn has_extension(segment: &str) -> bool {
    segment.rfind('.').is_some_and(|i| i > 0)
}
