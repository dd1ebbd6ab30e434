use crate::models::{ArchiveEntry, PublishedObject};
use crate::utils::mime::{content_type_for, extension};
use bytes::Bytes;

const HTML_SUFFIX: &[u8] = b".html";

/// Removes every `.html` that is not directly followed by `?`, so that links
/// like `about.html` become `about` while `about.html?ref=x` is kept.
///
/// The scan checks the output being built rather than the input, which also
/// removes occurrences that only appear once an inner one is gone
/// (`a.h.htmltml`). Applying it to its own output is a no-op.
pub fn strip_html_links(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for (i, &byte) in input.iter().enumerate() {
        out.push(byte);
        if out.ends_with(HTML_SUFFIX) && input.get(i + 1) != Some(&b'?') {
            out.truncate(out.len() - HTML_SUFFIX.len());
        }
    }
    out
}

pub fn is_markup(name: &str) -> bool {
    extension(name) == Some("html")
}

/// Turns an archive entry into the object stored under `prefix`.
pub fn transform_entry(entry: ArchiveEntry, prefix: &str, cache_control: &str) -> PublishedObject {
    let content = if is_markup(&entry.name) {
        Bytes::from(strip_html_links(&entry.content))
    } else {
        entry.content
    };

    PublishedObject {
        key: format!("{}{}", prefix, entry.name),
        content_type: content_type_for(&entry.name),
        cache_control: cache_control.to_string(),
        content,
    }
}
