//! Viewer-request handler that keeps every page under a language prefix.
//!
//! `/en/about` is served from `/about` at the origin. Requests without a
//! known language prefix are redirected to one, chosen from the `language`
//! cookie, then `accept-language`, then the configured default.

use super::types::{EdgeOutcome, EdgeRequest, EdgeResponse};
use crate::config::EdgeConfig;

pub const LANGUAGE_COOKIE: &str = "language";

pub fn resolve(mut request: EdgeRequest, config: &EdgeConfig) -> EdgeOutcome {
    let uri = request.uri.clone();
    let mut segments: Vec<&str> = uri.split('/').collect();
    let first = segments.get(1).copied().unwrap_or("");

    if config.is_passthrough(first) {
        return EdgeOutcome::Request(request);
    }

    if config.is_language(first) {
        if segments.len() == 2 {
            // `/en` -> `/en/`
            let location = redirect_location(&request, &format!("{}/", uri));
            return EdgeOutcome::Response(EdgeResponse::found(location));
        }
        segments.remove(1);
        request.uri = segments.join("/");
        return EdgeOutcome::Request(request);
    }

    let cookie_language = language_from_cookie(&request).filter(|l| config.is_language(l));
    let had_cookie = cookie_language.is_some();
    let language = cookie_language
        .or_else(|| {
            request
                .header_values("accept-language")
                .flat_map(accepted_languages)
                .find(|l| config.is_language(l))
        })
        .unwrap_or_else(|| config.default_language.clone());

    // An unsupported language prefix is replaced, not nested.
    if looks_like_language(first) {
        segments.remove(1);
    }
    let path = format!("/{}{}", language, segments.join("/"));

    let mut response = EdgeResponse::found(redirect_location(&request, &path)).with_header(
        "set-cookie",
        format!("{}={}; Path=/", LANGUAGE_COOKIE, language),
    );
    if !had_cookie && config.clear_site_data {
        response = response.with_header("clear-site-data", "\"*\"");
    }
    EdgeOutcome::Response(response)
}

/// Value of the first `language` cookie holding a two-letter code.
pub fn language_from_cookie(request: &EdgeRequest) -> Option<String> {
    request
        .header_values("cookie")
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| name.trim() == LANGUAGE_COOKIE && value.trim().len() == 2)
        .map(|(_, value)| value.trim().to_ascii_lowercase())
}

/// Two-letter primary language codes of an `accept-language` header, in
/// header order and without duplicates.
///
/// `fr-CH, fr;q=0.9, en;q=0.8, *;q=0.5` gives `["fr", "en"]`.
pub fn accepted_languages(header: &str) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for item in header.split(',') {
        let tag = item.split(';').next().unwrap_or("").trim();
        let primary = tag.split('-').next().unwrap_or("");
        if !looks_like_language(primary) {
            continue;
        }
        let primary = primary.to_ascii_lowercase();
        if !languages.contains(&primary) {
            languages.push(primary);
        }
    }
    languages
}

fn looks_like_language(segment: &str) -> bool {
    segment.len() == 2 && segment.bytes().all(|b| b.is_ascii_alphabetic())
}

fn redirect_location(request: &EdgeRequest, path: &str) -> String {
    let mut location = match request.first_header("host") {
        Some(host) => format!("https://{}{}", host, path),
        None => path.to_string(),
    };
    if !request.querystring.is_empty() {
        location.push('?');
        location.push_str(&request.querystring);
    }
    location
}
