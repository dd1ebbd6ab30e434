/// Extension of the last path segment, if the segment has one.
pub fn extension(name: &str) -> Option<&str> {
    let file_name = name.rsplit('/').next().unwrap_or(name);
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}

/// Content-Type for a published file, by lowercase extension.
///
/// # Examples
/// ```
/// use site_publisher::utils::mime::content_type_for;
/// assert_eq!(content_type_for("blog/index.HTML"), "text/html");
/// assert_eq!(content_type_for("fonts/inter.woff2"), "application/octet-stream");
/// ```
pub fn content_type_for(name: &str) -> &'static str {
    let ext = extension(name).map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html") => "text/html",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}
