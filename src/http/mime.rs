//! MIME type detection module
//!
//! Maps file extensions and short aliases (`html`, `text`, `bin`, `json`) to a
//! base MIME type, and base MIME types to their default charset.

/// Fallback type for unknown extensions
pub const DEFAULT_TYPE: &str = "application/octet-stream";

/// Get the base MIME type for a file extension
///
/// Matching is case-insensitive. Unknown or missing extensions fall back to
/// [`DEFAULT_TYPE`].
///
/// # Examples
/// ```
/// use resfmt::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), "text/html");
/// assert_eq!(get_content_type(Some("MP4")), "video/mp4");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    extension
        .and_then(|ext| lookup_extension(&ext.to_ascii_lowercase()))
        .unwrap_or(DEFAULT_TYPE)
}

/// Look up a MIME type for an alias, extension, file name or path
///
/// Everything up to the last `.`, `/` or `\` is stripped before the lookup,
/// so `"json"`, `".json"` and `"/srv/data.json"` all resolve the same way.
pub fn lookup(name: &str) -> Option<&'static str> {
    let ext = name
        .rsplit(&['.', '/', '\\'][..])
        .next()
        .unwrap_or(name)
        .to_ascii_lowercase();
    lookup_extension(&ext)
}

fn lookup_extension(ext: &str) -> Option<&'static str> {
    let content_type = match ext {
        // Text
        "html" | "htm" | "shtml" => "text/html",
        "css" => "text/css",
        "txt" | "text" | "conf" | "log" | "ini" | "md" => "text/plain",
        "csv" => "text/csv",
        "xml" => "application/xml",

        // JavaScript/WASM
        "js" | "mjs" | "javascript" => "application/javascript",
        "json" | "map" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "ogg" | "oga" => "audio/ogg",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",

        // Documents and archives
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",
        "bin" | "exe" | "dll" | "iso" => DEFAULT_TYPE,

        _ => return None,
    };
    Some(content_type)
}

/// Default charset for a base MIME type
///
/// Parameters after `;` are ignored. Textual types and JSON/JavaScript report
/// `UTF-8`; everything else has no charset mapping.
///
/// # Examples
/// ```
/// use resfmt::http::mime::charset;
/// assert_eq!(charset("text/plain"), Some("UTF-8"));
/// assert_eq!(charset("application/json; foo=bar"), Some("UTF-8"));
/// assert_eq!(charset("image/png"), None);
/// ```
pub fn charset(mime_type: &str) -> Option<&'static str> {
    let base = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let textual = base.starts_with("text/")
        || base == "application/javascript"
        || base == "application/json"
        || (base.starts_with("application/") && base.ends_with("+json"));

    textual.then_some("UTF-8")
}
