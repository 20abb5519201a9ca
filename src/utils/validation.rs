use std::path::Path;

/// Extensions accepted by the file picker and the drop zone
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Extension-level filter, matching the picker's accept list. Case-insensitive.
pub fn accepted_extension(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ACCEPTED_EXTENSIONS
            .iter()
            .any(|a| a.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// MIME type guessed from the file extension. Content sniffing in the
/// decoder takes precedence over this when the bytes are available.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
