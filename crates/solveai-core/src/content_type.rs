//! Content type detection and filtering for uploaded study material.
//!
//! Only images and PDFs can be transcribed by the model; everything else is
//! stored as-is and represented by its name.

/// MIME type prefix accepted for transcription.
const IMAGE_PREFIX: &str = "image/";

/// PDF MIME type.
pub const PDF_MIME: &str = "application/pdf";

/// Whether a MIME type can be sent to the model for text extraction.
pub fn is_extractable(mime_type: &str) -> bool {
    let mime = mime_type.trim().to_ascii_lowercase();
    mime.starts_with(IMAGE_PREFIX) || mime == PDF_MIME
}

/// Detect the actual content type of an upload.
///
/// Magic bytes win; then the file extension for formats without a signature;
/// then the claimed type. A claimed binary type whose bytes match no known
/// signature is downgraded to `application/octet-stream`.
pub fn detect_content_type(filename: &str, data: &[u8], claimed: &str) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }

    if let Some(ext) = filename.rsplit_once('.').map(|(_, ext)| ext) {
        if let Some(mime) = mime_from_extension(ext) {
            return mime.to_string();
        }
    }

    if is_extractable(claimed) {
        return "application/octet-stream".to_string();
    }

    if claimed.trim().is_empty() {
        "application/octet-stream".to_string()
    } else {
        claimed.trim().to_string()
    }
}

/// Text formats that carry no magic bytes.
fn mime_from_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "txt" | "log" => Some("text/plain"),
        "md" | "markdown" => Some("text/markdown"),
        "csv" => Some("text/csv"),
        "tex" | "latex" => Some("application/x-tex"),
        "json" => Some("application/json"),
        _ => None,
    }
}

/// Strip path components and control characters from a client-supplied name.
pub fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>();
    let trimmed = base.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        "arquivo".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const PDF_MAGIC: &[u8] = b"%PDF-1.7\n";

    #[test]
    fn test_is_extractable() {
        assert!(is_extractable("image/png"));
        assert!(is_extractable("IMAGE/JPEG"));
        assert!(is_extractable("application/pdf"));
        assert!(!is_extractable("text/plain"));
        assert!(!is_extractable(""));
    }

    #[test]
    fn test_detect_prefers_magic_bytes() {
        assert_eq!(
            detect_content_type("scan.jpg", PNG_MAGIC, "image/jpeg"),
            "image/png"
        );
        assert_eq!(
            detect_content_type("lista.bin", PDF_MAGIC, ""),
            "application/pdf"
        );
    }

    #[test]
    fn test_detect_text_by_extension() {
        assert_eq!(
            detect_content_type("resumo.md", b"# Leis de Newton", ""),
            "text/markdown"
        );
    }

    #[test]
    fn test_detect_downgrades_fake_image() {
        assert_eq!(
            detect_content_type("foto.png", b"not an image", "image/png"),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_detect_trusts_claimed_text_type() {
        assert_eq!(
            detect_content_type("notes", b"plain words", "text/plain"),
            "text/plain"
        );
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\fotos\\prova.png"), "prova.png");
        assert_eq!(sanitize_filename("  slide3.png "), "slide3.png");
        assert_eq!(sanitize_filename(".."), "arquivo");
    }
}
