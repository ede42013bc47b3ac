use base64::Engine as _;

/// MIME type used when the payload's format cannot be recognized.
pub const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

/// Enough base64 characters to cover every signature below (12 bytes).
const SNIFF_BASE64_CHARS: usize = 16;

pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        [0x47, 0x49, 0x46, 0x38, ..] => "image/gif",
        _ => {
            tracing::warn!(
                "Unrecognized image format (first 4 bytes: {:02X?}), falling back to {}",
                &bytes[..bytes.len().min(4)],
                FALLBACK_IMAGE_MIME
            );
            FALLBACK_IMAGE_MIME
        }
    }
}

/// Sniff the MIME type of a base64 payload by decoding only its head.
pub fn detect_base64_image_mime(payload: &str) -> &'static str {
    let head: Vec<u8> = payload
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .take(SNIFF_BASE64_CHARS)
        .collect();

    // Only whole 4-char groups decode without padding.
    let usable = head.len() - head.len() % 4;
    match base64::engine::general_purpose::STANDARD.decode(&head[..usable]) {
        Ok(bytes) => detect_image_mime(&bytes),
        Err(e) => {
            tracing::warn!(
                "Image payload is not valid base64 ({}), using {}",
                e,
                FALLBACK_IMAGE_MIME
            );
            FALLBACK_IMAGE_MIME
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        assert_eq!(
            detect_image_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            "image/png"
        );
    }

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(detect_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
    }

    #[test]
    fn test_detect_webp() {
        assert_eq!(
            detect_image_mime(&[
                0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50
            ]),
            "image/webp"
        );
    }

    #[test]
    fn test_detect_gif() {
        assert_eq!(detect_image_mime(b"GIF89a"), "image/gif");
    }

    #[test]
    fn test_unknown_falls_back_to_jpeg() {
        assert_eq!(detect_image_mime(&[0x00, 0x01, 0x02, 0x03]), "image/jpeg");
        assert_eq!(detect_image_mime(&[]), "image/jpeg");
    }

    #[test]
    fn test_detect_base64_png() {
        // "\x89PNG\r\n\x1a\n" followed by IHDR length
        assert_eq!(detect_base64_image_mime("iVBORw0KGgoAAAANSUhEUgAA"), "image/png");
    }

    #[test]
    fn test_detect_base64_jpeg() {
        assert_eq!(detect_base64_image_mime("/9j/4AAQSkZJRgABAQ=="), "image/jpeg");
    }

    #[test]
    fn test_detect_base64_garbage_falls_back() {
        assert_eq!(detect_base64_image_mime("not base64 at all!"), "image/jpeg");
        assert_eq!(detect_base64_image_mime(""), "image/jpeg");
    }
}
