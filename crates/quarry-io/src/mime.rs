//! MIME type detection

use std::path::Path;

use crate::spi::MimeTypeDetector;

/// Detector combining `mime_guess` path lookups with a magic-byte probe for
/// payloads that arrive without a usable filename.
pub struct GuessMimeTypeDetector;

impl MimeTypeDetector for GuessMimeTypeDetector {
    fn from_path(&self, path: &Path) -> Option<String> {
        mime_guess::from_path(path).first_raw().map(str::to_string)
    }

    fn from_buffer(&self, buffer: &[u8]) -> Option<String> {
        sniff(buffer).map(str::to_string)
    }
}

/// Signature table for the formats the repository commonly stores.
fn sniff(buffer: &[u8]) -> Option<&'static str> {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"%PDF-", "application/pdf"),
        (b"PK\x03\x04", "application/zip"),
        (b"\x1f\x8b", "application/gzip"),
    ];

    SIGNATURES
        .iter()
        .find(|(magic, _)| buffer.starts_with(magic))
        .map(|(_, mime)| *mime)
        .or_else(|| {
            // RIFF container: WebP or WAV depending on the format tag
            if buffer.len() >= 12 && &buffer[..4] == b"RIFF" {
                match &buffer[8..12] {
                    b"WEBP" => Some("image/webp"),
                    b"WAVE" => Some("audio/x-wav"),
                    _ => None,
                }
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_uses_extension() {
        let detector = GuessMimeTypeDetector;
        assert_eq!(
            detector.from_path(Path::new("logo.png")).as_deref(),
            Some("image/png")
        );
        assert_eq!(detector.from_path(Path::new("noextension")), None);
    }

    #[test]
    fn test_from_buffer_sniffs_magic_bytes() {
        let detector = GuessMimeTypeDetector;
        assert_eq!(
            detector.from_buffer(b"\x89PNG\r\n\x1a\nrest").as_deref(),
            Some("image/png")
        );
        assert_eq!(
            detector.from_buffer(b"RIFF\x00\x00\x00\x00WEBPVP8 ").as_deref(),
            Some("image/webp")
        );
        assert_eq!(detector.from_buffer(b"plain text"), None);
    }
}
