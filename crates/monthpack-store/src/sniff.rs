//! Content type detection from leading payload bytes.
//!
//! Only the first 512 bytes are inspected. Signatures are checked first; data
//! without binary control bytes is reported as UTF-8 text, everything else as
//! an octet stream.

const SNIFF_LEN: usize = 512;

/// Fallback for binary payloads.
pub const OCTET_STREAM: &str = "application/octet-stream";
/// Reported for payloads without binary control bytes.
pub const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

const SIGNATURES: &[(&[u8], &str)] = &[
    (b"PK\x03\x04", "application/zip"),
    (b"PK\x05\x06", "application/zip"),
    (b"\x1F\x8B\x08", "application/x-gzip"),
    (b"%PDF-", "application/pdf"),
    (b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\xEF\xBB\xBF", PLAIN_TEXT),
    (b"\xFE\xFF", "text/plain; charset=utf-16be"),
    (b"\xFF\xFE", "text/plain; charset=utf-16le"),
];

/// Detect the MIME type of a payload from its first bytes.
#[must_use]
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let head = &data[..data.len().min(SNIFF_LEN)];
    if let Some(mime) = SIGNATURES
        .iter()
        .find(|(signature, _)| head.starts_with(signature))
        .map(|(_, mime)| *mime)
    {
        return mime;
    }
    if head.iter().any(|byte| is_binary(*byte)) {
        OCTET_STREAM
    } else {
        PLAIN_TEXT
    }
}

const fn is_binary(byte: u8) -> bool {
    matches!(byte, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_signatures() {
        assert_eq!(detect_content_type(b"PK\x03\x04\x14\x00"), "application/zip");
        assert_eq!(
            detect_content_type(b"PK\x05\x06\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0"),
            "application/zip"
        );
    }

    #[test]
    fn other_signatures() {
        assert_eq!(detect_content_type(b"%PDF-1.7"), "application/pdf");
        assert_eq!(detect_content_type(b"\x1F\x8B\x08\x00"), "application/x-gzip");
        assert_eq!(detect_content_type(b"GIF89a...."), "image/gif");
    }

    #[test]
    fn text_and_binary_fallbacks() {
        assert_eq!(detect_content_type(b"month,crime\n"), PLAIN_TEXT);
        assert_eq!(detect_content_type(b""), PLAIN_TEXT);
        assert_eq!(detect_content_type(b"\x00\x01\x02"), OCTET_STREAM);
    }

    #[test]
    fn only_leading_window_is_inspected() {
        let mut data = vec![b'a'; SNIFF_LEN];
        data.push(0x00);
        assert_eq!(detect_content_type(&data), PLAIN_TEXT);
    }
}
