use crate::config::AppConfig;
use crate::error::{Error, Result};

/// What an upload slot accepts. Certificates take either an image or a PDF;
/// every other slot is image-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    ImageOrDocument,
}

/// Detects the content type from the file's leading bytes. The client's
/// declared Content-Type is ignored entirely.
#[must_use]
pub fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if data.starts_with(b"%PDF-") {
        return Some("application/pdf");
    }
    None
}

/// Validates an upload and returns the sniffed MIME type to store alongside
/// the blob.
pub fn validate_upload(config: &AppConfig, kind: UploadKind, data: &[u8]) -> Result<&'static str> {
    if data.is_empty() {
        return Err(Error::File("uploaded file is empty".into()));
    }
    if data.len() > config.max_upload_bytes {
        return Err(Error::File(format!(
            "file exceeds maximum size of {} bytes",
            config.max_upload_bytes
        )));
    }

    let mime = sniff_mime(data)
        .ok_or_else(|| Error::File("unrecognized or unsupported file type".into()))?;

    let allowed = match kind {
        UploadKind::Image => config.is_allowed_image(mime),
        UploadKind::ImageOrDocument => config.is_allowed_image(mime) || config.is_allowed_document(mime),
    };
    if !allowed {
        return Err(Error::File(format!("file type {mime} is not allowed")));
    }

    Ok(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0];
    const PDF: &[u8] = b"%PDF-1.7 content";

    #[test]
    fn sniffs_known_types() {
        assert_eq!(sniff_mime(PNG), Some("image/png"));
        assert_eq!(sniff_mime(JPEG), Some("image/jpeg"));
        assert_eq!(sniff_mime(PDF), Some("application/pdf"));
        assert_eq!(sniff_mime(b"GIF89a......"), Some("image/gif"));
        assert_eq!(sniff_mime(b"RIFF\x00\x00\x00\x00WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_mime(b"plain text"), None);
        assert_eq!(sniff_mime(b""), None);
    }

    #[test]
    fn image_slot_rejects_pdf() {
        let config = AppConfig::default();
        assert_eq!(
            validate_upload(&config, UploadKind::Image, PNG).unwrap(),
            "image/png"
        );
        assert!(validate_upload(&config, UploadKind::Image, PDF).is_err());
    }

    #[test]
    fn certificate_slot_takes_image_or_pdf() {
        let config = AppConfig::default();
        assert_eq!(
            validate_upload(&config, UploadKind::ImageOrDocument, PDF).unwrap(),
            "application/pdf"
        );
        assert_eq!(
            validate_upload(&config, UploadKind::ImageOrDocument, JPEG).unwrap(),
            "image/jpeg"
        );
    }

    #[test]
    fn rejects_empty_and_oversized() {
        let mut config = AppConfig::default();
        assert!(matches!(
            validate_upload(&config, UploadKind::Image, b""),
            Err(Error::File(_))
        ));

        config.max_upload_bytes = 4;
        assert!(matches!(
            validate_upload(&config, UploadKind::Image, PNG),
            Err(Error::File(_))
        ));
    }

    #[test]
    fn declared_type_is_irrelevant() {
        // A renamed executable with no known magic bytes fails regardless of
        // what the client claimed.
        let config = AppConfig::default();
        assert!(validate_upload(&config, UploadKind::Image, b"MZ\x90\x00").is_err());
    }
}
