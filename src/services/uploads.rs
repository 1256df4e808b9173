//! Embedding uploaded images as data URLs.
//!
//! Staff photos and transaction slips are stored inline on their record as
//! `data:<mime>;base64,<payload>` strings rather than in a file store.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::{OpsError, OpsResult};

/// A decoded data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Declared MIME type.
    pub mime: String,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

/// Encodes an uploaded image as a data URL.
///
/// # Arguments
///
/// * `field` - The record field the upload is for, used in error messages
/// * `mime` - The declared content type; must start with `image/`
/// * `bytes` - The file contents
/// * `max_bytes` - The largest accepted upload
///
/// # Returns
///
/// The data URL, or a validation error if the file is empty, too large, or
/// not an image.
///
/// # Example
///
/// ```
/// use cleaning_ops::services::embed_image;
///
/// let url = embed_image("photo_url", "image/png", b"\x89PNG", 1024).unwrap();
/// assert_eq!(url, "data:image/png;base64,iVBORw==");
///
/// assert!(embed_image("photo_url", "application/pdf", b"%PDF", 1024).is_err());
/// ```
pub fn embed_image(field: &str, mime: &str, bytes: &[u8], max_bytes: usize) -> OpsResult<String> {
    let mime = mime.trim().to_ascii_lowercase();
    if !mime.starts_with("image/") || mime.len() == "image/".len() {
        return Err(OpsError::validation(
            field,
            format!("Only image uploads are accepted, got '{}'", mime),
        ));
    }
    if bytes.is_empty() {
        return Err(OpsError::validation(field, "Upload is empty"));
    }
    if bytes.len() > max_bytes {
        return Err(OpsError::validation(
            field,
            format!(
                "Upload is {} bytes, the limit is {} bytes",
                bytes.len(),
                max_bytes
            ),
        ));
    }
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// Checks an already-encoded data URL against the same rules as
/// [`embed_image`] and returns it unchanged.
pub fn validate_image_url(field: &str, url: &str, max_bytes: usize) -> OpsResult<String> {
    let decoded = parse_data_url(field, url)?;
    embed_image(field, &decoded.mime, &decoded.bytes, max_bytes)?;
    Ok(url.to_string())
}

/// Splits a base64 data URL into its MIME type and bytes.
pub fn parse_data_url(field: &str, url: &str) -> OpsResult<DataUrl> {
    let malformed = || OpsError::validation(field, "Expected a base64 data URL");
    let rest = url.strip_prefix("data:").ok_or_else(malformed)?;
    let (header, payload) = rest.split_once(',').ok_or_else(malformed)?;
    let mime = header.strip_suffix(";base64").ok_or_else(malformed)?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| OpsError::validation(field, format!("Invalid base64 payload: {}", e)))?;
    Ok(DataUrl {
        mime: mime.to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_limit_is_inclusive() {
        assert!(embed_image("photo_url", "image/jpeg", &[0u8; 16], 16).is_ok());
        let err = embed_image("photo_url", "image/jpeg", &[0u8; 17], 16).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("limit is 16 bytes"));
    }

    #[test]
    fn test_empty_and_non_image_are_rejected() {
        assert!(embed_image("photo_url", "image/png", &[], 16).is_err());
        assert!(embed_image("photo_url", "image/", &[1], 16).is_err());
        assert!(embed_image("photo_url", "text/plain", &[1], 16).is_err());
    }

    #[test]
    fn test_mime_is_normalized() {
        let url = embed_image("slip", " Image/PNG ", &[1, 2, 3], 16).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_parse_data_url() {
        let url = embed_image("slip", "image/png", &[1, 2, 3], 16).unwrap();
        let decoded = parse_data_url("slip", &url).unwrap();
        assert_eq!(decoded.mime, "image/png");
        assert_eq!(decoded.bytes, vec![1, 2, 3]);

        assert!(parse_data_url("slip", "https://example.com/a.png").is_err());
        assert!(parse_data_url("slip", "data:image/png,abc").is_err());
        assert!(parse_data_url("slip", "data:image/png;base64,!!").is_err());
    }

    #[test]
    fn test_validate_image_url_applies_limit() {
        let url = embed_image("slip", "image/png", &[7u8; 32], 64).unwrap();
        assert_eq!(validate_image_url("slip", &url, 64).unwrap(), url);
        assert!(validate_image_url("slip", &url, 8).is_err());
    }
}
