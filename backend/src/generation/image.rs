//! Inline image payloads for food photo analysis

use super::GenerationError;

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Base64 image data ready to inline into a model request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    /// Accepts raw base64 or a `data:image/<type>;base64,` URL.
    ///
    /// The mime type comes from the data URL when present. Any other data URL
    /// is rejected.
    pub fn parse(raw: &str) -> Result<Self, GenerationError> {
        let raw = raw.trim();

        let (mime_type, data) = match raw.strip_prefix("data:") {
            Some(rest) => match rest.split_once(";base64,") {
                Some((mime, data)) if mime.starts_with("image/") => (mime.to_string(), data),
                _ => return Err(GenerationError::InvalidImage),
            },
            None => (DEFAULT_MIME_TYPE.to_string(), raw),
        };

        if data.is_empty() {
            return Err(GenerationError::InvalidImage);
        }

        Ok(Self {
            mime_type,
            data: data.to_string(),
        })
    }
}
