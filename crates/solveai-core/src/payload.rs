//! `data:` URL codec for inline file payloads.
//!
//! Folder files keep their bytes as a self-describing string,
//! `data:<mime>;base64,<payload>`, the same shape a browser `FileReader`
//! produces.

use base64::Engine;

use crate::error::{Error, Result};

/// A decoded `data:` URL header plus its still-encoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub base64: String,
}

impl DataUrl {
    /// Decode the body into raw bytes.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.base64.as_bytes())
            .map_err(|e| Error::InvalidInput(format!("Invalid base64 payload: {}", e)))
    }
}

/// Encode raw bytes as a `data:` URL.
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Split a `data:` URL into MIME type and base64 body.
///
/// Only base64 bodies are accepted; the model API needs them encoded anyway.
pub fn parse_data_url(value: &str) -> Result<DataUrl> {
    let rest = value
        .strip_prefix("data:")
        .ok_or_else(|| Error::InvalidInput("Payload is not a data URL".to_string()))?;
    let (header, body) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidInput("Data URL has no body".to_string()))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| Error::InvalidInput("Data URL is not base64-encoded".to_string()))?;

    if body.is_empty() {
        return Err(Error::InvalidInput("Data URL body is empty".to_string()));
    }

    Ok(DataUrl {
        mime_type: mime_type.to_string(),
        base64: body.to_string(),
    })
}
