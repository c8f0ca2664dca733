use base64::{Engine as _, engine::general_purpose};
use thiserror::Error;

/// A malformed `data:` URL.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("expected a data: URL")]
    Scheme,

    #[error("data URL must be base64 encoded")]
    NotBase64,

    #[error("data URL payload is not valid base64")]
    Payload,
}

/// Builds a self-describing `data:<mime>;base64,<payload>` string.
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Splits a base64 `data:` URL into its declared MIME type and raw bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), DataUrlError> {
    let rest = url.trim().strip_prefix("data:").ok_or(DataUrlError::Scheme)?;
    let (meta, payload) = rest.split_once(',').ok_or(DataUrlError::Scheme)?;
    let mime_type = meta.strip_suffix(";base64").ok_or(DataUrlError::NotBase64)?;

    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| DataUrlError::Payload)?;

    Ok((mime_type.to_ascii_lowercase(), bytes))
}
