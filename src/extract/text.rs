use super::ExtractError;

/// Plain text is returned verbatim; it must be valid UTF-8.
pub fn extract(bytes: Vec<u8>) -> Result<String, ExtractError> {
    String::from_utf8(bytes).map_err(|e| ExtractError::Text(e.to_string()))
}
