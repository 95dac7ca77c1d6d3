use serde_json::error::Category;

/// Failures raised while decoding a document or localizing one of its timestamps.
///
/// A lookup that simply finds nothing (no rain forecast, unknown altitude,
/// unknown location) is not an error: those queries return `None`.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Document is missing field `{0}`")]
    MissingField(String),

    #[error("Malformed document: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Unknown timezone '{0}'")]
    InvalidTimezone(String),

    #[error("Timestamp {0} is out of range")]
    InvalidTimestamp(i64),
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        match missing_field_name(&err) {
            Some(field) => ModelError::MissingField(field),
            None => ModelError::Malformed(err),
        }
    }
}

/// serde reports absent keys as a data error reading "missing field `name`".
fn missing_field_name(err: &serde_json::Error) -> Option<String> {
    if err.classify() != Category::Data {
        return None;
    }

    let msg = err.to_string();
    let rest = msg.strip_prefix("missing field `")?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}
