//! Decoding helpers for raw attribute values

use crate::snapshot::Entry;

/// Decode a UTF-8 attribute value, replacing invalid sequences
pub fn decode_text(value: &[u8]) -> String {
    String::from_utf8_lossy(value).into_owned()
}

/// Decode a single-valued text attribute
///
/// Extra values are tolerated (first one wins) but logged.
pub fn decode_single_text(values: &[Vec<u8>]) -> Option<String> {
    if values.len() > 1 {
        tracing::warn!(
            count = values.len(),
            first = %decode_text(&values[0]),
            "Unexpectedly more than one value for text attribute"
        );
    }
    values.first().map(|v| decode_text(v))
}

/// Load a text attribute from an entry (`None` when absent)
pub fn load_text_attr(entry: &Entry, name: &str) -> Option<String> {
    entry.get(name).and_then(decode_single_text)
}
