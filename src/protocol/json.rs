//! Flat JSON
//!
//! Bodies are JSON objects whose top-level keys map to string values. The
//! decoder scans for quote-delimited `"key" : "value"` pairs and stops at the
//! first incomplete pair; it does not handle escapes, nesting, numbers or
//! arrays. The encoder writes pairs in the order given, without escaping.

use std::collections::BTreeMap;

/// Decode the string pairs of a flat JSON object
///
/// Anything the scanner cannot make sense of yields an empty (or truncated)
/// map rather than an error. A repeated key keeps its last value.
pub fn decode_flat(text: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    let mut pos = 0;

    while pos < text.len() {
        let Some(key_start) = find_from(text, '"', pos) else { break };
        let Some(key_end) = find_from(text, '"', key_start + 1) else { break };
        let Some(colon) = find_from(text, ':', key_end) else { break };
        let Some(value_start) = find_from(text, '"', colon) else { break };
        let Some(value_end) = find_from(text, '"', value_start + 1) else { break };

        fields.insert(
            text[key_start + 1..key_end].to_string(),
            text[value_start + 1..value_end].to_string(),
        );
        pos = value_end + 1;
    }

    fields
}

/// Encode pairs as a flat JSON object, e.g. `{"a":"1","b":"2"}`
pub fn encode_flat<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = String::from("{");
    for (index, (key, value)) in pairs.into_iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push('"');
        out.push_str(key.as_ref());
        out.push_str("\":\"");
        out.push_str(value.as_ref());
        out.push('"');
    }
    out.push('}');
    out
}

/// Byte offset of the next `needle` at or after `from`
fn find_from(text: &str, needle: char, from: usize) -> Option<usize> {
    text.get(from..)?.find(needle).map(|offset| from + offset)
}
