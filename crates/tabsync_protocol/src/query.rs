//! Query-string encoding for fetch filters.

/// Suffix marking a numeric greater-or-equal filter, e.g. `year_gte=2021`.
pub const GTE_SUFFIX: &str = "_gte";

/// Ordered query parameters for a fetch call.
///
/// Keys keep their insertion order so encoded strings are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a key/value pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.pairs.push((key.into(), value.to_string()));
    }

    /// Appends a pair, returning the set for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    /// Appends a `<field>_gte` filter.
    pub fn with_gte(self, field: &str, value: impl ToString) -> Self {
        self.with(format!("{field}{GTE_SUFFIX}"), value)
    }

    /// Returns true if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the pairs in insertion order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Looks up the first value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Encodes as a query string, including the leading `?`. Empty
    /// parameter sets encode as the empty string.
    pub fn encode(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }
        let encoded: Vec<String> = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect();
        format!("?{}", encoded.join("&"))
    }

    /// Parses a query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::new();
        for pair in query.split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.push(decode_component(key), decode_component(value));
        }
        params
    }
}

/// Percent-encodes everything outside the unreserved set.
fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Decodes percent escapes; malformed escapes pass through untouched.
fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
                bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
            ) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        if bytes[i] == b'+' {
            out.push(b' ');
        } else {
            out.push(bytes[i]);
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_encodes_to_nothing() {
        assert_eq!(QueryParams::new().encode(), "");
    }

    #[test]
    fn encode_pairs_in_order() {
        let params = QueryParams::new().with("year_gte", 2021).with("status", "GRANTED");
        assert_eq!(params.encode(), "?year_gte=2021&status=GRANTED");
    }

    #[test]
    fn gte_helper() {
        let params = QueryParams::new().with_gte("year", 2021);
        assert_eq!(params.get("year_gte"), Some("2021"));
    }

    #[test]
    fn special_characters_are_escaped() {
        let params = QueryParams::new().with("id", "__new__-17?&=");
        assert_eq!(params.encode(), "?id=__new__-17%3F%26%3D");
    }

    #[test]
    fn parse_roundtrip() {
        let params = QueryParams::new()
            .with("year_gte", 2021)
            .with("q", "deep learning & ai");
        let parsed = QueryParams::parse(&params.encode());
        assert_eq!(parsed, params);
    }

    #[test]
    fn parse_tolerates_missing_value() {
        let parsed = QueryParams::parse("?flag&id=a1");
        assert_eq!(parsed.get("flag"), Some(""));
        assert_eq!(parsed.get("id"), Some("a1"));
    }
}
