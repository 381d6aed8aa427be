//! On-disk encodings of the history artifact.
//!
//! The dashboard loads the history as a script, so the canonical file is a
//! JavaScript assignment wrapping the JSON object:
//!
//! ```text
//! window.BENCHMARK_DATA = {
//!   "lastUpdate": 1683479476052,
//!   "repoUrl": "...",
//!   "entries": { ... }
//! }
//! ```
//!
//! Plain JSON is accepted and can be emitted as well.

/// Assignment prefix used by the dashboard's `data.js`.
pub const JS_PREFIX: &str = "window.BENCHMARK_DATA = ";

/// What `serialize` emits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DataFormat {
    /// `window.BENCHMARK_DATA = {...}` followed by a newline.
    #[default]
    JsAssignment,
    /// The bare JSON object.
    Json,
}

impl DataFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataFormat::JsAssignment => "js",
            DataFormat::Json => "json",
        }
    }

    /// Format implied by a file extension; `.json` is JSON, anything else is
    /// the script form.
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext {
            Some(e) if e.eq_ignore_ascii_case("json") => DataFormat::Json,
            _ => DataFormat::JsAssignment,
        }
    }
}

/// Serialization options for a store.
#[derive(Clone, Copy, Debug, Default)]
pub struct StoreOptions {
    pub format: DataFormat,
}

impl StoreOptions {
    pub fn json() -> Self {
        Self {
            format: DataFormat::Json,
        }
    }
}

/// Strip the optional script wrapper, returning the JSON payload.
///
/// Returns `None` when nothing but whitespace remains.
pub fn json_payload(input: &str) -> Option<&str> {
    let mut body = input.trim();
    if let Some(rest) = body.strip_prefix(JS_PREFIX.trim_end()) {
        body = rest.trim_start();
    }
    if let Some(rest) = body.strip_suffix(';') {
        body = rest.trim_end();
    }
    if body.is_empty() {
        None
    } else {
        Some(body)
    }
}

/// Wrap a JSON document according to `format`.
pub fn wrap(json: String, format: DataFormat) -> String {
    match format {
        DataFormat::JsAssignment => format!("{JS_PREFIX}{json}\n"),
        DataFormat::Json => json,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_of_script_form() {
        let s = "window.BENCHMARK_DATA = {\"a\": 1}\n";
        assert_eq!(json_payload(s), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_payload_tolerates_semicolon_and_whitespace() {
        let s = "\n  window.BENCHMARK_DATA ={\"a\": 1};  \n";
        assert_eq!(json_payload(s), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_payload_of_plain_json() {
        assert_eq!(json_payload(" {} "), Some("{}"));
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(json_payload(""), None);
        assert_eq!(json_payload("  \n\t"), None);
        assert_eq!(json_payload("window.BENCHMARK_DATA = "), None);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(
            wrap("{}".to_string(), DataFormat::JsAssignment),
            "window.BENCHMARK_DATA = {}\n"
        );
        assert_eq!(wrap("{}".to_string(), DataFormat::Json), "{}");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DataFormat::from_extension(Some("JSON")), DataFormat::Json);
        assert_eq!(DataFormat::from_extension(Some("js")), DataFormat::JsAssignment);
        assert_eq!(DataFormat::from_extension(None), DataFormat::JsAssignment);
    }
}
