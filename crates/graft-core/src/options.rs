//! The compact option-string parser.
//!
//! Component options are written as attribute payloads in a compact JSON-ish
//! form without the outer braces, with single quotes allowed in place of
//! double quotes:
//!
//! ```text
//! data-widget-hider="'delay': 300, 'target': '#panel'"
//! ```
//!
//! [`parse`] is tolerant by contract: a malformed payload is logged and
//! produces an empty map, never an error for the caller.

use serde_json::Value;
use tracing::error;

/// Parsed per-component options: a key/value mapping.
pub type Options = serde_json::Map<String, Value>;

/// Parses a compact option string into a key/value mapping.
///
/// The payload is wrapped in braces and single quotes are normalized to
/// double quotes before parsing as JSON. An empty payload yields an empty
/// mapping; a malformed payload is logged and also yields an empty mapping.
pub fn parse(raw: &str) -> Options {
    let wrapped = format!("{{{}}}", raw.replace('\'', "\""));
    match serde_json::from_str::<Options>(&wrapped) {
        Ok(options) => options,
        Err(err) => {
            error!(payload = %wrapped, %err, "Error while parsing option string");
            Options::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_yields_empty_options() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn single_quotes_are_normalized() {
        let options = parse("'delay': 300, 'target': '#panel'");
        assert_eq!(options.get("delay"), Some(&Value::from(300)));
        assert_eq!(options.get("target"), Some(&Value::from("#panel")));
    }

    #[test]
    fn malformed_payload_falls_back_to_empty() {
        assert!(parse("'unterminated: ").is_empty());
        assert!(parse("not json at all").is_empty());
    }
}
