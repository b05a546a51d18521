//! Query-string assembly for the Data API.
//!
//! The upstream API has hundreds of parameters per endpoint, so filters
//! and parameters are free-form `String -> JSON` maps rather than typed
//! structs. String values go onto the wire as-is; everything else
//! (numbers, booleans, arrays, objects) is JSON-encoded first and then
//! percent-encoded like any other value.

use serde_json::{Map, Value};
use url::Url;

/// Appends every entry of `items` to the URL's query string.
pub fn append_query_items(url: &mut Url, items: &Map<String, Value>) {
    let mut query = url.query_pairs_mut();
    for (key, value) in items {
        match value {
            Value::String(s) => {
                query.append_pair(key, s);
            }
            other => {
                query.append_pair(key, &other.to_string());
            }
        }
    }
}

/// Appends the `part` projection specifier, comma-joined.
///
/// An empty `part` list is passed through unchanged; the server rejects
/// it with a 400 and the library does not second-guess that.
pub fn append_part(url: &mut Url, part: &[&str]) {
    url.query_pairs_mut().append_pair("part", &part.join(","));
}

/// True when the URL already carries a query parameter named `key`.
pub fn has_query_param(url: &Url, key: &str) -> bool {
    url.query_pairs().any(|(k, _)| k == key)
}
