//! Signature decipher extraction and evaluation.
//!
//! When the watch page serves scrambled `s=` signatures, the
//! transformation that turns them into valid `signature=` values lives in
//! the player script as a JavaScript function. We locate that function,
//! lift it (together with the helper object it depends on) out of the
//! script, and run it in an embedded evaluator with no I/O or network
//! bindings. Extracted functions are cached process-wide, keyed on the
//! exact player-script URL, so each player version is fetched and
//! analyzed at most once.

use crate::error::Error;
use boa_engine::{Context, Source};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

/// An extracted decipher function: the lifted JavaScript source and the
/// name of the callable it defines.
///
/// Each [`DecipherFunction::apply`] call evaluates the source in a fresh
/// evaluator context, so one scrambled signature cannot poison the next.
#[derive(Debug, Clone)]
pub struct DecipherFunction {
    name: String,
    source: String,
}

static FUNCTION_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.sig\|\|([A-Za-z0-9$_]+)\(").expect("static regex is valid"));

impl DecipherFunction {
    /// Locates the decipher function inside a player script.
    ///
    /// The function name is the identifier in the `.sig||<name>(` fallback
    /// expression. Its definition `function <name>(...){...}` is taken up
    /// to the next function declaration, together with the single `var`
    /// declaration immediately preceding it (the helper object the body
    /// calls into).
    pub fn extract(player_js: &str) -> Option<Self> {
        let name = FUNCTION_NAME.captures(player_js)?.get(1)?.as_str();
        let marker = format!("function {name}");
        let (before, after) = player_js.split_once(&marker)?;
        let helpers = before.rsplit(";var").next().unwrap_or("");
        let body = after.split(";function").next().unwrap_or(after);
        let source = format!("var{helpers} function {name}{body}");
        tracing::trace!(name, "extracted decipher function");
        Some(DecipherFunction {
            name: name.to_string(),
            source,
        })
    }

    /// Runs the function over one scrambled signature.
    pub fn apply(&self, signature: &str) -> Result<String, Error> {
        let mut context = Context::default();
        context
            .eval(Source::from_bytes(&self.source))
            .map_err(|e| Error::Parse(format!("decipher function failed to evaluate: {e}")))?;
        let call = format!(
            "{}({})",
            self.name,
            serde_json::Value::String(signature.to_string())
        );
        let value = context
            .eval(Source::from_bytes(&call))
            .map_err(|e| Error::Parse(format!("decipher function failed: {e}")))?;
        let deciphered = value
            .to_string(&mut context)
            .map_err(|e| Error::Parse(format!("decipher result is not a string: {e}")))?;
        Ok(deciphered.to_std_string_escaped())
    }
}

/// Process-wide cache of extracted decipher functions, keyed on the
/// player-script URL.
///
/// The default instance is a singleton shared by every resolver, but the
/// cache is a value type so tests can inject a fresh one.
#[derive(Debug, Clone, Default)]
pub struct DecipherCache {
    inner: Arc<Mutex<HashMap<Url, DecipherFunction>>>,
}

static GLOBAL: Lazy<DecipherCache> = Lazy::new(DecipherCache::default);

impl DecipherCache {
    pub fn new() -> Self {
        DecipherCache::default()
    }

    /// The shared process-wide cache.
    pub fn global() -> DecipherCache {
        GLOBAL.clone()
    }

    pub fn get(&self, player_url: &Url) -> Option<DecipherFunction> {
        self.inner
            .lock()
            .expect("decipher cache lock poisoned")
            .get(player_url)
            .cloned()
    }

    pub fn insert(&self, player_url: Url, function: DecipherFunction) {
        self.inner
            .lock()
            .expect("decipher cache lock poisoned")
            .insert(player_url, function);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER_JS: &str = concat!(
        "(function(){var setup=1;})();",
        "var Wq={swap:function(a,b){var c=a[0];a[0]=a[b%a.length];a[b%a.length]=c;return a},",
        "reverse:function(a){return a.reverse()},",
        "cut:function(a,b){return a.slice(b)}};",
        "function xt(a){a=a.split(\"\");a=Wq.reverse(a);a=Wq.cut(a,1);return a.join(\"\")}",
        ";function unrelated(a){return a};",
        "var player={load:function(c){return c.sig||xt(c.s)}};"
    );

    #[test]
    fn finds_the_function_named_in_the_sig_fallback() {
        let function = DecipherFunction::extract(PLAYER_JS).unwrap();
        assert_eq!(function.name, "xt");
        assert!(function.source.starts_with("var Wq="));
        assert!(function.source.contains("function xt(a)"));
        assert!(!function.source.contains("unrelated"));
    }

    #[test]
    fn applies_the_extracted_function() {
        let function = DecipherFunction::extract(PLAYER_JS).unwrap();
        // reverse("ABCDEF") = "FEDCBA", then drop the first element.
        assert_eq!(function.apply("ABCDEF").unwrap(), "EDCBA");
    }

    #[test]
    fn scripts_without_the_fallback_yield_nothing() {
        assert!(DecipherFunction::extract("var a = 1; function f(x){return x}").is_none());
    }

    #[test]
    fn cache_is_keyed_on_player_url() {
        let cache = DecipherCache::new();
        let url = Url::parse("http://example.com/player.js").unwrap();
        assert!(cache.get(&url).is_none());
        cache.insert(url.clone(), DecipherFunction::extract(PLAYER_JS).unwrap());
        assert_eq!(cache.get(&url).unwrap().name, "xt");
        let other = Url::parse("http://example.com/player-v2.js").unwrap();
        assert!(cache.get(&other).is_none());
    }
}
