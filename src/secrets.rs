//! API key resolution.
//!
//! Keys are looked up by name through an ordered chain of sources:
//! in-memory cache, process environment, then an optional JSON key file.
//! A required key that no source can produce is a fatal configuration
//! error; the run never proceeds unauthenticated.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::{DugoutError, Result};

/// One place a key might come from.
pub trait KeySource: Send + Sync {
    /// Short label for logs ("env", "file", ...).
    fn name(&self) -> &'static str;

    /// Found / not-found; sources never error, they just miss.
    fn get(&self, key: &str) -> Option<String>;
}

/// Process environment variables.
pub struct EnvKeySource;

impl KeySource for EnvKeySource {
    fn name(&self) -> &'static str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// A flat JSON object of key names to values on disk.
pub struct FileKeySource {
    keys: HashMap<String, String>,
}

impl FileKeySource {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let keys: HashMap<String, String> = serde_json::from_str(&raw)?;
        Ok(Self { keys })
    }
}

impl KeySource for FileKeySource {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.keys.get(key).cloned().filter(|v| !v.is_empty())
    }
}

/// Fixed values, used for defaults and in tests.
pub struct StaticKeySource {
    keys: HashMap<String, String>,
}

impl StaticKeySource {
    pub fn new(keys: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

impl KeySource for StaticKeySource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.keys.get(key).cloned()
    }
}

/// Ordered fallback chain with a hit cache in front.
pub struct KeyChain {
    sources: Vec<Box<dyn KeySource>>,
    cache: Mutex<HashMap<String, String>>,
}

impl KeyChain {
    pub fn new(sources: Vec<Box<dyn KeySource>>) -> Self {
        Self {
            sources,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The standard chain: environment first, then an optional key file.
    pub fn standard(key_file: Option<&Path>) -> Self {
        let mut sources: Vec<Box<dyn KeySource>> = vec![Box::new(EnvKeySource)];
        if let Some(path) = key_file {
            match FileKeySource::load(path) {
                Ok(source) => sources.push(Box::new(source)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "key file unreadable, skipping source");
                }
            }
        }
        Self::new(sources)
    }

    /// Try each source in order; cache the first hit.
    pub fn lookup(&self, key: &str) -> Option<String> {
        if let Some(value) = self.cache.lock().expect("key cache poisoned").get(key) {
            return Some(value.clone());
        }
        for source in &self.sources {
            if let Some(value) = source.get(key) {
                debug!(key, source = source.name(), "resolved API key");
                self.cache
                    .lock()
                    .expect("key cache poisoned")
                    .insert(key.to_string(), value.clone());
                return Some(value);
            }
        }
        None
    }

    /// Resolve a key that the run cannot proceed without.
    pub fn require(&self, key: &str) -> Result<String> {
        self.lookup(key)
            .ok_or_else(|| DugoutError::MissingKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_respects_source_order() {
        let first = StaticKeySource::new([("K".to_string(), "from-first".to_string())]);
        let second = StaticKeySource::new([
            ("K".to_string(), "from-second".to_string()),
            ("ONLY_SECOND".to_string(), "value".to_string()),
        ]);
        let chain = KeyChain::new(vec![Box::new(first), Box::new(second)]);

        assert_eq!(chain.lookup("K").as_deref(), Some("from-first"));
        assert_eq!(chain.lookup("ONLY_SECOND").as_deref(), Some("value"));
        assert_eq!(chain.lookup("ABSENT"), None);
    }

    #[test]
    fn test_require_missing_key_is_fatal() {
        let chain = KeyChain::new(vec![]);
        let err = chain.require("SPORTRADAR_KEY").unwrap_err();
        assert!(matches!(err, DugoutError::MissingKey(name) if name == "SPORTRADAR_KEY"));
    }

    #[test]
    fn test_cache_serves_repeat_lookups() {
        let source = StaticKeySource::new([("K".to_string(), "v".to_string())]);
        let chain = KeyChain::new(vec![Box::new(source)]);
        assert_eq!(chain.lookup("K").as_deref(), Some("v"));
        // Second lookup comes out of the cache; same value either way.
        assert_eq!(chain.lookup("K").as_deref(), Some("v"));
    }
}
