//! Site-access matchers.

use std::collections::HashMap;

use crate::request::SimplifiedRequest;

/// Derives a site-access name from a request.
pub trait Matcher: Send + Sync {
    /// Matcher name as referenced from configuration, e.g. `"port"`.
    fn name(&self) -> &'static str;

    /// Match the request to a site-access name, if the matcher applies.
    fn match_request(&mut self, request: &SimplifiedRequest) -> Option<String>;
}

/// Key → site-access table shared by map-based matchers.
///
/// The key is fixed once: after the first computation (or a reverse match)
/// later requests are not re-inspected.
#[derive(Debug, Clone, Default)]
pub struct MapMatcher {
    map: HashMap<String, String>,
    key: Option<String>,
}

impl MapMatcher {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self { map, key: None }
    }

    pub fn set_map_key(&mut self, key: impl Into<String>) {
        self.key = Some(key.into());
    }

    pub fn map_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Site access for the current key.
    pub fn lookup(&self) -> Option<&str> {
        self.key
            .as_deref()
            .and_then(|key| self.map.get(key))
            .map(String::as_str)
    }

    /// Key mapped to the given site access, first exact match wins.
    pub fn reverse_lookup(&self, site_access: &str) -> Option<&str> {
        self.map
            .iter()
            .find(|(_, name)| name.as_str() == site_access)
            .map(|(key, _)| key.as_str())
    }
}
