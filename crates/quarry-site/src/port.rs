//! Port-based site-access matcher.

use std::collections::HashMap;

use quarry_core::constants::{HTTPS_DEFAULT_PORT, HTTP_DEFAULT_PORT};

use crate::matcher::{MapMatcher, Matcher};
use crate::request::SimplifiedRequest;

/// Matches a site access by request port. Requests without an explicit port
/// fall back to the scheme default: 443 for https, 80 otherwise.
#[derive(Debug, Clone)]
pub struct PortMatcher {
    map: MapMatcher,
}

impl PortMatcher {
    /// `map` associates port keys (`"80"`, `"8443"`, …) with site-access
    /// names.
    pub fn new(map: HashMap<String, String>) -> Self {
        Self {
            map: MapMatcher::new(map),
        }
    }

    pub fn map_key(&self) -> Option<&str> {
        self.map.map_key()
    }

    fn derive_key(request: &SimplifiedRequest) -> String {
        match request.port {
            Some(port) => port.to_string(),
            None if request.is_https() => HTTPS_DEFAULT_PORT.to_string(),
            None => HTTP_DEFAULT_PORT.to_string(),
        }
    }

    /// Reconstruct request state for a site access: resolve its port key,
    /// fix it as this matcher's key, and write it back as the request's
    /// numeric port. Returns false when the site access is not in the map.
    pub fn reverse_match(
        &mut self,
        site_access: &str,
        request: &mut SimplifiedRequest,
    ) -> bool {
        let key = match self.map.reverse_lookup(site_access) {
            Some(key) => key.to_string(),
            None => return false,
        };

        match key.parse::<u16>() {
            Ok(port) => request.set_port(port),
            Err(_) => {
                tracing::warn!(key = %key, "Port map key is not numeric; request port left unset");
            }
        }
        self.map.set_map_key(key);
        true
    }
}

impl Matcher for PortMatcher {
    fn name(&self) -> &'static str {
        "port"
    }

    fn match_request(&mut self, request: &SimplifiedRequest) -> Option<String> {
        // the key is computed once; later requests don't change it
        if self.map.map_key().is_none() {
            self.map.set_map_key(Self::derive_key(request));
        }
        self.map.lookup().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> PortMatcher {
        PortMatcher::new(HashMap::from([
            ("80".to_string(), "site".to_string()),
            ("443".to_string(), "secure".to_string()),
            ("8080".to_string(), "admin".to_string()),
        ]))
    }

    #[test]
    fn test_explicit_port_wins_over_scheme() {
        let mut matcher = matcher();
        let request = SimplifiedRequest::new("https", "example.com").with_port(8080);
        assert_eq!(matcher.match_request(&request).as_deref(), Some("admin"));
        assert_eq!(matcher.map_key(), Some("8080"));
    }

    #[test]
    fn test_no_port_https_defaults_to_443() {
        let mut matcher = matcher();
        let request = SimplifiedRequest::new("https", "example.com");
        assert_eq!(matcher.match_request(&request).as_deref(), Some("secure"));
        assert_eq!(matcher.map_key(), Some("443"));
    }

    #[test]
    fn test_no_port_http_defaults_to_80() {
        let mut matcher = matcher();
        let request = SimplifiedRequest::new("http", "example.com");
        assert_eq!(matcher.match_request(&request).as_deref(), Some("site"));
        assert_eq!(matcher.map_key(), Some("80"));
    }

    #[test]
    fn test_key_is_computed_only_once() {
        let mut matcher = matcher();
        let first = SimplifiedRequest::new("http", "example.com");
        assert_eq!(matcher.match_request(&first).as_deref(), Some("site"));

        // a different request no longer changes the key
        let second = SimplifiedRequest::new("https", "example.com").with_port(8080);
        assert_eq!(matcher.match_request(&second).as_deref(), Some("site"));
        assert_eq!(matcher.map_key(), Some("80"));
    }

    #[test]
    fn test_unmapped_port_matches_nothing() {
        let mut matcher = matcher();
        let request = SimplifiedRequest::new("http", "example.com").with_port(9999);
        assert_eq!(matcher.match_request(&request), None);
    }

    #[test]
    fn test_reverse_match_writes_port_back() {
        let mut matcher = matcher();
        let mut request = SimplifiedRequest::new("http", "example.com");

        assert!(matcher.reverse_match("admin", &mut request));
        assert_eq!(request.port, Some(8080));
        assert_eq!(matcher.map_key(), Some("8080"));
    }

    #[test]
    fn test_match_produces_site_access() {
        use quarry_core::models::SiteAccess;

        let mut matcher = matcher();
        let request = SimplifiedRequest::new("https", "example.com");
        let name = matcher.match_request(&request).unwrap();

        let site_access = SiteAccess::matched_by(name, matcher.name());
        assert_eq!(site_access.name, "secure");
        assert_eq!(site_access.matcher.as_deref(), Some("port"));
    }

    #[test]
    fn test_reverse_match_unknown_site_access() {
        let mut matcher = matcher();
        let mut request = SimplifiedRequest::new("http", "example.com");

        assert!(!matcher.reverse_match("unknown", &mut request));
        assert_eq!(request.port, None);
        assert_eq!(matcher.map_key(), None);
    }
}
