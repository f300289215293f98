//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs.

use super::config::config;

/// Get the base URL for API requests
///
/// Uses the configured base URL; when it is empty, derives it from the current
/// window location with port 8000 (the analytics service default).
///
/// # Returns
/// - API base URL like "http://localhost:8000" or "https://analytics.example.com"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let configured = &config().api.base_url;
    if !configured.is_empty() {
        return configured.clone();
    }

    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    derived_base(&protocol, &hostname)
}

fn derived_base(protocol: &str, hostname: &str) -> String {
    format!("{}//{}:8000", protocol, hostname)
}

/// Build a full API URL from a path
///
/// # Example
/// ```ignore
/// let url = api_url("/api/sales-data/");
/// ```
pub fn api_url(path: &str) -> String {
    join_url(&api_base(), path)
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://host:8000", "/api/sales-data/"),
            "http://host:8000/api/sales-data/"
        );
        assert_eq!(join_url("", "api/clear-data/"), "/api/clear-data/");
    }

    #[test]
    fn test_derived_base() {
        assert_eq!(derived_base("https:", "example.com"), "https://example.com:8000");
    }
}
