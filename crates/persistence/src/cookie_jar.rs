//! Cookie-backed key-value store.
//!
//! The store is built from a request's `Cookie` header. Writes are applied
//! to the in-memory view immediately and queued as [`PendingCookie`]s that
//! the web layer turns into `Set-Cookie` headers on the response.

use domain::services::{KeyValueStore, StorageError};
use std::collections::HashMap;

/// How long a written cookie lives in the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Survives browser restarts (explicit Max-Age).
    Durable,
    /// Dropped when the browser session ends.
    Session,
}

/// A cookie write waiting to be sent. `value == None` deletes the cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCookie {
    pub name: String,
    pub value: Option<String>,
    pub lifetime: Lifetime,
}

/// Parses a `Cookie` header. The first occurrence of a name wins.
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for pair in header.split(';').map(str::trim) {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let value = value.trim().trim_matches('"');
        cookies
            .entry(name.to_string())
            .or_insert_with(|| value.to_string());
    }
    cookies
}

/// Cookie octets allowed unquoted in a cookie value.
fn is_cookie_octet(c: char) -> bool {
    matches!(c, '\x21' | '\x23'..='\x2B' | '\x2D'..='\x3A' | '\x3C'..='\x5B' | '\x5D'..='\x7E')
}

/// Key-value view over request cookies.
#[derive(Debug, Clone)]
pub struct CookieJarStore {
    values: HashMap<String, String>,
    lifetime: Lifetime,
    pending: Vec<PendingCookie>,
}

impl CookieJarStore {
    pub fn from_header(header: Option<&str>, lifetime: Lifetime) -> Self {
        Self {
            values: header.map(parse_cookie_header).unwrap_or_default(),
            lifetime,
            pending: Vec::new(),
        }
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn pending(&self) -> &[PendingCookie] {
        &self.pending
    }

    /// Drains queued writes.
    pub fn take_pending(&mut self) -> Vec<PendingCookie> {
        std::mem::take(&mut self.pending)
    }

    fn queue(&mut self, name: &str, value: Option<String>) {
        self.pending.retain(|cookie| cookie.name != name);
        self.pending.push(PendingCookie {
            name: name.to_string(),
            value,
            lifetime: self.lifetime,
        });
    }
}

impl KeyValueStore for CookieJarStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if key.is_empty() || !key.chars().all(is_cookie_octet) || !value.chars().all(is_cookie_octet) {
            tracing::debug!(key = %key, "Rejected cookie write with invalid characters");
            return Err(StorageError::InvalidValue {
                key: key.to_string(),
            });
        }
        self.values.insert(key.to_string(), value.to_string());
        self.queue(key, Some(value.to_string()));
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        self.queue(key, None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookie_header() {
        let cookies = parse_cookie_header("a=1; b=two ; c=\"quoted\"; a=ignored; junk; =x");
        assert_eq!(cookies.get("a").map(String::as_str), Some("1"));
        assert_eq!(cookies.get("b").map(String::as_str), Some("two"));
        assert_eq!(cookies.get("c").map(String::as_str), Some("quoted"));
        assert_eq!(cookies.len(), 3);
    }

    #[test]
    fn test_reads_request_cookies() {
        let store = CookieJarStore::from_header(Some("invite_choice_1=DECLINED"), Lifetime::Session);
        assert_eq!(
            store.get("invite_choice_1").unwrap().as_deref(),
            Some("DECLINED")
        );
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_writes_are_visible_and_queued() {
        let mut store = CookieJarStore::from_header(None, Lifetime::Durable);
        store.set("invite_confirmed_1", "ATTENDING").unwrap();
        store.set("invite_confirmed_1", "DECLINED").unwrap();

        assert_eq!(
            store.get("invite_confirmed_1").unwrap().as_deref(),
            Some("DECLINED")
        );
        assert_eq!(
            store.pending(),
            &[PendingCookie {
                name: "invite_confirmed_1".to_string(),
                value: Some("DECLINED".to_string()),
                lifetime: Lifetime::Durable,
            }]
        );
    }

    #[test]
    fn test_remove_queues_deletion() {
        let mut store = CookieJarStore::from_header(Some("admin_token=abc"), Lifetime::Durable);
        store.remove("admin_token").unwrap();

        assert_eq!(store.get("admin_token").unwrap(), None);
        let pending = store.take_pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].value, None);
        assert!(store.pending().is_empty());
    }

    #[test]
    fn test_rejects_unsafe_values() {
        let mut store = CookieJarStore::from_header(None, Lifetime::Durable);
        assert!(store.set("k", "a;b").is_err());
        assert!(store.set("k", "with space").is_err());
        assert!(store.set("", "v").is_err());
        assert!(store.pending().is_empty());
    }
}
