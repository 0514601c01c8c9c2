//! Set-Cookie rendering for the guest RSVP cache and the admin session, and
//! the cookie subset forwarded to the backend.
//!
//! Cookie values themselves are read through
//! [`persistence::CookieJarStore`]; this module turns queued writes into
//! response headers with the configured security attributes.

use axum::http::{header::SET_COOKIE, HeaderMap, HeaderValue};
use persistence::{Lifetime, PendingCookie};

use crate::config::CookieConfig;

/// Builds `Set-Cookie` header values.
#[derive(Debug, Clone)]
pub struct CookieHelper {
    config: CookieConfig,
}

impl CookieHelper {
    pub fn new(config: CookieConfig) -> Self {
        Self { config }
    }

    /// Renders a queued cookie write.
    pub fn render_pending(&self, cookie: &PendingCookie) -> String {
        match (&cookie.value, cookie.lifetime) {
            (None, _) => self.build_clear_cookie(&cookie.name, "/"),
            (Some(value), Lifetime::Durable) => self.build_cookie(
                &cookie.name,
                value,
                "/",
                Some(self.config.durable_max_age_secs),
            ),
            (Some(value), Lifetime::Session) => self.build_cookie(&cookie.name, value, "/", None),
        }
    }

    /// Appends queued cookie writes to a response.
    pub fn add_pending(&self, headers: &mut HeaderMap, cookies: &[PendingCookie]) {
        for cookie in cookies {
            append(headers, &self.render_pending(cookie));
        }
    }

    /// Passes backend `Set-Cookie` values through unchanged.
    pub fn relay(&self, headers: &mut HeaderMap, raw: &[String]) {
        for value in raw {
            append(headers, value);
        }
    }

    /// Build a cookie string with all security attributes.
    fn build_cookie(&self, name: &str, value: &str, path: &str, max_age: Option<i64>) -> String {
        let mut cookie = format!("{}={}; Path={}", name, value, path);
        if let Some(max_age) = max_age {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }
        self.push_attributes(&mut cookie);
        cookie
    }

    /// Build a cookie string that clears an existing cookie.
    fn build_clear_cookie(&self, name: &str, path: &str) -> String {
        let mut cookie = format!(
            "{}=; Path={}; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            name, path
        );
        self.push_attributes(&mut cookie);
        cookie
    }

    fn push_attributes(&self, cookie: &mut String) {
        cookie.push_str("; HttpOnly");

        if self.config.secure {
            cookie.push_str("; Secure");
        }

        cookie.push_str(&format!("; SameSite={}", self.config.same_site));

        if !self.config.domain.is_empty() {
            cookie.push_str(&format!("; Domain={}", self.config.domain));
        }
    }
}

/// Prefix shared by the cookies the backend reads on a guest RSVP.
pub const GUEST_COOKIE_PREFIX: &str = "invite_";

/// Narrows a browser `Cookie` header to the guest RSVP cookies.
///
/// Admin session and unrelated cookies are not sent to the backend.
pub fn guest_cookie_header(header: Option<&str>) -> Option<String> {
    let kept: Vec<&str> = header?
        .split(';')
        .map(str::trim)
        .filter(|pair| {
            pair.split_once('=')
                .is_some_and(|(name, _)| name.trim().starts_with(GUEST_COOKIE_PREFIX))
        })
        .collect();
    (!kept.is_empty()).then(|| kept.join("; "))
}

fn append(headers: &mut HeaderMap, cookie: &str) {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            headers.append(SET_COOKIE, value);
        }
        Err(_) => tracing::debug!("Dropped Set-Cookie value with invalid characters"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> CookieConfig {
        CookieConfig {
            secure: true,
            same_site: "Strict".to_string(),
            domain: String::new(),
            durable_max_age_secs: 31_536_000,
        }
    }

    fn pending(name: &str, value: Option<&str>, lifetime: Lifetime) -> PendingCookie {
        PendingCookie {
            name: name.to_string(),
            value: value.map(str::to_string),
            lifetime,
        }
    }

    #[test]
    fn test_render_durable_cookie() {
        let helper = CookieHelper::new(test_config());
        let cookie = helper.render_pending(&pending("invite_confirmed_1", Some("ATTENDING"), Lifetime::Durable));

        assert!(cookie.starts_with("invite_confirmed_1=ATTENDING; Path=/"));
        assert!(cookie.contains("Max-Age=31536000"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Strict"));
    }

    #[test]
    fn test_render_session_cookie() {
        let helper = CookieHelper::new(test_config());
        let cookie = helper.render_pending(&pending("admin_token", Some("abc"), Lifetime::Session));

        assert!(cookie.starts_with("admin_token=abc; Path=/"));
        assert!(!cookie.contains("Max-Age"));
    }

    #[test]
    fn test_render_clear_cookie() {
        let helper = CookieHelper::new(test_config());
        let cookie = helper.render_pending(&pending("admin_token", None, Lifetime::Session));

        assert!(cookie.contains("admin_token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn test_cookie_with_domain() {
        let mut config = test_config();
        config.domain = "example.com".to_string();
        config.secure = false;

        let helper = CookieHelper::new(config);
        let cookie = helper.render_pending(&pending("a", Some("b"), Lifetime::Durable));

        assert!(cookie.contains("Domain=example.com"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_add_pending_and_relay() {
        let helper = CookieHelper::new(test_config());
        let mut headers = HeaderMap::new();
        helper.add_pending(
            &mut headers,
            &[pending("invite_confirmed_1", Some("DECLINED"), Lifetime::Durable)],
        );
        helper.relay(
            &mut headers,
            &["invite_choice_1=DECLINED; Path=/; SameSite=lax".to_string()],
        );

        let values: Vec<_> = headers.get_all(SET_COOKIE).iter().collect();
        assert_eq!(values.len(), 2);
        assert_eq!(
            values[1].to_str().unwrap(),
            "invite_choice_1=DECLINED; Path=/; SameSite=lax"
        );
    }

    #[test]
    fn test_guest_cookie_header_keeps_invite_cookies() {
        let header = "admin_token=secret; invite_choice_1=ATTENDING; session=xyz; invite_confirmed_1=ATTENDING";
        assert_eq!(
            guest_cookie_header(Some(header)).as_deref(),
            Some("invite_choice_1=ATTENDING; invite_confirmed_1=ATTENDING")
        );
    }

    #[test]
    fn test_guest_cookie_header_without_invite_cookies() {
        assert_eq!(guest_cookie_header(Some("admin_token=secret; session=xyz")), None);
        assert_eq!(guest_cookie_header(Some("")), None);
        assert_eq!(guest_cookie_header(None), None);
    }
}
