//! Cross-origin policy.
//!
//! An origin is allowed when it equals an entry of the configured list or
//! matches one of the built-in rules (loopback, private networks, `.local`
//! hosts, non-web URL schemes used by mobile shells). Rules are tried in
//! order and the first match wins. Unmatched origins receive no CORS
//! headers.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    request::Parts,
    HeaderName, HeaderValue, Method,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Preflight cache lifetime.
const MAX_AGE: Duration = Duration::from_secs(86_400);

static PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("loopback", r"^https?://(localhost|127\.0\.0\.1|\[::1\])(:\d+)?$"),
        ("private-10", r"^https?://10(\.\d{1,3}){3}(:\d+)?$"),
        ("private-172", r"^https?://172\.(1[6-9]|2\d|3[01])(\.\d{1,3}){2}(:\d+)?$"),
        ("private-192", r"^https?://192\.168(\.\d{1,3}){2}(:\d+)?$"),
        ("mdns-local", r"^https?://([a-z0-9-]+\.)+local(:\d+)?$"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).expect("origin pattern is valid")))
    .collect()
});

static SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z][a-z0-9+.-]*)://").expect("scheme pattern is valid"));

/// Which rule admitted an origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginMatch {
    Exact,
    Wildcard,
    Pattern(&'static str),
    CustomScheme(String),
}

/// Allowed-origin policy.
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    exact: Vec<String>,
    allow_any: bool,
}

impl OriginPolicy {
    /// Build from the configured list. A `*` entry allows every origin
    /// only when `honor_wildcard` is set; otherwise it is dropped.
    pub fn new(origins: &[String], honor_wildcard: bool) -> Self {
        let mut policy = Self::default();
        for origin in origins {
            if origin == "*" {
                if honor_wildcard {
                    policy.allow_any = true;
                } else {
                    tracing::warn!("Ignoring '*' in CORS_ALLOWED_ORIGINS outside debug mode");
                }
            } else {
                policy.exact.push(normalize(origin).to_string());
            }
        }
        policy
    }

    /// First rule admitting `origin`, if any.
    pub fn matches(&self, origin: &str) -> Option<OriginMatch> {
        let origin = normalize(origin);

        if self.exact.iter().any(|allowed| allowed.eq_ignore_ascii_case(origin)) {
            return Some(OriginMatch::Exact);
        }
        if self.allow_any {
            return Some(OriginMatch::Wildcard);
        }

        let lowered = origin.to_ascii_lowercase();
        if let Some((name, _)) = PATTERNS.iter().find(|(_, re)| re.is_match(&lowered)) {
            return Some(OriginMatch::Pattern(*name));
        }

        SCHEME
            .captures(&lowered)
            .map(|c| c[1].to_string())
            .filter(|scheme| scheme != "http" && scheme != "https")
            .map(OriginMatch::CustomScheme)
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.matches(origin).is_some()
    }

    /// CORS layer enforcing this policy with credentials enabled.
    ///
    /// The matching request origin is echoed back, never a literal `*`.
    pub fn into_layer(self) -> CorsLayer {
        let policy = Arc::new(self);
        CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(
                move |origin: &HeaderValue, _parts: &Parts| {
                    origin.to_str().map(|o| policy.allows(o)).unwrap_or(false)
                },
            ))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                CONTENT_TYPE,
                AUTHORIZATION,
                ACCEPT,
                HeaderName::from_static("x-requested-with"),
            ])
            .allow_credentials(true)
            .max_age(MAX_AGE)
    }
}

fn normalize(origin: &str) -> &str {
    origin.trim().trim_end_matches('/')
}
