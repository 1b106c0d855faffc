use axum::http::{header, HeaderMap};
use time::Duration;

use crate::config::CookieConfig;

const EPOCH: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Value of the first cookie named `name` across all `Cookie` headers.
/// An empty first value means no credential; later duplicates are not consulted.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(cfg: &CookieConfig, token: &str, max_age: Duration) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly{}",
        cfg.name,
        token,
        max_age.whole_seconds(),
        site_attributes(cfg)
    )
}

pub fn expired_cookie(cfg: &CookieConfig) -> String {
    format!(
        "{}=; Path=/; Max-Age=0; Expires={}; HttpOnly{}",
        cfg.name,
        EPOCH,
        site_attributes(cfg)
    )
}

// Cross-site delivery requires Secure alongside SameSite=None.
fn site_attributes(cfg: &CookieConfig) -> &'static str {
    if cfg.secure {
        "; Secure; SameSite=None"
    } else {
        "; SameSite=Lax"
    }
}
