//! Same-origin proxy locators
//!
//! Remote audio hosts do not grant the permissions needed for signal analysis, so the
//! transport is pointed at the server's relay instead of the upstream locator.

use url::form_urlencoded;

/// Path of the relay endpoint on the Cadence server
pub const PROXY_PATH: &str = "/api/proxy";

/// Build the relay locator for an upstream audio locator
///
/// `proxy_base` is the server origin (e.g. `http://localhost:8080`); an empty base yields a
/// relative locator.
pub fn proxied_locator(proxy_base: &str, upstream: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("url", upstream)
        .finish();
    format!("{}{}?{}", proxy_base.trim_end_matches('/'), PROXY_PATH, query)
}
