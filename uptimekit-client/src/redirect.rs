//! Same-origin redirect handling.
//!
//! The transport is built with redirects disabled so the executor can follow
//! them itself and re-apply the credential and default headers on every hop.
//! Only redirects that keep scheme, host and port are followed.

use reqwest::header::{HeaderMap, LOCATION};
use reqwest::{Method, StatusCode};
use url::Url;

/// Maximum redirect hops followed within one attempt.
pub(crate) const MAX_REDIRECTS: usize = 10;

/// Returns true for statuses that carry a `Location` to follow.
pub(crate) fn is_redirect_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// Resolves the `Location` header against the current URL.
pub(crate) fn redirect_target(current: &Url, headers: &HeaderMap) -> Option<Url> {
    let location = headers.get(LOCATION)?.to_str().ok()?.trim();
    if location.is_empty() {
        return None;
    }
    current.join(location).ok()
}

/// Returns true if both URLs share scheme, host and port.
pub(crate) fn same_origin(left: &Url, right: &Url) -> bool {
    left.scheme() == right.scheme()
        && left.host_str().map(str::to_ascii_lowercase) == right.host_str().map(str::to_ascii_lowercase)
        && left.port_or_known_default() == right.port_or_known_default()
}

/// Method for the next hop, and whether the body is resent.
///
/// 303 always becomes a bodiless GET; 301 and 302 do the same for POST, as
/// browsers and most clients do. 307 and 308 preserve both.
pub(crate) fn next_hop(method: &Method, status: StatusCode) -> (Method, bool) {
    match status {
        StatusCode::SEE_OTHER if *method != Method::HEAD => (Method::GET, false),
        StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND if *method == Method::POST => {
            (Method::GET, false)
        }
        _ => (method.clone(), true),
    }
}
