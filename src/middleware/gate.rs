//! Per-request session presence check.
//!
//! The gate only looks for a non-empty `app_session` cookie. It never decodes
//! or re-verifies the value: the cookie is http-only and only ever set by the
//! verified `/sso` flow.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::HOST;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use super::config::{SsoConfig, SsoSettings};
use super::cookies;

/// Wrap `router` so that every route except the SSO entry point and static
/// assets requires a session cookie.
///
/// Unauthenticated requests are redirected to
/// `<hub>/sso?redirect=<percent-encoded original URL>`.
pub fn protect(router: Router, config: &SsoConfig) -> Router {
    let settings = Arc::new(config.settings.clone());
    router.layer(from_fn_with_state(settings, access_gate))
}

async fn access_gate(
    State(settings): State<Arc<SsoSettings>>,
    request: Request,
    next: Next,
) -> Response {
    if settings.is_public(request.uri().path()) {
        return next.run(request).await;
    }

    let jar = CookieJar::from_headers(request.headers());
    if cookies::has_session(&jar) {
        return next.run(request).await;
    }

    let original = original_url(&request);
    tracing::debug!(url = %original, "No session cookie; redirecting to identity hub");
    Redirect::temporary(&hub_login_url(&settings.hub_base_url, &original)).into_response()
}

/// `<hub>/sso?redirect=<encoded original>`.
pub(crate) fn hub_login_url(hub_base_url: &str, original_url: &str) -> String {
    format!(
        "{}/sso?redirect={}",
        hub_base_url.trim_end_matches('/'),
        urlencoding::encode(original_url)
    )
}

/// Absolute URL of the incoming request, as the browser addressed it.
fn original_url(request: &Request) -> String {
    let uri = request.uri();
    if uri.scheme().is_some() && uri.authority().is_some() {
        return uri.to_string();
    }

    let headers = request.headers();
    let host = header_str(headers, "x-forwarded-host")
        .or_else(|| header_str(headers, HOST.as_str()))
        .unwrap_or("localhost");
    let proto = header_str(headers, "x-forwarded-proto").unwrap_or("http");
    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());

    format!("{proto}://{host}{path_and_query}")
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
