use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};

use crate::session::SessionPayload;

/// Name of the session cookie set by `/sso`.
pub const SESSION_COOKIE_NAME: &str = "app_session";

/// Create the session cookie for a redeemed SSO token.
///
/// `Max-Age` is only set while the token's `exp` is in the future; otherwise
/// the browser keeps the cookie for its own session.
///
/// # Errors
///
/// Returns the serializer error if the payload cannot be encoded.
pub(super) fn session_cookie(
    session: &SessionPayload,
    secure: bool,
) -> Result<Cookie<'static>, serde_json::Error> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    Ok(build_session_cookie(
        session.to_cookie_value()?,
        session.max_age(now),
        secure,
    ))
}

fn build_session_cookie(value: String, max_age: Option<Duration>, secure: bool) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE_NAME, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/");
    if let Some(max_age) = max_age {
        builder = builder.max_age(max_age);
    }
    builder.build()
}

/// Create removal cookie for session.
pub(super) fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

/// Whether the jar holds a non-empty session cookie. Does not decode it.
pub(super) fn has_session(jar: &CookieJar) -> bool {
    jar.get(SESSION_COOKIE_NAME)
        .is_some_and(|cookie| !cookie.value().is_empty())
}

/// Get the raw session cookie value.
pub(super) fn session_value(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}
