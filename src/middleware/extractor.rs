use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;

use super::cookies;
use crate::session::SessionPayload;

/// Signed-in user decoded from the session cookie.
///
/// For display only: the cookie is trusted because the gate let the request
/// through, not because this extractor checked anything. Rejects with
/// `401 Unauthorized` when the cookie is missing or not decodable.
///
/// # Example
///
/// ```rust,ignore
/// async fn whoami(SessionUser(session): SessionUser) -> String {
///     format!("Signed in as {}", session.email())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionUser(pub SessionPayload);

/// No readable session cookie on the request.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("Not authenticated")]
pub struct NoSession;

impl IntoResponse for NoSession {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SessionUser {
    type Rejection = NoSession;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        cookies::session_value(&jar)
            .and_then(|value| SessionPayload::from_cookie_value(&value))
            .map(SessionUser)
            .ok_or(NoSession)
    }
}
