use std::sync::Arc;

use axum::Router;
use axum::extract::{RawQuery, State};
use axum::response::Redirect;
use axum::routing::get;
use axum_extra::extract::CookieJar;

use super::config::SsoConfig;
use super::cookies;
use super::state::SsoState;
use crate::sso;

/// Create the SSO router: `GET /sso` and `GET|POST /logout`.
pub fn sso_routes(config: SsoConfig) -> Router {
    let sso_path = config.settings.sso_path.clone();

    let state = SsoState {
        secret: config.secret,
        settings: Arc::new(config.settings),
    };

    Router::new()
        .route(&sso_path, get(redeem_token))
        .route("/logout", get(logout).post(logout))
        .with_state(state)
}

// ── SSO ────────────────────────────────────────────────────────────

async fn redeem_token(
    State(state): State<SsoState>,
    jar: CookieJar,
    RawQuery(query): RawQuery,
) -> (CookieJar, Redirect) {
    let home = Redirect::temporary(&state.settings.login_redirect);
    let token = query.as_deref().and_then(token_param);

    let session = match sso::redeem(token.as_deref(), state.secret.as_ref()) {
        Ok(session) => session,
        Err(_) => {
            tracing::warn!("SSO token rejected");
            return (jar, home);
        }
    };

    match cookies::session_cookie(&session, state.settings.secure_cookies) {
        Ok(cookie) => {
            tracing::info!(
                email = %session.email(),
                persistent = cookie.max_age().is_some(),
                "SSO login successful"
            );
            (jar.add(cookie), home)
        }
        Err(e) => {
            tracing::error!(error = %e, "Session cookie encoding failed");
            (jar, home)
        }
    }
}

/// First `token` query parameter, percent-decoded.
fn token_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
}

// ── Logout ─────────────────────────────────────────────────────────

async fn logout(State(state): State<SsoState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if cookies::has_session(&jar) {
        tracing::info!("Session cleared");
    }
    (
        jar.remove(cookies::clear_session_cookie()),
        Redirect::temporary(&state.settings.login_redirect),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_param() {
        assert_eq!(token_param("token=abc.def").as_deref(), Some("abc.def"));
        assert_eq!(
            token_param("x=1&token=a%2Db.c&token=zzz").as_deref(),
            Some("a-b.c")
        );
        assert_eq!(token_param("x=1"), None);
        assert_eq!(token_param("token=").as_deref(), Some(""));
    }
}
