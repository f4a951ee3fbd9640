//! Verification of identity hub SSO tokens.
//!
//! Wire format: `base64url(json payload) "." base64url(hmac-sha256 tag)`, where
//! the tag covers the encoded payload segment text. Every failure collapses to
//! "no payload"; the reason is only ever written to debug logs.

use serde::{Deserialize, Deserializer};

use crate::codec;
use crate::session::SessionPayload;
use crate::signature::SsoSecret;

/// Claims carried by an SSO token. Untrusted until [`verify_token`] returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SsoTokenPayload {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Expiry in Unix seconds. Non-numeric values are treated as absent.
    #[serde(default, deserialize_with = "deserialize_exp")]
    pub exp: Option<i64>,
}

/// The token did not produce a session.
///
/// Deliberately carries no reason: callers get one outcome for every failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("SSO token rejected")]
pub struct Rejected;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
enum Reason {
    #[error("token missing or malformed")]
    MalformedToken,
    #[error("signature mismatch")]
    SignatureMismatch,
    #[error("no SSO secret configured")]
    MissingSecret,
    #[error("payload is not valid JSON")]
    MalformedPayload,
    #[error("payload has no email")]
    MissingEmail,
}

/// Verify `token` against `secret` and parse its payload.
///
/// Returns `None` for a wrong segment count, empty segments, invalid
/// base64url, a bad signature, or a payload that is not a JSON object of the
/// expected shape. Never panics.
#[must_use]
pub fn verify_token(token: &str, secret: &SsoSecret) -> Option<SsoTokenPayload> {
    check_token(token, secret)
        .map_err(|reason| tracing::debug!(%reason, "SSO token failed verification"))
        .ok()
}

/// Turn a `/sso` token into a trusted session payload.
///
/// A missing token, missing secret, failed verification, or a payload without
/// a non-empty `email` all yield [`Rejected`].
///
/// # Errors
///
/// Returns [`Rejected`] on any failure.
pub fn redeem(token: Option<&str>, secret: Option<&SsoSecret>) -> Result<SessionPayload, Rejected> {
    redeem_inner(token, secret).map_err(|reason| {
        tracing::debug!(%reason, "SSO redemption rejected");
        Rejected
    })
}

fn redeem_inner(
    token: Option<&str>,
    secret: Option<&SsoSecret>,
) -> Result<SessionPayload, Reason> {
    let token = token
        .filter(|t| !t.is_empty())
        .ok_or(Reason::MalformedToken)?;
    let secret = secret.ok_or(Reason::MissingSecret)?;
    let payload = check_token(token, secret)?;
    SessionPayload::from_verified(payload).ok_or(Reason::MissingEmail)
}

fn check_token(token: &str, secret: &SsoSecret) -> Result<SsoTokenPayload, Reason> {
    let mut parts = token.split('.');
    let (Some(payload_segment), Some(signature_segment), None) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(Reason::MalformedToken);
    };
    if payload_segment.is_empty() || signature_segment.is_empty() {
        return Err(Reason::MalformedToken);
    }

    let payload_bytes = codec::decode(payload_segment).map_err(|_| Reason::MalformedToken)?;
    let signature = codec::decode(signature_segment).map_err(|_| Reason::MalformedToken)?;

    if !secret.verify(payload_segment.as_bytes(), &signature) {
        return Err(Reason::SignatureMismatch);
    }

    serde_json::from_slice(&payload_bytes).map_err(|_| Reason::MalformedPayload)
}

fn deserialize_exp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        v.as_i64()
            .or_else(|| v.as_f64().map(|secs| secs.trunc() as i64))
    }))
}
