//! Session payload minted from a verified SSO token.

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::codec;
use crate::sso::SsoTokenPayload;

/// Trusted identity stored in the `app_session` cookie.
///
/// Only built from a payload whose signature already verified and whose
/// `email` is non-empty. Serializes as `{"email":..,"name":..,"exp":..}` with
/// absent values written as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    email: String,
    name: Option<String>,
    exp: Option<i64>,
}

impl SessionPayload {
    pub(crate) fn from_verified(payload: SsoTokenPayload) -> Option<Self> {
        let email = payload.email.filter(|email| !email.is_empty())?;
        Some(Self {
            email,
            name: payload.name,
            exp: payload.exp,
        })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn exp(&self) -> Option<i64> {
        self.exp
    }

    /// Encode as a cookie value: base64url of the JSON form.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if JSON encoding fails.
    pub fn to_cookie_value(&self) -> Result<String, serde_json::Error> {
        Ok(codec::encode(serde_json::to_vec(self)?))
    }

    /// Decode a cookie value for display purposes.
    ///
    /// This does not authenticate anything; the cookie carries no signature.
    #[must_use]
    pub fn from_cookie_value(value: &str) -> Option<Self> {
        let bytes = codec::decode(value).ok()?;
        let session: Self = serde_json::from_slice(&bytes).ok()?;
        (!session.email.is_empty()).then_some(session)
    }

    /// Cookie lifetime for this session at Unix time `now`.
    #[must_use]
    pub fn max_age(&self, now: i64) -> Option<Duration> {
        max_age(self.exp, now)
    }
}

/// Seconds until `exp`, if `exp` is still in the future.
///
/// `None` means a browser-session cookie. Never returns a zero or negative
/// duration.
#[must_use]
pub fn max_age(exp: Option<i64>, now: i64) -> Option<Duration> {
    exp.and_then(|exp| exp.checked_sub(now))
        .filter(|remaining| *remaining > 0)
        .map(Duration::seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(email: Option<&str>, name: Option<&str>, exp: Option<i64>) -> SsoTokenPayload {
        SsoTokenPayload {
            email: email.map(str::to_string),
            name: name.map(str::to_string),
            exp,
        }
    }

    #[test]
    fn test_requires_email() {
        assert!(SessionPayload::from_verified(payload(None, Some("Ana"), None)).is_none());
        assert!(SessionPayload::from_verified(payload(Some(""), None, None)).is_none());
        assert!(SessionPayload::from_verified(payload(Some("a@b.com"), None, None)).is_some());
    }

    #[test]
    fn test_cookie_value_json_shape() {
        let session = SessionPayload::from_verified(payload(Some("a@b.com"), None, None)).unwrap();
        let value = session.to_cookie_value().unwrap();
        let json = String::from_utf8(codec::decode(&value).unwrap()).unwrap();
        assert_eq!(json, r#"{"email":"a@b.com","name":null,"exp":null}"#);

        let session = SessionPayload::from_verified(payload(
            Some("a@b.com"),
            Some("Ana"),
            Some(1_700_000_000),
        ))
        .unwrap();
        let value = session.to_cookie_value().unwrap();
        let json = String::from_utf8(codec::decode(&value).unwrap()).unwrap();
        assert_eq!(json, r#"{"email":"a@b.com","name":"Ana","exp":1700000000}"#);
    }

    #[test]
    fn test_cookie_value_is_url_safe() {
        let session =
            SessionPayload::from_verified(payload(Some("ñandú+?/@b.com"), Some("Ñ"), None))
                .unwrap();
        let value = session.to_cookie_value().unwrap();
        assert!(!value.contains(['+', '/', '=']));
    }

    #[test]
    fn test_from_cookie_value() {
        let session = SessionPayload::from_verified(payload(
            Some("a@b.com"),
            Some("Ana"),
            Some(42),
        ))
        .unwrap();
        let value = session.to_cookie_value().unwrap();
        assert_eq!(SessionPayload::from_cookie_value(&value), Some(session));

        assert!(SessionPayload::from_cookie_value("garbage!").is_none());
        assert!(SessionPayload::from_cookie_value(&codec::encode("{}")).is_none());
        assert!(
            SessionPayload::from_cookie_value(&codec::encode(
                r#"{"email":"","name":null,"exp":null}"#
            ))
            .is_none()
        );
    }

    #[test]
    fn test_max_age_future_exp() {
        assert_eq!(max_age(Some(1_000), 400), Some(Duration::seconds(600)));
        assert_eq!(max_age(Some(401), 400), Some(Duration::seconds(1)));
    }

    #[test]
    fn test_max_age_never_zero_or_negative() {
        assert_eq!(max_age(Some(400), 400), None);
        assert_eq!(max_age(Some(1), 400), None);
        assert_eq!(max_age(Some(i64::MIN), 400), None);
        assert_eq!(max_age(None, 400), None);
    }

    #[test]
    fn test_max_age_overflow_guarded() {
        assert_eq!(max_age(Some(i64::MAX), -10), None);
    }
}
