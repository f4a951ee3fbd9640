//! HMAC-SHA256 signing and constant-time verification of SSO token segments.
//!
//! The hub signs the *encoded* payload segment, so callers pass the segment
//! text exactly as it appeared in the token, before base64url decoding.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::Error;

/// Length in bytes of an HMAC-SHA256 tag.
pub const SIGNATURE_LEN: usize = 32;

/// Shared secret used to verify tokens issued by the identity hub.
///
/// Loaded once at startup and only ever read afterwards. The keyed MAC state
/// is prepared at construction so signing is a clone plus one update.
#[derive(Clone)]
pub struct SsoSecret {
    mac: Hmac<Sha256>,
    key_len: usize,
}

impl SsoSecret {
    /// Create a secret from raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the key is empty. An empty key would make
    /// every signature forgeable by anyone who knows the scheme.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, Error> {
        let key = secret.as_ref();
        if key.is_empty() {
            return Err(Error::Config("SSO secret must not be empty".into()));
        }
        let mac = Hmac::<Sha256>::new_from_slice(key)
            .map_err(|e| Error::Config(format!("SSO secret: {e}")))?;
        Ok(Self {
            mac,
            key_len: key.len(),
        })
    }

    /// Compute the HMAC-SHA256 tag over `payload_segment`.
    #[must_use]
    pub fn sign(&self, payload_segment: &[u8]) -> [u8; SIGNATURE_LEN] {
        let mut mac = self.mac.clone();
        mac.update(payload_segment);
        mac.finalize().into_bytes().into()
    }

    /// Check `provided` against the expected tag for `payload_segment`.
    ///
    /// A length mismatch returns `false` before any byte comparison. Equal
    /// lengths are compared in constant time.
    #[must_use]
    pub fn verify(&self, payload_segment: &[u8], provided: &[u8]) -> bool {
        let expected = self.sign(payload_segment);
        if expected.len() != provided.len() {
            return false;
        }
        expected.as_slice().ct_eq(provided).into()
    }
}

impl std::fmt::Debug for SsoSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsoSecret")
            .field("key_len", &self.key_len)
            .finish_non_exhaustive()
    }
}
