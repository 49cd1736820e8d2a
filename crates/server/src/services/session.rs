//! Signed admin session cookie.
//!
//! There is no server-side session store: the cookie itself carries the
//! serialized [`CurrentAdmin`] identity, signed with HMAC-SHA256 so a client
//! cannot forge or alter it. Token format:
//!
//! ```text
//! base64url(json(identity)) "." hex(hmac_sha256(secret, base64url_payload))
//! ```
//!
//! Absence, a bad signature, or an undecodable payload all read as "not
//! logged in"; logout just overwrites the cookie with an expired one.

use axum::http::{HeaderMap, header};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::models::CurrentAdmin;

type HmacSha256 = Hmac<Sha256>;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "hondana_admin_session";

/// Session cookie lifetime (7 days).
const SESSION_MAX_AGE_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Encoder/decoder for the signed session cookie.
#[derive(Clone)]
pub struct SessionCodec {
    secret: SecretString,
    secure: bool,
}

impl SessionCodec {
    /// Create a codec signing with `secret`.
    ///
    /// `secure` adds the `Secure` attribute to issued cookies (HTTPS
    /// deployments).
    #[must_use]
    pub const fn new(secret: SecretString, secure: bool) -> Self {
        Self { secret, secure }
    }

    fn keyed_mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length, so this cannot fail.
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any length")
    }

    /// Serialize and sign an identity into a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity cannot be serialized.
    pub fn encode(&self, admin: &CurrentAdmin) -> Result<String, serde_json::Error> {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(admin)?);
        let mut mac = self.keyed_mac();
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    /// Verify and deserialize a token.
    ///
    /// Returns `None` for any malformed, tampered, or foreign token; the
    /// signature check is constant-time.
    #[must_use]
    pub fn decode(&self, token: &str) -> Option<CurrentAdmin> {
        let (payload, signature_hex) = token.split_once('.')?;
        let signature = hex::decode(signature_hex).ok()?;

        let mut mac = self.keyed_mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Build the `Set-Cookie` value logging an admin in.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity cannot be serialized.
    pub fn issue_cookie(&self, admin: &CurrentAdmin) -> Result<String, serde_json::Error> {
        let token = self.encode(admin)?;
        Ok(format!(
            "{SESSION_COOKIE_NAME}={token}; Max-Age={SESSION_MAX_AGE_SECONDS}; Path=/; HttpOnly; SameSite=Lax{}",
            self.secure_attribute()
        ))
    }

    /// Build the `Set-Cookie` value logging the admin out.
    #[must_use]
    pub fn clear_cookie(&self) -> String {
        format!(
            "{SESSION_COOKIE_NAME}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax{}",
            self.secure_attribute()
        )
    }

    /// Read and verify the session from request headers.
    #[must_use]
    pub fn read_from_headers(&self, headers: &HeaderMap) -> Option<CurrentAdmin> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE_NAME)
            .and_then(|(_, token)| self.decode(token))
    }

    const fn secure_attribute(&self) -> &'static str {
        if self.secure { "; Secure" } else { "" }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn codec() -> SessionCodec {
        SessionCodec::new(SecretString::from("0123456789abcdef0123456789abcdef"), false)
    }

    #[test]
    fn test_roundtrip() {
        let codec = codec();
        let admin = CurrentAdmin::shared();
        let token = codec.encode(&admin).unwrap();
        assert_eq!(codec.decode(&token), Some(admin));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let codec = codec();
        let token = codec.encode(&CurrentAdmin::shared()).unwrap();
        let (payload, signature) = token.split_once('.').unwrap();

        let mut forged = CurrentAdmin::shared();
        forged.id = "admin-2".to_string();
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
        assert_ne!(forged_payload, payload);

        let tampered = format!("{forged_payload}.{signature}");
        assert_eq!(codec.decode(&tampered), None);
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let codec = codec();
        let token = codec.encode(&CurrentAdmin::shared()).unwrap();
        let (payload, _) = token.split_once('.').unwrap();
        let tampered = format!("{payload}.{}", "0".repeat(64));
        assert_eq!(codec.decode(&tampered), None);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let codec = codec();
        let other = SessionCodec::new(
            SecretString::from("fedcba9876543210fedcba9876543210"),
            false,
        );
        let token = codec.encode(&CurrentAdmin::shared()).unwrap();
        assert_eq!(other.decode(&token), None);
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let codec = codec();
        assert_eq!(codec.decode(""), None);
        assert_eq!(codec.decode("no-separator"), None);
        assert_eq!(codec.decode("payload.not-hex"), None);
        assert_eq!(codec.decode(".deadbeef"), None);
    }

    #[test]
    fn test_read_from_headers() {
        let codec = codec();
        let token = codec.encode(&CurrentAdmin::shared()).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            format!("other=1; {SESSION_COOKIE_NAME}={token}; theme=dark")
                .parse()
                .unwrap(),
        );
        assert_eq!(codec.read_from_headers(&headers), Some(CurrentAdmin::shared()));

        let empty = HeaderMap::new();
        assert_eq!(codec.read_from_headers(&empty), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let codec = codec();
        let cookie = codec.issue_cookie(&CurrentAdmin::shared()).unwrap();
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE_NAME}=")));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));

        let secure_codec =
            SessionCodec::new(SecretString::from("0123456789abcdef0123456789abcdef"), true);
        let cookie = secure_codec.issue_cookie(&CurrentAdmin::shared()).unwrap();
        assert!(cookie.ends_with("; Secure"));

        let cleared = codec.clear_cookie();
        assert!(cleared.contains("Max-Age=0"));
    }
}
