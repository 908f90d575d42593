//! HS256 signing, verification and untrusted decoding.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockauth_core::Claims;
use mockauth_security::SecretRegistry;

use crate::{Result, TokenError};

/// The shared HMAC secret, held only as key material.
///
/// Building one registers the raw secret for log redaction first, so no log
/// line written afterwards can carry it.
#[derive(Clone)]
pub struct SigningSecret {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}

impl SigningSecret {
    pub fn new(secret: &str, registry: &SecretRegistry) -> Result<Self> {
        if !registry.register(secret) {
            return Err(TokenError::EmptySecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Sign `claims` into a compact HS256 token.
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Check the signature and expiry of `token` and return its claims.
    ///
    /// `exp` is required and no clock leeway is granted. Audience is not
    /// checked.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

/// Read the claims of `token` without checking its signature or expiry.
///
/// Only the token's structure is validated. The result must never be
/// trusted.
pub fn decode_unverified(token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}
