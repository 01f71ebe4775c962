//! App Proxy signature computation and verification.
//!
//! Two schemes are in circulation:
//!
//! - `sha256`: HMAC-SHA256 over the canonical string, keyed by the shared secret.
//! - `md5`: plain MD5 over `secret || canonical string` (legacy).
//!
//! Verification checks the configured primary scheme and then the other one,
//! so callers signing with either scheme are accepted. Which one matched is
//! not reported.

use core::fmt;
use core::str::FromStr;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use super::error::ProxyAuthError;
use super::params::{ProxyParams, SIGNATURE_PARAM};

type HmacSha256 = Hmac<Sha256>;

/// Digest scheme used to sign proxied requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SignatureMode {
    /// HMAC-SHA256 keyed by the shared secret.
    #[default]
    Sha256,
    /// MD5 of the secret followed by the message.
    Md5,
}

/// Error returned when parsing an unknown [`SignatureMode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown signature mode '{0}' (expected 'sha256' or 'md5')")]
pub struct UnknownSignatureMode(pub String);

impl SignatureMode {
    /// The scheme tried when this one does not match.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Sha256 => Self::Md5,
            Self::Md5 => Self::Sha256,
        }
    }

    /// Lowercase name as used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Md5 => "md5",
        }
    }
}

impl FromStr for SignatureMode {
    type Err = UnknownSignatureMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" => Ok(Self::Sha256),
            "md5" => Ok(Self::Md5),
            _ => Err(UnknownSignatureMode(s.to_owned())),
        }
    }
}

impl fmt::Display for SignatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the raw digest of `message` under `mode`.
///
/// Both schemes share this entry point so primary and fallback checks go
/// through the same code.
#[must_use]
pub fn compute_digest(mode: SignatureMode, secret: &[u8], message: &[u8]) -> Vec<u8> {
    match mode {
        SignatureMode::Sha256 => {
            // HMAC takes keys of any length, so this never yields the empty digest.
            HmacSha256::new_from_slice(secret).map_or_else(
                |_| Vec::new(),
                |mut mac| {
                    mac.update(message);
                    mac.finalize().into_bytes().to_vec()
                },
            )
        }
        SignatureMode::Md5 => {
            let mut input = Vec::with_capacity(secret.len() + message.len());
            input.extend_from_slice(secret);
            input.extend_from_slice(message);
            md5::compute(&input).0.to_vec()
        }
    }
}

/// Signs and verifies App Proxy parameter sets with a shared secret.
///
/// Implements `Debug` manually to redact the secret.
#[derive(Clone)]
pub struct ProxySigner {
    secret: SecretString,
    primary: SignatureMode,
}

impl fmt::Debug for ProxySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxySigner")
            .field("secret", &"[REDACTED]")
            .field("primary", &self.primary)
            .finish()
    }
}

impl ProxySigner {
    /// Create a signer for `secret` that checks `primary` first.
    #[must_use]
    pub const fn new(secret: SecretString, primary: SignatureMode) -> Self {
        Self { secret, primary }
    }

    /// The scheme checked first.
    #[must_use]
    pub const fn primary(&self) -> SignatureMode {
        self.primary
    }

    /// Lowercase hex signature of `params` under the primary scheme.
    #[must_use]
    pub fn sign(&self, params: &ProxyParams) -> String {
        self.sign_with(self.primary, params)
    }

    /// Lowercase hex signature of `params` under `mode`.
    ///
    /// Any `signature` already present in `params` is ignored.
    #[must_use]
    pub fn sign_with(&self, mode: SignatureMode, params: &ProxyParams) -> String {
        hex::encode(self.digest(mode, &params.canonical_string()))
    }

    /// Return `params` with its `signature` set for the primary scheme.
    #[must_use]
    pub fn attach_signature(&self, mut params: ProxyParams) -> ProxyParams {
        let signature = self.sign(&params);
        params.insert(SIGNATURE_PARAM, signature);
        params
    }

    /// Check the `signature` parameter against the rest of `params`.
    ///
    /// The supplied signature is hex and compared case-insensitively. Both
    /// digests are always computed and compared in constant time, so the
    /// response time does not depend on which scheme (if any) matched.
    ///
    /// # Errors
    ///
    /// - [`ProxyAuthError::MissingSignature`] if `signature` is absent or empty.
    /// - [`ProxyAuthError::InvalidSignature`] if it matches neither scheme.
    pub fn verify(&self, params: &ProxyParams) -> Result<(), ProxyAuthError> {
        let supplied = params
            .get(SIGNATURE_PARAM)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ProxyAuthError::MissingSignature)?;

        // Non-hex input decodes to nothing and then fails both comparisons.
        let supplied = hex::decode(supplied).unwrap_or_default();

        let canonical = params.canonical_string();
        let primary = self.digest(self.primary, &canonical);
        let fallback = self.digest(self.primary.other(), &canonical);

        let matched = primary.ct_eq(&supplied) | fallback.ct_eq(&supplied);
        if supplied.is_empty() || !bool::from(matched) {
            return Err(ProxyAuthError::InvalidSignature);
        }
        Ok(())
    }

    fn digest(&self, mode: SignatureMode, canonical: &str) -> Vec<u8> {
        compute_digest(
            mode,
            self.secret.expose_secret().as_bytes(),
            canonical.as_bytes(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "topsecret";
    const CANONICAL: &str = "logged_in_customer_id=7shop=a.myshopify.com";
    const HMAC_SHA256_HEX: &str =
        "64f3262611d97b6a8515d4299df760a4d657b1e25f0067e12af231085e680912";
    const MD5_HEX: &str = "bb8b540f2a90d5046a390e55a40d3272";

    fn signer(mode: SignatureMode) -> ProxySigner {
        ProxySigner::new(SecretString::from(SECRET), mode)
    }

    fn params() -> ProxyParams {
        [("shop", "a.myshopify.com"), ("logged_in_customer_id", "7")]
            .into_iter()
            .collect()
    }

    fn signed(signature: &str) -> ProxyParams {
        let mut p = params();
        p.insert(SIGNATURE_PARAM, signature);
        p
    }

    /// Replace the character at `idx` with a different hex digit.
    fn flip(hex: &str, idx: usize) -> String {
        hex.char_indices()
            .map(|(i, c)| {
                if i == idx {
                    if c == '0' { '1' } else { '0' }
                } else {
                    c
                }
            })
            .collect()
    }

    #[test]
    fn test_known_digests() {
        assert_eq!(params().canonical_string(), CANONICAL);
        assert_eq!(
            hex::encode(compute_digest(
                SignatureMode::Sha256,
                SECRET.as_bytes(),
                CANONICAL.as_bytes()
            )),
            HMAC_SHA256_HEX
        );
        assert_eq!(
            hex::encode(compute_digest(
                SignatureMode::Md5,
                SECRET.as_bytes(),
                CANONICAL.as_bytes()
            )),
            MD5_HEX
        );
    }

    #[test]
    fn test_sign_uses_primary_mode() {
        assert_eq!(signer(SignatureMode::Sha256).sign(&params()), HMAC_SHA256_HEX);
        assert_eq!(signer(SignatureMode::Md5).sign(&params()), MD5_HEX);
    }

    #[test]
    fn test_sign_ignores_existing_signature() {
        let s = signer(SignatureMode::Sha256);
        assert_eq!(s.sign(&signed("whatever")), HMAC_SHA256_HEX);
    }

    #[test]
    fn test_attach_signature_verifies() {
        for mode in [SignatureMode::Sha256, SignatureMode::Md5] {
            let s = signer(mode);
            let attached = s.attach_signature(params());
            assert_eq!(attached.get(SIGNATURE_PARAM), Some(s.sign(&params()).as_str()));
            assert_eq!(s.verify(&attached), Ok(()));
        }
    }

    #[test]
    fn test_verify_primary_sha256() {
        assert_eq!(
            signer(SignatureMode::Sha256).verify(&signed(HMAC_SHA256_HEX)),
            Ok(())
        );
    }

    #[test]
    fn test_verify_is_case_insensitive() {
        let upper = HMAC_SHA256_HEX.to_ascii_uppercase();
        assert_eq!(signer(SignatureMode::Sha256).verify(&signed(&upper)), Ok(()));
    }

    #[test]
    fn test_verify_rejects_every_single_character_flip() {
        let s = signer(SignatureMode::Sha256);
        for idx in 0..HMAC_SHA256_HEX.len() {
            let tampered = flip(HMAC_SHA256_HEX, idx);
            assert_eq!(
                s.verify(&signed(&tampered)),
                Err(ProxyAuthError::InvalidSignature),
                "flip at {idx} should fail"
            );
        }
    }

    #[test]
    fn test_verify_md5_fallback_under_sha256_primary() {
        assert_eq!(signer(SignatureMode::Sha256).verify(&signed(MD5_HEX)), Ok(()));
    }

    #[test]
    fn test_verify_sha256_fallback_under_md5_primary() {
        let s = signer(SignatureMode::Md5);
        assert_eq!(s.verify(&signed(MD5_HEX)), Ok(()));
        assert_eq!(s.verify(&signed(HMAC_SHA256_HEX)), Ok(()));
    }

    #[test]
    fn test_verify_rejects_tampered_value() {
        let s = signer(SignatureMode::Sha256);
        let mut p = signed(HMAC_SHA256_HEX);
        p.insert("logged_in_customer_id", "8");
        assert_eq!(s.verify(&p), Err(ProxyAuthError::InvalidSignature));

        let mut p = signed(MD5_HEX);
        p.insert("shop", "b.myshopify.com");
        assert_eq!(s.verify(&p), Err(ProxyAuthError::InvalidSignature));
    }

    #[test]
    fn test_verify_rejects_added_parameter() {
        let s = signer(SignatureMode::Sha256);
        let mut p = signed(HMAC_SHA256_HEX);
        p.insert("path_prefix", "/apps/wishlist");
        assert_eq!(s.verify(&p), Err(ProxyAuthError::InvalidSignature));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let other = ProxySigner::new(SecretString::from("othersecret"), SignatureMode::Sha256);
        assert_eq!(
            other.verify(&signed(HMAC_SHA256_HEX)),
            Err(ProxyAuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_verify_missing_signature() {
        let s = signer(SignatureMode::Sha256);
        assert_eq!(s.verify(&params()), Err(ProxyAuthError::MissingSignature));
        assert_eq!(s.verify(&signed("")), Err(ProxyAuthError::MissingSignature));
    }

    #[test]
    fn test_verify_rejects_non_hex_and_truncated() {
        let s = signer(SignatureMode::Sha256);
        assert_eq!(
            s.verify(&signed("not-hex-at-all")),
            Err(ProxyAuthError::InvalidSignature)
        );
        assert_eq!(
            s.verify(&signed(&HMAC_SHA256_HEX[..32])),
            Err(ProxyAuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_verify_with_multi_valued_params() {
        let s = signer(SignatureMode::Sha256);
        let query = "extra=1&shop=a.myshopify.com&logged_in_customer_id=7&extra=2\
                     &path_prefix=%2Fapps%2Fwishlist&timestamp=1700000000\
                     &signature=c794acb32a9d946d4919901786dbcf246476c2193b99fb624fcc512c636eb740";
        assert_eq!(s.verify(&ProxyParams::from_query(query)), Ok(()));
    }

    #[test]
    fn test_signature_mode_parsing() {
        assert_eq!("sha256".parse::<SignatureMode>(), Ok(SignatureMode::Sha256));
        assert_eq!(" MD5 ".parse::<SignatureMode>(), Ok(SignatureMode::Md5));
        assert!("sha1".parse::<SignatureMode>().is_err());
        assert_eq!(SignatureMode::default(), SignatureMode::Sha256);
    }

    #[test]
    fn test_signature_mode_other_is_symmetric() {
        for mode in [SignatureMode::Sha256, SignatureMode::Md5] {
            assert_ne!(mode.other(), mode);
            assert_eq!(mode.other().other(), mode);
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let output = format!("{:?}", signer(SignatureMode::Sha256));
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains(SECRET));
    }
}
