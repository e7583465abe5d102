//! VAPID (RFC 8292) credentials.
//!
//! The server signs every push with a P-256 key pair. The public key is also handed to
//! browsers as the `applicationServerKey`, so both halves must be present and well formed
//! before any push is attempted.

use crate::config::VapidConfig;
use base64::alphabet::URL_SAFE;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD as BASE64URL};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use p256::ecdsa::SigningKey;
use p256::elliptic_curve::rand_core::OsRng;
use thiserror::Error;

/// Base64url that accepts input with or without `=` padding, as keys are pasted both ways.
pub const BASE64URL_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new().with_encode_padding(false).with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub const MISSING_VAPID_MESSAGE: &str =
    "Missing VAPID env vars. Add VAPID_PUBLIC_KEY, VAPID_PRIVATE_KEY, and VAPID_SUBJECT.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VapidError {
    #[error("Missing VAPID env vars. Add VAPID_PUBLIC_KEY, VAPID_PRIVATE_KEY, and VAPID_SUBJECT.")]
    Missing,
    #[error("Invalid VAPID_PUBLIC_KEY: {0}")]
    InvalidPublicKey(String),
    #[error("Invalid VAPID_PRIVATE_KEY: {0}")]
    InvalidPrivateKey(String),
    #[error("Invalid VAPID_SUBJECT: expected a mailto: or https: URI")]
    InvalidSubject,
}

/// A fully validated VAPID configuration. There is no way to build a partial one.
#[derive(Clone, PartialEq, Eq)]
pub struct VapidCredentials {
    public_key: String,
    private_key: String,
    subject: String,
}

impl std::fmt::Debug for VapidCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VapidCredentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("subject", &self.subject)
            .finish()
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl VapidCredentials {
    /// Resolves credentials from raw configuration, failing closed.
    ///
    /// # Errors
    /// Returns `VapidError::Missing` if any of the three values is absent or blank, and a
    /// specific variant if a value is present but malformed.
    pub fn resolve(config: &VapidConfig) -> Result<Self, VapidError> {
        let (Some(public_key), Some(private_key), Some(subject)) = (
            present(config.public_key.as_ref()),
            present(config.private_key.as_ref()),
            present(config.subject.as_ref()),
        ) else {
            return Err(VapidError::Missing);
        };

        let pub_bytes =
            BASE64URL_LENIENT.decode(public_key).map_err(|e| VapidError::InvalidPublicKey(e.to_string()))?;
        if pub_bytes.len() != 65 || pub_bytes[0] != 0x04 {
            return Err(VapidError::InvalidPublicKey("expected a 65-byte uncompressed P-256 point".into()));
        }

        let priv_bytes =
            BASE64URL_LENIENT.decode(private_key).map_err(|e| VapidError::InvalidPrivateKey(e.to_string()))?;
        if priv_bytes.len() != 32 {
            return Err(VapidError::InvalidPrivateKey(format!(
                "expected a 32-byte P-256 scalar, got {} bytes",
                priv_bytes.len()
            )));
        }
        let signing_key = SigningKey::from_slice(&priv_bytes)
            .map_err(|_| VapidError::InvalidPrivateKey("not a valid P-256 scalar".into()))?;
        if signing_key.verifying_key().to_encoded_point(false).as_bytes() != pub_bytes.as_slice() {
            return Err(VapidError::InvalidPublicKey("does not match VAPID_PRIVATE_KEY".into()));
        }

        if !(subject.starts_with("mailto:") || subject.starts_with("https:")) {
            return Err(VapidError::InvalidSubject);
        }

        // Re-encode so the signer always sees unpadded base64url.
        Ok(Self {
            public_key: BASE64URL.encode(&pub_bytes),
            private_key: BASE64URL.encode(&priv_bytes),
            subject: subject.to_string(),
        })
    }

    #[must_use]
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    #[must_use]
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

/// A freshly generated VAPID key pair in the base64url encodings the server expects.
#[derive(Debug)]
pub struct GeneratedKeys {
    pub public_key: String,
    pub private_key: String,
}

/// Generates a new P-256 key pair: the uncompressed public point and the raw private scalar.
#[must_use]
pub fn generate_keys() -> GeneratedKeys {
    let signing_key = SigningKey::random(&mut OsRng);
    let public_point = signing_key.verifying_key().to_encoded_point(false);

    GeneratedKeys {
        public_key: BASE64URL.encode(public_point.as_bytes()),
        private_key: BASE64URL.encode(signing_key.to_bytes().as_slice()),
    }
}
