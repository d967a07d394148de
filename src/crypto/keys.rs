//! SSH keypair generation
//!
//! Supported algorithms:
//! - RSA (2048/3072/4096 bits, caller-chosen public exponent)
//! - ECDSA over NIST P-256, P-384 and P-521
//! - Ed25519
//!
//! Private material is held by the underlying crates, which wipe it on drop.

use ed25519_dalek::SigningKey;
use pkcs8::EncodePrivateKey;
use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey};

use super::{ExportedKey, KeyGenParams, NamedCurve, SecureBytes};
use crate::error::{Result, SecureKeygenError};

/// A generated keypair
pub enum KeyPair {
    Rsa(Box<RsaPrivateKey>),
    P256(p256::SecretKey),
    P384(p384::SecretKey),
    P521(p521::SecretKey),
    Ed25519(SigningKey),
}

impl KeyPair {
    /// Generate a new random keypair
    pub fn generate(params: KeyGenParams) -> Result<Self> {
        let mut rng = OsRng;
        let key_pair = match params {
            KeyGenParams::Rsa {
                modulus_length,
                public_exponent,
            } => {
                let exp = BigUint::from(public_exponent);
                let key = RsaPrivateKey::new_with_exp(&mut rng, modulus_length, &exp)
                    .map_err(SecureKeygenError::provider)?;
                KeyPair::Rsa(Box::new(key))
            }
            KeyGenParams::Ecdsa { curve } => match curve {
                NamedCurve::P256 => KeyPair::P256(p256::SecretKey::random(&mut rng)),
                NamedCurve::P384 => KeyPair::P384(p384::SecretKey::random(&mut rng)),
                NamedCurve::P521 => KeyPair::P521(p521::SecretKey::random(&mut rng)),
            },
            KeyGenParams::Ed25519 => KeyPair::Ed25519(SigningKey::generate(&mut rng)),
        };
        Ok(key_pair)
    }

    /// Algorithm name, for logs and `Debug`
    pub fn algorithm(&self) -> &'static str {
        match self {
            KeyPair::Rsa(_) => "rsa",
            KeyPair::P256(_) => "ecdsa-p256",
            KeyPair::P384(_) => "ecdsa-p384",
            KeyPair::P521(_) => "ecdsa-p521",
            KeyPair::Ed25519(_) => "ed25519",
        }
    }

    /// Public RSA components as big-endian magnitudes
    pub fn export_jwk(&self) -> Result<ExportedKey> {
        match self {
            KeyPair::Rsa(key) => Ok(ExportedKey::Jwk {
                n: Some(key.n().to_bytes_be()),
                e: Some(key.e().to_bytes_be()),
            }),
            other => Err(SecureKeygenError::provider(format!(
                "JWK export is only implemented for RSA keys, not {}",
                other.algorithm()
            ))),
        }
    }

    /// Raw public key: uncompressed SEC1 point or Ed25519 public bytes
    pub fn export_raw(&self) -> Result<ExportedKey> {
        use p256::elliptic_curve::sec1::ToEncodedPoint;

        let raw = match self {
            KeyPair::Rsa(_) => {
                return Err(SecureKeygenError::provider(
                    "Raw export is not supported for RSA keys",
                ));
            }
            KeyPair::P256(key) => key.public_key().to_encoded_point(false).as_bytes().to_vec(),
            KeyPair::P384(key) => key.public_key().to_encoded_point(false).as_bytes().to_vec(),
            KeyPair::P521(key) => key.public_key().to_encoded_point(false).as_bytes().to_vec(),
            KeyPair::Ed25519(key) => key.verifying_key().to_bytes().to_vec(),
        };
        Ok(ExportedKey::Raw(raw))
    }

    /// Private key as PKCS#8 DER
    pub fn export_pkcs8(&self) -> Result<ExportedKey> {
        let document = match self {
            KeyPair::Rsa(key) => key.to_pkcs8_der(),
            KeyPair::P256(key) => key.to_pkcs8_der(),
            KeyPair::P384(key) => key.to_pkcs8_der(),
            KeyPair::P521(key) => key.to_pkcs8_der(),
            KeyPair::Ed25519(key) => key.to_pkcs8_der(),
        }
        .map_err(SecureKeygenError::provider)?;

        Ok(ExportedKey::Pkcs8(SecureBytes::from(document.as_bytes())))
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.algorithm())
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}
