//! Key generation requests
//!
//! A [`KeySpec`] is either built in code or read from the JSON option object
//! the UI sends, e.g.
//!
//! ```json
//! { "algorithm": "ecdsa", "namedCurve": "P-384", "comment": "me@host",
//!   "passphrase": "secret", "protection": { "kdf": { "hash": "SHA-256" } } }
//! ```
//!
//! Omitted fields take the defaults below. Unknown algorithm, curve, cipher or
//! hash names are configuration errors.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::crypto::{Cipher, KeyGenParams, NamedCurve, PrfHash, RsaHash};
use crate::error::{Result, SecureKeygenError};

pub const DEFAULT_RSA_MODULUS_LENGTH: usize = 3072;
pub const RSA_MODULUS_LENGTHS: &[usize] = &[2048, 3072, 4096];
pub const DEFAULT_RSA_PUBLIC_EXPONENT: u64 = 65537;
pub const DEFAULT_KDF_ITERATIONS: u32 = 100_000;
pub const DEFAULT_SALT_SIZE: usize = 16;
pub const MAX_SALT_SIZE: usize = 1024;
/// Largest public exponent the RSA backend accepts (2^33 - 1)
pub const MAX_RSA_PUBLIC_EXPONENT: u64 = (1 << 33) - 1;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySpec {
    #[serde(flatten)]
    pub algorithm: AlgorithmSpec,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub passphrase: Option<SecretString>,
    #[serde(default)]
    pub protection: ProtectionConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum AlgorithmSpec {
    Rsa(RsaSpec),
    Ecdsa(EcdsaSpec),
    Ed25519,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RsaSpec {
    pub modulus_length: usize,
    pub public_exponent: u64,
    pub hash: RsaHash,
}

impl Default for RsaSpec {
    fn default() -> Self {
        Self {
            modulus_length: DEFAULT_RSA_MODULUS_LENGTH,
            public_exponent: DEFAULT_RSA_PUBLIC_EXPONENT,
            hash: RsaHash::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EcdsaSpec {
    pub named_curve: NamedCurve,
}

/// How a passphrase-protected private key is encrypted
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtectionConfig {
    pub cipher: Cipher,
    pub kdf: KdfConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KdfConfig {
    pub iterations: u32,
    pub salt_size: usize,
    pub hash: PrfHash,
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_KDF_ITERATIONS,
            salt_size: DEFAULT_SALT_SIZE,
            hash: PrfHash::default(),
        }
    }
}

impl ProtectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.kdf.iterations == 0 {
            return Err(SecureKeygenError::config("KDF iterations must be positive"));
        }
        if self.kdf.salt_size == 0 {
            return Err(SecureKeygenError::config("KDF salt size must be positive"));
        }
        if self.kdf.salt_size > MAX_SALT_SIZE {
            return Err(SecureKeygenError::config(format!(
                "KDF salt size {} exceeds {} bytes",
                self.kdf.salt_size, MAX_SALT_SIZE
            )));
        }
        Ok(())
    }
}

impl KeySpec {
    pub fn new(algorithm: AlgorithmSpec) -> Self {
        Self {
            algorithm,
            comment: None,
            passphrase: None,
            protection: ProtectionConfig::default(),
        }
    }

    pub fn rsa(modulus_length: usize) -> Self {
        Self::new(AlgorithmSpec::Rsa(RsaSpec {
            modulus_length,
            ..RsaSpec::default()
        }))
    }

    pub fn ecdsa(named_curve: NamedCurve) -> Self {
        Self::new(AlgorithmSpec::Ecdsa(EcdsaSpec { named_curve }))
    }

    pub fn ed25519() -> Self {
        Self::new(AlgorithmSpec::Ed25519)
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(SecretString::new(passphrase.into()));
        self
    }

    pub fn with_protection(mut self, protection: ProtectionConfig) -> Self {
        self.protection = protection;
        self
    }

    /// Parse the UI's JSON option object
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SecureKeygenError::config(e.to_string()))
    }

    /// Non-empty passphrase bytes, if the private key is to be encrypted
    pub fn passphrase_bytes(&self) -> Option<&[u8]> {
        self.passphrase
            .as_ref()
            .map(|p| p.expose_secret().as_bytes())
            .filter(|p| !p.is_empty())
    }

    /// Comment to append to the public key line, if any
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.is_empty())
    }

    /// Check every parameter and produce the provider request
    ///
    /// Runs before anything is asked of the provider.
    pub fn validate(&self) -> Result<KeyGenParams> {
        if let Some(comment) = self.comment() {
            if comment.contains(['\n', '\r']) {
                return Err(SecureKeygenError::config(
                    "comment must fit on a single line",
                ));
            }
        }
        if self.passphrase_bytes().is_some() {
            self.protection.validate()?;
        }

        match self.algorithm {
            AlgorithmSpec::Rsa(rsa) => {
                if !RSA_MODULUS_LENGTHS.contains(&rsa.modulus_length) {
                    return Err(SecureKeygenError::config(format!(
                        "unsupported RSA modulus length {} (expected one of {:?})",
                        rsa.modulus_length, RSA_MODULUS_LENGTHS
                    )));
                }
                if rsa.public_exponent == 0 {
                    return Err(SecureKeygenError::config(
                        "publicExponent must be positive",
                    ));
                }
                if rsa.public_exponent < 3
                    || rsa.public_exponent % 2 == 0
                    || rsa.public_exponent > MAX_RSA_PUBLIC_EXPONENT
                {
                    return Err(SecureKeygenError::config(format!(
                        "unsupported RSA public exponent {}",
                        rsa.public_exponent
                    )));
                }
                Ok(KeyGenParams::Rsa {
                    modulus_length: rsa.modulus_length,
                    public_exponent: rsa.public_exponent,
                })
            }
            AlgorithmSpec::Ecdsa(ecdsa) => Ok(KeyGenParams::Ecdsa {
                curve: ecdsa.named_curve,
            }),
            AlgorithmSpec::Ed25519 => Ok(KeyGenParams::Ed25519),
        }
    }
}
