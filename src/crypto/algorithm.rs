//! Closed sets of supported curves, ciphers and hashes
//!
//! Each enum parses from (and serializes to) the same names the option JSON
//! uses, so an unknown name is rejected while the request is still being read.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SecureKeygenError;

pub const OID_PBES2: &str = "1.2.840.113549.1.5.13";
pub const OID_PBKDF2: &str = "1.2.840.113549.1.5.12";

/// AES block size; also the CBC IV length
pub const AES_BLOCK_LEN: usize = 16;

macro_rules! named_enum {
    ($ty:ident, $what:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = SecureKeygenError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    other => Err(SecureKeygenError::config(format!(
                        concat!("unsupported ", $what, " '{}'"),
                        other
                    ))),
                }
            }
        }
    };
}

/// NIST curves usable for ECDSA keys
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedCurve {
    #[default]
    #[serde(rename = "P-256")]
    P256,
    #[serde(rename = "P-384")]
    P384,
    #[serde(rename = "P-521")]
    P521,
}

named_enum!(NamedCurve, "ECDSA curve", {
    P256 => "P-256",
    P384 => "P-384",
    P521 => "P-521",
});

impl NamedCurve {
    /// OpenSSH curve identifier
    pub fn ssh_name(self) -> &'static str {
        match self {
            NamedCurve::P256 => "nistp256",
            NamedCurve::P384 => "nistp384",
            NamedCurve::P521 => "nistp521",
        }
    }

    /// Field element size in bytes
    pub fn field_len(self) -> usize {
        match self {
            NamedCurve::P256 => 32,
            NamedCurve::P384 => 48,
            NamedCurve::P521 => 66,
        }
    }

    /// Length of the SEC1 uncompressed point `0x04 || X || Y`
    pub fn uncompressed_point_len(self) -> usize {
        1 + 2 * self.field_len()
    }
}

/// Symmetric cipher of the PBES2 encryption scheme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cipher {
    #[serde(rename = "aes-128-cbc")]
    Aes128Cbc,
    #[serde(rename = "aes-192-cbc")]
    Aes192Cbc,
    #[default]
    #[serde(rename = "aes-256-cbc")]
    Aes256Cbc,
}

named_enum!(Cipher, "cipher", {
    Aes128Cbc => "aes-128-cbc",
    Aes192Cbc => "aes-192-cbc",
    Aes256Cbc => "aes-256-cbc",
});

impl Cipher {
    pub fn oid(self) -> &'static str {
        match self {
            Cipher::Aes128Cbc => "2.16.840.1.101.3.4.1.2",
            Cipher::Aes192Cbc => "2.16.840.1.101.3.4.1.22",
            Cipher::Aes256Cbc => "2.16.840.1.101.3.4.1.42",
        }
    }

    pub fn key_len(self) -> usize {
        match self {
            Cipher::Aes128Cbc => 16,
            Cipher::Aes192Cbc => 24,
            Cipher::Aes256Cbc => 32,
        }
    }

    pub fn iv_len(self) -> usize {
        AES_BLOCK_LEN
    }
}

/// HMAC hash used as the PBKDF2 pseudo-random function
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrfHash {
    #[default]
    #[serde(rename = "SHA-1")]
    Sha1,
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-384")]
    Sha384,
    #[serde(rename = "SHA-512")]
    Sha512,
}

named_enum!(PrfHash, "KDF hash", {
    Sha1 => "SHA-1",
    Sha256 => "SHA-256",
    Sha384 => "SHA-384",
    Sha512 => "SHA-512",
});

impl PrfHash {
    /// `hmacWithSHA*` OID from RFC 8018 appendix B.1
    pub fn hmac_oid(self) -> &'static str {
        match self {
            PrfHash::Sha1 => "1.2.840.113549.2.7",
            PrfHash::Sha256 => "1.2.840.113549.2.9",
            PrfHash::Sha384 => "1.2.840.113549.2.10",
            PrfHash::Sha512 => "1.2.840.113549.2.11",
        }
    }

    /// hmacWithSHA1 is the PBKDF2-params DEFAULT and must not be encoded
    pub fn is_der_default(self) -> bool {
        self == PrfHash::Sha1
    }
}

/// Signature hash recorded alongside RSA keys
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RsaHash {
    #[default]
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-384")]
    Sha384,
    #[serde(rename = "SHA-512")]
    Sha512,
}

named_enum!(RsaHash, "RSA hash", {
    Sha256 => "SHA-256",
    Sha384 => "SHA-384",
    Sha512 => "SHA-512",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_names() {
        assert_eq!("P-384".parse::<NamedCurve>().unwrap(), NamedCurve::P384);
        assert_eq!(NamedCurve::P521.ssh_name(), "nistp521");
        assert_eq!(NamedCurve::P256.uncompressed_point_len(), 65);
        assert_eq!(NamedCurve::P521.uncompressed_point_len(), 133);
    }

    #[test]
    fn test_unknown_names_are_configuration_errors() {
        assert!(matches!(
            "P-999".parse::<NamedCurve>(),
            Err(SecureKeygenError::Configuration(_))
        ));
        assert!(matches!(
            "des-ede3-cbc".parse::<Cipher>(),
            Err(SecureKeygenError::Configuration(_))
        ));
        assert!(matches!(
            "MD5".parse::<PrfHash>(),
            Err(SecureKeygenError::Configuration(_))
        ));
    }

    #[test]
    fn test_serde_names_match_display() {
        for cipher in Cipher::ALL {
            let json = serde_json::to_string(cipher).unwrap();
            assert_eq!(json, format!("\"{}\"", cipher));
        }
        for hash in PrfHash::ALL {
            let json = serde_json::to_string(hash).unwrap();
            assert_eq!(json, format!("\"{}\"", hash));
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Cipher::default(), Cipher::Aes256Cbc);
        assert_eq!(Cipher::default().key_len(), 32);
        assert_eq!(PrfHash::default(), PrfHash::Sha1);
        assert_eq!(NamedCurve::default(), NamedCurve::P256);
        assert_eq!(RsaHash::default(), RsaHash::Sha256);
    }
}
