//! OpenSSH public key encoding
//!
//! Wire blobs per RFC 4253 §6.6 (ssh-rsa), RFC 5656 §3.1 (ecdsa-sha2-*) and
//! RFC 8709 §4 (ssh-ed25519), rendered as a single `authorized_keys` line:
//! `<type> <base64(blob)>[ <comment>]`.

use ::base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};

use super::wire::{base64, ssh_mpint, ssh_string};
use crate::crypto::{ExportedKey, KeyGenParams, NamedCurve};
use crate::error::{Result, SecureKeygenError};

pub const SSH_RSA: &str = "ssh-rsa";
pub const SSH_ED25519: &str = "ssh-ed25519";
pub const ED25519_PUBLIC_KEY_LEN: usize = 32;

/// A public key ready for `authorized_keys`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedPublicKey {
    pub key_type: String,
    pub blob: Vec<u8>,
    pub line: String,
}

impl EncodedPublicKey {
    /// `SHA256:<unpadded base64>` over the wire blob, as `ssh-keygen -l` prints it
    pub fn fingerprint(&self) -> String {
        fingerprint_sha256(&self.blob)
    }
}

/// SSH key type name for a generation request
pub fn key_type(params: &KeyGenParams) -> String {
    match params {
        KeyGenParams::Rsa { .. } => SSH_RSA.to_string(),
        KeyGenParams::Ecdsa { curve } => ecdsa_key_type(*curve),
        KeyGenParams::Ed25519 => SSH_ED25519.to_string(),
    }
}

pub fn ecdsa_key_type(curve: NamedCurve) -> String {
    format!("ecdsa-sha2-{}", curve.ssh_name())
}

/// `string "ssh-rsa" || mpint e || mpint n`
pub fn rsa_blob(e: &[u8], n: &[u8]) -> Vec<u8> {
    let mut blob = ssh_string(SSH_RSA.as_bytes());
    blob.extend(ssh_mpint(e));
    blob.extend(ssh_mpint(n));
    blob
}

/// `string "ecdsa-sha2-<curve>" || string "<curve>" || string Q`
pub fn ecdsa_blob(curve: NamedCurve, point: &[u8]) -> Result<Vec<u8>> {
    if point.len() != curve.uncompressed_point_len() || point.first() != Some(&0x04) {
        return Err(SecureKeygenError::ExportShape(format!(
            "{} public point must be {} bytes starting with 0x04, got {} bytes",
            curve,
            curve.uncompressed_point_len(),
            point.len()
        )));
    }

    let mut blob = ssh_string(ecdsa_key_type(curve).as_bytes());
    blob.extend(ssh_string(curve.ssh_name().as_bytes()));
    blob.extend(ssh_string(point));
    Ok(blob)
}

/// `string "ssh-ed25519" || string A`
pub fn ed25519_blob(public_key: &[u8]) -> Result<Vec<u8>> {
    if public_key.len() != ED25519_PUBLIC_KEY_LEN {
        return Err(SecureKeygenError::ExportShape(format!(
            "Ed25519 public key must be {} bytes, got {}",
            ED25519_PUBLIC_KEY_LEN,
            public_key.len()
        )));
    }

    let mut blob = ssh_string(SSH_ED25519.as_bytes());
    blob.extend(ssh_string(public_key));
    Ok(blob)
}

/// Single-line `<type> <base64>[ <comment>]`; an empty comment is omitted
pub fn public_key_line(key_type: &str, blob: &[u8], comment: Option<&str>) -> String {
    match comment.filter(|c| !c.is_empty()) {
        Some(comment) => format!("{} {} {}", key_type, base64(blob), comment),
        None => format!("{} {}", key_type, base64(blob)),
    }
}

pub fn fingerprint_sha256(blob: &[u8]) -> String {
    format!("SHA256:{}", STANDARD_NO_PAD.encode(Sha256::digest(blob)))
}

/// Turn a provider's public export into an OpenSSH public key
///
/// `params` is what was asked of the provider; an export that does not have
/// the shape that algorithm requires is an [`SecureKeygenError::ExportShape`].
pub fn encode_public_key(
    params: &KeyGenParams,
    export: &ExportedKey,
    comment: Option<&str>,
) -> Result<EncodedPublicKey> {
    let blob = match (params, export) {
        (KeyGenParams::Rsa { .. }, ExportedKey::Jwk { n, e }) => {
            let (n, e) = match (n, e) {
                (Some(n), Some(e)) if !n.is_empty() && !e.is_empty() => (n, e),
                _ => {
                    return Err(SecureKeygenError::ExportShape(
                        "RSA JWK export without n/e".into(),
                    ));
                }
            };
            rsa_blob(e, n)
        }
        (KeyGenParams::Ecdsa { curve }, ExportedKey::Raw(point)) => ecdsa_blob(*curve, point)?,
        (KeyGenParams::Ed25519, ExportedKey::Raw(raw)) => ed25519_blob(raw)?,
        (params, _) => {
            return Err(SecureKeygenError::ExportShape(format!(
                "unexpected public key export for {}",
                key_type(params)
            )));
        }
    };

    let key_type = key_type(params);
    let line = public_key_line(&key_type, &blob, comment);
    Ok(EncodedPublicKey {
        key_type,
        blob,
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::wire::tests::read_ssh_string;
    use crate::encoding::wire::base64 as b64;
    use ::base64::engine::general_purpose::STANDARD;

    fn decode_line(line: &str) -> Vec<u8> {
        let encoded = line.split(' ').nth(1).unwrap();
        STANDARD.decode(encoded).unwrap()
    }

    #[test]
    fn test_ed25519_line_shape() {
        let export = ExportedKey::Raw(vec![7u8; 32]);
        let key = encode_public_key(&KeyGenParams::Ed25519, &export, Some("test@host")).unwrap();

        assert!(key.line.starts_with("ssh-ed25519 "));
        assert!(key.line.ends_with(" test@host"));

        let blob = decode_line(&key.line);
        assert_eq!(blob.len(), 4 + 11 + 4 + 32);
        let (kind, rest) = read_ssh_string(&blob);
        let (raw, rest) = read_ssh_string(rest);
        assert_eq!(kind, b"ssh-ed25519");
        assert_eq!(raw, &[7u8; 32]);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_rsa_blob_layout() {
        // n with the high bit set needs a sign byte, e = 65537 does not
        let n = vec![0xC3; 256];
        let blob = rsa_blob(&[0x01, 0x00, 0x01], &n);

        let (kind, rest) = read_ssh_string(&blob);
        let (e, rest) = read_ssh_string(rest);
        let (n_mpint, rest) = read_ssh_string(rest);
        assert_eq!(kind, b"ssh-rsa");
        assert_eq!(e, &[0x01, 0x00, 0x01]);
        assert_eq!(n_mpint.len(), 257);
        assert_eq!(n_mpint[0], 0);
        assert_eq!(&n_mpint[1..], &n[..]);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_ecdsa_blob_layout() {
        let mut point = vec![0x04];
        point.extend(vec![0xAA; 96]);
        let blob = ecdsa_blob(NamedCurve::P384, &point).unwrap();

        let (kind, rest) = read_ssh_string(&blob);
        let (curve, rest) = read_ssh_string(rest);
        let (q, rest) = read_ssh_string(rest);
        assert_eq!(kind, b"ecdsa-sha2-nistp384");
        assert_eq!(curve, b"nistp384");
        assert_eq!(q, &point[..]);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_comment_omitted_when_empty() {
        let blob = ed25519_blob(&[1u8; 32]).unwrap();
        let line = public_key_line(SSH_ED25519, &blob, Some(""));
        assert_eq!(line, format!("ssh-ed25519 {}", b64(&blob)));
        assert_eq!(line, public_key_line(SSH_ED25519, &blob, None));
    }

    #[test]
    fn test_export_shape_errors() {
        let missing_n = ExportedKey::Jwk {
            n: None,
            e: Some(vec![1, 0, 1]),
        };
        let rsa = KeyGenParams::Rsa {
            modulus_length: 2048,
            public_exponent: 65537,
        };
        assert!(matches!(
            encode_public_key(&rsa, &missing_n, None),
            Err(SecureKeygenError::ExportShape(_))
        ));

        let compressed = ExportedKey::Raw(vec![0x02; 33]);
        let p256 = KeyGenParams::Ecdsa {
            curve: NamedCurve::P256,
        };
        assert!(matches!(
            encode_public_key(&p256, &compressed, None),
            Err(SecureKeygenError::ExportShape(_))
        ));

        let short = ExportedKey::Raw(vec![0u8; 31]);
        assert!(matches!(
            encode_public_key(&KeyGenParams::Ed25519, &short, None),
            Err(SecureKeygenError::ExportShape(_))
        ));

        let wrong_kind = ExportedKey::Raw(vec![0u8; 32]);
        assert!(matches!(
            encode_public_key(&rsa, &wrong_kind, None),
            Err(SecureKeygenError::ExportShape(_))
        ));
    }

    #[test]
    fn test_fingerprint_format() {
        let blob = ed25519_blob(&[9u8; 32]).unwrap();
        let fp = fingerprint_sha256(&blob);
        assert!(fp.starts_with("SHA256:"));
        assert_eq!(fp.len(), "SHA256:".len() + 43);
        assert!(!fp.ends_with('='));
    }
}
