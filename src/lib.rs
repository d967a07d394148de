//! Secure Keygen - SSH key generation with PBES2-protected private keys
//!
//! This crate:
//! - Generates RSA, ECDSA (P-256/P-384/P-521) and Ed25519 key pairs
//! - Encodes public keys as single-line OpenSSH `authorized_keys` entries
//! - Emits private keys as PKCS#8 PEM, optionally encrypted under a
//!   passphrase with PBES2 (PBKDF2-HMAC + AES-CBC)
//!
//! ```no_run
//! # async fn demo() -> secure_keygen::Result<()> {
//! use secure_keygen::{generate_ssh_key, KeySpec};
//!
//! let spec = KeySpec::ed25519()
//!     .with_comment("me@host")
//!     .with_passphrase("correct horse");
//! let key = generate_ssh_key(&spec).await?;
//! println!("{}", key.public_openssh);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod keygen;

pub use crypto::{CryptoProvider, RustCryptoProvider};
pub use error::{Result, SecureKeygenError};
pub use keygen::{generate_ssh_key, GeneratedKey, KeyGenerator, KeySpec, ProtectionConfig};
