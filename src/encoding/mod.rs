//! Byte-exact encoders for the three output formats
//!
//! - `wire`: SSH wire primitives, base64 and PEM armor
//! - `der`: the small ASN.1 DER subset needed for PKCS#8 / PBES2
//! - `openssh`: `authorized_keys`-style public key lines

pub mod der;
pub mod openssh;
pub mod wire;
