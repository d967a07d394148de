//! Minimal ASN.1 DER builder
//!
//! Only the handful of universal types PKCS#8 / PBES2 needs. Output is always
//! definite, minimal-length DER.

use crate::error::{Result, SecureKeygenError};

pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_OCTET_STRING: u8 = 0x04;
pub const TAG_NULL: u8 = 0x05;
pub const TAG_OBJECT_IDENTIFIER: u8 = 0x06;
pub const TAG_SEQUENCE: u8 = 0x30;

/// DER length octets: short form below 128, otherwise `0x80 | n` followed by
/// `n` big-endian length bytes
pub fn length(len: usize) -> Vec<u8> {
    if len < 0x80 {
        return vec![len as u8];
    }
    let be = len.to_be_bytes();
    let skip = be.iter().take_while(|&&b| b == 0).count();
    let mut out = Vec::with_capacity(1 + be.len() - skip);
    out.push(0x80 | (be.len() - skip) as u8);
    out.extend_from_slice(&be[skip..]);
    out
}

/// Tag-length-value
pub fn tlv(tag: u8, value: &[u8]) -> Vec<u8> {
    let len = length(value.len());
    let mut out = Vec::with_capacity(1 + len.len() + value.len());
    out.push(tag);
    out.extend_from_slice(&len);
    out.extend_from_slice(value);
    out
}

/// SEQUENCE around the concatenated children; `None` children are skipped
pub fn sequence<'a, I, T>(children: I) -> Vec<u8>
where
    I: IntoIterator<Item = T>,
    T: Into<Option<&'a [u8]>>,
{
    let body: Vec<u8> = children
        .into_iter()
        .filter_map(|child| -> Option<&'a [u8]> { child.into() })
        .flat_map(|child| child.iter().copied())
        .collect();
    tlv(TAG_SEQUENCE, &body)
}

pub fn octet_string(value: &[u8]) -> Vec<u8> {
    tlv(TAG_OCTET_STRING, value)
}

pub fn null_value() -> Vec<u8> {
    vec![TAG_NULL, 0x00]
}

/// INTEGER for a non-negative value: minimal magnitude, with a leading zero
/// byte only when the first byte has its high bit set
pub fn integer(n: u64) -> Vec<u8> {
    let be = n.to_be_bytes();
    let skip = be.iter().take_while(|&&b| b == 0).count().min(be.len() - 1);
    let magnitude = &be[skip..];

    let mut value = Vec::with_capacity(magnitude.len() + 1);
    if magnitude[0] & 0x80 != 0 {
        value.push(0);
    }
    value.extend_from_slice(magnitude);
    tlv(TAG_INTEGER, &value)
}

/// OBJECT IDENTIFIER from dotted-decimal form
pub fn object_identifier(dotted: &str) -> Result<Vec<u8>> {
    let arcs = dotted
        .split('.')
        .map(|arc| arc.parse::<u64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| SecureKeygenError::config(format!("invalid OID '{dotted}'")))?;

    let (first, second, rest) = match arcs.as_slice() {
        [first @ 0..=2, second, rest @ ..] => (*first, *second, rest),
        _ => {
            return Err(SecureKeygenError::config(format!("invalid OID '{dotted}'")));
        }
    };
    if first < 2 && second >= 40 {
        return Err(SecureKeygenError::config(format!("invalid OID '{dotted}'")));
    }

    let leading = first
        .checked_mul(40)
        .and_then(|arc| arc.checked_add(second))
        .ok_or_else(|| SecureKeygenError::config(format!("invalid OID '{dotted}'")))?;

    let mut body = Vec::new();
    push_base128(&mut body, leading);
    for &arc in rest {
        push_base128(&mut body, arc);
    }
    Ok(tlv(TAG_OBJECT_IDENTIFIER, &body))
}

/// AlgorithmIdentifier ::= SEQUENCE { algorithm OID, parameters ANY }
///
/// Missing parameters are encoded as NULL.
pub fn algorithm_identifier(oid: &str, params: Option<&[u8]>) -> Result<Vec<u8>> {
    let oid = object_identifier(oid)?;
    let params = match params {
        Some(p) => p.to_vec(),
        None => null_value(),
    };
    Ok(sequence([oid.as_slice(), params.as_slice()]))
}

/// Base-128 with the continuation bit on every byte but the last
fn push_base128(out: &mut Vec<u8>, mut value: u64) {
    let mut groups = [0u8; 10];
    let mut n = 0;
    loop {
        groups[n] = (value & 0x7f) as u8;
        n += 1;
        value >>= 7;
        if value == 0 {
            break;
        }
    }
    for i in (0..n).rev() {
        out.push(groups[i] | if i > 0 { 0x80 } else { 0 });
    }
}
