//! Byte-string helpers shared by every higher component: length-prefixed
//! integer encoding (I2OSP), concatenation, XOR, constant-time equality,
//! and hex/base64 passthroughs so callers never reach for a different crate
//! for the same job.

use subtle::ConstantTimeEq;

/// `I2OSP(value, length)` for `length` in {1, 2} — the only widths spec §4
/// ever needs on the wire. Unlike one historical Java copy of this helper
/// (spec §9), this takes `u16` inputs, so there is no `length >= 4`
/// overflow class to worry about: the value domain makes it unrepresentable.
pub fn i2osp_u16(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

/// Single-byte counter encoding, used by `DeriveKeyPair`'s retry counter.
pub fn i2osp_u8(value: u8) -> [u8; 1] {
    [value]
}

/// `I2OSP(len(s), 2) || s` — the length-prefixed-string idiom used
/// throughout the OPRF `Finalize` input and the OPAQUE preamble.
pub fn len_prefixed(s: &[u8]) -> Vec<u8> {
    debug_assert!(s.len() <= u16::MAX as usize, "length does not fit in 2 bytes");
    let mut out = Vec::with_capacity(2 + s.len());
    out.extend_from_slice(&i2osp_u16(s.len() as u16));
    out.extend_from_slice(s);
    out
}

/// Concatenate any number of byte slices into one owned buffer.
pub fn concat(parts: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(parts.iter().map(|p| p.len()).sum());
    for p in parts {
        out.extend_from_slice(p);
    }
    out
}

/// XOR two equal-length byte strings. Panics on length mismatch — callers
/// always XOR a pad against a field of the same derived width.
pub fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    assert_eq!(a.len(), b.len(), "xor operands must be equal length");
    a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}

/// Constant-time equality for MAC/tag comparison. Spec §3 requires this at
/// every MAC-verification site; never substitute `==` on a `Vec<u8>`.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub fn from_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(s)
}

pub fn to_base64(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.decode(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i2osp_roundtrips_through_be_bytes() {
        assert_eq!(i2osp_u16(0), [0, 0]);
        assert_eq!(i2osp_u16(256), [1, 0]);
        assert_eq!(i2osp_u16(u16::MAX), [0xff, 0xff]);
    }

    #[test]
    fn len_prefixed_matches_manual_concat() {
        let s = b"hello";
        let got = len_prefixed(s);
        assert_eq!(&got[..2], &[0, 5]);
        assert_eq!(&got[2..], s);
    }

    #[test]
    fn xor_is_involutive() {
        let a = [1u8, 2, 3, 4];
        let b = [9u8, 8, 7, 6];
        let x = xor(&a, &b);
        let y = xor(&x, &b);
        assert_eq!(y, a);
    }

    #[test]
    fn ct_eq_rejects_length_mismatch_and_content_mismatch() {
        assert!(ct_eq(b"abc", b"abc"));
        assert!(!ct_eq(b"abc", b"abd"));
        assert!(!ct_eq(b"abc", b"ab"));
    }
}
