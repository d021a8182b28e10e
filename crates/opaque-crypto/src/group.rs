//! Constant-time elliptic-curve primitives for one (curve, hash) pairing.
//!
//! Each NIST curve gets its own small module generated by
//! [`define_curve_ops`]; the bodies are thin bindings onto
//! `elliptic_curve`'s `hash2curve` (RFC 9380 `_XMD:..._SSWU_RO_`), `sec1`
//! (compressed-point encode/decode) and `PrimeField`/`Field` traits. There
//! is no hand-rolled simplified-SWU map here: RustCrypto's curve crates
//! already implement it for exactly the suites this system needs, which is
//! what real Rust OPRF/OPAQUE implementations build on too.
//!
//! Every function here operates on owned byte strings, matching the
//! pseudocode in spec §4.1 — scalars and points never escape this module
//! as curve-typed values.

use crate::error::{CryptoError, Result};
use elliptic_curve::{
    Field, PrimeField,
    generic_array::GenericArray,
    group::{Group as _, prime::PrimeCurveAffine},
    hash2curve::{ExpandMsgXmd, GroupDigest},
    sec1::{FromEncodedPoint, ModulusSize, ToEncodedPoint},
};
use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

macro_rules! define_curve_ops {
    ($modname:ident, $curve:ty, $digest:ty, $npk:expr, $nsk:expr, $nh:expr) => {
        pub mod $modname {
            use super::*;

            type Curve = $curve;
            type Scalar = <Curve as elliptic_curve::CurveArithmetic>::Scalar;
            type AffinePoint = <Curve as elliptic_curve::CurveArithmetic>::AffinePoint;
            type ProjectivePoint = <Curve as elliptic_curve::CurveArithmetic>::ProjectivePoint;

            pub const NPK: usize = $npk;
            pub const NSK: usize = $nsk;
            pub const NH: usize = $nh;

            fn point_to_bytes(p: &ProjectivePoint) -> Vec<u8> {
                p.to_affine().to_encoded_point(true).as_bytes().to_vec()
            }

            /// Parses a compressed SEC1 point, rejecting anything off-curve
            /// or equal to the point at infinity. P-256/384/521 all have
            /// cofactor 1, so on-curve + non-identity already certifies
            /// membership in the prime-order subgroup.
            fn point_from_bytes(bytes: &[u8]) -> Result<ProjectivePoint> {
                if bytes.len() != NPK {
                    return Err(CryptoError::WrongLength {
                        expected: NPK,
                        actual: bytes.len(),
                    });
                }
                let encoded = elliptic_curve::sec1::EncodedPoint::<Curve>::from_bytes(bytes)
                    .map_err(|_| CryptoError::InvalidPoint)?;
                let affine: AffinePoint =
                    Option::from(AffinePoint::from_encoded_point(&encoded))
                        .ok_or(CryptoError::InvalidPoint)?;
                if bool::from(affine.is_identity()) {
                    return Err(CryptoError::InvalidPoint);
                }
                Ok(ProjectivePoint::from(affine))
            }

            fn scalar_from_bytes(bytes: &[u8]) -> Result<Scalar> {
                if bytes.len() != NSK {
                    return Err(CryptoError::WrongLength {
                        expected: NSK,
                        actual: bytes.len(),
                    });
                }
                let repr = GenericArray::<u8, <Curve as elliptic_curve::Curve>::FieldBytesSize>
                    ::clone_from_slice(bytes);
                Option::from(Scalar::from_repr(repr)).ok_or(CryptoError::InvalidScalar)
            }

            fn scalar_to_bytes(s: &Scalar) -> Vec<u8> {
                s.to_repr().as_slice().to_vec()
            }

            pub fn hash_to_group(msg: &[u8], dst: &[u8]) -> Result<Vec<u8>> {
                let point = Curve::hash_from_bytes::<ExpandMsgXmd<$digest>>(&[msg], &[dst])
                    .map_err(|_| CryptoError::HashToCurve)?;
                Ok(point_to_bytes(&point))
            }

            pub fn hash_to_scalar(msg: &[u8], dst: &[u8]) -> Result<Vec<u8>> {
                let scalar = Curve::hash_to_scalar::<ExpandMsgXmd<$digest>>(&[msg], &[dst])
                    .map_err(|_| CryptoError::HashToCurve)?;
                Ok(scalar_to_bytes(&scalar))
            }

            pub fn scalar_mul(scalar: &[u8], point: &[u8]) -> Result<Vec<u8>> {
                let s = scalar_from_bytes(scalar)?;
                let p = point_from_bytes(point)?;
                Ok(point_to_bytes(&(p * s)))
            }

            pub fn scalar_mul_generator(scalar: &[u8]) -> Result<Vec<u8>> {
                let s = scalar_from_bytes(scalar)?;
                Ok(point_to_bytes(&(ProjectivePoint::generator() * s)))
            }

            pub fn invert_scalar(scalar: &[u8]) -> Result<Vec<u8>> {
                let s = scalar_from_bytes(scalar)?;
                let inv: Scalar = Option::from(s.invert()).ok_or(CryptoError::InvalidScalar)?;
                Ok(scalar_to_bytes(&inv))
            }

            pub fn random_scalar(rng: &mut (impl CryptoRng + RngCore)) -> Vec<u8> {
                loop {
                    let s = Scalar::random(&mut *rng);
                    if !bool::from(s.ct_eq(&Scalar::ZERO)) {
                        return scalar_to_bytes(&s);
                    }
                }
            }

            pub fn validate_point(point: &[u8]) -> Result<()> {
                point_from_bytes(point).map(|_| ())
            }

            pub fn validate_scalar(scalar: &[u8]) -> Result<()> {
                scalar_from_bytes(scalar).map(|_| ())
            }
        }
    };
}

define_curve_ops!(p256_ops, p256::NistP256, sha2::Sha256, 33, 32, 32);
define_curve_ops!(p384_ops, p384::NistP384, sha2::Sha384, 49, 48, 48);
define_curve_ops!(p521_ops, p521::NistP521, sha2::Sha512, 67, 66, 64);
