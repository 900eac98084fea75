//! Scalar parsing, formatting, and curve-order arithmetic helpers.

use crate::error::Error;
use anyhow::{anyhow, bail, Result};
use k256::elliptic_curve::ff::PrimeField;
use k256::{ProjectivePoint, Scalar};
use num_bigint::BigUint;
use num_traits::Num;

/// secp256k1 curve order n in hexadecimal.
const SECP256K1_ORDER_HEX: &str =
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141";

/// Returns the secp256k1 group order n.
pub fn curve_order() -> BigUint {
    BigUint::from_str_radix(SECP256K1_ORDER_HEX, 16).unwrap()
}

pub enum ScalarKind {
    RorS,
    Z,
}

pub fn parse_scalar_decimal_strict(s: &str, kind: ScalarKind) -> Result<Scalar> {
    if s.is_empty() {
        bail!("Empty decimal string");
    }
    if !s.chars().all(|c| c.is_ascii_digit()) {
        bail!("Invalid decimal string: only digits 0-9 allowed");
    }
    if s.len() > 1 && s.starts_with('0') {
        bail!("Invalid decimal string: no leading zeros allowed");
    }

    let biguint =
        BigUint::from_str_radix(s, 10).map_err(|e| anyhow!("Failed to parse decimal: {}", e))?;

    if biguint >= curve_order() {
        bail!("Value >= secp256k1 order n, ensure your data is already reduced");
    }

    let scalar =
        scalar_from_biguint(&biguint).ok_or_else(|| anyhow!("Invalid scalar representation"))?;

    match kind {
        ScalarKind::RorS => {
            if bool::from(scalar.is_zero()) {
                bail!("r and s values cannot be zero");
            }
        }
        ScalarKind::Z => {}
    }

    Ok(scalar)
}

pub fn scalar_to_decimal_string(scalar: &Scalar) -> String {
    let bytes = scalar.to_bytes();
    let biguint = BigUint::from_bytes_be(&bytes);
    biguint.to_string()
}

pub fn scalar_to_hex_string(scalar: &Scalar) -> String {
    let bytes = scalar.to_bytes();
    hex::encode(bytes)
}

/// Converts a value already reduced below n into a Scalar.
fn scalar_from_biguint(value: &BigUint) -> Option<Scalar> {
    let bytes = value.to_bytes_be();
    if bytes.len() > 32 {
        return None;
    }
    let mut padded = [0u8; 32];
    let offset = 32 - bytes.len();
    padded[offset..].copy_from_slice(&bytes);
    Option::<Scalar>::from(Scalar::from_repr(padded.into()))
}

pub fn mod_inverse(a: &Scalar) -> Option<Scalar> {
    a.invert().into()
}

/// Reduces big-endian field-element bytes modulo the group order n.
///
/// The field prime p exceeds n, so an x-coordinate taken from a curve
/// point may be >= n and must be reduced before use as a scalar.
pub fn reduce_bytes_mod_order(bytes: &[u8]) -> Scalar {
    let reduced = BigUint::from_bytes_be(bytes) % curve_order();
    scalar_from_biguint(&reduced).expect("value below n always has a scalar representation")
}

/// Affine x-coordinate of a point, reduced modulo the group order.
pub fn point_x_mod_n(point: &ProjectivePoint) -> Result<Scalar, Error> {
    use k256::elliptic_curve::sec1::ToEncodedPoint;

    if *point == ProjectivePoint::IDENTITY {
        return Err(Error::PointAtInfinity);
    }
    let encoded = point.to_affine().to_encoded_point(false);
    let x = encoded.x().ok_or(Error::PointAtInfinity)?;
    Ok(reduce_bytes_mod_order(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalar_decimal_strict_valid() {
        let s = parse_scalar_decimal_strict(
            "6819641642398093696120236467967538361543858578256722584730163952555838220871",
            ScalarKind::RorS,
        )
        .unwrap();
        assert!(!bool::from(s.is_zero()));
    }

    #[test]
    fn test_parse_scalar_decimal_strict_rejects_zero_for_r_s() {
        let result = parse_scalar_decimal_strict("0", ScalarKind::RorS);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_scalar_decimal_strict_allows_zero_for_z() {
        let result = parse_scalar_decimal_strict("0", ScalarKind::Z);
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_scalar_rejects_leading_zeros() {
        let result = parse_scalar_decimal_strict("0123", ScalarKind::RorS);
        assert!(result.is_err());
    }

    #[test]
    fn test_scalar_to_decimal_roundtrip() {
        let original =
            "35027840177330064405683178523079910253772859809146826320797401203281604260438";
        let scalar = parse_scalar_decimal_strict(original, ScalarKind::RorS).unwrap();
        let back = scalar_to_decimal_string(&scalar);
        assert_eq!(back, original);
    }

    #[test]
    fn test_mod_inverse() {
        let a = parse_scalar_decimal_strict("12345", ScalarKind::RorS).unwrap();
        let inv = mod_inverse(&a).unwrap();
        let product = a * inv;
        assert_eq!(product, Scalar::ONE);
    }

    #[test]
    fn test_mod_inverse_of_zero_is_none() {
        assert!(mod_inverse(&Scalar::ZERO).is_none());
    }

    #[test]
    fn test_parse_scalar_rejects_z_ge_n() {
        let n_decimal =
            "115792089237316195423570985008687907852837564279074904382605163141518161494337";
        let result = parse_scalar_decimal_strict(n_decimal, ScalarKind::Z);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("secp256k1 order"));
    }

    #[test]
    fn test_reduce_bytes_mod_order_handles_order_itself() {
        let n_bytes = curve_order().to_bytes_be();
        let reduced = reduce_bytes_mod_order(&n_bytes);
        assert!(bool::from(reduced.is_zero()));
    }

    #[test]
    fn test_generator_times_one_is_generator() {
        let p = ProjectivePoint::GENERATOR * Scalar::ONE;
        assert_eq!(p, ProjectivePoint::GENERATOR);
    }

    #[test]
    fn test_generator_times_order_is_identity() {
        // n reduces to the zero scalar, so n * G is the identity.
        let n_scalar = reduce_bytes_mod_order(&curve_order().to_bytes_be());
        let p = ProjectivePoint::GENERATOR * n_scalar;
        assert_eq!(p, ProjectivePoint::IDENTITY);
    }

    #[test]
    fn test_point_x_mod_n_rejects_identity() {
        let result = point_x_mod_n(&ProjectivePoint::IDENTITY);
        assert_eq!(result, Err(Error::PointAtInfinity));
    }

    #[test]
    fn test_point_x_mod_n_of_generator_is_nonzero() {
        let x = point_x_mod_n(&ProjectivePoint::GENERATOR).unwrap();
        assert!(!bool::from(x.is_zero()));
    }
}
