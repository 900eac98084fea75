//! Signature data types

use crate::math::{parse_scalar_decimal_strict, ScalarKind};
use anyhow::Result;
use k256::Scalar;
use serde::{Deserialize, Serialize};

/// Raw signature record as it appears in input files: decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureInput {
    pub r: String,
    pub s: String,
    pub z: String,
}

/// A parsed ECDSA signature over secp256k1.
///
/// `r` and `s` are the signature components, `z` is the message hash
/// reduced to curve-order width. Instances are loaded once and never
/// mutated.
#[derive(Debug, Clone)]
pub struct Signature {
    pub r: Scalar,
    pub s: Scalar,
    pub z: Scalar,
}

impl TryFrom<SignatureInput> for Signature {
    type Error = anyhow::Error;

    fn try_from(input: SignatureInput) -> Result<Self> {
        let r = parse_scalar_decimal_strict(&input.r, ScalarKind::RorS)?;
        let s = parse_scalar_decimal_strict(&input.s, ScalarKind::RorS)?;
        let z = parse_scalar_decimal_strict(&input.z, ScalarKind::Z)?;

        Ok(Signature { r, s, z })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_input_parse_decimal() {
        let input = SignatureInput {
            r: "6819641642398093696120236467967538361543858578256722584730163952555838220871"
                .to_string(),
            s: "5111069398017465712735164463809304352000044522184731945150717785434666956473"
                .to_string(),
            z: "4834837306435966184874350434501389872155834069808640791394730023708942795899"
                .to_string(),
        };
        let sig = Signature::try_from(input).unwrap();
        assert!(!bool::from(sig.r.is_zero()));
    }

    #[test]
    fn test_signature_input_rejects_zero_r() {
        let input = SignatureInput {
            r: "0".to_string(),
            s: "456".to_string(),
            z: "789".to_string(),
        };
        assert!(Signature::try_from(input).is_err());
    }

    #[test]
    fn test_signature_input_allows_zero_z() {
        let input = SignatureInput {
            r: "123".to_string(),
            s: "456".to_string(),
            z: "0".to_string(),
        };
        assert!(Signature::try_from(input).is_ok());
    }
}
