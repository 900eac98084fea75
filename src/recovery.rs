//! Algebraic key recovery and candidate verification.

use crate::error::Error;
use crate::math::{mod_inverse, point_x_mod_n};
use crate::signature::Signature;
use k256::{ProjectivePoint, Scalar};

/// Solves the ECDSA signing equation for the private key given a known
/// nonce: d = (s*k - z) * r^-1 mod n.
///
/// This is the only recovery path that is cryptographically meaningful;
/// it presupposes that k is already known.
pub fn recover_private_key(r: &Scalar, s: &Scalar, z: &Scalar, k: &Scalar) -> Result<Scalar, Error> {
    if bool::from(r.is_zero()) {
        return Err(Error::InvalidSignatureComponent);
    }
    if bool::from(k.is_zero()) {
        return Err(Error::InvalidScalar);
    }
    let r_inv = mod_inverse(r).ok_or(Error::InvalidSignatureComponent)?;
    Ok((*s * *k - *z) * r_inv)
}

/// Outcome of checking one (k, d) candidate against a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The candidate pair satisfies the signature equation.
    Match,
    /// The candidate pair does not reproduce s.
    Mismatch,
    /// (k*G).x reduces to zero mod n; the signing equation is undefined
    /// for this nonce and the candidate must be resampled.
    Degenerate,
}

/// Checks whether k^-1 * (z + d * (k*G).x) reproduces the signature's s.
///
/// This is the sole ground-truth check the search loop relies on. The
/// signature's own r component is not consulted here.
pub fn verify_candidate(k: &Scalar, d: &Scalar, sig: &Signature) -> Result<Verdict, Error> {
    if bool::from(k.is_zero()) {
        return Err(Error::InvalidScalar);
    }
    let r_point = ProjectivePoint::GENERATOR * *k;
    let r_x = point_x_mod_n(&r_point)?;
    if bool::from(r_x.is_zero()) {
        return Ok(Verdict::Degenerate);
    }
    let k_inv = mod_inverse(k).ok_or(Error::InvalidScalar)?;
    let s_calc = k_inv * (sig.z + *d * r_x);
    if s_calc == sig.s {
        Ok(Verdict::Match)
    } else {
        Ok(Verdict::Mismatch)
    }
}

/// Forward signing equation: r = (k*G).x mod n, s = k^-1 * (z + d*r).
///
/// Returns `None` for a degenerate nonce. Intended for building test
/// vectors and fixtures from a known (d, k) pair.
pub fn signature_components(
    d: &Scalar,
    k: &Scalar,
    z: &Scalar,
) -> Result<Option<(Scalar, Scalar)>, Error> {
    if bool::from(k.is_zero()) || bool::from(d.is_zero()) {
        return Err(Error::InvalidScalar);
    }
    let r_point = ProjectivePoint::GENERATOR * *k;
    let r = point_x_mod_n(&r_point)?;
    if bool::from(r.is_zero()) {
        return Ok(None);
    }
    let k_inv = mod_inverse(k).ok_or(Error::InvalidScalar)?;
    Ok(Some((r, k_inv * (*z + *d * r))))
}
