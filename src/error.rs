//! Error types for curve arithmetic and key recovery.

/// Errors raised by curve arithmetic and recovery operations.
///
/// Each variant is fatal to the single operation that raised it, never to
/// the surrounding search loop or process. Degenerate nonces during search
/// and exhaustion of the attempt budget are values, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A zero or out-of-range scalar was supplied to curve arithmetic.
    #[error("scalar is zero or not in [1, n-1]")]
    InvalidScalar,

    /// Affine coordinates were requested for the point at infinity.
    #[error("point at infinity has no affine coordinates")]
    PointAtInfinity,

    /// The signature's r component is congruent to zero modulo the curve
    /// order. The signature is malformed and must be rejected as a whole.
    #[error("signature component r is zero modulo the curve order")]
    InvalidSignatureComponent,
}
