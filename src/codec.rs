//! Public key derivation and Base58Check address encoding.

use crate::error::Error;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{ProjectivePoint, Scalar};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Version byte for mainnet pay-to-pubkey-hash addresses.
const VERSION_P2PKH: u8 = 0x00;

/// Computes the public key point d * G.
pub fn derive_public_key(d: &Scalar) -> Result<ProjectivePoint, Error> {
    if bool::from(d.is_zero()) {
        return Err(Error::InvalidScalar);
    }
    Ok(ProjectivePoint::GENERATOR * *d)
}

/// SEC1 uncompressed encoding: 0x04 followed by the big-endian x and y
/// coordinates, 65 bytes total.
pub fn encode_uncompressed(point: &ProjectivePoint) -> Result<[u8; 65], Error> {
    if *point == ProjectivePoint::IDENTITY {
        return Err(Error::PointAtInfinity);
    }
    let encoded = point.to_affine().to_encoded_point(false);
    let bytes = encoded.as_bytes();
    let mut out = [0u8; 65];
    out.copy_from_slice(bytes);
    Ok(out)
}

/// Base58Check address for a serialized public key.
///
/// HASH160 of the key bytes, prefixed with the version byte, followed by
/// the first four bytes of the double SHA-256 checksum.
pub fn to_address(pubkey: &[u8]) -> String {
    let sha = Sha256::digest(pubkey);
    let ripemd = Ripemd160::digest(sha);

    let mut payload = Vec::with_capacity(25);
    payload.push(VERSION_P2PKH);
    payload.extend_from_slice(&ripemd);

    let checksum = Sha256::digest(Sha256::digest(&payload));
    payload.extend_from_slice(&checksum[..4]);

    bs58::encode(payload).into_string()
}

/// Address of the public key derived from a private scalar.
pub fn address_for_private_key(d: &Scalar) -> Result<String, Error> {
    let point = derive_public_key(d)?;
    let pubkey = encode_uncompressed(&point)?;
    Ok(to_address(&pubkey))
}
