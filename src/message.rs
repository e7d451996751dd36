//! Bitcoin signed messages.
//!
//! A message is prefixed with the `Bitcoin Signed Message:\n` magic, both
//! parts length-prefixed with a Bitcoin varint, and hashed with double
//! SHA-256. The hash is signed with recoverable ECDSA over secp256k1 and the
//! signature is transported as 65 bytes (`header || r || s`) encoded in
//! Base64, where `header = 27 + recovery id (+ 4 for compressed keys)`.
//!
//! Verification recovers the public key from the signature and compares its
//! address with the expected one.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};

use crate::error::Error;
use crate::hash::sha256d;
use crate::key::{Address, PrivateKeyWif};

pub const MAGIC: &[u8] = b"Bitcoin Signed Message:\n";

const COMPACT_SIGNATURE_LEN: usize = 65;
const HEADER_BASE: u8 = 27;
const HEADER_COMPRESSED: u8 = 4;

#[derive(thiserror::Error, Debug)]
pub enum SignatureFormatError {
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),
    #[error("Expected a {COMPACT_SIGNATURE_LEN}-byte compact signature, found {0} bytes")]
    InvalidLength(usize),
    #[error("Invalid compact signature header: {0}")]
    InvalidHeader(u8),
    #[error("Invalid signature scalars")]
    InvalidScalars,
}

/// Append `n` to `out` as a Bitcoin variable-length integer.
pub fn write_varint(out: &mut Vec<u8>, n: u64) {
    if n < 0xfd {
        out.push(n as u8);
    } else if n <= 0xffff {
        out.push(0xfd);
        out.extend_from_slice(&(n as u16).to_le_bytes());
    } else if n <= 0xffff_ffff {
        out.push(0xfe);
        out.extend_from_slice(&(n as u32).to_le_bytes());
    } else {
        out.push(0xff);
        out.extend_from_slice(&n.to_le_bytes());
    }
}

/// The digest actually signed for `message`.
pub fn magic_hash(message: &[u8]) -> [u8; 32] {
    let mut data = Vec::with_capacity(MAGIC.len() + message.len() + 10);
    write_varint(&mut data, MAGIC.len() as u64);
    data.extend_from_slice(MAGIC);
    write_varint(&mut data, message.len() as u64);
    data.extend_from_slice(message);
    sha256d(&data)
}

/// Sign `message` and return the Base64 compact signature.
pub fn sign_message(message: &[u8], key: &PrivateKeyWif) -> Result<String, Error> {
    let signing_key = SigningKey::from(key.secret_key().clone());
    let hash = magic_hash(message);
    let (sig, rec_id) = signing_key
        .sign_prehash_recoverable(&hash)
        .map_err(|_| Error::SigningFailed)?;
    let mut sig_bytes = Vec::with_capacity(COMPACT_SIGNATURE_LEN);
    let compressed = if key.compressed() { HEADER_COMPRESSED } else { 0 };
    sig_bytes.push(HEADER_BASE + compressed + rec_id.to_byte());
    sig_bytes.extend_from_slice(&sig.to_bytes());
    Ok(base64::encode(&sig_bytes))
}

/// Decoded compact signature.
struct CompactSignature {
    sig: Signature,
    rec_id: RecoveryId,
    compressed: bool,
}

impl CompactSignature {
    fn decode(signature: &str) -> Result<Self, SignatureFormatError> {
        let bytes = base64::decode(signature)?;
        if bytes.len() != COMPACT_SIGNATURE_LEN {
            return Err(SignatureFormatError::InvalidLength(bytes.len()));
        }
        let header = bytes[0];
        if !(HEADER_BASE..HEADER_BASE + 2 * HEADER_COMPRESSED).contains(&header) {
            return Err(SignatureFormatError::InvalidHeader(header));
        }
        let compressed = header - HEADER_BASE >= HEADER_COMPRESSED;
        let rec_id = RecoveryId::from_byte((header - HEADER_BASE) % HEADER_COMPRESSED)
            .ok_or(SignatureFormatError::InvalidHeader(header))?;
        let sig =
            Signature::from_slice(&bytes[1..]).map_err(|_| SignatureFormatError::InvalidScalars)?;
        // Other wallets may emit high-S signatures; negating s flips the
        // parity of the recovered point.
        let (sig, rec_id) = match sig.normalize_s() {
            Some(low) => (low, RecoveryId::new(!rec_id.is_y_odd(), rec_id.is_x_reduced())),
            None => (sig, rec_id),
        };
        Ok(Self {
            sig,
            rec_id,
            compressed,
        })
    }
}

/// Verify a Base64 compact `signature` of `message` against a P2PKH `address`.
///
/// Returns `Ok(false)` when the signature is well-formed but was not produced
/// by the key behind `address` for this message. Malformed signatures and
/// addresses are errors.
pub fn verify_message(message: &[u8], signature: &str, address: &str) -> Result<bool, Error> {
    let compact = CompactSignature::decode(signature)?;
    let expected: Address = address.parse()?;
    let hash = magic_hash(message);
    let recovered = match VerifyingKey::recover_from_prehash(&hash, &compact.sig, compact.rec_id)
    {
        Ok(key) => key,
        Err(_) => {
            log::debug!("Unable to recover a public key from the signature");
            return Ok(false);
        }
    };
    let point = recovered.to_encoded_point(compact.compressed);
    let actual = Address::from_sec1_bytes(point.as_bytes(), expected.network());
    Ok(actual == expected)
}
