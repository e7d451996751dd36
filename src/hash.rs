//! Cryptographic hash functions
//!
//! Bitcoin-style compositions of SHA-256 and RIPEMD-160 used by the message
//! signing protocol and address derivation.

/// SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    Sha256::digest(data).into()
}

/// Double SHA-256, `SHA256(SHA256(data))`.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// `RIPEMD160(SHA256(data))`, the hash committed to by P2PKH addresses.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    use ripemd160::{Digest, Ripemd160};
    let digest = Ripemd160::digest(&sha256(data));
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&digest);
    hash
}
