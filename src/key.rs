//! secp256k1 key encodings: Wallet Import Format private keys and
//! Base58Check P2PKH addresses.

use std::fmt;
use std::str::FromStr;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{PublicKey, SecretKey};
use zeroize::Zeroizing;

use crate::hash::hash160;

const COMPRESSED_FLAG: u8 = 0x01;

#[derive(thiserror::Error, Debug)]
pub enum KeyFormatError {
    #[error(transparent)]
    Base58(#[from] bs58::decode::Error),
    #[error("Unexpected payload length: {0}")]
    InvalidLength(usize),
    #[error("Unknown version byte: 0x{0:02x}")]
    UnknownVersion(u8),
    #[error("Invalid compression flag: 0x{0:02x}")]
    InvalidCompressionFlag(u8),
    #[error("Invalid secp256k1 secret key")]
    InvalidSecretKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn wif_version(self) -> u8 {
        match self {
            Self::Mainnet => 0x80,
            Self::Testnet => 0xef,
        }
    }

    pub fn address_version(self) -> u8 {
        match self {
            Self::Mainnet => 0x00,
            Self::Testnet => 0x6f,
        }
    }

    fn from_wif_version(version: u8) -> Option<Self> {
        match version {
            0x80 => Some(Self::Mainnet),
            0xef => Some(Self::Testnet),
            _ => None,
        }
    }

    fn from_address_version(version: u8) -> Option<Self> {
        match version {
            0x00 => Some(Self::Mainnet),
            0x6f => Some(Self::Testnet),
            _ => None,
        }
    }
}

/// A secp256k1 private key in Wallet Import Format.
///
/// The compression flag decides which SEC1 form of the public key (and
/// therefore which address) the key stands for.
#[derive(Clone)]
pub struct PrivateKeyWif {
    secret_key: SecretKey,
    network: Network,
    compressed: bool,
}

impl PrivateKeyWif {
    pub fn new(secret_key: SecretKey, network: Network, compressed: bool) -> Self {
        Self {
            secret_key,
            network,
            compressed,
        }
    }

    pub fn decode(wif: &str) -> Result<Self, KeyFormatError> {
        let payload = Zeroizing::new(bs58::decode(wif).with_check(None).into_vec()?);
        let compressed = match payload.len() {
            33 => false,
            34 => match payload[33] {
                COMPRESSED_FLAG => true,
                flag => return Err(KeyFormatError::InvalidCompressionFlag(flag)),
            },
            len => return Err(KeyFormatError::InvalidLength(len)),
        };
        let network =
            Network::from_wif_version(payload[0]).ok_or(KeyFormatError::UnknownVersion(payload[0]))?;
        let secret_key =
            SecretKey::from_slice(&payload[1..33]).map_err(|_| KeyFormatError::InvalidSecretKey)?;
        Ok(Self {
            secret_key,
            network,
            compressed,
        })
    }

    pub fn encode(&self) -> String {
        let mut payload = Zeroizing::new(Vec::with_capacity(34));
        payload.push(self.network.wif_version());
        payload.extend_from_slice(&self.secret_key.to_bytes());
        if self.compressed {
            payload.push(COMPRESSED_FLAG);
        }
        bs58::encode(payload.as_slice()).with_check().into_string()
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn compressed(&self) -> bool {
        self.compressed
    }

    pub fn public_key(&self) -> PublicKey {
        self.secret_key.public_key()
    }

    pub fn address(&self) -> Address {
        let point = self.public_key().to_encoded_point(self.compressed);
        Address::from_sec1_bytes(point.as_bytes(), self.network)
    }
}

impl FromStr for PrivateKeyWif {
    type Err = KeyFormatError;

    fn from_str(wif: &str) -> Result<Self, Self::Err> {
        Self::decode(wif)
    }
}

impl fmt::Debug for PrivateKeyWif {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyWif")
            .field("network", &self.network)
            .field("compressed", &self.compressed)
            .finish_non_exhaustive()
    }
}

/// Pay-to-public-key-hash address, the `publicKeyWif` encoding of a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    network: Network,
    hash: [u8; 20],
}

impl Address {
    /// Hash a SEC1-encoded public key (compressed or not) into an address.
    pub fn from_sec1_bytes(pk_bytes: &[u8], network: Network) -> Self {
        Self {
            network,
            hash: hash160(pk_bytes),
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn hash(&self) -> &[u8; 20] {
        &self.hash
    }
}

impl FromStr for Address {
    type Err = KeyFormatError;

    fn from_str(address: &str) -> Result<Self, Self::Err> {
        let payload = bs58::decode(address).with_check(None).into_vec()?;
        if payload.len() != 21 {
            return Err(KeyFormatError::InvalidLength(payload.len()));
        }
        let network = Network::from_address_version(payload[0])
            .ok_or(KeyFormatError::UnknownVersion(payload[0]))?;
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&payload[1..]);
        Ok(Self { network, hash })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut extended_ripemd160 = Vec::with_capacity(21);
        extended_ripemd160.push(self.network.address_version());
        extended_ripemd160.extend_from_slice(&self.hash);
        f.write_str(&bs58::encode(&extended_ripemd160).with_check().into_string())
    }
}
