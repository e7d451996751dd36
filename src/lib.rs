//! The `EcdsaKoblitzSignature2016` Linked Data Signature suite.
//!
//! Documents are signed with a secp256k1 key following the Bitcoin
//! "signed message" convention: the verify data (Dublin Core proof headers
//! followed by the canonical document) is hashed with the
//! `Bitcoin Signed Message:\n` prefix and signed with recoverable ECDSA. The
//! Base64 signature is stored in the proof's `signatureValue`, under the
//! document's legacy `signature` property.
//!
//! Signing keys are given in [Wallet Import Format][wif]. Verification keys
//! are identified by their P2PKH [address][address], found under the
//! `publicKeyWif` property of the verification method the proof's `creator`
//! points at.
//!
//! [wif]: <https://en.bitcoin.it/wiki/Wallet_import_format>
//! [address]: <https://en.bitcoin.it/wiki/Technical_background_of_version_1_Bitcoin_addresses>
//!
//! # Basic Usage
//!
//! ```
//! use serde_json::json;
//! use ssi_ecdsa_koblitz::{
//!     EcdsaKoblitzSignature2016, LinkedDataSignatures, PublicKeyProofPurpose, StaticLoader,
//!     SuiteOptions,
//! };
//!
//! # async_std::task::block_on(async {
//! let loader = StaticLoader::new()
//!     .with_document("https://example.com/i/alice/keys/1", json!({
//!         "id": "https://example.com/i/alice/keys/1",
//!         "owner": "https://example.com/i/alice",
//!         "publicKeyWif": "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"
//!     }))
//!     .with_document("https://example.com/i/alice", json!({
//!         "id": "https://example.com/i/alice",
//!         "publicKey": ["https://example.com/i/alice/keys/1"]
//!     }));
//!
//! let suite = EcdsaKoblitzSignature2016::new(
//!     SuiteOptions::default()
//!         .with_private_key_wif("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn")
//!         .with_creator("https://example.com/i/alice/keys/1"),
//! );
//! let ldp = LinkedDataSignatures::default();
//! let purpose = PublicKeyProofPurpose::new();
//! let signed = ldp
//!     .sign(json!({"name": "Alice"}), &suite, &purpose, &loader)
//!     .await
//!     .unwrap();
//!
//! let result = ldp
//!     .verify(&signed, &EcdsaKoblitzSignature2016::default(), &purpose, &loader)
//!     .await;
//! assert!(result.verified);
//! # });
//! ```

pub mod canonicalize;
pub mod error;
pub mod hash;
pub mod key;
pub mod ldp;
pub mod loader;
pub mod message;
pub mod one_or_many;
pub mod proof;
pub mod purpose;
pub mod suite;
pub mod suites;
pub mod verification_method;

pub use canonicalize::{create_verify_data, Canonicalizer, JcsCanonicalizer};
pub use error::Error;
pub use key::{Address, KeyFormatError, Network, PrivateKeyWif};
pub use ldp::{LinkedDataSignatures, ProofResult, VerificationResult};
pub use loader::{DocumentLoader, StaticLoader};
pub use message::{sign_message, verify_message, SignatureFormatError};
pub use one_or_many::OneOrMany;
pub use proof::{
    CanonicalizationMode, Proof, SuiteOptions, SECURITY_CONTEXT, SIGNATURE_PROPERTY,
};
pub use purpose::{ControllerProofPurpose, ProofPurpose, PublicKeyProofPurpose};
pub use suite::{ProofSuite, SignatureVerifier};
pub use suites::{EcdsaKoblitzSignature2016, ResolvedKoblitzSignature2016};
pub use verification_method::{resolve_vm, VerificationMethod};
