use async_trait::async_trait;

use crate::error::Error;
use crate::loader::DocumentLoader;
use crate::proof::{Proof, SuiteOptions};
use crate::verification_method::VerificationMethod;

/// A Linked Data proof suite as seen by the signing and verification
/// orchestration.
///
/// Verification is two-phase: [`ProofSuite::get_verification_method`]
/// resolves the key material for one proof and hands back a
/// [`SignatureVerifier`] bound to it, leaving the suite itself untouched.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ProofSuite: Sync {
    type Verifier: SignatureVerifier + Send + Sync;

    /// Value of the proof's `type` property.
    fn proof_type(&self) -> &str;

    fn options(&self) -> &SuiteOptions;

    /// Sign `verify_data` and write the signature into `proof`.
    async fn sign(&self, verify_data: &[u8], proof: Proof) -> Result<Proof, Error>;

    async fn get_verification_method(
        &self,
        proof: &Proof,
        loader: &dyn DocumentLoader,
    ) -> Result<(VerificationMethod, Self::Verifier), Error>;
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SignatureVerifier: Sync {
    /// Check the signature carried by `proof` over `verify_data`.
    ///
    /// `Ok(false)` means the signature does not match; malformed input is an
    /// error.
    async fn verify_signature(&self, verify_data: &[u8], proof: &Proof) -> Result<bool, Error>;
}
