use async_trait::async_trait;

use crate::error::Error;
use crate::key::PrivateKeyWif;
use crate::loader::DocumentLoader;
use crate::message::{sign_message, verify_message};
use crate::proof::{Proof, SuiteOptions};
use crate::suite::{ProofSuite, SignatureVerifier};
use crate::verification_method::{resolve_vm, VerificationMethod};

/// Legacy secp256k1 suite signing verify data as a Bitcoin signed message.
///
/// Keys are a WIF private key for signing and a P2PKH address
/// (`publicKeyWif`) for verification.
#[derive(Debug, Clone, Default)]
pub struct EcdsaKoblitzSignature2016 {
    options: SuiteOptions,
}

impl EcdsaKoblitzSignature2016 {
    pub const TYPE: &'static str = "EcdsaKoblitzSignature2016";

    pub fn new(options: SuiteOptions) -> Self {
        Self { options }
    }

    fn private_key(&self) -> Result<PrivateKeyWif, Error> {
        let wif = self
            .options
            .private_key_wif
            .as_deref()
            .ok_or(Error::MissingPrivateKey)?;
        PrivateKeyWif::decode(wif).map_err(Error::InvalidPrivateKey)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ProofSuite for EcdsaKoblitzSignature2016 {
    type Verifier = ResolvedKoblitzSignature2016;

    fn proof_type(&self) -> &str {
        Self::TYPE
    }

    fn options(&self) -> &SuiteOptions {
        &self.options
    }

    async fn sign(&self, verify_data: &[u8], mut proof: Proof) -> Result<Proof, Error> {
        let key = self.private_key()?;
        proof.signature_value = Some(sign_message(verify_data, &key)?);
        Ok(proof)
    }

    async fn get_verification_method(
        &self,
        proof: &Proof,
        loader: &dyn DocumentLoader,
    ) -> Result<(VerificationMethod, Self::Verifier), Error> {
        let id = proof
            .verification_method()
            .ok_or(Error::MissingVerificationMethod)?;
        let vm = resolve_vm(id, loader).await?;
        let resolved_key = vm.public_key_wif().ok_or(Error::UnknownPublicKeyEncoding)?;
        let public_key_wif = match &self.options.public_key_wif {
            Some(configured) => configured.clone(),
            None => resolved_key.to_string(),
        };
        Ok((vm, ResolvedKoblitzSignature2016::new(public_key_wif)))
    }
}

/// [`EcdsaKoblitzSignature2016`] bound to the address a proof must verify
/// against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKoblitzSignature2016 {
    public_key_wif: String,
}

impl ResolvedKoblitzSignature2016 {
    pub fn new(public_key_wif: String) -> Self {
        Self { public_key_wif }
    }

    pub fn public_key_wif(&self) -> &str {
        &self.public_key_wif
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SignatureVerifier for ResolvedKoblitzSignature2016 {
    async fn verify_signature(&self, verify_data: &[u8], proof: &Proof) -> Result<bool, Error> {
        let signature = proof
            .signature_value
            .as_deref()
            .ok_or(Error::MissingProofSignature)?;
        verify_message(verify_data, signature, &self.public_key_wif)
    }
}
