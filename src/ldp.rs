//! Signing and verification of documents carrying legacy `signature` proofs.

use serde_json::{Map, Value};

use crate::canonicalize::{create_verify_data, Canonicalizer, JcsCanonicalizer};
use crate::error::Error;
use crate::loader::DocumentLoader;
use crate::one_or_many::OneOrMany;
use crate::proof::{Proof, SECURITY_CONTEXT, SIGNATURE_PROPERTY};
use crate::purpose::ProofPurpose;
use crate::suite::{ProofSuite, SignatureVerifier};
use crate::verification_method::VerificationMethod;

/// Outcome of checking one proof.
#[derive(Debug)]
pub struct ProofResult {
    pub proof: Proof,
    pub verified: bool,
    pub verification_method: Option<VerificationMethod>,
    pub error: Option<Error>,
}

/// Outcome of checking a document.
#[derive(Debug, Default)]
pub struct VerificationResult {
    /// True only when at least one proof matched and every matching proof
    /// verified.
    pub verified: bool,
    pub results: Vec<ProofResult>,
    /// Failure that prevented checking individual proofs.
    pub error: Option<Error>,
}

impl VerificationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(err: Error) -> Self {
        Self {
            verified: false,
            results: Vec::new(),
            error: Some(err),
        }
    }

    /// Errors of all failed proofs, then the document-level one.
    pub fn errors(&self) -> impl Iterator<Item = &Error> + '_ {
        self.results
            .iter()
            .filter_map(|result| result.error.as_ref())
            .chain(self.error.as_ref())
    }
}

/// Adds and checks proofs of a [`ProofSuite`] on JSON documents.
pub struct LinkedDataSignatures {
    canonicalizer: Box<dyn Canonicalizer>,
}

impl Default for LinkedDataSignatures {
    fn default() -> Self {
        Self::new(Box::new(JcsCanonicalizer))
    }
}

impl LinkedDataSignatures {
    pub fn new(canonicalizer: Box<dyn Canonicalizer>) -> Self {
        Self { canonicalizer }
    }

    /// Sign `document` with `suite`, appending the new proof to any existing
    /// ones.
    pub async fn sign<S: ProofSuite>(
        &self,
        document: Value,
        suite: &S,
        purpose: &dyn ProofPurpose,
        loader: &dyn DocumentLoader,
    ) -> Result<Value, Error> {
        let mut object = match document {
            Value::Object(object) => object,
            _ => return Err(Error::ExpectedJsonObject),
        };
        let proof = Proof::new(suite.proof_type()).with_options(suite.options());
        let proof = purpose.update(proof);
        let verify_data = create_verify_data(
            &Value::Object(object.clone()),
            &proof,
            self.canonicalizer.as_ref(),
            suite.options().canonicalization,
            loader,
        )
        .await?;
        let proof = suite.sign(&verify_data, proof).await?;
        log::debug!(
            "signed document with {} proof from {:?}",
            proof.type_,
            proof.creator
        );
        let proof = serde_json::to_value(proof)?;
        let signatures = match object.remove(SIGNATURE_PROPERTY) {
            Some(existing) => OneOrMany::<Value>::from(existing).push(proof),
            None => OneOrMany::One(proof),
        };
        object.insert(SIGNATURE_PROPERTY.to_string(), serde_json::to_value(signatures)?);
        Ok(Value::Object(object))
    }

    /// Verify every proof of `suite`'s type on `document` that `purpose`
    /// applies to.
    pub async fn verify<S: ProofSuite>(
        &self,
        document: &Value,
        suite: &S,
        purpose: &dyn ProofPurpose,
        loader: &dyn DocumentLoader,
    ) -> VerificationResult {
        let proofs = match matching_proofs(document, suite.proof_type()) {
            Ok(proofs) => proofs,
            Err(err) => return VerificationResult::error(err),
        };
        let proofs: Vec<Proof> = proofs
            .into_iter()
            .filter(|proof| purpose.matches(proof))
            .collect();
        if proofs.is_empty() {
            return VerificationResult::error(Error::NoMatchingProofs);
        }

        let mut results = Vec::with_capacity(proofs.len());
        for mut proof in proofs {
            let outcome = self
                .verify_proof(document, &proof, suite, purpose, loader)
                .await;
            if proof.context.is_null() {
                proof.context = Value::String(SECURITY_CONTEXT.to_string());
            }
            let result = match outcome {
                Ok(vm) => ProofResult {
                    proof,
                    verified: true,
                    verification_method: Some(vm),
                    error: None,
                },
                Err(err) => {
                    log::warn!("proof from {:?} failed: {}", proof.verification_method(), err);
                    ProofResult {
                        proof,
                        verified: false,
                        verification_method: None,
                        error: Some(err),
                    }
                }
            };
            results.push(result);
        }
        VerificationResult {
            verified: results.iter().all(|result| result.verified),
            results,
            error: None,
        }
    }

    async fn verify_proof<S: ProofSuite>(
        &self,
        document: &Value,
        proof: &Proof,
        suite: &S,
        purpose: &dyn ProofPurpose,
        loader: &dyn DocumentLoader,
    ) -> Result<VerificationMethod, Error> {
        let (vm, verifier) = suite.get_verification_method(proof, loader).await?;
        let verify_data = create_verify_data(
            document,
            proof,
            self.canonicalizer.as_ref(),
            suite.options().canonicalization,
            loader,
        )
        .await?;
        match verifier.verify_signature(&verify_data, proof).await {
            Ok(true) => {}
            Ok(false) => {
                log::debug!("signature does not match {}", vm.id);
                return Err(Error::InvalidSignature);
            }
            Err(err) => {
                log::debug!("unable to verify signature for {}: {}", vm.id, err);
                return Err(Error::InvalidSignature);
            }
        }
        if let Some(expected) = &suite.options().domain {
            if proof.domain.as_ref() != Some(expected) {
                return Err(Error::DomainMismatch {
                    found: proof.domain.clone().unwrap_or_default(),
                    expected: expected.clone(),
                });
            }
        }
        purpose.validate(proof, &vm, loader).await?;
        Ok(vm)
    }
}

/// Proofs of type `proof_type` under the document's `signature` property.
fn matching_proofs(document: &Value, proof_type: &str) -> Result<Vec<Proof>, Error> {
    let object: &Map<String, Value> = document.as_object().ok_or(Error::ExpectedJsonObject)?;
    let signatures = match object.get(SIGNATURE_PROPERTY) {
        Some(signatures) => OneOrMany::<Value>::from(signatures.clone()),
        None => return Ok(Vec::new()),
    };
    signatures
        .into_iter()
        .filter(|proof| proof.get("type").and_then(Value::as_str) == Some(proof_type))
        .map(|proof| serde_json::from_value(proof).map_err(Error::from))
        .collect()
}
