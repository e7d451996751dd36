//! Proof purposes: what a proof is for, and who may make one.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::error::Error;
use crate::loader::DocumentLoader;
use crate::one_or_many::OneOrMany;
use crate::proof::Proof;
use crate::verification_method::VerificationMethod;

/// Term under which legacy controller documents list their keys.
pub const PUBLIC_KEY_TERM: &str = "publicKey";

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ProofPurpose: Sync {
    /// Add purpose-specific properties to a proof about to be signed.
    fn update(&self, proof: Proof) -> Proof {
        proof
    }

    /// Whether this purpose is responsible for checking `proof`.
    fn matches(&self, proof: &Proof) -> bool;

    /// Check a proof whose signature has already been verified.
    async fn validate(
        &self,
        proof: &Proof,
        verification_method: &VerificationMethod,
        loader: &dyn DocumentLoader,
    ) -> Result<(), Error>;
}

/// Requires the verification method's controller to list the method under
/// `term`, and optionally bounds how far the proof's creation date may be
/// from `date`.
#[derive(Debug, Clone)]
pub struct ControllerProofPurpose {
    pub term: String,
    /// Controller document to check against instead of loading the one the
    /// verification method names.
    pub controller: Option<Value>,
    /// Reference time for the timestamp check; now if unset.
    pub date: Option<DateTime<Utc>>,
    /// Largest accepted distance between `created` and `date`; unbounded if
    /// unset.
    pub max_timestamp_delta: Option<Duration>,
}

impl ControllerProofPurpose {
    pub fn new(term: &str) -> Self {
        Self {
            term: term.to_string(),
            controller: None,
            date: None,
            max_timestamp_delta: None,
        }
    }

    pub fn with_controller(self, controller: Value) -> Self {
        Self {
            controller: Some(controller),
            ..self
        }
    }

    pub fn with_date(self, date: DateTime<Utc>) -> Self {
        Self {
            date: Some(date),
            ..self
        }
    }

    pub fn with_max_timestamp_delta(self, max_timestamp_delta: Duration) -> Self {
        Self {
            max_timestamp_delta: Some(max_timestamp_delta),
            ..self
        }
    }

    fn check_timestamp(&self, proof: &Proof) -> Result<(), Error> {
        let max_delta = match self.max_timestamp_delta {
            Some(max_delta) => max_delta,
            None => return Ok(()),
        };
        let expected = self.date.unwrap_or_else(Utc::now);
        let created = match proof.created_at() {
            Ok(Some(created)) => created,
            _ => return Err(Error::TimestampOutOfRange),
        };
        if created < expected - max_delta || created > expected + max_delta {
            return Err(Error::TimestampOutOfRange);
        }
        Ok(())
    }

    async fn controller_document(
        &self,
        verification_method: &VerificationMethod,
        loader: &dyn DocumentLoader,
    ) -> Result<Value, Error> {
        if let Some(controller) = &self.controller {
            return Ok(controller.clone());
        }
        let controller_id = verification_method
            .controller()
            .ok_or_else(|| Error::MissingController(verification_method.id.clone()))?;
        loader.load(controller_id).await
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ProofPurpose for ControllerProofPurpose {
    fn update(&self, mut proof: Proof) -> Proof {
        proof
            .property_set
            .insert("proofPurpose".to_string(), Value::String(self.term.clone()));
        proof
    }

    fn matches(&self, proof: &Proof) -> bool {
        let purpose = proof.property_set.get("proofPurpose");
        purpose.and_then(Value::as_str) == Some(self.term.as_str())
    }

    async fn validate(
        &self,
        proof: &Proof,
        verification_method: &VerificationMethod,
        loader: &dyn DocumentLoader,
    ) -> Result<(), Error> {
        self.check_timestamp(proof)?;
        let controller = self.controller_document(verification_method, loader).await?;
        let vm_id = verification_method.id.as_str();
        let authorized = controller
            .get(&self.term)
            .cloned()
            .map(OneOrMany::<Value>::from)
            .map(|entries| entries.any(|entry| node_id(entry) == Some(vm_id)))
            .unwrap_or(false);
        if !authorized {
            return Err(Error::UnauthorizedVerificationMethod(
                verification_method.id.clone(),
                self.term.clone(),
            ));
        }
        Ok(())
    }
}

/// The legacy purpose of 2015-style signatures: the key must be listed under
/// its controller's `publicKey`. Proofs carry no `proofPurpose` property.
#[derive(Debug, Clone)]
pub struct PublicKeyProofPurpose(ControllerProofPurpose);

impl Default for PublicKeyProofPurpose {
    fn default() -> Self {
        Self(ControllerProofPurpose::new(PUBLIC_KEY_TERM))
    }
}

impl PublicKeyProofPurpose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_controller(self, controller: Value) -> Self {
        Self(self.0.with_controller(controller))
    }

    pub fn with_date(self, date: DateTime<Utc>) -> Self {
        Self(self.0.with_date(date))
    }

    pub fn with_max_timestamp_delta(self, max_timestamp_delta: Duration) -> Self {
        Self(self.0.with_max_timestamp_delta(max_timestamp_delta))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ProofPurpose for PublicKeyProofPurpose {
    fn matches(&self, proof: &Proof) -> bool {
        !proof.property_set.contains_key("proofPurpose")
    }

    async fn validate(
        &self,
        proof: &Proof,
        verification_method: &VerificationMethod,
        loader: &dyn DocumentLoader,
    ) -> Result<(), Error> {
        self.0.validate(proof, verification_method, loader).await
    }
}

fn node_id(node: &Value) -> Option<&str> {
    match node {
        Value::String(id) => Some(id),
        Value::Object(object) => object.get("id").and_then(Value::as_str),
        _ => None,
    }
}
