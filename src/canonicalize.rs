//! Document canonicalization and verify-data construction.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Error;
use crate::loader::DocumentLoader;
use crate::proof::{CanonicalizationMode, Proof, SIGNATURE_PROPERTY};

const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";

/// Deterministic serialization of a JSON document.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Canonicalizer: Send + Sync {
    async fn canonize(
        &self,
        document: &Value,
        mode: CanonicalizationMode,
        loader: &dyn DocumentLoader,
    ) -> Result<String, Error>;
}

/// JSON Canonicalization Scheme (RFC 8785). Needs no remote contexts, so
/// neither the mode nor the loader affect the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct JcsCanonicalizer;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Canonicalizer for JcsCanonicalizer {
    async fn canonize(
        &self,
        document: &Value,
        _mode: CanonicalizationMode,
        _loader: &dyn DocumentLoader,
    ) -> Result<String, Error> {
        Ok(serde_jcs::to_string(document)?)
    }
}

/// Build the bytes a legacy proof signs: Dublin Core headers taken from the
/// proof, followed by the canonical form of the document without its
/// `signature` property.
pub async fn create_verify_data(
    document: &Value,
    proof: &Proof,
    canonicalizer: &dyn Canonicalizer,
    mode: CanonicalizationMode,
    loader: &dyn DocumentLoader,
) -> Result<Vec<u8>, Error> {
    let mut document = document.as_object().ok_or(Error::ExpectedJsonObject)?.clone();
    document.remove(SIGNATURE_PROPERTY);
    let c14n = canonicalizer
        .canonize(&Value::Object(document), mode, loader)
        .await?;

    let headers = [
        ("created", &proof.created),
        ("creator", &proof.creator),
        ("domain", &proof.domain),
        ("nonce", &proof.nonce),
    ];
    let mut verify_data = String::new();
    for (name, value) in headers {
        if let Some(value) = value {
            verify_data.push_str(DC_NAMESPACE);
            verify_data.push_str(name);
            verify_data.push_str(": ");
            verify_data.push_str(value);
            verify_data.push('\n');
        }
    }
    verify_data.push_str(&c14n);
    Ok(verify_data.into_bytes())
}
