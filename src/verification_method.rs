use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::loader::DocumentLoader;
use crate::one_or_many::OneOrMany;

/// Properties of a controller document that may embed verification methods.
const EMBEDDING_PROPERTIES: [&str; 4] = [
    "publicKey",
    "verificationMethod",
    "assertionMethod",
    "authentication",
];

/// Key material record a proof's creator dereferences to.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    #[serde(rename = "@context")]
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub context: Value,
    pub id: String,
    #[serde(rename = "type")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    /// Legacy name of `controller`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked: Option<Value>,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

impl VerificationMethod {
    /// The `publicKeyWif` property, if present and a string.
    pub fn public_key_wif(&self) -> Option<&str> {
        self.property_set.get("publicKeyWif").and_then(Value::as_str)
    }

    pub fn controller(&self) -> Option<&str> {
        self.controller.as_deref().or(self.owner.as_deref())
    }
}

/// Dereference a verification method identifier.
///
/// The loaded document is either the method itself or a controller document
/// embedding it. Revoked methods are rejected.
pub async fn resolve_vm(id: &str, loader: &dyn DocumentLoader) -> Result<VerificationMethod, Error> {
    let document = match loader.load(id).await {
        Err(Error::ResourceNotFound(_)) if id.contains('#') => {
            let (base, _fragment) = id.split_once('#').unwrap_or((id, ""));
            loader.load(base).await?
        }
        result => result?,
    };
    let node =
        find_node(document, id).ok_or_else(|| Error::VerificationMethodNotFound(id.to_string()))?;
    let vm: VerificationMethod = serde_json::from_value(node)?;
    if vm.revoked.is_some() {
        log::warn!("verification method {} was revoked", id);
        return Err(Error::VerificationMethodRevoked);
    }
    Ok(vm)
}

fn find_node(document: Value, id: &str) -> Option<Value> {
    let mut object = match document {
        Value::Object(object) => object,
        _ => return None,
    };
    if object.get("id").and_then(Value::as_str) == Some(id) {
        return Some(Value::Object(object));
    }
    let context = object.remove("@context");
    for property in EMBEDDING_PROPERTIES {
        let nodes = match object.remove(property) {
            Some(value) => OneOrMany::<Value>::from(value),
            None => continue,
        };
        for node in nodes {
            if let Value::Object(mut node) = node {
                if node.get("id").and_then(Value::as_str) == Some(id) {
                    if let Some(context) = &context {
                        node.entry("@context").or_insert_with(|| context.clone());
                    }
                    return Some(Value::Object(node));
                }
            }
        }
    }
    None
}
