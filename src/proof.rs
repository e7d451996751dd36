use std::fmt;

use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Property under which legacy suites attach their proofs to a document.
pub const SIGNATURE_PROPERTY: &str = "signature";

/// Context of the proofs handed back by verification when they carry none.
pub const SECURITY_CONTEXT: &str = "https://w3id.org/security/v2";

/// A legacy (2015-style) Linked Data proof, found under a document's
/// `signature` property.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    #[serde(rename = "@context")]
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub context: Value,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>, // W3C date, kept verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_value: Option<String>,
    #[serde(flatten)]
    pub property_set: Map<String, Value>,
}

impl Proof {
    pub fn new(type_: &str) -> Self {
        Self {
            type_: type_.to_string(),
            ..Self::default()
        }
    }

    pub fn with_options(self, options: &SuiteOptions) -> Self {
        Self {
            creator: options.creator.clone(),
            created: Some(w3c_date(&options.date.unwrap_or_else(now_secs))),
            domain: options.domain.clone(),
            nonce: options.nonce.clone(),
            ..self
        }
    }

    /// Identifier of the key that made this proof: `creator`, or
    /// `verificationMethod` for proofs written by newer signers.
    pub fn verification_method(&self) -> Option<&str> {
        self.creator.as_deref().or_else(|| {
            self.property_set
                .get("verificationMethod")
                .and_then(Value::as_str)
        })
    }

    pub fn created_at(&self) -> Result<Option<DateTime<Utc>>, chrono::ParseError> {
        self.created
            .as_deref()
            .map(|created| DateTime::parse_from_rfc3339(created).map(|dt| dt.with_timezone(&Utc)))
            .transpose()
    }
}

/// Current time truncated to whole seconds.
pub fn now_secs() -> DateTime<Utc> {
    let now = Utc::now();
    Utc.timestamp_opt(now.timestamp(), 0).single().unwrap_or(now)
}

/// Format a timestamp the way proofs carry it, e.g. `2018-03-15T00:00:00Z`.
pub fn w3c_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// How the canonicalizer should serialize a document before signing.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalizationMode {
    #[default]
    Compact,
    Native,
}

/// Construction parameters of a suite.
#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct SuiteOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// WIF-encoded secp256k1 private key. Only needed for signing.
    pub private_key_wif: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// P2PKH address of the expected signer. When set, verification does not
    /// take the key from the resolved verification method.
    pub public_key_wif: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// The date of the proof. If omitted system time will be used.
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Domain written into new proofs and required of verified ones.
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    pub canonicalization: CanonicalizationMode,
}

impl SuiteOptions {
    pub fn with_private_key_wif(self, private_key_wif: &str) -> Self {
        Self {
            private_key_wif: Some(private_key_wif.to_string()),
            ..self
        }
    }

    pub fn with_public_key_wif(self, public_key_wif: &str) -> Self {
        Self {
            public_key_wif: Some(public_key_wif.to_string()),
            ..self
        }
    }

    pub fn with_creator(self, creator: &str) -> Self {
        Self {
            creator: Some(creator.to_string()),
            ..self
        }
    }

    pub fn with_date(self, date: DateTime<Utc>) -> Self {
        Self {
            date: Some(date),
            ..self
        }
    }

    pub fn with_domain(self, domain: &str) -> Self {
        Self {
            domain: Some(domain.to_string()),
            ..self
        }
    }

    pub fn with_nonce(self, nonce: &str) -> Self {
        Self {
            nonce: Some(nonce.to_string()),
            ..self
        }
    }

    pub fn with_canonicalization(self, canonicalization: CanonicalizationMode) -> Self {
        Self {
            canonicalization,
            ..self
        }
    }
}

impl fmt::Debug for SuiteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteOptions")
            .field(
                "private_key_wif",
                &self.private_key_wif.as_ref().map(|_| "[redacted]"),
            )
            .field("public_key_wif", &self.public_key_wif)
            .field("creator", &self.creator)
            .field("date", &self.date)
            .field("domain", &self.domain)
            .field("nonce", &self.nonce)
            .field("canonicalization", &self.canonicalization)
            .finish()
    }
}
