use crate::key::KeyFormatError;
use crate::message::SignatureFormatError;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("\"privateKeyWif\" must be a base58 formatted string.")]
    MissingPrivateKey,
    #[error("Invalid private key, \"privateKeyWif\" must be a base58 formatted string: {0}")]
    InvalidPrivateKey(#[source] KeyFormatError),
    #[error("Unknown public key encoding. Public key encoding must be \"publicKeyWif\".")]
    UnknownPublicKeyEncoding,
    #[error("Missing Verification Method")]
    MissingVerificationMethod,
    #[error("Verification method {0} not found.")]
    VerificationMethodNotFound(String),
    #[error("The verification method has been revoked.")]
    VerificationMethodRevoked,
    #[error("Missing Proof Signature")]
    MissingProofSignature,
    #[error("Unable to compute signature")]
    SigningFailed,
    /// Reported by the orchestration layer for every proof whose signature
    /// check did not succeed.
    #[error("Invalid signature.")]
    InvalidSignature,
    #[error("The proof's created timestamp is out of range.")]
    TimestampOutOfRange,
    #[error("The domain is not as expected; domain=\"{found}\", expected=\"{expected}\"")]
    DomainMismatch { found: String, expected: String },
    #[error("Verification method \"{0}\" not authorized by controller for proof purpose \"{1}\".")]
    UnauthorizedVerificationMethod(String, String),
    #[error("Missing controller for verification method \"{0}\"")]
    MissingController(String),
    #[error("No matching proofs found in the given document.")]
    NoMatchingProofs,
    #[error("Expected a JSON object")]
    ExpectedJsonObject,
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
    #[error("Unable to load document: {0}")]
    Loader(String),
    #[error(transparent)]
    KeyFormat(#[from] KeyFormatError),
    #[error(transparent)]
    SignatureFormat(#[from] SignatureFormatError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
