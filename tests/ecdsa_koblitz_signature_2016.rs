use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use ssi_ecdsa_koblitz::{
    create_verify_data, CanonicalizationMode, DocumentLoader, EcdsaKoblitzSignature2016, Error,
    JcsCanonicalizer, LinkedDataSignatures, Proof, ProofPurpose, ProofSuite,
    PublicKeyProofPurpose, SignatureVerifier, StaticLoader, SuiteOptions, VerificationMethod,
    VerificationResult, SECURITY_CONTEXT,
};

const ALICE: &str = "https://example.com/i/alice";
const ALICE_KEY: &str = "https://example.com/i/alice/keys/1";
const ALICE_PRIVATE_KEY_WIF: &str = "KwntMbt59tTsj8xqpqYqRRWufyjGunvhSyeMo3NTYpFYzZbXJ5Hp";
const ALICE_PUBLIC_KEY_WIF: &str = "1Q1pE5vPGEEMqRcVRMbtBK842Y6Pzo6nK9";
const BOB_PUBLIC_KEY_WIF: &str = "18aF6pYXKDSXjXHpidt2G6okdVdBr8zA7z";
const REVOKED_KEY: &str = "https://example.com/i/alice/keys/2";
const CREATED: &str = "2018-03-15T00:00:00Z";

fn test_loader(public_key_wif: &str) -> StaticLoader {
    StaticLoader::new()
        .with_document(
            ALICE,
            json!({
                "@context": "https://w3id.org/security/v2",
                "id": ALICE,
                "publicKey": [ALICE_KEY, REVOKED_KEY]
            }),
        )
        .with_document(
            ALICE_KEY,
            json!({
                "@context": "https://w3id.org/security/v2",
                "type": "EcdsaKoblitzPublicKey",
                "id": ALICE_KEY,
                "owner": ALICE,
                "publicKeyWif": public_key_wif
            }),
        )
        .with_document(
            REVOKED_KEY,
            json!({
                "@context": "https://w3id.org/security/v2",
                "type": "EcdsaKoblitzPublicKey",
                "id": REVOKED_KEY,
                "owner": ALICE,
                "revoked": "2018-06-01T00:00:00Z",
                "publicKeyWif": ALICE_PUBLIC_KEY_WIF
            }),
        )
}

fn loader() -> StaticLoader {
    test_loader(ALICE_PUBLIC_KEY_WIF)
}

fn sign_options() -> SuiteOptions {
    SuiteOptions::default()
        .with_private_key_wif(ALICE_PRIVATE_KEY_WIF)
        .with_creator(ALICE_KEY)
        .with_date(Utc.with_ymd_and_hms(2018, 3, 15, 0, 0, 0).unwrap())
}

fn security_context_doc() -> Value {
    json!({
        "@context": [{
            "schema": "http://schema.org/",
            "name": "schema:name",
            "homepage": "schema:url",
            "image": "schema:image"
        }, "https://w3id.org/security/v2"],
        "name": "Manu Sporny",
        "homepage": "https://manu.sporny.org/",
        "image": "https://manu.sporny.org/images/manu.png"
    })
}

fn non_security_context_doc() -> Value {
    json!({
        "@context": {
            "schema": "http://schema.org/",
            "name": "schema:name",
            "homepage": "schema:url",
            "image": "schema:image"
        },
        "name": "Manu Sporny",
        "homepage": "https://manu.sporny.org/",
        "image": "https://manu.sporny.org/images/manu.png"
    })
}

async fn signed_doc() -> Value {
    let suite = EcdsaKoblitzSignature2016::new(sign_options());
    LinkedDataSignatures::default()
        .sign(
            security_context_doc(),
            &suite,
            &PublicKeyProofPurpose::new(),
            &loader(),
        )
        .await
        .unwrap()
}

async fn verify(doc: &Value, suite: &EcdsaKoblitzSignature2016) -> VerificationResult {
    LinkedDataSignatures::default()
        .verify(doc, suite, &PublicKeyProofPurpose::new(), &loader())
        .await
}

/// Accepts any proof and checks nothing beyond the signature.
struct NoOpProofPurpose;

#[async_trait]
impl ProofPurpose for NoOpProofPurpose {
    fn matches(&self, _proof: &Proof) -> bool {
        true
    }

    async fn validate(
        &self,
        _proof: &Proof,
        _verification_method: &VerificationMethod,
        _loader: &dyn DocumentLoader,
    ) -> Result<(), Error> {
        Ok(())
    }
}

#[async_std::test]
async fn sign_with_security_context() {
    let signed = signed_doc().await;
    let signature_value = signed["signature"]["signatureValue"].clone();
    assert!(signature_value.is_string());
    let mut expected = security_context_doc();
    expected["signature"] = json!({
        "type": "EcdsaKoblitzSignature2016",
        "creator": ALICE_KEY,
        "created": CREATED,
        "signatureValue": signature_value
    });
    assert_eq!(signed, expected);
}

#[async_std::test]
async fn sign_without_security_context() {
    let suite = EcdsaKoblitzSignature2016::new(sign_options());
    let signed = LinkedDataSignatures::default()
        .sign(
            non_security_context_doc(),
            &suite,
            &PublicKeyProofPurpose::new(),
            &loader(),
        )
        .await
        .unwrap();
    assert_eq!(signed["signature"]["type"], json!("EcdsaKoblitzSignature2016"));
    assert_eq!(signed["signature"]["created"], json!(CREATED));
    let result = verify(&signed, &EcdsaKoblitzSignature2016::default()).await;
    assert!(result.verified, "{:?}", result);
}

/// A proof as handed back in a verification result.
fn with_security_context(proof: &Value) -> Value {
    let mut proof = proof.clone();
    proof["@context"] = json!(SECURITY_CONTEXT);
    proof
}

fn without_signature_value(proof: &Value) -> Value {
    let mut proof = proof.clone();
    if let Some(object) = proof.as_object_mut() {
        object.remove("signatureValue");
    }
    proof
}

#[async_std::test]
async fn signing_twice_yields_equivalent_proofs() {
    let first = signed_doc().await;
    let second = signed_doc().await;
    assert_eq!(
        without_signature_value(&first["signature"]),
        without_signature_value(&second["signature"])
    );
    for signed in [&first, &second] {
        assert!(signed["signature"]["signatureValue"].is_string());
        let result = verify(signed, &EcdsaKoblitzSignature2016::default()).await;
        assert!(result.verified, "{:?}", result);
    }
}

#[async_std::test]
async fn verify_signed_document() {
    let signed = signed_doc().await;
    let result = verify(&signed, &EcdsaKoblitzSignature2016::default()).await;
    assert!(result.verified, "{:?}", result);
    assert!(result.error.is_none());
    assert_eq!(result.results.len(), 1);
    let proof = &result.results[0];
    assert!(proof.verified);
    assert_eq!(
        serde_json::to_value(&proof.proof).unwrap(),
        with_security_context(&signed["signature"])
    );
    let vm = proof.verification_method.as_ref().unwrap();
    assert_eq!(vm.public_key_wif(), Some(ALICE_PUBLIC_KEY_WIF));
}

#[async_std::test]
async fn verify_with_passed_key() {
    let signed = signed_doc().await;
    // The record advertises another key; the configured one is used.
    let suite = EcdsaKoblitzSignature2016::new(
        SuiteOptions::default().with_public_key_wif(ALICE_PUBLIC_KEY_WIF),
    );
    let result = LinkedDataSignatures::default()
        .verify(
            &signed,
            &suite,
            &PublicKeyProofPurpose::new(),
            &test_loader(BOB_PUBLIC_KEY_WIF),
        )
        .await;
    assert!(result.verified, "{:?}", result);

    let suite = EcdsaKoblitzSignature2016::new(
        SuiteOptions::default().with_public_key_wif(BOB_PUBLIC_KEY_WIF),
    );
    let result = verify(&signed, &suite).await;
    assert!(!result.verified);
}

#[async_std::test]
async fn detect_invalid_signature() {
    let mut signed = signed_doc().await;
    signed["name"] = json!("Manu Spornoneous");
    let result = verify(&signed, &EcdsaKoblitzSignature2016::default()).await;
    assert!(!result.verified);
    assert_eq!(result.results.len(), 1);
    assert!(!result.results[0].verified);
    assert_eq!(
        result.results[0].error.as_ref().unwrap().to_string(),
        "Invalid signature."
    );
}

#[async_std::test]
async fn detect_altered_signature_value() {
    let mut signed = signed_doc().await;
    let suite = EcdsaKoblitzSignature2016::new(sign_options());
    let other = LinkedDataSignatures::default()
        .sign(
            non_security_context_doc(),
            &suite,
            &PublicKeyProofPurpose::new(),
            &loader(),
        )
        .await
        .unwrap();
    assert_ne!(
        other["signature"]["signatureValue"],
        signed["signature"]["signatureValue"]
    );
    signed["signature"]["signatureValue"] = other["signature"]["signatureValue"].clone();
    let result = verify(&signed, &EcdsaKoblitzSignature2016::default()).await;
    assert!(!result.verified);
    assert_eq!(
        result.results[0].error.as_ref().unwrap().to_string(),
        "Invalid signature."
    );
}

#[async_std::test]
async fn detect_wrong_key() {
    let signed = signed_doc().await;
    let result = LinkedDataSignatures::default()
        .verify(
            &signed,
            &EcdsaKoblitzSignature2016::default(),
            &PublicKeyProofPurpose::new(),
            &test_loader(BOB_PUBLIC_KEY_WIF),
        )
        .await;
    assert!(!result.verified);
    assert!(matches!(
        result.results[0].error,
        Some(Error::InvalidSignature)
    ));
}

#[async_std::test]
async fn malformed_signature_is_invalid() {
    let mut signed = signed_doc().await;
    signed["signature"]["signatureValue"] = json!("not base64!");
    let result = verify(&signed, &EcdsaKoblitzSignature2016::default()).await;
    assert_eq!(
        result.results[0].error.as_ref().unwrap().to_string(),
        "Invalid signature."
    );
}

#[async_std::test]
async fn sign_with_multiple_signatures() {
    let signed = signed_doc().await;
    let suite = EcdsaKoblitzSignature2016::new(sign_options());
    let twice = LinkedDataSignatures::default()
        .sign(
            signed.clone(),
            &suite,
            &PublicKeyProofPurpose::new(),
            &loader(),
        )
        .await
        .unwrap();
    let signatures = twice["signature"].as_array().unwrap();
    assert_eq!(signatures.len(), 2);
    assert_eq!(signatures[0], signed["signature"]);
    assert_eq!(
        without_signature_value(&signatures[1]),
        without_signature_value(&signed["signature"])
    );

    let result = verify(&twice, &EcdsaKoblitzSignature2016::default()).await;
    assert!(result.verified, "{:?}", result);
    assert_eq!(result.results.len(), 2);
    assert!(result.results.iter().all(|result| result.verified));
}

#[async_std::test]
async fn verify_multiple_set_signatures() {
    let mut signed = signed_doc().await;
    let proof = signed["signature"].clone();
    let mut tampered = proof.clone();
    tampered["created"] = json!("2019-01-01T00:00:00Z");
    signed["signature"] = json!([proof.clone(), proof]);
    let result = verify(&signed, &EcdsaKoblitzSignature2016::default()).await;
    assert!(result.verified);
    assert_eq!(result.results.len(), 2);
    assert!(result.results.iter().all(|result| result.verified));

    // One bad proof fails the document but not its sibling.
    signed["signature"].as_array_mut().unwrap().push(tampered);
    let result = verify(&signed, &EcdsaKoblitzSignature2016::default()).await;
    assert!(!result.verified);
    let verified: Vec<bool> = result.results.iter().map(|r| r.verified).collect();
    assert_eq!(verified, [true, true, false]);
}

#[async_std::test]
async fn ignore_other_proof_types() {
    let mut signed = signed_doc().await;
    let proof = signed["signature"].clone();
    signed["signature"] = json!([{"type": "RsaSignature2015", "signatureValue": "x"}, proof]);
    let result = verify(&signed, &EcdsaKoblitzSignature2016::default()).await;
    assert!(result.verified);
    assert_eq!(result.results.len(), 1);

    signed["signature"] = json!({"type": "RsaSignature2015", "signatureValue": "x"});
    let result = verify(&signed, &EcdsaKoblitzSignature2016::default()).await;
    assert!(!result.verified);
    assert_eq!(
        result.error.as_ref().unwrap().to_string(),
        "No matching proofs found in the given document."
    );
}

#[async_std::test]
async fn detect_expired_date() {
    let signed = signed_doc().await;
    let purpose = PublicKeyProofPurpose::new()
        .with_date(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap())
        .with_max_timestamp_delta(Duration::zero());
    let result = LinkedDataSignatures::default()
        .verify(
            &signed,
            &EcdsaKoblitzSignature2016::default(),
            &purpose,
            &loader(),
        )
        .await;
    assert!(!result.verified);
    assert_eq!(result.results.len(), 1);
    assert_eq!(
        serde_json::to_value(&result.results[0].proof).unwrap(),
        with_security_context(&signed["signature"])
    );
    assert_eq!(
        result.results[0].error.as_ref().unwrap().to_string(),
        "The proof's created timestamp is out of range."
    );
}

#[async_std::test]
async fn detect_non_matching_domain() {
    let signed = signed_doc().await;
    let suite = EcdsaKoblitzSignature2016::new(
        SuiteOptions::default()
            .with_date(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap())
            .with_domain("example.com"),
    );
    let result = verify(&signed, &suite).await;
    assert!(!result.verified);
    assert_eq!(result.results.len(), 1);
    let message = result.results[0].error.as_ref().unwrap().to_string();
    assert!(message.starts_with("The domain is not as expected"), "{}", message);
}

#[async_std::test]
async fn verify_matching_domain() {
    let suite = EcdsaKoblitzSignature2016::new(sign_options().with_domain("example.com"));
    let signed = LinkedDataSignatures::default()
        .sign(
            security_context_doc(),
            &suite,
            &PublicKeyProofPurpose::new(),
            &loader(),
        )
        .await
        .unwrap();
    assert_eq!(signed["signature"]["domain"], json!("example.com"));
    let verifier =
        EcdsaKoblitzSignature2016::new(SuiteOptions::default().with_domain("example.com"));
    let result = verify(&signed, &verifier).await;
    assert!(result.verified, "{:?}", result);
}

#[async_std::test]
async fn key_not_listed_by_controller() {
    let signed = signed_doc().await;
    let loader = loader().with_document(ALICE, json!({"id": ALICE, "publicKey": []}));
    let result = LinkedDataSignatures::default()
        .verify(
            &signed,
            &EcdsaKoblitzSignature2016::default(),
            &PublicKeyProofPurpose::new(),
            &loader,
        )
        .await;
    assert!(!result.verified);
    assert_eq!(
        result.results[0].error.as_ref().unwrap().to_string(),
        format!(
            "Verification method \"{}\" not authorized by controller for proof purpose \"publicKey\".",
            ALICE_KEY
        )
    );
}

#[async_std::test]
async fn revoked_and_missing_keys() {
    let suite = EcdsaKoblitzSignature2016::new(sign_options().with_creator(REVOKED_KEY));
    let signed = LinkedDataSignatures::default()
        .sign(
            security_context_doc(),
            &suite,
            &PublicKeyProofPurpose::new(),
            &loader(),
        )
        .await
        .unwrap();
    let result = verify(&signed, &EcdsaKoblitzSignature2016::default()).await;
    assert_eq!(
        result.results[0].error.as_ref().unwrap().to_string(),
        "The verification method has been revoked."
    );

    let suite = EcdsaKoblitzSignature2016::new(
        sign_options().with_creator("https://example.com/i/alice/keys/3"),
    );
    let signed = LinkedDataSignatures::default()
        .sign(
            security_context_doc(),
            &suite,
            &PublicKeyProofPurpose::new(),
            &loader(),
        )
        .await
        .unwrap();
    let result = verify(&signed, &EcdsaKoblitzSignature2016::default()).await;
    assert!(matches!(
        result.results[0].error,
        Some(Error::ResourceNotFound(_))
    ));
}

#[async_std::test]
async fn missing_public_key_encoding() {
    let signed = signed_doc().await;
    let loader = loader().with_document(
        ALICE_KEY,
        json!({
            "id": ALICE_KEY,
            "owner": ALICE,
            "publicKeyBase58": "GycSSui454dpYRKiFdsQ5uaE8Gy3ac6dSMPcAoQsk8yq"
        }),
    );
    let result = LinkedDataSignatures::default()
        .verify(
            &signed,
            &EcdsaKoblitzSignature2016::default(),
            &PublicKeyProofPurpose::new(),
            &loader,
        )
        .await;
    assert!(!result.verified);
    assert_eq!(
        result.results[0].error.as_ref().unwrap().to_string(),
        "Unknown public key encoding. Public key encoding must be \"publicKeyWif\"."
    );
}

#[async_std::test]
async fn sign_requires_private_key() {
    let suite = EcdsaKoblitzSignature2016::new(SuiteOptions::default().with_creator(ALICE_KEY));
    let err = LinkedDataSignatures::default()
        .sign(
            security_context_doc(),
            &suite,
            &PublicKeyProofPurpose::new(),
            &loader(),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "\"privateKeyWif\" must be a base58 formatted string."
    );

    let suite = EcdsaKoblitzSignature2016::new(
        SuiteOptions::default()
            .with_creator(ALICE_KEY)
            .with_private_key_wif(ALICE_PUBLIC_KEY_WIF),
    );
    let err = LinkedDataSignatures::default()
        .sign(
            security_context_doc(),
            &suite,
            &PublicKeyProofPurpose::new(),
            &loader(),
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("base58 formatted string"));
}

#[async_std::test]
async fn noop_purpose() {
    let suite = EcdsaKoblitzSignature2016::new(sign_options());
    let ldp = LinkedDataSignatures::default();
    let signed = ldp
        .sign(security_context_doc(), &suite, &NoOpProofPurpose, &loader())
        .await
        .unwrap();
    // Only the key record is needed; the controller is never consulted.
    let key_only = StaticLoader::new().with_document(
        ALICE_KEY,
        json!({"id": ALICE_KEY, "publicKeyWif": ALICE_PUBLIC_KEY_WIF}),
    );
    let result = ldp
        .verify(
            &signed,
            &EcdsaKoblitzSignature2016::default(),
            &NoOpProofPurpose,
            &key_only,
        )
        .await;
    assert!(result.verified, "{:?}", result);
}

#[async_std::test]
async fn flipped_verify_data_byte() {
    let doc = security_context_doc();
    let suite = EcdsaKoblitzSignature2016::new(sign_options());
    let proof = Proof::new(EcdsaKoblitzSignature2016::TYPE).with_options(suite.options());
    let verify_data = create_verify_data(
        &doc,
        &proof,
        &JcsCanonicalizer,
        CanonicalizationMode::Compact,
        &loader(),
    )
    .await
    .unwrap();
    let proof = suite.sign(&verify_data, proof).await.unwrap();

    let (_, verifier) = EcdsaKoblitzSignature2016::default()
        .get_verification_method(&proof, &loader())
        .await
        .unwrap();
    assert!(verifier.verify_signature(&verify_data, &proof).await.unwrap());
    for i in [0, verify_data.len() / 2, verify_data.len() - 1] {
        let mut flipped = verify_data.clone();
        flipped[i] ^= 0x01;
        assert!(!verifier.verify_signature(&flipped, &proof).await.unwrap());
    }
}
