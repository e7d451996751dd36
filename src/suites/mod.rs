mod ecdsa_koblitz_signature_2016;

pub use ecdsa_koblitz_signature_2016::{EcdsaKoblitzSignature2016, ResolvedKoblitzSignature2016};
