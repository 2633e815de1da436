//! App signature hash for SMS retriever routing.
//!
//! SMS bodies must end with this 11-character hash for the platform to route
//! them to the app, e.g. `<#> Your OTP is 123456 L1lD8GP/5Eo`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use sha2::{Digest, Sha256};

const NUM_HASHED_BYTES: usize = 9;
const NUM_BASE64_CHAR: usize = 11;

/// Computes the hash for a package name and one signing certificate string.
pub fn app_signature_hash(package_name: &str, signature: &str) -> String {
    let app_info = format!("{package_name} {signature}");
    let digest = Sha256::digest(app_info.as_bytes());
    let mut encoded = STANDARD_NO_PAD.encode(&digest[..NUM_HASHED_BYTES]);
    encoded.truncate(NUM_BASE64_CHAR);
    encoded
}

/// Computes one hash per signing certificate.
pub fn app_signatures<S: AsRef<str>>(package_name: &str, signatures: &[S]) -> Vec<String> {
    signatures
        .iter()
        .map(|signature| app_signature_hash(package_name, signature.as_ref()))
        .collect()
}
