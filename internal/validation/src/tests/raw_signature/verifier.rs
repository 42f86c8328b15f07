// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use crate::{
    raw_signature::{RawSignatureVerifier, SignatureVerifier},
    Certificate,
};

const SAMPLE_DATA: &[u8] = b"some sample content to sign";

const ECDSA_WITH_SHA256: &str = "1.2.840.10045.4.3.2";
const ECDSA_WITH_SHA384: &str = "1.2.840.10045.4.3.3";
const SHA256_WITH_RSA: &str = "1.2.840.113549.1.1.11";
const RSASSA_PSS: &str = "1.2.840.113549.1.1.10";
const ED25519: &str = "1.3.101.112";

fn signer(spki: &[u8]) -> Certificate {
    Certificate::builder("CN=Signer", "CN=Issuer")
        .public_key(spki, b"")
        .build()
}

#[test]
fn verifies_by_signature_oid() {
    let verifier = RawSignatureVerifier;

    let cases: [(&[u8], &[u8], &str); 4] = [
        (
            include_bytes!("../fixtures/raw_signature/es256.pub_key"),
            include_bytes!("../fixtures/raw_signature/es256.raw_sig"),
            ECDSA_WITH_SHA256,
        ),
        (
            include_bytes!("../fixtures/raw_signature/es384.pub_key"),
            include_bytes!("../fixtures/raw_signature/es384.raw_sig"),
            ECDSA_WITH_SHA384,
        ),
        (
            include_bytes!("../fixtures/raw_signature/ed25519.pub_key"),
            include_bytes!("../fixtures/raw_signature/ed25519.raw_sig"),
            ED25519,
        ),
        (
            include_bytes!("../fixtures/raw_signature/rsa.pub_key"),
            include_bytes!("../fixtures/raw_signature/rs256.raw_sig"),
            SHA256_WITH_RSA,
        ),
    ];

    for (spki, signature, oid) in cases {
        assert!(
            verifier.verify_signature(&signer(spki), SAMPLE_DATA, signature, oid),
            "{oid} should verify"
        );
        assert!(
            !verifier.verify_signature(&signer(spki), b"other content", signature, oid),
            "{oid} should not verify other content"
        );
    }
}

#[test]
fn wrong_digest_does_not_verify() {
    let spki = include_bytes!("../fixtures/raw_signature/es256.pub_key");
    let signature = include_bytes!("../fixtures/raw_signature/es256.raw_sig");

    assert!(!RawSignatureVerifier.verify_signature(
        &signer(spki),
        SAMPLE_DATA,
        signature,
        ECDSA_WITH_SHA384
    ));
}

#[test]
fn wrong_key_does_not_verify() {
    let spki = include_bytes!("../fixtures/raw_signature/es384.pub_key");
    let signature = include_bytes!("../fixtures/raw_signature/es256.raw_sig");

    assert!(!RawSignatureVerifier.verify_signature(
        &signer(spki),
        SAMPLE_DATA,
        signature,
        ECDSA_WITH_SHA256
    ));
}

#[test]
fn unmapped_algorithms_do_not_verify() {
    let spki = include_bytes!("../fixtures/raw_signature/rsa.pub_key");
    let signature = include_bytes!("../fixtures/raw_signature/ps256.raw_sig");

    assert!(!RawSignatureVerifier.verify_signature(
        &signer(spki),
        SAMPLE_DATA,
        signature,
        RSASSA_PSS
    ));
    assert!(!RawSignatureVerifier.verify_signature(
        &signer(spki),
        SAMPLE_DATA,
        signature,
        "1.2.3.4"
    ));
}
