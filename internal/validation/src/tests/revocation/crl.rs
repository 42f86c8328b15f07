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

use chrono::{TimeZone, Utc};

use crate::{
    raw_signature::{RawSignatureVerifier, SignatureVerifier},
    revocation::{CrlEntry, CrlReason},
    tests::test_utils::{check_date, days, fixtures},
    Certificate, Crl, ValidationError,
};

#[test]
fn from_der() {
    let crl = Crl::from_der(fixtures::INTERMEDIATE_CRL).unwrap();

    assert!(crl.issuer().contains("Sigtrust Test Intermediate CA"));
    assert_eq!(
        crl.this_update(),
        Utc.with_ymd_and_hms(2026, 10, 15, 0, 0, 0).unwrap()
    );
    assert_eq!(
        crl.next_update(),
        Some(Utc.with_ymd_and_hms(2026, 11, 15, 0, 0, 0).unwrap())
    );
    assert_eq!(crl.signature_algorithm(), "1.2.840.10045.4.3.2");
    assert_eq!(crl.der(), Some(fixtures::INTERMEDIATE_CRL));

    assert_eq!(
        crl.entries(),
        &[CrlEntry {
            serial_number: vec![0x10, 0x02],
            revocation_date: Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
            reason: Some(CrlReason::KeyCompromise),
        }]
    );
}

#[test]
fn issuer_name_matches_issuing_certificate() {
    let crl = Crl::from_der(fixtures::INTERMEDIATE_CRL).unwrap();
    let intermediate = Certificate::from_der(fixtures::INTERMEDIATE).unwrap();

    assert_eq!(crl.issuer_raw(), intermediate.subject_raw());
}

#[test]
fn find_revocation() {
    let crl = Crl::from_der(fixtures::INTERMEDIATE_CRL).unwrap();
    let revoked = Certificate::from_der(fixtures::REVOKED).unwrap();
    let signer = Certificate::from_der(fixtures::SIGNER).unwrap();

    assert!(crl.find_revocation(revoked.serial_number()).is_some());
    assert!(crl.find_revocation(signer.serial_number()).is_none());
}

#[test]
fn empty_crl() {
    let crl = Crl::from_der(fixtures::ROOT_CRL).unwrap();

    assert!(crl.issuer().contains("Sigtrust Test Root CA"));
    assert!(crl.entries().is_empty());
}

#[test]
fn signature_verifies_with_issuer_key() {
    let crl = Crl::from_der(fixtures::INTERMEDIATE_CRL).unwrap();
    let intermediate = Certificate::from_der(fixtures::INTERMEDIATE).unwrap();
    let root = Certificate::from_der(fixtures::ROOT).unwrap();

    let verifier = RawSignatureVerifier;

    assert!(verifier.verify_signature(
        &intermediate,
        crl.tbs_cert_list(),
        crl.signature(),
        crl.signature_algorithm()
    ));

    assert!(!verifier.verify_signature(
        &root,
        crl.tbs_cert_list(),
        crl.signature(),
        crl.signature_algorithm()
    ));
}

#[test]
fn garbage() {
    assert!(matches!(
        Crl::from_der(b"not a CRL"),
        Err(ValidationError::InvalidCrl(_))
    ));
}

#[test]
fn remove_from_crl_entries_are_skipped() {
    let crl = Crl::builder("CN=CA", check_date())
        .revoked(&[0x05], check_date() - days(3), Some(CrlReason::CertificateHold))
        .revoked(&[0x05], check_date() - days(1), Some(CrlReason::RemoveFromCrl))
        .revoked(&[0x06], check_date() - days(1), Some(CrlReason::RemoveFromCrl))
        .build();

    assert_eq!(
        crl.find_revocation(&[0x05]).map(|entry| entry.reason),
        Some(Some(CrlReason::CertificateHold))
    );
    assert!(crl.find_revocation(&[0x06]).is_none());
}

#[test]
fn builder() {
    let crl = Crl::builder("CN=CA", check_date())
        .issuer_raw(b"raw name")
        .signature(b"tbs", "1.2.3", b"sig")
        .build();

    assert_eq!(crl.issuer(), "CN=CA");
    assert_eq!(crl.issuer_raw(), b"raw name");
    assert_eq!(crl.this_update(), check_date());
    assert_eq!(crl.next_update(), None);
    assert_eq!(crl.der(), None);
    assert_eq!(crl.tbs_cert_list(), b"tbs");
    assert_eq!(crl.signature_algorithm(), "1.2.3");
    assert_eq!(crl.signature(), b"sig");
}

#[test]
fn reason_codes() {
    assert_eq!(CrlReason::from_code(0), CrlReason::Unspecified);
    assert_eq!(CrlReason::from_code(1), CrlReason::KeyCompromise);
    assert_eq!(CrlReason::from_code(6), CrlReason::CertificateHold);
    assert_eq!(CrlReason::from_code(8), CrlReason::RemoveFromCrl);
    assert_eq!(CrlReason::from_code(10), CrlReason::AaCompromise);
    assert_eq!(CrlReason::from_code(7), CrlReason::Other(7));

    assert_eq!(CrlReason::KeyCompromise.to_string(), "keyCompromise");
    assert_eq!(CrlReason::RemoveFromCrl.to_string(), "removeFromCRL");
    assert_eq!(CrlReason::Other(42).to_string(), "reason code 42");
}
