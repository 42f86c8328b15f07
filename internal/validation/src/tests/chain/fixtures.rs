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

//! End-to-end validation of a real P-256 PKI with the built-in signature
//! validators.

use std::sync::Arc;

use crate::{
    tests::test_utils::fixtures, validation_codes::*, Certificate, CertificateChainValidator,
    Crl, IssuingCertificateRetriever, OcspResponse, RevocationDataStore, ValidationResult,
};

fn cert(der: &[u8]) -> Certificate {
    Certificate::from_der(der).unwrap()
}

fn retriever() -> IssuingCertificateRetriever {
    let mut retriever = IssuingCertificateRetriever::new();
    retriever.add_trusted_certificates([cert(fixtures::ROOT)]);
    retriever.add_known_certificates([cert(fixtures::INTERMEDIATE), cert(fixtures::RESPONDER)]);
    retriever
}

fn validator(store: RevocationDataStore) -> CertificateChainValidator {
    CertificateChainValidator::new(Arc::new(retriever()), Arc::new(store))
}

fn crl_store() -> RevocationDataStore {
    let mut store = RevocationDataStore::new();
    store.add_crls([
        Crl::from_der(fixtures::ROOT_CRL).unwrap(),
        Crl::from_der(fixtures::INTERMEDIATE_CRL).unwrap(),
    ]);
    store
}

fn ocsp_store(response: &[u8]) -> RevocationDataStore {
    let mut store = RevocationDataStore::new();
    store.add_crls([Crl::from_der(fixtures::ROOT_CRL).unwrap()]);
    store.add_ocsp_responses([OcspResponse::from_der(response).unwrap()]);
    store
}

#[test]
fn signer_checked_against_crls() {
    let report = validator(crl_store())
        .validate_signing_certificate(&cert(fixtures::SIGNER), Some(fixtures::check_date()));

    assert_eq!(report.validation_result(), ValidationResult::Valid);
    assert!(report.has_validation_code(CERTIFICATE_TRUSTED));
}

#[test]
fn revoked_signer_checked_against_crls() {
    let report = validator(crl_store())
        .validate_signing_certificate(&cert(fixtures::REVOKED), Some(fixtures::check_date()));

    assert_eq!(report.validation_result(), ValidationResult::Invalid);
    assert!(report.has_failure(CERTIFICATE_REVOKED));
}

#[test]
fn signer_checked_against_delegated_ocsp_responder() {
    let report = validator(ocsp_store(fixtures::OCSP_GOOD))
        .validate_signing_certificate(&cert(fixtures::SIGNER), Some(fixtures::check_date()));

    assert_eq!(report.validation_result(), ValidationResult::Valid);
    assert!(report.has_validation_code(OCSP_NO_CHECK));
}

#[test]
fn revoked_signer_checked_against_ocsp() {
    let report = validator(ocsp_store(fixtures::OCSP_REVOKED))
        .validate_signing_certificate(&cert(fixtures::REVOKED), Some(fixtures::check_date()));

    assert_eq!(report.validation_result(), ValidationResult::Invalid);
    assert!(report.has_failure(CERTIFICATE_REVOKED));
}

#[test]
fn signer_checked_against_ocsp_signed_by_ca() {
    let report = validator(ocsp_store(fixtures::OCSP_GOOD_BY_CA))
        .validate_signing_certificate(&cert(fixtures::SIGNER), Some(fixtures::check_date()));

    assert_eq!(report.validation_result(), ValidationResult::Valid);
    assert!(!report.has_validation_code(OCSP_NO_CHECK));
}

#[test]
fn crls_are_stale_a_year_later() {
    let check_date = fixtures::check_date() + chrono::TimeDelta::days(365);

    let report = validator(crl_store())
        .validate_signing_certificate(&cert(fixtures::SIGNER), Some(check_date));

    assert_eq!(report.validation_result(), ValidationResult::Indeterminate);
    assert!(report.has_failure(UPDATE_DATE_BEFORE_CHECK_DATE));
}

#[test]
fn untrusted_root() {
    let mut retriever = IssuingCertificateRetriever::new();
    retriever.add_known_certificates([cert(fixtures::ROOT), cert(fixtures::INTERMEDIATE)]);

    let report = CertificateChainValidator::new(Arc::new(retriever), Arc::new(crl_store()))
        .validate_signing_certificate(&cert(fixtures::SIGNER), Some(fixtures::check_date()));

    assert_eq!(report.validation_result(), ValidationResult::Indeterminate);
    assert!(report.has_failure(CERTIFICATE_NOT_TRUSTED));
}
