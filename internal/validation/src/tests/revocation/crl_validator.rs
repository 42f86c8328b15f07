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

use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    extensions::{CertificateExtension, KeyUsageExtension},
    revocation::{CrlReason, CrlValidator},
    tests::test_utils::{
        ca, check_date, crl, days, issue, TestPki, TestSignatureVerifier, INTERMEDIATE, ROOT,
    },
    validation_codes::*,
    Certificate, Crl, IssuingCertificateRetriever, RecordingChainValidator, ReportItemStatus,
    ValidationCall, ValidationReport, ValidationResult, ValidationSettings,
};

fn check_crl(
    retriever: &IssuingCertificateRetriever,
    certificate: &Certificate,
    crl: &Crl,
    check_date: DateTime<Utc>,
    settings: &ValidationSettings,
) -> (ValidationReport, Vec<ValidationCall>) {
    let chain_validator = RecordingChainValidator::new();
    let verifier = TestSignatureVerifier;

    let mut report = ValidationReport::new();
    CrlValidator::new(&chain_validator, retriever, &verifier, settings).validate(
        &mut report,
        certificate,
        crl,
        check_date,
    );

    (report, chain_validator.calls())
}

fn failure_codes(report: &ValidationReport) -> Vec<&str> {
    report
        .failures()
        .map(|item| item.validation_code.as_ref())
        .collect()
}

#[test]
fn happy_path() {
    let pki = TestPki::new();
    let crl = pki.intermediate_crl(check_date() - days(5), check_date() + days(5), |crl| crl);

    let (report, calls) = check_crl(
        &pki.retriever(),
        &pki.leaf,
        &crl,
        check_date(),
        &ValidationSettings::default(),
    );

    assert_eq!(report.validation_result(), ValidationResult::Valid);
    assert!(report.is_empty());

    assert_eq!(
        calls,
        vec![ValidationCall {
            certificate: pki.intermediate.clone(),
            check_date: check_date(),
            required_extensions: vec![CertificateExtension::KeyUsage(KeyUsageExtension::CrlSign)],
            depth: 1,
        }]
    );
}

#[test]
fn crl_issuer_required_extensions_come_from_settings() {
    let pki = TestPki::new();
    let crl = pki.intermediate_crl(check_date() - days(5), check_date() + days(5), |crl| crl);

    let mut settings = ValidationSettings::default();
    settings.extensions.crl_issuer = vec![
        "key_usage:crl_sign".parse().unwrap(),
        "basic_constraints:ca".parse().unwrap(),
    ];

    let (_, calls) = check_crl(&pki.retriever(), &pki.leaf, &crl, check_date(), &settings);

    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].required_extensions, settings.extensions.crl_issuer);
}

#[test]
fn next_update_before_check_date() {
    let pki = TestPki::new();
    let crl = pki.intermediate_crl(check_date() - days(15), check_date() - days(5), |crl| crl);

    let (report, _) = check_crl(
        &pki.retriever(),
        &pki.leaf,
        &crl,
        check_date(),
        &ValidationSettings::default(),
    );

    assert_eq!(report.validation_result(), ValidationResult::Indeterminate);
    assert_eq!(failure_codes(&report), vec![UPDATE_DATE_BEFORE_CHECK_DATE]);
}

#[test]
fn next_update_before_check_date_hides_revocation_entry() {
    let pki = TestPki::new();
    let crl = pki.intermediate_crl(check_date() - days(15), check_date() - days(5), |crl| {
        crl.revoked(
            pki.leaf.serial_number(),
            check_date() - days(10),
            Some(CrlReason::KeyCompromise),
        )
    });

    let (report, _) = check_crl(
        &pki.retriever(),
        &pki.leaf,
        &crl,
        check_date(),
        &ValidationSettings::default(),
    );

    assert_eq!(report.validation_result(), ValidationResult::Indeterminate);
    assert_eq!(failure_codes(&report), vec![UPDATE_DATE_BEFORE_CHECK_DATE]);
    assert!(!report.has_validation_code(CERTIFICATE_REVOKED));
}

#[test]
fn next_update_at_check_date_is_current() {
    let pki = TestPki::new();
    let crl = pki.intermediate_crl(check_date() - days(5), check_date(), |crl| crl);

    let (report, _) = check_crl(
        &pki.retriever(),
        &pki.leaf,
        &crl,
        check_date(),
        &ValidationSettings::default(),
    );

    assert_eq!(report.validation_result(), ValidationResult::Valid);
}

#[test]
fn missing_crl_issuer() {
    let pki = TestPki::new();
    let crl = pki.intermediate_crl(check_date() - days(5), check_date() + days(5), |crl| crl);

    let mut retriever = IssuingCertificateRetriever::new();
    retriever.add_trusted_certificates([pki.root.clone()]);

    let (report, calls) = check_crl(
        &retriever,
        &pki.leaf,
        &crl,
        check_date(),
        &ValidationSettings::default(),
    );

    assert_eq!(report.validation_result(), ValidationResult::Indeterminate);
    assert_eq!(failure_codes(&report), vec![CRL_ISSUER_NOT_FOUND]);
    assert!(calls.is_empty());
}

#[test]
fn crl_issuer_without_common_root() {
    let pki = TestPki::new();
    let other_root = issue(
        "CN=Other Root",
        "other-root",
        "CN=Other Root",
        "other-root",
        &[0x03],
        ca,
    );
    let crl = crl(
        "CN=Other Root",
        "other-root",
        check_date() - days(5),
        check_date() + days(5),
        |crl| crl,
    );

    let mut retriever = pki.retriever();
    retriever.add_trusted_certificates([other_root]);

    let (report, calls) = check_crl(
        &retriever,
        &pki.leaf,
        &crl,
        check_date(),
        &ValidationSettings::default(),
    );

    assert_eq!(report.validation_result(), ValidationResult::Indeterminate);
    assert_eq!(failure_codes(&report), vec![CRL_ISSUER_NO_COMMON_ROOT]);
    assert!(calls.is_empty());
}

#[test]
fn crl_issued_by_the_root_for_an_intermediate() {
    let pki = TestPki::new();
    let crl = pki.root_crl(check_date() - days(5), check_date() + days(5));

    let (report, calls) = check_crl(
        &pki.retriever(),
        &pki.intermediate,
        &crl,
        check_date(),
        &ValidationSettings::default(),
    );

    assert_eq!(report.validation_result(), ValidationResult::Valid);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].certificate, pki.root);
}

#[test]
fn same_named_root_does_not_split_the_chain() {
    let pki = TestPki::new();
    let other_root = issue(ROOT, "other-root", ROOT, "other-root", &[0x01], ca);

    let mut retriever = IssuingCertificateRetriever::new();
    retriever.add_known_certificates([other_root]);
    retriever.add_trusted_certificates([pki.root.clone()]);
    retriever.add_known_certificates([pki.intermediate.clone()]);

    let crl = pki.root_crl(check_date() - days(5), check_date() + days(5));

    let (report, calls) = check_crl(
        &retriever,
        &pki.intermediate,
        &crl,
        check_date(),
        &ValidationSettings::default(),
    );

    assert_eq!(report.validation_result(), ValidationResult::Valid);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].certificate, pki.root);
}

#[test]
fn crl_issuer_under_a_same_named_root_has_no_common_root() {
    let pki = TestPki::new();
    let other_root = issue(ROOT, "other-root", ROOT, "other-root", &[0x01], ca);
    let other_intermediate = issue(INTERMEDIATE, "other", ROOT, "other-root", &[0x05], ca);

    let mut retriever = pki.retriever();
    retriever.add_known_certificates([other_root.clone(), other_intermediate]);

    let crl = crl(
        INTERMEDIATE,
        "other",
        check_date() - days(5),
        check_date() + days(5),
        |crl| crl,
    );

    let (report, calls) = check_crl(
        &retriever,
        &pki.leaf,
        &crl,
        check_date(),
        &ValidationSettings::default(),
    );

    assert_eq!(report.validation_result(), ValidationResult::Indeterminate);
    assert_eq!(failure_codes(&report), vec![CRL_ISSUER_NO_COMMON_ROOT]);
    assert!(calls.is_empty());
}

#[test]
fn signer_depth_follows_certificate_depth() {
    let pki = TestPki::new();
    let crl = pki.intermediate_crl(check_date() - days(5), check_date() + days(5), |crl| crl);
    let chain_validator = RecordingChainValidator::new();
    let retriever = pki.retriever();
    let settings = ValidationSettings::default();

    let mut report = ValidationReport::new();
    CrlValidator::new(&chain_validator, &retriever, &TestSignatureVerifier, &settings)
        .at_depth(3)
        .validate(&mut report, &pki.leaf, &crl, check_date());

    let calls = chain_validator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].depth, 4);
}

#[test]
fn revoked_before_check_date() {
    let pki = TestPki::new();
    let revocation_date = check_date() - days(2);
    let crl = pki.intermediate_crl(check_date() - days(5), check_date() + days(5), |crl| {
        crl.revoked(
            pki.leaf.serial_number(),
            revocation_date,
            Some(CrlReason::KeyCompromise),
        )
    });

    let (report, _) = check_crl(
        &pki.retriever(),
        &pki.leaf,
        &crl,
        check_date(),
        &ValidationSettings::default(),
    );

    assert_eq!(report.validation_result(), ValidationResult::Invalid);
    assert_eq!(failure_codes(&report), vec![CERTIFICATE_REVOKED]);

    let item = report.failures().next().unwrap();
    assert_eq!(item.status, ReportItemStatus::Invalid);
    assert_eq!(item.check, "CRL response check");
    assert_eq!(
        item.message,
        format!("Certificate was revoked by {INTERMEDIATE} on {revocation_date}.")
    );
    assert_eq!(item.certificate.as_deref(), Some(pki.leaf.subject()));
}

#[test]
fn revoked_at_check_date() {
    let pki = TestPki::new();
    let crl = pki.intermediate_crl(check_date() - days(5), check_date() + days(5), |crl| {
        crl.revoked(pki.leaf.serial_number(), check_date(), None)
    });

    let (report, _) = check_crl(
        &pki.retriever(),
        &pki.leaf,
        &crl,
        check_date(),
        &ValidationSettings::default(),
    );

    assert_eq!(report.validation_result(), ValidationResult::Invalid);
    assert!(report.has_failure(CERTIFICATE_REVOKED));
}

#[test]
fn revoked_after_check_date() {
    let pki = TestPki::new();

    for delay in [TimeDelta::seconds(1), days(20)] {
        let crl = pki.intermediate_crl(check_date() - days(5), check_date() + days(5), |crl| {
            crl.revoked(pki.leaf.serial_number(), check_date() + delay, None)
        });

        let (report, _) = check_crl(
            &pki.retriever(),
            &pki.leaf,
            &crl,
            check_date(),
            &ValidationSettings::default(),
        );

        assert_eq!(report.validation_result(), ValidationResult::Valid);
        assert_eq!(report.failure_count(), 0);
        assert!(report.has_validation_code(REVOKED_AFTER_CHECK_DATE));
        assert_eq!(report.logs()[0].status, ReportItemStatus::Info);
    }
}

#[test]
fn other_serial_revoked() {
    let pki = TestPki::new();
    let crl = pki.intermediate_crl(check_date() - days(5), check_date() + days(5), |crl| {
        crl.revoked(&[0x11], check_date() - days(2), None)
    });

    let (report, _) = check_crl(
        &pki.retriever(),
        &pki.leaf,
        &crl,
        check_date(),
        &ValidationSettings::default(),
    );

    assert_eq!(report.validation_result(), ValidationResult::Valid);
    assert!(report.is_empty());
}

#[test]
fn remove_from_crl_is_not_a_revocation() {
    let pki = TestPki::new();
    let crl = pki.intermediate_crl(check_date() - days(5), check_date() + days(5), |crl| {
        crl.revoked(
            pki.leaf.serial_number(),
            check_date() - days(2),
            Some(CrlReason::RemoveFromCrl),
        )
    });

    let (report, _) = check_crl(
        &pki.retriever(),
        &pki.leaf,
        &crl,
        check_date(),
        &ValidationSettings::default(),
    );

    assert_eq!(report.validation_result(), ValidationResult::Valid);
}

#[test]
fn signature_mismatch() {
    let pki = TestPki::new();
    let crl = crl(
        INTERMEDIATE,
        "rogue",
        check_date() - days(5),
        check_date() + days(5),
        |crl| crl,
    );

    let (report, calls) = check_crl(
        &pki.retriever(),
        &pki.leaf,
        &crl,
        check_date(),
        &ValidationSettings::default(),
    );

    assert_eq!(report.validation_result(), ValidationResult::Indeterminate);
    assert_eq!(failure_codes(&report), vec![CRL_INVALID]);
    assert_eq!(calls.len(), 1);
}

#[test]
fn prefers_crl_issuer_whose_key_signed_the_crl() {
    let pki = TestPki::new();
    let impostor = issue(INTERMEDIATE, "impostor", ROOT, "root", &[0x04], ca);

    let mut retriever = IssuingCertificateRetriever::new();
    retriever.add_trusted_certificates([pki.root.clone()]);
    retriever.add_known_certificates([impostor, pki.intermediate.clone()]);

    let crl = pki.intermediate_crl(check_date() - days(5), check_date() + days(5), |crl| crl);

    let (report, calls) = check_crl(
        &retriever,
        &pki.leaf,
        &crl,
        check_date(),
        &ValidationSettings::default(),
    );

    assert_eq!(report.validation_result(), ValidationResult::Valid);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].certificate, pki.intermediate);
}

#[test]
fn stale_crl() {
    let pki = TestPki::new();
    let crl = pki.intermediate_crl(check_date() - days(40), check_date() + days(5), |crl| crl);

    let (report, _) = check_crl(
        &pki.retriever(),
        &pki.leaf,
        &crl,
        check_date(),
        &ValidationSettings::default(),
    );

    assert_eq!(report.validation_result(), ValidationResult::Indeterminate);
    assert_eq!(failure_codes(&report), vec![FRESHNESS_CHECK_FAILED]);
}

#[test]
fn freshness_window_is_configurable() {
    let pki = TestPki::new();
    let crl = pki.intermediate_crl(check_date() - days(40), check_date() + days(5), |crl| crl);

    let settings = ValidationSettings::from_toml(
        r#"
            [revocation]
            freshness_seconds = 4320000
        "#,
    )
    .unwrap();

    let (report, _) = check_crl(&pki.retriever(), &pki.leaf, &crl, check_date(), &settings);

    assert_eq!(report.validation_result(), ValidationResult::Valid);
}
