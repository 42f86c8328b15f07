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

//! Certificate chain validation.
//!
//! [`ChainValidator`] is the seam between the revocation validators and
//! whatever walks the chain. [`CertificateChainValidator`] is the production
//! implementation; [`RecordingChainValidator`] records calls without
//! validating anything.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use log::{debug, trace};
use sigtrust_report::{report_item, validation_codes::*, ValidationReport, ValidationResult};

use crate::{
    extensions::CertificateExtension,
    internal::time,
    raw_signature::{RawSignatureVerifier, SignatureVerifier},
    revocation::{RevocationDataStore, RevocationDataValidator},
    Certificate, IssuingCertificateRetriever, ValidationSettings,
};

mod recording;
pub use recording::{RecordingChainValidator, ValidationCall};

const CHAIN_CHECK: &str = "Certificate check";
const EXTENSIONS_CHECK: &str = "Required certificate extensions check";
const REVOCATION_CHECK: &str = "Certificate revocation check";

/// Validates one certificate, and transitively its issuers, at one check
/// date.
///
/// `depth` counts the certificates visited above the top-level call,
/// including revocation data signers. Implementations must not recurse
/// past the configured maximum.
pub trait ChainValidator: Send + Sync {
    /// Append every finding about `certificate` at `check_date` to `report`.
    fn validate(
        &self,
        report: &mut ValidationReport,
        certificate: &Certificate,
        check_date: DateTime<Utc>,
        required_extensions: &[CertificateExtension],
        depth: usize,
    );
}

/// Walks a certificate chain from the certificate under test to a trust
/// anchor.
///
/// At each link it applies the required extensions, checks the validity
/// period, resolves the issuer, checks revocation, and moves on to the
/// issuer. Every finding is appended to the report; a failure terminates
/// only the branch it occurs on.
pub struct CertificateChainValidator {
    retriever: Arc<IssuingCertificateRetriever>,
    revocation_data: Arc<RevocationDataStore>,
    verifier: Arc<dyn SignatureVerifier>,
    settings: ValidationSettings,
}

impl CertificateChainValidator {
    /// Create a chain validator over a populated certificate store and
    /// revocation data store, using the built-in signature validators and
    /// default settings.
    pub fn new(
        retriever: Arc<IssuingCertificateRetriever>,
        revocation_data: Arc<RevocationDataStore>,
    ) -> Self {
        Self {
            retriever,
            revocation_data,
            verifier: Arc::new(RawSignatureVerifier),
            settings: ValidationSettings::default(),
        }
    }

    /// Replace the signature capability.
    #[must_use]
    pub fn with_signature_verifier(self, verifier: Arc<dyn SignatureVerifier>) -> Self {
        Self { verifier, ..self }
    }

    /// Replace the settings.
    #[must_use]
    pub fn with_settings(self, settings: ValidationSettings) -> Self {
        Self { settings, ..self }
    }

    /// The settings in effect.
    pub fn settings(&self) -> &ValidationSettings {
        &self.settings
    }

    /// Validate the certificate that produced a signature.
    ///
    /// `verified_time` is a trusted time (for example, from a time stamp)
    /// at which the signature is known to have existed. When absent, the
    /// current time is used as the check date.
    pub fn validate_signing_certificate(
        &self,
        certificate: &Certificate,
        verified_time: Option<DateTime<Utc>>,
    ) -> ValidationReport {
        let check_date = verified_time.unwrap_or_else(time::utc_now);

        debug!(
            "validating signing certificate {} at {check_date}",
            certificate.subject()
        );

        let mut report = ValidationReport::new();
        self.validate(
            &mut report,
            certificate,
            check_date,
            &self.settings.extensions.signer,
            0,
        );

        debug!(
            "signing certificate {} is {}",
            certificate.subject(),
            report.validation_result()
        );

        report
    }

    fn check_extensions(
        report: &mut ValidationReport,
        certificate: &Certificate,
        required_extensions: &[CertificateExtension],
    ) {
        for extension in required_extensions {
            if !extension.exists_in(certificate) {
                report_item!(
                    EXTENSIONS_CHECK,
                    format!("Required extension {extension} is missing or does not match."),
                    "CertificateChainValidator::check_extensions"
                )
                .validation_code(EXTENSION_MISSING)
                .certificate(certificate.subject())
                .invalid(report);
            }
        }
    }

    fn check_validity_period(
        report: &mut ValidationReport,
        certificate: &Certificate,
        check_date: DateTime<Utc>,
    ) {
        if check_date < certificate.not_before() {
            report_item!(
                CHAIN_CHECK,
                format!(
                    "Certificate is not valid until {}; the check date is {check_date}.",
                    certificate.not_before()
                ),
                "CertificateChainValidator::check_validity_period"
            )
            .validation_code(CERTIFICATE_NOT_YET_VALID)
            .certificate(certificate.subject())
            .invalid(report);
        } else if check_date > certificate.not_after() {
            report_item!(
                CHAIN_CHECK,
                format!(
                    "Certificate expired on {}; the check date is {check_date}.",
                    certificate.not_after()
                ),
                "CertificateChainValidator::check_validity_period"
            )
            .validation_code(CERTIFICATE_EXPIRED)
            .certificate(certificate.subject())
            .invalid(report);
        }
    }

    fn find_issuer<'a>(
        &'a self,
        report: &mut ValidationReport,
        certificate: &Certificate,
    ) -> Option<&'a Certificate> {
        let candidates = self.retriever.retrieve_issuer_candidates(certificate);

        if candidates.is_empty() {
            report_item!(
                CHAIN_CHECK,
                format!("Unable to find issuer {}.", certificate.issuer()),
                "CertificateChainValidator::find_issuer"
            )
            .validation_code(ISSUER_MISSING)
            .certificate(certificate.subject())
            .indeterminate(report);
            return None;
        }

        let issuer = candidates.into_iter().find(|candidate| {
            self.verifier.verify_signature(
                candidate,
                certificate.tbs_certificate(),
                certificate.signature(),
                certificate.signature_algorithm(),
            )
        });

        if issuer.is_none() {
            report_item!(
                CHAIN_CHECK,
                format!(
                    "No certificate named {} has a key that verifies the certificate's signature.",
                    certificate.issuer()
                ),
                "CertificateChainValidator::find_issuer"
            )
            .validation_code(ISSUER_CANNOT_BE_VERIFIED)
            .certificate(certificate.subject())
            .indeterminate(report);
        }

        issuer
    }

    fn check_revocation(
        &self,
        walk: &ChainWalk<'_>,
        report: &mut ValidationReport,
        certificate: &Certificate,
        issuer: &Certificate,
        check_date: DateTime<Utc>,
        depth: usize,
    ) {
        if certificate.has_ocsp_no_check() {
            report_item!(
                REVOCATION_CHECK,
                "Certificate carries id-pkix-ocsp-nocheck; revocation is not checked.",
                "CertificateChainValidator::check_revocation"
            )
            .validation_code(OCSP_NO_CHECK)
            .certificate(certificate.subject())
            .informational(report);
            return;
        }

        let sources =
            self.revocation_data
                .applicable(certificate, Some(issuer), &self.settings.revocation);

        if sources.is_empty() {
            let item = report_item!(
                REVOCATION_CHECK,
                "No CRL or OCSP response covers the certificate.",
                "CertificateChainValidator::check_revocation"
            )
            .validation_code(NO_REVOCATION_DATA)
            .certificate(certificate.subject());

            if self.settings.revocation.require_revocation_data {
                item.indeterminate(report);
            } else {
                item.informational(report);
            }
            return;
        }

        let validator = RevocationDataValidator::new(
            walk,
            &self.retriever,
            self.verifier.as_ref(),
            &self.settings,
        )
        .at_depth(depth);

        let sub_reports: Vec<ValidationReport> = sources
            .into_iter()
            .map(|source| {
                trace!(
                    "checking {} against {} data",
                    certificate.subject(),
                    source.kind()
                );
                let mut sub_report = ValidationReport::new();
                validator.validate_issued_by(
                    &mut sub_report,
                    certificate,
                    issuer,
                    source,
                    check_date,
                );
                sub_report
            })
            .collect();

        Self::reconcile_revocation(report, certificate, sub_reports);
    }

    // Any source that proves revocation wins. Otherwise one source that
    // confirms good standing outweighs inconclusive ones.
    fn reconcile_revocation(
        report: &mut ValidationReport,
        certificate: &Certificate,
        sub_reports: Vec<ValidationReport>,
    ) {
        let any_invalid = sub_reports
            .iter()
            .any(|r| r.validation_result() == ValidationResult::Invalid);

        let any_valid = sub_reports
            .iter()
            .any(|r| r.validation_result() == ValidationResult::Valid);

        if any_invalid || !any_valid {
            debug!(
                "merging all {} revocation source(s) for {}",
                sub_reports.len(),
                certificate.subject()
            );
            for sub_report in sub_reports {
                report.merge(sub_report);
            }
            return;
        }

        for sub_report in sub_reports {
            if sub_report.validation_result() == ValidationResult::Valid {
                report.merge(sub_report);
            } else {
                let codes: Vec<&str> = sub_report
                    .failures()
                    .map(|item| item.validation_code.as_ref())
                    .collect();

                report_item!(
                    REVOCATION_CHECK,
                    format!(
                        "A revocation source was inconclusive ({}), but another source confirms the certificate is not revoked.",
                        codes.join(", ")
                    ),
                    "CertificateChainValidator::reconcile_revocation"
                )
                .validation_code(REVOCATION_SOURCE_INCONCLUSIVE)
                .certificate(certificate.subject())
                .informational(report);
            }
        }
    }

    fn validate_link(
        &self,
        walk: &ChainWalk<'_>,
        report: &mut ValidationReport,
        certificate: &Certificate,
        check_date: DateTime<Utc>,
        required_extensions: &[CertificateExtension],
        depth: usize,
    ) {
        if depth >= self.settings.chain.max_chain_length {
            report_item!(
                CHAIN_CHECK,
                format!(
                    "Certificate chain is longer than {} certificates.",
                    self.settings.chain.max_chain_length
                ),
                "CertificateChainValidator::validate_link"
            )
            .validation_code(CHAIN_TOO_LONG)
            .certificate(certificate.subject())
            .indeterminate(report);
            return;
        }

        trace!(
            "validating {} at depth {depth} requiring {} extension(s)",
            certificate.subject(),
            required_extensions.len()
        );

        Self::check_extensions(report, certificate, required_extensions);
        Self::check_validity_period(report, certificate, check_date);

        if self.retriever.is_certificate_trusted(certificate) {
            report_item!(
                CHAIN_CHECK,
                "Certificate is a trust anchor.",
                "CertificateChainValidator::validate_link"
            )
            .validation_code(CERTIFICATE_TRUSTED)
            .certificate(certificate.subject())
            .informational(report);
            return;
        }

        let Some(issuer) = self.find_issuer(report, certificate) else {
            return;
        };

        if issuer == certificate {
            report_item!(
                CHAIN_CHECK,
                "Certificate is self-signed and is not a trust anchor.",
                "CertificateChainValidator::validate_link"
            )
            .validation_code(CERTIFICATE_NOT_TRUSTED)
            .certificate(certificate.subject())
            .indeterminate(report);
            return;
        }

        self.check_revocation(walk, report, certificate, issuer, check_date, depth);

        walk.validate(
            report,
            issuer,
            check_date,
            &self.settings.extensions.issuer,
            depth + 1,
        );
    }
}

impl ChainValidator for CertificateChainValidator {
    fn validate(
        &self,
        report: &mut ValidationReport,
        certificate: &Certificate,
        check_date: DateTime<Utc>,
        required_extensions: &[CertificateExtension],
        depth: usize,
    ) {
        ChainWalk::new(self).validate(
            report,
            certificate,
            check_date,
            required_extensions,
            depth,
        );
    }
}

/// One top-level validation.
///
/// Every CRL or OCSP response that names a CA leads back to that CA, so the
/// same certificate is reached many times in one walk. A certificate is
/// validated once per role and depth; later visits reuse the verdict.
struct ChainWalk<'a> {
    validator: &'a CertificateChainValidator,
    validated: Mutex<Vec<WalkedCertificate>>,
}

struct WalkedCertificate {
    certificate: Certificate,
    required_extensions: Vec<CertificateExtension>,
    check_date: DateTime<Utc>,
    depth: usize,
    result: ValidationResult,
}

impl<'a> ChainWalk<'a> {
    fn new(validator: &'a CertificateChainValidator) -> Self {
        Self {
            validator,
            validated: Mutex::new(Vec::new()),
        }
    }

    fn previous_result(
        &self,
        certificate: &Certificate,
        check_date: DateTime<Utc>,
        required_extensions: &[CertificateExtension],
        depth: usize,
    ) -> Option<ValidationResult> {
        self.validated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|walked| {
                walked.depth == depth
                    && walked.check_date == check_date
                    && walked.required_extensions == required_extensions
                    && &walked.certificate == certificate
            })
            .map(|walked| walked.result)
    }
}

impl ChainValidator for ChainWalk<'_> {
    fn validate(
        &self,
        report: &mut ValidationReport,
        certificate: &Certificate,
        check_date: DateTime<Utc>,
        required_extensions: &[CertificateExtension],
        depth: usize,
    ) {
        if let Some(result) =
            self.previous_result(certificate, check_date, required_extensions, depth)
        {
            trace!(
                "{} already validated at depth {depth}: {result}",
                certificate.subject()
            );

            let item = report_item!(
                CHAIN_CHECK,
                format!("Certificate was already validated in this chain walk: {result}."),
                "ChainWalk::validate"
            )
            .validation_code(CERTIFICATE_ALREADY_VALIDATED)
            .certificate(certificate.subject());

            match result {
                ValidationResult::Valid => item.informational(report),
                ValidationResult::Indeterminate => item.indeterminate(report),
                ValidationResult::Invalid => item.invalid(report),
            }
            return;
        }

        // Depth strictly increases along any path, so an entry is never
        // looked up while it is still being computed.
        let mut link_report = ValidationReport::new();
        self.validator.validate_link(
            self,
            &mut link_report,
            certificate,
            check_date,
            required_extensions,
            depth,
        );

        self.validated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(WalkedCertificate {
                certificate: certificate.clone(),
                required_extensions: required_extensions.to_vec(),
                check_date,
                depth,
                result: link_report.validation_result(),
            });

        report.merge(link_report);
    }
}
