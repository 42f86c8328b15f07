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

use chrono::{DateTime, Utc};
use log::debug;
use sigtrust_report::{report_item, validation_codes::*, ValidationReport};

use crate::{
    chain::ChainValidator,
    raw_signature::SignatureVerifier,
    revocation::{freshness_limit, validate_signer, Crl},
    Certificate, IssuingCertificateRetriever, ValidationSettings,
};

const CRL_CHECK: &str = "CRL response check";

/// Determines the revocation status of one certificate at one check date
/// from one CRL.
///
/// The CRL issuer certificate is handed to the [`ChainValidator`] with the
/// `crl_issuer` extension set before the CRL's signature is trusted. Defects
/// in the issuer's chain make the CRL inconclusive, never the certificate
/// invalid.
pub struct CrlValidator<'a> {
    chain_validator: &'a dyn ChainValidator,
    retriever: &'a IssuingCertificateRetriever,
    verifier: &'a dyn SignatureVerifier,
    settings: &'a ValidationSettings,
    depth: usize,
}

impl<'a> CrlValidator<'a> {
    /// Create a CRL validator.
    pub fn new(
        chain_validator: &'a dyn ChainValidator,
        retriever: &'a IssuingCertificateRetriever,
        verifier: &'a dyn SignatureVerifier,
        settings: &'a ValidationSettings,
    ) -> Self {
        Self {
            chain_validator,
            retriever,
            verifier,
            settings,
            depth: 0,
        }
    }

    /// Set the chain depth of the certificate being checked.
    #[must_use]
    pub fn at_depth(self, depth: usize) -> Self {
        Self { depth, ..self }
    }

    /// Append the revocation status of `certificate` at `check_date`, as
    /// stated by `crl`, to `report`.
    pub fn validate(
        &self,
        report: &mut ValidationReport,
        certificate: &Certificate,
        crl: &Crl,
        check_date: DateTime<Utc>,
    ) {
        let candidates = self.retriever.retrieve_all_by_subject(crl.issuer_raw());

        // Prefer the candidate whose key actually signed the CRL.
        let Some(crl_issuer) = candidates
            .iter()
            .find(|candidate| self.verify_crl_signature(candidate, crl))
            .or_else(|| candidates.first())
            .copied()
        else {
            report_item!(
                CRL_CHECK,
                format!("Unable to find CRL issuer {}.", crl.issuer()),
                "CrlValidator::validate"
            )
            .validation_code(CRL_ISSUER_NOT_FOUND)
            .certificate(certificate.subject())
            .indeterminate(report);
            return;
        };

        let crl_issuer_root = self.retriever.retrieve_root(crl_issuer, self.verifier);
        let subject_root = self.retriever.retrieve_root(certificate, self.verifier);

        if crl_issuer_root != subject_root {
            report_item!(
                CRL_CHECK,
                format!(
                    "CRL issuer {} and certificate {} do not share a root ({} and {}).",
                    crl_issuer.subject(),
                    certificate.subject(),
                    crl_issuer_root.subject(),
                    subject_root.subject()
                ),
                "CrlValidator::validate"
            )
            .validation_code(CRL_ISSUER_NO_COMMON_ROOT)
            .certificate(certificate.subject())
            .indeterminate(report);
            return;
        }

        validate_signer(
            self.chain_validator,
            report,
            crl_issuer,
            check_date,
            &self.settings.extensions.crl_issuer,
            self.depth + 1,
        );

        if !self.verify_crl_signature(crl_issuer, crl) {
            report_item!(
                CRL_CHECK,
                format!(
                    "CRL is invalid: its signature does not verify with the key of {}.",
                    crl_issuer.subject()
                ),
                "CrlValidator::validate"
            )
            .validation_code(CRL_INVALID)
            .certificate(certificate.subject())
            .indeterminate(report);
            return;
        }

        if let Some(next_update) = crl.next_update() {
            if next_update < check_date {
                report_item!(
                    CRL_CHECK,
                    format!(
                        "CRL next update {next_update} is before the check date {check_date}."
                    ),
                    "CrlValidator::validate"
                )
                .validation_code(UPDATE_DATE_BEFORE_CHECK_DATE)
                .certificate(certificate.subject())
                .indeterminate(report);
                return;
            }
        }

        if let Some(limit) = freshness_limit(check_date, &self.settings.revocation) {
            if crl.this_update() < limit {
                report_item!(
                    CRL_CHECK,
                    format!(
                        "CRL issued on {} is too old for the check date {check_date}.",
                        crl.this_update()
                    ),
                    "CrlValidator::validate"
                )
                .validation_code(FRESHNESS_CHECK_FAILED)
                .certificate(certificate.subject())
                .indeterminate(report);
                return;
            }
        }

        let Some(entry) = crl.find_revocation(certificate.serial_number()) else {
            debug!(
                "certificate {} (serial {}) is not listed in CRL from {}",
                certificate.subject(),
                certificate.serial_number_hex(),
                crl.issuer()
            );
            return;
        };

        if entry.revocation_date <= check_date {
            report_item!(
                CRL_CHECK,
                format!(
                    "Certificate was revoked by {} on {}.",
                    crl.issuer(),
                    entry.revocation_date
                ),
                "CrlValidator::validate"
            )
            .validation_code(CERTIFICATE_REVOKED)
            .certificate(certificate.subject())
            .invalid(report);
        } else {
            report_item!(
                CRL_CHECK,
                format!(
                    "Certificate was revoked by {} on {}, after the check date {check_date}.",
                    crl.issuer(),
                    entry.revocation_date
                ),
                "CrlValidator::validate"
            )
            .validation_code(REVOKED_AFTER_CHECK_DATE)
            .certificate(certificate.subject())
            .informational(report);
        }
    }

    fn verify_crl_signature(&self, crl_issuer: &Certificate, crl: &Crl) -> bool {
        self.verifier.verify_signature(
            crl_issuer,
            crl.tbs_cert_list(),
            crl.signature(),
            crl.signature_algorithm(),
        )
    }
}
