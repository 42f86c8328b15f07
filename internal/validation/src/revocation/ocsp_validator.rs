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
    revocation::{freshness_limit, validate_signer, OcspCertStatus, OcspResponse, ResponderId},
    Certificate, IssuingCertificateRetriever, ValidationSettings,
};

const OCSP_CHECK: &str = "OCSP response check";

/// Determines the revocation status of one certificate at one check date
/// from one OCSP response.
///
/// The responder must be the certificate's issuing CA or a responder that CA
/// delegated to. A delegated responder certificate is handed to the
/// [`ChainValidator`] with the `ocsp_responder` extension set.
pub struct OcspValidator<'a> {
    chain_validator: &'a dyn ChainValidator,
    retriever: &'a IssuingCertificateRetriever,
    verifier: &'a dyn SignatureVerifier,
    settings: &'a ValidationSettings,
    depth: usize,
}

impl<'a> OcspValidator<'a> {
    /// Create an OCSP validator.
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
    /// stated by `response`, to `report`.
    ///
    /// The issuing CA is the known certificate whose key verifies
    /// `certificate`.
    pub fn validate(
        &self,
        report: &mut ValidationReport,
        certificate: &Certificate,
        response: &OcspResponse,
        check_date: DateTime<Utc>,
    ) {
        let issuer = self
            .retriever
            .retrieve_verified_issuer(certificate, self.verifier);

        self.validate_issued_by(report, certificate, issuer, response, check_date);
    }

    /// Like [`Self::validate`], with the issuing CA supplied by a caller that
    /// has already verified it.
    pub fn validate_issued_by(
        &self,
        report: &mut ValidationReport,
        certificate: &Certificate,
        issuer: Option<&Certificate>,
        response: &OcspResponse,
        check_date: DateTime<Utc>,
    ) {
        let Some(single_response) = response.single_response_for(certificate, issuer) else {
            report_item!(
                OCSP_CHECK,
                format!(
                    "OCSP response has no status for serial number {}.",
                    certificate.serial_number_hex()
                ),
                "OcspValidator::validate_issued_by"
            )
            .validation_code(OCSP_SERIAL_NOT_FOUND)
            .certificate(certificate.subject())
            .indeterminate(report);
            return;
        };

        let Some(responder) = self.find_responder(response) else {
            report_item!(
                OCSP_CHECK,
                "Unable to find the certificate that signed the OCSP response.",
                "OcspValidator::validate_issued_by"
            )
            .validation_code(OCSP_RESPONDER_NOT_FOUND)
            .certificate(certificate.subject())
            .indeterminate(report);
            return;
        };

        if !self.verifier.verify_signature(
            responder,
            response.tbs_response_data(),
            response.signature(),
            response.signature_algorithm(),
        ) {
            report_item!(
                OCSP_CHECK,
                format!(
                    "OCSP response is invalid: its signature does not verify with the key of {}.",
                    responder.subject()
                ),
                "OcspValidator::validate_issued_by"
            )
            .validation_code(OCSP_INVALID)
            .certificate(certificate.subject())
            .indeterminate(report);
            return;
        }

        let is_issuing_ca = issuer.is_some_and(|issuer| {
            issuer.subject_raw() == responder.subject_raw()
                && issuer.public_key() == responder.public_key()
        });

        if is_issuing_ca {
            debug!("OCSP response for {} signed by its CA", certificate.subject());
        } else if self.is_delegated_responder(responder, issuer)
            || self.retriever.is_certificate_trusted(responder)
        {
            validate_signer(
                self.chain_validator,
                report,
                responder,
                check_date,
                &self.settings.extensions.ocsp_responder,
                self.depth + 1,
            );
        } else {
            report_item!(
                OCSP_CHECK,
                format!(
                    "OCSP responder {} is not authorized to speak for issuer {}.",
                    responder.subject(),
                    certificate.issuer()
                ),
                "OcspValidator::validate_issued_by"
            )
            .validation_code(OCSP_RESPONDER_NOT_AUTHORIZED)
            .certificate(certificate.subject())
            .indeterminate(report);
            return;
        }

        if let Some(next_update) = single_response.next_update {
            if next_update < check_date {
                report_item!(
                    OCSP_CHECK,
                    format!(
                        "OCSP response next update {next_update} is before the check date {check_date}."
                    ),
                    "OcspValidator::validate_issued_by"
                )
                .validation_code(OCSP_IS_NO_LONGER_VALID)
                .certificate(certificate.subject())
                .indeterminate(report);
                return;
            }
        }

        if let Some(limit) = freshness_limit(check_date, &self.settings.revocation) {
            if single_response.this_update < limit {
                report_item!(
                    OCSP_CHECK,
                    format!(
                        "OCSP response from {} is too old for the check date {check_date}.",
                        single_response.this_update
                    ),
                    "OcspValidator::validate_issued_by"
                )
                .validation_code(FRESHNESS_CHECK_FAILED)
                .certificate(certificate.subject())
                .indeterminate(report);
                return;
            }
        }

        match &single_response.cert_status {
            OcspCertStatus::Good => {
                debug!(
                    "OCSP responder {} reports {} as good",
                    responder.subject(),
                    certificate.subject()
                );
            }

            OcspCertStatus::Revoked {
                revocation_time, ..
            } if *revocation_time <= check_date => {
                report_item!(
                    OCSP_CHECK,
                    format!(
                        "Certificate was revoked by {} on {revocation_time}.",
                        certificate.issuer()
                    ),
                    "OcspValidator::validate_issued_by"
                )
                .validation_code(CERTIFICATE_REVOKED)
                .certificate(certificate.subject())
                .invalid(report);
            }

            OcspCertStatus::Revoked {
                revocation_time, ..
            } => {
                report_item!(
                    OCSP_CHECK,
                    format!(
                        "Certificate was revoked by {} on {revocation_time}, after the check date {check_date}.",
                        certificate.issuer()
                    ),
                    "OcspValidator::validate_issued_by"
                )
                .validation_code(REVOKED_AFTER_CHECK_DATE)
                .certificate(certificate.subject())
                .informational(report);
            }

            OcspCertStatus::Unknown => {
                report_item!(
                    OCSP_CHECK,
                    "OCSP responder does not know the certificate's status.",
                    "OcspValidator::validate_issued_by"
                )
                .validation_code(CERT_STATUS_UNKNOWN)
                .certificate(certificate.subject())
                .indeterminate(report);
            }
        }
    }

    fn find_responder<'r>(&'r self, response: &'r OcspResponse) -> Option<&'r Certificate> {
        let responder_id = response.responder_id();

        if let Some(embedded) = response
            .certificates()
            .iter()
            .find(|cert| responder_id.matches(cert))
        {
            return Some(embedded);
        }

        match responder_id {
            ResponderId::ByName(name) => self.retriever.retrieve_by_subject(name),
            ResponderId::ByKey(key_hash) => self.retriever.retrieve_by_key_hash(key_hash),
        }
    }

    // A delegated responder is issued and signed by the issuing CA.
    fn is_delegated_responder(&self, responder: &Certificate, ca: Option<&Certificate>) -> bool {
        let Some(ca) = ca else {
            return false;
        };

        responder.issuer_raw() == ca.subject_raw()
            && self.verifier.verify_signature(
                ca,
                responder.tbs_certificate(),
                responder.signature(),
                responder.signature_algorithm(),
            )
    }
}
