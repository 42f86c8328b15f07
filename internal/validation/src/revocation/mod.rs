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

//! Revocation data and the validators that interpret it.
//!
//! The set of revocation mechanisms is closed: a certificate's status comes
//! from a [`Crl`] or an [`OcspResponse`], selected through
//! [`RevocationData`] and interpreted by [`RevocationDataValidator`].

use chrono::{DateTime, Utc};
use log::trace;
use sigtrust_report::ValidationReport;

use crate::{
    chain::ChainValidator, extensions::CertificateExtension, raw_signature::SignatureVerifier,
    settings::RevocationSettings, Certificate, IssuingCertificateRetriever, ValidationSettings,
};

mod crl;
pub use crl::{Crl, CrlBuilder, CrlEntry, CrlReason};

mod crl_validator;
pub use crl_validator::CrlValidator;

mod ocsp;
pub use ocsp::{
    OcspCertId, OcspCertStatus, OcspResponse, OcspResponseBuilder, OcspSingleResponse,
    ResponderId,
};

mod ocsp_validator;
pub use ocsp_validator::OcspValidator;

/// One revocation source that applies to a certificate.
#[derive(Clone, Copy, Debug)]
pub enum RevocationData<'a> {
    /// A certificate revocation list.
    Crl(&'a Crl),

    /// An OCSP response.
    Ocsp(&'a OcspResponse),
}

impl RevocationData<'_> {
    /// Short name of the mechanism, for log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Crl(_) => "CRL",
            Self::Ocsp(_) => "OCSP",
        }
    }
}

/// The CRLs and OCSP responses supplied for a validation run.
///
/// Like the [`IssuingCertificateRetriever`], the store is populated before
/// validation begins and only read during validation.
#[derive(Clone, Debug, Default)]
pub struct RevocationDataStore {
    crls: Vec<Crl>,
    ocsp_responses: Vec<OcspResponse>,
}

impl RevocationDataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add CRLs to the store.
    pub fn add_crls<I: IntoIterator<Item = Crl>>(&mut self, crls: I) {
        self.crls.extend(crls);
    }

    /// Add OCSP responses to the store.
    pub fn add_ocsp_responses<I: IntoIterator<Item = OcspResponse>>(&mut self, responses: I) {
        self.ocsp_responses.extend(responses);
    }

    /// Every CRL in the store.
    pub fn crls(&self) -> &[Crl] {
        &self.crls
    }

    /// Every OCSP response in the store.
    pub fn ocsp_responses(&self) -> &[OcspResponse] {
        &self.ocsp_responses
    }

    /// Returns every enabled revocation source that speaks about
    /// `certificate`.
    ///
    /// A CRL applies when its issuer name equals the certificate's issuer
    /// name. An OCSP response applies when it carries a single response for
    /// the certificate.
    pub fn applicable<'a>(
        &'a self,
        certificate: &Certificate,
        issuer: Option<&Certificate>,
        settings: &RevocationSettings,
    ) -> Vec<RevocationData<'a>> {
        let mut data = Vec::new();

        if settings.crl_enabled {
            data.extend(
                self.crls
                    .iter()
                    .filter(|crl| crl.issuer_raw() == certificate.issuer_raw())
                    .map(RevocationData::Crl),
            );
        }

        if settings.ocsp_enabled {
            data.extend(
                self.ocsp_responses
                    .iter()
                    .filter(|response| {
                        response
                            .single_response_for(certificate, issuer)
                            .is_some()
                    })
                    .map(RevocationData::Ocsp),
            );
        }

        trace!(
            "{} revocation source(s) apply to {}",
            data.len(),
            certificate.subject()
        );

        data
    }
}

/// Dispatches each [`RevocationData`] variant to its validator.
pub struct RevocationDataValidator<'a> {
    crl: CrlValidator<'a>,
    ocsp: OcspValidator<'a>,
}

impl<'a> RevocationDataValidator<'a> {
    /// Create validators that delegate issuer and responder checks to
    /// `chain_validator`.
    pub fn new(
        chain_validator: &'a dyn ChainValidator,
        retriever: &'a IssuingCertificateRetriever,
        verifier: &'a dyn SignatureVerifier,
        settings: &'a ValidationSettings,
    ) -> Self {
        Self {
            crl: CrlValidator::new(chain_validator, retriever, verifier, settings),
            ocsp: OcspValidator::new(chain_validator, retriever, verifier, settings),
        }
    }

    /// Set the chain depth of the certificate being checked. Revocation data
    /// signers are validated one level deeper.
    #[must_use]
    pub fn at_depth(self, depth: usize) -> Self {
        Self {
            crl: self.crl.at_depth(depth),
            ocsp: self.ocsp.at_depth(depth),
        }
    }

    /// Determine the revocation status of `certificate` at `check_date`
    /// according to `data`.
    pub fn validate(
        &self,
        report: &mut ValidationReport,
        certificate: &Certificate,
        data: RevocationData<'_>,
        check_date: DateTime<Utc>,
    ) {
        match data {
            RevocationData::Crl(crl) => self.crl.validate(report, certificate, crl, check_date),
            RevocationData::Ocsp(response) => {
                self.ocsp.validate(report, certificate, response, check_date)
            }
        }
    }

    /// Like [`Self::validate`], for a certificate whose issuer has already
    /// been verified by the caller.
    pub fn validate_issued_by(
        &self,
        report: &mut ValidationReport,
        certificate: &Certificate,
        issuer: &Certificate,
        data: RevocationData<'_>,
        check_date: DateTime<Utc>,
    ) {
        match data {
            RevocationData::Crl(crl) => self.crl.validate(report, certificate, crl, check_date),
            RevocationData::Ocsp(response) => self.ocsp.validate_issued_by(
                report,
                certificate,
                Some(issuer),
                response,
                check_date,
            ),
        }
    }
}

/// Validate the certificate that signed a CRL or OCSP response.
///
/// Findings about the signer are capped at indeterminate: a defective signer
/// makes its data unusable, but proves nothing about the certificate the
/// data describes.
pub(crate) fn validate_signer(
    chain_validator: &dyn ChainValidator,
    report: &mut ValidationReport,
    signer: &Certificate,
    check_date: DateTime<Utc>,
    required_extensions: &[CertificateExtension],
    depth: usize,
) {
    let mut signer_report = ValidationReport::new();
    chain_validator.validate(
        &mut signer_report,
        signer,
        check_date,
        required_extensions,
        depth,
    );

    if !signer_report.is_empty() {
        trace!(
            "signer {} is {}",
            signer.subject(),
            signer_report.validation_result()
        );
    }

    report.merge_as_indeterminate(signer_report);
}

/// Returns `check_date - freshness`, or `None` when the window reaches
/// past the earliest representable date.
pub(crate) fn freshness_limit(
    check_date: DateTime<Utc>,
    settings: &RevocationSettings,
) -> Option<DateTime<Utc>> {
    check_date.checked_sub_signed(settings.freshness())
}
