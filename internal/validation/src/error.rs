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

use thiserror::Error;

/// Describes the hard errors that can occur while preparing or running a
/// validation.
///
/// Conditions that an attacker can produce with well-formed input (a missing
/// issuer, a stale CRL, a forged signature) are never reported through this
/// type. They become items in the [`ValidationReport`] instead.
///
/// [`ValidationReport`]: sigtrust_report::ValidationReport
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum ValidationError {
    /// The certificate could not be decoded as DER-encoded X.509.
    #[error("the certificate could not be decoded: {0}")]
    InvalidCertificate(String),

    /// The CRL could not be decoded as a DER-encoded `CertificateList`.
    #[error("the CRL could not be decoded: {0}")]
    InvalidCrl(String),

    /// The OCSP response could not be decoded.
    #[error("the OCSP response could not be decoded: {0}")]
    InvalidOcspResponse(String),

    /// The OCSP responder did not return a `successful` response.
    #[error("the OCSP responder returned status {0}")]
    OcspResponseNotSuccessful(String),

    /// The settings format is not one of the supported formats.
    #[error("unsupported settings format: {0}")]
    UnsupportedSettingsFormat(String),

    /// The settings could not be parsed or failed a sanity check.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

impl From<config::ConfigError> for ValidationError {
    fn from(err: config::ConfigError) -> Self {
        Self::InvalidSettings(err.to_string())
    }
}

