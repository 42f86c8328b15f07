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

//! Stable identifiers for the rules that can fire during certificate
//! validation.
//!
//! These codes are attached to [`ReportItem`]s so callers can assert on which
//! rule fired independently of how the message was formatted.
//!
//! [`ReportItem`]: crate::ReportItem

// -- certificate chain --

/// The certificate is a configured trust anchor; the chain walk stops here.
pub const CERTIFICATE_TRUSTED: &str = "chain.certificateTrusted";

/// The certificate lacks an extension required for its role.
pub const EXTENSION_MISSING: &str = "chain.extensionMissing";

/// The check date is after the certificate's `notAfter`.
pub const CERTIFICATE_EXPIRED: &str = "chain.certificateExpired";

/// The check date is before the certificate's `notBefore`.
pub const CERTIFICATE_NOT_YET_VALID: &str = "chain.certificateNotYetValid";

/// No known certificate matches the certificate's issuer name.
pub const ISSUER_MISSING: &str = "chain.issuerMissing";

/// Candidate issuers exist, but none of their keys verifies the certificate's
/// signature.
pub const ISSUER_CANNOT_BE_VERIFIED: &str = "chain.issuerCannotBeVerified";

/// The chain ends in a self-signed certificate that is not a trust anchor.
pub const CERTIFICATE_NOT_TRUSTED: &str = "chain.certificateNotTrusted";

/// The chain walk exceeded the configured maximum chain length.
pub const CHAIN_TOO_LONG: &str = "chain.tooLong";

/// The certificate was already validated for the same role, check date and
/// depth during this walk; the earlier verdict is reused.
pub const CERTIFICATE_ALREADY_VALIDATED: &str = "chain.alreadyValidated";

// -- revocation (shared by CRL and OCSP) --

/// No CRL or OCSP response covers the certificate.
pub const NO_REVOCATION_DATA: &str = "revocation.noData";

/// The certificate carries `id-pkix-ocsp-nocheck`; revocation is not checked.
pub const OCSP_NO_CHECK: &str = "revocation.ocspNoCheck";

/// A revocation source could not reach a certain answer while another source
/// confirmed good standing.
pub const REVOCATION_SOURCE_INCONCLUSIVE: &str = "revocation.sourceInconclusive";

/// The certificate was revoked at or before the check date.
pub const CERTIFICATE_REVOKED: &str = "revocation.certificateRevoked";

/// The certificate was revoked, but only after the check date.
pub const REVOKED_AFTER_CHECK_DATE: &str = "revocation.revokedAfterCheckDate";

/// The revocation data was produced too long before the check date.
pub const FRESHNESS_CHECK_FAILED: &str = "revocation.freshnessCheckFailed";

// -- CRL --

/// No known certificate matches the CRL's issuer name.
pub const CRL_ISSUER_NOT_FOUND: &str = "crl.issuerNotFound";

/// The CRL issuer and the certificate's issuer do not chain to the same root.
pub const CRL_ISSUER_NO_COMMON_ROOT: &str = "crl.issuerNoCommonRoot";

/// The CRL's signature does not verify with the CRL issuer's key.
pub const CRL_INVALID: &str = "crl.invalid";

/// The CRL's `nextUpdate` is before the check date.
pub const UPDATE_DATE_BEFORE_CHECK_DATE: &str = "crl.updateDateBeforeCheckDate";

// -- OCSP --

/// The OCSP response has no single response for the certificate.
pub const OCSP_SERIAL_NOT_FOUND: &str = "ocsp.serialNotFound";

/// The certificate that signed the OCSP response could not be found.
pub const OCSP_RESPONDER_NOT_FOUND: &str = "ocsp.responderNotFound";

/// The OCSP response's signature does not verify with the responder's key.
pub const OCSP_INVALID: &str = "ocsp.invalid";

/// The responder is neither the issuing CA nor a responder delegated by it.
pub const OCSP_RESPONDER_NOT_AUTHORIZED: &str = "ocsp.responderNotAuthorized";

/// The OCSP response's `nextUpdate` is before the check date.
pub const OCSP_IS_NO_LONGER_VALID: &str = "ocsp.noLongerValid";

/// The responder reported the certificate's status as unknown.
pub const CERT_STATUS_UNKNOWN: &str = "ocsp.certStatusUnknown";
