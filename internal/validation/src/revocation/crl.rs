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

use std::fmt;

use chrono::{DateTime, Utc};
use x509_parser::{prelude::FromDer, revocation_list::CertificateRevocationList};

use crate::{internal::time::asn1_time_to_datetime, ValidationError};

/// A decoded certificate revocation list.
///
/// A `Crl` is created either by decoding DER with [`Crl::from_der`] or with
/// a [`CrlBuilder`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Crl {
    der: Option<Vec<u8>>,
    issuer: String,
    issuer_raw: Vec<u8>,
    this_update: DateTime<Utc>,
    next_update: Option<DateTime<Utc>>,
    entries: Vec<CrlEntry>,
    tbs_cert_list: Vec<u8>,
    signature_algorithm: String,
    signature: Vec<u8>,
}

impl Crl {
    /// Decode a DER-encoded `CertificateList`.
    pub fn from_der(der: &[u8]) -> Result<Self, ValidationError> {
        let (_, crl) = CertificateRevocationList::from_der(der)
            .map_err(|e| ValidationError::InvalidCrl(e.to_string()))?;

        let this_update = asn1_time_to_datetime(&crl.last_update())
            .ok_or_else(|| ValidationError::InvalidCrl("thisUpdate is out of range".to_string()))?;

        let next_update = match crl.next_update() {
            Some(next_update) => Some(asn1_time_to_datetime(&next_update).ok_or_else(|| {
                ValidationError::InvalidCrl("nextUpdate is out of range".to_string())
            })?),
            None => None,
        };

        let mut entries = Vec::new();
        for revoked in crl.iter_revoked_certificates() {
            let revocation_date =
                asn1_time_to_datetime(&revoked.revocation_date).ok_or_else(|| {
                    ValidationError::InvalidCrl("revocationDate is out of range".to_string())
                })?;

            entries.push(CrlEntry {
                serial_number: revoked.raw_serial().to_vec(),
                revocation_date,
                reason: revoked
                    .reason_code()
                    .map(|(_critical, code)| CrlReason::from_code(code.0)),
            });
        }

        Ok(Self {
            der: Some(der.to_vec()),
            issuer: crl.issuer().to_string(),
            issuer_raw: crl.issuer().as_raw().to_vec(),
            this_update,
            next_update,
            entries,
            tbs_cert_list: crl.tbs_cert_list.as_ref().to_vec(),
            signature_algorithm: crl.signature_algorithm.algorithm.to_id_string(),
            signature: crl.signature_value.data.to_vec(),
        })
    }

    /// Start building a CRL from already-decoded fields.
    pub fn builder<S: Into<String>>(issuer: S, this_update: DateTime<Utc>) -> CrlBuilder {
        CrlBuilder::new(issuer, this_update)
    }

    /// The DER encoding this CRL was decoded from, if any.
    pub fn der(&self) -> Option<&[u8]> {
        self.der.as_deref()
    }

    /// Human-readable issuer name.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Encoded issuer name.
    pub fn issuer_raw(&self) -> &[u8] {
        &self.issuer_raw
    }

    /// When this CRL was issued.
    pub fn this_update(&self) -> DateTime<Utc> {
        self.this_update
    }

    /// When the next CRL is due, if announced.
    pub fn next_update(&self) -> Option<DateTime<Utc>> {
        self.next_update
    }

    /// Every revoked entry, in encoding order.
    pub fn entries(&self) -> &[CrlEntry] {
        &self.entries
    }

    /// Returns the first entry whose serial number matches and whose reason
    /// is not `removeFromCRL`.
    pub fn find_revocation(&self, serial_number: &[u8]) -> Option<&CrlEntry> {
        self.entries.iter().find(|entry| {
            entry.serial_number == serial_number && entry.reason != Some(CrlReason::RemoveFromCrl)
        })
    }

    /// The signed portion of the CRL.
    pub fn tbs_cert_list(&self) -> &[u8] {
        &self.tbs_cert_list
    }

    /// Dotted OID of the algorithm the issuer used to sign this CRL.
    pub fn signature_algorithm(&self) -> &str {
        &self.signature_algorithm
    }

    /// The issuer's signature over [`Self::tbs_cert_list`].
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

/// One revoked certificate listed in a [`Crl`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CrlEntry {
    /// Serial number (big-endian content octets of the DER `INTEGER`).
    pub serial_number: Vec<u8>,

    /// When the certificate was revoked.
    pub revocation_date: DateTime<Utc>,

    /// Reason code, if the entry carries one.
    pub reason: Option<CrlReason>,
}

/// Revocation reason codes (RFC 5280, section 5.3.1).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CrlReason {
    /// `unspecified`
    Unspecified,

    /// `keyCompromise`
    KeyCompromise,

    /// `cACompromise`
    CaCompromise,

    /// `affiliationChanged`
    AffiliationChanged,

    /// `superseded`
    Superseded,

    /// `cessationOfOperation`
    CessationOfOperation,

    /// `certificateHold`
    CertificateHold,

    /// `removeFromCRL`; the entry lifts an earlier hold and is not a
    /// revocation.
    RemoveFromCrl,

    /// `privilegeWithdrawn`
    PrivilegeWithdrawn,

    /// `aACompromise`
    AaCompromise,

    /// A code not defined by RFC 5280.
    Other(u8),
}

impl CrlReason {
    /// Map an RFC 5280 reason code to a `CrlReason`.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Unspecified,
            1 => Self::KeyCompromise,
            2 => Self::CaCompromise,
            3 => Self::AffiliationChanged,
            4 => Self::Superseded,
            5 => Self::CessationOfOperation,
            6 => Self::CertificateHold,
            8 => Self::RemoveFromCrl,
            9 => Self::PrivilegeWithdrawn,
            10 => Self::AaCompromise,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for CrlReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified => f.write_str("unspecified"),
            Self::KeyCompromise => f.write_str("keyCompromise"),
            Self::CaCompromise => f.write_str("cACompromise"),
            Self::AffiliationChanged => f.write_str("affiliationChanged"),
            Self::Superseded => f.write_str("superseded"),
            Self::CessationOfOperation => f.write_str("cessationOfOperation"),
            Self::CertificateHold => f.write_str("certificateHold"),
            Self::RemoveFromCrl => f.write_str("removeFromCRL"),
            Self::PrivilegeWithdrawn => f.write_str("privilegeWithdrawn"),
            Self::AaCompromise => f.write_str("aACompromise"),
            Self::Other(code) => write!(f, "reason code {code}"),
        }
    }
}

/// Assembles a [`Crl`] from fields the caller has already decoded.
///
/// The encoded issuer name defaults to the UTF-8 bytes of the human-readable
/// name.
#[derive(Clone, Debug)]
pub struct CrlBuilder {
    crl: Crl,
}

impl CrlBuilder {
    /// Create a builder for a CRL issued by `issuer` at `this_update`.
    pub fn new<S: Into<String>>(issuer: S, this_update: DateTime<Utc>) -> Self {
        let issuer = issuer.into();

        Self {
            crl: Crl {
                der: None,
                issuer_raw: issuer.as_bytes().to_vec(),
                issuer,
                this_update,
                next_update: None,
                entries: Vec::new(),
                tbs_cert_list: Vec::new(),
                signature_algorithm: String::new(),
                signature: Vec::new(),
            },
        }
    }

    /// Set the encoded issuer name.
    pub fn issuer_raw(mut self, raw: &[u8]) -> Self {
        self.crl.issuer_raw = raw.to_vec();
        self
    }

    /// Announce when the next CRL is due.
    pub fn next_update(mut self, next_update: DateTime<Utc>) -> Self {
        self.crl.next_update = Some(next_update);
        self
    }

    /// List a revoked certificate.
    pub fn revoked(
        mut self,
        serial_number: &[u8],
        revocation_date: DateTime<Utc>,
        reason: Option<CrlReason>,
    ) -> Self {
        self.crl.entries.push(CrlEntry {
            serial_number: serial_number.to_vec(),
            revocation_date,
            reason,
        });
        self
    }

    /// Set the signed bytes, the signature algorithm OID, and the signature
    /// value.
    pub fn signature<S: Into<String>>(
        mut self,
        tbs_cert_list: &[u8],
        signature_algorithm: S,
        signature: &[u8],
    ) -> Self {
        self.crl.tbs_cert_list = tbs_cert_list.to_vec();
        self.crl.signature_algorithm = signature_algorithm.into();
        self.crl.signature = signature.to_vec();
        self
    }

    /// Finish building.
    pub fn build(self) -> Crl {
        self.crl
    }
}
