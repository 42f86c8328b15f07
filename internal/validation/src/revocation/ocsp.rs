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
use rasn::types::ObjectIdentifier;
use rasn_ocsp::{BasicOcspResponse, CertStatus, OcspResponseStatus};

use crate::{
    hash::{sha1, sha256},
    revocation::CrlReason,
    Certificate, ValidationError,
};

const SHA1_OID: &str = "1.3.14.3.2.26";
const SHA256_OID: &str = "2.16.840.1.101.3.4.2.1";

/// A decoded basic OCSP response.
///
/// An `OcspResponse` is created either by decoding DER with
/// [`OcspResponse::from_der`] or with an [`OcspResponseBuilder`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OcspResponse {
    der: Option<Vec<u8>>,
    responder_id: ResponderId,
    produced_at: DateTime<Utc>,
    responses: Vec<OcspSingleResponse>,
    certificates: Vec<Certificate>,
    tbs_response_data: Vec<u8>,
    signature_algorithm: String,
    signature: Vec<u8>,
}

impl OcspResponse {
    /// Decode a DER-encoded `OCSPResponse`.
    ///
    /// A response whose status is not `successful` carries no revocation
    /// information and is reported as
    /// [`ValidationError::OcspResponseNotSuccessful`].
    pub fn from_der(der: &[u8]) -> Result<Self, ValidationError> {
        let ocsp_response = rasn::der::decode::<rasn_ocsp::OcspResponse>(der)
            .map_err(|e| ValidationError::InvalidOcspResponse(e.to_string()))?;

        if ocsp_response.status != OcspResponseStatus::Successful {
            return Err(ValidationError::OcspResponseNotSuccessful(format!(
                "{:?}",
                ocsp_response.status
            )));
        }

        let response_bytes = ocsp_response.bytes.ok_or_else(|| {
            ValidationError::InvalidOcspResponse("response bytes are missing".to_string())
        })?;

        let basic_response = rasn::der::decode::<BasicOcspResponse>(&response_bytes.response)
            .map_err(|e| ValidationError::InvalidOcspResponse(e.to_string()))?;

        let response_data = &basic_response.tbs_response_data;

        // The signature covers the ResponseData exactly as encoded by the
        // responder.
        let tbs_response_data = first_inner_element(&response_bytes.response)
            .ok_or_else(|| {
                ValidationError::InvalidOcspResponse("malformed response data".to_string())
            })?
            .to_vec();

        let responder_id = match &response_data.responder_id {
            rasn_ocsp::ResponderId::ByName(name) => ResponderId::ByName(
                rasn::der::encode(name)
                    .map_err(|e| ValidationError::InvalidOcspResponse(e.to_string()))?,
            ),
            rasn_ocsp::ResponderId::ByKey(key_hash) => ResponderId::ByKey(key_hash.to_vec()),
        };

        let mut responses = Vec::new();
        for single_response in &response_data.responses {
            let cert_id = &single_response.cert_id;

            let serial_number = rasn::der::encode(&cert_id.serial_number)
                .ok()
                .and_then(|encoded| integer_content(&encoded))
                .ok_or_else(|| {
                    ValidationError::InvalidOcspResponse("invalid serial number".to_string())
                })?;

            let cert_status = match &single_response.cert_status {
                CertStatus::Good => OcspCertStatus::Good,
                CertStatus::Revoked(revoked_info) => OcspCertStatus::Revoked {
                    revocation_time: revoked_info.revocation_time.with_timezone(&Utc),
                    reason: revoked_info
                        .revocation_reason
                        .clone()
                        .map(|reason| CrlReason::from_code(reason as u8)),
                },
                CertStatus::Unknown(_) => OcspCertStatus::Unknown,
            };

            responses.push(OcspSingleResponse {
                cert_id: OcspCertId {
                    hash_algorithm: oid_to_string(&cert_id.hash_algorithm.algorithm),
                    issuer_name_hash: cert_id.issuer_name_hash.to_vec(),
                    issuer_key_hash: cert_id.issuer_key_hash.to_vec(),
                    serial_number,
                },
                cert_status,
                this_update: single_response.this_update.with_timezone(&Utc),
                next_update: single_response
                    .next_update
                    .as_ref()
                    .map(|next_update| next_update.with_timezone(&Utc)),
            });
        }

        let mut certificates = Vec::new();
        if let Some(certs) = &basic_response.certs {
            for cert in certs {
                let cert_der = rasn::der::encode(cert)
                    .map_err(|e| ValidationError::InvalidOcspResponse(e.to_string()))?;
                certificates.push(Certificate::from_der(&cert_der)?);
            }
        }

        Ok(Self {
            der: Some(der.to_vec()),
            responder_id,
            produced_at: response_data.produced_at.with_timezone(&Utc),
            responses,
            certificates,
            tbs_response_data,
            signature_algorithm: oid_to_string(&basic_response.signature_algorithm.algorithm),
            signature: basic_response.signature.as_raw_slice().to_vec(),
        })
    }

    /// Start building an OCSP response from already-decoded fields.
    pub fn builder(responder_id: ResponderId, produced_at: DateTime<Utc>) -> OcspResponseBuilder {
        OcspResponseBuilder::new(responder_id, produced_at)
    }

    /// The DER encoding this response was decoded from, if any.
    pub fn der(&self) -> Option<&[u8]> {
        self.der.as_deref()
    }

    /// Identifies the certificate that signed this response.
    pub fn responder_id(&self) -> &ResponderId {
        &self.responder_id
    }

    /// When the responder signed this response.
    pub fn produced_at(&self) -> DateTime<Utc> {
        self.produced_at
    }

    /// Every single response, in encoding order.
    pub fn responses(&self) -> &[OcspSingleResponse] {
        &self.responses
    }

    /// Certificates embedded in the response (typically the responder's).
    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    /// Returns the single response about `certificate`, if any.
    ///
    /// Serial number and issuer name hash must match. When `issuer` is known
    /// the issuer key hash must match as well.
    pub fn single_response_for(
        &self,
        certificate: &Certificate,
        issuer: Option<&Certificate>,
    ) -> Option<&OcspSingleResponse> {
        self.responses
            .iter()
            .find(|single| single.cert_id.matches(certificate, issuer))
    }

    /// The signed portion of the response.
    pub fn tbs_response_data(&self) -> &[u8] {
        &self.tbs_response_data
    }

    /// Dotted OID of the algorithm the responder used to sign this response.
    pub fn signature_algorithm(&self) -> &str {
        &self.signature_algorithm
    }

    /// The responder's signature over [`Self::tbs_response_data`].
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

/// Identifies the certificate that signed an OCSP response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResponderId {
    /// Encoded subject name of the responder certificate.
    ByName(Vec<u8>),

    /// SHA-1 hash of the responder's `subjectPublicKey`.
    ByKey(Vec<u8>),
}

impl ResponderId {
    /// Returns `true` if `cert` is the certificate this identifier names.
    pub fn matches(&self, cert: &Certificate) -> bool {
        match self {
            Self::ByName(name) => cert.subject_raw() == name.as_slice(),
            Self::ByKey(key_hash) => sha1(cert.public_key_bits()) == *key_hash,
        }
    }
}

/// Identifies the certificate a single OCSP response is about.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OcspCertId {
    /// Dotted OID of the hash algorithm used for the two hashes below.
    pub hash_algorithm: String,

    /// Hash of the issuer's encoded subject name.
    pub issuer_name_hash: Vec<u8>,

    /// Hash of the issuer's `subjectPublicKey`.
    pub issuer_key_hash: Vec<u8>,

    /// Serial number of the certificate (big-endian content octets).
    pub serial_number: Vec<u8>,
}

impl OcspCertId {
    /// Compute the SHA-1 `CertID` of `certificate`, issued by `issuer`.
    pub fn for_certificate(certificate: &Certificate, issuer: &Certificate) -> Self {
        Self {
            hash_algorithm: SHA1_OID.to_string(),
            issuer_name_hash: sha1(certificate.issuer_raw()),
            issuer_key_hash: sha1(issuer.public_key_bits()),
            serial_number: certificate.serial_number().to_vec(),
        }
    }

    /// Returns `true` if this identifier designates `certificate`.
    ///
    /// Without an `issuer` only the serial number and issuer name hash are
    /// compared.
    pub fn matches(&self, certificate: &Certificate, issuer: Option<&Certificate>) -> bool {
        let Some(hash) = self.hash_fn() else {
            return false;
        };

        if self.serial_number != certificate.serial_number()
            || self.issuer_name_hash != hash(certificate.issuer_raw())
        {
            return false;
        }

        issuer.map_or(true, |issuer| {
            self.issuer_key_hash == hash(issuer.public_key_bits())
        })
    }

    fn hash_fn(&self) -> Option<fn(&[u8]) -> Vec<u8>> {
        match self.hash_algorithm.as_str() {
            SHA1_OID => Some(sha1),
            SHA256_OID => Some(sha256),
            _ => None,
        }
    }
}

/// Status of one certificate as reported by an OCSP responder.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OcspCertStatus {
    /// The certificate is not revoked.
    Good,

    /// The certificate was revoked.
    Revoked {
        /// When the certificate was revoked.
        revocation_time: DateTime<Utc>,

        /// Reason code, if the responder gave one.
        reason: Option<CrlReason>,
    },

    /// The responder does not know the certificate.
    Unknown,
}

/// The responder's statement about one certificate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OcspSingleResponse {
    /// The certificate this statement is about.
    pub cert_id: OcspCertId,

    /// Reported status.
    pub cert_status: OcspCertStatus,

    /// When the status was known to be correct.
    pub this_update: DateTime<Utc>,

    /// When newer information will be available, if announced.
    pub next_update: Option<DateTime<Utc>>,
}

/// Assembles an [`OcspResponse`] from fields the caller has already decoded.
#[derive(Clone, Debug)]
pub struct OcspResponseBuilder {
    response: OcspResponse,
}

impl OcspResponseBuilder {
    /// Create a builder for a response signed by `responder_id` at
    /// `produced_at`.
    pub fn new(responder_id: ResponderId, produced_at: DateTime<Utc>) -> Self {
        Self {
            response: OcspResponse {
                der: None,
                responder_id,
                produced_at,
                responses: Vec::new(),
                certificates: Vec::new(),
                tbs_response_data: Vec::new(),
                signature_algorithm: String::new(),
                signature: Vec::new(),
            },
        }
    }

    /// Add a single response.
    pub fn single_response(mut self, single_response: OcspSingleResponse) -> Self {
        self.response.responses.push(single_response);
        self
    }

    /// Embed a certificate (typically the responder's).
    pub fn certificate(mut self, certificate: Certificate) -> Self {
        self.response.certificates.push(certificate);
        self
    }

    /// Set the signed bytes, the signature algorithm OID, and the signature
    /// value.
    pub fn signature<S: Into<String>>(
        mut self,
        tbs_response_data: &[u8],
        signature_algorithm: S,
        signature: &[u8],
    ) -> Self {
        self.response.tbs_response_data = tbs_response_data.to_vec();
        self.response.signature_algorithm = signature_algorithm.into();
        self.response.signature = signature.to_vec();
        self
    }

    /// Finish building.
    pub fn build(self) -> OcspResponse {
        self.response
    }
}

fn oid_to_string(oid: &ObjectIdentifier) -> String {
    oid.iter()
        .map(|arc| arc.to_string())
        .collect::<Vec<String>>()
        .join(".")
}

// Returns the header length and content length of the DER element at the
// start of `encoded`. Only single-octet tags are expected here.
fn der_header(encoded: &[u8]) -> Option<(usize, usize)> {
    let len_byte = *encoded.get(1)?;

    if len_byte & 0x80 == 0 {
        return Some((2, usize::from(len_byte)));
    }

    let len_octets = usize::from(len_byte & 0x7f);
    let len = encoded
        .get(2..2 + len_octets)?
        .iter()
        .try_fold(0usize, |len, octet| {
            len.checked_mul(256)?.checked_add(usize::from(*octet))
        })?;

    Some((2 + len_octets, len))
}

// Strip the tag and length octets from a DER-encoded INTEGER.
fn integer_content(encoded: &[u8]) -> Option<Vec<u8>> {
    let (header_len, len) = der_header(encoded)?;
    encoded
        .get(header_len..header_len + len)
        .map(<[u8]>::to_vec)
}

// Returns the complete encoding of the first element inside a SEQUENCE.
fn first_inner_element(encoded: &[u8]) -> Option<&[u8]> {
    let (outer_header_len, _) = der_header(encoded)?;
    let inner = encoded.get(outer_header_len..)?;
    let (header_len, len) = der_header(inner)?;
    inner.get(..header_len + len)
}
