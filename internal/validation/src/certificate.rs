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
use x509_parser::{
    certificate::X509Certificate,
    extensions::{ExtendedKeyUsage, KeyUsage, ParsedExtension},
    prelude::FromDer,
};

use crate::{
    extensions::{BasicConstraints, ExtendedKeyUsageExtension, KeyUsageExtension},
    internal::time::asn1_time_to_datetime,
    ValidationError,
};

const OCSP_NO_CHECK_OID: &str = "1.3.6.1.5.5.7.48.1.5";

/// An immutable view of one X.509 certificate, reduced to the fields the
/// validation engine reads.
///
/// A `Certificate` is created either by decoding DER with
/// [`Certificate::from_der`] or, for callers that decode certificates
/// themselves, with a [`CertificateBuilder`].
#[derive(Clone, Debug)]
pub struct Certificate {
    der: Option<Vec<u8>>,
    subject: String,
    subject_raw: Vec<u8>,
    issuer: String,
    issuer_raw: Vec<u8>,
    serial_number: Vec<u8>,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
    public_key: Vec<u8>,
    public_key_bits: Vec<u8>,
    key_usage: Option<Vec<KeyUsageExtension>>,
    extended_key_usage: Option<Vec<ExtendedKeyUsageExtension>>,
    basic_constraints: Option<BasicConstraints>,
    subject_key_identifier: Option<Vec<u8>>,
    authority_key_identifier: Option<Vec<u8>>,
    ocsp_no_check: bool,
    tbs_certificate: Vec<u8>,
    signature_algorithm: String,
    signature: Vec<u8>,
}

impl Certificate {
    /// Decode a DER-encoded X.509 certificate.
    pub fn from_der(der: &[u8]) -> Result<Self, ValidationError> {
        let (_, cert) = X509Certificate::from_der(der)
            .map_err(|e| ValidationError::InvalidCertificate(e.to_string()))?;

        let validity = cert.validity();
        let not_before = asn1_time_to_datetime(&validity.not_before).ok_or_else(|| {
            ValidationError::InvalidCertificate("notBefore is out of range".to_string())
        })?;
        let not_after = asn1_time_to_datetime(&validity.not_after).ok_or_else(|| {
            ValidationError::InvalidCertificate("notAfter is out of range".to_string())
        })?;

        let mut key_usage = None;
        let mut extended_key_usage = None;
        let mut basic_constraints = None;
        let mut subject_key_identifier = None;
        let mut authority_key_identifier = None;
        let mut ocsp_no_check = false;

        for ext in cert.extensions() {
            match ext.parsed_extension() {
                ParsedExtension::KeyUsage(ku) => {
                    key_usage = Some(key_usage_bits(ku));
                }
                ParsedExtension::ExtendedKeyUsage(eku) => {
                    extended_key_usage = Some(extended_key_usage_purposes(eku));
                }
                ParsedExtension::BasicConstraints(bc) => {
                    basic_constraints = Some(BasicConstraints {
                        ca: bc.ca,
                        path_len_constraint: bc.path_len_constraint,
                    });
                }
                ParsedExtension::SubjectKeyIdentifier(ski) => {
                    subject_key_identifier = Some(ski.0.to_vec());
                }
                ParsedExtension::AuthorityKeyIdentifier(aki) => {
                    authority_key_identifier =
                        aki.key_identifier.as_ref().map(|kid| kid.0.to_vec());
                }
                _ => {
                    if ext.oid.to_id_string() == OCSP_NO_CHECK_OID {
                        ocsp_no_check = true;
                    }
                }
            }
        }

        let public_key = cert.public_key();

        Ok(Self {
            der: Some(der.to_vec()),
            subject: cert.subject().to_string(),
            subject_raw: cert.subject().as_raw().to_vec(),
            issuer: cert.issuer().to_string(),
            issuer_raw: cert.issuer().as_raw().to_vec(),
            serial_number: cert.raw_serial().to_vec(),
            not_before,
            not_after,
            public_key: public_key.raw.to_vec(),
            public_key_bits: public_key.subject_public_key.data.to_vec(),
            key_usage,
            extended_key_usage,
            basic_constraints,
            subject_key_identifier,
            authority_key_identifier,
            ocsp_no_check,
            tbs_certificate: cert.tbs_certificate.as_ref().to_vec(),
            signature_algorithm: cert.signature_algorithm.algorithm.to_id_string(),
            signature: cert.signature_value.data.to_vec(),
        })
    }

    /// Start building a certificate from already-decoded fields.
    pub fn builder<S: Into<String>, I: Into<String>>(subject: S, issuer: I) -> CertificateBuilder {
        CertificateBuilder::new(subject, issuer)
    }

    /// The DER encoding this certificate was decoded from, if any.
    pub fn der(&self) -> Option<&[u8]> {
        self.der.as_deref()
    }

    /// Human-readable subject name.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Encoded subject name; used for issuer matching.
    pub fn subject_raw(&self) -> &[u8] {
        &self.subject_raw
    }

    /// Human-readable issuer name.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Encoded issuer name; used for issuer matching.
    pub fn issuer_raw(&self) -> &[u8] {
        &self.issuer_raw
    }

    /// Serial number as the big-endian content octets of its DER `INTEGER`.
    pub fn serial_number(&self) -> &[u8] {
        &self.serial_number
    }

    /// Serial number rendered as lowercase hex.
    pub fn serial_number_hex(&self) -> String {
        hex::encode(&self.serial_number)
    }

    /// Start of the validity interval.
    pub fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    /// End of the validity interval.
    pub fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    /// DER-encoded `SubjectPublicKeyInfo`.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Content of the `subjectPublicKey` bit string; hashed for OCSP key
    /// identifiers.
    pub fn public_key_bits(&self) -> &[u8] {
        &self.public_key_bits
    }

    /// Key usage bits, or `None` if the extension is absent.
    pub fn key_usage(&self) -> Option<&[KeyUsageExtension]> {
        self.key_usage.as_deref()
    }

    /// Extended key usage purposes, or `None` if the extension is absent.
    pub fn extended_key_usage(&self) -> Option<&[ExtendedKeyUsageExtension]> {
        self.extended_key_usage.as_deref()
    }

    /// Basic constraints, or `None` if the extension is absent.
    pub fn basic_constraints(&self) -> Option<&BasicConstraints> {
        self.basic_constraints.as_ref()
    }

    /// Subject key identifier, if present.
    pub fn subject_key_identifier(&self) -> Option<&[u8]> {
        self.subject_key_identifier.as_deref()
    }

    /// Key identifier from the authority key identifier extension, if
    /// present.
    pub fn authority_key_identifier(&self) -> Option<&[u8]> {
        self.authority_key_identifier.as_deref()
    }

    /// Returns `true` if the certificate carries `id-pkix-ocsp-nocheck`.
    pub fn has_ocsp_no_check(&self) -> bool {
        self.ocsp_no_check
    }

    /// The signed portion of the certificate.
    pub fn tbs_certificate(&self) -> &[u8] {
        &self.tbs_certificate
    }

    /// Dotted OID of the algorithm the issuer used to sign this certificate.
    pub fn signature_algorithm(&self) -> &str {
        &self.signature_algorithm
    }

    /// The issuer's signature over [`Self::tbs_certificate`].
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Returns `true` if subject and issuer names are identical.
    pub fn is_self_issued(&self) -> bool {
        self.subject_raw == self.issuer_raw
    }

    /// Returns `true` if `date` is inside the validity interval (both ends
    /// inclusive).
    pub fn is_valid_at(&self, date: DateTime<Utc>) -> bool {
        self.not_before <= date && date <= self.not_after
    }
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        match (&self.der, &other.der) {
            (Some(a), Some(b)) => a == b,
            _ => {
                self.subject_raw == other.subject_raw
                    && self.issuer_raw == other.issuer_raw
                    && self.serial_number == other.serial_number
                    && self.public_key == other.public_key
            }
        }
    }
}

impl Eq for Certificate {}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.subject)
    }
}

/// Assembles a [`Certificate`] from fields the caller has already decoded.
///
/// Encoded names default to the UTF-8 bytes of the human-readable names.
#[derive(Clone, Debug)]
pub struct CertificateBuilder {
    cert: Certificate,
}

impl CertificateBuilder {
    /// Create a builder for a certificate with the given names.
    pub fn new<S: Into<String>, I: Into<String>>(subject: S, issuer: I) -> Self {
        let subject = subject.into();
        let issuer = issuer.into();

        Self {
            cert: Certificate {
                der: None,
                subject_raw: subject.as_bytes().to_vec(),
                subject,
                issuer_raw: issuer.as_bytes().to_vec(),
                issuer,
                serial_number: vec![1],
                not_before: DateTime::UNIX_EPOCH,
                not_after: DateTime::<Utc>::MAX_UTC,
                public_key: Vec::new(),
                public_key_bits: Vec::new(),
                key_usage: None,
                extended_key_usage: None,
                basic_constraints: None,
                subject_key_identifier: None,
                authority_key_identifier: None,
                ocsp_no_check: false,
                tbs_certificate: Vec::new(),
                signature_algorithm: String::new(),
                signature: Vec::new(),
            },
        }
    }

    /// Set the encoded subject name.
    pub fn subject_raw(mut self, raw: &[u8]) -> Self {
        self.cert.subject_raw = raw.to_vec();
        self
    }

    /// Set the encoded issuer name.
    pub fn issuer_raw(mut self, raw: &[u8]) -> Self {
        self.cert.issuer_raw = raw.to_vec();
        self
    }

    /// Set the serial number (big-endian content octets).
    pub fn serial_number(mut self, serial: &[u8]) -> Self {
        self.cert.serial_number = serial.to_vec();
        self
    }

    /// Set the validity interval.
    pub fn validity(mut self, not_before: DateTime<Utc>, not_after: DateTime<Utc>) -> Self {
        self.cert.not_before = not_before;
        self.cert.not_after = not_after;
        self
    }

    /// Set the DER-encoded `SubjectPublicKeyInfo` and the content of its
    /// `subjectPublicKey` bit string.
    pub fn public_key(mut self, spki: &[u8], key_bits: &[u8]) -> Self {
        self.cert.public_key = spki.to_vec();
        self.cert.public_key_bits = key_bits.to_vec();
        self
    }

    /// Add a key usage extension asserting the given bits.
    pub fn key_usage(mut self, bits: &[KeyUsageExtension]) -> Self {
        self.cert.key_usage = Some(bits.to_vec());
        self
    }

    /// Add an extended key usage extension listing the given purposes.
    pub fn extended_key_usage(mut self, purposes: &[ExtendedKeyUsageExtension]) -> Self {
        self.cert.extended_key_usage = Some(purposes.to_vec());
        self
    }

    /// Add a basic constraints extension.
    pub fn basic_constraints(mut self, ca: bool, path_len_constraint: Option<u32>) -> Self {
        self.cert.basic_constraints = Some(BasicConstraints {
            ca,
            path_len_constraint,
        });
        self
    }

    /// Set the subject key identifier.
    pub fn subject_key_identifier(mut self, kid: &[u8]) -> Self {
        self.cert.subject_key_identifier = Some(kid.to_vec());
        self
    }

    /// Set the authority key identifier.
    pub fn authority_key_identifier(mut self, kid: &[u8]) -> Self {
        self.cert.authority_key_identifier = Some(kid.to_vec());
        self
    }

    /// Mark the certificate with `id-pkix-ocsp-nocheck`.
    pub fn ocsp_no_check(mut self) -> Self {
        self.cert.ocsp_no_check = true;
        self
    }

    /// Set the signed bytes, the signature algorithm OID, and the signature
    /// value.
    pub fn signature<S: Into<String>>(
        mut self,
        tbs_certificate: &[u8],
        signature_algorithm: S,
        signature: &[u8],
    ) -> Self {
        self.cert.tbs_certificate = tbs_certificate.to_vec();
        self.cert.signature_algorithm = signature_algorithm.into();
        self.cert.signature = signature.to_vec();
        self
    }

    /// Finish building.
    pub fn build(self) -> Certificate {
        self.cert
    }
}

fn key_usage_bits(ku: &KeyUsage) -> Vec<KeyUsageExtension> {
    let mut bits = Vec::new();

    let flags = [
        (ku.digital_signature(), KeyUsageExtension::DigitalSignature),
        (ku.non_repudiation(), KeyUsageExtension::NonRepudiation),
        (ku.key_encipherment(), KeyUsageExtension::KeyEncipherment),
        (ku.data_encipherment(), KeyUsageExtension::DataEncipherment),
        (ku.key_agreement(), KeyUsageExtension::KeyAgreement),
        (ku.key_cert_sign(), KeyUsageExtension::KeyCertSign),
        (ku.crl_sign(), KeyUsageExtension::CrlSign),
        (ku.encipher_only(), KeyUsageExtension::EncipherOnly),
        (ku.decipher_only(), KeyUsageExtension::DecipherOnly),
    ];

    for (set, bit) in flags {
        if set {
            bits.push(bit);
        }
    }

    bits
}

fn extended_key_usage_purposes(eku: &ExtendedKeyUsage) -> Vec<ExtendedKeyUsageExtension> {
    let mut purposes = Vec::new();

    let known = [
        (eku.any, ExtendedKeyUsageExtension::Any),
        (eku.server_auth, ExtendedKeyUsageExtension::ServerAuth),
        (eku.client_auth, ExtendedKeyUsageExtension::ClientAuth),
        (eku.code_signing, ExtendedKeyUsageExtension::CodeSigning),
        (eku.email_protection, ExtendedKeyUsageExtension::EmailProtection),
        (eku.time_stamping, ExtendedKeyUsageExtension::TimeStamping),
        (eku.ocsp_signing, ExtendedKeyUsageExtension::OcspSigning),
    ];

    for (set, purpose) in known {
        if set {
            purposes.push(purpose);
        }
    }

    purposes.extend(
        eku.other
            .iter()
            .map(|oid| ExtendedKeyUsageExtension::Other(oid.to_id_string())),
    );

    purposes
}
