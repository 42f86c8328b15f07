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

//! Requirements that a certificate must satisfy for the role it plays in a
//! chain.
//!
//! A [`CertificateExtension`] is a predicate: [`CertificateExtension::exists_in`]
//! answers whether a certificate satisfies it. An absent extension is a normal
//! "not satisfied" outcome, never an error.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Certificate;

/// A requirement on one certificate extension.
///
/// Extensions are written in settings files as `kind:value` strings, for
/// example `key_usage:crl_sign`, `extended_key_usage:ocsp_signing`, or
/// `basic_constraints:ca`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum CertificateExtension {
    /// The key usage extension must be present and assert this bit.
    KeyUsage(KeyUsageExtension),

    /// The extended key usage extension must be present and list this
    /// purpose.
    ExtendedKeyUsage(ExtendedKeyUsageExtension),

    /// The basic constraints extension must be present and satisfy this
    /// constraint.
    BasicConstraints(BasicConstraintsExtension),
}

impl CertificateExtension {
    /// Returns `true` if `certificate` satisfies this requirement.
    pub fn exists_in(&self, certificate: &Certificate) -> bool {
        match self {
            Self::KeyUsage(bit) => certificate
                .key_usage()
                .is_some_and(|usages| usages.contains(bit)),

            Self::ExtendedKeyUsage(purpose) => {
                certificate.extended_key_usage().is_some_and(|purposes| {
                    purposes.contains(purpose)
                        || purposes.contains(&ExtendedKeyUsageExtension::Any)
                })
            }

            Self::BasicConstraints(constraint) => certificate
                .basic_constraints()
                .is_some_and(|bc| constraint.is_satisfied_by(bc)),
        }
    }
}

impl fmt::Display for CertificateExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyUsage(bit) => write!(f, "key_usage:{bit}"),
            Self::ExtendedKeyUsage(purpose) => write!(f, "extended_key_usage:{purpose}"),
            Self::BasicConstraints(constraint) => write!(f, "basic_constraints:{constraint}"),
        }
    }
}

impl FromStr for CertificateExtension {
    type Err = UnknownExtensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownExtensionError(s.to_owned());

        let (kind, value) = s.split_once(':').ok_or_else(unknown)?;

        match kind.trim() {
            "key_usage" => Ok(Self::KeyUsage(value.trim().parse().map_err(|_| unknown())?)),
            "extended_key_usage" => Ok(Self::ExtendedKeyUsage(
                value.trim().parse().map_err(|_| unknown())?,
            )),
            "basic_constraints" => Ok(Self::BasicConstraints(
                value.trim().parse().map_err(|_| unknown())?,
            )),
            _ => Err(unknown()),
        }
    }
}

impl TryFrom<String> for CertificateExtension {
    type Error = UnknownExtensionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CertificateExtension> for String {
    fn from(extension: CertificateExtension) -> Self {
        extension.to_string()
    }
}

/// One bit of the X.509 key usage extension (RFC 5280, section 4.2.1.3).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum KeyUsageExtension {
    /// `digitalSignature`
    DigitalSignature,

    /// `nonRepudiation` (also known as `contentCommitment`)
    NonRepudiation,

    /// `keyEncipherment`
    KeyEncipherment,

    /// `dataEncipherment`
    DataEncipherment,

    /// `keyAgreement`
    KeyAgreement,

    /// `keyCertSign`
    KeyCertSign,

    /// `cRLSign`
    CrlSign,

    /// `encipherOnly`
    EncipherOnly,

    /// `decipherOnly`
    DecipherOnly,
}

impl fmt::Display for KeyUsageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DigitalSignature => "digital_signature",
            Self::NonRepudiation => "non_repudiation",
            Self::KeyEncipherment => "key_encipherment",
            Self::DataEncipherment => "data_encipherment",
            Self::KeyAgreement => "key_agreement",
            Self::KeyCertSign => "key_cert_sign",
            Self::CrlSign => "crl_sign",
            Self::EncipherOnly => "encipher_only",
            Self::DecipherOnly => "decipher_only",
        })
    }
}

impl FromStr for KeyUsageExtension {
    type Err = UnknownExtensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "digital_signature" => Ok(Self::DigitalSignature),
            "non_repudiation" => Ok(Self::NonRepudiation),
            "key_encipherment" => Ok(Self::KeyEncipherment),
            "data_encipherment" => Ok(Self::DataEncipherment),
            "key_agreement" => Ok(Self::KeyAgreement),
            "key_cert_sign" => Ok(Self::KeyCertSign),
            "crl_sign" => Ok(Self::CrlSign),
            "encipher_only" => Ok(Self::EncipherOnly),
            "decipher_only" => Ok(Self::DecipherOnly),
            _ => Err(UnknownExtensionError(s.to_owned())),
        }
    }
}

/// One purpose of the X.509 extended key usage extension (RFC 5280, section
/// 4.2.1.12).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ExtendedKeyUsageExtension {
    /// `anyExtendedKeyUsage`; satisfies every purpose requirement.
    Any,

    /// `id-kp-serverAuth`
    ServerAuth,

    /// `id-kp-clientAuth`
    ClientAuth,

    /// `id-kp-codeSigning`
    CodeSigning,

    /// `id-kp-emailProtection`
    EmailProtection,

    /// `id-kp-timeStamping`
    TimeStamping,

    /// `id-kp-OCSPSigning`
    OcspSigning,

    /// Any other purpose, identified by its dotted OID.
    Other(String),
}

impl fmt::Display for ExtendedKeyUsageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::ServerAuth => f.write_str("server_auth"),
            Self::ClientAuth => f.write_str("client_auth"),
            Self::CodeSigning => f.write_str("code_signing"),
            Self::EmailProtection => f.write_str("email_protection"),
            Self::TimeStamping => f.write_str("time_stamping"),
            Self::OcspSigning => f.write_str("ocsp_signing"),
            Self::Other(oid) => f.write_str(oid),
        }
    }
}

impl FromStr for ExtendedKeyUsageExtension {
    type Err = UnknownExtensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Self::Any),
            "server_auth" => Ok(Self::ServerAuth),
            "client_auth" => Ok(Self::ClientAuth),
            "code_signing" => Ok(Self::CodeSigning),
            "email_protection" => Ok(Self::EmailProtection),
            "time_stamping" => Ok(Self::TimeStamping),
            "ocsp_signing" => Ok(Self::OcspSigning),
            oid if is_dotted_oid(oid) => Ok(Self::Other(oid.to_owned())),
            _ => Err(UnknownExtensionError(s.to_owned())),
        }
    }
}

/// A requirement on the X.509 basic constraints extension (RFC 5280, section
/// 4.2.1.9).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BasicConstraintsExtension {
    /// `cA` must be asserted.
    Ca,

    /// `cA` must be asserted and any `pathLenConstraint` must allow at least
    /// this many intermediate certificates below this one.
    PathLength(u32),
}

impl BasicConstraintsExtension {
    fn is_satisfied_by(&self, bc: &BasicConstraints) -> bool {
        match self {
            Self::Ca => bc.ca,
            Self::PathLength(required) => {
                bc.ca
                    && bc
                        .path_len_constraint
                        .map_or(true, |allowed| allowed >= *required)
            }
        }
    }
}

impl fmt::Display for BasicConstraintsExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ca => f.write_str("ca"),
            Self::PathLength(len) => write!(f, "path_len={len}"),
        }
    }
}

impl FromStr for BasicConstraintsExtension {
    type Err = UnknownExtensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "ca" {
            return Ok(Self::Ca);
        }

        s.strip_prefix("path_len=")
            .and_then(|len| len.parse().ok())
            .map(Self::PathLength)
            .ok_or_else(|| UnknownExtensionError(s.to_owned()))
    }
}

/// The decoded content of a basic constraints extension.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct BasicConstraints {
    /// `true` if the subject is a CA.
    pub ca: bool,

    /// Maximum number of non-self-issued intermediate certificates that may
    /// follow this certificate.
    pub path_len_constraint: Option<u32>,
}

/// This error is returned when an extension requirement string is not
/// recognized.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown certificate extension requirement: {0}")]
pub struct UnknownExtensionError(pub String);

fn is_dotted_oid(s: &str) -> bool {
    s.split('.').count() > 1 && s.split('.').all(|arc| arc.parse::<u32>().is_ok())
}
