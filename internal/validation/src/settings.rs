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

//! Settings that tune how certificates are validated.
//!
//! Settings are loaded from a TOML or JSON string with
//! [`ValidationSettings::from_string`]. Values that are not mentioned keep
//! their defaults, so a settings file only needs to name what it changes:
//!
//! ```
//! # use sigtrust_validation::ValidationSettings;
//! let settings = ValidationSettings::from_string(
//!     r#"
//!         [chain]
//!         max_chain_length = 4
//!     "#,
//!     "toml",
//! )
//! .unwrap();
//!
//! assert_eq!(settings.chain.max_chain_length, 4);
//! assert!(settings.revocation.crl_enabled);
//! ```

use chrono::TimeDelta;
use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::{
        BasicConstraintsExtension, CertificateExtension, ExtendedKeyUsageExtension,
        KeyUsageExtension,
    },
    ValidationError,
};

const DEFAULT_FRESHNESS_SECONDS: i64 = 30 * 24 * 60 * 60;

/// All settings for one validation engine.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Chain walk settings.
    pub chain: ChainSettings,

    /// Revocation checking settings.
    pub revocation: RevocationSettings,

    /// Required extensions per certificate role.
    pub extensions: ExtensionSettings,
}

impl ValidationSettings {
    /// Load settings from a string in `format` (`"toml"` or `"json"`),
    /// layered over the defaults.
    pub fn from_string(settings_str: &str, format: &str) -> Result<Self, ValidationError> {
        let f = match format.to_lowercase().as_str() {
            "json" => FileFormat::Json,
            "toml" => FileFormat::Toml,
            _ => return Err(ValidationError::UnsupportedSettingsFormat(format.to_owned())),
        };

        let settings = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(config::File::from_str(settings_str, f))
            .build()?
            .try_deserialize::<Self>()?;

        settings.validate()?;

        Ok(settings)
    }

    /// Load settings from a TOML string.
    pub fn from_toml(toml: &str) -> Result<Self, ValidationError> {
        Self::from_string(toml, "toml")
    }

    /// Sanity-check values that parse but cannot be used.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.chain.max_chain_length == 0 {
            return Err(ValidationError::InvalidSettings(
                "chain.max_chain_length must be at least 1".to_string(),
            ));
        }

        if self.revocation.freshness_seconds < 0 {
            return Err(ValidationError::InvalidSettings(
                "revocation.freshness_seconds must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}

/// Chain walk settings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ChainSettings {
    /// Maximum number of certificates, including revocation data signers,
    /// the chain walk will visit below one top-level call.
    pub max_chain_length: usize,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            max_chain_length: 10,
        }
    }
}

/// Revocation checking settings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct RevocationSettings {
    /// Revocation data issued more than this many seconds before the check
    /// date is too old to rely on.
    pub freshness_seconds: i64,

    /// If `true`, a certificate with no applicable CRL or OCSP response
    /// makes the result indeterminate.
    pub require_revocation_data: bool,

    /// Consult CRLs.
    pub crl_enabled: bool,

    /// Consult OCSP responses.
    pub ocsp_enabled: bool,
}

impl RevocationSettings {
    /// [`Self::freshness_seconds`] as a duration.
    pub fn freshness(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.freshness_seconds).unwrap_or(TimeDelta::MAX)
    }
}

impl Default for RevocationSettings {
    fn default() -> Self {
        Self {
            freshness_seconds: DEFAULT_FRESHNESS_SECONDS,
            require_revocation_data: true,
            crl_enabled: true,
            ocsp_enabled: true,
        }
    }
}

/// Extensions each certificate role must carry.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ExtensionSettings {
    /// Required of the certificate whose signature is being validated.
    pub signer: Vec<CertificateExtension>,

    /// Required of every certificate that issues another certificate in the
    /// chain.
    pub issuer: Vec<CertificateExtension>,

    /// Required of the certificate that signed a CRL.
    pub crl_issuer: Vec<CertificateExtension>,

    /// Required of a delegated OCSP responder certificate.
    pub ocsp_responder: Vec<CertificateExtension>,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            signer: Vec::new(),
            issuer: vec![
                CertificateExtension::KeyUsage(KeyUsageExtension::KeyCertSign),
                CertificateExtension::BasicConstraints(BasicConstraintsExtension::Ca),
            ],
            crl_issuer: vec![CertificateExtension::KeyUsage(KeyUsageExtension::CrlSign)],
            ocsp_responder: vec![CertificateExtension::ExtendedKeyUsage(
                ExtendedKeyUsageExtension::OcspSigning,
            )],
        }
    }
}
