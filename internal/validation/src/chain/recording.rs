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

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use sigtrust_report::ValidationReport;

use crate::{chain::ChainValidator, extensions::CertificateExtension, Certificate};

/// One call observed by a [`RecordingChainValidator`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationCall {
    /// The certificate that was handed to the chain validator.
    pub certificate: Certificate,

    /// The date it was to be checked at.
    pub check_date: DateTime<Utc>,

    /// The extensions it was required to carry.
    pub required_extensions: Vec<CertificateExtension>,

    /// The chain depth it was validated at.
    pub depth: usize,
}

/// A [`ChainValidator`] that records every call and validates nothing.
///
/// Use it to observe which certificates a revocation validator delegates,
/// at which date and depth, and with which required extensions.
#[derive(Debug, Default)]
pub struct RecordingChainValidator {
    calls: Mutex<Vec<ValidationCall>>,
}

impl RecordingChainValidator {
    /// Create a validator with no recorded calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call recorded so far, in order.
    pub fn calls(&self) -> Vec<ValidationCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ChainValidator for RecordingChainValidator {
    fn validate(
        &self,
        _report: &mut ValidationReport,
        certificate: &Certificate,
        check_date: DateTime<Utc>,
        required_extensions: &[CertificateExtension],
        depth: usize,
    ) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ValidationCall {
                certificate: certificate.clone(),
                check_date,
                required_extensions: required_extensions.to_vec(),
                depth,
            });
    }
}
