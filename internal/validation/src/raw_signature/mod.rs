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

//! Tools for working with raw signature algorithms.
//!
//! Certificates, CRLs, and OCSP responses are each signed by an issuer key.
//! This module maps the signature algorithm named in those structures to a
//! pure-Rust validator and exposes the result through the
//! [`SignatureVerifier`] trait consumed by the validators.

pub(crate) mod oids;

pub(crate) mod rust_native;

mod signing_alg;
pub use signing_alg::{SigningAlg, UnknownAlgorithmError};

mod validator;
pub use validator::{validator_for_signing_alg, RawSignatureValidationError, RawSignatureValidator};

mod verifier;
pub use verifier::{RawSignatureVerifier, SignatureVerifier};
