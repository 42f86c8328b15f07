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

use log::debug;

use crate::{
    raw_signature::{validator_for_signing_alg, RawSignatureValidationError, SigningAlg},
    Certificate,
};

/// The cryptographic capability consumed by the validators: does `signature`
/// over `data` verify with `signer`'s public key?
///
/// `signature_algorithm` is the dotted OID named by the signed structure.
/// Implementations answer with a plain `bool`; a malformed key or signature
/// is a "no".
pub trait SignatureVerifier: Send + Sync {
    /// Returns `true` if `signature` is a valid signature by `signer` over
    /// `data`.
    fn verify_signature(
        &self,
        signer: &Certificate,
        data: &[u8],
        signature: &[u8],
        signature_algorithm: &str,
    ) -> bool;
}

/// A [`SignatureVerifier`] backed by the built-in pure-Rust
/// [`RawSignatureValidator`] implementations.
///
/// [`RawSignatureValidator`]: crate::raw_signature::RawSignatureValidator
#[derive(Clone, Copy, Debug, Default)]
pub struct RawSignatureVerifier;

impl RawSignatureVerifier {
    fn try_verify(
        signer: &Certificate,
        data: &[u8],
        signature: &[u8],
        signature_algorithm: &str,
    ) -> Result<(), RawSignatureValidationError> {
        let alg = SigningAlg::from_signature_oid(signature_algorithm)
            .ok_or(RawSignatureValidationError::UnsupportedAlgorithm)?;

        let validator = validator_for_signing_alg(alg)
            .ok_or(RawSignatureValidationError::UnsupportedAlgorithm)?;

        validator.validate(signature, data, signer.public_key())
    }
}

impl SignatureVerifier for RawSignatureVerifier {
    fn verify_signature(
        &self,
        signer: &Certificate,
        data: &[u8],
        signature: &[u8],
        signature_algorithm: &str,
    ) -> bool {
        match Self::try_verify(signer, data, signature, signature_algorithm) {
            Ok(()) => true,
            Err(err) => {
                debug!(
                    "signature ({signature_algorithm}) did not verify with key of {}: {err}",
                    signer.subject()
                );
                false
            }
        }
    }
}
