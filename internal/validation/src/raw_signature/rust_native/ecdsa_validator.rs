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

use ecdsa::signature::hazmat::PrehashVerifier;
use sha2::{Digest, Sha256, Sha384, Sha512};
use spki::{ObjectIdentifier, SubjectPublicKeyInfoRef};

use crate::raw_signature::{RawSignatureValidationError, RawSignatureValidator};

const SECP256R1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const SECP384R1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");

/// An `EcdsaValidator` can validate raw signatures with one of the ECDSA
/// signature algorithms.
///
/// The curve is taken from the public key; the variant selects the digest.
/// Signatures may be DER-encoded (as in X.509) or fixed-size P1363.
pub enum EcdsaValidator {
    /// ECDSA with SHA-256
    Es256,

    /// ECDSA with SHA-384
    Es384,

    /// ECDSA with SHA-512
    Es512,
}

impl RawSignatureValidator for EcdsaValidator {
    fn validate(
        &self,
        sig: &[u8],
        data: &[u8],
        public_key: &[u8],
    ) -> Result<(), RawSignatureValidationError> {
        let digest = match self {
            Self::Es256 => Sha256::digest(data).to_vec(),
            Self::Es384 => Sha384::digest(data).to_vec(),
            Self::Es512 => Sha512::digest(data).to_vec(),
        };

        let spki = SubjectPublicKeyInfoRef::try_from(public_key)
            .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?;

        let curve = spki
            .algorithm
            .parameters_oid()
            .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?;

        let result = if curve == SECP256R1_OID {
            use p256::pkcs8::DecodePublicKey;

            let signature = p256::ecdsa::Signature::from_der(sig)
                .or_else(|_| p256::ecdsa::Signature::from_slice(sig))
                .map_err(|_| RawSignatureValidationError::InvalidSignature)?;

            let vk = p256::ecdsa::VerifyingKey::from_public_key_der(public_key)
                .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?;

            vk.verify_prehash(&digest, &signature)
        } else if curve == SECP384R1_OID {
            use p384::pkcs8::DecodePublicKey;

            let signature = p384::ecdsa::Signature::from_der(sig)
                .or_else(|_| p384::ecdsa::Signature::from_slice(sig))
                .map_err(|_| RawSignatureValidationError::InvalidSignature)?;

            let vk = p384::ecdsa::VerifyingKey::from_public_key_der(public_key)
                .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?;

            vk.verify_prehash(&digest, &signature)
        } else {
            return Err(RawSignatureValidationError::UnsupportedAlgorithm);
        };

        result.map_err(|_| RawSignatureValidationError::SignatureMismatch)
    }
}
