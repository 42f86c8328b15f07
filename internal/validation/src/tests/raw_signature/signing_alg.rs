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

use std::str::FromStr;

use crate::raw_signature::{SigningAlg, UnknownAlgorithmError};

#[test]
fn alg_from_str() {
    assert_eq!(SigningAlg::from_str("es256").unwrap(), SigningAlg::Es256);
    assert_eq!(SigningAlg::from_str("es384").unwrap(), SigningAlg::Es384);
    assert_eq!(SigningAlg::from_str("es512").unwrap(), SigningAlg::Es512);
    assert_eq!(SigningAlg::from_str("ps256").unwrap(), SigningAlg::Ps256);
    assert_eq!(SigningAlg::from_str("ps384").unwrap(), SigningAlg::Ps384);
    assert_eq!(SigningAlg::from_str("ps512").unwrap(), SigningAlg::Ps512);
    assert_eq!(SigningAlg::from_str("rs256").unwrap(), SigningAlg::Rs256);
    assert_eq!(SigningAlg::from_str("rs384").unwrap(), SigningAlg::Rs384);
    assert_eq!(SigningAlg::from_str("rs512").unwrap(), SigningAlg::Rs512);
    assert_eq!(SigningAlg::from_str("ed25519").unwrap(), SigningAlg::Ed25519);

    let r: Result<SigningAlg, UnknownAlgorithmError> = SigningAlg::from_str("bogus");
    assert_eq!(r, Err(UnknownAlgorithmError("bogus".to_string())));
}

#[test]
fn signing_alg_impl_display() {
    assert_eq!(format!("{}", SigningAlg::Es256), "es256");
    assert_eq!(format!("{}", SigningAlg::Es384), "es384");
    assert_eq!(format!("{}", SigningAlg::Es512), "es512");
    assert_eq!(format!("{}", SigningAlg::Ps256), "ps256");
    assert_eq!(format!("{}", SigningAlg::Ps384), "ps384");
    assert_eq!(format!("{}", SigningAlg::Ps512), "ps512");
    assert_eq!(format!("{}", SigningAlg::Rs256), "rs256");
    assert_eq!(format!("{}", SigningAlg::Rs384), "rs384");
    assert_eq!(format!("{}", SigningAlg::Rs512), "rs512");
    assert_eq!(format!("{}", SigningAlg::Ed25519), "ed25519");
}

#[test]
fn alg_from_signature_oid() {
    assert_eq!(
        SigningAlg::from_signature_oid("1.2.840.10045.4.3.2"),
        Some(SigningAlg::Es256)
    );
    assert_eq!(
        SigningAlg::from_signature_oid("1.2.840.10045.4.3.4"),
        Some(SigningAlg::Es512)
    );
    assert_eq!(
        SigningAlg::from_signature_oid("1.2.840.113549.1.1.12"),
        Some(SigningAlg::Rs384)
    );
    assert_eq!(
        SigningAlg::from_signature_oid("1.3.101.112"),
        Some(SigningAlg::Ed25519)
    );
    assert_eq!(SigningAlg::from_signature_oid("1.2.840.113549.1.1.10"), None);
    assert_eq!(SigningAlg::from_signature_oid("1.2.840.113549.1.1.5"), None);
}

#[test]
fn unknown_alg_error_display() {
    assert_eq!(
        UnknownAlgorithmError("bogus".to_string()).to_string(),
        "UnknownAlgorithmError(bogus)"
    );
}
