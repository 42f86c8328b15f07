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

//! Dotted object identifiers for the signature algorithms this crate
//! understands.

pub(crate) const SHA256_WITH_RSAENCRYPTION_OID: &str = "1.2.840.113549.1.1.11";
pub(crate) const SHA384_WITH_RSAENCRYPTION_OID: &str = "1.2.840.113549.1.1.12";
pub(crate) const SHA512_WITH_RSAENCRYPTION_OID: &str = "1.2.840.113549.1.1.13";

pub(crate) const ECDSA_WITH_SHA256_OID: &str = "1.2.840.10045.4.3.2";
pub(crate) const ECDSA_WITH_SHA384_OID: &str = "1.2.840.10045.4.3.3";
pub(crate) const ECDSA_WITH_SHA512_OID: &str = "1.2.840.10045.4.3.4";

pub(crate) const ED25519_OID: &str = "1.3.101.112";
