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

use log::trace;

use crate::{raw_signature::SignatureVerifier, Certificate};

/// Upper bound on the number of issuers [`IssuingCertificateRetriever::retrieve_root`]
/// will walk before giving up.
const MAX_ROOT_WALK: usize = 32;

/// A lookup table of known certificates, used to resolve issuer certificates
/// and trust anchors without network access.
///
/// The retriever is populated before validation begins and only read during
/// validation. It is `Send + Sync`, so one instance can be shared (usually
/// through an `Arc`) by validations running on different threads.
#[derive(Clone, Debug, Default)]
pub struct IssuingCertificateRetriever {
    known: Vec<Certificate>,
    trusted: Vec<Certificate>,
}

impl IssuingCertificateRetriever {
    /// Create an empty retriever.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge certificates into the known-certificate store.
    ///
    /// A certificate that is already known is ignored.
    pub fn add_known_certificates<I: IntoIterator<Item = Certificate>>(&mut self, certs: I) {
        for cert in certs {
            if !self.known.contains(&cert) {
                trace!("adding known certificate {}", cert.subject());
                self.known.push(cert);
            }
        }
    }

    /// Merge certificates into the trust-anchor set. Trust anchors are also
    /// known certificates.
    pub fn add_trusted_certificates<I: IntoIterator<Item = Certificate>>(&mut self, certs: I) {
        for cert in certs {
            if !self.trusted.contains(&cert) {
                trace!("adding trust anchor {}", cert.subject());
                self.trusted.push(cert.clone());
            }
            self.add_known_certificates([cert]);
        }
    }

    /// Returns `true` if `cert` matches a trust anchor by subject name and
    /// public key.
    pub fn is_certificate_trusted(&self, cert: &Certificate) -> bool {
        self.trusted.iter().any(|anchor| {
            anchor.subject_raw() == cert.subject_raw() && anchor.public_key() == cert.public_key()
        })
    }

    /// Returns every known certificate whose subject matches `cert`'s issuer
    /// name.
    ///
    /// When `cert` carries an authority key identifier, candidates with a
    /// matching subject key identifier come first.
    pub fn retrieve_issuer_candidates(&self, cert: &Certificate) -> Vec<&Certificate> {
        let mut candidates: Vec<&Certificate> = self
            .known
            .iter()
            .filter(|candidate| candidate.subject_raw() == cert.issuer_raw())
            .collect();

        if let Some(aki) = cert.authority_key_identifier() {
            candidates.sort_by_key(|candidate| candidate.subject_key_identifier() != Some(aki));
        }

        candidates
    }

    /// Returns the preferred certificate whose subject matches `cert`'s
    /// issuer name, or `None` if there is none.
    pub fn retrieve_issuer_certificate(&self, cert: &Certificate) -> Option<&Certificate> {
        self.retrieve_issuer_candidates(cert).into_iter().next()
    }

    /// Returns the first issuer candidate whose key verifies `cert`'s
    /// signature, or `None` if no candidate does.
    pub fn retrieve_verified_issuer(
        &self,
        cert: &Certificate,
        verifier: &dyn SignatureVerifier,
    ) -> Option<&Certificate> {
        self.retrieve_issuer_candidates(cert)
            .into_iter()
            .find(|candidate| {
                verifier.verify_signature(
                    candidate,
                    cert.tbs_certificate(),
                    cert.signature(),
                    cert.signature_algorithm(),
                )
            })
    }

    /// Returns every known certificate whose subject matches the given
    /// encoded name.
    pub fn retrieve_all_by_subject(&self, subject_raw: &[u8]) -> Vec<&Certificate> {
        self.known
            .iter()
            .filter(|candidate| candidate.subject_raw() == subject_raw)
            .collect()
    }

    /// Returns the first known certificate whose subject matches the given
    /// encoded name.
    pub fn retrieve_by_subject(&self, subject_raw: &[u8]) -> Option<&Certificate> {
        self.known
            .iter()
            .find(|candidate| candidate.subject_raw() == subject_raw)
    }

    /// Returns the first known certificate whose `subjectPublicKey` hashes
    /// (SHA-1) to `key_hash`.
    pub fn retrieve_by_key_hash(&self, key_hash: &[u8]) -> Option<&Certificate> {
        self.known
            .iter()
            .find(|candidate| crate::hash::sha1(candidate.public_key_bits()) == key_hash)
    }

    /// Walk issuers from `cert` up to the top of its chain.
    ///
    /// Each step follows only an issuer whose key verifies the current
    /// certificate, so a same-named certificate cannot divert the walk.
    /// Stops at a trust anchor, a self-issued certificate, or the topmost
    /// certificate whose issuer cannot be found. The walk is bounded, so a
    /// cycle of certificates that issue each other terminates.
    pub fn retrieve_root<'a>(
        &'a self,
        cert: &'a Certificate,
        verifier: &dyn SignatureVerifier,
    ) -> &'a Certificate {
        let mut current = cert;

        for _ in 0..MAX_ROOT_WALK {
            if self.is_certificate_trusted(current) || current.is_self_issued() {
                break;
            }

            match self.retrieve_verified_issuer(current, verifier) {
                Some(issuer) => current = issuer,
                None => break,
            }
        }

        current
    }
}
