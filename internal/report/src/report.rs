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

use log::{debug, info};
use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::{ReportItem, ReportItemStatus};

/// A `ValidationReport` aggregates every observation made while validating
/// one certificate (and, transitively, its issuers and revocation data).
///
/// The report is append-only: items can be added or merged in from another
/// report, but never removed. The overall [`ValidationResult`] is derived
/// from the items each time it is requested, so it can only get worse as
/// items are added.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationReport {
    items: Vec<ReportItem>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one item to this report.
    pub fn add_report_item(&mut self, item: ReportItem) {
        if item.is_failure() {
            info!("Validation failure: {item}");
        } else {
            debug!("Validation info: {item}");
        }
        self.items.push(item);
    }

    /// Append every item of `other` to this report, preserving order.
    pub fn merge(&mut self, other: ValidationReport) {
        for item in other.items {
            self.add_report_item(item);
        }
    }

    /// Append every item of `other`, capping each failure at
    /// [`ReportItemStatus::Indeterminate`].
    ///
    /// Used when `other` describes a supporting object (such as the signer of
    /// revocation data) whose defects cast doubt on the evidence but say
    /// nothing about the certificate under validation.
    pub fn merge_as_indeterminate(&mut self, other: ValidationReport) {
        for mut item in other.items {
            if item.status == ReportItemStatus::Invalid {
                item.status = ReportItemStatus::Indeterminate;
            }
            self.add_report_item(item);
        }
    }

    /// Returns every item in this report, in the order it was added.
    pub fn logs(&self) -> &[ReportItem] {
        &self.items
    }

    /// Returns the items that downgrade the verdict, in the order they were
    /// added.
    pub fn failures(&self) -> impl Iterator<Item = &ReportItem> {
        self.items.iter().filter(|item| item.is_failure())
    }

    /// Returns the number of failures in this report.
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Returns `true` if any item carries the given validation code.
    pub fn has_validation_code(&self, code: &str) -> bool {
        self.items.iter().any(|item| item.validation_code == code)
    }

    /// Returns `true` if any failure carries the given validation code.
    pub fn has_failure(&self, code: &str) -> bool {
        self.failures().any(|item| item.validation_code == code)
    }

    /// Returns `true` if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Compute the overall verdict.
    ///
    /// No failures yields [`ValidationResult::Valid`]. Otherwise the most
    /// severe failure wins: [`ValidationResult::Invalid`] dominates
    /// [`ValidationResult::Indeterminate`]. The fold is independent of the
    /// order in which items were added.
    pub fn validation_result(&self) -> ValidationResult {
        self.items
            .iter()
            .map(|item| item.status.result())
            .max()
            .unwrap_or(ValidationResult::Valid)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.validation_result())?;
        for item in &self.items {
            writeln!(f, "  {item}")?;
        }
        Ok(())
    }
}

impl Serialize for ValidationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationReport", 3)?;
        state.serialize_field("validationResult", &self.validation_result())?;
        state.serialize_field("logs", &self.items)?;
        state.serialize_field(
            "failures",
            &self.failures().collect::<Vec<&ReportItem>>(),
        )?;
        state.end()
    }
}

/// Overall verdict of a [`ValidationReport`].
///
/// Variants are ordered by severity so that the verdict of a report is the
/// maximum over its items.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationResult {
    /// No failures were recorded.
    Valid,

    /// Validation could not reach a certain answer.
    Indeterminate,

    /// At least one failure is backed by positive evidence.
    Invalid,
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Valid => "VALID",
            Self::Indeterminate => "INDETERMINATE",
            Self::Invalid => "INVALID",
        })
    }
}
