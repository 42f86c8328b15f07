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

use std::{borrow::Cow, fmt};

use serde::Serialize;

use crate::{ValidationReport, ValidationResult};

/// Creates a [`ReportItem`] struct that is annotated with the source file and
/// line number where the condition was discovered.
///
/// Takes three parameters, each of which may be a `&'static str` or `String`:
///
/// * `check`: name of the check that produced this item (for example, "CRL
///   response check")
/// * `message`: human-readable description of the condition
/// * `function`: name of the function generating this `ReportItem`
///
/// The item starts out as [`ReportItemStatus::Info`] with an empty
/// validation code. Use [`ReportItem::validation_code`] to tag it and one of
/// [`ReportItem::informational`], [`ReportItem::indeterminate`], or
/// [`ReportItem::invalid`] to append it to a [`ValidationReport`].
///
/// ## Example
///
/// ```
/// # use std::borrow::Cow;
/// # use sigtrust_report::{report_item, ReportItem, ReportItemStatus};
/// let item = report_item!("CRL response check", "CRL is invalid", "test func");
///
/// assert_eq!(item.status, ReportItemStatus::Info);
/// assert_eq!(item.check, Cow::Borrowed("CRL response check"));
/// assert_eq!(item.message, Cow::Borrowed("CRL is invalid"));
/// assert_eq!(item.file, Cow::Borrowed(file!()));
/// assert!(item.line > 2);
/// ```
#[macro_export]
macro_rules! report_item {
    ($check:expr, $message:expr, $function:expr) => {{
        $crate::ReportItem {
            status: $crate::ReportItemStatus::Info,
            check: $check.into(),
            message: $message.into(),
            validation_code: ::std::borrow::Cow::Borrowed(""),
            certificate: None,
            file: file!().into(),
            function: $function.into(),
            line: line!(),
        }
    }};
}

/// One entry in a [`ValidationReport`].
///
/// Use the [`report_item`](crate::report_item) macro to create a
/// `ReportItem`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    /// Severity of this item.
    pub status: ReportItemStatus,

    /// Name of the check that produced this item.
    pub check: Cow<'static, str>,

    /// Formatted, human-readable description of the condition.
    pub message: Cow<'static, str>,

    /// Stable identifier of the rule that fired (see
    /// [`validation_codes`](crate::validation_codes)).
    pub validation_code: Cow<'static, str>,

    /// Subject of the certificate this item is about, if any.
    pub certificate: Option<Cow<'static, str>>,

    /// Source file where the condition was detected.
    pub file: Cow<'static, str>,

    /// Function where the condition was detected.
    pub function: Cow<'static, str>,

    /// Source line number where the condition was detected.
    pub line: u32,
}

impl ReportItem {
    /// Tag this item with the identifier of the rule that fired.
    #[must_use]
    pub fn validation_code(self, code: &'static str) -> Self {
        ReportItem {
            validation_code: Cow::Borrowed(code),
            ..self
        }
    }

    /// Record the subject of the certificate this item is about.
    #[must_use]
    pub fn certificate<S: Into<String>>(self, subject: S) -> Self {
        ReportItem {
            certificate: Some(Cow::Owned(subject.into())),
            ..self
        }
    }

    /// Returns `true` if this item downgrades the verdict.
    pub fn is_failure(&self) -> bool {
        self.status != ReportItemStatus::Info
    }

    /// Set the status to [`ReportItemStatus::Info`] and add the item to the
    /// report.
    pub fn informational(mut self, report: &mut ValidationReport) {
        self.status = ReportItemStatus::Info;
        report.add_report_item(self);
    }

    /// Set the status to [`ReportItemStatus::Indeterminate`] and add the item
    /// to the report.
    pub fn indeterminate(mut self, report: &mut ValidationReport) {
        self.status = ReportItemStatus::Indeterminate;
        report.add_report_item(self);
    }

    /// Set the status to [`ReportItemStatus::Invalid`] and add the item to the
    /// report.
    pub fn invalid(mut self, report: &mut ValidationReport) {
        self.status = ReportItemStatus::Invalid;
        report.add_report_item(self);
    }
}

impl fmt::Display for ReportItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.check, self.message)?;
        if !self.validation_code.is_empty() {
            write!(f, " ({})", self.validation_code)?;
        }
        if let Some(certificate) = &self.certificate {
            write!(f, " [certificate: {certificate}]")?;
        }
        Ok(())
    }
}

/// Severity of a [`ReportItem`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportItemStatus {
    /// A non-failing observation.
    Info,

    /// A failure that prevents a certain answer (missing or untrusted data).
    Indeterminate,

    /// A failure backed by positive evidence that the certificate must not be
    /// trusted.
    Invalid,
}

impl ReportItemStatus {
    /// The verdict this status contributes to a report.
    pub fn result(self) -> ValidationResult {
        match self {
            Self::Info => ValidationResult::Valid,
            Self::Indeterminate => ValidationResult::Indeterminate,
            Self::Invalid => ValidationResult::Invalid,
        }
    }
}

impl fmt::Display for ReportItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Indeterminate => "INDETERMINATE",
            Self::Invalid => "INVALID",
        })
    }
}
