//! Warning types for non-fatal problems in plan documents.
//!
//! Parsing a plan document never fails. Anything that cannot be understood is
//! dropped and reported as a [`Warning`] so the caller can surface it while
//! the rest of the document is still used.
//!
//! # Examples
//!
//! ```
//! use waveplan_doc::PlanDocument;
//!
//! let (doc, warnings) = PlanDocument::parse(
//!     "<dependencies><complete>Plan two</complete></dependencies>",
//! );
//!
//! assert!(doc.references.is_empty());
//! assert_eq!(warnings.len(), 1);
//! assert_eq!(warnings[0].kind(), "malformed_reference");
//! ```

use crate::id::PlanId;

/// A non-fatal warning produced while parsing a plan document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A dependency phrase looked like a plan reference but could not be parsed.
    ///
    /// The reference is dropped; the remaining references are kept.
    MalformedReference {
        /// The text of the offending reference (e.g. `Plan two`).
        reference: String,
        /// Why it could not be used.
        reason: String,
    },

    /// The `<plan phase=".." plan="..">` attributes disagree with the file name.
    ///
    /// The file name is authoritative; the declared identity is ignored.
    MetadataMismatch {
        /// The identity declared inside the document, as written.
        declared: String,
        /// The identity taken from the file name.
        file_id: PlanId,
    },
}

impl Warning {
    /// Returns a human-readable description of the warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use waveplan_doc::{PlanId, Warning};
    ///
    /// let warning = Warning::MetadataMismatch {
    ///     declared: "1-3".to_string(),
    ///     file_id: PlanId::new(1, 2),
    /// };
    /// assert!(warning.description().contains("1-3"));
    /// ```
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::MalformedReference { reference, reason } => {
                format!("malformed dependency reference '{reference}': {reason}")
            }
            Self::MetadataMismatch { declared, file_id } => {
                format!("document declares plan {declared} but its file name says {file_id}")
            }
        }
    }

    /// Returns a static string identifying the warning kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedReference { .. } => "malformed_reference",
            Self::MetadataMismatch { .. } => "metadata_mismatch",
        }
    }
}
