//! Parsing of a single plan document body.
//!
//! The body is semi-structured XML-in-markdown:
//!
//! ```text
//! <plan phase="1" plan="2">
//!   <overview><phase_name>Auth API</phase_name></overview>
//!   <dependencies><complete>Plan 1</complete></dependencies>
//!   <tasks><task type="auto" priority="1">...</task></tasks>
//! </plan>
//! ```
//!
//! Only what dependency analysis needs is extracted. Everything else is
//! ignored, and nothing here fails: missing parts fall back to defaults.

use crate::id::PlanId;
use crate::reference::{PlanRef, parse_references};
use crate::warning::Warning;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Name used for plans whose document has no `<phase_name>`.
pub const UNKNOWN_PLAN_NAME: &str = "Unknown";

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<phase_name>([^<]+)</phase_name>").expect("phase name regex is valid")
});

static TASK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<task\s").expect("task marker regex is valid"));

static DEPENDENCIES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<dependencies>(.*?)</dependencies>").expect("dependencies regex is valid")
});

static PLAN_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<plan(\s[^>]*)").expect("plan tag regex is valid"));

// Attributes may appear in any order within the tag.
static PHASE_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\sphase="(\d+)""#).expect("phase attribute regex is valid")
});

static PLAN_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\splan="(\d+)""#).expect("plan attribute regex is valid"));

/// Numeric value of the attribute matched by `re`.
fn attribute(re: &Regex, attributes: &str) -> Option<u32> {
    re.captures(attributes).and_then(|caps| caps[1].parse().ok())
}

/// The parts of a plan document relevant to dependency analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanDocument {
    /// Human-readable name from `<phase_name>`, if present and non-empty.
    pub name: Option<String>,

    /// Number of `<task ...>` markers.
    pub task_count: usize,

    /// Phase declared by the `<plan phase="..">` root element.
    pub declared_phase: Option<u32>,

    /// Plan number declared by the `<plan .. plan="..">` root element.
    pub declared_sequence: Option<u32>,

    /// Whether the document has a `<dependencies>` section at all.
    pub has_dependencies_section: bool,

    /// Plan references found in the dependencies section, in document order.
    pub references: Vec<PlanRef>,
}

impl PlanDocument {
    /// Parse a plan document body.
    ///
    /// Returns the extracted document together with warnings for every
    /// dependency reference that had to be dropped.
    #[must_use]
    pub fn parse(content: &str) -> (Self, Vec<Warning>) {
        let name = NAME_RE
            .captures(content)
            .map(|caps| caps[1].trim().to_string())
            .filter(|name| !name.is_empty());

        let task_count = TASK_RE.find_iter(content).count();

        let attributes = PLAN_TAG_RE
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map_or("", |m| m.as_str());
        let declared_phase = attribute(&PHASE_ATTR_RE, attributes);
        let declared_sequence = declared_phase.and(attribute(&PLAN_ATTR_RE, attributes));

        let section = DEPENDENCIES_RE
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());

        let (references, warnings) = section.map(parse_references).unwrap_or_default();

        let doc = Self {
            name,
            task_count,
            declared_phase,
            declared_sequence,
            has_dependencies_section: section.is_some(),
            references,
        };

        (doc, warnings)
    }

    /// The plan name, or [`UNKNOWN_PLAN_NAME`] when the document has none.
    #[must_use]
    pub fn name_or_default(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_PLAN_NAME)
    }

    /// Whether the document declares no work at all.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.task_count == 0
    }

    /// Resolve the references to plan ids.
    ///
    /// References without an explicit phase belong to `phase`, the phase of
    /// the declaring document.
    #[must_use]
    pub fn dependencies(&self, phase: u32) -> BTreeSet<PlanId> {
        self.references
            .iter()
            .map(|r| r.resolve(phase))
            .collect()
    }

    /// Compare the declared identity against the id taken from the file name.
    ///
    /// Returns a [`Warning::MetadataMismatch`] when they disagree. A document
    /// without a `<plan>` root declares nothing and never mismatches.
    #[must_use]
    pub fn check_identity(&self, file_id: PlanId) -> Option<Warning> {
        let phase = self.declared_phase?;

        let phase_matches = phase == file_id.phase();
        let sequence_matches = self
            .declared_sequence
            .is_none_or(|sequence| sequence == file_id.sequence());

        if phase_matches && sequence_matches {
            return None;
        }

        let declared = match self.declared_sequence {
            Some(sequence) => format!("{phase}-{sequence}"),
            None => format!("{phase}-?"),
        };
        Some(Warning::MetadataMismatch { declared, file_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SAMPLE: &str = r#"<plan phase="1" plan="3">
  <overview>
    <phase_name> Multi-dep Plan </phase_name>
    <goal>Test</goal>
  </overview>
  <dependencies>
    <complete>Plan 1</complete>
    <complete>Plan 2</complete>
    <complete>Phase 0 Plan 1</complete>
  </dependencies>
  <tasks>
    <task type="auto" priority="1"><name>Task 1</name><action>Do 1</action></task>
    <task type="auto" priority="2"><name>Task 2</name><action>Do 2</action></task>
    <task type="manual" priority="1"><name>Task 3</name><action>Do 3</action></task>
  </tasks>
</plan>"#;

    #[test]
    fn test_parse_full_document() {
        let (doc, warnings) = PlanDocument::parse(SAMPLE);

        assert!(warnings.is_empty());
        assert_eq!(doc.name.as_deref(), Some("Multi-dep Plan"));
        assert_eq!(doc.task_count, 3);
        assert_eq!(doc.declared_phase, Some(1));
        assert_eq!(doc.declared_sequence, Some(3));
        assert!(doc.has_dependencies_section);
        assert_eq!(
            doc.dependencies(1),
            BTreeSet::from([PlanId::new(1, 1), PlanId::new(1, 2), PlanId::new(0, 1)])
        );
    }

    #[test]
    fn test_defaults_for_empty_document() {
        let (doc, warnings) = PlanDocument::parse("");

        assert!(warnings.is_empty());
        assert_eq!(doc.name, None);
        assert_eq!(doc.name_or_default(), UNKNOWN_PLAN_NAME);
        assert_eq!(doc.task_count, 0);
        assert!(doc.is_incomplete());
        assert!(!doc.has_dependencies_section);
        assert!(doc.dependencies(1).is_empty());
        assert_eq!(doc.check_identity(PlanId::new(1, 1)), None);
    }

    #[test]
    fn test_blank_name_falls_back() {
        let (doc, _) = PlanDocument::parse("<phase_name>   </phase_name>");
        assert_eq!(doc.name_or_default(), UNKNOWN_PLAN_NAME);
    }

    #[test]
    fn test_references_outside_dependencies_are_ignored() {
        let content = "<goal>Finish Plan 4 first</goal><dependencies></dependencies>";
        let (doc, warnings) = PlanDocument::parse(content);
        assert!(doc.has_dependencies_section);
        assert!(doc.references.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_dependencies_section_is_case_insensitive_and_multiline() {
        let content = "<DEPENDENCIES>\n  plan 2\n  Phase 3 Plan 1\n</DEPENDENCIES>";
        let (doc, _) = PlanDocument::parse(content);
        assert_eq!(
            doc.dependencies(4),
            BTreeSet::from([PlanId::new(4, 2), PlanId::new(3, 1)])
        );
    }

    #[test]
    fn test_malformed_reference_is_dropped_with_warning() {
        let content = "<dependencies><complete>Plan A</complete><complete>Plan 2</complete></dependencies>";
        let (doc, warnings) = PlanDocument::parse(content);
        assert_eq!(doc.dependencies(1), BTreeSet::from([PlanId::new(1, 2)]));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind(), "malformed_reference");
    }

    #[test]
    fn test_task_markers_need_attributes_or_whitespace() {
        let content = "<tasks><task type=\"auto\"></task><task\n type=\"manual\"></task><tasks_done/></tasks>";
        let (doc, _) = PlanDocument::parse(content);
        assert_eq!(doc.task_count, 2);
    }

    #[test]
    fn test_check_identity() {
        let (doc, _) = PlanDocument::parse(r#"<plan phase="1" plan="3">"#);
        assert_eq!(doc.check_identity(PlanId::new(1, 3)), None);

        let warning = doc
            .check_identity(PlanId::new(1, 4))
            .expect("sequence mismatch should warn");
        assert_eq!(
            warning,
            Warning::MetadataMismatch {
                declared: "1-3".to_string(),
                file_id: PlanId::new(1, 4),
            }
        );

        let (phase_only, _) = PlanDocument::parse(r#"<plan phase="2">"#);
        assert_eq!(phase_only.check_identity(PlanId::new(2, 9)), None);
        assert!(phase_only.check_identity(PlanId::new(1, 9)).is_some());
    }

    #[rstest]
    #[case(r#"<plan phase="1" plan="3">"#)]
    #[case(r#"<plan plan="3" phase="1">"#)]
    #[case("<plan\n  type=\"execute\"\n  plan=\"3\"\n  phase=\"1\">")]
    fn test_plan_attributes_in_any_order(#[case] tag: &str) {
        let (doc, _) = PlanDocument::parse(tag);
        assert_eq!(doc.declared_phase, Some(1));
        assert_eq!(doc.declared_sequence, Some(3));
        assert!(doc.check_identity(PlanId::new(1, 4)).is_some());
    }

    #[test]
    fn test_similar_tags_declare_nothing() {
        let (doc, _) = PlanDocument::parse(r#"<plans phase="1" plan="3"><plan_ref plan="2">"#);
        assert_eq!(doc.declared_phase, None);
        assert_eq!(doc.declared_sequence, None);
    }
}
