//! Recognition of plan document file names.
//!
//! Plan documents are addressed by file name, `{phase}-{sequence}-PLAN.<ext>`,
//! and that name is the authoritative source of a plan's [`PlanId`].
//! Numbers may be zero-padded (`01-02-PLAN.md` is plan `1-2`); the name is
//! kept exactly as found so the document can be opened again.

use crate::id::PlanId;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static PLAN_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)-(\d+)-PLAN\.([A-Za-z0-9]+)$").expect("plan file name regex is valid")
});

/// A recognised plan document file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanFileName {
    /// The plan id encoded in the file name.
    pub id: PlanId,
    /// The file extension, without the leading dot.
    pub extension: String,
    /// The file name exactly as it was recognised.
    name: String,
}

impl PlanFileName {
    /// Recognise a plan document file name.
    ///
    /// Returns `None` for anything that is not `{phase}-{sequence}-PLAN.<ext>`,
    /// including names whose numbers do not fit in a `u32`.
    #[must_use]
    pub fn parse(file_name: &str) -> Option<Self> {
        let caps = PLAN_FILE_RE.captures(file_name)?;

        let (Ok(phase), Ok(sequence)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            tracing::debug!(file_name, "Plan file name numbers out of range");
            return None;
        };

        Some(Self {
            id: PlanId::new(phase, sequence),
            extension: caps[3].to_string(),
            name: file_name.to_string(),
        })
    }

    /// The file name as found on disk.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Whether this file belongs to `phase`.
    #[must_use]
    pub fn is_in_phase(&self, phase: u32) -> bool {
        self.id.phase() == phase
    }
}

impl fmt::Display for PlanFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
