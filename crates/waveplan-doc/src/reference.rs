//! Dependency references between plans.
//!
//! Plans declare what they depend on in free text, e.g. `Plan 2` or
//! `Phase 1 Plan 3`. A reference without a phase points into the phase of
//! the declaring document.

use crate::id::PlanId;
use crate::warning::Warning;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

// Tokens are captured loosely so that `Plan two` or `Plan 1-2` surface as
// malformed references instead of disappearing.
static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:phase\s+([^\s,;:<>()\-]+)\s*[:,\-]?\s*)?plan\s+([^\s,;:<>().]+)")
        .expect("plan reference regex is valid")
});

/// A parsed reference to another plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanRef {
    /// Explicit phase, if the reference named one.
    pub phase: Option<u32>,
    /// Sequence number of the referenced plan.
    pub sequence: u32,
}

impl PlanRef {
    /// Resolve to a [`PlanId`], using `default_phase` when no phase was given.
    #[must_use]
    pub fn resolve(self, default_phase: u32) -> PlanId {
        PlanId::new(self.phase.unwrap_or(default_phase), self.sequence)
    }
}

impl fmt::Display for PlanRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Some(phase) => write!(f, "phase {} plan {}", phase, self.sequence),
            None => write!(f, "plan {}", self.sequence),
        }
    }
}

/// Extract every plan reference from a dependencies section.
///
/// Phrases that look like references but carry a non-numeric or out-of-range
/// number are dropped and reported as [`Warning::MalformedReference`].
/// Phase-only phrases such as `Phase 0: Setup` are not plan references and
/// are ignored.
#[must_use]
pub fn parse_references(section: &str) -> (Vec<PlanRef>, Vec<Warning>) {
    let mut refs = Vec::new();
    let mut warnings = Vec::new();

    for caps in REFERENCE_RE.captures_iter(section) {
        let whole = caps[0].trim().to_string();

        let phase = match caps.get(1) {
            Some(token) => match parse_number(token.as_str()) {
                Ok(n) => Some(n),
                Err(reason) => {
                    warnings.push(Warning::MalformedReference {
                        reference: whole,
                        reason: format!("phase {reason}"),
                    });
                    continue;
                }
            },
            None => None,
        };

        match parse_number(&caps[2]) {
            Ok(sequence) => refs.push(PlanRef { phase, sequence }),
            Err(reason) => warnings.push(Warning::MalformedReference {
                reference: whole,
                reason: format!("plan {reason}"),
            }),
        }
    }

    (refs, warnings)
}

fn parse_number(token: &str) -> Result<u32, String> {
    if !token.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("'{token}' is not a non-negative integer"));
    }
    token
        .parse::<u32>()
        .map_err(|_| format!("'{token}' is out of range"))
}
