//! Plan identifiers.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Unique identifier of a plan: its phase and its sequence number within the phase.
///
/// The canonical text form is `"{phase}-{sequence}"` (e.g. `1-2`), which is
/// also how the id serializes. The derived ordering is numeric, phase first,
/// so `1-2` sorts before `1-10`. Use [`PlanId::lexical_cmp`] for the ordering
/// of the canonical strings instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlanId {
    phase: u32,
    sequence: u32,
}

impl PlanId {
    /// Create a plan id from its phase and sequence number.
    #[must_use]
    pub const fn new(phase: u32, sequence: u32) -> Self {
        Self { phase, sequence }
    }

    /// The phase this plan belongs to.
    #[must_use]
    pub const fn phase(&self) -> u32 {
        self.phase
    }

    /// The sequence number of this plan within its phase.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Compare the canonical string forms, so `1-10` sorts before `1-2`.
    #[must_use]
    pub fn lexical_cmp(&self, other: &Self) -> Ordering {
        // '-' sorts below every digit, so the phase digits decide first
        // exactly as in a byte comparison of the full strings.
        let (mut a, mut b) = ([0; 10], [0; 10]);
        decimal(self.phase, &mut a)
            .cmp(decimal(other.phase, &mut b))
            .then_with(|| decimal(self.sequence, &mut a).cmp(decimal(other.sequence, &mut b)))
    }
}

/// ASCII decimal digits of `n`, written into the tail of `buf`.
fn decimal(mut n: u32, buf: &mut [u8; 10]) -> &[u8] {
    let mut start = buf.len();
    loop {
        start -= 1;
        buf[start] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    &buf[start..]
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.phase, self.sequence)
    }
}

impl FromStr for PlanId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidPlanId {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (phase, sequence) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| invalid("expected the form phase-sequence"))?;

        let phase = phase
            .parse::<u32>()
            .map_err(|e| invalid(&format!("phase: {e}")))?;
        let sequence = sequence
            .parse::<u32>()
            .map_err(|e| invalid(&format!("sequence: {e}")))?;

        Ok(Self::new(phase, sequence))
    }
}

impl TryFrom<String> for PlanId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<PlanId> for String {
    fn from(id: PlanId) -> Self {
        id.to_string()
    }
}
