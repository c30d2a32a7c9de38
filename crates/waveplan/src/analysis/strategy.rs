//! Execution strategy statistics.

use crate::graph::Wave;
use serde::Serialize;

/// Advice attached to a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advice {
    /// No wave runs more than one plan
    AllSequential,
    /// Every plan fits in a single wave
    AllParallel,
}

impl Advice {
    /// Human-readable advice text.
    pub const fn message(self) -> &'static str {
        match self {
            Self::AllSequential => {
                "All plans are sequential. Consider breaking dependencies or reorganizing into vertical slices."
            }
            Self::AllParallel => "All plans can run in parallel!",
        }
    }
}

/// How much of a schedule can run concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Strategy {
    /// Plans belonging to waves with more than one member
    pub parallelizable: usize,
    /// Number of waves
    pub waves: usize,
    /// Waves with exactly one member
    pub sequential_waves: usize,
    /// `parallelizable / total plans`, as a rounded percentage
    pub efficiency_percent: u32,
    /// Advice for the extreme cases
    pub advice: Option<Advice>,
}

impl Strategy {
    /// Derive strategy statistics from a schedule over `total_plans` plans.
    pub fn from_waves(waves: &[Wave], total_plans: usize) -> Self {
        let parallelizable: usize = waves
            .iter()
            .filter(|wave| wave.is_parallel())
            .map(Wave::len)
            .sum();
        let sequential_waves = waves.iter().filter(|wave| wave.len() == 1).count();

        let advice = if waves.is_empty() {
            None
        } else if parallelizable == 0 {
            Some(Advice::AllSequential)
        } else if waves.len() == 1 {
            Some(Advice::AllParallel)
        } else {
            None
        };

        Self {
            parallelizable,
            waves: waves.len(),
            sequential_waves,
            efficiency_percent: rounded_percent(parallelizable, total_plans),
            advice,
        }
    }
}

/// `part * 100 / whole` rounded half up; `whole` of zero counts as one.
fn rounded_percent(part: usize, whole: usize) -> u32 {
    let whole = whole.max(1) as u128;
    let percent = (part as u128 * 200 + whole) / (whole * 2);
    u32::try_from(percent).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlanId;
    use rstest::rstest;

    fn wave(number: usize, sequences: &[u32]) -> Wave {
        Wave {
            number,
            plans: sequences.iter().map(|s| PlanId::new(1, *s)).collect(),
            stalled: false,
        }
    }

    #[test]
    fn test_all_sequential() {
        let waves = [wave(1, &[1]), wave(2, &[2]), wave(3, &[3])];

        let strategy = Strategy::from_waves(&waves, 3);
        assert_eq!(strategy.parallelizable, 0);
        assert_eq!(strategy.sequential_waves, 3);
        assert_eq!(strategy.efficiency_percent, 0);
        assert_eq!(strategy.advice, Some(Advice::AllSequential));
    }

    #[test]
    fn test_all_parallel() {
        let waves = [wave(1, &[1, 2, 3])];

        let strategy = Strategy::from_waves(&waves, 3);
        assert_eq!(strategy.parallelizable, 3);
        assert_eq!(strategy.waves, 1);
        assert_eq!(strategy.efficiency_percent, 100);
        assert_eq!(strategy.advice, Some(Advice::AllParallel));
    }

    #[test]
    fn test_diamond_is_half_parallel() {
        let waves = [wave(1, &[1]), wave(2, &[2, 3]), wave(3, &[4])];

        let strategy = Strategy::from_waves(&waves, 4);
        assert_eq!(strategy.parallelizable, 2);
        assert_eq!(strategy.sequential_waves, 2);
        assert_eq!(strategy.efficiency_percent, 50);
        assert_eq!(strategy.advice, None);
    }

    #[test]
    fn test_empty_schedule() {
        let strategy = Strategy::from_waves(&[], 0);
        assert_eq!(strategy.waves, 0);
        assert_eq!(strategy.efficiency_percent, 0);
        assert_eq!(strategy.advice, None);
    }

    #[rstest]
    #[case(2, 3, 67)]
    #[case(1, 3, 33)]
    #[case(1, 8, 13)]
    #[case(0, 0, 0)]
    #[case(5, 5, 100)]
    fn test_rounded_percent(#[case] part: usize, #[case] whole: usize, #[case] expected: u32) {
        assert_eq!(rounded_percent(part, whole), expected);
    }
}
