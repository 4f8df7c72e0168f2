//! Step accounting.
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Planned versus successful units of work.
///
/// `total` grows whenever a step is planned, even if the user later declines
/// it; `successes` only when the step completes.  Tallies compose by pairwise
/// addition, so the run total is the sum of every component's tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StepTally {
    /// Steps that completed without error.
    pub successes: u32,
    /// Steps that were planned.
    pub total: u32,
}

impl StepTally {
    /// An empty tally.
    pub const ZERO: Self = Self {
        successes: 0,
        total: 0,
    };

    /// A tally of `successes` out of `total`.
    #[must_use]
    pub const fn new(successes: u32, total: u32) -> Self {
        Self { successes, total }
    }

    /// One planned step, successful or not.
    #[must_use]
    pub fn single(ok: bool) -> Self {
        Self {
            successes: u32::from(ok),
            total: 1,
        }
    }

    /// `steps` planned steps of which none succeeded (declined as a group).
    #[must_use]
    pub const fn declined(steps: u32) -> Self {
        Self {
            successes: 0,
            total: steps,
        }
    }

    /// Count one more planned step.
    pub fn record(&mut self, ok: bool) {
        *self += Self::single(ok);
    }

    /// Number of planned steps that did not succeed.
    #[must_use]
    pub const fn issues(self) -> u32 {
        self.total.saturating_sub(self.successes)
    }

    /// Whether every planned step succeeded.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.successes == self.total
    }
}

impl Add for StepTally {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            successes: self.successes + rhs.successes,
            total: self.total + rhs.total,
        }
    }
}

impl AddAssign for StepTally {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for StepTally {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for StepTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.successes, self.total)
    }
}

/// Whether a step participates in accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Counted in the tally.
    Required,
    /// Executed and reported, but its outcome never touches the tally.
    BestEffort,
}

impl StepKind {
    /// Contribution of a step of this kind with outcome `ok`.
    #[must_use]
    pub fn tally(self, ok: bool) -> StepTally {
        match self {
            Self::Required => StepTally::single(ok),
            Self::BestEffort => StepTally::ZERO,
        }
    }
}
