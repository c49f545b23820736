//! Limits applied to constructions that explore composite state spaces.

use crate::error::Error;
use std::convert::Infallible;

/// Bounds for product and subset constructions.
///
/// Both constructions only materialize reachable composite states, but the
/// reachable part of a powerset can still grow exponentially.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of states in the constructed DFA (None = unlimited).
    pub max_states: Option<usize>,
}

impl Limits {
    pub const UNLIMITED: Limits = Limits { max_states: None };

    pub fn with_max_states(max_states: usize) -> Self {
        Self {
            max_states: Some(max_states),
        }
    }
}

/// Admission check run before a construction materializes another state.
pub(crate) trait StateBudget {
    type Error;

    /// Fail if `count` materialized states exceed the budget.
    fn admit(&self, count: usize) -> Result<(), Self::Error>;
}

impl StateBudget for Limits {
    type Error = Error;

    fn admit(&self, count: usize) -> Result<(), Error> {
        match self.max_states {
            Some(limit) if count > limit => Err(Error::StateLimitExceeded { limit }),
            _ => Ok(()),
        }
    }
}

/// Budget of the infallible constructions.
pub(crate) struct Unbounded;

impl StateBudget for Unbounded {
    type Error = Infallible;

    fn admit(&self, _count: usize) -> Result<(), Infallible> {
        Ok(())
    }
}
