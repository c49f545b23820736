//! Errors raised while building automata.

use crate::state::State;
use crate::symbol::Symbol;
use thiserror::Error;

/// Errors that can occur while constructing an automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("start state {0} is not declared in the transition table")]
    UndeclaredStart(State),

    #[error("accept state {0} is not declared in the transition table")]
    UndeclaredAccept(State),

    #[error("state {state} has conflicting transitions on {symbol:?}: {first} and {second}")]
    ConflictingTransition {
        state: State,
        symbol: Symbol,
        first: State,
        second: State,
    },

    #[error("deterministic automata cannot carry epsilon transitions (from state {0})")]
    EpsilonInDfa(State),

    #[error("the dead state {0} must be non-accepting and loop only to itself")]
    ReservedSink(State),

    #[error("construction exceeded the limit of {limit} states")]
    StateLimitExceeded { limit: usize },
}

/// Result type for automaton construction.
pub type Result<T, E = Error> = std::result::Result<T, E>;
