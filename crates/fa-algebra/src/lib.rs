//! Finite automaton algebra.
//!
//! This crate provides DFA and epsilon-NFA implementations with:
//! - String acceptance for both kinds of automata
//! - Epsilon closure computation
//! - Product constructions (union, intersection, difference)
//! - Moore's partition-refinement DFA minimization
//! - Subset construction (NFA to DFA conversion)
//!
//! Automata are immutable once built; every construction returns a new,
//! independently owned automaton.

mod dfa;
mod error;
mod limits;
mod minimize;
mod nfa;
pub mod product;
mod state;
mod subset_construction;
mod symbol;

pub use dfa::{Dfa, DfaBuilder};
pub use error::{Error, Result};
pub use limits::Limits;
pub use nfa::{Nfa, NfaBuilder};
pub use product::{cross, cross_bounded, intersection, is_equivalent, minus, symmetric_difference, union};
pub use state::State;
pub use symbol::Symbol;

#[cfg(doctest)]
#[doc = include_str!("../../../README.md")]
pub struct ReadmeDoctests;
