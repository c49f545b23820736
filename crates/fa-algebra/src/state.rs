//! State types for automata.

use fixedbitset::FixedBitSet;
use std::fmt;

/// A state index into an automaton's interned state table.
pub(crate) type StateId = u32;

/// The name of an automaton state.
///
/// Constructions synthesize composite names: [`State::Pair`] for product
/// states and [`State::Set`] for subset-construction states. Composite
/// names are canonical, so structurally equal pairs or sets compare equal.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum State {
    /// A state named by the caller.
    Named(String),
    /// A state of a product automaton.
    Pair(Box<State>, Box<State>),
    /// A state of a subset-constructed automaton. Sorted and deduplicated.
    Set(Vec<State>),
    /// The dead state: never accepting, loops to itself on every symbol.
    Sink,
}

impl State {
    /// A caller-named state.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// The product state of `first` and `second`.
    pub fn pair(first: State, second: State) -> Self {
        Self::Pair(Box::new(first), Box::new(second))
    }

    /// Build the canonical composite for a collection of states.
    pub fn set(states: impl IntoIterator<Item = State>) -> Self {
        let mut members: Vec<State> = states.into_iter().collect();
        members.sort_unstable();
        members.dedup();
        Self::Set(members)
    }

    /// Whether this is the dead state.
    #[inline]
    pub fn is_sink(&self) -> bool {
        matches!(self, Self::Sink)
    }
}

impl From<&str> for State {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for State {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Pair(first, second) => write!(f, "({first}, {second})"),
            Self::Set(members) => {
                f.write_str("{")?;
                for (idx, member) in members.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{member}")?;
                }
                f.write_str("}")
            }
            Self::Sink => f.write_str("∅"),
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A set of states implemented using a fixed-size bit set for efficiency.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    /// Create a new empty state set with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Create a state set containing a single state.
    pub fn singleton(state: StateId, capacity: usize) -> Self {
        let mut set = Self::with_capacity(capacity);
        set.insert(state);
        set
    }

    /// Insert a state into the set.
    pub fn insert(&mut self, state: StateId) {
        let idx = state as usize;
        if idx >= self.bits.len() {
            self.bits.grow(idx + 1);
        }
        self.bits.insert(idx);
    }

    /// Check if the set contains a state.
    pub fn contains(&self, state: StateId) -> bool {
        let idx = state as usize;
        idx < self.bits.len() && self.bits.contains(idx)
    }

    /// Check if the set has no members.
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Iterate over all states in the set, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.bits.ones().map(|i| i as StateId)
    }

    /// Union this set with another, modifying self in place.
    pub fn union_with(&mut self, other: &StateSet) {
        if other.bits.len() > self.bits.len() {
            self.bits.grow(other.bits.len());
        }
        self.bits.union_with(&other.bits);
    }

    /// Check if this set intersects with another.
    pub fn intersects(&self, other: &StateSet) -> bool {
        self.bits.intersection(&other.bits).next().is_some()
    }

    /// Canonical representation for hashing, independent of capacity.
    pub fn to_vec(&self) -> Vec<StateId> {
        self.iter().collect()
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let mut set = Self::with_capacity(0);
        for state in iter {
            set.insert(state);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_set_basic() {
        let mut set = StateSet::with_capacity(10);
        assert!(set.is_empty());

        set.insert(3);
        set.insert(7);
        assert!(!set.is_empty());
        assert_eq!(set.to_vec(), vec![3, 7]);
        assert!(set.contains(3));
        assert!(set.contains(7));
        assert!(!set.contains(5));
        assert!(!set.contains(42));
    }

    #[test]
    fn test_state_set_union() {
        let mut set1: StateSet = [1, 3].into_iter().collect();
        let set2: StateSet = [2, 3, 12].into_iter().collect();

        set1.union_with(&set2);
        assert_eq!(set1.to_vec(), vec![1, 2, 3, 12]);
        assert!(set1.intersects(&set2));
        assert!(!set1.intersects(&StateSet::singleton(5, 10)));
    }

    #[test]
    fn test_state_set_canonical_key() {
        // Different capacities, same members.
        let small: StateSet = [0, 2].into_iter().collect();
        let mut large = StateSet::with_capacity(64);
        large.insert(2);
        large.insert(0);
        assert_eq!(small.to_vec(), large.to_vec());
    }

    #[test]
    fn test_set_name_is_canonical() {
        let a = State::set(["b".into(), "a".into(), "b".into()]);
        let b = State::set(["a".into(), "b".into()]);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "{a, b}");
    }

    #[test]
    fn test_state_display() {
        let pair = State::pair("p".into(), State::Sink);
        assert_eq!(pair.to_string(), "(p, ∅)");
        assert!(State::Sink.is_sink());
        assert!(!State::named("DEAD").is_sink());
    }
}
