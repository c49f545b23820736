//! Non-deterministic Finite Automaton with epsilon transitions.

use crate::error::{Error, Result};
use crate::state::{State, StateId, StateSet};
use crate::symbol::{EPSILON, EPSILON_SYMBOL, Symbol, SymbolId, for_each_char_symbol, is_epsilon};
use indexmap::IndexSet;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::iter;
use std::sync::OnceLock;

/// A Non-deterministic Finite Automaton with epsilon transitions.
#[derive(Debug, Clone)]
pub struct Nfa {
    /// Interned state names; a state's index is its `StateId`
    states: IndexSet<State>,
    /// All symbols used (excluding epsilon)
    alphabet: IndexSet<Symbol>,
    /// Start state
    start_state: StateId,
    /// Final (accepting) states
    final_states: StateSet,
    /// Transitions: (source, symbol) -> set of destination states
    /// For epsilon transitions, symbol == EPSILON
    transitions: HashMap<(StateId, SymbolId), StateSet>,
    /// Epsilon closure of every state, computed on first use
    epsilon_closures: OnceLock<Vec<StateSet>>,
}

impl Nfa {
    /// Start describing an NFA whose start state is `start`.
    pub fn builder(start: impl Into<State>) -> NfaBuilder {
        NfaBuilder::new(start)
    }

    pub(crate) fn from_parts(
        states: IndexSet<State>,
        alphabet: IndexSet<Symbol>,
        start_state: StateId,
        final_states: StateSet,
        transitions: HashMap<(StateId, SymbolId), StateSet>,
    ) -> Self {
        Self {
            states,
            alphabet,
            start_state,
            final_states,
            transitions,
            epsilon_closures: OnceLock::new(),
        }
    }

    /// Get the start state.
    pub fn start_state(&self) -> &State {
        self.state(self.start_state)
    }

    /// Every declared state.
    pub fn states(&self) -> &IndexSet<State> {
        &self.states
    }

    /// Get the alphabet (all symbols except epsilon).
    pub fn alphabet(&self) -> &IndexSet<Symbol> {
        &self.alphabet
    }

    /// Number of declared states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Get the accepting states.
    pub fn accept_states(&self) -> impl Iterator<Item = &State> + '_ {
        self.final_states.iter().map(|id| self.state(id))
    }

    /// Whether `state` is an accepting state of this automaton.
    pub fn is_accepting(&self, state: &State) -> bool {
        self.state_id(state)
            .is_some_and(|id| self.final_states.contains(id))
    }

    /// The declared successors of `state` on `symbol`; the epsilon symbol
    /// yields the epsilon successors. Empty when there is no such edge.
    pub fn transition(&self, state: &State, symbol: impl AsRef<str>) -> BTreeSet<&State> {
        let symbol = symbol.as_ref();
        let symbol = if symbol.is_empty() {
            Some(EPSILON)
        } else {
            self.symbol_id(symbol)
        };
        match (self.state_id(state), symbol) {
            (Some(state), Some(symbol)) => self
                .transitions
                .get(&(state, symbol))
                .map(|dests| self.names(dests))
                .unwrap_or_default(),
            _ => BTreeSet::new(),
        }
    }

    /// Every state reachable from `state` through zero or more epsilon
    /// transitions, `state` included. Empty for unknown states.
    pub fn epsilon_closure(&self, state: &State) -> BTreeSet<&State> {
        match self.state_id(state) {
            Some(state) => self.names(&self.closures()[state as usize]),
            None => BTreeSet::new(),
        }
    }

    /// Epsilon-close `state`, follow `symbol` from every state of the
    /// closure, then epsilon-close the result.
    pub fn possible_next_states(&self, state: &State, symbol: impl AsRef<str>) -> BTreeSet<&State> {
        match (self.state_id(state), self.symbol_id(symbol.as_ref())) {
            (Some(state), Some(symbol)) => {
                let closure = &self.closures()[state as usize];
                self.names(&self.move_on_symbol(closure, symbol))
            }
            _ => BTreeSet::new(),
        }
    }

    /// Whether some path labelled `input` (one `char` per symbol) leads from
    /// the start state to an accepting state.
    ///
    /// All branches are followed at once, so the cost is bounded by the
    /// input length times the number of states.
    pub fn accepts(&self, input: &str) -> bool {
        let mut current = self.closures()[self.start_state as usize].clone();
        let consumed = for_each_char_symbol(input, |symbol| self.advance(&mut current, symbol));
        consumed && current.intersects(&self.final_states)
    }

    /// Like [`Nfa::accepts`], over a sequence of (possibly multi-character)
    /// symbols.
    pub fn accepts_symbols<I, S>(&self, input: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut current = self.closures()[self.start_state as usize].clone();
        for symbol in input {
            if !self.advance(&mut current, symbol.as_ref()) {
                return false;
            }
        }
        current.intersects(&self.final_states)
    }

    /// Check if the NFA accepts no string at all.
    /// Uses BFS from the start state following all transitions.
    pub fn is_empty(&self) -> bool {
        let mut visited = StateSet::with_capacity(self.states.len());
        let mut queue: VecDeque<StateId> = VecDeque::new();
        queue.push_back(self.start_state);

        while let Some(state) = queue.pop_front() {
            if visited.contains(state) {
                continue;
            }
            visited.insert(state);

            if self.final_states.contains(state) {
                return false;
            }

            for symbol in self.symbol_ids().chain(iter::once(EPSILON)) {
                if let Some(destinations) = self.transitions.get(&(state, symbol)) {
                    for dest in destinations.iter() {
                        if !visited.contains(dest) {
                            queue.push_back(dest);
                        }
                    }
                }
            }
        }

        true
    }

    /// Get all transitions as an iterator, ordered by state then symbol,
    /// epsilon edges last.
    pub fn transitions(&self) -> impl Iterator<Item = (&State, &Symbol, &State)> + '_ {
        (0..self.states.len() as StateId).flat_map(move |source| {
            self.symbol_ids()
                .chain(iter::once(EPSILON))
                .filter_map(move |symbol| {
                    self.transitions.get(&(source, symbol)).map(|dests| (symbol, dests))
                })
                .flat_map(move |(symbol, dests)| {
                    let label = if is_epsilon(symbol) {
                        &EPSILON_SYMBOL
                    } else {
                        &self.alphabet[symbol as usize]
                    };
                    dests
                        .iter()
                        .map(move |dest| (self.state(source), label, self.state(dest)))
                })
        })
    }

    /// Compute the epsilon closure of a single state using DFS.
    fn epsilon_closure_single(&self, state: StateId) -> StateSet {
        let mut closure = StateSet::with_capacity(self.states.len());
        let mut stack = vec![state];

        while let Some(s) = stack.pop() {
            if closure.contains(s) {
                continue;
            }
            closure.insert(s);

            // Follow epsilon transitions
            if let Some(destinations) = self.transitions.get(&(s, EPSILON)) {
                for dest in destinations.iter() {
                    if !closure.contains(dest) {
                        stack.push(dest);
                    }
                }
            }
        }

        closure
    }

    /// Epsilon closures for all states (cached).
    fn closures(&self) -> &[StateSet] {
        self.epsilon_closures.get_or_init(|| {
            (0..self.states.len() as StateId)
                .map(|state| self.epsilon_closure_single(state))
                .collect()
        })
    }

    /// Get the epsilon closure of a set of states.
    pub(crate) fn epsilon_closure_of(&self, states: &StateSet) -> StateSet {
        let closures = self.closures();
        let mut closure = StateSet::with_capacity(self.states.len());
        for state in states.iter() {
            closure.union_with(&closures[state as usize]);
        }
        closure
    }

    /// Get the states reachable from a set of states on a given symbol.
    /// Returns the epsilon closure of the reached states.
    pub(crate) fn move_on_symbol(&self, states: &StateSet, symbol: SymbolId) -> StateSet {
        debug_assert!(!is_epsilon(symbol), "Use epsilon_closure for epsilon moves");

        let mut reached = StateSet::with_capacity(self.states.len());
        for state in states.iter() {
            if let Some(destinations) = self.transitions.get(&(state, symbol)) {
                reached.union_with(destinations);
            }
        }

        self.epsilon_closure_of(&reached)
    }

    /// Replace `current` with its successors on `symbol`. Returns `false`
    /// once no branch survives.
    fn advance(&self, current: &mut StateSet, symbol: &str) -> bool {
        match self.symbol_id(symbol) {
            Some(symbol) => {
                *current = self.move_on_symbol(current, symbol);
                !current.is_empty()
            }
            None => false,
        }
    }

    fn names(&self, states: &StateSet) -> BTreeSet<&State> {
        states.iter().map(|id| self.state(id)).collect()
    }

    pub(crate) fn start_id(&self) -> StateId {
        self.start_state
    }

    pub(crate) fn final_states(&self) -> &StateSet {
        &self.final_states
    }

    pub(crate) fn state(&self, state: StateId) -> &State {
        &self.states[state as usize]
    }

    fn state_id(&self, state: &State) -> Option<StateId> {
        self.states.get_index_of(state).map(|id| id as StateId)
    }

    fn symbol_id(&self, symbol: &str) -> Option<SymbolId> {
        self.alphabet.get_index_of(symbol).map(|id| id as SymbolId)
    }

    pub(crate) fn symbol_ids(&self) -> impl Iterator<Item = SymbolId> + use<> {
        0..self.alphabet.len() as SymbolId
    }
}

/// Incrementally describes an [`Nfa`]; validated by [`NfaBuilder::build`].
#[derive(Debug, Clone)]
pub struct NfaBuilder {
    start_state: State,
    states: IndexSet<State>,
    alphabet: IndexSet<Symbol>,
    final_states: Vec<State>,
    transitions: HashMap<(StateId, SymbolId), StateSet>,
}

impl NfaBuilder {
    /// Start a description whose start state is `start`.
    pub fn new(start: impl Into<State>) -> Self {
        Self {
            start_state: start.into(),
            states: IndexSet::new(),
            alphabet: IndexSet::new(),
            final_states: Vec::new(),
            transitions: HashMap::new(),
        }
    }

    /// Declare a state, even if it has no outgoing transitions.
    pub fn add_state(&mut self, state: impl Into<State>) -> &mut Self {
        self.intern(state.into());
        self
    }

    /// Add a final (accepting) state.
    pub fn add_final_state(&mut self, state: impl Into<State>) -> &mut Self {
        self.final_states.push(state.into());
        self
    }

    /// Add a transition from source to destination on the given symbol.
    /// The empty symbol adds an epsilon transition.
    pub fn add_transition(
        &mut self,
        source: impl Into<State>,
        symbol: impl Into<Symbol>,
        destination: impl Into<State>,
    ) -> &mut Self {
        self.add_transitions(source, symbol, [destination])
    }

    /// Add an epsilon transition from source to destination.
    pub fn add_epsilon_transition(
        &mut self,
        source: impl Into<State>,
        destination: impl Into<State>,
    ) -> &mut Self {
        self.add_transition(source, Symbol::epsilon(), destination)
    }

    /// Add transitions from source to every destination on one symbol.
    pub fn add_transitions<D>(
        &mut self,
        source: impl Into<State>,
        symbol: impl Into<Symbol>,
        destinations: impl IntoIterator<Item = D>,
    ) -> &mut Self
    where
        D: Into<State>,
    {
        let source = self.intern(source.into());
        let symbol = symbol.into();
        let symbol = if symbol.is_epsilon() {
            EPSILON
        } else {
            self.alphabet.insert_full(symbol).0 as SymbolId
        };

        let mut reached = StateSet::with_capacity(self.states.len());
        for destination in destinations {
            reached.insert(self.intern(destination.into()));
        }
        self.transitions
            .entry((source, symbol))
            .or_insert_with(|| StateSet::with_capacity(0))
            .union_with(&reached);
        self
    }

    /// Validate the description and produce the automaton.
    pub fn build(&self) -> Result<Nfa> {
        let start_state = self
            .states
            .get_index_of(&self.start_state)
            .ok_or_else(|| Error::UndeclaredStart(self.start_state.clone()))?
            as StateId;

        let mut final_states = StateSet::with_capacity(self.states.len());
        for state in &self.final_states {
            let id = self
                .states
                .get_index_of(state)
                .ok_or_else(|| Error::UndeclaredAccept(state.clone()))?;
            final_states.insert(id as StateId);
        }

        Ok(Nfa::from_parts(
            self.states.clone(),
            self.alphabet.clone(),
            start_state,
            final_states,
            self.transitions.clone(),
        ))
    }

    fn intern(&mut self, state: State) -> StateId {
        self.states.insert_full(state).0 as StateId
    }
}
