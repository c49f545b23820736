//! Deterministic Finite Automaton (DFA) implementation.

use crate::error::{Error, Result};
use crate::nfa::Nfa;
use crate::state::{State, StateId, StateSet};
use crate::symbol::{Symbol, SymbolId, for_each_char_symbol};
use indexmap::IndexSet;
use log::debug;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};

/// A Deterministic Finite Automaton.
///
/// The transition table may be partial: a missing `(state, symbol)` entry
/// means "no transition", and evaluation treats it as a move into an
/// implicit, rejecting sink. Derived automata (products, minimized and
/// subset-constructed DFAs) are always total over their alphabet.
#[derive(Debug, Clone)]
pub struct Dfa {
    /// Interned state names; a state's index is its `StateId`
    states: IndexSet<State>,
    /// Interned symbols; a symbol's index is its `SymbolId`
    alphabet: IndexSet<Symbol>,
    /// Start state
    start_state: StateId,
    /// Final (accepting) states
    final_states: StateSet,
    /// Transitions: (source, symbol) -> destination
    transitions: HashMap<(StateId, SymbolId), StateId>,
}

impl Dfa {
    /// Start describing a DFA whose start state is `start`.
    pub fn builder(start: impl Into<State>) -> DfaBuilder {
        DfaBuilder::new(start)
    }

    pub(crate) fn from_parts(
        states: IndexSet<State>,
        alphabet: IndexSet<Symbol>,
        start_state: StateId,
        final_states: StateSet,
        transitions: HashMap<(StateId, SymbolId), StateId>,
    ) -> Self {
        Self {
            states,
            alphabet,
            start_state,
            final_states,
            transitions,
        }
    }

    /// Get the start state.
    pub fn start_state(&self) -> &State {
        self.state(self.start_state)
    }

    /// Every state with a row in the transition table.
    pub fn states(&self) -> &IndexSet<State> {
        &self.states
    }

    /// Every symbol appearing in the transition table.
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

    /// Get the transition from a state on a symbol.
    ///
    /// Returns `None` when the state is unknown or has no edge on `symbol`.
    pub fn transition(&self, state: &State, symbol: impl AsRef<str>) -> Option<&State> {
        let state = self.state_id(state)?;
        self.step_on(state, symbol.as_ref()).map(|next| self.state(next))
    }

    /// Run the automaton over `input`, one `char` per symbol.
    pub fn accepts(&self, input: &str) -> bool {
        let mut state = self.start_state;
        let consumed = for_each_char_symbol(input, |symbol| match self.step_on(state, symbol) {
            Some(next) => {
                state = next;
                true
            }
            None => false,
        });
        consumed && self.final_states.contains(state)
    }

    /// Run the automaton over a sequence of (possibly multi-character)
    /// symbols.
    pub fn accepts_symbols<I, S>(&self, input: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = self.start_state;
        for symbol in input {
            match self.step_on(state, symbol.as_ref()) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.final_states.contains(state)
    }

    /// Get all transitions as an iterator, ordered by state then symbol.
    pub fn transitions(&self) -> impl Iterator<Item = (&State, &Symbol, &State)> + '_ {
        self.state_ids().flat_map(move |source| {
            self.symbol_ids().filter_map(move |symbol| {
                self.step(source, symbol)
                    .map(|dest| (self.state(source), self.symbol(symbol), self.state(dest)))
            })
        })
    }

    /// Whether every state has an edge on every alphabet symbol.
    pub fn is_total(&self) -> bool {
        self.transitions.len() == self.states.len() * self.alphabet.len()
    }

    /// Return an equivalent DFA whose transition function is total, routing
    /// every missing edge to [`State::Sink`].
    pub fn complete(&self) -> Dfa {
        if self.is_total() {
            return self.clone();
        }

        // A declared sink is dead here: builders reject any other use, and
        // only total automata carry the accepting sink of a complement.
        let mut completed = self.clone();
        let (sink, _) = completed.states.insert_full(State::Sink);
        let sink = sink as StateId;

        for state in completed.state_ids() {
            for symbol in completed.symbol_ids() {
                completed.transitions.entry((state, symbol)).or_insert(sink);
            }
        }

        debug!(
            "completed DFA: {} -> {} states",
            self.num_states(),
            completed.num_states()
        );
        completed
    }

    /// Return an equivalent DFA restricted to the states reachable from the
    /// start state. The start state gets index 0.
    pub fn reachable(&self) -> Dfa {
        let order = self.find_reachable_states();
        let mut renumber: HashMap<StateId, StateId> = HashMap::with_capacity(order.len());
        let mut states = IndexSet::with_capacity(order.len());
        for &old in &order {
            let (new, _) = states.insert_full(self.state(old).clone());
            renumber.insert(old, new as StateId);
        }

        let mut final_states = StateSet::with_capacity(order.len());
        let mut transitions = HashMap::new();
        for &old in &order {
            let new = renumber[&old];
            if self.final_states.contains(old) {
                final_states.insert(new);
            }
            for symbol in self.symbol_ids() {
                if let Some(dest) = self.step(old, symbol) {
                    transitions.insert((new, symbol), renumber[&dest]);
                }
            }
        }

        Dfa::from_parts(
            states,
            self.alphabet.clone(),
            0,
            final_states,
            transitions,
        )
    }

    /// Check if the DFA is empty (accepts no strings).
    pub fn is_empty(&self) -> bool {
        if self.final_states.is_empty() {
            return true;
        }
        !self
            .find_reachable_states()
            .into_iter()
            .any(|state| self.final_states.contains(state))
    }

    /// Return a DFA accepting exactly the strings over this alphabet that
    /// this DFA rejects.
    pub fn complement(&self) -> Dfa {
        let mut complemented = self.complete();
        complemented.final_states = complemented
            .state_ids()
            .filter(|&state| !complemented.final_states.contains(state))
            .collect();
        complemented
    }

    /// View this DFA as an NFA with singleton successor sets.
    pub fn to_nfa(&self) -> Nfa {
        let capacity = self.states.len();
        let transitions = self
            .transitions
            .iter()
            .map(|(&key, &dest)| (key, StateSet::singleton(dest, capacity)))
            .collect();
        Nfa::from_parts(
            self.states.clone(),
            self.alphabet.clone(),
            self.start_state,
            self.final_states.clone(),
            transitions,
        )
    }

    /// Find all states reachable from the start state, in BFS order.
    fn find_reachable_states(&self) -> Vec<StateId> {
        let mut visited = StateSet::with_capacity(self.states.len());
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(self.start_state);

        while let Some(state) = queue.pop_front() {
            if visited.contains(state) {
                continue;
            }
            visited.insert(state);
            order.push(state);

            for symbol in self.symbol_ids() {
                if let Some(next) = self.step(state, symbol) {
                    if !visited.contains(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        order
    }

    #[inline]
    pub(crate) fn step(&self, source: StateId, symbol: SymbolId) -> Option<StateId> {
        self.transitions.get(&(source, symbol)).copied()
    }

    fn step_on(&self, source: StateId, symbol: &str) -> Option<StateId> {
        let symbol = self.alphabet.get_index_of(symbol)? as SymbolId;
        self.step(source, symbol)
    }

    pub(crate) fn start_id(&self) -> StateId {
        self.start_state
    }

    pub(crate) fn is_final(&self, state: StateId) -> bool {
        self.final_states.contains(state)
    }

    /// Whether `state` is a non-accepting [`State::Sink`].
    pub(crate) fn is_dead(&self, state: StateId) -> bool {
        self.state(state).is_sink() && !self.is_final(state)
    }

    pub(crate) fn state(&self, state: StateId) -> &State {
        &self.states[state as usize]
    }

    pub(crate) fn state_id(&self, state: &State) -> Option<StateId> {
        self.states.get_index_of(state).map(|id| id as StateId)
    }

    pub(crate) fn symbol(&self, symbol: SymbolId) -> &Symbol {
        &self.alphabet[symbol as usize]
    }

    pub(crate) fn symbol_id(&self, symbol: &str) -> Option<SymbolId> {
        self.alphabet.get_index_of(symbol).map(|id| id as SymbolId)
    }

    pub(crate) fn state_ids(&self) -> impl Iterator<Item = StateId> + use<> {
        0..self.states.len() as StateId
    }

    pub(crate) fn symbol_ids(&self) -> impl Iterator<Item = SymbolId> + use<> {
        0..self.alphabet.len() as SymbolId
    }
}

/// Incrementally describes a [`Dfa`]; validated by [`DfaBuilder::build`].
#[derive(Debug, Clone)]
pub struct DfaBuilder {
    start_state: State,
    states: IndexSet<State>,
    alphabet: IndexSet<Symbol>,
    final_states: Vec<State>,
    transitions: HashMap<(StateId, SymbolId), StateId>,
    /// First inconsistency seen while adding transitions
    error: Option<Error>,
}

impl DfaBuilder {
    /// Start a description whose start state is `start`.
    pub fn new(start: impl Into<State>) -> Self {
        Self {
            start_state: start.into(),
            states: IndexSet::new(),
            alphabet: IndexSet::new(),
            final_states: Vec::new(),
            transitions: HashMap::new(),
            error: None,
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

    /// Add a transition. Both endpoints become declared states.
    pub fn add_transition(
        &mut self,
        source: impl Into<State>,
        symbol: impl Into<Symbol>,
        destination: impl Into<State>,
    ) -> &mut Self {
        let source = self.intern(source.into());
        let destination = self.intern(destination.into());
        let symbol = symbol.into();

        if symbol.is_epsilon() {
            let err = Error::EpsilonInDfa(self.states[source as usize].clone());
            self.error.get_or_insert(err);
            return self;
        }

        let (symbol, _) = self.alphabet.insert_full(symbol);
        let conflict = match self.transitions.entry((source, symbol as SymbolId)) {
            Entry::Vacant(entry) => {
                entry.insert(destination);
                None
            }
            Entry::Occupied(entry) if *entry.get() != destination => Some(*entry.get()),
            Entry::Occupied(_) => None,
        };

        if let Some(first) = conflict {
            let err = Error::ConflictingTransition {
                state: self.states[source as usize].clone(),
                symbol: self.alphabet[symbol].clone(),
                first: self.states[first as usize].clone(),
                second: self.states[destination as usize].clone(),
            };
            self.error.get_or_insert(err);
        }
        self
    }

    /// Validate the description and produce the automaton.
    pub fn build(&self) -> Result<Dfa> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }

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

        // Constructions reuse a declared sink as their dead state.
        if let Some(sink) = self.states.get_index_of(&State::Sink) {
            let sink = sink as StateId;
            let loops_only = self
                .transitions
                .iter()
                .all(|(&(source, _), &dest)| source != sink || dest == sink);
            if final_states.contains(sink) || !loops_only {
                return Err(Error::ReservedSink(State::Sink));
            }
        }

        Ok(Dfa::from_parts(
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
