//! Subset construction algorithm for converting ε-NFA to DFA.

use crate::dfa::Dfa;
use crate::error::Result;
use crate::limits::{Limits, StateBudget, Unbounded};
use crate::nfa::Nfa;
use crate::state::{State, StateId, StateSet};
use crate::symbol::SymbolId;
use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};
use std::collections::HashMap;

impl Nfa {
    /// Convert to an equivalent DFA using the powerset construction.
    ///
    /// DFA states are named by [`State::Set`] of their NFA members; empty
    /// successor sets go to a shared [`State::Sink`], so the result is total.
    pub fn to_dfa(&self) -> Dfa {
        let Ok(dfa) = subset_construction(self, &Unbounded);
        dfa
    }

    /// Like [`Nfa::to_dfa`], failing once more than `limits.max_states`
    /// DFA states would be materialized.
    pub fn to_dfa_bounded(&self, limits: &Limits) -> Result<Dfa> {
        subset_construction(self, limits)
    }
}

/// DFA under construction, keyed by the NFA state sets it has materialized.
struct Powerset<'a> {
    nfa: &'a Nfa,
    /// NFA state set (canonical sorted ids) -> DFA state
    state_mapping: IndexMap<Vec<StateId>, StateId>,
    states: IndexSet<State>,
    final_states: StateSet,
    sink: Option<StateId>,
}

impl Powerset<'_> {
    /// Look up the DFA state for `set`, materializing it if new. Returns the
    /// state and whether it still has to be explored.
    fn intern<B: StateBudget>(&mut self, set: &StateSet, budget: &B) -> Result<(StateId, bool), B::Error> {
        let key = set.to_vec();
        if let Some(&existing) = self.state_mapping.get(&key) {
            return Ok((existing, false));
        }

        budget.admit(self.states.len() + 1)?;
        let name = State::set(set.iter().map(|s| self.nfa.state(s).clone()));
        let id = self.states.insert_full(name).0 as StateId;
        if set.intersects(self.nfa.final_states()) {
            self.final_states.insert(id);
        }
        trace!("materialized {:?} as DFA state {id}", key);
        self.state_mapping.insert(key, id);
        Ok((id, true))
    }

    fn sink<B: StateBudget>(&mut self, budget: &B) -> Result<StateId, B::Error> {
        if let Some(sink) = self.sink {
            return Ok(sink);
        }
        budget.admit(self.states.len() + 1)?;
        let sink = self.states.insert_full(State::Sink).0 as StateId;
        self.sink = Some(sink);
        Ok(sink)
    }
}

/// Convert an epsilon-NFA to a DFA using the powerset construction algorithm.
pub(crate) fn subset_construction<B: StateBudget>(nfa: &Nfa, budget: &B) -> Result<Dfa, B::Error> {
    let mut powerset = Powerset {
        nfa,
        state_mapping: IndexMap::new(),
        states: IndexSet::new(),
        final_states: StateSet::with_capacity(16),
        sink: None,
    };
    let mut transitions: HashMap<(StateId, SymbolId), StateId> = HashMap::new();

    // Initial DFA state is the epsilon closure of the NFA start state
    let initial_set =
        nfa.epsilon_closure_of(&StateSet::singleton(nfa.start_id(), nfa.num_states()));
    let (start_state, _) = powerset.intern(&initial_set, budget)?;

    // Queue of DFA states to process (as NFA state sets)
    let mut worklist: Vec<(StateId, StateSet)> = vec![(start_state, initial_set)];

    while let Some((current_dfa_state, current_nfa_set)) = worklist.pop() {
        for symbol in nfa.symbol_ids() {
            // The current set is epsilon-closed, so this is the union of the
            // possible next states of its members.
            let next_nfa_set = nfa.move_on_symbol(&current_nfa_set, symbol);

            let next_dfa_state = if next_nfa_set.is_empty() {
                powerset.sink(budget)?
            } else {
                let (next, fresh) = powerset.intern(&next_nfa_set, budget)?;
                if fresh {
                    worklist.push((next, next_nfa_set));
                }
                next
            };

            transitions.insert((current_dfa_state, symbol), next_dfa_state);
        }
    }

    if let Some(sink) = powerset.sink {
        for symbol in nfa.symbol_ids() {
            transitions.insert((sink, symbol), sink);
        }
    }

    debug!(
        "subset construction: {} NFA states -> {} DFA states",
        nfa.num_states(),
        powerset.states.len()
    );

    Ok(Dfa::from_parts(
        powerset.states,
        nfa.alphabet().clone(),
        start_state,
        powerset.final_states,
        transitions,
    ))
}
