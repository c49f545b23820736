//! Product construction over two DFAs, and the boolean combinators built
//! on it.

use crate::dfa::Dfa;
use crate::error::Result;
use crate::limits::{Limits, StateBudget, Unbounded};
use crate::state::{State, StateId, StateSet};
use crate::symbol::{Symbol, SymbolId};
use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};
use std::collections::HashMap;

/// A component of a product state; `None` is the component's implicit sink.
type Component = Option<StateId>;

/// Build the product of `a` and `b`, accepting a pair of states iff
/// `accept(a_accepts, b_accepts)`.
///
/// The result runs over the union of both alphabets and is total: a
/// component without an edge on some symbol moves to its sink, which never
/// accepts. Only pairs reachable from `(a.start, b.start)` are built.
pub fn cross<F>(a: &Dfa, b: &Dfa, accept: F) -> Dfa
where
    F: Fn(bool, bool) -> bool,
{
    let Ok(dfa) = product(a, b, accept, &Unbounded);
    dfa
}

/// Like [`cross`], failing once more than `limits.max_states` pairs would
/// be materialized.
pub fn cross_bounded<F>(a: &Dfa, b: &Dfa, accept: F, limits: &Limits) -> Result<Dfa>
where
    F: Fn(bool, bool) -> bool,
{
    product(a, b, accept, limits)
}

/// Strings accepted by `a` or `b`.
pub fn union(a: &Dfa, b: &Dfa) -> Dfa {
    cross(a, b, |x, y| x || y)
}

/// Strings accepted by both `a` and `b`.
pub fn intersection(a: &Dfa, b: &Dfa) -> Dfa {
    cross(a, b, |x, y| x && y)
}

/// Strings accepted by `a` but not by `b`.
pub fn minus(a: &Dfa, b: &Dfa) -> Dfa {
    cross(a, b, |x, y| x && !y)
}

/// Strings accepted by exactly one of `a` and `b`.
pub fn symmetric_difference(a: &Dfa, b: &Dfa) -> Dfa {
    cross(a, b, |x, y| x != y)
}

/// Whether `a` and `b` accept the same language.
pub fn is_equivalent(a: &Dfa, b: &Dfa) -> bool {
    symmetric_difference(a, b).is_empty()
}

fn product<F, B>(a: &Dfa, b: &Dfa, accept: F, budget: &B) -> std::result::Result<Dfa, B::Error>
where
    F: Fn(bool, bool) -> bool,
    B: StateBudget,
{
    let mut alphabet: IndexSet<Symbol> = a.alphabet().clone();
    alphabet.extend(b.alphabet().iter().cloned());
    // Each combined symbol as seen by either side
    let symbols: Vec<(Option<SymbolId>, Option<SymbolId>)> = alphabet
        .iter()
        .map(|symbol| (a.symbol_id(symbol.as_str()), b.symbol_id(symbol.as_str())))
        .collect();

    let mut state_mapping: IndexMap<(Component, Component), StateId> = IndexMap::new();
    let mut states: IndexSet<State> = IndexSet::new();
    let mut final_states = StateSet::with_capacity(16);
    let mut transitions: HashMap<(StateId, SymbolId), StateId> = HashMap::new();

    let start = (
        component(a, Some(a.start_id())),
        component(b, Some(b.start_id())),
    );
    let (start_state, _) = materialize(a, b, start, &mut state_mapping, &mut states, budget)?;

    // Pairs materialized but not yet explored
    let mut worklist: Vec<((Component, Component), StateId)> = vec![(start, start_state)];

    while let Some(((s1, s2), source)) = worklist.pop() {
        if accept(accepted(a, s1), accepted(b, s2)) {
            final_states.insert(source);
        }
        trace!("product state {} ({s1:?}, {s2:?})", states[source as usize]);

        for (symbol, &(on_a, on_b)) in symbols.iter().enumerate() {
            let next = (
                component(a, advance(a, s1, on_a)),
                component(b, advance(b, s2, on_b)),
            );
            let (dest, fresh) =
                materialize(a, b, next, &mut state_mapping, &mut states, budget)?;
            if fresh {
                worklist.push((next, dest));
            }
            transitions.insert((source, symbol as SymbolId), dest);
        }
    }

    debug!(
        "product of {} x {} states -> {} states",
        a.num_states(),
        b.num_states(),
        states.len()
    );

    Ok(Dfa::from_parts(
        states,
        alphabet,
        start_state,
        final_states,
        transitions,
    ))
}

/// Look up the DFA state for `pair`, allocating it if new. Returns the
/// state and whether it still has to be explored.
fn materialize<B: StateBudget>(
    a: &Dfa,
    b: &Dfa,
    pair: (Component, Component),
    state_mapping: &mut IndexMap<(Component, Component), StateId>,
    states: &mut IndexSet<State>,
    budget: &B,
) -> std::result::Result<(StateId, bool), B::Error> {
    if let Some(&existing) = state_mapping.get(&pair) {
        return Ok((existing, false));
    }
    budget.admit(states.len() + 1)?;
    let name = State::pair(name(a, pair.0), name(b, pair.1));
    let id = states.insert_full(name).0 as StateId;
    state_mapping.insert(pair, id);
    Ok((id, true))
}

/// A dead [`State::Sink`] behaves like the implicit sink; fold it in so
/// both get the same product states. The accepting sink of a complement is
/// kept as an ordinary state.
fn component(dfa: &Dfa, state: Component) -> Component {
    state.filter(|&s| !dfa.is_dead(s))
}

fn advance(dfa: &Dfa, state: Component, symbol: Option<SymbolId>) -> Component {
    dfa.step(state?, symbol?)
}

fn accepted(dfa: &Dfa, state: Component) -> bool {
    state.is_some_and(|s| dfa.is_final(s))
}

fn name(dfa: &Dfa, state: Component) -> State {
    state.map_or(State::Sink, |s| dfa.state(s).clone())
}
