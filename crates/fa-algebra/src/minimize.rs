//! DFA minimization by partition refinement (Moore's algorithm).

use crate::dfa::Dfa;
use crate::state::{StateId, StateSet};
use indexmap::IndexSet;
use log::{debug, trace};
use std::collections::HashMap;

/// Assignment of every state to an equivalence class.
///
/// Classes are numbered in order of their first member, so two equal
/// partitions are also equal as values.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partition {
    class_of: Vec<usize>,
    count: usize,
}

impl Partition {
    /// Accepting and non-accepting states; an empty side gets no class.
    fn initial(dfa: &Dfa) -> Self {
        Self::from_signatures(dfa.state_ids().map(|state| vec![usize::from(dfa.is_final(state))]))
    }

    /// Split every class by the classes of its members' successors.
    ///
    /// A state's signature starts with its own class, so classes only ever
    /// split.
    fn refine(&self, table: &[StateId], alphabet_size: usize) -> Self {
        Self::from_signatures(self.class_of.iter().enumerate().map(|(state, &class)| {
            let row = &table[state * alphabet_size..(state + 1) * alphabet_size];
            let mut signature = Vec::with_capacity(alphabet_size + 1);
            signature.push(class);
            signature.extend(row.iter().map(|&next| self.class_of[next as usize]));
            signature
        }))
    }

    fn from_signatures(signatures: impl Iterator<Item = Vec<usize>>) -> Self {
        let mut ids: HashMap<Vec<usize>, usize> = HashMap::new();
        let class_of: Vec<usize> = signatures
            .map(|signature| {
                let next_id = ids.len();
                *ids.entry(signature).or_insert(next_id)
            })
            .collect();
        Self {
            class_of,
            count: ids.len(),
        }
    }

    /// The first (lowest-numbered) member of every class.
    fn representatives(&self) -> Vec<StateId> {
        let mut representatives = Vec::with_capacity(self.count);
        for (state, &class) in self.class_of.iter().enumerate() {
            if class == representatives.len() {
                representatives.push(state as StateId);
            }
        }
        representatives
    }
}

impl Dfa {
    /// Return the minimal DFA accepting the same language.
    ///
    /// Unreachable states are dropped and missing edges are routed to
    /// [`State::Sink`](crate::State::Sink) first, so the result is total.
    /// Each state of the result is named after the first input state of
    /// its class.
    pub fn minimize(&self) -> Dfa {
        let dfa = &self.reachable().complete();
        let alphabet_size = dfa.alphabet().len();

        // Dense successor table, one row per state.
        let table: Vec<StateId> = dfa
            .state_ids()
            .flat_map(|state| {
                dfa.symbol_ids()
                    .map(move |symbol| dfa.step(state, symbol).unwrap_or(state))
            })
            .collect();

        let mut partition = Partition::initial(dfa);
        let mut round = 0;
        loop {
            let refined = partition.refine(&table, alphabet_size);
            round += 1;
            trace!(
                "refinement round {round}: {} -> {} classes",
                partition.count,
                refined.count
            );
            let stable = refined.count == partition.count;
            partition = refined;
            if stable {
                break;
            }
        }

        let representatives = partition.representatives();
        let mut states = IndexSet::with_capacity(partition.count);
        let mut final_states = StateSet::with_capacity(partition.count);
        let mut transitions = HashMap::with_capacity(partition.count * alphabet_size);

        for (class, &representative) in representatives.iter().enumerate() {
            states.insert(dfa.state(representative).clone());
            if dfa.is_final(representative) {
                final_states.insert(class as StateId);
            }
            let row = representative as usize * alphabet_size;
            for (symbol, &next) in dfa.symbol_ids().zip(&table[row..row + alphabet_size]) {
                transitions.insert(
                    (class as StateId, symbol),
                    partition.class_of[next as usize] as StateId,
                );
            }
        }

        debug!(
            "minimized DFA: {} -> {} states in {round} rounds",
            self.num_states(),
            states.len()
        );

        Dfa::from_parts(
            states,
            dfa.alphabet().clone(),
            partition.class_of[dfa.start_id() as usize] as StateId,
            final_states,
            transitions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::State;

    /// "Contains 11" with a duplicated start state and accept sink.
    fn redundant_contains_11() -> Dfa {
        Dfa::builder("a")
            .add_transition("a", '0', "a2")
            .add_transition("a", '1', "b")
            .add_transition("a2", '0', "a")
            .add_transition("a2", '1', "b")
            .add_transition("b", '0', "a2")
            .add_transition("b", '1', "c")
            .add_transition("c", '0', "c2")
            .add_transition("c", '1', "c")
            .add_transition("c2", '0', "c")
            .add_transition("c2", '1', "c2")
            .add_final_state("c")
            .add_final_state("c2")
            .build()
            .unwrap()
    }

    #[test]
    fn test_minimize_contains_11() {
        let dfa = redundant_contains_11();
        let minimized = dfa.minimize();

        assert_eq!(minimized.num_states(), 3);
        assert_eq!(minimized.start_state(), &State::named("a"));
        assert!(minimized.is_total());
        for input in ["", "1", "11", "0110", "1010", "10101", "00111"] {
            assert_eq!(dfa.accepts(input), minimized.accepts(input), "{input}");
        }
        assert_eq!(
            minimized.transition(&"b".into(), "0"),
            Some(&State::named("a"))
        );
    }

    #[test]
    fn test_minimize_idempotent() {
        let once = redundant_contains_11().minimize();
        let twice = once.minimize();
        assert_eq!(once.num_states(), twice.num_states());
        assert_eq!(once.states(), twice.states());
    }

    #[test]
    fn test_minimize_all_accepting() {
        let dfa = Dfa::builder("p")
            .add_transition("p", '0', "q")
            .add_transition("p", '1', "q")
            .add_transition("q", '0', "p")
            .add_transition("q", '1', "p")
            .add_final_state("p")
            .add_final_state("q")
            .build()
            .unwrap();

        let minimized = dfa.minimize();
        assert_eq!(minimized.num_states(), 1);
        assert!(minimized.accepts(""));
        assert!(minimized.accepts("0101"));
    }

    #[test]
    fn test_minimize_nothing_accepting() {
        let dfa = Dfa::builder("p")
            .add_transition("p", '0', "q")
            .add_transition("q", '0', "p")
            .build()
            .unwrap();

        let minimized = dfa.minimize();
        assert_eq!(minimized.num_states(), 1);
        assert!(minimized.is_empty());
    }

    #[test]
    fn test_minimize_partial_and_unreachable() {
        // Only "ab" is accepted; "x" is unreachable.
        let dfa = Dfa::builder("s")
            .add_transition("s", 'a', "t")
            .add_transition("t", 'b', "u")
            .add_transition("x", 'a', "u")
            .add_final_state("u")
            .add_final_state("x")
            .build()
            .unwrap();

        let minimized = dfa.minimize();
        // s, t, u and the sink
        assert_eq!(minimized.num_states(), 4);
        assert!(minimized.states().contains(&State::Sink));
        assert!(!minimized.states().contains(&State::named("x")));
        assert!(minimized.accepts("ab"));
        assert!(!minimized.accepts("a"));
        assert!(!minimized.accepts("aba"));
    }

    #[test]
    fn test_minimize_automaton() {
        //   q0 --0--> q1 ==> q2 (loop)
        //   |
        //   1
        //   v
        //   q3 <-> q4, q3 -> q5, q4 -> q6, q5/q6 -> q7 -1-> q0
        let rows = [
            ("q0", "q1", "q3"),
            ("q1", "q2", "q2"),
            ("q2", "q2", "q2"),
            ("q3", "q5", "q4"),
            ("q4", "q6", "q3"),
            ("q5", "q5", "q7"),
            ("q6", "q6", "q7"),
            ("q7", "q7", "q0"),
        ];
        let mut builder = Dfa::builder("q0");
        for (state, on_0, on_1) in rows {
            builder.add_transition(state, '0', on_0);
            builder.add_transition(state, '1', on_1);
        }
        let dfa = builder
            .add_final_state("q1")
            .add_final_state("q2")
            .build()
            .unwrap();

        let minimized = dfa.minimize();
        assert_eq!(minimized.num_states(), 5);
        let names: Vec<String> = minimized.states().iter().map(State::to_string).collect();
        assert_eq!(names, vec!["q0", "q1", "q3", "q5", "q7"]);
        assert_eq!(
            minimized.transition(&"q3".into(), "1"),
            Some(&State::named("q3"))
        );
    }

    #[test]
    fn test_partition_refine_only_splits() {
        let dfa = &redundant_contains_11();
        let table: Vec<StateId> = dfa
            .state_ids()
            .flat_map(|s| dfa.symbol_ids().map(move |a| dfa.step(s, a).unwrap()))
            .collect();

        let initial = Partition::initial(dfa);
        assert_eq!(initial.count, 2);
        let refined = initial.refine(&table, 2);
        assert_eq!(refined.count, 3);
        assert_eq!(refined.refine(&table, 2), refined);
        for (state, &class) in refined.class_of.iter().enumerate() {
            for (other, &other_class) in refined.class_of.iter().enumerate() {
                if class == other_class {
                    assert_eq!(initial.class_of[state], initial.class_of[other]);
                }
            }
        }
    }
}
