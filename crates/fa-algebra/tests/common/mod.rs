#![allow(dead_code)]

use fa_algebra::{Dfa, Nfa};
use quickcheck::{Arbitrary, Gen};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub const BITS: [char; 2] = ['0', '1'];

/// Binary numerals divisible by four.
pub fn divisible_by_4() -> Nfa {
    Nfa::builder("start")
        .add_transitions("start", "", ["zero", "startWith1"])
        .add_transitions("startWith1", '0', ["startWith1", "div2"])
        .add_transition("startWith1", '1', "startWith1")
        .add_transition("div2", '0', "div4")
        .add_transition("zero", '0', "zero")
        .add_final_state("div4")
        .add_final_state("zero")
        .build()
        .unwrap()
}

/// Same language, with epsilon cycles through `start` and `startWith1`.
pub fn divisible_by_4_epsilon_cycles() -> Nfa {
    Nfa::builder("start")
        .add_transitions("start", "", ["zero", "startWith1"])
        .add_transitions("startWith1", '0', ["startWith1", "div2"])
        .add_transition("startWith1", '1', "startWith1")
        .add_epsilon_transition("div2", "startWith1")
        .add_transition("div2", '0', "div4")
        .add_epsilon_transition("zero", "start")
        .add_transition("zero", '0', "zero")
        .add_final_state("div4")
        .add_final_state("zero")
        .build()
        .unwrap()
}

/// A word over {0, 1}.
pub fn word(bits: &[bool]) -> String {
    bits.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}

/// Every word over {0, 1} up to `max_len` symbols.
pub fn all_words(max_len: usize) -> Vec<String> {
    let mut words = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        frontier = frontier
            .iter()
            .flat_map(|prefix| BITS.iter().map(move |bit| format!("{prefix}{bit}")))
            .collect();
        words.extend(frontier.iter().cloned());
    }
    words
}

/// A DFA over {0, 1} with up to six states; some edges are left out.
#[derive(Debug, Clone)]
pub struct RandomDfa(pub Dfa);

impl Arbitrary for RandomDfa {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = usize::from(u8::arbitrary(g) % 6) + 1;
        let mut builder = Dfa::builder("s0");
        for state in 0..n {
            builder.add_state(format!("s{state}"));
            if bool::arbitrary(g) {
                builder.add_final_state(format!("s{state}"));
            }
            for bit in BITS {
                if u8::arbitrary(g) % 5 == 0 {
                    continue;
                }
                let dest = usize::from(u8::arbitrary(g)) % n;
                builder.add_transition(format!("s{state}"), bit, format!("s{dest}"));
            }
        }
        RandomDfa(builder.build().unwrap())
    }
}

/// An NFA over {0, 1} with up to five states and random epsilon edges.
#[derive(Debug, Clone)]
pub struct RandomNfa(pub Nfa);

impl Arbitrary for RandomNfa {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = usize::from(u8::arbitrary(g) % 5) + 1;
        let mut builder = Nfa::builder("n0");
        for state in 0..n {
            builder.add_state(format!("n{state}"));
            if u8::arbitrary(g) % 3 == 0 {
                builder.add_final_state(format!("n{state}"));
            }
            for label in ["0", "1", ""] {
                let dests: Vec<String> = (0..n)
                    .filter(|_| u8::arbitrary(g) % 3 == 0)
                    .map(|dest| format!("n{dest}"))
                    .collect();
                builder.add_transitions(format!("n{state}"), label, dests);
            }
        }
        RandomNfa(builder.build().unwrap())
    }
}
