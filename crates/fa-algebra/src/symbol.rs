//! Symbol types for automata transitions.

use std::borrow::Borrow;
use std::fmt;

/// A symbol index into an automaton's alphabet.
pub(crate) type SymbolId = u32;

/// Reserved symbol index marking epsilon (empty) transitions in an NFA table.
pub(crate) const EPSILON: SymbolId = u32::MAX;

/// Check if a symbol index is the epsilon marker.
#[inline]
pub(crate) fn is_epsilon(symbol: SymbolId) -> bool {
    symbol == EPSILON
}

/// The epsilon label, borrowable for the lifetime of any automaton.
pub(crate) static EPSILON_SYMBOL: Symbol = Symbol(String::new());

/// An input token drawn from an automaton's alphabet.
///
/// The empty symbol is reserved for epsilon transitions and never matches
/// input.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol; the empty string is the epsilon label.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// The epsilon label, usable only on NFA edges.
    pub fn epsilon() -> Self {
        Self(String::new())
    }

    /// Whether this is the epsilon label.
    #[inline]
    pub fn is_epsilon(&self) -> bool {
        self.0.is_empty()
    }

    /// The symbol's text, empty for epsilon.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(symbol: &str) -> Self {
        Self::new(symbol)
    }
}

impl From<String> for Symbol {
    fn from(symbol: String) -> Self {
        Self(symbol)
    }
}

impl From<char> for Symbol {
    fn from(symbol: char) -> Self {
        Self(symbol.to_string())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_epsilon() {
            f.write_str("ε")
        } else {
            write!(f, "{:?}", self.0)
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_epsilon() {
            f.write_str("ε")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// Feed each `char` of `input` to `f` as a borrowed `&str` symbol without
/// allocating. Stops and returns `false` as soon as `f` does.
pub(crate) fn for_each_char_symbol(input: &str, mut f: impl FnMut(&str) -> bool) -> bool {
    let mut buf = [0u8; 4];
    input.chars().all(|c| f(c.encode_utf8(&mut buf)))
}
