//! Epsilon-NFA to DFA conversion by subset construction, and DFA simulation.

mod automaton;
mod dfa;
pub mod format;
mod nfa;
mod state_set;
mod subset;

pub use automaton::{Automaton, AutomatonError, Verdict};
pub use dfa::DFA;
pub use nfa::{Label, NFA};
pub use state_set::StateSet;
pub use subset::subset_construction;
