//! Subset construction converting an ε-NFA into an equivalent DFA.

use super::{Automaton, StateSet, DFA, NFA};
use indexmap::IndexSet;
use log::{debug, info, trace, warn};
use std::{collections::VecDeque, fmt, hash::Hash};

/// Builds a DFA accepting the same language as `nfa` using the powerset construction.
///
/// Each DFA state is the epsilon-closed set of NFA states it stands for, and is final iff
/// it contains a final NFA state. States are discovered breadth-first from the closure of
/// the NFA's start state, so the DFA lists them in discovery order. An empty successor set
/// yields no transition instead of a trap state; see [`DFA::complete`].
pub fn subset_construction<S, I>(nfa: &NFA<S, I>) -> DFA<StateSet<S>, I>
where
	S: Clone + Ord + Hash + fmt::Debug,
	I: Clone + Eq + Hash + fmt::Debug,
{
	let mut dfa = DFA::new();
	for symbol in nfa.alphabet() {
		dfa.add_symbol(symbol.clone());
	}

	let start = match nfa.start() {
		Some(start) => start,
		None => {
			warn!("subset_construction: NFA has no start state");
			return dfa;
		}
	};

	// every composite state is enqueued at most once
	let mut discovered: IndexSet<StateSet<S>> = IndexSet::new();
	let mut worklist: VecDeque<StateSet<S>> = VecDeque::new();

	debug!("subset_construction: start = {:?}", start);
	dfa.add_state(start.clone(), nfa.accepts(&start));
	dfa.set_start(start.clone());
	discovered.insert(start.clone());
	worklist.push_back(start);

	while let Some(current) = worklist.pop_front() {
		for symbol in nfa.alphabet() {
			let target = nfa.epsilon_closure(&nfa.move_on(&current, symbol));
			if target.is_empty() {
				trace!("subset_construction: {:?} has no move on {:?}", current, symbol);
				continue;
			}

			if !discovered.contains(&target) {
				debug!("subset_construction: discovered {:?}", target);
				dfa.add_state(target.clone(), nfa.accepts(&target));
				discovered.insert(target.clone());
				worklist.push_back(target.clone());
			}

			trace!("subset_construction: {:?} --{:?}--> {:?}", current, symbol, target);
			dfa.insert_transition(&current, symbol.clone(), target);
		}
	}

	info!(
		"subset_construction: {} NFA states -> {} DFA states",
		nfa.len(),
		discovered.len()
	);
	dfa
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Verdict;
	use test_log::test;

	fn set(states: &[&'static str]) -> StateSet<&'static str> {
		states.iter().copied().collect()
	}

	fn chars(input: &str) -> Vec<char> {
		input.chars().collect()
	}

	#[test]
	fn without_epsilon() {
		// states {A, B}, final {B}: A 0 A, A 1 B, B 1 B
		let nfa = NFA::from_transitions(
			"A",
			vec![("A", false), ("B", true)],
			vec![("A", '0', "A"), ("A", '1', "B"), ("B", '1', "B")],
		)
		.unwrap();
		let dfa = subset_construction(&nfa);

		assert_eq!(
			vec![&set(&["A"]), &set(&["B"])],
			dfa.states().collect::<Vec<_>>(),
			"Unexpected composite states"
		);
		assert_eq!(vec![&set(&["B"])], dfa.final_states().collect::<Vec<_>>());
		assert_eq!(Some(&set(&["A"])), dfa.start_state());
		assert_eq!(None, dfa.transition(&set(&["B"]), &'0'), "Empty move produced a transition");

		assert_eq!(Verdict::Rejected, dfa.run(&chars("")));
		assert_eq!(Verdict::Accepted, dfa.run(&chars("1")));
		assert_eq!(Verdict::Accepted, dfa.run(&chars("01")));
		assert_eq!(Verdict::Rejected, dfa.run(&chars("0")));
		assert_eq!(Verdict::Rejected, dfa.run(&chars("10")));
	}

	#[test]
	fn with_epsilon() {
		// A E B, B x C, final {C}
		let mut nfa = NFA::from_states("A", vec![("A", false), ("B", false), ("C", true)]);
		nfa.add_symbol('x');
		nfa.add_epsilon_transition("A", "B").unwrap();
		nfa.add_transition("B", 'x', "C").unwrap();

		assert_eq!(set(&["A", "B"]), nfa.epsilon_closure(&set(&["A"])));

		let dfa = subset_construction(&nfa);
		assert_eq!(Some(&set(&["A", "B"])), dfa.start_state());
		assert_eq!(Some(&set(&["C"])), dfa.transition(&set(&["A", "B"]), &'x'));
		assert!(dfa.is_final(&set(&["C"])));
		assert!(!dfa.is_final(&set(&["A", "B"])));
		assert_eq!(Verdict::Accepted, dfa.run(&chars("x")));
		assert_eq!(Verdict::Rejected, dfa.run(&chars("")));
	}

	#[test]
	fn merged_final_state() {
		// 0 -a-> {1, 2, 3}, only 2 is final
		let nfa = NFA::from_transitions(
			0,
			vec![(0, false), (1, false), (2, true), (3, false)],
			vec![(0, 'a', 1), (0, 'a', 2), (0, 'a', 3), (1, 'b', 3), (2, 'b', 3)],
		)
		.unwrap();
		let dfa = subset_construction(&nfa);

		let merged = StateSet::from(vec![1, 2, 3]);
		assert_eq!(Some(&merged), dfa.transition(&StateSet::singleton(0), &'a'));
		assert!(dfa.is_final(&merged), "Composite state with a final member not final");
		assert!(
			!dfa.is_final(&StateSet::singleton(3)),
			"Composite state without final members final"
		);
		assert_eq!(3, dfa.len());
	}

	#[test]
	fn discovery_order_and_names() {
		// classic (a|b)*abb
		let nfa = NFA::from_transitions(
			0,
			vec![(0, false), (1, false), (2, false), (3, true)],
			vec![(0, 'a', 0), (0, 'b', 0), (0, 'a', 1), (1, 'b', 2), (2, 'b', 3)],
		)
		.unwrap();
		let dfa = subset_construction(&nfa);

		let names: Vec<String> = dfa.states().map(|state| state.to_string()).collect();
		assert_eq!(vec!["{0}", "{0,1}", "{0,2}", "{0,3}"], names);
		assert_eq!(Verdict::Accepted, dfa.run(&chars("babb")));
		assert_eq!(Verdict::Rejected, dfa.run(&chars("abba")));
		assert!(dfa.is_total(), "Unexpected missing transitions");
	}

	#[test]
	fn epsilon_cycle() {
		// 0 E 1, 1 E 0, 1 a 2, 2 E 0, final {2}
		let mut nfa = NFA::from_states(0u8, vec![(0, false), (1, false), (2, true)]);
		nfa.add_epsilon_transition(0, 1).unwrap();
		nfa.add_epsilon_transition(1, 0).unwrap();
		nfa.add_transition(1, 'a', 2).unwrap();
		nfa.add_epsilon_transition(2, 0).unwrap();
		let dfa = subset_construction(&nfa);

		assert_eq!(2, dfa.len());
		assert_eq!(Verdict::Accepted, dfa.run(&chars("aaa")));
		assert_eq!(Verdict::Rejected, dfa.run(&chars("")));
	}

	#[test]
	fn no_start_state() {
		let mut nfa = NFA::<u8, char>::new();
		nfa.add_state(0, true);
		nfa.add_symbol('a');
		let dfa = subset_construction(&nfa);
		assert!(dfa.is_empty());
		assert_eq!(None, dfa.start_state());
		assert!(dfa.alphabet().contains(&'a'), "Alphabet not carried over");
	}

	#[test]
	fn powerset_bound() {
		// the n-th symbol from the end is 'a', a worst case for subset construction
		let n = 4;
		let mut nfa = NFA::from_states(0, (0..=n).map(|id| (id, id == n)));
		nfa.add_transition(0, 'a', 0).unwrap();
		nfa.add_transition(0, 'b', 0).unwrap();
		nfa.add_transition(0, 'a', 1).unwrap();
		for id in 1..n {
			nfa.add_transition(id, 'a', id + 1).unwrap();
			nfa.add_transition(id, 'b', id + 1).unwrap();
		}
		let dfa = subset_construction(&nfa);

		assert!(dfa.len() <= 1 << nfa.len(), "More composite states than subsets");
		assert_eq!(1 << n, dfa.len());
		assert_eq!(Verdict::Accepted, dfa.run(&chars("babbb")));
		assert_eq!(Verdict::Rejected, dfa.run(&chars("bbabb")));
	}
}
