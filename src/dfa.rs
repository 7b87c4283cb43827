use super::{Automaton, AutomatonError};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::{fmt, hash::Hash};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct State<S, I>
where
	I: Eq + Hash,
{
	accepts: bool,
	transitions: IndexMap<I, S>,
}

impl<S, I> State<S, I>
where
	I: Eq + Hash,
{
	pub fn new(accepts: bool) -> Self {
		Self {
			accepts,
			transitions: IndexMap::new(),
		}
	}
}

impl<S, I> Default for State<S, I>
where
	I: Eq + Hash,
{
	fn default() -> Self {
		Self::new(false)
	}
}

/// A deterministic finite state automaton.
///
/// The transition function is partial: a state may lack a transition on some
/// symbol, in which case a run reading it is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DFA<S, I>
where
	S: Clone + Eq + Hash + fmt::Debug,
	I: Clone + Eq + Hash,
{
	start: Option<S>,
	alphabet: IndexSet<I>,
	states: IndexMap<S, State<S, I>>,
}

impl<S, I> Default for DFA<S, I>
where
	S: Clone + Eq + Hash + fmt::Debug,
	I: Clone + Eq + Hash,
{
	fn default() -> Self {
		Self {
			start: None,
			alphabet: IndexSet::new(),
			states: IndexMap::new(),
		}
	}
}

impl<S, I> DFA<S, I>
where
	S: Clone + Eq + Hash + fmt::Debug,
	I: Clone + Eq + Hash,
{
	/// Records a transition between two known states, replacing any previous one.
	pub(crate) fn insert_transition(&mut self, prev: &S, input: I, next: S) {
		if let Some(State { transitions, .. }) = self.states.get_mut(prev) {
			self.alphabet.insert(input.clone());
			transitions.insert(input, next);
		}
	}

	/// Adds a symbol to the alphabet, even if no transition reads it.
	/// Returns whether the symbol was new.
	pub fn add_symbol(&mut self, symbol: I) -> bool {
		self.alphabet.insert(symbol)
	}

	pub fn alphabet(&self) -> &IndexSet<I> {
		&self.alphabet
	}

	pub fn start_state(&self) -> Option<&S> {
		self.start.as_ref()
	}

	/// Iterates all states in insertion order.
	pub fn states(&self) -> impl Iterator<Item = &S> {
		self.states.keys()
	}

	pub fn final_states(&self) -> impl Iterator<Item = &S> {
		self.states
			.iter()
			.filter(|(_, state)| state.accepts)
			.map(|(id, _)| id)
	}

	pub fn is_final(&self, id: &S) -> bool {
		self.states.get(id).map_or(false, |state| state.accepts)
	}

	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Gets the destination of a state on a symbol, if any.
	pub fn transition(&self, id: &S, input: &I) -> Option<&S> {
		self.states
			.get(id)
			.and_then(|state| state.transitions.get(input))
	}

	/// Iterates all transitions as `(source, symbol, destination)`.
	pub fn transitions(&self) -> impl Iterator<Item = (&S, &I, &S)> {
		self.states.iter().flat_map(|(prev, state)| {
			state
				.transitions
				.iter()
				.map(move |(input, next)| (prev, input, next))
		})
	}

	/// Checks whether every state has a transition on every symbol of the alphabet.
	pub fn is_total(&self) -> bool {
		self.states.values().all(|state| {
			self.alphabet
				.iter()
				.all(|input| state.transitions.contains_key(input))
		})
	}

	/// Returns a total copy of this DFA.
	///
	/// Every missing transition is routed to `trap`, a new non-accepting state looping on
	/// every symbol. A DFA that is already total is returned unchanged. Returns an
	/// `AutomatonError::DuplicateState` error if `trap` is already a state.
	pub fn complete(&self, trap: S) -> Result<Self, AutomatonError<S>> {
		if self.is_total() {
			return Ok(self.clone());
		}
		if self.has_state(&trap) {
			return Err(AutomatonError::DuplicateState(trap));
		}

		let mut dfa = self.clone();
		dfa.add_state(trap.clone(), false);
		for state in dfa.states.values_mut() {
			for input in &dfa.alphabet {
				state
					.transitions
					.entry(input.clone())
					.or_insert_with(|| trap.clone());
			}
		}
		Ok(dfa)
	}

	/// Rebuilds the DFA with every state renamed through `rename`.
	/// `rename` must be injective, otherwise renamed states are merged.
	pub fn map_states<T, F>(&self, mut rename: F) -> DFA<T, I>
	where
		T: Clone + Eq + Hash + fmt::Debug,
		F: FnMut(&S) -> T,
	{
		let names: IndexMap<&S, T> = self.states.keys().map(|id| (id, rename(id))).collect();
		let states = self
			.states
			.values()
			.zip(names.values())
			.map(|(state, name)| {
				let transitions = state
					.transitions
					.iter()
					.filter_map(|(input, next)| Some((input.clone(), names.get(next)?.clone())))
					.collect();
				(
					name.clone(),
					State {
						accepts: state.accepts,
						transitions,
					},
				)
			})
			.collect();
		DFA {
			start: self.start.as_ref().and_then(|start| names.get(start).cloned()),
			alphabet: self.alphabet.clone(),
			states,
		}
	}
}

impl<S, I> Automaton<S, I> for DFA<S, I>
where
	S: Clone + Eq + Hash + fmt::Debug,
	I: Clone + Eq + Hash,
{
	type State = S;

	fn has_state(&self, id: &S) -> bool {
		self.states.contains_key(id)
	}

	fn add_state(&mut self, id: S, accept: bool) {
		self.states.entry(id).or_default().accepts = accept;
	}

	/// Returns an `AutomatonError::Nondeterministic` error if `prev` already moves
	/// somewhere else on `input`.
	fn add_transition(&mut self, prev: S, input: I, next: S) -> Result<(), AutomatonError<S>> {
		if !self.has_state(&next) {
			return Err(AutomatonError::InexistentState(next));
		}
		if !self.has_state(&prev) {
			return Err(AutomatonError::InexistentState(prev));
		}
		match self.transition(&prev, &input) {
			Some(existing) if *existing != next => Err(AutomatonError::Nondeterministic(prev)),
			Some(_) => Ok(()),
			None => {
				self.insert_transition(&prev, input, next);
				Ok(())
			}
		}
	}

	fn set_start(&mut self, id: S) {
		self.start = if self.has_state(&id) { Some(id) } else { None };
	}

	fn start(&self) -> Option<S> {
		self.start.clone()
	}

	fn accepts(&self, state: &S) -> bool {
		self.is_final(state)
	}

	fn step(&self, state: &S, input: &I) -> Option<S> {
		self.transition(state, input)
			.filter(|next| self.has_state(next))
			.cloned()
	}
}
