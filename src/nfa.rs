use super::{Automaton, AutomatonError, StateSet};
use indexmap::{IndexMap, IndexSet};
use log::trace;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, hash::Hash};

/// Label of an NFA transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label<I> {
	/// Spontaneous transition, taken without consuming input.
	Epsilon,
	Symbol(I),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct State<S, I>
where
	S: Ord,
	I: Eq + Hash,
{
	accepts: bool,
	transitions: IndexMap<I, BTreeSet<S>>,
	epsilon: BTreeSet<S>,
}

impl<S, I> State<S, I>
where
	S: Ord,
	I: Eq + Hash,
{
	pub fn new(accepts: bool) -> Self {
		Self {
			accepts,
			transitions: IndexMap::new(),
			epsilon: BTreeSet::new(),
		}
	}
}

impl<S, I> Default for State<S, I>
where
	S: Ord,
	I: Eq + Hash,
{
	fn default() -> Self {
		Self::new(false)
	}
}

/// A nondeterministic finite state automaton with epsilon transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NFA<S, I>
where
	S: Clone + Ord + Hash + fmt::Debug,
	I: Clone + Eq + Hash,
{
	start: Option<S>,
	alphabet: IndexSet<I>,
	states: IndexMap<S, State<S, I>>,
}

impl<S, I> Default for NFA<S, I>
where
	S: Clone + Ord + Hash + fmt::Debug,
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

impl<S, I> NFA<S, I>
where
	S: Clone + Ord + Hash + fmt::Debug,
	I: Clone + Eq + Hash,
{
	/// Returns a mutable reference to the requested state or an `AutomatonError::InexistentState` error otherwise.
	fn get_state_mut(&mut self, id: &S) -> Result<&mut State<S, I>, AutomatonError<S>> {
		self.states
			.get_mut(id)
			.ok_or_else(|| AutomatonError::InexistentState(id.clone()))
	}

	/// Adds a symbol to the alphabet, even if no transition reads it.
	/// Returns whether the symbol was new.
	pub fn add_symbol(&mut self, symbol: I) -> bool {
		self.alphabet.insert(symbol)
	}

	/// Alphabet in insertion order, never containing epsilon.
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

	/// Adds an epsilon transition.
	/// Returns an `AutomatonError::InexistentState` error if one of the states is inexistent.
	pub fn add_epsilon_transition(&mut self, prev: S, next: S) -> Result<(), AutomatonError<S>> {
		if !self.has_state(&next) {
			return Err(AutomatonError::InexistentState(next));
		}
		self.get_state_mut(&prev)?.epsilon.insert(next);
		Ok(())
	}

	/// Adds a transition on either epsilon or a symbol.
	pub fn add_labeled_transition(
		&mut self,
		prev: S,
		label: Label<I>,
		next: S,
	) -> Result<(), AutomatonError<S>> {
		match label {
			Label::Epsilon => self.add_epsilon_transition(prev, next),
			Label::Symbol(input) => self.add_transition(prev, input, next),
		}
	}

	/// Destinations of a state on a symbol.
	pub fn targets<'a>(&'a self, id: &S, input: &I) -> impl Iterator<Item = &'a S> {
		self.states
			.get(id)
			.and_then(|state| state.transitions.get(input))
			.into_iter()
			.flatten()
	}

	/// Destinations of a state on epsilon.
	pub fn epsilon_targets<'a>(&'a self, id: &S) -> impl Iterator<Item = &'a S> {
		self.states
			.get(id)
			.into_iter()
			.flat_map(|state| state.epsilon.iter())
	}

	/// Computes every state reachable from `states` through zero or more epsilon transitions.
	///
	/// The result always contains `states` itself. Each state is expanded at most once, so
	/// epsilon cycles terminate.
	pub fn epsilon_closure(&self, states: &StateSet<S>) -> StateSet<S> {
		let mut closure: BTreeSet<S> = states.iter().cloned().collect();
		let mut worklist: Vec<&S> = states.iter().collect();

		while let Some(state) = worklist.pop() {
			for next in self.epsilon_targets(state) {
				if closure.insert(next.clone()) {
					trace!("epsilon_closure: {:?} -> {:?}", state, next);
					worklist.push(next);
				}
			}
		}

		StateSet::from(closure)
	}

	/// Collects the states directly reachable from any of `states` on a symbol.
	/// Does not follow epsilon transitions.
	pub fn move_on(&self, states: &StateSet<S>, input: &I) -> StateSet<S> {
		states
			.iter()
			.flat_map(|state| self.targets(state, input))
			.cloned()
			.collect()
	}
}

impl<S, I> Automaton<S, I> for NFA<S, I>
where
	S: Clone + Ord + Hash + fmt::Debug,
	I: Clone + Eq + Hash,
{
	type State = StateSet<S>;

	fn has_state(&self, id: &S) -> bool {
		self.states.contains_key(id)
	}

	fn add_state(&mut self, id: S, accept: bool) {
		self.states.entry(id).or_default().accepts = accept;
	}

	fn add_transition(&mut self, prev: S, input: I, next: S) -> Result<(), AutomatonError<S>> {
		if !self.has_state(&next) {
			return Err(AutomatonError::InexistentState(next));
		}
		let State { transitions, .. } = self.get_state_mut(&prev)?;
		transitions.entry(input.clone()).or_default().insert(next);
		self.alphabet.insert(input);
		Ok(())
	}

	fn set_start(&mut self, id: S) {
		self.start = if self.has_state(&id) { Some(id) } else { None };
	}

	fn start(&self) -> Option<StateSet<S>> {
		self.start
			.as_ref()
			.map(|start| self.epsilon_closure(&StateSet::singleton(start.clone())))
	}

	fn accepts(&self, state: &StateSet<S>) -> bool {
		state.iter().any(|id| self.is_final(id))
	}

	fn step(&self, state: &StateSet<S>, input: &I) -> Option<StateSet<S>> {
		let next = self.epsilon_closure(&self.move_on(state, input));
		if next.is_empty() {
			None
		} else {
			Some(next)
		}
	}
}
