use log::debug;
use std::fmt;
use thiserror::Error;

/// Outcome of running an automaton on a sequence of inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
	Accepted,
	Rejected,
}

impl Verdict {
	pub fn is_accepted(self) -> bool {
		self == Self::Accepted
	}
}

impl From<bool> for Verdict {
	fn from(accepted: bool) -> Self {
		if accepted {
			Self::Accepted
		} else {
			Self::Rejected
		}
	}
}

impl fmt::Display for Verdict {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Accepted => f.write_str("accepted"),
			Self::Rejected => f.write_str("rejected"),
		}
	}
}

/// Trait representing an abstract automaton.
pub trait Automaton<S, I>
where
	Self: Default,
	S: Clone + PartialEq + fmt::Debug,
{
	/// Configuration the automaton is in while reading input.
	type State: Clone;

	/// Creates a new empty automaton.
	fn new() -> Self {
		Self::default()
	}

	/// Creates a new automaton with a given start state.
	fn with_state(id: S, accept: bool) -> Self {
		let mut automaton = Self::new();
		automaton.add_state(id.clone(), accept);
		automaton.set_start(id);
		automaton
	}

	/// Creates a new automaton with a given set of states.
	fn from_states<V>(start: S, states: V) -> Self
	where
		V: IntoIterator<Item = (S, bool)>,
	{
		let mut automaton = Self::new();
		for (id, accept) in states {
			automaton.add_state(id, accept);
		}
		automaton.set_start(start);
		automaton
	}

	/// Creates a new automaton with a given set of states & transitions.
	fn from_transitions<V, T>(
		start: S,
		states: V,
		transitions: T,
	) -> Result<Self, AutomatonError<S>>
	where
		V: IntoIterator<Item = (S, bool)>,
		T: IntoIterator<Item = (S, I, S)>,
	{
		let mut automaton = Self::from_states(start, states);
		for (prev, input, next) in transitions {
			automaton.add_transition(prev, input, next)?;
		}
		Ok(automaton)
	}

	/// Checks whether the states of the automaton includes a state.
	fn has_state(&self, id: &S) -> bool;

	/// Adds a new state to the automaton.
	/// Adding an existing state only updates whether it is accepting.
	fn add_state(&mut self, id: S, accept: bool);

	/// Adds a new transition to the automaton.
	/// Returns an `AutomatonError::InexistentState` error if one of the states is inexistent.
	fn add_transition(&mut self, prev: S, input: I, next: S) -> Result<(), AutomatonError<S>>;

	/// Updates the start state.
	/// If the automaton does not have the passed state, it will have no start state.
	fn set_start(&mut self, id: S);

	/// Gets the configuration the automaton starts in.
	/// Returns None if there is no valid start state.
	fn start(&self) -> Option<Self::State>;

	/// Checks whether a configuration is accepting.
	fn accepts(&self, state: &Self::State) -> bool;

	/// Performs a single state transition.
	/// Returns None if the automaton is stuck.
	fn step(&self, state: &Self::State, input: &I) -> Option<Self::State>;

	/// Runs the automaton on a sequence of inputs.
	/// A missing transition rejects immediately, regardless of the remaining input.
	fn run<'a, V>(&self, inputs: V) -> Verdict
	where
		V: IntoIterator<Item = &'a I>,
		I: 'a,
	{
		let mut current = match self.start() {
			Some(state) => state,
			None => return Verdict::Rejected,
		};
		for (consumed, input) in inputs.into_iter().enumerate() {
			match self.step(&current, input) {
				Some(next) => current = next,
				None => {
					debug!("run: stuck after {} inputs", consumed);
					return Verdict::Rejected;
				}
			}
		}
		Verdict::from(self.accepts(&current))
	}
}

/// Enum representing an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AutomatonError<S>
where
	S: fmt::Debug,
{
	#[error("Inexistent State ID \"{0:?}\"")]
	InexistentState(S),
	#[error("Duplicate State ID \"{0:?}\"")]
	DuplicateState(S),
	#[error("State ID \"{0:?}\" already has a different transition on this input")]
	Nondeterministic(S),
}
