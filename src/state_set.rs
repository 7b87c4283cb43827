use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{collections::BTreeSet, fmt, iter::FromIterator, slice};

/// An ordered, duplicate-free set of states.
///
/// The states are sorted and deduplicated once on creation, so two sets are
/// equal iff they hold the same states, independent of the order they were
/// collected in. This is the identity of a composite DFA state.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateSet<S> {
	states: Vec<S>,
}

impl<S> StateSet<S> {
	/// Creates a new empty set.
	pub fn new() -> Self {
		Self { states: Vec::new() }
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	pub fn len(&self) -> usize {
		self.states.len()
	}

	/// Iterates the states in ascending order.
	pub fn iter(&self) -> slice::Iter<'_, S> {
		self.states.iter()
	}

	pub fn as_slice(&self) -> &[S] {
		&self.states
	}
}

impl<S> StateSet<S>
where
	S: Ord,
{
	/// Creates a set holding a single state.
	pub fn singleton(state: S) -> Self {
		Self {
			states: vec![state],
		}
	}

	pub fn contains(&self, state: &S) -> bool {
		self.states.binary_search(state).is_ok()
	}

	/// Inserts a state, keeping the set canonical.
	/// Returns whether the state was newly inserted.
	pub fn insert(&mut self, state: S) -> bool {
		match self.states.binary_search(&state) {
			Ok(_) => false,
			Err(index) => {
				self.states.insert(index, state);
				true
			}
		}
	}

	pub fn is_subset(&self, other: &Self) -> bool {
		self.states.iter().all(|state| other.contains(state))
	}
}

impl<S> Default for StateSet<S> {
	fn default() -> Self {
		Self::new()
	}
}

impl<S> FromIterator<S> for StateSet<S>
where
	S: Ord,
{
	fn from_iter<T>(iter: T) -> Self
	where
		T: IntoIterator<Item = S>,
	{
		let mut states: Vec<S> = iter.into_iter().collect();
		states.sort_unstable();
		states.dedup();
		Self { states }
	}
}

impl<S> From<Vec<S>> for StateSet<S>
where
	S: Ord,
{
	fn from(states: Vec<S>) -> Self {
		states.into_iter().collect()
	}
}

impl<S> From<BTreeSet<S>> for StateSet<S> {
	fn from(states: BTreeSet<S>) -> Self {
		// already sorted & unique
		Self {
			states: states.into_iter().collect(),
		}
	}
}

impl<S> IntoIterator for StateSet<S> {
	type Item = S;
	type IntoIter = std::vec::IntoIter<S>;

	fn into_iter(self) -> Self::IntoIter {
		self.states.into_iter()
	}
}

impl<'a, S> IntoIterator for &'a StateSet<S> {
	type Item = &'a S;
	type IntoIter = slice::Iter<'a, S>;

	fn into_iter(self) -> Self::IntoIter {
		self.states.iter()
	}
}

/// Renders the set as `{n1,n2,...}`.
impl<S> fmt::Display for StateSet<S>
where
	S: fmt::Display,
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("{")?;
		for (index, state) in self.states.iter().enumerate() {
			if index > 0 {
				f.write_str(",")?;
			}
			write!(f, "{}", state)?;
		}
		f.write_str("}")
	}
}

impl<S> fmt::Debug for StateSet<S>
where
	S: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_set().entries(self.states.iter()).finish()
	}
}

impl<S> Serialize for StateSet<S>
where
	S: Serialize,
{
	fn serialize<Z>(&self, serializer: Z) -> Result<Z::Ok, Z::Error>
	where
		Z: Serializer,
	{
		self.states.serialize(serializer)
	}
}

impl<'de, S> Deserialize<'de> for StateSet<S>
where
	S: Deserialize<'de> + Ord,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Vec::deserialize(deserializer).map(Self::from)
	}
}
