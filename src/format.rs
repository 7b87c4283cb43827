//! Text encoding of automata.
//!
//! An automaton is described by five sections, each introduced by a marker line and always in
//! this order:
//!
//! ```text
//! % Q
//! A
//! B
//! % Sigma
//! 0
//! 1
//! % F
//! B
//! % Q0
//! A
//! % Delta
//! A 0 A
//! A 1 B
//! B E A
//! ```
//!
//! `Q`, `Sigma` and `F` list one state or symbol per line, `Q0` holds exactly one state and every
//! `Delta` line is a `state symbol state` transition. The symbol `E` is reserved for epsilon
//! transitions. Blank lines are ignored.

use super::{Automaton, AutomatonError, Label, DFA, NFA};
use indexmap::IndexSet;
use log::debug;
use std::{
	fmt::{self, Write},
	fs, io,
	path::{Path, PathBuf},
};
use thiserror::Error;

/// Symbol marking an epsilon transition.
pub const EPSILON: &str = "E";

/// Error while reading or decoding an automaton description.
///
/// Every variant except `FileUnreadable` means the description is malformed.
#[derive(Debug, Error)]
pub enum FormatError {
	#[error("the file '{}' could not be opened", .path.display())]
	FileUnreadable {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("missing section marker '% {0}'")]
	MissingSection(&'static str),
	#[error("line {line}: unexpected section marker '{found}'")]
	UnexpectedSection { line: usize, found: String },
	#[error("line {line}: content before the first section marker")]
	OutsideSection { line: usize },
	#[error("line {line}: expected {expected} field(s), found {found}")]
	FieldCount {
		line: usize,
		expected: usize,
		found: usize,
	},
	#[error("the start state section is empty")]
	EmptyStartState,
	#[error("line {line}: more than one start state")]
	MultipleStartStates { line: usize },
	#[error("line {line}: unknown state '{state}'")]
	UnknownState { line: usize, state: String },
	#[error("line {line}: unknown symbol '{symbol}'")]
	UnknownSymbol { line: usize, symbol: String },
	#[error("line {line}: the symbol 'E' is reserved for epsilon transitions")]
	ReservedSymbol { line: usize },
	#[error("line {line}: epsilon transitions are not allowed in a DFA")]
	EpsilonInDfa { line: usize },
	#[error("line {line}: {source}")]
	Automaton {
		line: usize,
		#[source]
		source: AutomatonError<String>,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
	States,
	Alphabet,
	Finals,
	Start,
	Delta,
}

impl Section {
	const ORDER: [Section; 5] = [
		Section::States,
		Section::Alphabet,
		Section::Finals,
		Section::Start,
		Section::Delta,
	];

	fn marker(self) -> &'static str {
		match self {
			Section::States => "Q",
			Section::Alphabet => "Sigma",
			Section::Finals => "F",
			Section::Start => "Q0",
			Section::Delta => "Delta",
		}
	}

	fn from_marker(marker: &str) -> Option<Self> {
		Self::ORDER
			.iter()
			.copied()
			.find(|section| section.marker() == marker)
	}

	fn next(self) -> Option<Self> {
		Self::ORDER.get(self as usize + 1).copied()
	}
}

/// A non-blank line with its 1-based number.
#[derive(Debug)]
struct Line<'a> {
	number: usize,
	tokens: Vec<&'a str>,
}

impl<'a> Line<'a> {
	/// Splits the line into exactly `N` whitespace-separated fields.
	fn fields<const N: usize>(&self) -> Result<[&'a str; N], FormatError> {
		<[&'a str; N]>::try_from(self.tokens.as_slice()).map_err(|_| FormatError::FieldCount {
			line: self.number,
			expected: N,
			found: self.tokens.len(),
		})
	}

	fn single(&self) -> Result<&'a str, FormatError> {
		let [field] = self.fields::<1>()?;
		Ok(field)
	}
}

fn split_sections(text: &str) -> Result<[Vec<Line<'_>>; 5], FormatError> {
	let mut sections: [Vec<Line>; 5] = Default::default();
	let mut current: Option<Section> = None;

	for (index, raw) in text.lines().enumerate() {
		let number = index + 1;
		let line = raw.trim();
		if line.is_empty() {
			continue;
		}

		if let Some(marker) = line.strip_prefix('%') {
			let expected = match current {
				None => Some(Section::States),
				Some(section) => section.next(),
			};
			match Section::from_marker(marker.trim()) {
				Some(section) if Some(section) == expected => current = Some(section),
				_ => {
					return Err(FormatError::UnexpectedSection {
						line: number,
						found: line.to_owned(),
					})
				}
			}
			continue;
		}

		let section = current.ok_or(FormatError::OutsideSection { line: number })?;
		sections[section as usize].push(Line {
			number,
			tokens: line.split_whitespace().collect(),
		});
	}

	match current {
		Some(Section::Delta) => Ok(sections),
		_ => {
			let missing = current.map_or(0, |section| section as usize + 1);
			Err(FormatError::MissingSection(Section::ORDER[missing].marker()))
		}
	}
}

/// Validated contents of a description, borrowing from the source text.
#[derive(Debug)]
struct Description<'a> {
	states: IndexSet<&'a str>,
	alphabet: IndexSet<&'a str>,
	finals: IndexSet<&'a str>,
	start: &'a str,
	/// `(line, source, symbol, destination)`
	delta: Vec<(usize, &'a str, &'a str, &'a str)>,
}

impl<'a> Description<'a> {
	fn parse(text: &'a str) -> Result<Self, FormatError> {
		let [states, alphabet, finals, start, delta] = split_sections(text)?;

		let states = states
			.iter()
			.map(Line::single)
			.collect::<Result<IndexSet<_>, _>>()?;

		let mut symbols = IndexSet::new();
		for line in &alphabet {
			let symbol = line.single()?;
			if symbol == EPSILON {
				return Err(FormatError::ReservedSymbol { line: line.number });
			}
			symbols.insert(symbol);
		}

		let known = |line: &Line, state: &str| {
			if states.contains(state) {
				Ok(())
			} else {
				Err(FormatError::UnknownState {
					line: line.number,
					state: state.to_owned(),
				})
			}
		};

		let mut accepting = IndexSet::new();
		for line in &finals {
			let state = line.single()?;
			known(line, state)?;
			accepting.insert(state);
		}

		let start = match start.as_slice() {
			[] => return Err(FormatError::EmptyStartState),
			[line] => {
				let state = line.single()?;
				known(line, state)?;
				state
			}
			[_, line, ..] => return Err(FormatError::MultipleStartStates { line: line.number }),
		};

		let mut transitions = Vec::with_capacity(delta.len());
		for line in &delta {
			let [prev, symbol, next] = line.fields::<3>()?;
			known(line, prev)?;
			known(line, next)?;
			if symbol != EPSILON && !symbols.contains(symbol) {
				return Err(FormatError::UnknownSymbol {
					line: line.number,
					symbol: symbol.to_owned(),
				});
			}
			transitions.push((line.number, prev, symbol, next));
		}

		debug!(
			"parsed description: {} states, {} symbols, {} transitions",
			states.len(),
			symbols.len(),
			transitions.len()
		);
		Ok(Self {
			states,
			alphabet: symbols,
			finals: accepting,
			start,
			delta: transitions,
		})
	}
}

/// Decodes an ε-NFA. Repeated `(state, symbol)` pairs add nondeterministic choices.
pub fn parse_nfa(text: &str) -> Result<NFA<String, String>, FormatError> {
	let description = Description::parse(text)?;

	let mut nfa = NFA::new();
	for state in &description.states {
		nfa.add_state(state.to_string(), description.finals.contains(state));
	}
	for symbol in &description.alphabet {
		nfa.add_symbol(symbol.to_string());
	}
	nfa.set_start(description.start.to_owned());

	for &(line, prev, symbol, next) in &description.delta {
		let label = if symbol == EPSILON {
			Label::Epsilon
		} else {
			Label::Symbol(symbol.to_owned())
		};
		nfa.add_labeled_transition(prev.to_owned(), label, next.to_owned())
			.map_err(|source| FormatError::Automaton { line, source })?;
	}
	Ok(nfa)
}

/// Decodes a DFA. A `(state, symbol)` pair leading to two different states is rejected.
pub fn parse_dfa(text: &str) -> Result<DFA<String, String>, FormatError> {
	let description = Description::parse(text)?;

	let mut dfa = DFA::new();
	for state in &description.states {
		dfa.add_state(state.to_string(), description.finals.contains(state));
	}
	for symbol in &description.alphabet {
		dfa.add_symbol(symbol.to_string());
	}
	dfa.set_start(description.start.to_owned());

	for &(line, prev, symbol, next) in &description.delta {
		if symbol == EPSILON {
			return Err(FormatError::EpsilonInDfa { line });
		}
		dfa.add_transition(prev.to_owned(), symbol.to_owned(), next.to_owned())
			.map_err(|source| FormatError::Automaton { line, source })?;
	}
	Ok(dfa)
}

/// Encodes a DFA.
///
/// States are listed in the DFA's order, transitions per state in alphabet order. Composite
/// states render as `{n1,n2,...}` through their `Display` implementation.
pub fn write_dfa<W, S, I>(out: &mut W, dfa: &DFA<S, I>) -> fmt::Result
where
	W: Write,
	S: Clone + Eq + std::hash::Hash + fmt::Debug + fmt::Display,
	I: Clone + Eq + std::hash::Hash + fmt::Display,
{
	writeln!(out, "% Q")?;
	for state in dfa.states() {
		writeln!(out, "{}", state)?;
	}
	writeln!(out, "% Sigma")?;
	for symbol in dfa.alphabet() {
		writeln!(out, "{}", symbol)?;
	}
	writeln!(out, "% F")?;
	for state in dfa.final_states() {
		writeln!(out, "{}", state)?;
	}
	writeln!(out, "% Q0")?;
	if let Some(start) = dfa.start_state() {
		writeln!(out, "{}", start)?;
	}
	writeln!(out, "% Delta")?;
	for state in dfa.states() {
		for symbol in dfa.alphabet() {
			if let Some(next) = dfa.transition(state, symbol) {
				writeln!(out, "{} {} {}", state, symbol, next)?;
			}
		}
	}
	Ok(())
}

/// Encodes a DFA into a new string.
pub fn render_dfa<S, I>(dfa: &DFA<S, I>) -> String
where
	S: Clone + Eq + std::hash::Hash + fmt::Debug + fmt::Display,
	I: Clone + Eq + std::hash::Hash + fmt::Display,
{
	let mut out = String::new();
	// writing into a String never fails
	let _ = write_dfa(&mut out, dfa);
	out
}

/// Reads a whole input file.
pub fn read_file<P>(path: P) -> Result<String, FormatError>
where
	P: AsRef<Path>,
{
	let path = path.as_ref();
	fs::read_to_string(path).map_err(|source| FormatError::FileUnreadable {
		path: path.to_owned(),
		source,
	})
}

/// Splits a test string into its symbols, one per character.
pub fn symbols(line: &str) -> Vec<String> {
	line.chars().map(String::from).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{subset_construction, Verdict};

	const SIMPLE: &str = "% Q\nA\nB\n% Sigma\n0\n1\n% F\nB\n% Q0\nA\n% Delta\nA 0 A\nA 1 B\nB 1 B\n";

	const EPSILON_NFA: &str = "
% Q
A
B
C
% Sigma
x
% F
C
% Q0
A
% Delta
A E B
B x C
";

	fn run<S>(dfa: &DFA<S, String>, input: &str) -> Verdict
	where
		S: Clone + Eq + std::hash::Hash + fmt::Debug,
	{
		dfa.run(&symbols(input))
	}

	#[test]
	fn parse_simple_dfa() {
		let dfa = parse_dfa(SIMPLE).unwrap();
		assert_eq!(2, dfa.len());
		assert_eq!(Some(&"A".to_owned()), dfa.start_state());
		assert_eq!(vec!["0", "1"], dfa.alphabet().iter().collect::<Vec<_>>());
		assert_eq!(Verdict::Rejected, run(&dfa, ""));
		assert_eq!(Verdict::Accepted, run(&dfa, "1"));
		assert_eq!(Verdict::Accepted, run(&dfa, "01"));
		assert_eq!(Verdict::Rejected, run(&dfa, "0"));
		assert_eq!(Verdict::Rejected, run(&dfa, "2"), "Symbol outside alphabet accepted");
	}

	#[test]
	fn parse_epsilon_nfa() {
		let nfa = parse_nfa(EPSILON_NFA).unwrap();
		assert_eq!(3, nfa.len());
		assert_eq!(vec!["B"], nfa.epsilon_targets(&"A".to_owned()).collect::<Vec<_>>());
		assert_eq!(vec!["C"], nfa.final_states().collect::<Vec<_>>());

		let dfa = subset_construction(&nfa);
		assert_eq!(Verdict::Accepted, run(&dfa, "x"));
		assert_eq!(Verdict::Rejected, run(&dfa, ""));
	}

	#[test]
	fn render_converted() {
		let nfa = parse_nfa(
			"% Q\nq0\nq1\nq2\n% Sigma\na\nb\n% F\nq2\n% Q0\nq0\n% Delta\nq0 a q0\nq0 a q1\nq0 E q2\nq1 b q2\n",
		)
		.unwrap();
		let text = render_dfa(&subset_construction(&nfa));
		assert_eq!(
			"% Q\n{q0,q2}\n{q0,q1,q2}\n{q2}\n% Sigma\na\nb\n% F\n{q0,q2}\n{q0,q1,q2}\n{q2}\n% Q0\n{q0,q2}\n% Delta\n{q0,q2} a {q0,q1,q2}\n{q0,q1,q2} a {q0,q1,q2}\n{q0,q1,q2} b {q2}\n",
			text
		);

		// the output is itself a valid DFA description
		let dfa = parse_dfa(&text).unwrap();
		assert_eq!(Verdict::Accepted, run(&dfa, "aab"));
		assert_eq!(Verdict::Rejected, run(&dfa, "abb"));
	}

	#[test]
	fn blank_lines_and_spacing() {
		let text = "\n%Q\n  A  \n\n%  Sigma\na\n% F\nA\n% Q0\nA\n% Delta\nA\ta  A\n\n";
		let dfa = parse_dfa(text).unwrap();
		assert_eq!(Verdict::Accepted, run(&dfa, "aaa"));
	}

	#[test]
	fn nondeterministic_dfa() {
		let text = "% Q\nA\nB\n% Sigma\na\n% F\nB\n% Q0\nA\n% Delta\nA a A\nA a B\n";
		match parse_dfa(text) {
			Err(FormatError::Automaton {
				line: 12,
				source: AutomatonError::Nondeterministic(state),
			}) => assert_eq!("A", state),
			other => panic!("Unexpected result {:?}", other),
		}
		assert!(parse_nfa(text).is_ok(), "Nondeterminism rejected in an NFA");
	}

	#[test]
	fn malformed() {
		assert!(matches!(
			parse_nfa("% Q\nA\n% Sigma\n% F\n% Q0\nA\n"),
			Err(FormatError::MissingSection("Delta"))
		));
		assert!(matches!(parse_nfa(""), Err(FormatError::MissingSection("Q"))));
		assert!(matches!(
			parse_nfa("% Q\nA\n% F\n"),
			Err(FormatError::UnexpectedSection { line: 3, .. })
		));
		assert!(matches!(
			parse_nfa("A\n% Q\n"),
			Err(FormatError::OutsideSection { line: 1 })
		));
		assert!(matches!(
			parse_nfa("% Q\nA\n% Sigma\na\n% F\n% Q0\n% Delta\n"),
			Err(FormatError::EmptyStartState)
		));
		assert!(matches!(
			parse_nfa("% Q\nA\nB\n% Sigma\na\n% F\n% Q0\nA\nB\n% Delta\n"),
			Err(FormatError::MultipleStartStates { line: 9 })
		));
		assert!(matches!(
			parse_nfa("% Q\nA\n% Sigma\na\n% F\n% Q0\nA\n% Delta\nA a\n"),
			Err(FormatError::FieldCount {
				line: 9,
				expected: 3,
				found: 2
			})
		));
		assert!(matches!(
			parse_nfa("% Q\nA\n% Sigma\nE\n% F\n% Q0\nA\n% Delta\n"),
			Err(FormatError::ReservedSymbol { line: 4 })
		));
		assert!(matches!(
			parse_nfa("% Q\nA\n% Sigma\na\n% F\nZ\n% Q0\nA\n% Delta\n"),
			Err(FormatError::UnknownState { line: 6, .. })
		));
		assert!(matches!(
			parse_nfa("% Q\nA\n% Sigma\na\n% F\n% Q0\nA\n% Delta\nA b A\n"),
			Err(FormatError::UnknownSymbol { line: 9, .. })
		));
		assert!(matches!(
			parse_dfa("% Q\nA\n% Sigma\na\n% F\n% Q0\nA\n% Delta\nA E A\n"),
			Err(FormatError::EpsilonInDfa { line: 9 })
		));
	}

	#[test]
	fn unreadable_file() {
		let error = read_file("/nonexistent/automaton.txt").unwrap_err();
		assert!(matches!(error, FormatError::FileUnreadable { .. }));
		assert_eq!(
			"the file '/nonexistent/automaton.txt' could not be opened",
			error.to_string()
		);
	}

	#[test]
	fn symbols_per_char() {
		assert_eq!(vec!["0", "1", "1"], symbols("011"));
		assert!(symbols("").is_empty());
	}
}
