mod common;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use log::info;
use powerset::{format, subset_construction, Automaton, DFA};
use std::{
	fmt,
	hash::Hash,
	io::{self, Write},
	path::PathBuf,
};

/// Runs a DFA on every line of a file and reports whether it is accepted.
#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
	/// DFA description file.
	#[arg(value_name = "AUTOMATON")]
	automaton: PathBuf,

	/// File with one test string per line.
	#[arg(value_name = "STRINGS")]
	strings: PathBuf,

	/// Read the automaton as an epsilon-NFA and convert it before checking.
	#[arg(long)]
	nfa: bool,

	/// Increase logging verbosity (-v, -vv, -vvv).
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,
}

/// Writes `<line> accepted` or `<line> rejected` for every line of `strings`.
fn check<S, W>(dfa: &DFA<S, String>, strings: &str, out: &mut W) -> io::Result<()>
where
	S: Clone + Eq + Hash + fmt::Debug,
	W: Write,
{
	for line in strings.lines() {
		let verdict = dfa.run(&format::symbols(line));
		writeln!(out, "{} {}", line, verdict)?;
	}
	out.flush()
}

fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Cli::parse();

	common::init_logging(args.verbose)?;

	// both files are read and the automaton decoded before anything is printed
	let spec = format::read_file(&args.automaton)?;
	let strings = format::read_file(&args.strings)?;
	let context = || format!("invalid automaton in '{}'", args.automaton.display());

	if args.nfa {
		let nfa = format::parse_nfa(&spec).wrap_err_with(context)?;
		let dfa = subset_construction(&nfa);
		info!("checking with a DFA of {} states", dfa.len());
		check(&dfa, &strings, &mut io::stdout().lock())?;
	} else {
		let dfa = format::parse_dfa(&spec).wrap_err_with(context)?;
		info!("checking with a DFA of {} states", dfa.len());
		check(&dfa, &strings, &mut io::stdout().lock())?;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn report<S>(dfa: &DFA<S, String>, strings: &str) -> String
	where
		S: Clone + Eq + Hash + fmt::Debug,
	{
		let mut out = Vec::new();
		check(dfa, strings, &mut out).unwrap();
		String::from_utf8(out).unwrap()
	}

	#[test]
	fn one_verdict_per_line() {
		let dfa = format::parse_dfa(
			"% Q\nA\nB\n% Sigma\n0\n1\n% F\nB\n% Q0\nA\n% Delta\nA 0 A\nA 1 B\nB 1 B\n",
		)
		.unwrap();
		assert_eq!(
			"01 accepted\n10 rejected\n rejected\n0011 accepted\n2 rejected\n",
			report(&dfa, "01\n10\n\n0011\n2\n")
		);
	}

	#[test]
	fn converted_nfa() {
		let nfa = format::parse_nfa(
			"% Q\nq0\nq1\n% Sigma\na\n% F\nq1\n% Q0\nq0\n% Delta\nq0 E q1\nq1 a q0\n",
		)
		.unwrap();
		let dfa = subset_construction(&nfa);
		assert_eq!(
			" accepted\na accepted\naa accepted\n",
			report(&dfa, "\na\naa")
		);
	}
}
