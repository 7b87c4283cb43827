mod common;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::WrapErr;
use log::info;
use powerset::{format, subset_construction, StateSet};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
	/// Automaton text format.
	Text,
	/// YAML dump of the DFA model.
	Yaml,
}

/// Converts an epsilon-NFA into an equivalent DFA and prints it.
#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
	/// NFA description file.
	#[arg(value_name = "FILE")]
	nfa: PathBuf,

	/// Route missing transitions to an explicit trap state `{}`.
	#[arg(long)]
	complete: bool,

	/// Output encoding.
	#[arg(long, value_enum, default_value_t = Output::Text)]
	output: Output,

	/// Increase logging verbosity (-v, -vv, -vvv).
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,
}

fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Cli::parse();

	common::init_logging(args.verbose)?;

	let text = format::read_file(&args.nfa)?;
	let nfa = format::parse_nfa(&text)
		.wrap_err_with(|| format!("invalid NFA in '{}'", args.nfa.display()))?;
	info!(
		"loaded NFA with {} states over {} symbols",
		nfa.len(),
		nfa.alphabet().len()
	);

	let mut dfa = subset_construction(&nfa);
	if args.complete {
		dfa = dfa.complete(StateSet::new())?;
	}

	match args.output {
		Output::Text => print!("{}", format::render_dfa(&dfa)),
		Output::Yaml => {
			let named = dfa.map_states(|state| state.to_string());
			print!("{}", serde_yaml::to_string(&named)?);
		}
	}

	Ok(())
}
