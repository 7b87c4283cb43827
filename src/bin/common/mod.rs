//! Setup shared by the command-line tools.

use log::SetLoggerError;
use simplelog::LevelFilter;

/// Maps the number of `-v` flags to a log level.
pub fn level(verbose: u8) -> LevelFilter {
	match verbose {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		2 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	}
}

/// Logs to stderr so stdout carries only the tool's output.
pub fn init_logging(verbose: u8) -> Result<(), SetLoggerError> {
	simplelog::TermLogger::init(
		level(verbose),
		simplelog::Config::default(),
		simplelog::TerminalMode::Stderr,
		simplelog::ColorChoice::Auto,
	)
}
