use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "opreg")]
#[command(about = "Generate the opcode registry shared by frontend and backend")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Directory to start searching for opreg.kdl (defaults to the working directory)
	#[arg(long, short = 'C', value_name = "DIR", global = true)]
	pub root: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short, global = true)]
	pub verbose: bool,

	/// Subcommand to execute (defaults to `generate`).
	#[command(subcommand)]
	pub command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
	/// Check the catalogues and write all four artifacts
	Generate,
	/// Check the catalogues and render the artifacts without writing them
	Check,
	/// Print the opcode space with ordinals
	Opcodes {
		/// Print the full JSON manifest instead
		#[arg(long)]
		json: bool,
	},
}
