//! opreg command-line entry point.
//!
//! Locates the project's `opreg.kdl`, runs the registry pipeline over the configured
//! catalogues and writes or reports the generated artifacts. Diagnostics go to stderr and
//! any fatal error yields a non-zero exit status.

mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use opreg_config::ProjectConfig;
use opreg_registry::{Manifest, generate, resolve, write_all};
use tracing::info;

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
	let cli = Cli::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if cli.verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::INFO
		})
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let start = match cli.root {
		Some(root) => root,
		None => std::env::current_dir().context("failed to read the working directory")?,
	};
	let config = ProjectConfig::discover(&start)
		.with_context(|| format!("failed to load project config from {}", start.display()))?;
	info!(root = %config.root.display(), "project root");

	match cli.command.unwrap_or(Command::Generate) {
		Command::Generate => run_generate(&config),
		Command::Check => run_check(&config),
		Command::Opcodes { json } => run_opcodes(&config, json),
	}
}

fn run_generate(config: &ProjectConfig) -> Result<()> {
	let catalogues = config.load_catalogues().context("failed to load catalogues")?;
	let generated = generate(&catalogues, &config.emit).context("registry generation failed")?;
	let report = write_all(&config.root, &config.outputs, &generated.artifacts)
		.context("failed to write artifacts")?;

	for path in &report.written {
		println!("wrote {}", display(config, path));
	}
	for path in &report.unchanged {
		println!("unchanged {}", display(config, path));
	}
	println!(
		"{} functions, {} opcodes, {} operators, {} aliases",
		generated.resolved.registry.len(),
		generated.resolved.opcodes.assigned().len(),
		generated.resolved.operators.derived().len(),
		generated.resolved.aliases.len()
	);
	Ok(())
}

fn run_check(config: &ProjectConfig) -> Result<()> {
	let catalogues = config.load_catalogues().context("failed to load catalogues")?;
	let generated = generate(&catalogues, &config.emit).context("registry check failed")?;
	println!(
		"ok: {} signatures across {} catalogues, {} artifacts rendered",
		generated.resolved.registry.entry_count(),
		catalogues.len(),
		generated.artifacts.len()
	);
	Ok(())
}

fn run_opcodes(config: &ProjectConfig, json: bool) -> Result<()> {
	let catalogues = config.load_catalogues().context("failed to load catalogues")?;
	let resolved = resolve(&catalogues).context("registry check failed")?;

	if json {
		println!("{}", Manifest::new(&resolved).to_json()?);
		return Ok(());
	}
	for (ordinal, opcode) in resolved.opcodes.iter().enumerate() {
		println!("{ordinal:>5}  {opcode}");
	}
	Ok(())
}

/// Shows `path` relative to the project root where possible.
fn display(config: &ProjectConfig, path: &Path) -> String {
	path.strip_prefix(&config.root).unwrap_or(path).display().to_string()
}
