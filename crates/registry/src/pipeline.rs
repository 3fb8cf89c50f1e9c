//! Phase driver: ingest → build → assign → derive → check → emit.
//!
//! Every phase runs to completion before the next starts, and nothing is rendered unless
//! all checks passed. Writing the rendered artifacts is left to [`crate::output`].

use tracing::info;

use crate::alias::{AliasMap, check_aliases};
use crate::catalogue::Catalogue;
use crate::emit::{Artifact, EmitOptions, render_all};
use crate::error::Result;
use crate::opcode::{OpcodeSpace, assign_opcodes};
use crate::operator::{OperatorList, derive_operators};
use crate::registry::{Registry, RegistryBuilder};

/// The fully checked state of one generation run.
#[derive(Clone, Debug)]
pub struct Resolved {
	pub registry: Registry,
	pub opcodes: OpcodeSpace,
	pub operators: OperatorList,
	pub aliases: AliasMap,
}

/// Resolved state plus the rendered artifacts.
#[derive(Clone, Debug)]
pub struct Generated {
	pub resolved: Resolved,
	pub artifacts: Vec<Artifact>,
}

/// Runs every checking phase over `catalogues`, in the given order.
pub fn resolve<'a, I>(catalogues: I) -> Result<Resolved>
where
	I: IntoIterator<Item = &'a Catalogue>,
{
	let mut registry = RegistryBuilder::new().catalogues(catalogues).build();
	info!(
		functions = registry.len(),
		signatures = registry.entry_count(),
		"built registry"
	);

	let opcodes = assign_opcodes(&mut registry)?;
	let operators = derive_operators(&registry);
	let aliases = check_aliases(&registry)?;

	info!(
		opcodes = opcodes.assigned().len(),
		operators = operators.derived().len(),
		aliases = aliases.len(),
		"registry resolved"
	);
	Ok(Resolved {
		registry,
		opcodes,
		operators,
		aliases,
	})
}

/// Resolves `catalogues` and renders all four artifacts in memory.
pub fn generate<'a, I>(catalogues: I, options: &EmitOptions) -> Result<Generated>
where
	I: IntoIterator<Item = &'a Catalogue>,
{
	let resolved = resolve(catalogues)?;
	let artifacts = render_all(&resolved, options)?;
	Ok(Generated { resolved, artifacts })
}
