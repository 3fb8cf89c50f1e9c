//! Frontend registration table (Java).
//!
//! One `registry.add` call per function entry, in overload set order, then one
//! `registry.addFunctionMapping` call per alias. The routine ANDs every call's result and
//! asserts the total, so a mismatch between this file and the frontend registry fails
//! loudly at startup.

use std::fmt::{self, Write};

use super::{ArtifactKind, EmitOptions, Emitter, quote, write_package, write_preamble};
use crate::entry::FunctionEntry;
use crate::pipeline::Resolved;

pub struct FrontendRegistryEmitter;

impl Emitter for FrontendRegistryEmitter {
	fn kind(&self) -> ArtifactKind {
		ArtifactKind::FrontendRegistry
	}

	fn render(&self, resolved: &Resolved, options: &EmitOptions, out: &mut String) -> fmt::Result {
		write_preamble(out, options)?;
		write_package(out, options)?;

		for import in &options.frontend_imports {
			writeln!(out, "import {import};")?;
		}
		if options.thrift_java_namespace.is_empty() {
			writeln!(out, "import {};", options.opcode_enum)?;
		} else {
			writeln!(
				out,
				"import {}.{};",
				options.thrift_java_namespace, options.opcode_enum
			)?;
		}
		writeln!(out)?;

		writeln!(out, "public class {} {{", options.registry_class)?;
		writeln!(
			out,
			"  public static void InitFunctions({} registry) {{",
			options.registry_type
		)?;
		writeln!(out, "    boolean result = true;")?;
		writeln!(out)?;

		if !resolved.registry.is_empty() {
			for entry in resolved.registry.entries() {
				write_registration(out, entry, options)?;
			}
			writeln!(out)?;
		}

		if !resolved.aliases.is_empty() {
			for (alias, operator) in resolved.aliases.iter() {
				writeln!(
					out,
					"    result &= registry.addFunctionMapping({}, {}.{operator});",
					quote(alias),
					options.operator_enum
				)?;
			}
			writeln!(out)?;
		}

		writeln!(out, "    Preconditions.checkState(result);")?;
		writeln!(out, "  }}")?;
		writeln!(out, "}}")
	}
}

fn write_registration(out: &mut String, entry: &FunctionEntry, options: &EmitOptions) -> fmt::Result {
	let (args, varargs) = entry.registration_args();
	write!(
		out,
		"    result &= registry.add({}, {}.{}, {}.{}, {varargs}, {}.{}",
		entry.is_foreign(),
		options.operator_enum,
		entry.operator(),
		options.opcode_enum,
		entry.opcode(),
		options.column_type,
		entry.return_kind
	)?;
	for kind in args {
		write!(out, ", {}.{kind}", options.column_type)?;
	}
	writeln!(out, ");")
}
