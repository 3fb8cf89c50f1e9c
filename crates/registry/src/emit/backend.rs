//! Backend dispatch table (C++).

use std::fmt::{self, Write};

use super::{ArtifactKind, EmitOptions, Emitter, quote, write_preamble};
use crate::pipeline::Resolved;

/// Binds every opcode to its native callable and foreign symbol.
pub struct BackendDispatchEmitter;

impl Emitter for BackendDispatchEmitter {
	fn kind(&self) -> ArtifactKind {
		ArtifactKind::BackendRegistry
	}

	fn render(&self, resolved: &Resolved, options: &EmitOptions, out: &mut String) -> fmt::Result {
		write_preamble(out, options)?;

		if !options.backend_includes.is_empty() {
			for include in &options.backend_includes {
				writeln!(out, "#include {}", quote(include))?;
			}
			writeln!(out)?;
		}

		let namespaced = !options.backend_namespace.is_empty();
		if namespaced {
			writeln!(out, "namespace {} {{", options.backend_namespace)?;
			writeln!(out)?;
		}

		writeln!(out, "void {}() {{", options.backend_init)?;
		for entry in resolved.registry.entries() {
			let symbol = entry.foreign_symbol.as_deref().unwrap_or(&options.no_symbol);
			writeln!(
				out,
				"  this->Add({}::{}, (void*)({}){}, {});",
				options.opcode_enum,
				entry.opcode(),
				options.compute_fn,
				entry.backend_reference,
				quote(symbol)
			)?;
		}
		writeln!(out, "}}")?;

		if namespaced {
			writeln!(out)?;
			writeln!(out, "}}")?;
		}
		Ok(())
	}
}
