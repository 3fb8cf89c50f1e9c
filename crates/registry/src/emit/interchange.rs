//! Interchange-schema opcode enumeration (Thrift IDL).

use std::fmt::{self, Write};

use super::{ArtifactKind, EmitOptions, Emitter, write_preamble};
use crate::pipeline::Resolved;

/// Writes the bracketed opcode space as one enumeration shared by both sides.
pub struct InterchangeEmitter;

impl Emitter for InterchangeEmitter {
	fn kind(&self) -> ArtifactKind {
		ArtifactKind::Interchange
	}

	fn render(&self, resolved: &Resolved, options: &EmitOptions, out: &mut String) -> fmt::Result {
		write_preamble(out, options)?;
		writeln!(out, "namespace cpp {}", options.thrift_cpp_namespace)?;
		writeln!(out, "namespace java {}", options.thrift_java_namespace)?;
		writeln!(out)?;
		writeln!(out, "enum {} {{", options.opcode_enum)?;
		for opcode in resolved.opcodes.iter() {
			writeln!(out, "  {opcode},")?;
		}
		writeln!(out, "}}")
	}
}
