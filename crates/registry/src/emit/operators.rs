//! Frontend operator enumeration (Java).

use std::fmt::{self, Write};

use super::{ArtifactKind, EmitOptions, Emitter, write_package, write_preamble};
use crate::pipeline::Resolved;

pub struct OperatorEnumEmitter;

impl Emitter for OperatorEnumEmitter {
	fn kind(&self) -> ArtifactKind {
		ArtifactKind::Operators
	}

	fn render(&self, resolved: &Resolved, options: &EmitOptions, out: &mut String) -> fmt::Result {
		write_preamble(out, options)?;
		write_package(out, options)?;
		writeln!(out, "public enum {} {{", options.operator_enum)?;
		for operator in resolved.operators.iter() {
			writeln!(out, "  {operator},")?;
		}
		writeln!(out, "}}")
	}
}
