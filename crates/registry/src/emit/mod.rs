//! Artifact emitters.
//!
//! Four independent projections of a [`Resolved`] registry:
//!
//! | Artifact | Consumer | Contents |
//! |----------|----------|----------|
//! | [`ArtifactKind::Interchange`] | both sides | opcode enumeration, sentinel bracketed |
//! | [`ArtifactKind::Operators`] | frontend | operator enumeration |
//! | [`ArtifactKind::FrontendRegistry`] | frontend | signature and alias registration |
//! | [`ArtifactKind::BackendRegistry`] | backend | opcode → native callable dispatch |
//!
//! Emitters render into memory only. [`render_all`] either returns all four artifacts or
//! an error, never a subset.

use std::fmt::{self, Write};
use std::path::PathBuf;

use strum::IntoEnumIterator;
use strum_macros::{EnumIter, IntoStaticStr};
use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::pipeline::Resolved;

mod backend;
mod frontend;
mod interchange;
mod operators;

pub use backend::BackendDispatchEmitter;
pub use frontend::FrontendRegistryEmitter;
pub use interchange::InterchangeEmitter;
pub use operators::OperatorEnumEmitter;

/// Identifies one of the four generated artifacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ArtifactKind {
	Interchange,
	Operators,
	FrontendRegistry,
	BackendRegistry,
}

impl ArtifactKind {
	/// Configuration key and diagnostic name.
	pub fn key(self) -> &'static str {
		self.into()
	}

	/// Output path relative to the project root when none is configured.
	pub fn default_path(self) -> PathBuf {
		PathBuf::from(match self {
			Self::Interchange => "common/thrift/Opcodes.thrift",
			Self::Operators => "fe/generated-sources/opcode/FunctionOperator.java",
			Self::FrontendRegistry => "fe/generated-sources/opcode/FunctionRegistry.java",
			Self::BackendRegistry => "be/generated-sources/opcode/opcode-registry-init.cc",
		})
	}

	/// Bare file name, used when writing into a flat output directory.
	pub fn file_name(self) -> &'static str {
		match self {
			Self::Interchange => "Opcodes.thrift",
			Self::Operators => "FunctionOperator.java",
			Self::FrontendRegistry => "FunctionRegistry.java",
			Self::BackendRegistry => "opcode-registry-init.cc",
		}
	}

	pub fn from_key(key: &str) -> Option<Self> {
		Self::iter().find(|kind| kind.key() == key)
	}
}

impl fmt::Display for ArtifactKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.key())
	}
}

/// One rendered artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
	pub kind: ArtifactKind,
	pub contents: String,
}

/// Names and boilerplate the emitters weave into the generated sources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitOptions {
	/// Lines written as comments at the top of every artifact (e.g. a license notice).
	pub header: Vec<String>,
	pub opcode_enum: String,
	pub operator_enum: String,
	pub registry_class: String,
	/// Type of the registry object handed to the frontend init routine.
	pub registry_type: String,
	pub column_type: String,
	pub java_package: String,
	pub thrift_cpp_namespace: String,
	pub thrift_java_namespace: String,
	/// Extra imports of the frontend registration file. The opcode enum is always imported.
	pub frontend_imports: Vec<String>,
	/// Namespace wrapping the backend init routine; empty for none.
	pub backend_namespace: String,
	pub backend_includes: Vec<String>,
	/// Qualified name of the backend init routine.
	pub backend_init: String,
	/// Native callable type every backend reference is cast to.
	pub compute_fn: String,
	/// Symbol string written for entries without a foreign symbol.
	pub no_symbol: String,
}

impl Default for EmitOptions {
	fn default() -> Self {
		Self {
			header: Vec::new(),
			opcode_enum: "TExprOpcode".into(),
			operator_enum: "FunctionOperator".into(),
			registry_class: "FunctionRegistry".into(),
			registry_type: "OpcodeRegistry".into(),
			column_type: "ColumnType".into(),
			java_package: "frontend.opcode".into(),
			thrift_cpp_namespace: "backend".into(),
			thrift_java_namespace: "frontend.thrift".into(),
			frontend_imports: vec![
				"frontend.analysis.OpcodeRegistry".into(),
				"frontend.analysis.ColumnType".into(),
				"com.google.common.base.Preconditions".into(),
			],
			backend_namespace: "backend".into(),
			backend_includes: vec!["exprs/opcode-registry.h".into(), "exprs/expr.h".into()],
			backend_init: "OpcodeRegistry::Init".into(),
			compute_fn: "Expr::ComputeFn".into(),
			no_symbol: "<no symbol specified>".into(),
		}
	}
}

/// A projection of a resolved registry onto one artifact.
pub trait Emitter {
	fn kind(&self) -> ArtifactKind;

	fn render(&self, resolved: &Resolved, options: &EmitOptions, out: &mut String) -> fmt::Result;
}

/// All emitters, in artifact order.
pub const EMITTERS: [&dyn Emitter; 4] = [
	&InterchangeEmitter,
	&OperatorEnumEmitter,
	&FrontendRegistryEmitter,
	&BackendDispatchEmitter,
];

/// Renders every artifact, or fails without returning any.
pub fn render_all(resolved: &Resolved, options: &EmitOptions) -> Result<Vec<Artifact>> {
	EMITTERS
		.iter()
		.map(|emitter| {
			let kind = emitter.kind();
			let mut contents = String::new();
			emitter
				.render(resolved, options, &mut contents)
				.map_err(|source| RegistryError::Render {
					artifact: kind.key(),
					source,
				})?;
			debug!(artifact = %kind, bytes = contents.len(), "rendered artifact");
			Ok(Artifact { kind, contents })
		})
		.collect()
}

/// Writes the comment header and the generated-file banner.
fn write_preamble(out: &mut String, options: &EmitOptions) -> fmt::Result {
	for value in &options.header {
		for line in header_lines(value) {
			if line.is_empty() {
				writeln!(out, "//")?;
			} else {
				writeln!(out, "// {line}")?;
			}
		}
	}
	if !options.header.is_empty() {
		writeln!(out)?;
	}
	writeln!(out, "// This is a generated file, DO NOT EDIT.")?;
	writeln!(out, "// To add new functions, edit the function catalogues and rerun opreg.")?;
	writeln!(out)
}

/// Splits a header value on every line terminator, so no piece can escape its comment.
fn header_lines(value: &str) -> Vec<&str> {
	if value.is_empty() {
		return vec![""];
	}
	value.lines().flat_map(|line| line.split('\r')).collect()
}

fn write_package(out: &mut String, options: &EmitOptions) -> fmt::Result {
	if options.java_package.is_empty() {
		return Ok(());
	}
	writeln!(out, "package {};", options.java_package)?;
	writeln!(out)
}

/// Quotes `s` as a string literal valid in both Java and C++. Remaining ASCII control
/// characters use three-digit octal escapes, which both languages accept.
fn quote(s: &str) -> String {
	let mut quoted = String::with_capacity(s.len() + 2);
	quoted.push('"');
	for c in s.chars() {
		match c {
			'"' => quoted.push_str("\\\""),
			'\\' => quoted.push_str("\\\\"),
			'\n' => quoted.push_str("\\n"),
			'\r' => quoted.push_str("\\r"),
			'\t' => quoted.push_str("\\t"),
			c if c.is_ascii_control() => quoted.push_str(&format!("\\{:03o}", c as u32)),
			_ => quoted.push(c),
		}
	}
	quoted.push('"');
	quoted
}
