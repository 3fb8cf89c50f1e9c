//! Canonical function entries.

use crate::kind::ValueKind;

/// Leading sentinel of the opcode space; also the opcode of an unassigned entry.
pub const INVALID_OPCODE: &str = "INVALID_OPCODE";
/// Trailing sentinel of the opcode space.
pub const LAST_OPCODE: &str = "LAST_OPCODE";
/// Leading sentinel of the operator list.
pub const INVALID_OPERATOR: &str = "INVALID_OPERATOR";

/// Names a catalogue may never declare, in normalized form.
pub const RESERVED_NAMES: [&str; 3] = [INVALID_OPCODE, LAST_OPCODE, INVALID_OPERATOR];

/// Normalizes a function name for use in generated identifiers.
pub fn normalize(name: &str) -> String {
	name.to_ascii_uppercase()
}

/// One concrete, fully typed signature of a function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionEntry {
	/// Name as declared in the catalogue.
	pub name: String,
	pub return_kind: ValueKind,
	/// Argument kinds in order. Only the last element may be [`ValueKind::Variadic`].
	pub arg_kinds: Vec<ValueKind>,
	/// Native implementation invoked by the backend. Not validated.
	pub backend_reference: String,
	/// Surface-syntax names that resolve to this function's operator.
	pub aliases: Vec<String>,
	/// Externally loadable implementation symbol, for foreign-symbol declarations.
	pub foreign_symbol: Option<String>,
	opcode: Option<String>,
}

impl FunctionEntry {
	pub fn new(
		name: impl Into<String>,
		return_kind: ValueKind,
		arg_kinds: Vec<ValueKind>,
		backend_reference: impl Into<String>,
		aliases: Vec<String>,
	) -> Self {
		Self {
			name: name.into(),
			return_kind,
			arg_kinds,
			backend_reference: backend_reference.into(),
			aliases,
			foreign_symbol: None,
			opcode: None,
		}
	}

	pub fn with_foreign_symbol(mut self, symbol: impl Into<String>) -> Self {
		self.foreign_symbol = Some(symbol.into());
		self
	}

	/// Normalized name, which is also the operator identifier.
	pub fn operator(&self) -> String {
		normalize(&self.name)
	}

	/// Assigned opcode, or [`INVALID_OPCODE`] before assignment.
	pub fn opcode(&self) -> &str {
		self.opcode.as_deref().unwrap_or(INVALID_OPCODE)
	}

	pub fn is_assigned(&self) -> bool {
		self.opcode.is_some()
	}

	pub(crate) fn set_opcode(&mut self, opcode: String) {
		self.opcode = Some(opcode);
	}

	pub fn is_foreign(&self) -> bool {
		self.foreign_symbol.is_some()
	}

	pub fn is_variadic(&self) -> bool {
		self.arg_kinds.last().is_some_and(|kind| kind.is_variadic())
	}

	/// Argument kinds as registered with the frontend: the trailing variadic marker is
	/// stripped and reported through the flag instead.
	pub fn registration_args(&self) -> (&[ValueKind], bool) {
		match self.arg_kinds.split_last() {
			Some((last, rest)) if last.is_variadic() => (rest, true),
			_ => (&self.arg_kinds, false),
		}
	}

	/// Human-readable signature used in diagnostics, e.g. `ADD(INT, INT) -> INT`.
	pub fn signature(&self) -> String {
		let args: Vec<&str> = self.arg_kinds.iter().map(|k| k.catalogue_name()).collect();
		format!("{}({}) -> {}", self.name, args.join(", "), self.return_kind)
	}
}
