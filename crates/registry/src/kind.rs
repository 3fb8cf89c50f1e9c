//! Type translation table.
//!
//! Maps the abstract value kinds used by catalogues onto the native representation
//! names of the backend. The mapping is a single exhaustive match so adding a kind is a
//! compile-checked, one-place change.

use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Catalogue spelling of the variadic marker.
pub const VARIADIC_MARKER: &str = "...";

/// Abstract kind of a value crossing the frontend/backend boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ValueKind {
	Boolean,
	TinyInt,
	SmallInt,
	Int,
	BigInt,
	Float,
	Double,
	String,
	Timestamp,
	/// One or more of the preceding argument kind. Only valid as the final argument.
	#[strum(serialize = "...")]
	Variadic,
}

impl ValueKind {
	/// Name as written in catalogues and in the frontend column type enum.
	pub fn catalogue_name(self) -> &'static str {
		self.into()
	}

	/// Name of the in-memory representation used by the backend.
	pub fn native_name(self) -> &'static str {
		match self {
			Self::Boolean => "bool",
			Self::TinyInt => "char",
			Self::SmallInt => "short",
			Self::Int => "int",
			Self::BigInt => "long",
			Self::Float => "float",
			Self::Double => "double",
			Self::String => "StringValue",
			Self::Timestamp => "TimestampValue",
			Self::Variadic => "varargs",
		}
	}

	/// Token appended to a mangled opcode for an argument of this kind.
	pub fn opcode_token(self) -> String {
		self.native_name().to_ascii_uppercase()
	}

	pub fn is_variadic(self) -> bool {
		matches!(self, Self::Variadic)
	}
}

impl std::fmt::Display for ValueKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.catalogue_name())
	}
}
