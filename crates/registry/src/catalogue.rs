//! KDL → [`FunctionEntry`] ingestion.
//!
//! A catalogue is an ordered list of `function` declarations. A declaration's fields are
//! its positional name followed by its child nodes:
//!
//! ```kdl
//! function "ADD" {
//!     returns "INT"
//!     args "INT" "INT"
//!     backend "ComputeFunctions::Add_int_int"
//!     aliases "add" "+"
//! }
//! ```
//!
//! Standard declarations carry exactly five fields. Foreign-symbol declarations add a
//! sixth, `symbol`. Anything else is rejected with the literal declaration text.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use kdl::{KdlDocument, KdlNode};
use tracing::debug;

use crate::entry::{FunctionEntry, RESERVED_NAMES, normalize};
use crate::error::{RegistryError, Result};
use crate::kind::ValueKind;

pub const DECLARATION_NODE: &str = "function";
pub const STANDARD_FIELDS: usize = 5;
pub const FOREIGN_SYMBOL_FIELDS: usize = 6;

const RETURNS: &str = "returns";
const ARGS: &str = "args";
const BACKEND: &str = "backend";
const ALIASES: &str = "aliases";
const SYMBOL: &str = "symbol";

/// Function entries read from one declarative source, in source order.
#[derive(Clone, Debug, Default)]
pub struct Catalogue {
	/// Label used in diagnostics (usually the catalogue's configured name).
	pub label: String,
	pub entries: Vec<FunctionEntry>,
}

impl Catalogue {
	/// Parses catalogue text, stopping at the first malformed declaration.
	pub fn parse(label: impl Into<String>, input: &str) -> Result<Self> {
		let label = label.into();
		let doc: KdlDocument = input.parse().map_err(|source| RegistryError::Parse {
			catalogue: label.clone(),
			source,
		})?;

		let entries = doc
			.nodes()
			.iter()
			.map(|node| parse_declaration(&label, node))
			.collect::<Result<Vec<_>>>()?;

		debug!(catalogue = %label, entries = entries.len(), "ingested catalogue");
		Ok(Self { label, entries })
	}

	/// Reads and parses a catalogue file.
	pub fn load(label: impl Into<String>, path: &Path) -> Result<Self> {
		let content = fs::read_to_string(path).map_err(|e| RegistryError::io(path, e))?;
		Self::parse(label, &content)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

fn parse_declaration(catalogue: &str, node: &KdlNode) -> Result<FunctionEntry> {
	let malformed = |reason: String| RegistryError::MalformedDeclaration {
		catalogue: catalogue.to_string(),
		declaration: node.to_string().trim().to_string(),
		reason,
	};

	let node_name = node.name().value();
	if node_name != DECLARATION_NODE {
		return Err(malformed(format!(
			"unexpected node '{node_name}', expected '{DECLARATION_NODE}'"
		)));
	}

	if let Some(prop) = node.entries().iter().find_map(|e| e.name()) {
		return Err(malformed(format!("unexpected property '{}'", prop.value())));
	}

	let fields: &[KdlNode] = node.children().map(|c| c.nodes()).unwrap_or_default();
	let field_count = node.entries().len() + fields.len();
	if field_count != STANDARD_FIELDS && field_count != FOREIGN_SYMBOL_FIELDS {
		return Err(malformed(format!(
			"expected {STANDARD_FIELDS} or {FOREIGN_SYMBOL_FIELDS} fields, found {field_count}"
		)));
	}

	let name = match node.entries() {
		[entry] => entry
			.value()
			.as_string()
			.ok_or_else(|| malformed("name must be a string".into()))?,
		_ => return Err(malformed("expected exactly one name argument".into())),
	};
	validate_name(name).map_err(&malformed)?;

	let mut returns = None;
	let mut args = None;
	let mut backend = None;
	let mut aliases = None;
	let mut symbol = None;

	for field in fields {
		let key = field.name().value();
		let slot = match key {
			RETURNS => &mut returns,
			ARGS => &mut args,
			BACKEND => &mut backend,
			ALIASES => &mut aliases,
			SYMBOL => &mut symbol,
			_ => return Err(malformed(format!("unknown field '{key}'"))),
		};
		if slot.is_some() {
			return Err(malformed(format!("duplicate field '{key}'")));
		}
		*slot = Some(field_values(field).map_err(&malformed)?);
	}

	let returns = require(returns, RETURNS, &malformed)?;
	let args = require(args, ARGS, &malformed)?;
	let backend = require(backend, BACKEND, &malformed)?;
	let aliases = require(aliases, ALIASES, &malformed)?;

	let return_kind = match returns.as_slice() {
		[kind] => parse_kind(kind).map_err(&malformed)?,
		_ => return Err(malformed(format!("'{RETURNS}' takes exactly one value kind"))),
	};
	if return_kind.is_variadic() {
		return Err(malformed("the variadic marker is not a return kind".into()));
	}

	let arg_kinds = args
		.iter()
		.map(|kind| parse_kind(kind))
		.collect::<std::result::Result<Vec<_>, _>>()
		.map_err(&malformed)?;
	if let Some(pos) = arg_kinds.iter().position(|k| k.is_variadic()) {
		if pos + 1 != arg_kinds.len() {
			return Err(malformed("the variadic marker must be the last argument".into()));
		}
		if pos == 0 {
			return Err(malformed("the variadic marker must follow an argument kind".into()));
		}
	}

	let backend_reference = match backend.as_slice() {
		[reference] if !reference.is_empty() => reference.to_string(),
		_ => return Err(malformed(format!("'{BACKEND}' takes exactly one non-empty reference"))),
	};

	let mut entry = FunctionEntry::new(
		name,
		return_kind,
		arg_kinds,
		backend_reference,
		aliases.into_iter().map(String::from).collect(),
	);

	if let Some(symbol) = symbol {
		match symbol.as_slice() {
			[sym] => entry = entry.with_foreign_symbol(*sym),
			_ => return Err(malformed(format!("'{SYMBOL}' takes exactly one symbol"))),
		}
	}

	Ok(entry)
}

fn require<'a>(
	slot: Option<Vec<&'a str>>,
	key: &str,
	malformed: &impl Fn(String) -> RegistryError,
) -> Result<Vec<&'a str>> {
	slot.ok_or_else(|| malformed(format!("missing field '{key}'")))
}

/// Collects the positional string values of a field node.
fn field_values(field: &KdlNode) -> std::result::Result<Vec<&str>, String> {
	let key = field.name().value();
	if field.children().is_some() {
		return Err(format!("field '{key}' must not have children"));
	}
	field
		.entries()
		.iter()
		.map(|e| {
			if e.name().is_some() {
				return Err(format!("field '{key}' takes positional values only"));
			}
			e.value()
				.as_string()
				.ok_or_else(|| format!("field '{key}' takes string values only"))
		})
		.collect()
}

fn parse_kind(raw: &str) -> std::result::Result<ValueKind, String> {
	ValueKind::from_str(raw).map_err(|_| format!("unknown value kind '{raw}'"))
}

fn validate_name(name: &str) -> std::result::Result<(), String> {
	let mut chars = name.chars();
	let Some(first) = chars.next() else {
		return Err("function name is empty".into());
	};
	if !(first.is_ascii_alphabetic() || first == '_')
		|| !chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
	{
		return Err(format!("function name '{name}' is not an identifier"));
	}
	let normalized = normalize(name);
	if RESERVED_NAMES.contains(&normalized.as_str()) {
		return Err(format!("function name '{name}' is reserved"));
	}
	Ok(())
}
