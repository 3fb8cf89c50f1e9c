//! JSON manifest of a resolved registry.
//!
//! The integer handshake value of an opcode is its position in the bracketed opcode
//! space. The manifest spells out that numbering next to each signature for tooling that
//! wants to inspect or diff the registry without parsing generated sources.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::entry::FunctionEntry;
use crate::error::Result;
use crate::pipeline::Resolved;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Manifest {
	pub opcodes: Vec<OpcodeRecord>,
	pub operators: Vec<String>,
	pub aliases: Vec<AliasRecord>,
}

/// One opcode with its ordinal. Sentinels carry no function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OpcodeRecord {
	pub ordinal: usize,
	pub opcode: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub function: Option<FunctionRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FunctionRecord {
	pub name: String,
	pub operator: String,
	pub return_kind: &'static str,
	pub arg_kinds: Vec<&'static str>,
	pub varargs: bool,
	pub backend: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub symbol: Option<String>,
	pub aliases: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AliasRecord {
	pub alias: String,
	pub operator: String,
}

impl Manifest {
	pub fn new(resolved: &Resolved) -> Self {
		let by_opcode: FxHashMap<&str, &FunctionEntry> = resolved
			.registry
			.entries()
			.filter(|e| e.is_assigned())
			.map(|e| (e.opcode(), e))
			.collect();

		let opcodes = resolved
			.opcodes
			.iter()
			.enumerate()
			.map(|(ordinal, opcode)| OpcodeRecord {
				ordinal,
				opcode: opcode.to_string(),
				function: by_opcode.get(opcode).map(|entry| {
					let (args, varargs) = entry.registration_args();
					FunctionRecord {
						name: entry.name.clone(),
						operator: entry.operator(),
						return_kind: entry.return_kind.catalogue_name(),
						arg_kinds: args.iter().map(|k| k.catalogue_name()).collect(),
						varargs,
						backend: entry.backend_reference.clone(),
						symbol: entry.foreign_symbol.clone(),
						aliases: entry.aliases.clone(),
					}
				}),
			})
			.collect();

		Self {
			opcodes,
			operators: resolved.operators.as_slice().to_vec(),
			aliases: resolved
				.aliases
				.iter()
				.map(|(alias, operator)| AliasRecord {
					alias: alias.to_string(),
					operator: operator.to_string(),
				})
				.collect(),
		}
	}

	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalogue::Catalogue;
	use crate::pipeline::resolve;

	const CATALOGUE: &str = r#"
		function "concat" {
			returns "STRING"
			args "STRING" "..."
			backend "StringFunctions::Concat"
			aliases "concat"
		}
		function "concat" {
			returns "STRING"
			args "STRING" "STRING"
			backend "StringFunctions::Concat2"
			aliases "concat" "||"
		}
	"#;

	fn manifest() -> Manifest {
		let catalogue = Catalogue::parse("curated", CATALOGUE).unwrap();
		Manifest::new(&resolve([&catalogue]).unwrap())
	}

	#[test]
	fn ordinals_follow_bracketed_space() {
		let m = manifest();
		let listed: Vec<(usize, &str)> = m.opcodes.iter().map(|r| (r.ordinal, r.opcode.as_str())).collect();
		assert_eq!(listed, [
			(0, "INVALID_OPCODE"),
			(1, "CONCAT_STRINGVALUE_STRINGVALUE"),
			(2, "CONCAT_STRINGVALUE_VARARGS"),
			(3, "LAST_OPCODE")
		]);
		assert!(m.opcodes[0].function.is_none());
		assert!(m.opcodes[3].function.is_none());
	}

	#[test]
	fn records_registration_view() {
		let m = manifest();
		let variadic = m.opcodes[2].function.as_ref().unwrap();
		assert_eq!(variadic.arg_kinds, ["STRING"]);
		assert!(variadic.varargs);
		assert_eq!(variadic.backend, "StringFunctions::Concat");
		assert_eq!(m.operators, ["INVALID_OPERATOR", "CONCAT"]);
		assert_eq!(m.aliases.len(), 2);
		assert_eq!(m.aliases[1].alias, "||");
	}

	#[test]
	fn serializes_to_json() {
		let json: serde_json::Value = serde_json::from_str(&manifest().to_json().unwrap()).unwrap();
		assert_eq!(json["opcodes"][1]["function"]["return_kind"], "STRING");
		assert_eq!(json["opcodes"][2]["function"]["varargs"], true);
		assert!(json["opcodes"][0].get("function").is_none());
		assert!(json["opcodes"][1]["function"].get("symbol").is_none());
		assert_eq!(json["operators"][0], "INVALID_OPERATOR");
	}
}
