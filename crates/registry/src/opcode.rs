//! Opcode assignment.
//!
//! A name with a single signature keeps its normalized name as opcode. Overloaded names
//! are mangled with one token per argument kind, so `ADD(INT, INT)` becomes
//! `ADD_INT_INT`. Return kinds never take part in mangling.
//!
//! The assigned opcodes are sorted and bracketed by [`INVALID_OPCODE`] and
//! [`LAST_OPCODE`], giving consumers a closed range for bounds-checked tables.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::entry::{INVALID_OPCODE, LAST_OPCODE};
use crate::error::{RegistryError, Result};
use crate::kind::ValueKind;
use crate::registry::Registry;

const SENTINEL_OWNER: &str = "<reserved sentinel>";

/// Builds the mangled opcode of one signature within an overloaded set.
pub fn mangle(name: &str, args: &[ValueKind]) -> String {
	let mut opcode = name.to_ascii_uppercase();
	for kind in args {
		opcode.push('_');
		opcode.push_str(&kind.opcode_token());
	}
	opcode
}

/// The sorted, sentinel-bracketed sequence of every opcode of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpcodeSpace {
	opcodes: Vec<String>,
}

#[allow(clippy::len_without_is_empty, reason = "both sentinels are always present")]
impl OpcodeSpace {
	fn bracket(mut assigned: Vec<String>) -> Self {
		assigned.sort();
		let mut opcodes = Vec::with_capacity(assigned.len() + 2);
		opcodes.push(INVALID_OPCODE.to_string());
		opcodes.extend(assigned);
		opcodes.push(LAST_OPCODE.to_string());
		Self { opcodes }
	}

	/// Every opcode including both sentinels.
	pub fn as_slice(&self) -> &[String] {
		&self.opcodes
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.opcodes.iter().map(String::as_str)
	}

	/// Opcodes belonging to real entries, without sentinels.
	pub fn assigned(&self) -> &[String] {
		&self.opcodes[1..self.opcodes.len() - 1]
	}

	/// Total length including both sentinels.
	pub fn len(&self) -> usize {
		self.opcodes.len()
	}

	/// Integer code of `opcode`: its position in the bracketed space.
	pub fn ordinal(&self, opcode: &str) -> Option<usize> {
		match opcode {
			INVALID_OPCODE => Some(0),
			LAST_OPCODE => Some(self.opcodes.len() - 1),
			_ => self
				.assigned()
				.binary_search_by(|candidate| candidate.as_str().cmp(opcode))
				.ok()
				.map(|i| i + 1),
		}
	}
}

/// Assigns an opcode to every entry of `registry` and returns the bracketed space.
///
/// Fails if two signatures produce the same opcode, which happens when overloads differ
/// only in return kind or when a plain name collides with another set's mangled form.
pub fn assign_opcodes(registry: &mut Registry) -> Result<OpcodeSpace> {
	let mut owners: FxHashMap<String, String> = FxHashMap::default();
	for sentinel in [INVALID_OPCODE, LAST_OPCODE] {
		owners.insert(sentinel.to_string(), SENTINEL_OWNER.to_string());
	}

	let mut assigned = Vec::with_capacity(registry.entry_count());
	for set in registry.overload_sets_mut() {
		let overloaded = set.is_overloaded();
		let name = set.name().to_string();
		for entry in set.entries_mut() {
			let opcode = if overloaded {
				mangle(&name, &entry.arg_kinds)
			} else {
				name.clone()
			};

			if let Some(first) = owners.get(&opcode) {
				return Err(RegistryError::OpcodeCollision {
					opcode,
					first: first.clone(),
					second: entry.signature(),
				});
			}
			owners.insert(opcode.clone(), entry.signature());

			entry.set_opcode(opcode.clone());
			assigned.push(opcode);
		}
	}

	let space = OpcodeSpace::bracket(assigned);
	debug!(opcodes = space.assigned().len(), "assigned opcodes");
	Ok(space)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::entry::FunctionEntry;
	use crate::registry::RegistryBuilder;

	fn entry(name: &str, ret: ValueKind, args: Vec<ValueKind>) -> FunctionEntry {
		FunctionEntry::new(name, ret, args, "F::Impl", Vec::new())
	}

	fn registry(entries: Vec<FunctionEntry>) -> Registry {
		let mut builder = RegistryBuilder::new();
		builder.extend(entries);
		builder.build()
	}

	#[test]
	fn single_signature_uses_plain_name() {
		let mut reg = registry(vec![entry("abs", ValueKind::Double, vec![ValueKind::Double])]);
		let space = assign_opcodes(&mut reg).unwrap();

		assert_eq!(reg.entries().next().unwrap().opcode(), "ABS");
		assert_eq!(space.as_slice(), [INVALID_OPCODE, "ABS", LAST_OPCODE]);
	}

	#[test]
	fn overloads_are_mangled_by_argument_kinds() {
		let mut reg = registry(vec![
			entry("ADD", ValueKind::Int, vec![ValueKind::Int, ValueKind::Int]),
			entry("ADD", ValueKind::Double, vec![ValueKind::Double, ValueKind::Double]),
			entry("ADD", ValueKind::BigInt, vec![ValueKind::BigInt, ValueKind::BigInt]),
		]);
		let space = assign_opcodes(&mut reg).unwrap();

		let opcodes: Vec<&str> = reg.entries().map(|e| e.opcode()).collect();
		assert_eq!(opcodes, ["ADD_INT_INT", "ADD_DOUBLE_DOUBLE", "ADD_LONG_LONG"]);
		assert_eq!(space.as_slice(), [
			INVALID_OPCODE,
			"ADD_DOUBLE_DOUBLE",
			"ADD_INT_INT",
			"ADD_LONG_LONG",
			LAST_OPCODE
		]);
	}

	#[test]
	fn variadic_marker_mangles_to_varargs() {
		let mut reg = registry(vec![
			entry("concat", ValueKind::String, vec![ValueKind::String, ValueKind::Variadic]),
			entry("concat", ValueKind::String, vec![ValueKind::String]),
		]);
		assign_opcodes(&mut reg).unwrap();

		let opcodes: Vec<&str> = reg.entries().map(|e| e.opcode()).collect();
		assert_eq!(opcodes, ["CONCAT_STRINGVALUE_VARARGS", "CONCAT_STRINGVALUE"]);
	}

	#[test]
	fn nullary_overload_mangles_to_bare_name() {
		assert_eq!(mangle("now", &[]), "NOW");
		assert_eq!(mangle("now", &[ValueKind::Int]), "NOW_INT");
	}

	#[test]
	fn sentinels_bracket_sorted_space() {
		let mut reg = registry(vec![
			entry("zeta", ValueKind::Int, Vec::new()),
			entry("alpha", ValueKind::Int, Vec::new()),
			entry("mu", ValueKind::Int, Vec::new()),
		]);
		let space = assign_opcodes(&mut reg).unwrap();

		assert_eq!(space.as_slice(), [INVALID_OPCODE, "ALPHA", "MU", "ZETA", LAST_OPCODE]);
		assert_eq!(space.assigned(), ["ALPHA", "MU", "ZETA"]);
		assert_eq!(space.ordinal(INVALID_OPCODE), Some(0));
		assert_eq!(space.ordinal("ALPHA"), Some(1));
		assert_eq!(space.ordinal("ZETA"), Some(3));
		assert_eq!(space.ordinal(LAST_OPCODE), Some(4));
		assert_eq!(space.ordinal("OMEGA"), None);
	}

	#[test]
	fn empty_registry_yields_only_sentinels() {
		let mut reg = Registry::default();
		let space = assign_opcodes(&mut reg).unwrap();
		assert_eq!(space.as_slice(), [INVALID_OPCODE, LAST_OPCODE]);
		assert!(space.assigned().is_empty());
		assert_eq!(space.ordinal(LAST_OPCODE), Some(1));
	}

	#[test]
	fn return_kind_only_overloads_collide() {
		let mut reg = registry(vec![
			entry("cast", ValueKind::Int, vec![ValueKind::String]),
			entry("cast", ValueKind::Double, vec![ValueKind::String]),
		]);
		let err = assign_opcodes(&mut reg).unwrap_err();

		match err {
			RegistryError::OpcodeCollision {
				opcode,
				first,
				second,
			} => {
				assert_eq!(opcode, "CAST_STRINGVALUE");
				assert_eq!(first, "cast(STRING) -> INT");
				assert_eq!(second, "cast(STRING) -> DOUBLE");
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[test]
	fn plain_name_colliding_with_mangled_opcode_is_rejected() {
		let mut reg = registry(vec![
			entry("f", ValueKind::Int, vec![ValueKind::Int]),
			entry("f", ValueKind::Int, vec![ValueKind::Double]),
			entry("f_int", ValueKind::Int, Vec::new()),
		]);
		let err = assign_opcodes(&mut reg).unwrap_err();
		assert!(matches!(err, RegistryError::OpcodeCollision { ref opcode, .. } if opcode == "F_INT"));
	}

	mod props {
		use proptest::prelude::*;

		use super::*;
		use crate::arbitrary::arb_entries;
		use crate::entry::normalize;

		proptest! {
			/// The space is the assigned opcodes, strictly sorted, between the two sentinels.
			#[test]
			fn prop_space_is_bracketed_and_sorted(entries in arb_entries()) {
				let count = entries.len();
				let mut reg = registry(entries);
				let space = assign_opcodes(&mut reg).unwrap();

				prop_assert_eq!(space.len(), count + 2);
				prop_assert_eq!(space.as_slice().first().map(String::as_str), Some(INVALID_OPCODE));
				prop_assert_eq!(space.as_slice().last().map(String::as_str), Some(LAST_OPCODE));
				prop_assert!(space.assigned().windows(2).all(|w| w[0] < w[1]));

				let mut from_entries: Vec<&str> = reg.entries().map(FunctionEntry::opcode).collect();
				from_entries.sort_unstable();
				let assigned: Vec<&str> = space.assigned().iter().map(String::as_str).collect();
				prop_assert_eq!(from_entries, assigned);
			}

			/// Singletons keep their normalized name; overloads append one token per argument.
			#[test]
			fn prop_opcode_follows_overload_arity(entries in arb_entries()) {
				let mut reg = registry(entries);
				assign_opcodes(&mut reg).unwrap();

				for set in reg.overload_sets() {
					for entry in set.entries() {
						let expected = if set.is_overloaded() && !entry.arg_kinds.is_empty() {
							let tokens: Vec<String> = entry.arg_kinds.iter().map(|k| k.opcode_token()).collect();
							format!("{}_{}", normalize(&entry.name), tokens.join("_"))
						} else {
							normalize(&entry.name)
						};
						prop_assert_eq!(entry.opcode(), expected.as_str());
					}
				}
			}

			/// Every opcode's ordinal is its position in the space.
			#[test]
			fn prop_ordinal_matches_position(entries in arb_entries()) {
				let mut reg = registry(entries);
				let space = assign_opcodes(&mut reg).unwrap();
				for (index, opcode) in space.iter().enumerate() {
					prop_assert_eq!(space.ordinal(opcode), Some(index));
				}
			}
		}
	}
}
