//! Alias consistency checking.
//!
//! Every surface-syntax alias must resolve to exactly one operator. Repeating an alias for
//! the same operator is normal (each overload of a function usually lists the same
//! aliases) and is accepted without a diagnostic.

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, trace};

use crate::error::{RegistryError, Result};
use crate::registry::Registry;

/// Alias string → operator, in first-declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AliasMap {
	map: IndexMap<String, String>,
}

impl AliasMap {
	/// Records `alias → operator`, failing if the alias already names another operator.
	pub fn insert(&mut self, alias: &str, operator: &str) -> Result<()> {
		match self.map.entry(alias.to_string()) {
			Entry::Vacant(v) => {
				v.insert(operator.to_string());
				Ok(())
			}
			Entry::Occupied(o) if o.get() == operator => {
				trace!(alias, operator, "duplicate alias declaration");
				Ok(())
			}
			Entry::Occupied(o) => Err(RegistryError::AliasConflict {
				alias: alias.to_string(),
				existing: o.get().clone(),
				incoming: operator.to_string(),
			}),
		}
	}

	pub fn get(&self, alias: &str) -> Option<&str> {
		self.map.get(alias).map(String::as_str)
	}

	/// `(alias, operator)` pairs in first-declaration order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.map.iter().map(|(a, o)| (a.as_str(), o.as_str()))
	}

	pub fn len(&self) -> usize {
		self.map.len()
	}

	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}
}

/// Builds the global alias map, visiting overload sets and entries in registry order.
pub fn check_aliases(registry: &Registry) -> Result<AliasMap> {
	let mut aliases = AliasMap::default();
	for set in registry.overload_sets() {
		for entry in set.entries() {
			for alias in &entry.aliases {
				aliases.insert(alias, set.name())?;
			}
		}
	}
	debug!(aliases = aliases.len(), "alias map consistent");
	Ok(aliases)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::entry::FunctionEntry;
	use crate::kind::ValueKind;
	use crate::registry::RegistryBuilder;

	fn entry(name: &str, args: Vec<ValueKind>, aliases: &[&str]) -> FunctionEntry {
		FunctionEntry::new(
			name,
			ValueKind::Int,
			args,
			"F::Impl",
			aliases.iter().map(|a| a.to_string()).collect(),
		)
	}

	fn registry(entries: Vec<FunctionEntry>) -> Registry {
		let mut builder = RegistryBuilder::new();
		builder.extend(entries);
		builder.build()
	}

	#[test]
	fn maps_each_alias_to_its_operator() {
		let reg = registry(vec![
			entry("abs", vec![ValueKind::Double], &["abs"]),
			entry("add", vec![ValueKind::Int, ValueKind::Int], &["add", "+"]),
		]);
		let aliases = check_aliases(&reg).unwrap();

		assert_eq!(aliases.get("abs"), Some("ABS"));
		assert_eq!(aliases.get("+"), Some("ADD"));
		assert_eq!(aliases.get("minus"), None);
		let pairs: Vec<_> = aliases.iter().collect();
		assert_eq!(pairs, [("abs", "ABS"), ("add", "ADD"), ("+", "ADD")]);
	}

	#[test]
	fn repeated_alias_on_same_operator_is_accepted() {
		let reg = registry(vec![
			entry("add", vec![ValueKind::Int, ValueKind::Int], &["add", "+"]),
			entry("add", vec![ValueKind::Double, ValueKind::Double], &["+", "add"]),
		]);
		let aliases = check_aliases(&reg).unwrap();
		assert_eq!(aliases.len(), 2);
		let pairs: Vec<_> = aliases.iter().collect();
		assert_eq!(pairs, [("add", "ADD"), ("+", "ADD")]);
	}

	#[test]
	fn alias_on_two_operators_is_fatal() {
		let reg = registry(vec![entry("x", Vec::new(), &["foo"]), entry("y", Vec::new(), &["foo"])]);
		let err = check_aliases(&reg).unwrap_err();

		match &err {
			RegistryError::AliasConflict {
				alias,
				existing,
				incoming,
			} => {
				assert_eq!(alias, "foo");
				assert_eq!(existing, "X");
				assert_eq!(incoming, "Y");
			}
			other => panic!("unexpected error: {other:?}"),
		}
		let message = err.to_string();
		assert!(message.contains("\"foo\" -> X"), "{message}");
		assert!(message.contains("\"foo\" -> Y"), "{message}");
	}

	#[test]
	fn aliases_are_case_sensitive() {
		let reg = registry(vec![entry("x", Vec::new(), &["Foo"]), entry("y", Vec::new(), &["foo"])]);
		let aliases = check_aliases(&reg).unwrap();
		assert_eq!(aliases.get("Foo"), Some("X"));
		assert_eq!(aliases.get("foo"), Some("Y"));
	}
}
