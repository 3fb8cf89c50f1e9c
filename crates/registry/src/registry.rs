//! Name-keyed aggregation of function entries.
//!
//! Overload sets are kept in first-occurrence order. Catalogues are ingested in their
//! configured order (curated before generated), so that order is the documented contract
//! for which set is visited first when emitting registration records and diagnostics.

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::trace;

use crate::catalogue::Catalogue;
use crate::entry::{FunctionEntry, normalize};

/// All entries sharing one normalized name, in insertion order. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverloadSet {
	name: String,
	entries: Vec<FunctionEntry>,
}

#[allow(clippy::len_without_is_empty, reason = "overload sets are created with their first entry")]
impl OverloadSet {
	/// Normalized name shared by every entry.
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn entries(&self) -> &[FunctionEntry] {
		&self.entries
	}

	pub(crate) fn entries_mut(&mut self) -> &mut [FunctionEntry] {
		&mut self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether this set holds more than one signature and needs mangled opcodes.
	pub fn is_overloaded(&self) -> bool {
		self.entries.len() > 1
	}
}

/// The full `name → overload set` structure of one generation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
	sets: IndexMap<String, OverloadSet>,
}

impl Registry {
	/// Overload sets in first-occurrence order.
	pub fn overload_sets(&self) -> impl Iterator<Item = &OverloadSet> {
		self.sets.values()
	}

	pub(crate) fn overload_sets_mut(&mut self) -> impl Iterator<Item = &mut OverloadSet> {
		self.sets.values_mut()
	}

	/// Looks up a set by name, case-insensitively.
	pub fn get(&self, name: &str) -> Option<&OverloadSet> {
		self.sets.get(&normalize(name))
	}

	/// Distinct normalized names in first-occurrence order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.sets.keys().map(String::as_str)
	}

	/// Every entry, grouped by set, in set order then insertion order.
	pub fn entries(&self) -> impl Iterator<Item = &FunctionEntry> {
		self.sets.values().flat_map(|set| set.entries.iter())
	}

	/// Number of overload sets.
	pub fn len(&self) -> usize {
		self.sets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sets.is_empty()
	}

	pub fn entry_count(&self) -> usize {
		self.sets.values().map(OverloadSet::len).sum()
	}
}

/// Builder for a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
	sets: IndexMap<String, OverloadSet>,
}

impl RegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends one entry, creating its overload set on first occurrence.
	pub fn push(&mut self, entry: FunctionEntry) {
		match self.sets.entry(entry.operator()) {
			Entry::Occupied(mut o) => o.get_mut().entries.push(entry),
			Entry::Vacant(v) => {
				trace!(name = %v.key(), "new overload set");
				let name = v.key().clone();
				v.insert(OverloadSet {
					name,
					entries: vec![entry],
				});
			}
		}
	}

	pub fn extend<I: IntoIterator<Item = FunctionEntry>>(&mut self, entries: I) {
		for entry in entries {
			self.push(entry);
		}
	}

	/// Ingests every catalogue in the given order.
	pub fn catalogues<'a, I: IntoIterator<Item = &'a Catalogue>>(mut self, catalogues: I) -> Self {
		for catalogue in catalogues {
			self.extend(catalogue.entries.iter().cloned());
		}
		self
	}

	pub fn build(self) -> Registry {
		Registry { sets: self.sets }
	}
}
