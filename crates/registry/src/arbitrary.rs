//! Proptest strategies for generated catalogues.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use strum::IntoEnumIterator;

use crate::entry::FunctionEntry;
use crate::kind::ValueKind;

/// Names without underscores, so a plain opcode can never equal a mangled one.
const NAMES: [&str; 6] = ["abs", "add", "concat", "lower", "substr", "Trim"];

pub fn arb_kind() -> impl Strategy<Value = ValueKind> {
	let concrete: Vec<ValueKind> = ValueKind::iter().filter(|k| !k.is_variadic()).collect();
	prop::sample::select(concrete)
}

/// Argument lists of up to three kinds, optionally closed by the variadic marker.
pub fn arb_args() -> impl Strategy<Value = Vec<ValueKind>> {
	(prop::collection::vec(arb_kind(), 0..4), any::<bool>()).prop_map(|(mut args, variadic)| {
		if variadic && !args.is_empty() {
			args.push(ValueKind::Variadic);
		}
		args
	})
}

/// Entries whose signatures are distinct within each name, in shuffled declaration order.
pub fn arb_entries() -> impl Strategy<Value = Vec<FunctionEntry>> {
	prop::collection::btree_map(
		prop::sample::select(NAMES.to_vec()),
		(prop::collection::btree_set(arb_args(), 1..4), arb_kind()),
		0..NAMES.len(),
	)
	.prop_map(to_entries)
	.prop_shuffle()
}

fn to_entries(sets: BTreeMap<&str, (BTreeSet<Vec<ValueKind>>, ValueKind)>) -> Vec<FunctionEntry> {
	sets.into_iter()
		.flat_map(|(name, (signatures, ret))| {
			signatures.into_iter().map(move |args| {
				FunctionEntry::new(name, ret, args, format!("Fns::{name}"), vec![name.to_lowercase()])
			})
		})
		.collect()
}
