//! Operator derivation: one identifier per distinct function name, ignoring overloads.

use crate::entry::INVALID_OPERATOR;
use crate::registry::Registry;

/// Sorted operators, with [`INVALID_OPERATOR`] first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorList {
	operators: Vec<String>,
}

#[allow(clippy::len_without_is_empty, reason = "the sentinel is always present")]
impl OperatorList {
	pub fn as_slice(&self) -> &[String] {
		&self.operators
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.operators.iter().map(String::as_str)
	}

	/// Operators derived from real entries, without the sentinel.
	pub fn derived(&self) -> &[String] {
		&self.operators[1..]
	}

	pub fn len(&self) -> usize {
		self.operators.len()
	}

	pub fn contains(&self, operator: &str) -> bool {
		operator == INVALID_OPERATOR
			|| self.derived().binary_search_by(|o| o.as_str().cmp(operator)).is_ok()
	}
}

/// Collapses every overload set into its operator. Output order is alphabetical and
/// independent of declaration order.
pub fn derive_operators(registry: &Registry) -> OperatorList {
	let mut derived: Vec<String> = registry.names().map(String::from).collect();
	derived.sort();

	let mut operators = Vec::with_capacity(derived.len() + 1);
	operators.push(INVALID_OPERATOR.to_string());
	operators.extend(derived);
	OperatorList { operators }
}
