use super::successors::Successors;
use crate::error::{BabbleError, Result};
use rand::Rng;
use std::collections::HashMap;

/// Highest context order kept by a chain model.
pub const MAX_ORDER: usize = 3;

/// Transition table of a single context order.
///
/// Maps context keys made of `order` units to their successor lists.
///
/// # Responsibilities
/// - Create entries for context keys on first sight
/// - Record deduplicated successors
/// - Sample a successor of a key
///
/// # Invariants
/// - `1 <= order <= MAX_ORDER`
/// - Every key of `entries` is made of `order` units
/// - `keys` lists every key of `entries` once, in insertion order
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionTable {
	order: usize,
	entries: HashMap<String, Successors>,
	keys: Vec<String>,
}

impl TransitionTable {
	/// Creates an empty table of the given order.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `order` is not in `1..=MAX_ORDER`.
	pub fn new(order: usize) -> Result<Self> {
		if !(1..=MAX_ORDER).contains(&order) {
			return Err(BabbleError::InvalidOrder(order));
		}
		Ok(Self { order, entries: HashMap::new(), keys: Vec::new() })
	}

	pub fn order(&self) -> usize {
		self.order
	}

	/// Makes sure `key` has an entry, possibly with no successor.
	pub(crate) fn ensure(&mut self, key: &str) -> &mut Successors {
		if !self.entries.contains_key(key) {
			self.keys.push(key.to_owned());
		}
		self.entries.entry(key.to_owned()).or_default()
	}

	/// Records `next` as a successor of `key`.
	pub(crate) fn add_transition(&mut self, key: &str, next: &str) {
		self.ensure(key).add(next);
	}

	/// Returns the successors of `key`, or `None` if the key is unknown.
	pub fn get(&self, key: &str) -> Option<&[String]> {
		self.entries.get(key).map(Successors::units)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Keys in the order they were first seen.
	pub fn keys(&self) -> &[String] {
		&self.keys
	}

	pub fn len(&self) -> usize {
		self.keys.len()
	}

	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	/// Total number of recorded (key, successor) pairs.
	pub fn edges(&self) -> usize {
		self.entries.values().map(|successors| successors.units().len()).sum()
	}

	/// Samples a successor of `key`.
	///
	/// Returns `None` if the key is unknown or has no successors.
	pub fn predict<R: Rng>(&self, key: &str, rng: &mut R) -> Option<&str> {
		self.entries.get(key)?.predict(rng)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn order_must_be_in_range() {
		assert!(matches!(TransitionTable::new(0), Err(BabbleError::InvalidOrder(0))));
		assert!(matches!(TransitionTable::new(4), Err(BabbleError::InvalidOrder(4))));
		assert_eq!(TransitionTable::new(3).unwrap().order(), 3);
	}

	#[test]
	fn keeps_first_seen_key_order() {
		let mut table = TransitionTable::new(1).unwrap();
		table.add_transition("b", "x");
		table.ensure("a");
		table.add_transition("b", "y");
		table.add_transition("b", "x");

		assert_eq!(table.keys(), &["b", "a"]);
		assert_eq!(table.get("b").unwrap(), &["x", "y"]);
		assert_eq!(table.get("a").unwrap(), &[] as &[String]);
		assert_eq!(table.edges(), 2);
	}

	#[test]
	fn unknown_or_empty_keys_predict_nothing() {
		let mut table = TransitionTable::new(1).unwrap();
		table.ensure("lonely");
		let mut rng = StdRng::seed_from_u64(3);

		assert_eq!(table.predict("lonely", &mut rng), None);
		assert_eq!(table.predict("missing", &mut rng), None);
	}
}
