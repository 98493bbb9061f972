use rand::Rng;

/// Successor list of a single context key.
///
/// Conceptually, this is a node of the chain whose outgoing edges are all
/// equally likely: a successor is recorded once, however many times it
/// was observed. The key itself is held by the owning `TransitionTable`.
///
/// ## Invariants
/// - No successor appears twice
/// - Successors keep the order in which they were first seen
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Successors {
	units: Vec<String>,
}

impl Successors {
	pub fn units(&self) -> &[String] {
		&self.units
	}

	/// Records `unit` as a successor. Returns `false` if it was already known.
	pub fn add(&mut self, unit: &str) -> bool {
		if self.units.iter().any(|known| known == unit) {
			return false;
		}
		self.units.push(unit.to_owned());
		true
	}

	/// Picks a successor uniformly at random.
	///
	/// Returns `None` if the list is empty.
	pub fn predict<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		if self.units.is_empty() {
			return None;
		}
		let index = rng.random_range(0..self.units.len());
		Some(self.units[index].as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn duplicates_are_recorded_once() {
		let mut successors = Successors::default();
		assert!(successors.add("cat"));
		assert!(successors.add("dog"));
		assert!(!successors.add("cat"));
		assert_eq!(successors.units(), &["cat", "dog"]);
	}

	#[test]
	fn empty_list_predicts_nothing() {
		let mut rng = StdRng::seed_from_u64(1);
		assert_eq!(Successors::default().predict(&mut rng), None);
	}

	#[test]
	fn sampling_reaches_every_successor() {
		let mut successors = Successors::default();
		for unit in ["a", "b", "c"] {
			successors.add(unit);
		}

		let mut rng = StdRng::seed_from_u64(7);
		let mut seen = std::collections::HashSet::new();
		for _ in 0..200 {
			seen.insert(successors.predict(&mut rng).unwrap().to_owned());
		}
		assert_eq!(seen.len(), 3);
	}
}
