use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::lookback::Lookback;
use super::punctuation::Punctuation;
use super::transition_table::{MAX_ORDER, TransitionTable};
use crate::corpus::Corpus;
use crate::error::{BabbleError, Result};

/// Summary of a built model, suitable for reporting.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ModelStats {
	/// Name of the corpus the model was built from.
	pub corpus: String,
	/// Number of tokens consumed by the builder.
	pub tokens: usize,
	/// Number of context keys, per order (index 0 is order 1).
	pub keys: Vec<usize>,
	/// Number of (key, successor) pairs, per order.
	pub edges: Vec<usize>,
}

/// Word-level Markov chain over context orders 1 to `MAX_ORDER`.
///
/// This struct manages:
/// - `tables`: one `TransitionTable` per order, index 0 holding order 1.
/// - `punctuation`: the rules used to split tokens into units.
/// - `starts`: terminal marks that have at least one successor, used to
///   start sentences.
///
/// The model is filled once by `build` and only read afterwards; no method
/// takes `&mut self`, so a model can be shared between threads.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainModel {
	name: String,
	punctuation: Punctuation,
	tables: Vec<TransitionTable>,
	starts: Vec<String>,
	tokens: usize,
}

impl ChainModel {
	/// Builds a model from tokens in reading order.
	///
	/// # Behavior
	/// - Seeds an empty order-1 entry for every punctuation mark.
	/// - Splits each token into its clean form and trailing mark (when it
	///   has one) and walks the resulting units once.
	/// - Every unit gets an order-1 entry. Each unit but the last is recorded
	///   as the successor of the one, two and three unit contexts ending
	///   with the unit before it, as far as the lookback window allows.
	/// - Duplicated successors are recorded once.
	///
	/// # Errors
	/// Returns `EmptyCorpus` if `tokens` yields no non-empty token.
	pub fn build<I, S>(name: &str, tokens: I, punctuation: Punctuation) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut tables = (1..=MAX_ORDER)
			.map(TransitionTable::new)
			.collect::<Result<Vec<_>>>()?;

		for mark in punctuation.marks() {
			tables[0].ensure(&mark.to_string());
		}

		let mut token_count = 0;
		{
			let mut units = tokens
				.into_iter()
				.flat_map(|token| {
					let units = Self::split_units(&punctuation, token.as_ref());
					if !units.is_empty() {
						token_count += 1;
					}
					units
				})
				.peekable();

			let mut lookback = Lookback::default();
			while let Some(unit) = units.next() {
				tables[0].ensure(&unit);

				// The last unit of the corpus has no successor
				if let Some(next) = units.peek() {
					for (order, key) in lookback.context_keys(&unit) {
						tables[order - 1].add_transition(&key, next);
					}
				}

				lookback.advance(&unit);
			}
		}

		if token_count == 0 {
			return Err(BabbleError::EmptyCorpus(name.to_owned()));
		}

		let starts = punctuation
			.terminal()
			.iter()
			.map(char::to_string)
			.filter(|mark| tables[0].get(mark).is_some_and(|successors| !successors.is_empty()))
			.collect();

		let model = Self { name: name.to_owned(), punctuation, tables, starts, tokens: token_count };
		info!(
			"Built chain model '{}' from {} tokens ({} keys)",
			model.name,
			model.tokens,
			model.tables.iter().map(TransitionTable::len).sum::<usize>()
		);
		Ok(model)
	}

	/// Builds a model from a loaded corpus, using the default punctuation.
	pub fn from_corpus(corpus: &Corpus) -> Result<Self> {
		Self::build(corpus.name(), corpus.tokens(), Punctuation::default())
	}

	/// Splits a token into its units: the clean token, then its mark.
	///
	/// A token that is only a mark yields the mark alone.
	fn split_units(punctuation: &Punctuation, token: &str) -> Vec<String> {
		let (clean, mark) = punctuation.split(token);
		let mut units = Vec::with_capacity(2);
		if !clean.is_empty() {
			units.push(clean.to_owned());
		}
		if let Some(mark) = mark {
			units.push(mark.to_string());
		}
		units
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn punctuation(&self) -> &Punctuation {
		&self.punctuation
	}

	/// Returns the table of the given order, `None` outside `1..=MAX_ORDER`.
	pub fn table(&self, order: usize) -> Option<&TransitionTable> {
		order.checked_sub(1).and_then(|index| self.tables.get(index))
	}

	/// Terminal marks a sentence can start after.
	pub fn sentence_starts(&self) -> &[String] {
		&self.starts
	}

	pub fn stats(&self) -> ModelStats {
		ModelStats {
			corpus: self.name.clone(),
			tokens: self.tokens,
			keys: self.tables.iter().map(TransitionTable::len).collect(),
			edges: self.tables.iter().map(TransitionTable::edges).collect(),
		}
	}

	/// Samples the successor of `current`, preferring the longest context.
	///
	/// Tries the order-3 key, then order-2, then order-1; a key that is
	/// unknown or has no successor falls through to the next one.
	/// Returns `None` when no order has data.
	pub(crate) fn predict<R: Rng>(&self, lookback: &Lookback, current: &str, rng: &mut R) -> Option<&str> {
		lookback
			.context_keys(current)
			.into_iter()
			.find_map(|(order, key)| self.tables[order - 1].predict(&key, rng))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn build(text: &str) -> ChainModel {
		ChainModel::build("test", text.split_whitespace(), Punctuation::default()).unwrap()
	}

	#[test]
	fn punctuation_keys_exist_up_front() {
		let model = build("hello");
		let table = model.table(1).unwrap();
		for mark in [",", ";", ".", "?", "!"] {
			assert!(table.contains(mark), "missing {mark}");
		}
		assert_eq!(table.keys()[..5], [",", ";", ".", "?", "!"]);
	}

	#[test]
	fn marks_are_split_from_words() {
		let model = build("It rained, then stopped. It");
		let table = model.table(1).unwrap();

		assert_eq!(table.get("rained").unwrap(), &[","]);
		assert_eq!(table.get(",").unwrap(), &["then"]);
		assert_eq!(table.get("stopped").unwrap(), &["."]);
		assert_eq!(table.get(".").unwrap(), &["It"]);
		assert!(!table.contains("rained,"));
	}

	#[test]
	fn final_token_has_empty_entry() {
		let model = build("one two three");
		assert_eq!(model.table(1).unwrap().get("three").unwrap(), &[] as &[String]);
	}

	#[test]
	fn successors_are_deduplicated() {
		let model = build("a b a b a c");
		assert_eq!(model.table(1).unwrap().get("a").unwrap(), &["b", "c"]);
		assert_eq!(model.table(2).unwrap().get("b a").unwrap(), &["b", "c"]);
	}

	#[test]
	fn higher_orders_follow_the_unit_stream() {
		let model = build("A B C . A B D .");

		let order2 = model.table(2).unwrap();
		assert_eq!(order2.get("A B").unwrap(), &["C", "D"]);
		assert_eq!(order2.get(". A").unwrap(), &["B"]);

		let order3 = model.table(3).unwrap();
		assert_eq!(order3.get("A B C").unwrap(), &["."]);
		assert_eq!(order3.get(". A B").unwrap(), &["D"]);
		assert_eq!(order3.get("B D .").unwrap_or_default(), &[] as &[String]);
	}

	#[test]
	fn abbreviations_stay_whole() {
		let model = build("Mr. Holmes smiled.");
		let table = model.table(1).unwrap();

		assert_eq!(table.get("Mr.").unwrap(), &["Holmes"]);
		assert!(!table.contains("Mr"));
		assert_eq!(table.get(".").unwrap(), &[] as &[String]);
	}

	#[test]
	fn sentence_starts_need_successors() {
		let model = build("Go. Stop! Wait");
		assert_eq!(model.sentence_starts(), &[".", "!"]);
	}

	#[test]
	fn empty_input_fails() {
		let err = ChainModel::build("none", Vec::<String>::new(), Punctuation::default()).unwrap_err();
		assert!(matches!(err, BabbleError::EmptyCorpus(name) if name == "none"));
	}

	#[test]
	fn stats_count_keys_per_order() {
		let stats = build("a b c").stats();
		assert_eq!(stats.tokens, 3);
		// 5 marks + a, b, c
		assert_eq!(stats.keys, vec![8, 1, 0]);
		assert_eq!(stats.edges, vec![2, 1, 0]);
	}

	#[test]
	fn table_lookup_is_bounded() {
		let model = build("a");
		assert!(model.table(0).is_none());
		assert!(model.table(4).is_none());
	}
}
