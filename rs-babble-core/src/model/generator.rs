use log::{debug, warn};
use rand::Rng;
use rand::rngs::StdRng;

use crate::corpus::Corpus;
use crate::error::Result;
use crate::model::chain_model::ChainModel;
use crate::model::generation_input::GenerationInput;
use crate::model::lookback::Lookback;
use crate::model::punctuation::{FALLBACK_TERMINAL, Punctuation};

/// Text under construction.
///
/// Words are separated by a space, punctuation marks stick to the word
/// before them. Lengths are counted in chars.
struct Phrase<'p> {
	punctuation: &'p Punctuation,
	text: String,
	chars: usize,
	units: usize,
}

impl<'p> Phrase<'p> {
	fn new(punctuation: &'p Punctuation) -> Self {
		Self { punctuation, text: String::new(), chars: 0, units: 0 }
	}

	fn push(&mut self, unit: &str) {
		if !self.text.is_empty() && !self.punctuation.is_mark(unit) {
			self.text.push(' ');
			self.chars += 1;
		}
		self.text.push_str(unit);
		self.chars += unit.chars().count();
		self.units += 1;
	}

	/// Closes the phrase with a period.
	fn push_fallback(&mut self) {
		self.text.push(FALLBACK_TERMINAL);
		self.chars += 1;
		self.units += 1;
	}

	fn into_string(self) -> String {
		self.text
	}
}

/// High-level generator over a single chain model.
///
/// # Responsibilities
/// - Own the (read-only) model and the generation parameters
/// - Generate sentences that end on terminal punctuation
/// - Generate text blocks made of whole sentences under a length cap
///
/// Every operation takes the random source as an argument; calls share
/// nothing but the model, so they can run concurrently.
#[derive(Debug)]
pub struct Generator {
	model: ChainModel,
	input: GenerationInput,
}

impl Generator {
	/// Creates a generator with default parameters.
	pub fn new(model: ChainModel) -> Self {
		Self::with_input(model, GenerationInput::default())
	}

	pub fn with_input(model: ChainModel, input: GenerationInput) -> Self {
		Self { model, input }
	}

	/// Builds the model of `corpus` and wraps it.
	///
	/// # Errors
	/// Propagates model building errors.
	pub fn from_corpus(corpus: &Corpus) -> Result<Self> {
		Ok(Self::new(ChainModel::from_corpus(corpus)?))
	}

	pub fn model(&self) -> &ChainModel {
		&self.model
	}

	pub fn input(&self) -> &GenerationInput {
		&self.input
	}

	/// Random source described by the generation parameters.
	pub fn rng(&self) -> StdRng {
		self.input.rng()
	}

	/// Picks a terminal mark uniformly and a first word following it.
	///
	/// Returns `(mark, word)`, or `None` when no terminal mark has successors.
	fn seed<R: Rng>(&self, rng: &mut R) -> Option<(&str, &str)> {
		let starts = self.model.sentence_starts();
		if starts.is_empty() {
			return None;
		}
		let mark = starts[rng.random_range(0..starts.len())].as_str();
		let first = self.model.table(1)?.predict(mark, rng)?;
		Some((mark, first))
	}

	/// Generates one sentence ending on a terminal punctuation mark.
	///
	/// # Behavior
	/// - Starts after a random terminal mark with one of its successors.
	/// - Walks the chain, preferring order-3, then order-2, then order-1
	///   contexts.
	/// - Stops after the first terminal mark sampled.
	/// - Ends on a period when no successor exists or when the sentence
	///   reaches `max_sentence_units`.
	///
	/// The result is never empty.
	pub fn generate_capped_sentence<R: Rng>(&self, rng: &mut R) -> String {
		let punctuation = self.model.punctuation();
		let mut phrase = Phrase::new(punctuation);

		let Some((mark, first)) = self.seed(rng) else {
			warn!("Model '{}' has no sentence start, returning a bare period", self.model.name());
			phrase.push_fallback();
			return phrase.into_string();
		};

		phrase.push(first);
		if punctuation.is_terminal(first) {
			return phrase.into_string();
		}

		let mut lookback = Lookback::default();
		lookback.advance(mark);
		let mut current = first;

		loop {
			if phrase.units >= self.input.max_sentence_units {
				debug!("Sentence reached {} units, closing it", phrase.units);
				phrase.push_fallback();
				break;
			}

			match self.model.predict(&lookback, current, rng) {
				Some(next) => {
					phrase.push(next);
					if punctuation.is_terminal(next) {
						break;
					}
					lookback.advance(current);
					current = next;
				}
				None => {
					debug!("No successor for '{current}', closing the sentence");
					phrase.push_fallback();
					break;
				}
			}
		}

		phrase.into_string()
	}

	/// Generates whole sentences joined by a space, at most `target_length` chars long.
	///
	/// # Behavior
	/// - Adds sentences while the block is shorter than `fill_ratio * target_length`.
	/// - A sentence that would push the block past `target_length` is dropped.
	/// - After `max_rejections` dropped sentences in a row the block is
	///   returned as is, possibly short.
	///
	/// A `target_length` of 0 gives an empty block.
	pub fn generate_text_block<R: Rng>(&self, target_length: usize, rng: &mut R) -> String {
		let threshold = target_length as f64 * f64::from(self.input.fill_ratio());

		let mut block = String::new();
		let mut length = 0;
		let mut rejections = 0;

		while (length as f64) < threshold {
			let sentence = self.generate_capped_sentence(rng);
			let separator = usize::from(!block.is_empty());
			let added = separator + sentence.chars().count();

			if length + added > target_length {
				rejections += 1;
				if rejections >= self.input.max_rejections {
					debug!(
						"Gave up after {rejections} overshooting sentences ({length}/{target_length} chars)"
					);
					break;
				}
				continue;
			}

			rejections = 0;
			if separator == 1 {
				block.push(' ');
			}
			block.push_str(&sentence);
			length += added;
		}

		block
	}

	/// Generates text of at least `length` chars, ignoring sentence boundaries.
	///
	/// # Behavior
	/// - Starts like `generate_capped_sentence`.
	/// - Keeps walking through terminal marks until the text is long enough.
	/// - On a dead end, closes the sentence with a period and starts a new one.
	///
	/// The text may end anywhere, including in the middle of a sentence.
	/// A `length` of 0 gives an empty string.
	pub fn generate_sentence<R: Rng>(&self, length: usize, rng: &mut R) -> String {
		let mut phrase = Phrase::new(self.model.punctuation());
		if length == 0 {
			return phrase.into_string();
		}

		let Some((mut mark, mut current)) = self.seed(rng) else {
			warn!("Model '{}' has no sentence start", self.model.name());
			return phrase.into_string();
		};
		phrase.push(current);

		let mut lookback = Lookback::default();
		lookback.advance(mark);

		while phrase.chars < length {
			match self.model.predict(&lookback, current, rng) {
				Some(next) => {
					phrase.push(next);
					lookback.advance(current);
					current = next;
				}
				None => {
					phrase.push_fallback();
					let Some(seed) = self.seed(rng) else {
						break;
					};
					(mark, current) = seed;
					phrase.push(current);
					lookback = Lookback::default();
					lookback.advance(mark);
				}
			}
		}

		phrase.into_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;

	fn generator(text: &str) -> Generator {
		let model = ChainModel::build("test", text.split_whitespace(), Punctuation::default()).unwrap();
		Generator::new(model)
	}

	#[test]
	fn longest_context_wins() {
		let generator = generator("A B C . A B D .");
		// Order 1 alone could continue "B" with either word
		assert_eq!(generator.model().table(1).unwrap().get("B").unwrap(), &["C", "D"]);

		for seed in 0..50 {
			let mut rng = StdRng::seed_from_u64(seed);
			assert_eq!(generator.generate_capped_sentence(&mut rng), "A B D.");
		}
	}

	#[test]
	fn order_two_decides_when_order_three_is_unknown() {
		// "A B C" ends the corpus, so the walk's order-3 key has no entry
		let generator = generator("Go, Y C E, B C D. A B C");
		assert!(!generator.model().table(3).unwrap().contains("A B C"));
		assert_eq!(generator.model().table(2).unwrap().get("B C").unwrap(), &["D"]);
		assert_eq!(generator.model().table(1).unwrap().get("C").unwrap(), &["E", "D"]);

		for seed in 0..50 {
			let mut rng = StdRng::seed_from_u64(seed);
			assert_eq!(generator.generate_capped_sentence(&mut rng), "A B C D.");
		}
	}

	#[test]
	fn dead_end_closes_with_period() {
		let generator = generator("Start. alpha beta");
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(generator.generate_capped_sentence(&mut rng), "alpha beta.");
	}

	#[test]
	fn no_sentence_start_gives_bare_period() {
		let generator = generator("no punctuation here");
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(generator.generate_capped_sentence(&mut rng), ".");
		assert_eq!(generator.generate_sentence(10, &mut rng), "");
	}

	#[test]
	fn marks_attach_to_previous_word() {
		let generator = generator("End. Well, yes; quite!");
		let mut rng = StdRng::seed_from_u64(9);
		assert_eq!(generator.generate_capped_sentence(&mut rng), "Well, yes; quite!");
	}

	#[test]
	fn abbreviation_does_not_end_sentence() {
		let generator = generator("Then. Mr. Holmes arrived.");
		let mut rng = StdRng::seed_from_u64(4);
		assert_eq!(generator.generate_capped_sentence(&mut rng), "Mr. Holmes arrived.");
	}

	#[test]
	fn unit_guard_closes_long_sentences() {
		let model = ChainModel::build(
			"test",
			"Go. one two three four five six seven eight.".split_whitespace(),
			Punctuation::default(),
		)
		.unwrap();
		let mut input = GenerationInput::default();
		input.max_sentence_units = 4;
		let generator = Generator::with_input(model, input);

		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(generator.generate_capped_sentence(&mut rng), "one two three four.");
	}

	#[test]
	fn zero_length_block_is_empty() {
		let generator = generator("One. Two. Three.");
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(generator.generate_text_block(0, &mut rng), "");
		assert_eq!(generator.generate_sentence(0, &mut rng), "");
	}

	#[test]
	fn block_gives_up_when_nothing_fits() {
		let generator = generator("Go. a very long sentence indeed.");
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(generator.generate_text_block(5, &mut rng), "");
	}

	#[test]
	fn block_is_made_of_whole_sentences() {
		// "Stop." is the only sentence this corpus can produce
		let generator = generator("Go. Stop.");
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(generator.generate_text_block(17, &mut rng), "Stop. Stop. Stop.");
		assert_eq!(generator.generate_text_block(16, &mut rng), "Stop. Stop.");
	}

	#[test]
	fn uncapped_sentence_runs_past_terminal_marks() {
		let generator = generator("Go. Stop.");
		let mut rng = StdRng::seed_from_u64(0);
		let text = generator.generate_sentence(30, &mut rng);
		assert!(text.chars().count() >= 30);
		assert!(text.matches('.').count() > 1);
	}
}
