use thiserror::Error;

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, BabbleError>;

/// Errors raised while loading a corpus or building a chain model.
///
/// Generation itself never fails: missing successor data is handled
/// inside the walk by ending the sentence.
#[derive(Error, Debug)]
pub enum BabbleError {
	/// Reading the corpus (or its token snapshot) failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// The token snapshot could not be encoded or decoded.
	#[error("Snapshot error: {0}")]
	Cache(#[from] postcard::Error),

	/// The corpus produced no tokens, no model can be built from it.
	#[error("Corpus '{0}' is empty")]
	EmptyCorpus(String),

	/// A line window where the first line comes after the last one.
	#[error("Invalid line range: start {start} is after end {end}")]
	InvalidLineRange { start: usize, end: usize },

	/// A context order outside `1..=MAX_ORDER`.
	#[error("Invalid context order: {0}")]
	InvalidOrder(usize),

	#[error("Invalid input: {0}")]
	InvalidInput(String),
}
