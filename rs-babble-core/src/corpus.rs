use std::path::Path;
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{BabbleError, Result};
use crate::io::{corpus_name, select_lines, snapshot_path};

/// Text compiled into the library, used when no corpus file is given.
const BUNDLED_TEXT: &str = include_str!("../data/scarlet.txt");

/// Name of the bundled corpus.
pub const BUNDLED_NAME: &str = "scarlet";

/// Citation markers such as `[12]`, removed from words when requested.
static CITATION: LazyLock<Regex> = LazyLock::new(|| {
	// Literal pattern, cannot fail
	Regex::new(r"\[[0-9]+\]").unwrap()
});

/// How raw text is turned into tokens.
///
/// # Fields
/// - `start_line` / `end_line`: 1-based inclusive window of lines to keep.
/// - `strip_citations`: remove `[n]` markers from every word.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CorpusOptions {
	pub start_line: Option<usize>,
	pub end_line: Option<usize>,
	pub strip_citations: bool,
}

impl Default for CorpusOptions {
	fn default() -> Self {
		Self { start_line: None, end_line: None, strip_citations: true }
	}
}

impl CorpusOptions {
	fn validate(&self) -> Result<()> {
		match (self.start_line, self.end_line) {
			(Some(start), Some(end)) if start > end => Err(BabbleError::InvalidLineRange { start, end }),
			_ => Ok(()),
		}
	}
}

/// Identity of the text a snapshot was built from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
struct SourceFingerprint {
	size: u64,
	blake3: String,
}

impl SourceFingerprint {
	fn of(text: &str) -> Self {
		Self {
			size: text.len() as u64,
			blake3: blake3::hash(text.as_bytes()).to_hex().to_string(),
		}
	}
}

/// Content of a `.bin` snapshot file.
#[derive(Serialize, Deserialize, Debug)]
struct Snapshot {
	source: SourceFingerprint,
	corpus: Corpus,
}

impl Snapshot {
	/// Reads a snapshot, `None` if it is missing or unreadable.
	fn read(path: &Path) -> Option<Self> {
		if !path.exists() {
			return None;
		}

		let decoded = std::fs::read(path)
			.map_err(BabbleError::from)
			.and_then(|bytes| postcard::from_bytes::<Self>(&bytes).map_err(BabbleError::from));
		match decoded {
			Ok(snapshot) => Some(snapshot),
			Err(e) => {
				warn!("Ignoring unreadable snapshot {}: {e}", path.display());
				None
			}
		}
	}

	fn write(&self, path: &Path) -> Result<()> {
		let bytes = postcard::to_stdvec(self)?;
		std::fs::write(path, bytes)?;
		Ok(())
	}
}

/// A reference corpus as an ordered sequence of whitespace-delimited tokens.
///
/// # Invariants
/// - `tokens` is never empty
/// - No token contains whitespace
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Corpus {
	name: String,
	options: CorpusOptions,
	tokens: Vec<String>,
}

impl Corpus {
	/// Tokenizes `text` into a corpus named `name`.
	///
	/// # Behavior
	/// - Keeps only the lines inside the options' window.
	/// - Trims each line and drops blank ones.
	/// - Splits on whitespace, strips citations if requested, drops empty words.
	///
	/// # Errors
	/// - `InvalidLineRange` if the window is reversed.
	/// - `EmptyCorpus` if no token survives.
	pub fn from_text(name: &str, text: &str, options: &CorpusOptions) -> Result<Self> {
		options.validate()?;

		let mut tokens = Vec::new();
		for line in select_lines(text, options.start_line, options.end_line) {
			let line = line.trim();
			if line.is_empty() {
				continue;
			}

			for raw_word in line.split_whitespace() {
				let word = if options.strip_citations {
					CITATION.replace_all(raw_word, "").into_owned()
				} else {
					raw_word.to_owned()
				};

				if !word.is_empty() {
					tokens.push(word);
				}
			}
		}

		if tokens.is_empty() {
			return Err(BabbleError::EmptyCorpus(name.to_owned()));
		}

		Ok(Self { name: name.to_owned(), options: options.clone(), tokens })
	}

	/// Reads and tokenizes a text file. The corpus is named after the file stem.
	pub fn from_file<P: AsRef<Path>>(path: P, options: &CorpusOptions) -> Result<Self> {
		let name = corpus_name(&path)?;
		let text = std::fs::read_to_string(&path)?;
		Self::from_text(&name, &text, options)
	}

	/// Loads a corpus, going through its token snapshot when possible.
	///
	/// - If `<stem>.bin` was written from the same text (size and blake3
	///   hash) with the same options, the tokens are decoded from it with
	///   `postcard`.
	/// - Otherwise the text is tokenized and the snapshot is (re)written.
	///
	/// An unreadable or unwritable snapshot is logged and skipped; only
	/// the text file itself can make loading fail.
	pub fn load<P: AsRef<Path>>(path: P, options: &CorpusOptions) -> Result<Self> {
		let snapshot_path = snapshot_path(&path)?;
		let name = corpus_name(&path)?;
		let text = std::fs::read_to_string(&path)?;
		let source = SourceFingerprint::of(&text);

		if let Some(snapshot) = Snapshot::read(&snapshot_path) {
			if snapshot.source == source && snapshot.corpus.options == *options {
				debug!("Loaded {} tokens from snapshot {}", snapshot.corpus.len(), snapshot_path.display());
				return Ok(snapshot.corpus);
			}
			debug!("Snapshot {} is out of date, rebuilding", snapshot_path.display());
		}

		let snapshot = Snapshot { source, corpus: Self::from_text(&name, &text, options)? };
		match snapshot.write(&snapshot_path) {
			Ok(()) => debug!("Wrote snapshot {}", snapshot_path.display()),
			Err(e) => warn!("Could not write snapshot {}: {e}", snapshot_path.display()),
		}

		Ok(snapshot.corpus)
	}

	/// The corpus compiled into the library.
	pub fn bundled() -> Result<Self> {
		Self::from_text(BUNDLED_NAME, BUNDLED_TEXT, &CorpusOptions::default())
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Tokens in reading order.
	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	/// Always `false` for a successfully built corpus.
	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}
}
