use std::collections::HashSet;

/// Marks that end a sentence.
pub const TERMINAL_PUNCTUATION: [char; 3] = ['.', '?', '!'];

/// Marks that separate clauses without ending the sentence.
pub const SEPARATOR_PUNCTUATION: [char; 2] = [',', ';'];

/// Tokens whose trailing period is not a sentence boundary.
pub const PUNCTUATION_EXCEPTIONS: [&str; 9] = ["Mr.", "Mrs.", "Ms.", "Dr.", "St.", "Mt.", "Jr.", "Sr.", "Prof."];

/// Period appended when a walk runs out of successors.
pub const FALLBACK_TERMINAL: char = '.';

/// Punctuation rules used to split tokens into units.
///
/// A token "ends with punctuation" when its last character is one of the
/// marks and the whole token is not a known exception (abbreviations).
/// Such a token is split into its clean form and the mark, each being a
/// separate unit of the chain.
///
/// # Invariants
/// - Every terminal mark is also part of `marks`
/// - `marks` keeps declaration order (separators first, then terminals)
#[derive(Clone, Debug, PartialEq)]
pub struct Punctuation {
	marks: Vec<char>,
	terminal: Vec<char>,
	exceptions: HashSet<String>,
}

impl Default for Punctuation {
	fn default() -> Self {
		Self::new(&SEPARATOR_PUNCTUATION, &TERMINAL_PUNCTUATION, &PUNCTUATION_EXCEPTIONS)
	}
}

impl Punctuation {
	/// Creates a punctuation set from separators, terminals and exceptions.
	///
	/// Duplicated marks are kept once.
	pub fn new(separators: &[char], terminal: &[char], exceptions: &[&str]) -> Self {
		let mut marks: Vec<char> = Vec::with_capacity(separators.len() + terminal.len());
		for mark in separators.iter().chain(terminal) {
			if !marks.contains(mark) {
				marks.push(*mark);
			}
		}

		let mut terminal_marks = Vec::with_capacity(terminal.len());
		for mark in terminal {
			if !terminal_marks.contains(mark) {
				terminal_marks.push(*mark);
			}
		}

		Self {
			marks,
			terminal: terminal_marks,
			exceptions: exceptions.iter().map(|e| (*e).to_owned()).collect(),
		}
	}

	/// All marks, separators first.
	pub fn marks(&self) -> &[char] {
		&self.marks
	}

	/// Sentence-ending marks.
	pub fn terminal(&self) -> &[char] {
		&self.terminal
	}

	/// Returns the trailing mark of `token`, unless the token is an exception.
	pub fn ends_with(&self, token: &str) -> Option<char> {
		if self.exceptions.contains(token) {
			return None;
		}
		token.chars().last().filter(|last| self.marks.contains(last))
	}

	/// Splits a token into its clean form and its trailing mark.
	///
	/// Examples:
	/// - `"word,"` → `("word", Some(','))`
	/// - `"Mr."` → `("Mr.", None)`
	/// - `"."` → `("", Some('.'))`
	pub fn split<'t>(&self, token: &'t str) -> (&'t str, Option<char>) {
		match self.ends_with(token) {
			Some(mark) => (&token[..token.len() - mark.len_utf8()], Some(mark)),
			None => (token, None),
		}
	}

	/// Whether a unit is a single punctuation mark.
	pub fn is_mark(&self, unit: &str) -> bool {
		Self::single_char(unit).is_some_and(|c| self.marks.contains(&c))
	}

	/// Whether a unit is a single sentence-ending mark.
	pub fn is_terminal(&self, unit: &str) -> bool {
		Self::single_char(unit).is_some_and(|c| self.terminal.contains(&c))
	}

	fn single_char(unit: &str) -> Option<char> {
		let mut chars = unit.chars();
		match (chars.next(), chars.next()) {
			(Some(c), None) => Some(c),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splits_trailing_marks() {
		let punctuation = Punctuation::default();
		assert_eq!(punctuation.split("word,"), ("word", Some(',')));
		assert_eq!(punctuation.split("end."), ("end", Some('.')));
		assert_eq!(punctuation.split("really?"), ("really", Some('?')));
		assert_eq!(punctuation.split("plain"), ("plain", None));
	}

	#[test]
	fn abbreviations_are_not_split() {
		let punctuation = Punctuation::default();
		assert_eq!(punctuation.ends_with("Mr."), None);
		assert_eq!(punctuation.split("Mrs."), ("Mrs.", None));
		// A mark after the abbreviation still counts
		assert_eq!(punctuation.split("Mr.,"), ("Mr.", Some(',')));
	}

	#[test]
	fn lone_mark_has_empty_clean_form() {
		let punctuation = Punctuation::default();
		assert_eq!(punctuation.split(";"), ("", Some(';')));
	}

	#[test]
	fn multibyte_tokens_split_on_char_boundary() {
		let punctuation = Punctuation::default();
		assert_eq!(punctuation.split("café."), ("café", Some('.')));
	}

	#[test]
	fn classifies_units() {
		let punctuation = Punctuation::default();
		assert!(punctuation.is_mark(","));
		assert!(!punctuation.is_terminal(","));
		assert!(punctuation.is_terminal("!"));
		assert!(!punctuation.is_mark("!!"));
		assert!(!punctuation.is_mark("a"));
		assert!(!punctuation.is_terminal(""));
	}

	#[test]
	fn marks_keep_declaration_order() {
		let punctuation = Punctuation::new(&[',', ';'], &['.', '?', '!', '.'], &[]);
		assert_eq!(punctuation.marks(), &[',', ';', '.', '?', '!']);
		assert_eq!(punctuation.terminal(), &['.', '?', '!']);
	}
}
