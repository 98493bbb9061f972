use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::{env, ffi::OsStr};

/// Extension of plain-text corpora.
pub const CORPUS_EXTENSION: &str = "txt";

/// Extension of token snapshots written next to a corpus.
pub const SNAPSHOT_EXTENSION: &str = "bin";

/// Iterates over the lines of `text` inside a 1-based inclusive window.
pub(crate) fn select_lines(
	text: &str,
	start_line: Option<usize>,
	end_line: Option<usize>,
) -> impl Iterator<Item = &str> {
	text.lines().enumerate().filter_map(move |(i, line)| {
		let number = i + 1;
		if start_line.is_some_and(|start| number < start) {
			return None;
		}
		if end_line.is_some_and(|end| number > end) {
			return None;
		}
		Some(line)
	})
}

/// Builds the snapshot path that sits next to a corpus.
///
/// Example:
/// `data/scarlet.txt` → `data/scarlet.bin`
pub fn snapshot_path<P: AsRef<Path>>(corpus_path: P) -> io::Result<PathBuf> {
	let corpus_path = corpus_path.as_ref();

	let parent = corpus_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = corpus_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Corpus path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(SNAPSHOT_EXTENSION);

	Ok(output)
}

/// Returns the corpus name of a path (file name without extension).
///
/// Examples:
/// - `"./data/scarlet.txt"` → `"scarlet"`
/// - `"scarlet"` → `"scarlet"`
pub fn corpus_name<P: AsRef<Path>>(corpus_path: P) -> io::Result<String> {
	let stem = corpus_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// `"."` and `"./"` resolve to the current working directory,
/// other paths are returned as-is.
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists the corpus names (`.txt` files, extension stripped) of a directory.
///
/// Subdirectories are ignored. Names are sorted.
pub fn list_corpora<P: AsRef<Path>>(dir: P) -> io::Result<Vec<String>> {
	let mut names = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(OsStr::new(CORPUS_EXTENSION)) {
			names.push(corpus_name(&path)?);
		}
	}

	names.sort();
	Ok(names)
}
