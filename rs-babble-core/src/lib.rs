//! Word-level Markov chain text generation library.
//!
//! This crate provides a small babbling engine including:
//! - Corpus loading and whitespace tokenization
//! - A punctuation-aware chain model over context orders 1 to 3
//! - Sentence and text block generation with an injectable random source
//! - Internal utilities for I/O and path handling
//!
//! The model is built once from a corpus and is read-only afterwards,
//! so a single generator can be shared freely between callers.

/// Chain model, punctuation rules and generation logic.
pub mod model;

/// Corpus loading and tokenization.
pub mod corpus;

/// Error type shared by the loader and the builder.
pub mod error;

/// I/O utilities (line reading, snapshot paths, corpus listing).
pub mod io;
