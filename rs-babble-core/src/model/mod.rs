//! Chain model and text generation.
//!
//! This module contains:
//! - Punctuation rules splitting tokens into units (`Punctuation`)
//! - Per-order transition tables (`TransitionTable`)
//! - The three-order chain model and its builder (`ChainModel`)
//! - Generation parameters (`GenerationInput`)
//! - The high-level generation interface (`Generator`)

/// High-level interface producing sentences and text blocks from a chain model.
pub mod generator;

/// Word-level chain model over context orders 1 to 3.
///
/// Built once from a token sequence, read-only afterwards.
pub mod chain_model;

/// Transition table of a single context order.
pub mod transition_table;

/// Punctuation marks, terminal marks and abbreviation exceptions.
pub mod punctuation;

/// Generation parameters: random seed, walk and block limits.
pub mod generation_input;

/// Deduplicated successor list of one context key.
///
/// This module is not exposed publicly.
mod successors;

/// Lookback window shared by the builder and the walk.
mod lookback;
