//! Diffing node trees into element tree mutations.

/// Keyed and indexed child matching.
pub mod patch;
