//! Declarative, immutable-per-frame scene description.
//!
//! A producer builds a fresh [`node::Node`] tree every tick; the element tree diffs it against
//! the previous one. Nodes are plain data plus optional function-valued props.

/// Builder helpers for constructing node trees in code.
pub mod dsl;
/// Node kinds, keys and the tree itself.
pub mod node;
/// Typed props carried by nodes.
pub mod props;
