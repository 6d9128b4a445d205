//! The accumulate-then-resolve value tree.
//!
//! Pairs are folded into [`Node`]s by the [`TreeBuilder`]; indexed
//! containers stay undecided until [`finalize`] has seen every key.

mod builder;
mod finalize;
mod node;

pub use builder::TreeBuilder;
pub use finalize::finalize;
pub use node::{IndexedContainer, Node};
