//! Topological analysis of undirected graphs.
//!
//! - [`SimpleGraph`]: an undirected graph over `i64` node IDs
//! - [`undirected_cycles_in`]: a cycle basis found with Paton's algorithm
//! - [`canonical_cycles_in`]: the same cycles in an order-independent form

mod graph;
mod paton;

pub use graph::{SimpleGraph, Undirected};
pub use paton::{canonical_cycles_in, canonicalise, undirected_cycles_in};
