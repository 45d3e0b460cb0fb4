pub mod fmt;
pub use fmt::*;

/// Operators and their binding strength.
pub mod ops;
pub use ops::*;

/// Literal values: script strings and number formatting.
pub mod lit;
pub use lit::*;

/// The node-kind table.
pub mod node;
pub use node::*;

/// Post-order rebuilding, short-circuit search and deep copies.
pub mod reduce;
pub use reduce::*;

/// Constructors and predicates shared by the passes.
pub mod construct;
pub use construct::*;

#[cfg(test)]
mod tests;
