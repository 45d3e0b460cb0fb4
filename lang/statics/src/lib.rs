/// Node to parent back-references, as a side table.
pub mod parents;
pub use parents::*;

/// Uses of the caller-bound `this` and `arguments`.
pub mod weird;
pub use weird::*;

/// Scopes, variables and classified references.
pub mod scope;
pub use scope::*;

/// Dumps of the scope tree for logs.
mod fmt;

#[cfg(test)]
mod tests;
