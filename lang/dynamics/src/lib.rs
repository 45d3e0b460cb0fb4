/// Values and the failures of computing them.
pub mod syntax;
pub use syntax::*;
/// Conversions between value types, and equality.
pub mod coerce;
pub use coerce::*;
/// Operator semantics.
pub mod ops;
pub use ops::*;
/// Global functions and primitive methods.
pub mod impls;
pub use impls::*;
pub mod tree;
pub mod fmt;

#[cfg(test)]
mod tests;
