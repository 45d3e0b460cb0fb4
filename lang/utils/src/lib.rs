#![allow(clippy::style)]

pub mod pass;
pub mod span;

pub mod prelude {
    /// Source code location.
    pub use crate::span::{Cursor1, Cursor2, FileInfo, Span};
    /// Tree-to-tree passes.
    pub use crate::pass::{FnPass, Pass};
}
