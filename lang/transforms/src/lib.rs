pub mod err;
pub use err::*;

mod common;

pub mod normalize;
pub use normalize::Normalize;

pub mod restructure;
pub use restructure::Restructure;

pub mod dead;
pub use dead::EliminateDead;

pub mod unused;
pub use unused::EliminateUnused;

pub mod inline;
pub use inline::InlineConstants;

pub mod evaluate;
pub use evaluate::PartialEvaluate;

use unminify_syntax::Tree;
use unminify_utils::pass::Pass;

/// A transform as the driver holds it.
pub type BoxedTransform = Box<dyn Pass<Tree, Error = TransformError> + Send + Sync>;

/// Every registered transform name, in pipeline order.
pub const NAMES: [&str; 6] = [
    "normalize",
    "restructure",
    "eliminate-dead",
    "eliminate-unused",
    "inline-constants",
    "partial-evaluate",
];

/// Looks a transform up by its registered name.
pub fn by_name(name: &str) -> Option<BoxedTransform> {
    Some(match name {
        | "normalize" => Box::new(Normalize),
        | "restructure" => Box::new(Restructure),
        | "eliminate-dead" => Box::new(EliminateDead),
        | "eliminate-unused" => Box::new(EliminateUnused),
        | "inline-constants" => Box::new(InlineConstants),
        | "partial-evaluate" => Box::new(PartialEvaluate),
        | _ => return None,
    })
}

#[cfg(test)]
mod tests;
