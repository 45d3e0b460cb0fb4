use crate::{err::*, safety::Safety};
use derive_more::From;
use std::rc::Rc;
use unminify_surface::codegen::generate;
use unminify_syntax::Tree;
use unminify_transforms::{BoxedTransform, TransformError};
use unminify_utils::pass::Pass;

/// Full passes run before giving up on convergence.
pub const MAX_PASSES: usize = 100;

/// The transforms of one run, in the order they apply.
#[derive(From, Default)]
pub struct Pipeline {
    transforms: Vec<BoxedTransform>,
}

/// What a fixpoint run produced.
pub struct Settled {
    pub tree: Tree,
    /// Full passes taken, the final unchanged one included.
    pub passes: usize,
    pub converged: bool,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }
    /// The transforms of `safety` followed by the named extras.
    pub fn for_level<S: AsRef<str>>(safety: Safety, additional: &[S]) -> Result<Self> {
        let mut pipeline = Pipeline::new();
        for name in safety.transforms() {
            pipeline.push_named(name)?;
        }
        for name in additional {
            pipeline.push_named(name.as_ref())?;
        }
        Ok(pipeline)
    }
    pub fn push_named(&mut self, name: &str) -> Result<()> {
        let transform = unminify_transforms::by_name(name)
            .ok_or_else(|| ConfError::UnknownTransform(name.to_string()))?;
        self.transforms.push(transform);
        Ok(())
    }
    /// Appends any pass, registered or not.
    pub fn with(
        mut self, transform: impl Pass<Tree, Error = TransformError> + Send + Sync + 'static,
    ) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }
    pub fn names(&self) -> Vec<&str> {
        self.transforms.iter().map(|transform| transform.name()).collect()
    }
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
    /// Applies every transform in turn until a full pass hands back the very tree it started
    /// with, or until [`MAX_PASSES`] passes have run.
    pub fn settle(&self, tree: &Tree) -> Result<Settled> {
        let mut tree = tree.clone();
        for pass in 1..=MAX_PASSES {
            let input = tree.clone();
            let mut changed = Vec::new();
            for transform in &self.transforms {
                let output = transform.run(&tree)?;
                if !Rc::ptr_eq(&output, &tree) {
                    if log::log_enabled!(log::Level::Trace) {
                        log::trace!("[{}] {}", transform.name(), generate(&output, 80));
                    }
                    changed.push(transform.name());
                    tree = output;
                }
            }
            if Rc::ptr_eq(&input, &tree) {
                log::debug!("converged after {} pass(es)", pass);
                return Ok(Settled { tree, passes: pass, converged: true });
            }
            log::debug!("pass {}: {}", pass, changed.join(", "));
        }
        log::warn!("no fixpoint after {} passes; keeping the last tree", MAX_PASSES);
        Ok(Settled { tree, passes: MAX_PASSES, converged: false })
    }
    pub fn run(&self, tree: &Tree) -> Result<Tree> {
        Ok(self.settle(tree)?.tree)
    }
}
