//! Safety levels, configuration and the fixpoint driver that ties parsing, the transforms and
//! code generation together.

pub mod conf;
pub mod err;
pub mod pipeline;
pub mod safety;

pub use conf::Conf;
pub use err::*;
pub use pipeline::{MAX_PASSES, Pipeline, Settled};
pub use safety::Safety;

use rayon::prelude::*;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use unminify_surface::{codegen::generate, textual::parse};
use unminify_utils::span::FileInfo;

/// Unminifies `source` at `safety`, running the named extra transforms after the level's own.
pub fn unminify<S: AsRef<str>>(source: &str, safety: Safety, additional: &[S]) -> Result<String> {
    let conf = Conf::new(safety).with_transforms(additional);
    unminify_source(source, &FileInfo::new(source, None), &conf)
}

/// Unminifies `source` under `conf`; parse errors point into `info`.
pub fn unminify_source(source: &str, info: &FileInfo, conf: &Conf) -> Result<String> {
    let pipeline = conf.pipeline()?;
    unminify_with(&pipeline, source, info, conf.width)
}

/// Unminifies `source` with a ready pipeline.
pub fn unminify_with(
    pipeline: &Pipeline, source: &str, info: &FileInfo, width: usize,
) -> Result<String> {
    let tree = parse(source, info)?;
    let settled = pipeline.settle(&tree)?;
    log::info!(
        "{}: {} pass(es){}",
        info.display_path(),
        settled.passes,
        if settled.converged { "" } else { " without converging" }
    );
    Ok(generate(&settled.tree, width))
}

/// One input file and what became of it.
pub struct Unminified {
    pub path: PathBuf,
    pub source: String,
    pub info: FileInfo,
    pub output: Result<String>,
}

impl Unminified {
    pub fn read(pipeline: &Pipeline, path: &Path, width: usize) -> Self {
        let source = match std::fs::read_to_string(path) {
            | Ok(source) => source,
            | Err(err) => {
                return Unminified {
                    path: path.to_path_buf(),
                    source: String::new(),
                    info: FileInfo::new("", Some(Arc::new(path.to_path_buf()))),
                    output: Err(err.into()),
                };
            }
        };
        let info = FileInfo::new(&source, Some(Arc::new(path.to_path_buf())));
        let output = unminify_with(pipeline, &source, &info, width);
        Unminified { path: path.to_path_buf(), source, info, output }
    }
}

/// Unminifies every file independently and in parallel; results keep the order of `paths`.
pub fn unminify_files(paths: &[PathBuf], conf: &Conf) -> Result<Vec<Unminified>> {
    if paths.is_empty() {
        return Err(ConfError::MissingInput.into());
    }
    let pipeline = conf.pipeline()?;
    log::debug!("transforms: {}", pipeline.names().join(", "));
    Ok(paths.par_iter().map(|path| Unminified::read(&pipeline, path, conf.width)).collect())
}
