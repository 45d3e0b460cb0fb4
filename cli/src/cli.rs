use clap::Parser;
use std::path::PathBuf;
use unminify_driver::Safety;

/// Rewrite minified JavaScript into readable JavaScript
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Paths to the files to unminify
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
    /// How far the rewrites may stray from the input's exact behavior (name or 0-4)
    #[arg(short, long, value_enum, value_name = "LEVEL")]
    pub safety: Option<Safety>,
    /// Transform to run after the level's own; may be repeated
    #[arg(short = 't', long = "additional-transform", value_name = "NAME")]
    pub additional_transforms: Vec<String>,
    /// Configuration file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Print width of the output
    #[arg(short, long, value_name = "N")]
    pub width: Option<usize>,
    /// Level of verbosity
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
