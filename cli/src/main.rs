mod cli;

use ariadne::Source;
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use std::process::ExitCode;
use unminify_driver::{Conf, Result, UnminifyError, Unminified, unminify_files};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match run(&cli) {
        | Ok(true) => ExitCode::SUCCESS,
        | Ok(false) => ExitCode::FAILURE,
        | Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

/// The configuration file, if any, overridden by the flags.
fn conf(cli: &Cli) -> Result<Conf> {
    let mut conf = match &cli.config {
        | Some(path) => Conf::load(path)?,
        | None => Conf::default(),
    };
    if let Some(safety) = cli.safety {
        conf.safety = safety;
    }
    conf.additional_transforms.extend(cli.additional_transforms.iter().cloned());
    if let Some(width) = cli.width {
        conf.width = width;
    }
    log::debug!("running at {} with {:?}", conf.safety, conf.additional_transforms);
    Ok(conf)
}

/// Prints every result in argument order; `false` if any file failed.
fn run(cli: &Cli) -> Result<bool> {
    let conf = conf(cli)?;
    let results = unminify_files(&cli.files, &conf)?;
    let banner = results.len() > 1;
    let mut all_ok = true;
    for unminified in results {
        all_ok &= report(unminified, banner)?;
    }
    Ok(all_ok)
}

fn report(unminified: Unminified, banner: bool) -> Result<bool> {
    let Unminified { path, source, info, output } = unminified;
    match output {
        | Ok(text) => {
            if banner {
                println!("// {}", path.display());
            }
            println!("{}", text);
            Ok(true)
        }
        | Err(UnminifyError::ParseError(err)) => {
            err.to_report(&info).eprint((info.display_path(), Source::from(source.as_str())))?;
            Ok(false)
        }
        | Err(err) => {
            eprintln!("{} {}: {}", "error:".red().bold(), path.display(), err);
            Ok(false)
        }
    }
}
