// This file is part of msh, a POSIX-subset shell implementation.

//! Command line argument parser for the shell.
//!
//! Hand-rolled rather than built on a declarative argument-parsing crate:
//! the surface is `shell [script-path]` plus `-h`, too small to justify the
//! dependency.

use thiserror::Error;

/// Where the shell should read its script from.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Source {
    /// Read the script from standard input.
    #[default]
    Stdin,
    /// Read the script from the named file.
    File { path: String },
}

/// Configuration for starting the evaluator.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Run {
    pub source: Source,
}

/// Parse result.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Parse {
    /// Evaluate the configured source.
    Run(Run),
    /// Print usage and exit 0.
    Help,
}

/// Error in command line parsing.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("too many operands")]
    TooManyOperands,
}

/// Parses the process argument vector (excluding `argv[0]`).
pub fn parse<I>(args: I) -> Result<Parse, Error>
where
    I: IntoIterator<Item = String>,
{
    let mut run = Run::default();
    let mut saw_path = false;

    for arg in args {
        if arg == "-h" || arg == "--help" {
            return Ok(Parse::Help);
        }
        if let Some(option) = arg.strip_prefix('-') {
            if !option.is_empty() {
                return Err(Error::UnknownOption(arg));
            }
        }
        if saw_path {
            return Err(Error::TooManyOperands);
        }
        run.source = Source::File { path: arg };
        saw_path = true;
    }

    Ok(Parse::Run(run))
}

/// Usage text printed for `-h`/`--help`.
pub const USAGE: &str = "usage: msh [script-path]\n";
