// This file is part of msh, a POSIX-subset shell implementation.

//! Shell startup: turning a [`Source`] into the script text to evaluate.

pub mod args;

use std::io::Read;

use self::args::Source;

/// Error reading the configured source.
#[derive(Debug, thiserror::Error)]
#[error("cannot read script '{path}': {cause}")]
pub struct ReadSourceError {
    pub path: String,
    pub cause: std::io::Error,
}

/// Reads the full script text from `source` to completion.
pub fn read_source(source: &Source) -> Result<String, ReadSourceError> {
    match source {
        Source::Stdin => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|cause| ReadSourceError {
                    path: "<stdin>".to_string(),
                    cause,
                })?;
            Ok(buffer)
        }
        Source::File { path } => std::fs::read_to_string(path).map_err(|cause| ReadSourceError {
            path: path.clone(),
            cause,
        }),
    }
}
