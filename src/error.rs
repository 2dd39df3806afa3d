// Mstrie -- An in-memory index for multisets
// Copyright 2026 The mstrie authors

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! Error type shared by all modules, and utilities for rendering errors.

use std::error;
use std::fmt;
use std::io;
use std::result;

#[derive(Debug)]
pub enum Error {
    /// Error in the config file on a given line (0-based).
    InvalidConfig(usize, &'static str),

    /// A key is missing in the config.
    IncompleteConfig(String),

    /// A config parameter is present but its value is unusable.
    InvalidParameter(String),

    /// A multiset token could not be decoded.
    InvalidToken(String),

    /// A decoded multiplicity exceeds the configured maximum.
    OutOfRange(String),

    /// Delete of a multiset that is not present.
    NothingToDelete,

    /// A query-type symbol other than the ones a command accepts.
    UnknownQueryKind(String),

    /// The first word of a command line is not a known command.
    UnknownCommand(String),

    /// A known command was invoked with unusable arguments.
    CommandUsage(&'static str),

    /// The `run_mode` config parameter is neither `cli` nor `benchmark`.
    UnknownRunMode(String),

    /// An index file's header disagrees with the receiving trie.
    Parametrization,

    /// An operation that needs an index was issued before `configure`.
    IndexNotLoaded,

    /// IO error.
    IoError(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidConfig(lineno, msg) => {
                write!(f, "Invalid configuration on line {}: {}", lineno + 1, msg)
            }
            Error::IncompleteConfig(msg) => write!(f, "{}", msg),
            Error::InvalidParameter(msg) => write!(f, "{}", msg),
            Error::InvalidToken(msg) => write!(f, "{}", msg),
            Error::OutOfRange(msg) => write!(f, "{}", msg),
            Error::NothingToDelete => write!(f, "nothing to delete"),
            Error::UnknownQueryKind(kind) => write!(f, "Unknown query type: {}", kind),
            Error::UnknownCommand(command) => write!(f, "Unknown command: {}", command),
            Error::CommandUsage(usage) => write!(f, "usage: {}", usage),
            Error::UnknownRunMode(mode) => write!(f, "Unknown run mode for mstrie: {}", mode),
            Error::Parametrization => write!(f, "mstrie parametrization is not correct"),
            Error::IndexNotLoaded => {
                write!(f, "The index is not initialized, run 'configure' first.")
            }
            Error::IoError(..) => write!(f, "IO error"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Render the error and its causes, one `error:` line per cause.
///
/// Every nested cause is indented one space deeper than its parent, so the
/// origin of a failure can be read off from the shape of the output.
pub fn format_causes(err: &(dyn error::Error)) -> String {
    let mut out = String::new();
    let mut level = 0;
    let mut current: Option<&dyn error::Error> = Some(err);
    while let Some(err) = current {
        for _ in 0..level {
            out.push(' ');
        }
        out.push_str("error: ");
        out.push_str(&err.to_string());
        out.push('\n');
        current = err.source();
        level += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{format_causes, Error};

    #[test]
    fn format_causes_indents_nested_causes() {
        let err = Error::from(io::Error::new(io::ErrorKind::NotFound, "file is gone"));
        let rendered = format_causes(&err);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "error: IO error");
        assert_eq!(lines[1], " error: file is gone");
    }

    #[test]
    fn format_causes_single_level() {
        let rendered = format_causes(&Error::NothingToDelete);
        assert_eq!(rendered, "error: nothing to delete\n");
    }
}
