//! CLI support for bq
//!
//! Provides programmatic access to the `bq` command so other tools can embed
//! it without going through a process boundary.

mod run;

pub use run::{RunOptions, RunResult, execute};

use std::{fmt, io};

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Expression did not parse
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),
    /// Evaluation failed
    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::EvalError),
    /// Input file could not be opened
    #[error("Cannot open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// No input provided
    #[error("No input provided. Pass a file or pipe binary data to stdin.")]
    NoInput,
}

/// How a successful result is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Aligned table with name, code, type, value, and hex columns
    #[default]
    Table,
    /// Compact JSON
    Json,
    /// Indented JSON
    JsonPretty,
}

/// Diagnostic level, raised by each `-v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Only errors
    #[default]
    Error,
    Warn,
    Info,
    Debug,
}

impl Verbosity {
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Verbosity::Error,
            1 => Verbosity::Warn,
            2 => Verbosity::Info,
            _ => Verbosity::Debug,
        }
    }

    fn emit(self, level: Verbosity, tag: &str, message: fmt::Arguments<'_>) {
        if self >= level {
            eprintln!("[{}] {}", tag, message);
        }
    }

    pub fn warn(self, message: fmt::Arguments<'_>) {
        self.emit(Verbosity::Warn, "warn", message);
    }

    pub fn info(self, message: fmt::Arguments<'_>) {
        self.emit(Verbosity::Info, "info", message);
    }

    pub fn debug(self, message: fmt::Arguments<'_>) {
        self.emit(Verbosity::Debug, "debug", message);
    }
}
