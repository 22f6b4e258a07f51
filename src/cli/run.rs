//! Execute bq expressions against binary input

use std::io::{Read, Write};

use super::{CliError, OutputFormat, Verbosity};
use crate::{
    Lexer, Node, Output, Parser,
    output::{render_table, to_json, to_json_pretty},
};

/// Options for a run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// The bq expression to evaluate
    pub expression: String,
    /// Only validate syntax, don't read input
    pub syntax_only: bool,
    /// Diagnostic level printed to stderr
    pub verbosity: Verbosity,
}

/// Result of a run
#[derive(Debug)]
pub enum RunResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Expression evaluated; `node` is kept for table rendering
    Success { node: Node, output: Output },
}

/// Parse the expression and, unless only checking syntax, evaluate it over `input`.
pub fn execute(options: &RunOptions, input: Option<&mut dyn Read>) -> Result<RunResult, CliError> {
    let verbosity = options.verbosity;
    let lexer = Lexer::new(&options.expression);
    let node = Parser::new(lexer)?.parse()?;
    verbosity.info(format_args!("parsed expression: {:?}", node));

    if options.syntax_only {
        return Ok(RunResult::SyntaxValid);
    }

    let input = input.ok_or(CliError::NoInput)?;
    let output = node.evaluate(input)?;
    match output.as_sequence() {
        Some(values) => verbosity.debug(format_args!("evaluated to {} values", values.len())),
        None => verbosity.debug(format_args!("evaluated to {}", output.type_name())),
    }

    Ok(RunResult::Success { node, output })
}

impl RunResult {
    /// Print the result in the requested format.
    pub fn render<W: Write + ?Sized>(
        &self,
        w: &mut W,
        format: OutputFormat,
    ) -> Result<(), CliError> {
        match self {
            RunResult::SyntaxValid => writeln!(w, "Syntax is valid")?,
            RunResult::Success { node, output } => match format {
                OutputFormat::Table => render_table(w, node, output)?,
                OutputFormat::Json => writeln!(w, "{}", to_json(output))?,
                OutputFormat::JsonPretty => writeln!(w, "{}", to_json_pretty(output))?,
            },
        }
        Ok(())
    }
}
