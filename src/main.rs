use bq_lang::cli::{self, CliError, OutputFormat, RunOptions, Verbosity};
use clap::{ArgAction, Parser as ClapParser};
use std::fs::File;
use std::io::{self, BufReader, Read};

#[derive(ClapParser)]
#[command(name = "bq")]
#[command(about = "bq - The binary query and modification tool")]
#[command(version)]
struct Cli {
    /// Increase verbosity level (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// How to print the result
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Only validate syntax, don't read input
    #[arg(long)]
    syntax_only: bool,

    /// The expression to apply on the input
    expr: Option<String>,

    /// The file to process, or '-' for stdin
    #[arg(default_value = "-")]
    file: String,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let verbosity = Verbosity::from_count(cli.verbose);

    let Some(expression) = cli.expr else {
        verbosity.info(format_args!("no expression provided, nothing to do"));
        return Ok(());
    };

    let options = RunOptions {
        expression,
        syntax_only: cli.syntax_only,
        verbosity,
    };

    let result = if cli.syntax_only {
        if cli.file != "-" {
            verbosity.warn(format_args!("--syntax-only given, ignoring input '{}'", cli.file));
        }
        cli::execute(&options, None)?
    } else if cli.file == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(CliError::NoInput);
        }
        let stdin = io::stdin();
        let mut input = stdin.lock();
        cli::execute(&options, Some(&mut input as &mut dyn Read))?
    } else {
        let file = File::open(&cli.file).map_err(|source| CliError::Open {
            path: cli.file.clone(),
            source,
        })?;
        let mut input = BufReader::new(file);
        cli::execute(&options, Some(&mut input as &mut dyn Read))?
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    result.render(&mut out, cli.output)
}
