use std::fs;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use miette::IntoDiagnostic;
use miette::WrapErr;
use postfix_calc::{CalcError, Calculator, History, Lexer};

mod logging;

/// Exit code for expressions that fail to validate, convert or evaluate.
const EXIT_BAD_EXPRESSION: i32 = 65;

#[derive(Parser, Debug)]
#[command(version, about = "Evaluate integer expressions through postfix notation")]
struct Args {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the tokens of an expression
    Tokenize { expression: String },
    /// Print the postfix form of an expression
    Postfix { expression: String },
    /// Evaluate each expression in turn
    Eval {
        /// Print the evaluation history afterwards
        #[arg(long)]
        history: bool,
        #[arg(required = true)]
        expressions: Vec<String>,
    },
    /// Evaluate every non-blank line of a file
    Run {
        #[arg(long)]
        history: bool,
        filename: PathBuf,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level)?;

    match args.command {
        Commands::Tokenize { expression } => {
            for token in Lexer::new(None, &expression) {
                let token = match token {
                    Ok(token) => token,
                    Err(e) => exit_with(e),
                };
                println!("{token}");
            }
            println!("EOF  null");
        }
        Commands::Postfix { expression } => {
            let postfix = Calculator::new(&expression).and_then(|calc| calc.to_postfix());
            match postfix {
                Ok(postfix) => println!("{postfix}"),
                Err(e) => exit_with(e),
            }
        }
        Commands::Eval {
            history: show_history,
            expressions,
        } => {
            let history = History::new();
            let failed = evaluate_all(expressions.iter().map(String::as_str), &history);
            finish(&history, show_history, failed);
        }
        Commands::Run {
            history: show_history,
            filename,
        } => {
            let file_contents = fs::read_to_string(&filename)
                .into_diagnostic()
                .wrap_err_with(|| format!("reading `{}` failed", filename.display()))?;

            let history = History::new();
            let lines = file_contents.lines().filter(|line| !line.trim().is_empty());
            let failed = evaluate_all(lines, &history);
            finish(&history, show_history, failed);
        }
    }
    Ok(())
}

/// Prints one result per expression; returns how many failed.
fn evaluate_all<'a>(expressions: impl Iterator<Item = &'a str>, history: &History) -> usize {
    let mut failed = 0;
    for expression in expressions {
        match Calculator::new(expression).and_then(|calc| calc.evaluate(history)) {
            Ok(result) => println!("{expression} = {result:.8}"),
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(e));
                failed += 1;
            }
        }
    }
    failed
}

fn finish(history: &History, show_history: bool, failed: usize) {
    if show_history {
        for entry in history.snapshot() {
            println!("{entry}");
        }
    }
    if failed > 0 {
        std::process::exit(EXIT_BAD_EXPRESSION);
    }
}

fn exit_with(e: CalcError) -> ! {
    eprintln!("{:?}", miette::Report::new(e));
    std::process::exit(EXIT_BAD_EXPRESSION);
}
