use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rox::ast_printer::AstPrinter;
use rox::error::{Diagnostics, LoxError};
use rox::interpreter::Interpreter;
use rox::lox::{self, Lox, Outcome};
use rox::parser::Parser;
use rox::scanner::{scan_tokens, Scanner};

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to rox.log (filter with RUST_LOG)
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: Option<PathBuf>,

        /// Print each token as a JSON object instead
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file as a single expression and prints its AST
    Parse { filename: Option<PathBuf> },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: Option<PathBuf> },

    /// Runs a Lox program from a file, or an interactive prompt without one
    Run { filename: Option<PathBuf> },
}

fn init_logger() -> Result<()> {
    let log_file = File::create("rox.log").context("Failed to create rox.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("rox::").unwrap_or(module);
            writeln!(
                buf,
                "{} [{}:{}] {} - {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                module,
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter_level(log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to rox.log");
    Ok(())
}

fn read_file(filename: PathBuf) -> Result<String> {
    lox::read_source(&filename).with_context(|| format!("Failed to read file {:?}", filename))
}

fn report(errors: &[LoxError]) {
    for e in errors {
        eprintln!("{}", e);
    }
}

fn tokenize(filename: PathBuf, json: bool) -> Result<i32> {
    let source = read_file(filename)?;
    let mut tokenized = true;

    for result in Scanner::new(&source) {
        match result {
            Ok(token) if json => println!("{}", serde_json::to_string(&token)?),
            Ok(token) => println!("{}", token),
            Err(e) => {
                tokenized = false;
                eprintln!("{}", e);
            }
        }
    }

    Ok(if tokenized { lox::EXIT_OK } else { lox::EXIT_STATIC_ERROR })
}

fn parse(filename: PathBuf) -> Result<i32> {
    let source = read_file(filename)?;
    let mut diagnostics = Diagnostics::new();

    let tokens = scan_tokens(&source, &mut diagnostics);
    let expr = Parser::new(&tokens, &mut diagnostics).parse_expression();

    match expr {
        Some(expr) if !diagnostics.had_error() => {
            println!("{}", AstPrinter::print(&expr));
            Ok(lox::EXIT_OK)
        }
        _ => {
            report(diagnostics.errors());
            Ok(lox::EXIT_STATIC_ERROR)
        }
    }
}

fn evaluate(filename: PathBuf) -> Result<i32> {
    let source = read_file(filename)?;
    let mut diagnostics = Diagnostics::new();

    let tokens = scan_tokens(&source, &mut diagnostics);
    let expr = Parser::new(&tokens, &mut diagnostics).parse_expression();

    let expr = match expr {
        Some(expr) if !diagnostics.had_error() => expr,
        _ => {
            report(diagnostics.errors());
            return Ok(lox::EXIT_STATIC_ERROR);
        }
    };

    match Interpreter::new().evaluate(&expr) {
        Ok(value) => {
            println!("{}", value);
            Ok(lox::EXIT_OK)
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(lox::EXIT_RUNTIME_ERROR)
        }
    }
}

fn run_file(filename: PathBuf) -> Result<i32> {
    let source = read_file(filename)?;
    let outcome = Lox::new().run(&source);

    match &outcome {
        Outcome::Success => info!("Program executed successfully"),
        Outcome::StaticErrors(errors) => report(errors),
        Outcome::RuntimeError(e) => eprintln!("{}", e),
    }

    Ok(outcome.exit_code())
}

/// One line per run.  Syntax errors only affect their own line; a runtime
/// error is reported and the prompt carries on, but colours the exit status.
fn run_prompt() -> Result<i32> {
    let mut session = Lox::new();
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        // Only a truly empty line ends the session; blank-looking input runs.
        if stdin.lock().read_line(&mut line)? == 0 || is_end_of_session(&line) {
            break;
        }

        match session.run(&line) {
            Outcome::Success => {}
            Outcome::StaticErrors(errors) => report(&errors),
            Outcome::RuntimeError(e) => eprintln!("{}", e),
        }
    }

    Ok(if session.had_runtime_error() {
        lox::EXIT_RUNTIME_ERROR
    } else {
        lox::EXIT_OK
    })
}

fn is_end_of_session(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']).is_empty()
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        Builder::new().filter_level(log::LevelFilter::Off).init();
    }

    info!("CLI arguments: {:?}", args);

    let code = match args.commands {
        Commands::Run { filename: None } => run_prompt()?,
        Commands::Run {
            filename: Some(filename),
        } => run_file(filename)?,

        Commands::Tokenize {
            filename: Some(filename),
            json,
        } => tokenize(filename, json)?,
        Commands::Parse {
            filename: Some(filename),
        } => parse(filename)?,
        Commands::Evaluate {
            filename: Some(filename),
        } => evaluate(filename)?,

        _ => {
            info!("No filepath provided");
            println!("No input filepath was provided. Exiting...");
            lox::EXIT_OK
        }
    };

    debug!("Exiting with code {}", code);

    if code != lox::EXIT_OK {
        process::exit(code);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::is_end_of_session;

    #[test]
    fn only_an_empty_line_ends_the_prompt() {
        assert!(is_end_of_session("\n"));
        assert!(is_end_of_session("\r\n"));
        assert!(is_end_of_session(""));

        assert!(!is_end_of_session("   \n"));
        assert!(!is_end_of_session("\t\n"));
        assert!(!is_end_of_session("print 1;\n"));
    }
}
