use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use rill::ast_printer::AstPrinter;
use rill::diagnostics::Diagnostics;
use rill::expr::NodeIds;
use rill::interpreter::Interpreter;
use rill::parser::Parser;
use rill::resolver::Resolver;
use rill::scanner::Scanner;
use rill::token::Token;

/// Exit code for invalid invocation arguments.
const EX_USAGE: u8 = 64;

/// Exit code when any lex/parse/resolve-time error occurred.
const EX_DATAERR: u8 = 65;

/// Exit code when an unrecovered runtime error occurred.
const EX_SOFTWARE: u8 = 70;

#[derive(ClapParser, Debug)]
#[command(version, about = "Rill language interpreter", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Script to run; omit (with no subcommand) to start the interactive prompt
    script: Option<PathBuf>,

    /// Enable logging to rill.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize { filename: PathBuf },

    /// Parses input from a file as a single expression and prints its AST
    Parse { filename: PathBuf },

    /// Runs input from a file as a Rill program
    Run { filename: PathBuf },
}

/// One driver session: the interpreter (globals, resolver annotations), the
/// session-wide node-id generator, and the error flags.  The REPL reuses one
/// session across lines; file mode uses it once.
struct Session {
    interpreter: Interpreter,
    ids: NodeIds,
    diag: Diagnostics,
}

impl Session {
    fn new() -> Self {
        Session {
            interpreter: Interpreter::new(),
            ids: NodeIds::new(),
            diag: Diagnostics::new(),
        }
    }

    /// Run one source buffer as a full program: scan, parse, resolve,
    /// interpret.  Interpretation is withheld entirely when any static
    /// error was reported.
    fn run(&mut self, source: &[u8]) {
        let tokens = self.scan(source);

        let mut parser = Parser::new(&tokens, &mut self.ids, &mut self.diag);
        let statements = parser.parse();

        if self.diag.had_error() {
            return;
        }

        let mut resolver = Resolver::new(&mut self.interpreter, &mut self.diag);
        resolver.resolve(&statements);

        if self.diag.had_error() {
            return;
        }

        if let Err(e) = self.interpreter.interpret(&statements) {
            self.diag.report_runtime(&e);
        }
    }

    /// Scan a buffer to the end, reporting token-level errors in-stream;
    /// lexing never aborts early.
    fn scan(&mut self, source: &[u8]) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();

        for item in Scanner::new(source) {
            match item {
                Ok(token) => tokens.push(token),
                Err(e) => self.diag.report(&e),
            }
        }

        tokens
    }
}

/// Reads the contents of a file into a Vec<u8>
fn read_file(filename: &PathBuf) -> Result<Vec<u8>> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(buf)
}

fn init_logger() -> Result<()> {
    // Create or open the log file
    let log_file = File::create("rill.log").context("Failed to create rill.log")?;

    // Configure env_logger to write to file with module path and source line
    Builder::new()
        .format(|buf, record| {
            // Strip 'rill::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("rill::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .init();

    info!("Logger initialized, writing to rill.log");
    Ok(())
}

/// Run a script file to completion, mapping the session's error flags to
/// the process exit code.
fn run_file(filename: &PathBuf) -> Result<ExitCode> {
    info!("Running file {:?}", filename);

    let buf = read_file(filename)?;

    let mut session = Session::new();
    session.run(&buf);

    if session.diag.had_error() {
        debug!("Static errors reported, exiting with code 65");
        return Ok(ExitCode::from(EX_DATAERR));
    }

    if session.diag.had_runtime_error() {
        debug!("Runtime error reported, exiting with code 70");
        return Ok(ExitCode::from(EX_SOFTWARE));
    }

    Ok(ExitCode::SUCCESS)
}

/// Interactive loop: one full program per line.  Interpreter and resolver
/// state persist across lines; the error flags do not.
fn run_prompt() -> Result<ExitCode> {
    info!("Starting interactive prompt");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut session = Session::new();

    loop {
        write!(stdout, "rill> ")?;
        stdout.flush()?;

        let mut line = String::new();
        let bytes = stdin.lock().read_line(&mut line)?;

        if bytes == 0 {
            // EOF (ctrl-D)
            writeln!(stdout)?;
            break;
        }

        session.run(line.as_bytes());

        // One bad line must not poison the next.
        session.diag.reset();
    }

    Ok(ExitCode::SUCCESS)
}

fn tokenize_file(filename: &PathBuf) -> Result<ExitCode> {
    info!("Running Tokenize subcommand");

    let buf = read_file(filename)?;
    let mut tokenized = true;

    for item in Scanner::new(&buf) {
        match item {
            Ok(token) => {
                debug!("Scanned token: {}", token);

                println!("{}", token);
            }

            Err(e) => {
                tokenized = false;

                debug!("Tokenization error: {}", e);

                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code 65");
        return Ok(ExitCode::from(EX_DATAERR));
    }

    info!("Tokenization completed successfully");
    Ok(ExitCode::SUCCESS)
}

fn parse_file(filename: &PathBuf) -> Result<ExitCode> {
    info!("Running Parse subcommand");

    let buf = read_file(filename)?;

    let mut diag = Diagnostics::new();
    let mut ids = NodeIds::new();

    let mut tokens: Vec<Token> = Vec::new();
    for item in Scanner::new(&buf) {
        match item {
            Ok(token) => tokens.push(token),
            Err(e) => diag.report(&e),
        }
    }

    if diag.had_error() {
        return Ok(ExitCode::from(EX_DATAERR));
    }

    let mut parser = Parser::new(&tokens, &mut ids, &mut diag);

    match parser.parse_expression() {
        Ok(expr) => {
            info!("Expression parsed successfully");

            println!("{}", AstPrinter::print(&expr));
            Ok(ExitCode::SUCCESS)
        }

        Err(e) => {
            debug!("Parse error: {}", e);

            eprintln!("{}", e);
            Ok(ExitCode::from(EX_DATAERR))
        }
    }
}

fn main() -> Result<ExitCode> {
    // Invalid invocation must exit 64, so clap's own error exit (2) is
    // intercepted; --help/--version still exit 0.
    let args: Cli = match Cli::try_parse() {
        Ok(args) => args,

        Err(e) => {
            let _ = e.print();

            return Ok(match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::SUCCESS
                }
                _ => ExitCode::from(EX_USAGE),
            });
        }
    };

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.command {
        Some(Commands::Tokenize { filename }) => tokenize_file(&filename),

        Some(Commands::Parse { filename }) => parse_file(&filename),

        Some(Commands::Run { filename }) => run_file(&filename),

        None => match args.script {
            Some(filename) => run_file(&filename),
            None => run_prompt(),
        },
    }
}
