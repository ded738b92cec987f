use std::{
    fs,
    io::{self, BufRead, IsTerminal, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    thread,
};

use clap::Parser;
use combicalc::{
    error::Error,
    interpreter::{Config, DEFAULT_MAX_DEPTH, persist, session::Session, value::core::Value},
};
use tracing_subscriber::EnvFilter;

/// Stack reserved for the interpreter thread.
const STACK_SIZE: usize = 64 * 1024 * 1024;

/// combicalc is an array calculator with closures, curried calls and
/// broadcasting arithmetic.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells combicalc to read `contents` as a path to a script of one
    /// statement per line.
    #[arg(short, long)]
    file: bool,

    /// Pipe mode prints only the value of the last statement.
    #[arg(short, long)]
    pipe_mode: bool,

    /// Prints the parse tree of every input before evaluating it.
    #[arg(long)]
    debug: bool,

    /// Deepest expression nesting allowed during evaluation.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Restores a session saved with `--save` before running.
    #[arg(long, value_name = "PATH")]
    load: Option<PathBuf>,

    /// Saves the session to this path when done.
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,

    /// A program, or with `--file` a script path. Reads statements from
    /// standard input when omitted.
    contents: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
                             .with_writer(io::stderr)
                             .init();

    let args = Args::parse();

    let worker = thread::Builder::new().name("interpreter".to_string())
                                       .stack_size(STACK_SIZE)
                                       .spawn(move || run(&args));

    match worker.map(thread::JoinHandle::join) {
        Ok(Ok(code)) => code,
        Ok(Err(_)) => {
            eprintln!("The interpreter thread panicked.");
            ExitCode::FAILURE
        },
        Err(e) => {
            eprintln!("Failed to start the interpreter thread: {e}");
            ExitCode::FAILURE
        },
    }
}

fn run(args: &Args) -> ExitCode {
    let config = Config { max_depth: args.max_depth };

    let mut session = match &args.load {
        Some(path) => match load(path, config) {
            Ok(session) => session,
            Err(e) => {
                eprintln!("Failed to load '{}': {e}", path.display());
                return ExitCode::FAILURE;
            },
        },
        None => Session::with_config(config),
    };

    let code = match &args.contents {
        Some(contents) if args.file => match fs::read_to_string(contents) {
            Ok(script) => run_lines(&mut session, args, script.lines()),
            Err(_) => {
                eprintln!("Failed to read the input file '{contents}'. Perhaps this file does not exist?");
                return ExitCode::FAILURE;
            },
        },
        Some(contents) => run_lines(&mut session, args, std::iter::once(contents.as_str())),
        None => repl(&mut session, args),
    };

    if let Some(path) = &args.save
       && let Err(e) = save(&session, path)
    {
        eprintln!("Failed to save '{}': {e}", path.display());
        return ExitCode::FAILURE;
    }

    code
}

/// Evaluates each non-empty line. Errors are reported and the next line still
/// runs.
fn run_lines<'a>(session: &mut Session, args: &Args, lines: impl Iterator<Item = &'a str>) -> ExitCode {
    let mut code = ExitCode::SUCCESS;
    let mut last = None;

    for line in lines.filter(|line| !line.trim().is_empty()) {
        match step(session, args, line) {
            Ok(Some(value)) if args.pipe_mode => last = Some(value),
            Ok(Some(value)) => println!("\t{value}"),
            Ok(None) => {},
            Err(e) => {
                eprintln!("{e}");
                code = ExitCode::FAILURE;
            },
        }
    }

    if let Some(value) = last {
        println!("{value}");
    }
    code
}

fn repl(session: &mut Session, args: &Args) -> ExitCode {
    let interactive = io::stdin().is_terminal();
    let mut stdin = io::stdin().lock();
    let mut line = String::new();

    for count in 1_u64.. {
        if interactive {
            print!("{count}: ");
            if io::stdout().flush().is_err() {
                return ExitCode::FAILURE;
            }
        }

        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {},
            Err(e) => {
                eprintln!("Failed to read from standard input: {e}");
                return ExitCode::FAILURE;
            },
        }

        if line.trim().is_empty() {
            continue;
        }

        match step(session, args, &line) {
            Ok(Some(value)) => println!("\t{value}"),
            Ok(None) => {},
            Err(e) => eprintln!("{e}"),
        }
    }

    ExitCode::SUCCESS
}

fn step(session: &mut Session, args: &Args, text: &str) -> Result<Option<Value>, Error> {
    if args.debug {
        println!("{}", Session::tree(text)?);
    }
    session.evaluate(text)
}

fn load(path: &Path, config: Config) -> Result<Session, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let snapshot = persist::from_json(&text)?;
    Ok(Session::from_snapshot(&snapshot, config)?)
}

fn save(session: &Session, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(path, persist::to_json(&session.snapshot())?)?;
    Ok(())
}
