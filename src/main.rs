//! # CineBrew
//!
//! Compile and run a CineBrew source file.

use ansi_term::Style;
use cinebrew::lang::{ast::Program, lex, parse, Error, Keywords};
use cinebrew::mach::{Builtins, Compiler, Config, Event, Runtime};
use cinebrew::error;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "cinebrew", about = "Compile and run CineBrew programs", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Source file to run
    file: Option<PathBuf>,

    #[command(flatten)]
    options: Options,
}

#[derive(Subcommand)]
enum Command {
    /// Compile and run a source file
    Run {
        file: PathBuf,
        #[command(flatten)]
        options: Options,
    },
}

#[derive(clap::Args, Clone, Default)]
struct Options {
    /// Print the token stream
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree
    #[arg(long)]
    ast: bool,

    /// Print the generated bytecode
    #[arg(long)]
    bytecode: bool,

    /// Call `update` and `render` this many times after the main run
    #[arg(long, default_value_t = 0)]
    frames: usize,

    /// Seed for the random built-in
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let (file, options) = match cli.command {
        Some(Command::Run { file, options }) => (file, options),
        None => match cli.file {
            Some(file) => (file, cli.options),
            None => {
                eprintln!("{}", bold(&error!(FileNotFound; "NO SOURCE FILE GIVEN")));
                std::process::exit(2);
            }
        },
    };

    let filter = if options.verbose {
        "cinebrew=debug"
    } else {
        "cinebrew=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    if let Err(error) = ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    }) {
        tracing::warn!(%error, "unable to install Ctrl-C handler");
    }

    let failed = match run_file(&file, &options, interrupted) {
        Ok(failed) => failed,
        Err(errors) => {
            for error in errors.iter() {
                eprintln!("{}", bold(error));
            }
            true
        }
    };
    if failed {
        std::process::exit(1);
    }
}

fn bold(error: &Error) -> String {
    Style::new().bold().paint(error.to_string()).to_string()
}

fn load(file: &Path) -> Result<String, Error> {
    std::fs::read_to_string(file).map_err(|error| {
        let msg = format!("{}: {}", file.display(), error);
        match error.kind() {
            std::io::ErrorKind::NotFound => error!(FileNotFound; msg),
            _ => error!(InternalError; msg),
        }
    })
}

/// `Ok(true)` when the program stopped on a fatal runtime error.
fn run_file(
    file: &Path,
    options: &Options,
    interrupted: Arc<AtomicBool>,
) -> Result<bool, Vec<Error>> {
    let source = load(file).map_err(|e| vec![e])?;
    let config = Config {
        seed: options.seed,
        ..Config::default()
    };
    let keywords = Keywords::new();
    let builtins = Builtins::from_config(&config);

    if options.tokens || options.ast {
        let tokens = lex(&source, &keywords).map_err(|e| vec![e])?;
        if options.tokens {
            for token in &tokens {
                println!("{}", token);
            }
        }
        if options.ast {
            let program: Program = parse(&tokens).map_err(|e| vec![e])?;
            print!("{}", program);
        }
    }

    let bytecode = Compiler::new(&keywords, &builtins).compile(&source)?;
    if options.bytecode {
        for (addr, line) in bytecode.iter().enumerate() {
            println!("{:>5}  {}", addr, line);
        }
    }

    let cycles = config.cycles.max(1);
    let mut runtime = Runtime::with_config(builtins, config);
    runtime.load(&bytecode);
    let mut failed = false;
    loop {
        if interrupted.load(Ordering::SeqCst) {
            runtime.interrupt();
            interrupted.store(false, Ordering::SeqCst);
        }
        match runtime.execute(cycles) {
            Event::Print(s) => print!("{}", s),
            Event::Running => {}
            Event::Stopped => break,
            Event::Error(error) => {
                eprintln!("{}", bold(&error));
                failed = true;
            }
        }
    }

    for _ in 0..options.frames {
        if failed || interrupted.load(Ordering::SeqCst) {
            break;
        }
        for name in &["update", "render"] {
            if let Err(error) = runtime.call_function(name) {
                eprintln!("{}", bold(&error));
                failed = true;
            }
            print!("{}", runtime.take_output());
        }
    }
    Ok(failed)
}
