//! Logix CLI: Command-Line Tools
//!
//! The `lx` command-line tool provides:
//! - `lx compile [ROOT]` - Lex and parse every `test.lx` under a project root
//! - `lx lex FILE` - Print the token stream of one file
//! - `lx parse FILE` - Print the syntax tree of one file
//!
//! Rendered issues go to stderr. The exit code is 1 when any error was
//! reported.

mod driver;
mod timer;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use logix_log::{debug, Level};
use logix_syntax::{Diagnostics, Lexer, SourceMapManager, TreePrinter};

use crate::driver::{Compiler, DEFAULT_SUFFIX};

#[derive(Parser, Debug)]
#[command(name = "lx", version, about = "Logix compiler front end", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(
        long,
        value_name = "LEVEL",
        global = true,
        help = "Log level: error, warn, info, debug or trace (overrides LOGIX_LOG)"
    )]
    log_level: Option<Level>,

    #[arg(long, global = true, help = "Shorthand for --log-level debug")]
    debug: bool,

    #[arg(long, global = true, help = "Disable ANSI colors in logs and issues")]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile every matching file under a project root
    Compile {
        #[arg(default_value = ".")]
        root: PathBuf,

        #[arg(long, value_name = "NAME", default_value = DEFAULT_SUFFIX)]
        suffix: String,
    },

    /// Print the token stream of one file
    Lex { file: PathBuf },

    /// Print the syntax tree of one file
    Parse { file: PathBuf },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    configure_logging(&cli);
    let ok = execute(cli)?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn configure_logging(cli: &Cli) {
    logix_log::init_from_env();
    if let Some(level) = cli.log_level {
        logix_log::set_level(level);
    }
    if cli.debug {
        logix_log::set_level(Level::Debug);
    }
    logix_log::get_logger().set_colors(!cli.no_color);
    debug!("log level {}", logix_log::get_logger().level());
}

fn execute(cli: Cli) -> Result<bool> {
    let colors = !cli.no_color;
    match cli.command {
        Command::Compile { root, suffix } => {
            let mut compiler = Compiler::new(&root, suffix).with_colors(colors);
            let ok = compiler
                .compile()
                .with_context(|| format!("failed to compile {}", root.display()))?;
            debug!("{} sources loaded", compiler.sources().len());
            Ok(ok)
        }
        Command::Lex { file } => lex_file(&file, colors),
        Command::Parse { file } => parse_file(&file, colors),
    }
}

fn lex_file(file: &Path, colors: bool) -> Result<bool> {
    let mut sources = SourceMapManager::new(root_of(file));
    let source = sources
        .load_file(file)
        .with_context(|| format!("failed to lex {}", file.display()))?;

    let mut diagnostics = Diagnostics::new();
    let mut lexer = Lexer::new(Arc::clone(&source));
    for token in lexer.tokenize(&mut diagnostics) {
        println!("{token}");
    }

    eprint!("{}", diagnostics.render_all(colors));
    Ok(!diagnostics.has_errors())
}

fn parse_file(file: &Path, colors: bool) -> Result<bool> {
    let mut compiler = Compiler::new(root_of(file), DEFAULT_SUFFIX).with_colors(colors);
    let program = compiler
        .parse_file(file)
        .with_context(|| format!("failed to parse {}", file.display()))?;

    if let Some(program) = program {
        print!("{}", TreePrinter::new().print_stmt(&program));
    }
    compiler.report();
    Ok(!compiler.diagnostics().has_errors())
}

/// Directory used to label a single file in issue locators.
fn root_of(file: &Path) -> PathBuf {
    file.parent().map(Path::to_path_buf).unwrap_or_default()
}
