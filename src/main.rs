// rufunge: Befunge-98 interpreter with a time-travel debugger

use std::fs;
use std::io;
use std::path::PathBuf;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use rufunge::interpreter::engine::Interpreter;
use rufunge::interpreter::settings::{ExecutionModel, Settings};
use rufunge::interpreter::terminal::Terminal as ProgramTerminal;
use rufunge::ui::App;

/// Command-line options
#[derive(Debug, Default, PartialEq)]
struct Options {
    settings: Settings,
    trace: bool,
    debugger: bool,
    debugger_input: Option<PathBuf>,
    program: PathBuf,
}

#[derive(Debug, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} [options] <program.b98> [args...]", program_name);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -S          sandbox: refuse i, o, = and unsafe fingerprints");
    eprintln!("  -t          run every IP on its own thread");
    eprintln!("  -W          warn about unknown instructions");
    eprintln!("  -F          disable fingerprints");
    eprintln!("  -T          trace every executed instruction (RUST_LOG overrides)");
    eprintln!("  -d          run under the debugger");
    eprintln!("  -i <file>   program input while in the debugger");
    eprintln!("  -h          show this help");
    eprintln!("  -v          show the version");
}

/// Parse everything after the executable name
///
/// Options come first; the first other argument is the program and the rest
/// are handed to it.
fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut options = Options::default();
    let mut rest = args.iter();

    let program = loop {
        let Some(arg) = rest.next() else {
            return Err("no program file provided".to_string());
        };
        match arg.as_str() {
            "-S" => options.settings.sandbox = true,
            "-t" => options.settings.execution = ExecutionModel::Threaded,
            "-W" => options.settings.warnings = true,
            "-F" => options.settings.fingerprints = false,
            "-T" => options.trace = true,
            "-d" => options.debugger = true,
            "-i" => match rest.next() {
                Some(path) => options.debugger_input = Some(PathBuf::from(path)),
                None => return Err("-i needs a file".to_string()),
            },
            "-h" => return Ok(Command::Help),
            "-v" => return Ok(Command::Version),
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("unknown option '{}'", flag));
            }
            _ => break arg,
        }
    };

    options.program = PathBuf::from(program);
    options.settings.program_args = std::iter::once(program).chain(rest).cloned().collect();
    Ok(Command::Run(options))
}

fn init_logging(trace: bool) {
    let default_level = if trace { "trace" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run_debugger(options: Options) -> Result<(), Box<dyn std::error::Error>> {
    let input = match &options.debugger_input {
        Some(path) => fs::read(path)?,
        None => Vec::new(),
    };
    let interpreter = Interpreter::from_file(
        &options.program,
        options.settings,
        ProgramTerminal::captured(&input),
    )?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(interpreter);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("rufunge");

    let options = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            print_usage(program_name);
            return;
        }
        Ok(Command::Version) => {
            println!("rufunge {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            print_usage(program_name);
            std::process::exit(1);
        }
    };

    init_logging(options.trace);

    if options.debugger {
        if let Err(e) = run_debugger(options) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let code = Interpreter::from_file(&options.program, options.settings, ProgramTerminal::stdio())
        .and_then(|mut interpreter| interpreter.run());
    match code {
        Ok(code) => std::process::exit(code as i32),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
