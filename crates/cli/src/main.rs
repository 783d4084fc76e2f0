//! colshell: admin shell for column-family data stores.
//!
//! Three modes:
//! - **REPL mode**: `colshell [flags]` with a terminal on stdin
//! - **Pipe mode**: `echo "list" | colshell`, one command per line
//! - **Script mode**: `colshell [flags] setup.cs` runs the file, then the
//!   prompt (or stdin) unless the script called `exit`

mod commands;
mod format;
mod parse;
mod repl;
mod state;
mod value;

use std::io::{self, IsTerminal};
use std::process;
use std::sync::Arc;

use colshell_core::ShellConfig;
use colshell_executor::{Dispatcher, Formatter, SessionState};
use colshell_storage::MemStore;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

use commands::{build_cli, Flags};
use format::{ConsoleFormatter, JsonFormatter, OutputMode};
use state::ShellState;

fn main() {
    let matches = build_cli().get_matches();
    let flags = Flags::from_matches(&matches);

    let mut config = match ShellConfig::load(flags.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };
    if let Some(width) = flags.format_width {
        config.format_width = width.max(1);
    }
    config.debug |= flags.debug;

    init_logging(config.debug);

    let client = Arc::new(MemStore::connect(&config.client));
    let width = config.format_width;
    let history = config.history_path();
    let session = SessionState::new(client, config);
    let dispatcher = Dispatcher::new(session);

    let code = match flags.mode {
        OutputMode::Console => {
            let out = ConsoleFormatter::new(io::stdout(), io::stderr(), width);
            run(ShellState::new(dispatcher, out), &flags, history)
        }
        OutputMode::Json => run(
            ShellState::new(dispatcher, JsonFormatter::new(io::stdout())),
            &flags,
            history,
        ),
    };
    process::exit(code);
}

/// Errors only by default; `--debug` shows the store and dispatcher chatter.
fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::ERROR
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(debug)
        .init();
}

fn run<F: Formatter>(
    mut state: ShellState<F>,
    flags: &Flags,
    history: Option<std::path::PathBuf>,
) -> i32 {
    if let Some(ref script) = flags.script {
        info!(target: "colshell::dispatch", script = %script.display(), "Running script");
        match repl::run_script(&mut state, script) {
            Ok(Some(code)) => return code,
            Ok(None) => {}
            Err(e) => {
                eprintln!("ERROR: {}", e);
                return 1;
            }
        }
    }

    if io::stdin().is_terminal() {
        if flags.mode == OutputMode::Console {
            println!(
                "colshell {}; enter 'help<RETURN>' for a list of supported commands.",
                env!("CARGO_PKG_VERSION")
            );
            println!("Type \"exit<RETURN>\" to leave the colshell");
        }
        repl::run_repl(&mut state, history)
    } else {
        repl::run_pipe(&mut state, io::stdin().lock())
    }
}
