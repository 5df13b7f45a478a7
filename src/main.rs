/*!
 * Process Monitor - Main Entry Point
 *
 * Line-oriented console over the process store:
 * - control and filter commands
 * - statistics and process reports
 * - simulated fork/exit events
 */

use miette::{IntoDiagnostic, Report};
use process_monitor::frontend::{Frontend, Reply};
use process_monitor::monitor::{init_tracing, MonitorController};
use process_monitor::MonitorConfig;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;
use tracing::info;

fn main() -> miette::Result<()> {
    let config = MonitorConfig::from_env()?;
    init_tracing(config.trace_json);

    info!("Process monitor starting...");
    info!(
        capacity = config.capacity,
        list_limit = config.list_limit,
        "Configuration loaded"
    );

    let store = Arc::new(config.store_builder().build());
    let controller = MonitorController::new(store.clone());
    let frontend = Frontend::new(controller, config.list_limit);

    info!("Ready, type 'help' for commands");

    let interactive = io::stdin().is_terminal();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        if interactive {
            write!(stdout, "procmon> ").into_diagnostic()?;
            stdout.flush().into_diagnostic()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.into_diagnostic()?;
        if line.trim().is_empty() {
            continue;
        }

        match frontend.execute_line(&line) {
            Ok(Reply::Text(text)) => {
                writeln!(stdout, "{}", text.trim_end()).into_diagnostic()?;
            }
            Ok(Reply::Quit) => break,
            Err(err) => eprintln!("{:?}", Report::new(err)),
        }
    }

    store.shutdown();
    info!("Process monitor stopped");
    Ok(())
}
