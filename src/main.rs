use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use logsift_engine::Document;
use logsift_tui::{map_key, AppState, Event, EventHandler, Tui};

/// Logsift - a terminal UI for inspecting JSON log exports of unknown shape
#[derive(Parser, Debug)]
#[command(name = "logsift")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON log export
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Input poll interval in milliseconds
    #[arg(long, default_value = "200")]
    tick_ms: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so the alternate screen stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = run_app(args);

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

fn run_app(args: Args) -> Result<()> {
    let mut state = AppState::new(args.file);
    load_file(&mut state);

    let mut tui = Tui::new()?;
    let events = EventHandler::new(Duration::from_millis(args.tick_ms));

    loop {
        tui.terminal()
            .draw(|frame| logsift_tui::render(frame, &mut state))?;

        match events.next()? {
            Event::Key(key) => {
                if let Some(action) = map_key(&state, key) {
                    state.apply(action);
                }
            }
            Event::Tick | Event::Resize(..) => {}
        }

        if state.reload_requested {
            state.reload_requested = false;
            load_file(&mut state);
        }
        if state.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}

/// One-shot load: read the file and install the outcome. Read failures and
/// engine rejections both land in the same error surface.
fn load_file(state: &mut AppState) {
    match std::fs::read_to_string(&state.file_path) {
        Ok(text) => {
            let name = display_name(&state.file_path);
            state.install(Document::load(&name, &text));
        }
        Err(err) => {
            state.install_error(format!(
                "could not read {}: {err}",
                state.file_path.display()
            ));
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
