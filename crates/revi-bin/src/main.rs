//! revi: a modal line editor that snapshots the file on every `:wq`.

use anyhow::{Context, Result};
use clap::Parser;
use core_actions::{EditSession, Focus, SessionStep};
use core_config::{Config, ConfigContext, load_from};
use core_events::Event;
use core_input::{CrosstermInput, InputSource};
use core_render::{Frame, compose_browser, compose_editor, draw};
use core_terminal::{CrosstermBackend, TerminalBackend};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

const STATUS_ROWS: u16 = 1;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "revi", version, about = "Modal line editor with per-file version history")]
struct Args {
    /// File to edit. Created on the first `:wq` if it does not exist.
    pub path: PathBuf,
    /// Configuration file (overrides discovery of `revi.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    /// Truncate the log file and install a non-blocking fmt subscriber that
    /// writes to it. `RUST_LOG` selects what is recorded.
    fn configure_logging(&mut self, log_path: &Path) -> Result<()> {
        let dir = match log_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let Some(name) = log_path.file_name() else {
            anyhow::bail!("log path {} has no file name", log_path.display());
        };
        if log_path.exists() {
            let _ = std::fs::remove_file(log_path);
        }

        let file_appender = tracing_appender::rolling::never(dir, name);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                core_terminal::emergency_restore();
                default_panic(info);
            }));
        });
    }
}

fn compose(session: &EditSession, (cols, rows): (u16, u16)) -> Frame {
    match session.focus() {
        Focus::Editing => compose_editor(session.model(), cols, rows),
        Focus::History(browser) => compose_browser(browser, cols, rows),
    }
}

/// Render, read one event, apply it; until the session quits or input ends.
fn run_loop<I, W>(session: &mut EditSession, input: &mut I, out: &mut W, size: (u16, u16)) -> Result<()>
where
    I: InputSource,
    W: Write,
{
    let mut size = size;
    loop {
        draw(out, &compose(session, size))?;
        let Some(event) = input.next_event()? else {
            info!(target: "runtime", "input_closed");
            return Ok(());
        };
        if let Event::Resize(cols, rows) = event {
            size = (cols, rows);
        }
        if session.handle_event(&event) == SessionStep::Quit {
            info!(target: "runtime", dirty = session.model().state().dirty, "shutdown");
            return Ok(());
        }
    }
}

fn open_session(args: &Args, config: &Config, size: (u16, u16)) -> EditSession {
    let ctx = ConfigContext::new(size.1, STATUS_ROWS);
    EditSession::open(&args.path, config, usize::from(ctx.text_rows()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_from(args.config.clone())?;

    let mut startup = AppStartup::new();
    startup.configure_logging(&config.file.log.file)?;
    AppStartup::install_panic_hook();
    info!(
        target: "runtime",
        path = %args.path.display(),
        config_file = config.raw.is_some(),
        history_key = %config.history_key,
        "startup"
    );

    let title = args
        .path
        .file_name()
        .map(|n| format!("revi - {}", n.to_string_lossy()))
        .unwrap_or_else(|| "revi".to_string());
    if let Err(e) = startup.backend.set_title(&title) {
        warn!(target: "runtime", error = %e, "set_title_failed");
    }
    let mut guard = startup.backend.enter_guard()?;
    let size = guard.backend().size()?;

    let mut session = open_session(&args, &config, size);
    let mut input = CrosstermInput::new();
    let mut stdout = io::stdout();
    run_loop(&mut session, &mut input, &mut stdout, size).context("editor loop failed")
}
