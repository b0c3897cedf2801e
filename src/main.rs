use crossterm::event::{self, Event};
use marknote::app::Workbench;
use marknote::kernel::services::adapters::{load_settings, AsyncRuntime, LocalFileProvider};
use marknote::kernel::services::kernel_bus;
use marknote::tui::{install_termination_signals, TerminalGuard, TerminationSignal};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;

mod logging;

const USAGE: &str = "\
usage: marknote [NOTES_DIR | NOTE.md]

  NOTES_DIR   directory of markdown notes (default: settings, then ./notes)
  NOTE.md     open this note; its directory becomes the notes directory

options:
  -h, --help      print this help
  -V, --version   print the version";

#[derive(Debug, Clone, PartialEq, Eq)]
struct StartupPaths {
    /// `None` means the configured notes directory.
    notes_dir: Option<PathBuf>,
    open_file: Option<PathBuf>,
}

fn resolve_startup_paths(cwd: &Path, arg: Option<&str>) -> io::Result<StartupPaths> {
    let Some(arg) = arg else {
        return Ok(StartupPaths {
            notes_dir: None,
            open_file: None,
        });
    };

    let raw = PathBuf::from(arg);
    let path = if raw.is_absolute() { raw } else { cwd.join(raw) };
    let meta = std::fs::metadata(&path).map_err(|e| {
        io::Error::new(e.kind(), format!("{}: {}", path.display(), e))
    })?;

    if meta.is_dir() {
        return Ok(StartupPaths {
            notes_dir: Some(path),
            open_file: None,
        });
    }

    let notes_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf());
    Ok(StartupPaths {
        notes_dir: Some(notes_dir),
        open_file: Some(path),
    })
}

fn main() -> io::Result<()> {
    let arg = std::env::args().nth(1);
    match arg.as_deref() {
        Some("-h") | Some("--help") => {
            println!("{USAGE}");
            return Ok(());
        }
        Some("-V") | Some("--version") => {
            println!("marknote {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    let cwd = std::env::current_dir()?;
    let startup = resolve_startup_paths(&cwd, arg.as_deref())?;

    let mut logging = logging::init();
    let log_rx = logging.as_mut().and_then(|guard| guard.take_log_rx());

    let settings = load_settings().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "settings unreadable, using defaults");
        Default::default()
    });
    let mut config = settings.to_config();
    if let Some(dir) = startup.notes_dir {
        config.notes_dir = dir;
    }
    if config.notes_dir.is_relative() {
        config.notes_dir = cwd.join(&config.notes_dir);
    }
    std::fs::create_dir_all(&config.notes_dir)?;
    tracing::info!(
        notes_dir = %config.notes_dir.display(),
        log_dir = ?logging.as_ref().map(|guard| guard.log_dir().display().to_string()),
        "starting"
    );

    let (bus_tx, bus_rx) = kernel_bus();
    let runtime = AsyncRuntime::new(
        Arc::new(LocalFileProvider::new()),
        bus_tx,
        config.note_extension.clone(),
    )?;

    let guard = TerminalGuard::new()?;
    guard.restore_on_panic();
    let (signal_tx, signal_rx) = mpsc::channel::<TerminationSignal>();
    let _signals = install_termination_signals(guard.restorer(), signal_tx)?;

    let session_span =
        tracing::info_span!("session", notes_dir = %config.notes_dir.display());
    let _session = session_span.enter();

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let mut workbench = Workbench::new(config, runtime, bus_rx, log_rx);
    if let Some(file) = startup.open_file {
        workbench.open_initial(file);
    }

    let mut exit_signal = None;
    let mut dirty = true;
    while !workbench.should_quit() {
        if let Ok(signal) = signal_rx.try_recv() {
            exit_signal = Some(signal);
            workbench.request_quit();
            break;
        }

        if dirty {
            terminal.draw(|frame| workbench.render(frame))?;
            dirty = false;
        }

        if event::poll(workbench.poll_timeout())? {
            match event::read()? {
                Event::Key(key) => dirty |= workbench.handle_key(key),
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
        dirty |= workbench.tick();
    }

    // flush whatever is still debounced before the terminal goes away
    workbench.shutdown();
    drop(terminal);
    drop(guard);

    tracing::info!("exiting");
    drop(logging);
    if let Some(signal) = exit_signal {
        std::process::exit(signal.exit_code());
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/cli_startup_paths.rs"]
mod cli_startup_paths_tests;
