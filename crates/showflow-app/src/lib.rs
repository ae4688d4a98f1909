//! ShowFlow operator console library.
//!
//! Hosts the switcher engine on its own thread with an in-process capture
//! platform and output host, and drives it from line-oriented input.

mod commands;

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showflow_capture::{SimulatedOutcome, SimulatedPlatform};
use showflow_engine::Engine;
use showflow_ipc::{
    command_channel, event_channel, ShowflowConfig, SourceId, SwitcherCommand, SwitcherEvent,
    SwitcherSnapshot,
};
use showflow_output::{FallbackContent, LoopbackHost};

pub use commands::{parse, ConsoleInput, HELP};

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV: &str = "SHOWFLOW_CONFIG";

const DEFAULT_LOG_FILTER: &str =
    "showflow=info,showflow_lib=info,showflow_engine=info,showflow_capture=info,showflow_output=info";

/// Console state shared with the event printer.
pub struct AppState {
    pub command_tx: Sender<SwitcherCommand>,
    pub platform: SimulatedPlatform,
    pub host: LoopbackHost,
    pub snapshot: Arc<Mutex<Option<SwitcherSnapshot>>>,
}

impl AppState {
    fn send(&self, command: SwitcherCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .context("Failed to send command")
    }

    fn source_at(&self, index: usize) -> Option<SourceId> {
        self.snapshot
            .lock()
            .as_ref()
            .and_then(|snapshot| snapshot.sources.get(index))
            .map(|source| source.id)
    }

    /// Apply one console input. Returns false when the console should exit.
    pub fn apply(&self, input: ConsoleInput) -> Result<bool> {
        match input {
            ConsoleInput::Add(label) => {
                self.platform.script(SimulatedOutcome::Grant { label });
                self.send(SwitcherCommand::AddSource)?;
            }
            ConsoleInput::Cancel => {
                self.platform.script(SimulatedOutcome::Cancel);
                self.send(SwitcherCommand::AddSource)?;
            }
            ConsoleInput::Fail(message) => {
                self.platform.script(SimulatedOutcome::Fail(message));
                self.send(SwitcherCommand::AddSource)?;
            }
            ConsoleInput::Preview(index) => match self.source_at(index) {
                Some(id) => self.send(SwitcherCommand::SelectPreview(id))?,
                None => println!("no source #{}", index + 1),
            },
            ConsoleInput::Remove(index) => match self.source_at(index) {
                Some(id) => self.send(SwitcherCommand::RemoveSource(id))?,
                None => println!("no source #{}", index + 1),
            },
            ConsoleInput::Take => self.send(SwitcherCommand::Take)?,
            ConsoleInput::Cut => self.send(SwitcherCommand::Cut)?,
            ConsoleInput::Standby(path) => self.send(SwitcherCommand::UploadStandby { path })?,
            ConsoleInput::Open => self.send(SwitcherCommand::OpenOutput)?,
            ConsoleInput::CloseOutput => match self.host.latest() {
                Some(view) => view.close(),
                None => println!("no output surface"),
            },
            ConsoleInput::Block(blocked) => self.host.set_blocked(blocked),
            ConsoleInput::EndTrack(index) => match self.platform.tracks().get(index) {
                Some(track) => track.end(),
                None => println!("no track #{}", index + 1),
            },
            ConsoleInput::Dismiss => self.send(SwitcherCommand::DismissError)?,
            ConsoleInput::State => self.send(SwitcherCommand::GetState)?,
            ConsoleInput::Help => println!("{HELP}"),
            ConsoleInput::Quit => {
                self.send(SwitcherCommand::Shutdown)?;
                return Ok(false);
            }
        }

        Ok(true)
    }
}

/// Initialize logging.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Load configuration from the first argument or `SHOWFLOW_CONFIG`.
fn load_config() -> Result<ShowflowConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok());

    match path {
        Some(path) => ShowflowConfig::load(&path)
            .with_context(|| format!("Failed to load config from {path}")),
        None => Ok(ShowflowConfig::default()),
    }
}

/// Print engine events and remember the latest snapshot.
fn print_events(
    event_rx: Receiver<SwitcherEvent>,
    host: LoopbackHost,
    snapshot: Arc<Mutex<Option<SwitcherSnapshot>>>,
) {
    for event in event_rx {
        match event {
            SwitcherEvent::StateChanged(state) => {
                print_snapshot(&state, &host);
                *snapshot.lock() = Some(*state);
            }
            SwitcherEvent::OutputStatusChanged { previous, current } => {
                println!("output: {} -> {}", previous.message(), current.message());
            }
            SwitcherEvent::Notification { message } => println!("error: {message}"),
            SwitcherEvent::Ready => println!("ready (type 'help')"),
            SwitcherEvent::Shutdown => break,
        }
    }
}

fn print_snapshot(state: &SwitcherSnapshot, host: &LoopbackHost) {
    for (index, source) in state.sources.iter().enumerate() {
        let preview = if source.is_preview { "PVW" } else { "   " };
        let live = if source.is_live { "PGM" } else { "   " };
        println!("  {:>2}. [{preview}] [{live}] {}", index + 1, source.name);
    }
    println!(
        "  {} available, program: {}, take: {}, output: {}",
        state.available(),
        serde_json::to_string(&state.program).unwrap_or_default(),
        if state.can_take() { "ready" } else { "-" },
        state.output_status.message()
    );

    if let Some(view) = host.latest().filter(|view| !view.is_closed()) {
        let layers = view.layers();
        let shown = if layers.video.visible {
            format!(
                "video (stream {})",
                layers.video.media.map(|m| m.stream_id()).unwrap_or_default()
            )
        } else {
            match layers.fallback.content {
                FallbackContent::Image(image) => format!("standby image rev {}", image.revision),
                FallbackContent::Placeholder => "placeholder".to_string(),
            }
        };
        println!("  surface {}: {shown} + \"{}\"", view.url(), layers.watermark);
    }
}

/// Run the console until `quit` or end of input.
pub fn run() -> Result<()> {
    init_logging();
    info!("ShowFlow starting");

    let config = load_config()?;

    // Create IPC channels
    let (command_tx, command_rx) = command_channel();
    let (event_tx, event_rx) = event_channel();

    let platform = SimulatedPlatform::new();
    let host = LoopbackHost::new();

    let mut engine = Engine::new(
        &config,
        command_rx,
        event_tx,
        Arc::new(platform.clone()),
        Box::new(host.clone()),
    )
    .context("Failed to create engine")?;

    let engine_thread = thread::spawn(move || engine.run());

    let state = AppState {
        command_tx,
        platform,
        host: host.clone(),
        snapshot: Arc::new(Mutex::new(None)),
    };

    let snapshot = Arc::clone(&state.snapshot);
    let printer = thread::spawn(move || print_events(event_rx, host, snapshot));

    let stdin = io::stdin();
    let mut running = true;
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        match parse(&line) {
            Ok(input) => {
                running = state.apply(input)?;
                if !running {
                    break;
                }
            }
            Err(e) => println!("{e}"),
        }
        io::stdout().flush().ok();
    }

    if running {
        state.send(SwitcherCommand::Shutdown)?;
    }

    if engine_thread.join().is_err() {
        warn!("Engine thread panicked");
    }
    if printer.join().is_err() {
        warn!("Event printer panicked");
    }

    info!("ShowFlow stopped");
    Ok(())
}
