//! Main switcher engine.

use std::path::Path;
use std::sync::Arc;

use crossbeam_channel::{select, Receiver, Sender};
use tracing::{debug, info, instrument, warn};

use showflow_capture::{
    AcquireRequest, CaptureConstraints, CapturePlatform, CaptureResult, CapturedStream,
};
use showflow_ipc::{
    OutputStatus, ShowflowConfig, SourceId, SwitcherCommand, SwitcherEvent, SwitcherSnapshot,
};
use showflow_output::{
    ConnectionMonitor, OutputChannel, OutputFrame, OutputRoute, ProgramFeed, SurfaceHost,
};

use crate::error::EngineError;
use crate::registry::SourceRegistry;
use crate::standby::StandbySlot;
use crate::switcher::SwitcherState;
use crate::views::{preview_view, program_view};

/// Messages from the capture platform back into the engine.
#[derive(Debug)]
pub enum PlatformSignal {
    /// The picker resolved an acquisition request.
    Acquired {
        request: u64,
        result: CaptureResult<CapturedStream>,
    },

    /// The device ended a source's video track.
    TrackEnded { source: SourceId },
}

/// The switcher engine. A single actor: every mutation happens on the thread
/// that calls [`run`](Self::run) (or the `handle_*` methods directly).
pub struct Engine {
    command_rx: Receiver<SwitcherCommand>,
    event_tx: Sender<SwitcherEvent>,
    signal_tx: Sender<PlatformSignal>,
    signal_rx: Receiver<PlatformSignal>,
    platform: Arc<dyn CapturePlatform>,
    constraints: CaptureConstraints,
    registry: SourceRegistry,
    switcher: SwitcherState,
    standby: StandbySlot,
    output: OutputChannel,
    monitor: ConnectionMonitor,
    next_request: u64,
    pending: usize,
    error_message: Option<String>,
}

impl Engine {
    /// Create a new engine.
    pub fn new(
        config: &ShowflowConfig,
        command_rx: Receiver<SwitcherCommand>,
        event_tx: Sender<SwitcherEvent>,
        platform: Arc<dyn CapturePlatform>,
        host: Box<dyn SurfaceHost>,
    ) -> Result<Self, EngineError> {
        let route = OutputRoute::from_config(&config.output)?;
        let (signal_tx, signal_rx) = crossbeam_channel::unbounded();

        Ok(Self {
            command_rx,
            event_tx,
            signal_tx,
            signal_rx,
            platform,
            constraints: CaptureConstraints::from(&config.capture),
            registry: SourceRegistry::new(),
            switcher: SwitcherState::new(),
            standby: StandbySlot::new(),
            output: OutputChannel::new(route, host),
            monitor: ConnectionMonitor::from_config(&config.monitor),
            next_request: 1,
            pending: 0,
            error_message: None,
        })
    }

    /// Run the engine (blocking).
    #[instrument(name = "engine_run", skip(self))]
    pub fn run(&mut self) {
        info!("Engine starting");
        self.send_event(SwitcherEvent::Ready);

        let ticker = crossbeam_channel::tick(self.monitor.interval());
        let command_rx = self.command_rx.clone();
        let signal_rx = self.signal_rx.clone();

        loop {
            select! {
                recv(command_rx) -> command => match command {
                    Ok(command) => {
                        if !self.handle_command(command) {
                            break;
                        }
                    }
                    Err(_) => {
                        info!("Command channel disconnected, shutting down");
                        self.shutdown();
                        break;
                    }
                },
                recv(signal_rx) -> signal => {
                    if let Ok(signal) = signal {
                        self.handle_signal(signal);
                    }
                },
                recv(ticker) -> _ => self.poll_output(),
            }
        }

        info!("Engine stopped");
    }

    /// Handle a command. Returns false if the engine should stop.
    pub fn handle_command(&mut self, command: SwitcherCommand) -> bool {
        debug!(?command, "Handling command");

        match command {
            SwitcherCommand::AddSource => self.add_source(),
            SwitcherCommand::RemoveSource(id) => self.remove_source(id),
            SwitcherCommand::SelectPreview(id) => self.select_preview(id),
            SwitcherCommand::Take => self.take(),
            SwitcherCommand::Cut => self.cut(),
            SwitcherCommand::UploadStandby { path } => self.upload_standby(&path),
            SwitcherCommand::OpenOutput => self.open_output(),
            SwitcherCommand::DismissError => {
                self.error_message = None;
                self.publish_state();
            }
            SwitcherCommand::GetState => self.publish_state(),
            SwitcherCommand::Shutdown => {
                self.shutdown();
                return false;
            }
        }

        true
    }

    /// Handle a platform signal.
    pub fn handle_signal(&mut self, signal: PlatformSignal) {
        match signal {
            PlatformSignal::Acquired { request, result } => self.on_acquired(request, result),
            PlatformSignal::TrackEnded { source } => {
                info!(%source, "Capture ended by device");
                self.remove_source(source);
            }
        }
    }

    /// Process every platform signal already queued.
    pub fn drain_signals(&mut self) {
        while let Ok(signal) = self.signal_rx.try_recv() {
            self.handle_signal(signal);
        }
    }

    /// One liveness-poll tick.
    pub fn poll_output(&mut self) {
        let previous = self.output.status();
        if let Some(current) = self.monitor.poll(&mut self.output) {
            self.send_event(SwitcherEvent::OutputStatusChanged { previous, current });
            self.publish_state();
        }
    }

    /// Ask the platform picker for a new source. Does not wait for it.
    #[instrument(name = "add_source", skip(self))]
    fn add_source(&mut self) {
        self.error_message = None;

        let request = AcquireRequest {
            id: self.next_request,
            constraints: self.constraints,
        };
        self.next_request += 1;
        self.pending += 1;

        let signal_tx = self.signal_tx.clone();
        self.platform.request(
            request,
            Box::new(move |result| {
                let _ = signal_tx.send(PlatformSignal::Acquired {
                    request: request.id,
                    result,
                });
            }),
        );

        debug!(request = request.id, "Capture requested");
        self.publish_state();
    }

    fn on_acquired(&mut self, request: u64, result: CaptureResult<CapturedStream>) {
        self.pending = self.pending.saturating_sub(1);

        match result {
            Ok(stream) if !stream.handle.is_live() => {
                info!(request, "Capture ended before admission, discarding");
                stream.handle.release();
            }
            Ok(stream) => {
                let admission = self.registry.insert(stream);
                if let Some(source) = self.registry.get(admission.id) {
                    let signal_tx = self.signal_tx.clone();
                    let id = admission.id;
                    source.media.on_ended(Box::new(move || {
                        let _ = signal_tx.send(PlatformSignal::TrackEnded { source: id });
                    }));
                }

                if admission.first_ever {
                    self.switcher.select_preview(admission.id);
                }
                info!(request, source = %admission.id, "Source acquired");
            }
            Err(err) if err.is_user_cancelled() => {
                debug!(request, "Capture request cancelled");
            }
            Err(err) => {
                warn!(request, %err, "Capture request failed");
                self.notify(err.to_string());
            }
        }

        self.publish_state();
    }

    /// Remove a source; if it is on air, cut to standby before it goes away.
    #[instrument(name = "remove_source", skip(self))]
    fn remove_source(&mut self, id: SourceId) {
        if !self.registry.contains(id) {
            debug!(%id, "Source already gone");
            return;
        }

        let forgotten = self.switcher.forget(id);
        if forgotten.program_cut {
            info!(%id, "Removing on-air source, cutting to standby");
            self.sync_output();
        }

        self.registry.remove(id);
        self.publish_state();
    }

    fn select_preview(&mut self, id: SourceId) {
        if !self.registry.contains(id) {
            warn!(%id, "Preview selection for unknown source ignored");
            return;
        }

        self.switcher.select_preview(id);
        self.publish_state();
    }

    #[instrument(name = "take", skip(self))]
    fn take(&mut self) {
        if !self.switcher.take() {
            debug!("Nothing in preview, take ignored");
            return;
        }

        self.sync_output();
        self.publish_state();
    }

    #[instrument(name = "cut", skip(self))]
    fn cut(&mut self) {
        self.switcher.cut();
        self.sync_output();
        self.publish_state();
    }

    fn upload_standby(&mut self, path: &Path) {
        match self.standby.upload(path) {
            Ok(image) => {
                info!(revision = image.revision, "Standby image loaded");
                self.sync_output();
            }
            Err(err) => {
                warn!(%err, "Standby upload failed");
                self.notify(err.to_string());
            }
        }

        self.publish_state();
    }

    #[instrument(name = "open_output", skip(self))]
    fn open_output(&mut self) {
        let previous = self.output.status();
        let frame = self.frame();
        let current = self.output.connect(&frame);

        if current.is_connected() {
            self.monitor.arm();
        } else {
            self.monitor.disarm();
        }
        if previous != current {
            self.send_event(SwitcherEvent::OutputStatusChanged { previous, current });
        }

        self.publish_state();
    }

    fn shutdown(&mut self) {
        info!("Releasing all sources");
        self.switcher.cut();
        self.sync_output();
        self.registry.clear();
        self.send_event(SwitcherEvent::Shutdown);
    }

    /// Authoritative output snapshot.
    pub fn frame(&self) -> OutputFrame {
        let program = self
            .switcher
            .program()
            .and_then(|id| self.registry.get(id))
            .map(|source| ProgramFeed {
                source: source.id,
                name: source.name.clone(),
                media: source.media.clone(),
            });

        OutputFrame::new(program, self.standby.current().cloned())
    }

    /// Operator-facing snapshot, including the local monitor views.
    pub fn snapshot(&self) -> SwitcherSnapshot {
        let preview_id = self.switcher.preview();
        let program_id = self.switcher.program();

        SwitcherSnapshot {
            sources: self.registry.infos(preview_id, program_id),
            preview_id,
            program_id,
            preview: preview_view(&self.switcher, &self.registry),
            program: program_view(&self.switcher, &self.registry, &self.standby),
            has_standby: self.standby.is_set(),
            output_status: self.output.status(),
            pending_acquisitions: self.pending,
            error_message: self.error_message.clone(),
        }
    }

    /// Preview/program selections.
    pub fn switcher(&self) -> &SwitcherState {
        &self.switcher
    }

    /// The gallery.
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// The standby slot.
    pub fn standby(&self) -> &StandbySlot {
        &self.standby
    }

    /// Output connection status.
    pub fn output_status(&self) -> OutputStatus {
        self.output.status()
    }

    fn sync_output(&mut self) {
        let frame = self.frame();
        self.output.push(&frame);
    }

    fn notify(&mut self, message: String) {
        self.error_message = Some(message.clone());
        self.send_event(SwitcherEvent::Notification { message });
    }

    fn publish_state(&self) {
        self.send_event(SwitcherEvent::StateChanged(Box::new(self.snapshot())));
    }

    fn send_event(&self, event: SwitcherEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            warn!("Failed to send event: {}", e);
        }
    }
}
