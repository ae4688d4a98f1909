//! In-process capture platform.
//!
//! Grants streams without a real picker. Outcomes can be scripted ahead of a
//! request, and requests can be held until [`SimulatedPlatform::resolve_next`]
//! to model a picker the operator has not answered yet.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::CaptureError;
use crate::platform::{AcquireReply, AcquireRequest, CapturePlatform, CapturedStream};
use crate::track::{CaptureTrack, EndedCallback, MediaHandle};

/// How the simulated picker answers a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedOutcome {
    /// Grant a stream, optionally labelled.
    Grant { label: Option<String> },

    /// The operator dismissed the picker.
    Cancel,

    /// The platform failed with this message.
    Fail(String),
}

impl Default for SimulatedOutcome {
    fn default() -> Self {
        Self::Grant { label: None }
    }
}

/// A fake video track.
pub struct SimulatedTrack {
    stream_id: u64,
    label: Option<String>,
    ended: AtomicBool,
    stopped: AtomicBool,
    callbacks: Mutex<Vec<EndedCallback>>,
}

impl SimulatedTrack {
    fn new(stream_id: u64, label: Option<String>) -> Self {
        Self {
            stream_id,
            label,
            ended: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Platform stream identifier.
    pub fn stream_id(&self) -> u64 {
        self.stream_id
    }

    /// Whether the application released this track.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// End the track from the device side ("stop sharing").
    pub fn end(&self) {
        if self.ended.swap(true, Ordering::SeqCst) {
            return;
        }
        info!(stream_id = self.stream_id, "Track ended by device");
        let callbacks = std::mem::take(&mut *self.callbacks.lock());
        for callback in callbacks {
            callback();
        }
    }
}

impl CaptureTrack for SimulatedTrack {
    fn label(&self) -> Option<String> {
        self.label.clone()
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.ended.store(true, Ordering::SeqCst);
        self.callbacks.lock().clear();
    }

    fn is_ended(&self) -> bool {
        self.ended.load(Ordering::SeqCst)
    }

    fn on_ended(&self, callback: EndedCallback) {
        {
            let mut callbacks = self.callbacks.lock();
            if !self.is_ended() {
                callbacks.push(callback);
                return;
            }
        }
        callback();
    }
}

#[derive(Default)]
struct SimulatedState {
    secure: bool,
    deferred: bool,
    script: VecDeque<SimulatedOutcome>,
    pending: VecDeque<(AcquireRequest, AcquireReply)>,
    tracks: Vec<Arc<SimulatedTrack>>,
    requests: Vec<AcquireRequest>,
    next_stream_id: u64,
}

/// Capture platform that runs entirely in-process.
#[derive(Clone)]
pub struct SimulatedPlatform {
    state: Arc<Mutex<SimulatedState>>,
}

impl SimulatedPlatform {
    /// A platform in a secure context that answers requests immediately.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimulatedState {
                secure: true,
                next_stream_id: 1,
                ..Default::default()
            })),
        }
    }

    /// Mark the context as secure or not. Insecure contexts fail every request.
    pub fn set_secure(&self, secure: bool) {
        self.state.lock().secure = secure;
    }

    /// Hold requests until [`resolve_next`](Self::resolve_next) is called.
    pub fn set_deferred(&self, deferred: bool) {
        self.state.lock().deferred = deferred;
    }

    /// Queue the outcome of a future request. Unscripted requests are granted
    /// without a label.
    pub fn script(&self, outcome: SimulatedOutcome) {
        self.state.lock().script.push_back(outcome);
    }

    /// Number of requests waiting on the picker.
    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Answer the oldest held request. Returns false if none is pending.
    pub fn resolve_next(&self) -> bool {
        let next = {
            let mut state = self.state.lock();
            state.pending.pop_front().map(|(request, reply)| {
                let outcome = state.script.pop_front().unwrap_or_default();
                (request, reply, outcome)
            })
        };

        match next {
            Some((request, reply, outcome)) => {
                self.answer(request, reply, outcome);
                true
            }
            None => false,
        }
    }

    /// Every track handed out so far, in grant order.
    pub fn tracks(&self) -> Vec<Arc<SimulatedTrack>> {
        self.state.lock().tracks.clone()
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<AcquireRequest> {
        self.state.lock().requests.clone()
    }

    fn answer(&self, request: AcquireRequest, reply: AcquireReply, outcome: SimulatedOutcome) {
        debug!(request = request.id, ?outcome, "Resolving capture request");

        let result = match outcome {
            SimulatedOutcome::Grant { label } => {
                let track = {
                    let mut state = self.state.lock();
                    let stream_id = state.next_stream_id;
                    state.next_stream_id += 1;
                    let track = Arc::new(SimulatedTrack::new(stream_id, label));
                    state.tracks.push(Arc::clone(&track));
                    track
                };
                let stream_id = track.stream_id();
                Ok(CapturedStream {
                    handle: MediaHandle::new(stream_id, track),
                    has_audio: request.constraints.audio,
                })
            }
            SimulatedOutcome::Cancel => Err(CaptureError::Cancelled),
            SimulatedOutcome::Fail(message) => Err(CaptureError::Platform(message)),
        };

        reply(result);
    }
}

impl Default for SimulatedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl CapturePlatform for SimulatedPlatform {
    fn request(&self, request: AcquireRequest, reply: AcquireReply) {
        let immediate = {
            let mut state = self.state.lock();
            state.requests.push(request);

            if !state.secure {
                None
            } else if state.deferred {
                state.pending.push_back((request, reply));
                return;
            } else {
                Some(state.script.pop_front().unwrap_or_default())
            }
        };

        match immediate {
            Some(outcome) => self.answer(request, reply, outcome),
            None => reply(Err(CaptureError::InsecureContext)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::platform::CaptureConstraints;
    use crate::CaptureResult;

    fn request(id: u64) -> AcquireRequest {
        AcquireRequest {
            id,
            constraints: CaptureConstraints::default(),
        }
    }

    fn capture(
        platform: &SimulatedPlatform,
        id: u64,
    ) -> mpsc::Receiver<CaptureResult<CapturedStream>> {
        let (tx, rx) = mpsc::channel();
        platform.request(
            request(id),
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );
        rx
    }

    #[test]
    fn test_unscripted_request_is_granted() {
        let platform = SimulatedPlatform::new();
        let stream = capture(&platform, 1).try_recv().unwrap().unwrap();

        assert_eq!(stream.label(), None);
        assert!(stream.has_audio);
        assert!(stream.handle.is_live());
        assert_eq!(platform.tracks().len(), 1);
    }

    #[test]
    fn test_scripted_outcomes_in_order() {
        let platform = SimulatedPlatform::new();
        platform.script(SimulatedOutcome::Grant {
            label: Some("Entire screen".into()),
        });
        platform.script(SimulatedOutcome::Cancel);
        platform.script(SimulatedOutcome::Fail("Device busy".into()));

        let first = capture(&platform, 1).try_recv().unwrap().unwrap();
        assert_eq!(first.label().as_deref(), Some("Entire screen"));
        assert_eq!(
            capture(&platform, 2).try_recv().unwrap().unwrap_err(),
            CaptureError::Cancelled
        );
        assert_eq!(
            capture(&platform, 3).try_recv().unwrap().unwrap_err(),
            CaptureError::Platform("Device busy".into())
        );
    }

    #[test]
    fn test_insecure_context_fails() {
        let platform = SimulatedPlatform::new();
        platform.set_secure(false);

        let err = capture(&platform, 1).try_recv().unwrap().unwrap_err();
        assert_eq!(err, CaptureError::InsecureContext);
        assert!(platform.tracks().is_empty());
    }

    #[test]
    fn test_deferred_requests_wait_for_resolution() {
        let platform = SimulatedPlatform::new();
        platform.set_deferred(true);

        let rx = capture(&platform, 7);
        assert!(rx.try_recv().is_err());
        assert_eq!(platform.pending(), 1);

        assert!(platform.resolve_next());
        assert!(rx.try_recv().unwrap().is_ok());
        assert!(!platform.resolve_next());
    }

    #[test]
    fn test_device_end_fires_callback_once() {
        let platform = SimulatedPlatform::new();
        let stream = capture(&platform, 1).try_recv().unwrap().unwrap();

        let (tx, rx) = mpsc::channel();
        stream.handle.on_ended(Box::new(move || {
            let _ = tx.send(());
        }));

        let track = &platform.tracks()[0];
        track.end();
        track.end();

        assert_eq!(rx.try_iter().count(), 1);
        assert!(!stream.handle.is_live());
        assert!(!track.is_stopped());
    }

    #[test]
    fn test_late_registration_on_ended_track_fires_immediately() {
        let platform = SimulatedPlatform::new();
        let stream = capture(&platform, 1).try_recv().unwrap().unwrap();
        platform.tracks()[0].end();

        let (tx, rx) = mpsc::channel();
        stream.handle.on_ended(Box::new(move || {
            let _ = tx.send(());
        }));

        assert_eq!(rx.try_iter().count(), 1);
        platform.tracks()[0].end();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_release_does_not_fire_ended() {
        let platform = SimulatedPlatform::new();
        let stream = capture(&platform, 1).try_recv().unwrap().unwrap();

        let (tx, rx) = mpsc::channel();
        stream.handle.on_ended(Box::new(move || {
            let _ = tx.send(());
        }));

        stream.handle.release();
        platform.tracks()[0].end();

        assert!(rx.try_recv().is_err());
        assert!(platform.tracks()[0].is_stopped());
    }
}
