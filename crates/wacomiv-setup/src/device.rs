use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use wacomiv_frame::{Feed, FrameAssembler};
use wacomiv_tablet::{
    dispatch, dispatch_response, Capabilities, Dispatched, EventSink, ResponseKind,
    ResponseOutcome, TabletState,
};

use crate::pending::PendingRequest;

/// Result of waiting on an armed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// A response completed the request. The tablet state already
    /// reflects it.
    Completed {
        expected: ResponseKind,
        outcome: ResponseOutcome,
    },
    /// Nothing completed the request in time. `buffered` is how many
    /// bytes of an unterminated frame were sitting in the assembler.
    TimedOut { buffered: usize },
    /// The line closed while waiting.
    Closed,
}

struct Inner<S> {
    assembler: FrameAssembler,
    state: TabletState,
    sink: S,
    pending: PendingRequest,
    closed: bool,
}

struct Shared<S> {
    inner: Mutex<Inner<S>>,
    completed: Condvar,
}

/// Shared handle to one attached tablet.
///
/// The byte-arrival path ([`receive`](Self::receive)) and the setup
/// sequencer both go through this handle. Frames are decoded and the
/// tablet state updated before any waiter is woken, so a sequencer that
/// returns from [`wait`](Self::wait) always sees the response's effect.
pub struct Tablet<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for Tablet<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S> std::fmt::Debug for Tablet<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("Tablet")
            .field("model", &inner.state.model())
            .field("pending", &inner.pending)
            .field("closed", &inner.closed)
            .finish()
    }
}

impl<S> Tablet<S> {
    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        self.shared
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the decoding state.
    pub fn state(&self) -> TabletState {
        self.lock().state.clone()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.lock().state.capabilities()
    }

    pub fn pending(&self) -> PendingRequest {
        self.lock().pending
    }

    /// Run `f` against the sink while holding the device lock.
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.lock().sink)
    }

    /// Mark the line closed, drop any partial frame and wake waiters.
    pub fn close(&self) {
        let mut inner = self.lock();
        if !inner.closed {
            tracing::debug!("tablet line closed");
        }
        inner.closed = true;
        inner.assembler.reset();
        drop(inner);
        self.shared.completed.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Start correlating the next response with a query of `kind`.
    ///
    /// Arm before writing the query, otherwise a fast reply can arrive
    /// with nothing waiting for it.
    pub fn arm(&self, kind: ResponseKind) {
        self.lock().pending.arm(kind);
    }

    /// Block until the armed request completes, the line closes, or
    /// `timeout` elapses. On timeout the request is expired under the same
    /// lock, so a late response can no longer complete it.
    pub fn wait(&self, timeout: Duration) -> Wait {
        let guard = self.lock();
        let (mut inner, _) = self
            .shared
            .completed
            .wait_timeout_while(guard, timeout, |inner| {
                inner.pending.is_awaiting() && !inner.closed
            })
            .unwrap_or_else(PoisonError::into_inner);

        let pending = inner.pending;
        match pending {
            PendingRequest::Satisfied { expected, outcome } => {
                Wait::Completed { expected, outcome }
            }
            _ if inner.closed => Wait::Closed,
            PendingRequest::Awaiting(_) => {
                inner.pending.expire();
                Wait::TimedOut {
                    buffered: inner.assembler.pending_len(),
                }
            }
            PendingRequest::Idle | PendingRequest::TimedOut(_) => Wait::TimedOut {
                buffered: inner.assembler.pending_len(),
            },
        }
    }
}

impl<S: EventSink> Tablet<S> {
    pub fn new(sink: S) -> Self {
        Self::with_assembler(sink, FrameAssembler::new())
    }

    pub fn with_assembler(sink: S, assembler: FrameAssembler) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    assembler,
                    state: TabletState::new(),
                    sink,
                    pending: PendingRequest::Idle,
                    closed: false,
                }),
                completed: Condvar::new(),
            }),
        }
    }

    /// Feed bytes from the line. Ignored once the handle is closed.
    pub fn receive(&self, bytes: &[u8]) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        let mut signalled = false;
        for &byte in bytes {
            signalled |= inner.process(byte);
        }
        drop(inner);
        if signalled {
            self.shared.completed.notify_all();
        }
    }

    pub fn receive_byte(&self, byte: u8) {
        self.receive(&[byte]);
    }

    /// Decode whatever unterminated response text is buffered, as if its
    /// terminator had arrived. Returns `None` if the buffer is empty or
    /// holds part of a binary packet.
    pub fn recover_partial(&self) -> Option<ResponseOutcome> {
        let mut inner = self.lock();
        let text = inner.assembler.take_partial_response()?;
        let Inner { state, sink, .. } = &mut *inner;
        let outcome = dispatch_response(&text, state, sink);
        tracing::debug!(len = text.len(), ?outcome, "decoded unterminated response");
        Some(outcome)
    }
}

impl<S: EventSink> Inner<S> {
    /// Returns true if this byte completed the outstanding request.
    fn process(&mut self, byte: u8) -> bool {
        let frame = match self.assembler.feed(byte) {
            Feed::Ready(frame) => frame,
            Feed::Incomplete => return false,
        };
        match dispatch(&frame, &mut self.state, &mut self.sink) {
            Dispatched::Motion(_) => false,
            Dispatched::Response(outcome) => {
                if !self.pending.complete(outcome) {
                    tracing::trace!(?outcome, "response with no request outstanding");
                    return false;
                }
                true
            }
        }
    }
}
