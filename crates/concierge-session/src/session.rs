//! The session container: store, transport, event fan-out, cancellation.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::{
    events::SessionEvent,
    message::Message,
    store::SessionState,
    transport::Transport,
};

/// Why a dispatch call did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Empty or whitespace-only text
    EmptyMessage,
    /// Another dispatch is still loading
    Busy,
}

/// How a dispatch call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The response was reconciled into the store
    Completed,
    /// The request failed and an apology was appended
    Failed,
    /// Nothing was sent and nothing changed
    Rejected(Rejection),
    /// The session was reset while the request was in flight; the result was dropped
    Discarded,
}

/// Single owner of the conversation state.
///
/// Cloning is cheap and every clone refers to the same store, so a clone can
/// be moved into a spawned task while the original keeps reading snapshots.
#[derive(Clone)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
    pub(crate) transport: Arc<dyn Transport>,
    event_tx: broadcast::Sender<SessionEvent>,
    cancel: Arc<Mutex<CancellationToken>>,
}

impl Session {
    /// Create an empty session talking through `transport`
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            transport,
            event_tx,
            cancel: Arc::new(Mutex::new(CancellationToken::new())),
        }
    }

    /// Subscribe to store changes
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// A consistent copy of the current state
    pub fn snapshot(&self) -> SessionState {
        self.state.lock().clone()
    }

    /// Read the state in place without cloning
    pub fn with_state<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.state.lock())
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().is_loading()
    }

    pub fn current_agent(&self) -> concierge_api::Agent {
        self.state.lock().current_agent()
    }

    /// Reset every field to its initial value.
    ///
    /// An in-flight request is cancelled and its completion, if any, is
    /// discarded.
    pub fn clear_chat(&self) {
        self.cancel.lock().cancel();
        {
            let mut state = self.state.lock();
            state.reset();
            tracing::debug!(generation = state.generation(), "Session cleared");
        }
        let _ = self.event_tx.send(SessionEvent::Cleared);
    }

    fn emit(&self, events: Vec<SessionEvent>) {
        for event in events {
            let _ = self.event_tx.send(event);
        }
    }

    /// Start a dispatch, appending `optimistic` in the same step.
    ///
    /// Returns `None` when another dispatch is still loading.
    pub(crate) fn begin(&self, optimistic: Option<Message>) -> Option<InFlight<'_>> {
        let mut events = vec![SessionEvent::LoadingChanged { is_loading: true }];
        let cancel = CancellationToken::new();
        let (generation, conversation_id) = {
            let mut state = self.state.lock();
            let generation = state.begin_dispatch()?;
            if let Some(message) = optimistic {
                state.push(message.clone());
                events.push(SessionEvent::MessageAppended { message });
            }
            *self.cancel.lock() = cancel.clone();
            (generation, state.conversation_id().to_string())
        };
        tracing::debug!(generation, "Dispatch started");
        self.emit(events);

        Some(InFlight {
            session: self,
            generation,
            conversation_id,
            cancel,
            done: false,
        })
    }

    /// Apply a completion if `generation` is still current, then release loading.
    /// Returns `false` if the completion was stale and dropped.
    fn complete(
        &self,
        generation: u64,
        apply: impl FnOnce(&mut SessionState, &mut Vec<SessionEvent>),
    ) -> bool {
        let mut events = Vec::new();
        let applied = {
            let mut state = self.state.lock();
            if state.is_current(generation) {
                apply(&mut state, &mut events);
                state.finish_dispatch();
                events.push(SessionEvent::LoadingChanged { is_loading: false });
                true
            } else {
                events.push(SessionEvent::ResponseDiscarded { generation });
                false
            }
        };
        if !applied {
            tracing::warn!(generation, "Discarding completion of an invalidated dispatch");
        }
        self.emit(events);
        applied
    }
}

/// A dispatch between `begin` and completion.
///
/// Dropping it without completing (the caller dropped the future, or a panic
/// unwound through it) still releases the loading flag.
pub(crate) struct InFlight<'a> {
    session: &'a Session,
    generation: u64,
    /// Conversation id as it was when the dispatch started
    pub(crate) conversation_id: String,
    cancel: CancellationToken,
    done: bool,
}

impl InFlight<'_> {
    /// Await `request` unless the session is reset first
    pub(crate) async fn run<T>(&self, request: impl Future<Output = T>) -> Option<T> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            out = request => Some(out),
        }
    }

    /// Reconcile into the store. Returns `false` if the dispatch was invalidated.
    pub(crate) fn complete(
        mut self,
        apply: impl FnOnce(&mut SessionState, &mut Vec<SessionEvent>),
    ) -> bool {
        self.done = true;
        self.session.complete(self.generation, apply)
    }

    /// Drop the result without touching the store
    pub(crate) fn discard(self) {
        self.complete(|_, _| {});
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.done {
            tracing::debug!(generation = self.generation, "Dispatch abandoned");
            self.session.complete(self.generation, |_, _| {});
        }
    }
}
