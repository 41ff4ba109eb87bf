//! Command lifecycle events and the bus that fans them out.
//!
//! The runner publishes a `Start`, any number of `Log`s and one `End` per
//! execution; the environment probe additionally publishes free-text
//! `Announce` events. Any number of consumers can subscribe; each receives its
//! own copy of every event published after it subscribed.
//!
//! ## Delivery contract
//!
//! - Events published while nobody is subscribed are dropped.
//! - A subscription never sees events published before it was created. There
//!   is no replay buffer.
//! - A subscriber that falls more than the bus capacity behind receives a single
//!   `SubscriptionEvent::Missed(n)` telling it how many events it lost, then
//!   resumes with the oldest event still buffered.
//! - Within one execution, events arrive in publication order.

use super::id::CommandId;
use serde::Serialize;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::trace;

/// Severity attached to a log chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Which output stream a chunk was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Stdout,
    Stderr,
}

/// Discriminant of `CommandEvent`, used to narrow a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Start,
    Log,
    End,
    Announce,
}

/// One event on the bus.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum CommandEvent {
    /// Published immediately before the process is created.
    Start { id: CommandId, command: String },
    /// A raw chunk of output (not necessarily a whole line).
    Log {
        id: CommandId,
        stream: StreamKind,
        text: String,
        severity: Severity,
    },
    /// Always the last event of an execution.
    End { id: CommandId, exit_code: i32 },
    /// Free-text note not tied to any execution.
    Announce { text: String },
}

impl CommandEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            CommandEvent::Start { .. } => EventKind::Start,
            CommandEvent::Log { .. } => EventKind::Log,
            CommandEvent::End { .. } => EventKind::End,
            CommandEvent::Announce { .. } => EventKind::Announce,
        }
    }
}

/// What a subscriber receives.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionEvent {
    Event(CommandEvent),
    /// The subscriber lagged and this many events were discarded for it.
    Missed(u64),
}

/// Fan-out publisher of `CommandEvent`s. Cheap to clone; all clones share one channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CommandEvent>,
}

impl EventBus {
    /// Events buffered per subscriber before it starts missing them.
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to every current subscriber.
    pub fn publish(&self, event: CommandEvent) {
        if let Err(broadcast::error::SendError(event)) = self.sender.send(event) {
            trace!("No subscribers, dropping {:?} event", event.kind());
        }
    }

    /// Publishes a free-text announcement.
    pub fn announce(&self, text: impl Into<String>) {
        self.publish(CommandEvent::Announce { text: text.into() });
    }

    /// Creates a subscription that sees every event published from now on.
    pub fn subscribe(&self) -> EventSubscription {
        EventSubscription {
            receiver: self.sender.subscribe(),
            kinds: None,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A consumer's view of the bus, optionally narrowed to some event kinds.
#[derive(Debug)]
pub struct EventSubscription {
    receiver: broadcast::Receiver<CommandEvent>,
    kinds: Option<Vec<EventKind>>,
}

impl EventSubscription {
    /// Only deliver events of the listed kinds.
    pub fn only(mut self, kinds: &[EventKind]) -> Self {
        self.kinds = Some(kinds.to_vec());
        self
    }

    fn accepts(&self, event: &CommandEvent) -> bool {
        self.kinds
            .as_ref()
            .map_or(true, |kinds| kinds.contains(&event.kind()))
    }

    /// Waits for the next accepted event. Returns `None` once every `EventBus`
    /// clone has been dropped and the buffer is drained.
    ///
    /// `Missed(n)` counts every discarded event, including ones the filters
    /// would have rejected.
    pub async fn recv(&mut self) -> Option<SubscriptionEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.accepts(&event) => return Some(SubscriptionEvent::Event(event)),
                Ok(_) => continue,
                Err(RecvError::Lagged(n)) => return Some(SubscriptionEvent::Missed(n)),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of `recv`; `None` when nothing is buffered.
    pub fn try_recv(&mut self) -> Option<SubscriptionEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.accepts(&event) => return Some(SubscriptionEvent::Event(event)),
                Ok(_) => continue,
                Err(TryRecvError::Lagged(n)) => return Some(SubscriptionEvent::Missed(n)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drains everything currently buffered.
    pub fn drain(&mut self) -> Vec<SubscriptionEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
