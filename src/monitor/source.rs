/*!
 * Event Source Adapter
 * Injection point for process start/exit notifications
 *
 * The store only sees the [`EventSink`] calls. [`ChannelSource`] lets any
 * number of producer threads hand events to a single pump thread without
 * ever blocking the producer.
 */

use super::record::ResourceUsage;
use super::store::ProcessStore;
use crate::core::data_structures::CommName;
use crate::core::limits::EVENT_CHANNEL_CAPACITY;
use crate::core::types::{ExitCode, Pid};
use flume::{Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Consumer of process lifecycle notifications
///
/// Callers may be on any thread and must not be made to wait on locks that
/// sleep, so implementations are expected to be short and non-blocking.
pub trait EventSink: Send + Sync {
    fn notify_start(&self, pid: Pid, parent_pid: Pid, name: &str);
    fn notify_exit(&self, pid: Pid, exit_code: ExitCode, usage: ResourceUsage);
}

impl EventSink for ProcessStore {
    #[inline]
    fn notify_start(&self, pid: Pid, parent_pid: Pid, name: &str) {
        self.record_start(pid, parent_pid, name);
    }

    #[inline]
    fn notify_exit(&self, pid: Pid, exit_code: ExitCode, usage: ResourceUsage) {
        self.record_exit_with_usage(pid, exit_code, usage);
    }
}

/// Lifecycle notification in transit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProcessEvent {
    Start {
        pid: Pid,
        parent_pid: Pid,
        name: CommName,
    },
    Exit {
        pid: Pid,
        exit_code: ExitCode,
        #[serde(default)]
        usage: ResourceUsage,
    },
}

impl ProcessEvent {
    pub fn start(pid: Pid, parent_pid: Pid, name: &str) -> Self {
        Self::Start {
            pid,
            parent_pid,
            name: CommName::new(name),
        }
    }

    pub fn exit(pid: Pid, exit_code: ExitCode) -> Self {
        Self::Exit {
            pid,
            exit_code,
            usage: ResourceUsage::default(),
        }
    }

    /// Hand the event to a sink
    pub fn deliver(&self, sink: &dyn EventSink) {
        match self {
            Self::Start {
                pid,
                parent_pid,
                name,
            } => sink.notify_start(*pid, *parent_pid, name),
            Self::Exit {
                pid,
                exit_code,
                usage,
            } => sink.notify_exit(*pid, *exit_code, *usage),
        }
    }
}

/// Cloneable, non-blocking producer handle
#[derive(Clone)]
pub struct EventSender {
    tx: Sender<ProcessEvent>,
    dropped: Arc<AtomicU64>,
}

impl EventSender {
    /// Queue an event; returns false if it was dropped
    pub fn send(&self, event: ProcessEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(?event, "event channel full, event dropped");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    pub fn on_start(&self, pid: Pid, parent_pid: Pid, name: &str) -> bool {
        self.send(ProcessEvent::start(pid, parent_pid, name))
    }

    pub fn on_exit(&self, pid: Pid, exit_code: ExitCode) -> bool {
        self.send(ProcessEvent::exit(pid, exit_code))
    }

    /// Events lost to a full or closed channel
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl EventSink for EventSender {
    fn notify_start(&self, pid: Pid, parent_pid: Pid, name: &str) {
        self.on_start(pid, parent_pid, name);
    }

    fn notify_exit(&self, pid: Pid, exit_code: ExitCode, usage: ResourceUsage) {
        self.send(ProcessEvent::Exit {
            pid,
            exit_code,
            usage,
        });
    }
}

/// Bounded channel drained by a dedicated pump thread
pub struct ChannelSource {
    sender: EventSender,
    pump: JoinHandle<u64>,
}

impl ChannelSource {
    /// Start the pump thread with the default channel bound
    pub fn spawn(sink: Arc<dyn EventSink>) -> io::Result<Self> {
        Self::with_capacity(sink, EVENT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(sink: Arc<dyn EventSink>, capacity: usize) -> io::Result<Self> {
        let (tx, rx) = flume::bounded(capacity.max(1));
        let pump = thread::Builder::new()
            .name("procmon-events".to_string())
            .spawn(move || run_pump(rx, sink))?;

        Ok(Self {
            sender: EventSender {
                tx,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            pump,
        })
    }

    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    /// Stop accepting events, drain the channel and return how many were delivered
    ///
    /// Blocks until every other [`EventSender`] clone has been dropped.
    pub fn shutdown(self) -> u64 {
        let Self { sender, pump } = self;
        drop(sender);
        pump.join().unwrap_or_else(|_| {
            warn!("event pump panicked");
            0
        })
    }
}

fn run_pump(rx: Receiver<ProcessEvent>, sink: Arc<dyn EventSink>) -> u64 {
    let mut delivered = 0;
    for event in rx.iter() {
        event.deliver(sink.as_ref());
        delivered += 1;
    }
    debug!(delivered, "event pump finished");
    delivered
}
