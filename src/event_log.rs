use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Receiver of the human-readable event lines a session produces.
///
/// Implementations are called from engine worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, line: String);
}

impl<F> EventSink for F
where
    F: Fn(String) + Send + Sync,
{
    fn emit(&self, line: String) {
        self(line)
    }
}

/// Sink wrapper that drops every line once closed.
pub struct GatedSink {
    open: AtomicBool,
    inner: Arc<dyn EventSink>,
}

impl GatedSink {
    pub fn new(inner: Arc<dyn EventSink>) -> Self {
        Self {
            open: AtomicBool::new(true),
            inner,
        }
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

impl EventSink for GatedSink {
    fn emit(&self, line: String) {
        if self.is_open() {
            self.inner.emit(line);
        } else {
            log::debug!("dropping line after close: {}", line);
        }
    }
}

/// Append-only list of log lines with an observable snapshot.
///
/// Cloning shares the same log. Every append publishes the full list on a
/// `watch` channel, so any thread may append while a UI task renders.
#[derive(Clone)]
pub struct EventLog {
    lines: Arc<Mutex<Vec<String>>>,
    tx: Arc<watch::Sender<Vec<String>>>,
}

impl EventLog {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            lines: Arc::new(Mutex::new(Vec::new())),
            tx: Arc::new(tx),
        }
    }

    pub fn append(&self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("log: {}", message);
        // The snapshot is published under the lock so observers never see
        // lines out of order.
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        lines.push(message);
        self.tx.send_replace(lines.clone());
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<String>> {
        self.tx.subscribe()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventLog {
    fn emit(&self, line: String) {
        self.append(line);
    }
}
