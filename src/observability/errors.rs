//! Process-wide error collection.
//!
//! A cheap in-memory stand-in for a remote error sink: subsystems report
//! errors through a shared handle, recent events stay inspectable, and
//! every event is mirrored to the log stream.

use crate::config::ErrorReportingConfig;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;
use uuid::Uuid;

/// A single collected error.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEvent {
    pub id: Uuid,
    pub at: SystemTime,
    /// Subsystem that reported the error.
    pub source: String,
    pub message: String,
}

#[derive(Debug)]
struct Inner {
    capacity: usize,
    events: VecDeque<ErrorEvent>,
}

/// Shared handle to the error collection buffer.
///
/// Cloning shares the underlying buffer. With collection disabled the
/// handle still works; events are logged but not retained.
#[derive(Clone, Debug)]
pub struct ErrorCollector {
    inner: Arc<Mutex<Inner>>,
}

impl ErrorCollector {
    pub fn new(config: &ErrorReportingConfig) -> Self {
        let capacity = if config.enabled { config.capacity } else { 0 };
        tracing::debug!(
            enabled = config.enabled,
            capacity,
            "Error collection initialized"
        );
        Self {
            inner: Arc::new(Mutex::new(Inner {
                capacity,
                events: VecDeque::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock poisons it; the buffer itself is
        // still consistent, so keep collecting.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Record an error event. Returns the event id.
    pub fn report(&self, source: &str, message: impl Into<String>) -> Uuid {
        let message = message.into();
        let id = Uuid::new_v4();

        tracing::error!(source = source, event_id = %id, "{message}");

        let mut inner = self.lock();
        if inner.capacity > 0 {
            if inner.events.len() == inner.capacity {
                inner.events.pop_front();
            }
            inner.events.push_back(ErrorEvent {
                id,
                at: SystemTime::now(),
                source: source.to_string(),
                message,
            });
        }

        id
    }

    /// Snapshot of retained events, newest first.
    pub fn recent(&self) -> Vec<ErrorEvent> {
        self.lock().events.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity
    }
}
