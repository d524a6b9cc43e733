//! Destinations for analytics events

use crate::tracking::events::InteractionEvent;
use crate::{MapError, Result};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use std::sync::Mutex;

/// Receives analytics events. Implementations may fail; the tracker
/// absorbs every failure.
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: &InteractionEvent) -> Result<()>;
}

/// Writes events through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AnalyticsSink for LogSink {
    fn track(&self, event: &InteractionEvent) -> Result<()> {
        let payload = serde_json::to_string(event)?;
        #[cfg(feature = "debug")]
        log::info!("analytics {} {}", event.event_type.as_str(), payload);
        #[cfg(not(feature = "debug"))]
        let _ = payload;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl AnalyticsSink for NoopSink {
    fn track(&self, _event: &InteractionEvent) -> Result<()> {
        Ok(())
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<InteractionEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<InteractionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl AnalyticsSink for MemorySink {
    fn track(&self, event: &InteractionEvent) -> Result<()> {
        self.events
            .lock()
            .map_err(|_| MapError::Tracking("memory sink poisoned".into()))?
            .push(event.clone());
        Ok(())
    }
}

/// Hands events to a consumer thread without blocking the map
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<InteractionEvent>,
}

impl ChannelSink {
    /// Bounded channel; events are rejected once `capacity` are queued
    pub fn bounded(capacity: usize) -> (Self, Receiver<InteractionEvent>) {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        (Self { sender }, receiver)
    }

    pub fn unbounded() -> (Self, Receiver<InteractionEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl AnalyticsSink for ChannelSink {
    fn track(&self, event: &InteractionEvent) -> Result<()> {
        self.sender.try_send(event.clone()).map_err(|err| match err {
            TrySendError::Full(_) => MapError::Tracking("analytics channel full".into()),
            TrySendError::Disconnected(_) => {
                MapError::Tracking("analytics channel disconnected".into())
            }
        })
    }
}
