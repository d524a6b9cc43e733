use crate::data::property::PropertyKind;
use crate::tracking::{
    events::InteractionEvent,
    sink::{AnalyticsSink, NoopSink},
};
use crate::MapError;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Reports map interactions to an injected sink.
///
/// Tracking never affects the map: sink errors and panics are caught and
/// logged, and every method returns normally.
#[derive(Clone)]
pub struct InteractionTracker {
    sink: Arc<dyn AnalyticsSink>,
    target_id: String,
}

impl InteractionTracker {
    pub fn new(sink: Arc<dyn AnalyticsSink>, target_id: impl Into<String>) -> Self {
        Self {
            sink,
            target_id: target_id.into(),
        }
    }

    /// Tracker that drops everything
    pub fn disabled(target_id: impl Into<String>) -> Self {
        Self::new(Arc::new(NoopSink), target_id)
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Sends one event; returns whether the sink accepted it
    pub fn track(&self, event: InteractionEvent) -> bool {
        let sink = &self.sink;
        match panic::catch_unwind(AssertUnwindSafe(|| sink.track(&event))) {
            Ok(Ok(())) => true,
            Ok(Err(_err)) => {
                #[cfg(feature = "debug")]
                log::warn!("Dropping {} event: {}", event.event_type.as_str(), _err);
                false
            }
            Err(_) => {
                #[cfg(feature = "debug")]
                log::warn!("Analytics sink panicked on {} event", event.event_type.as_str());
                false
            }
        }
    }

    pub fn map_loaded(&self, count: usize, clustered: bool) -> bool {
        self.track(InteractionEvent::map_loaded(&self.target_id, count, clustered))
    }

    pub fn map_error(&self, error: &MapError) -> bool {
        self.track(InteractionEvent::map_error(
            &self.target_id,
            error.classify(),
            &error.message(),
        ))
    }

    pub fn pin_click(&self, property_id: i64, kind: PropertyKind) -> bool {
        self.track(InteractionEvent::pin_click(
            &self.target_id,
            property_id,
            kind.as_str(),
        ))
    }

    pub fn view_details(&self, property_id: i64) -> bool {
        self.track(InteractionEvent::view_details(&self.target_id, property_id))
    }
}

impl std::fmt::Debug for InteractionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionTracker")
            .field("target_id", &self.target_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::events::{EventType, InteractionEvent};
    use crate::tracking::sink::MemorySink;
    use crate::Result;

    struct FailingSink;

    impl AnalyticsSink for FailingSink {
        fn track(&self, _event: &InteractionEvent) -> Result<()> {
            Err(MapError::Tracking("offline".into()))
        }
    }

    struct PanickingSink;

    impl AnalyticsSink for PanickingSink {
        fn track(&self, _event: &InteractionEvent) -> Result<()> {
            panic!("sink exploded")
        }
    }

    #[test]
    fn test_failures_are_swallowed() {
        assert!(!InteractionTracker::new(Arc::new(FailingSink), "map").view_details(1));
        assert!(!InteractionTracker::new(Arc::new(PanickingSink), "map").view_details(1));
    }

    #[test]
    fn test_pin_clicks_are_not_deduplicated() {
        let sink = Arc::new(MemorySink::new());
        let tracker = InteractionTracker::new(sink.clone(), "map");

        tracker.pin_click(5, PropertyKind::House);
        tracker.pin_click(5, PropertyKind::House);

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.event_type == EventType::MapPinClick));
        assert_eq!(events[0].target_id, "map");
    }

    #[test]
    fn test_error_event_carries_classification() {
        let sink = Arc::new(MemorySink::new());
        let tracker = InteractionTracker::new(sink.clone(), "map");

        tracker.map_error(&MapError::DataFetch("503".into()));

        let event = &sink.events()[0];
        assert_eq!(event.metadata["error_type"], "data_fetch");
        assert!(event.metadata["message"].as_str().unwrap().contains("503"));
    }
}
