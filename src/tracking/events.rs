use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    MapLoaded,
    MapError,
    MapPinClick,
    MapViewDetails,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MapLoaded => "map_loaded",
            Self::MapError => "map_error",
            Self::MapPinClick => "map_pin_click",
            Self::MapViewDetails => "map_view_details",
        }
    }
}

/// One analytics event as handed to a sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub event_type: EventType,
    /// DOM id of the map the event originated from
    pub target_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<i64>,
    pub metadata: Value,
}

impl InteractionEvent {
    pub fn new(event_type: EventType, target_id: impl Into<String>) -> Self {
        Self {
            event_type,
            target_id: target_id.into(),
            property_id: None,
            metadata: Value::Null,
        }
    }

    pub fn with_property(mut self, property_id: i64) -> Self {
        self.property_id = Some(property_id);
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn map_loaded(target_id: &str, count: usize, clustered: bool) -> Self {
        Self::new(EventType::MapLoaded, target_id).with_metadata(json!({
            "count": count,
            "clustering": clustered,
        }))
    }

    pub fn map_error(target_id: &str, classification: &str, message: &str) -> Self {
        Self::new(EventType::MapError, target_id).with_metadata(json!({
            "error_type": classification,
            "message": message,
        }))
    }

    pub fn pin_click(target_id: &str, property_id: i64, property_type: &str) -> Self {
        Self::new(EventType::MapPinClick, target_id)
            .with_property(property_id)
            .with_metadata(json!({ "property_type": property_type }))
    }

    pub fn view_details(target_id: &str, property_id: i64) -> Self {
        Self::new(EventType::MapViewDetails, target_id).with_property(property_id)
    }
}
