use serde::{Deserialize, Serialize};

/// Input the embedding page forwards to the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Viewport/window resize, width in CSS pixels
    Resize { width: f64 },
    /// Zoom changed by the user (wheel, pinch, controls)
    ZoomChanged { zoom: f64 },
    /// Click/tap on a single property marker
    MarkerClick { property_id: i64 },
    /// Click/tap on a cluster badge
    ClusterClick { cluster_id: String },
    /// "Ver Detalles" in a popup
    ViewDetails { property_id: i64 },
    /// Retry button in the error view
    Retry,
    /// Filters changed upstream, reload the records
    Refresh,
}

impl InputEvent {
    /// Property the event refers to, if any
    pub fn property_id(&self) -> Option<i64> {
        match self {
            InputEvent::MarkerClick { property_id } | InputEvent::ViewDetails { property_id } => {
                Some(*property_id)
            }
            _ => None,
        }
    }

    /// Checks if this is a click on a map element
    pub fn is_pointer_event(&self) -> bool {
        matches!(
            self,
            InputEvent::MarkerClick { .. }
                | InputEvent::ClusterClick { .. }
                | InputEvent::ViewDetails { .. }
        )
    }

    /// Checks if this event asks for a new fetch
    pub fn is_reload_event(&self) -> bool {
        matches!(self, InputEvent::Retry | InputEvent::Refresh)
    }
}
