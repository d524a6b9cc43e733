//! # propmap
//!
//! Interactive property map engine for real-estate catalogs, inspired by
//! Leaflet and Leaflet.markercluster.
//!
//! The crate fetches geolocated property records through a pluggable
//! provider, decides whether to cluster them, computes the viewport that fits
//! all of them, builds type-styled markers and count badges, renders popups
//! and state views as HTML, and reports every interaction to an injected
//! analytics sink.

pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
pub mod spatial;
pub mod tracking;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    builder::MapBuilder,
    config::{Breakpoint, MapOverrides, MapSettings},
    geo::{LatLng, LatLngBounds, Point},
    map::InteractivePropertyMap,
    state::{MapStateMachine, MapUiState},
    viewport::{FitBounds, Viewport, ViewportCalculator},
};

pub use data::{
    images::{CdnImageResolver, ImageResolver},
    property::{Currency, OperationKind, PropertyGeoRecord, PropertyKind},
    provider::{GeoDataProvider, HttpGeoDataProvider, StaticProvider},
};

pub use layers::marker::{IconSpec, IconState, MarkerFactory};

pub use spatial::clustering::{ClusterPolicy, Clustering};

pub use tracking::{AnalyticsSink, InteractionEvent, InteractionTracker};

pub use ui::popup::{PopupContent, PopupRenderer};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Data fetch error: {0}")]
    DataFetch(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image resolution error: {0}")]
    ImageResolution(String),

    #[error("Icon for {0} is not ready: no render context")]
    IconNotReady(String),

    #[error("Tracking error: {0}")]
    Tracking(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl MapError {
    /// Short classification attached to `map_error` analytics events
    pub fn classify(&self) -> &'static str {
        match self {
            Self::DataFetch(_) => "data_fetch",
            Self::Network(_) => "network",
            Self::Serialization(_) => "serialization",
            Self::ImageResolution(_) => "image_resolution",
            Self::IconNotReady(_) => "icon_not_ready",
            Self::Tracking(_) => "tracking",
            Self::Config(_) => "config",
        }
    }

    /// The underlying message, without the variant prefix
    pub fn message(&self) -> String {
        match self {
            Self::DataFetch(msg)
            | Self::ImageResolution(msg)
            | Self::Tracking(msg)
            | Self::Config(msg) => msg.clone(),
            Self::Network(err) => err.to_string(),
            Self::Serialization(err) => err.to_string(),
            Self::IconNotReady(_) => self.to_string(),
        }
    }
}

/// Error type alias for convenience
pub type Error = MapError;
