//! Prelude module for common propmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use propmap::prelude::*;`

pub use crate::core::{
    builder::MapBuilder,
    config::{Breakpoint, ImagePreset, MapOverrides, MapSettings, ResolvedMapOptions},
    geo::{LatLng, LatLngBounds, Point},
    map::{InteractivePropertyMap, MapCommand, MapView, Navigation},
    state::{LoadOutcome, LoadTicket, MapStateMachine, MapUiState, StateKind},
    viewport::{FitBounds, Viewport, ViewportCalculator, ViewportSync},
};

pub use crate::data::{
    images::{CdnImageResolver, ImageResolver},
    property::{filter_renderable, Currency, OperationKind, PropertyGeoRecord, PropertyKind},
    provider::{GeoDataProvider, HttpGeoDataProvider, StaticProvider},
};

pub use crate::input::{
    debounce::{BreakpointWatcher, ResizeDebouncer},
    events::InputEvent,
};

pub use crate::layers::marker::{ClusterMarker, IconSpec, IconState, Marker, MarkerFactory};

pub use crate::spatial::{
    clustering::{Cluster, ClusterAction, ClusterPolicy, Clustering},
    index::{SpatialIndex, SpatialItem},
};

pub use crate::rendering::context::RenderContext;

pub use crate::tracking::{
    AnalyticsSink, ChannelSink, EventType, InteractionEvent, InteractionTracker, LogSink,
    MemorySink, NoopSink,
};

pub use crate::ui::{
    format::format_price,
    popup::{PopupContent, PopupRenderer},
    style::{MapStyle, MapThemes},
};

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::{spawn_load, PendingLoad};

pub use crate::{Error as MapError, Result};

pub use std::{sync::Arc, time::Duration};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
