//! Map builder for fluent API configuration
//!
//! Collects settings, caller overrides and the injected collaborators
//! (image resolver, analytics sink) and assembles an
//! [`InteractivePropertyMap`].

use crate::{
    core::{
        config::{MapOverrides, MapSettings},
        map::InteractivePropertyMap,
    },
    data::images::{CdnImageResolver, ImageResolver},
    layers::marker::MarkerFactory,
    rendering::context::RenderContext,
    tracking::{AnalyticsSink, InteractionTracker},
    ui::{popup::PopupRenderer, style::MapStyle},
    Result,
};
use std::sync::Arc;

const DEFAULT_WIDTH: f64 = 1280.0;

/// Builder for creating and configuring map instances
pub struct MapBuilder {
    settings: MapSettings,
    overrides: MapOverrides,
    width: f64,
    style: MapStyle,
    image_cdn: String,
    resolver: Option<Arc<dyn ImageResolver>>,
    sink: Option<Arc<dyn AnalyticsSink>>,
    context: RenderContext,
}

impl MapBuilder {
    /// Create a new MapBuilder with default settings
    pub fn new() -> Self {
        Self {
            settings: MapSettings::default(),
            overrides: MapOverrides::default(),
            width: DEFAULT_WIDTH,
            style: MapStyle::default(),
            image_cdn: String::new(),
            resolver: None,
            sink: None,
            context: RenderContext::server(),
        }
    }

    pub fn with_settings(mut self, settings: MapSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace all caller overrides at once
    pub fn with_overrides(mut self, overrides: MapOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Initial container width in CSS pixels; selects the breakpoint
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height_px: f64) -> Self {
        self.overrides.height_px = Some(height_px);
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.overrides.zoom = Some(zoom);
        self
    }

    /// Force clustering regardless of the record count
    pub fn with_clustering(mut self, enabled: bool) -> Self {
        self.overrides.clustering = enabled;
        self
    }

    pub fn with_max_properties(mut self, max: usize) -> Self {
        self.overrides.max_properties = Some(max);
        self
    }

    /// Enable or disable scroll wheel zoom
    pub fn with_scroll_wheel_zoom(mut self, enabled: bool) -> Self {
        self.overrides.scroll_wheel_zoom = Some(enabled);
        self
    }

    /// Enable or disable dragging
    pub fn with_dragging(mut self, enabled: bool) -> Self {
        self.overrides.dragging = Some(enabled);
        self
    }

    pub fn with_touch_zoom(mut self, enabled: bool) -> Self {
        self.overrides.touch_zoom = Some(enabled);
        self
    }

    pub fn with_zoom_control(mut self, enabled: bool) -> Self {
        self.overrides.zoom_control = Some(enabled);
        self
    }

    pub fn with_style(mut self, style: MapStyle) -> Self {
        self.style = style;
        self
    }

    /// Base URL of the image CDN used by the default resolver
    pub fn with_image_cdn(mut self, base_url: impl Into<String>) -> Self {
        self.image_cdn = base_url.into();
        self
    }

    pub fn with_image_resolver(mut self, resolver: Arc<dyn ImageResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_analytics(mut self, sink: Arc<dyn AnalyticsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Start with a ready context instead of waiting for hydration
    pub fn with_render_context(mut self, context: RenderContext) -> Self {
        self.context = context;
        self
    }

    /// Validates the settings and builds the map
    pub fn build(self) -> Result<InteractivePropertyMap> {
        self.settings.validate()?;

        let resolver: Arc<dyn ImageResolver> = match self.resolver {
            Some(resolver) => resolver,
            None => Arc::new(CdnImageResolver::with_placeholder(
                self.image_cdn,
                self.settings.placeholder_image.clone(),
            )),
        };
        let tracker = match self.sink {
            Some(sink) => InteractionTracker::new(sink, self.settings.target_id.clone()),
            None => InteractionTracker::disabled(self.settings.target_id.clone()),
        };
        let popups = PopupRenderer::new(resolver, &self.settings);

        Ok(InteractivePropertyMap::from_parts(
            self.settings,
            self.overrides,
            self.width,
            MarkerFactory::new(self.style),
            popups,
            tracker,
            self.context,
        ))
    }
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
