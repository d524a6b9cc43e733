//! Configuration for the property map
//!
//! Two layers live here: [`MapSettings`], the engine-wide constants an
//! embedder may tune (usually loaded once from JSON), and the responsive
//! layer, where a [`Breakpoint`] resolves to default height, zoom and
//! interaction affordances that explicit [`MapOverrides`] always win over.

use crate::constants::{
    CLUSTER_THRESHOLD, DESKTOP_MIN_WIDTH, DETAIL_ROUTE_PREFIX, FIT_BOUNDS_PADDING,
    MAP_TARGET_ID, MAX_FIT_ZOOM, MAX_ZOOM, MIN_ZOOM, PLACEHOLDER_IMAGE_URL, POPUP_IMAGE_CROP,
    POPUP_IMAGE_HEIGHT, POPUP_IMAGE_WIDTH, RESIZE_DEBOUNCE_MS, TABLET_MIN_WIDTH, THUMBNAIL_HEIGHT,
    THUMBNAIL_WIDTH, WIDE_MIN_WIDTH,
};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Viewport width class driving responsive defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
    Wide,
}

impl Breakpoint {
    pub fn from_width(width: f64) -> Self {
        if width < TABLET_MIN_WIDTH {
            Self::Mobile
        } else if width < DESKTOP_MIN_WIDTH {
            Self::Tablet
        } else if width < WIDE_MIN_WIDTH {
            Self::Desktop
        } else {
            Self::Wide
        }
    }

    pub fn resolve(&self) -> BreakpointDefaults {
        match self {
            Self::Mobile => BreakpointDefaults {
                height_px: 300.0,
                zoom: 11.0,
                density: Density::Compact,
                scroll_wheel_zoom: false,
                dragging: true,
                touch_zoom: true,
                zoom_control: false,
            },
            Self::Tablet => BreakpointDefaults {
                height_px: 400.0,
                zoom: 12.0,
                density: Density::Comfortable,
                scroll_wheel_zoom: false,
                dragging: true,
                touch_zoom: true,
                zoom_control: true,
            },
            Self::Desktop => BreakpointDefaults {
                height_px: 500.0,
                zoom: 12.0,
                density: Density::Comfortable,
                scroll_wheel_zoom: true,
                dragging: true,
                touch_zoom: false,
                zoom_control: true,
            },
            Self::Wide => BreakpointDefaults {
                height_px: 600.0,
                zoom: 13.0,
                density: Density::Spacious,
                scroll_wheel_zoom: true,
                dragging: true,
                touch_zoom: false,
                zoom_control: true,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
            Self::Wide => "wide",
        }
    }
}

impl Default for Breakpoint {
    fn default() -> Self {
        Self::Desktop
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Compact,
    Comfortable,
    Spacious,
}

impl Density {
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Compact => "map-density-compact",
            Self::Comfortable => "map-density-comfortable",
            Self::Spacious => "map-density-spacious",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointDefaults {
    pub height_px: f64,
    pub zoom: f64,
    pub density: Density,
    pub scroll_wheel_zoom: bool,
    pub dragging: bool,
    pub touch_zoom: bool,
    pub zoom_control: bool,
}

/// Values the embedding page supplied explicitly
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOverrides {
    pub height_px: Option<f64>,
    pub zoom: Option<f64>,
    pub scroll_wheel_zoom: Option<bool>,
    pub dragging: Option<bool>,
    pub touch_zoom: Option<bool>,
    pub zoom_control: Option<bool>,
    /// Force clustering on regardless of the record count
    pub clustering: bool,
    /// Maximum number of records requested from the provider
    pub max_properties: Option<usize>,
}

impl MapOverrides {
    /// Merges breakpoint defaults underneath the explicit values
    pub fn resolve(&self, breakpoint: Breakpoint) -> ResolvedMapOptions {
        let defaults = breakpoint.resolve();
        ResolvedMapOptions {
            breakpoint,
            height_px: self.height_px.unwrap_or(defaults.height_px),
            zoom: self.zoom.unwrap_or(defaults.zoom),
            density: defaults.density,
            scroll_wheel_zoom: self.scroll_wheel_zoom.unwrap_or(defaults.scroll_wheel_zoom),
            dragging: self.dragging.unwrap_or(defaults.dragging),
            touch_zoom: self.touch_zoom.unwrap_or(defaults.touch_zoom),
            zoom_control: self.zoom_control.unwrap_or(defaults.zoom_control),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMapOptions {
    pub breakpoint: Breakpoint,
    pub height_px: f64,
    pub zoom: f64,
    pub density: Density,
    pub scroll_wheel_zoom: bool,
    pub dragging: bool,
    pub touch_zoom: bool,
    pub zoom_control: bool,
}

/// Fixed width/height/crop applied when resolving image identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePreset {
    pub width: u32,
    pub height: u32,
    pub crop: String,
}

impl ImagePreset {
    pub fn new(width: u32, height: u32, crop: impl Into<String>) -> Self {
        Self {
            width,
            height,
            crop: crop.into(),
        }
    }

    /// Preset for list thumbnails next to the map
    pub fn thumbnail() -> Self {
        Self::new(THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT, POPUP_IMAGE_CROP)
    }
}

impl Default for ImagePreset {
    fn default() -> Self {
        Self::new(POPUP_IMAGE_WIDTH, POPUP_IMAGE_HEIGHT, POPUP_IMAGE_CROP)
    }
}

/// Engine-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub cluster_threshold: usize,
    pub fit_padding: (f64, f64),
    pub max_fit_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub center: (f64, f64),
    pub resize_debounce_ms: u64,
    pub image_preset: ImagePreset,
    pub placeholder_image: String,
    pub detail_route_prefix: String,
    pub target_id: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            cluster_threshold: CLUSTER_THRESHOLD,
            fit_padding: FIT_BOUNDS_PADDING,
            max_fit_zoom: MAX_FIT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            center: crate::constants::DEFAULT_CENTER,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            image_preset: ImagePreset::default(),
            placeholder_image: PLACEHOLDER_IMAGE_URL.to_string(),
            detail_route_prefix: DETAIL_ROUTE_PREFIX.to_string(),
            target_id: MAP_TARGET_ID.to_string(),
        }
    }
}

impl MapSettings {
    /// Parses settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cluster_threshold == 0 {
            return Err(MapError::Config("cluster_threshold must be at least 1".into()));
        }
        if self.min_zoom > self.max_zoom {
            return Err(MapError::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.max_fit_zoom < self.min_zoom || self.max_fit_zoom > self.max_zoom {
            return Err(MapError::Config(format!(
                "max_fit_zoom {} outside [{}, {}]",
                self.max_fit_zoom, self.min_zoom, self.max_zoom
            )));
        }
        if self.fit_padding.0 < 0.0 || self.fit_padding.1 < 0.0 {
            return Err(MapError::Config("fit_padding must not be negative".into()));
        }
        if self.image_preset.width == 0 || self.image_preset.height == 0 {
            return Err(MapError::Config("image preset dimensions must be positive".into()));
        }
        Ok(())
    }

    pub fn detail_href(&self, property_id: i64) -> String {
        format!("{}/{}", self.detail_route_prefix.trim_end_matches('/'), property_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint_from_width() {
        assert_eq!(Breakpoint::from_width(375.0), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(767.9), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(768.0), Breakpoint::Tablet);
        assert_eq!(Breakpoint::from_width(1024.0), Breakpoint::Desktop);
        assert_eq!(Breakpoint::from_width(1439.0), Breakpoint::Desktop);
        assert_eq!(Breakpoint::from_width(1920.0), Breakpoint::Wide);
    }

    #[test]
    fn test_breakpoint_presets() {
        let mobile = Breakpoint::Mobile.resolve();
        let wide = Breakpoint::Wide.resolve();

        assert!(mobile.height_px < wide.height_px);
        assert!(!mobile.scroll_wheel_zoom);
        assert!(wide.scroll_wheel_zoom);
        assert_eq!(mobile.density, Density::Compact);
    }

    #[test]
    fn test_explicit_values_win() {
        let overrides = MapOverrides {
            height_px: Some(420.0),
            scroll_wheel_zoom: Some(true),
            touch_zoom: Some(false),
            ..MapOverrides::default()
        };

        for breakpoint in [Breakpoint::Mobile, Breakpoint::Wide] {
            let resolved = overrides.resolve(breakpoint);
            assert_eq!(resolved.height_px, 420.0);
            assert!(resolved.scroll_wheel_zoom);
            assert!(!resolved.touch_zoom);
            assert_eq!(resolved.zoom, breakpoint.resolve().zoom);
        }
    }

    #[test]
    fn test_settings_from_json() {
        let settings = MapSettings::from_json(r#"{ "cluster_threshold": 20 }"#).unwrap();
        assert_eq!(settings.cluster_threshold, 20);
        assert_eq!(settings.max_fit_zoom, MAX_FIT_ZOOM);
        assert_eq!(settings.detail_href(7), "/propiedades/7");
    }

    #[test]
    fn test_settings_validation() {
        let err = MapSettings::from_json(r#"{ "cluster_threshold": 0 }"#).unwrap_err();
        assert!(matches!(err, MapError::Config(_)));

        let err = MapSettings::from_json(r#"{ "min_zoom": 10, "max_zoom": 5 }"#).unwrap_err();
        assert!(matches!(err, MapError::Config(_)));

        let err = MapSettings::from_json("not json").unwrap_err();
        assert!(matches!(err, MapError::Serialization(_)));
    }
}
