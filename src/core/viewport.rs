use crate::constants::{FIT_BOUNDS_PADDING, MAX_FIT_ZOOM, MAX_ZOOM, MIN_ZOOM};
use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};

/// Region the map is auto-fitted to once records are loaded.
///
/// The padding is in CSS pixels and only takes effect when a [`Viewport`]
/// turns the bounds into a center and zoom, never in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitBounds {
    pub bounds: LatLngBounds,
    /// Padding on each side (x = left/right, y = top/bottom)
    pub padding: Point,
    /// Fitting never zooms beyond this level
    pub max_zoom: f64,
}

/// Computes the fit region for a set of rendered coordinates.
///
/// Stateless: the result depends on the input points only, so recomputing
/// with the same set always yields the same bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportCalculator {
    padding: Point,
    max_zoom: f64,
}

impl ViewportCalculator {
    pub fn new(padding: Point, max_zoom: f64) -> Self {
        Self { padding, max_zoom }
    }

    /// `None` when there is nothing to fit
    pub fn compute(&self, points: &[LatLng]) -> Option<FitBounds> {
        LatLngBounds::from_points(points).map(|bounds| FitBounds {
            bounds,
            padding: self.padding,
            max_zoom: self.max_zoom,
        })
    }
}

impl Default for ViewportCalculator {
    fn default() -> Self {
        Self::new(
            Point::new(FIT_BOUNDS_PADDING.0, FIT_BOUNDS_PADDING.1),
            MAX_FIT_ZOOM,
        )
    }
}

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            size,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    pub fn is_at_max_zoom(&self) -> bool {
        self.zoom >= self.max_zoom
    }

    /// Converts a geographical coordinate to container pixel coordinates
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let origin = self.center.to_world_pixel(self.zoom);
        lat_lng
            .to_world_pixel(self.zoom)
            .subtract(&origin)
            .add(&self.size.multiply(0.5))
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let origin = self.center.to_world_pixel(self.zoom);
        let world = pixel.subtract(&self.size.multiply(0.5)).add(&origin);
        LatLng::from_world_pixel(&world, self.zoom)
    }

    /// Geographic area currently visible
    pub fn visible_bounds(&self) -> LatLngBounds {
        let south_west = self.pixel_to_lat_lng(&Point::new(0.0, self.size.y));
        let north_east = self.pixel_to_lat_lng(&Point::new(self.size.x, 0.0));
        LatLngBounds::new(south_west, north_east)
    }

    /// Highest integer zoom at which `bounds` fits inside the viewport minus padding
    pub fn bounds_zoom(&self, bounds: &LatLngBounds, padding: &Point) -> f64 {
        let available = Point::new(
            (self.size.x - padding.x * 2.0).max(1.0),
            (self.size.y - padding.y * 2.0).max(1.0),
        );

        let north_west = LatLng::new(bounds.north(), bounds.west()).to_world_pixel(0.0);
        let south_east = LatLng::new(bounds.south(), bounds.east()).to_world_pixel(0.0);
        let span = south_east.subtract(&north_west);

        let scale = (available.x / span.x).min(available.y / span.y);
        let zoom = scale.log2().floor();

        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Centers on the bounds and zooms to fit them, capped at their max zoom
    pub fn fit_bounds(&mut self, fit: &FitBounds) {
        let zoom = self.bounds_zoom(&fit.bounds, &fit.padding).min(fit.max_zoom);

        let north_west = LatLng::new(fit.bounds.north(), fit.bounds.west()).to_world_pixel(zoom);
        let south_east = LatLng::new(fit.bounds.south(), fit.bounds.east()).to_world_pixel(zoom);
        let center = north_west.add(&south_east).multiply(0.5);

        self.center = LatLng::from_world_pixel(&center, zoom);
        self.set_zoom(zoom);
    }
}

/// Remembers which fit bounds were last applied to the viewport.
///
/// Applying an adjustment only moves the viewport; it never feeds back into
/// the bounds, so the same bounds are applied exactly once.
#[derive(Debug, Clone, Default)]
pub struct ViewportSync {
    last_applied: Option<FitBounds>,
}

impl ViewportSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bounds to apply if they differ from the last applied ones
    pub fn take_adjustment(&mut self, current: Option<&FitBounds>) -> Option<FitBounds> {
        match current {
            Some(fit) if self.last_applied.as_ref() != Some(fit) => {
                self.last_applied = Some(fit.clone());
                Some(fit.clone())
            }
            Some(_) => None,
            None => {
                self.last_applied = None;
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_applied = None;
    }
}
