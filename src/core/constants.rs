//! Core constants for the property map, mostly Leaflet and markercluster defaults.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Rendered record count at which markers start clustering (inclusive).
pub const CLUSTER_THRESHOLD: usize = 50;

/// Padding applied around fit bounds, in CSS pixels, on each side.
pub const FIT_BOUNDS_PADDING: (f64, f64) = (50.0, 50.0);

/// Fit-bounds never zooms past this level, so a lone listing stays in context.
pub const MAX_FIT_ZOOM: f64 = 15.0;

pub const MIN_ZOOM: f64 = 3.0;
pub const MAX_ZOOM: f64 = 18.0;

/// Map center used before any data arrives (Buenos Aires).
pub const DEFAULT_CENTER: (f64, f64) = (-34.6037, -58.3816);

/// Grid cell size used to group markers into clusters, in pixels.
pub const CLUSTER_GRID_SIZE: f64 = 60.0;

/// Spiderfied legs are laid on a circle up to this count, on a spiral above it.
pub const SPIDERFY_CIRCLE_MAX: usize = 8;
pub const SPIDERFY_CIRCLE_FOOT_SEPARATION: f64 = 25.0;
pub const SPIDERFY_SPIRAL_FOOT_SEPARATION: f64 = 28.0;
pub const SPIDERFY_SPIRAL_LENGTH_START: f64 = 11.0;
pub const SPIDERFY_SPIRAL_LENGTH_FACTOR: f64 = 5.0;

/// Window within which resize signals collapse into one recompute.
pub const RESIZE_DEBOUNCE_MS: u64 = 150;

/// Viewport width breakpoints in CSS pixels (lower bound of each class).
pub const TABLET_MIN_WIDTH: f64 = 768.0;
pub const DESKTOP_MIN_WIDTH: f64 = 1024.0;
pub const WIDE_MIN_WIDTH: f64 = 1440.0;

/// Marker pin icon size and anchor (hot-spot) in pixel coords.
pub const MARKER_ICON_SIZE: (u32, u32) = (32, 32);
pub const MARKER_ICON_ANCHOR: (u32, u32) = (16, 32);

/// Cluster badge diameters by size class.
pub const CLUSTER_BADGE_SMALL: u32 = 40;
pub const CLUSTER_BADGE_MEDIUM: u32 = 50;
pub const CLUSTER_BADGE_LARGE: u32 = 60;

/// Popup cover image preset.
pub const POPUP_IMAGE_WIDTH: u32 = 300;
pub const POPUP_IMAGE_HEIGHT: u32 = 200;
pub const POPUP_IMAGE_CROP: &str = "fill";

/// List thumbnail preset.
pub const THUMBNAIL_WIDTH: u32 = 120;
pub const THUMBNAIL_HEIGHT: u32 = 90;

pub const PLACEHOLDER_IMAGE_URL: &str = "/images/property-placeholder.jpg";

/// Detail pages live at `{DETAIL_ROUTE_PREFIX}/{id}`.
pub const DETAIL_ROUTE_PREFIX: &str = "/propiedades";

/// Analytics target id reported by every map event.
pub const MAP_TARGET_ID: &str = "interactive-property-map";

/// Number of resolved image URLs kept in memory.
pub const IMAGE_CACHE_SIZE: usize = 256;
