pub mod marker;

pub use marker::{BadgeSize, ClusterMarker, Icon, IconKind, IconSpec, IconState, Marker, MarkerFactory};
