//! Property records and the collaborators that supply them

pub mod images;
pub mod property;
pub mod provider;

pub use images::{CdnImageResolver, ImageResolver};
pub use property::{filter_renderable, Currency, OperationKind, PropertyGeoRecord, PropertyKind};
pub use provider::{GeoDataProvider, HttpGeoDataProvider, StaticProvider};
