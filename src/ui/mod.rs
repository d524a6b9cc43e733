pub mod format;
pub mod i18n;
pub mod popup;
pub mod style;
pub mod views;

pub use format::format_price;
pub use i18n::{translate_operation_type, translate_property_type};
pub use popup::{Popup, PopupContent, PopupManager, PopupRenderer};
pub use style::{Color, MapStyle, MapThemes, MarkerStyle};
