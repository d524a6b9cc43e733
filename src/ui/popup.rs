use crate::{
    core::{config::{ImagePreset, MapSettings}, geo::LatLng},
    data::{images::ImageResolver, property::PropertyGeoRecord},
    ui::{
        format::format_price,
        i18n::{translate_operation_type, translate_property_type},
        views::IMAGE_FALLBACK_SCRIPT,
    },
};
use maud::{html, Markup};
use std::sync::Arc;

pub const VIEW_DETAILS_LABEL: &str = "Ver Detalles";

/// Everything a marker popup shows, resolved from one record
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub property_id: i64,
    pub title: String,
    pub image_url: String,
    /// Swapped in by the browser if `image_url` fails to load
    pub placeholder_url: String,
    pub price_label: String,
    pub type_label: String,
    pub operation_label: String,
    pub details_href: String,
}

impl PopupContent {
    pub fn uses_placeholder(&self) -> bool {
        self.image_url == self.placeholder_url
    }

    pub fn render(&self) -> Markup {
        html! {
            div class="property-popup" data-property-id=(self.property_id) {
                div class="property-popup__media" {
                    img class="property-popup__image"
                        src=(self.image_url)
                        alt=(self.title)
                        loading="lazy"
                        data-fallback=(self.placeholder_url)
                        onerror=(IMAGE_FALLBACK_SCRIPT);
                    span class="property-popup__badge" { (self.operation_label) }
                }
                div class="property-popup__body" {
                    h3 class="property-popup__title" { (self.title) }
                    p class="property-popup__price" { (self.price_label) }
                    p class="property-popup__type" { (self.type_label) }
                    a class="property-popup__cta"
                        href=(self.details_href)
                        data-action="view-details"
                        data-property-id=(self.property_id) {
                        (VIEW_DETAILS_LABEL)
                    }
                }
            }
        }
    }

    pub fn to_html(&self) -> String {
        self.render().into_string()
    }
}

/// Builds popup content for a single record
#[derive(Clone)]
pub struct PopupRenderer {
    resolver: Arc<dyn ImageResolver>,
    preset: ImagePreset,
    settings: MapSettings,
}

impl PopupRenderer {
    pub fn new(resolver: Arc<dyn ImageResolver>, settings: &MapSettings) -> Self {
        Self {
            resolver,
            preset: settings.image_preset.clone(),
            settings: settings.clone(),
        }
    }

    pub fn render(&self, record: &PropertyGeoRecord) -> PopupContent {
        PopupContent {
            property_id: record.id,
            title: record.title.clone(),
            image_url: self
                .resolver
                .resolve_or_placeholder(record.cover_image(), &self.preset),
            placeholder_url: self.resolver.placeholder().to_string(),
            price_label: format_price(record.price, record.currency),
            type_label: translate_property_type(&record.property_type),
            operation_label: translate_operation_type(&record.operation_type),
            details_href: self.settings.detail_href(record.id),
        }
    }

    /// Resolves a record's cover for an arbitrary preset (list thumbnails)
    pub fn image_for(&self, record: &PropertyGeoRecord, preset: &ImagePreset) -> String {
        self.resolver.resolve_or_placeholder(record.cover_image(), preset)
    }

    pub fn placeholder(&self) -> &str {
        self.resolver.placeholder()
    }
}

/// A popup anchored on the map
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub position: LatLng,
    pub content: PopupContent,
}

/// Keeps track of the single open popup
#[derive(Debug, Default)]
pub struct PopupManager {
    open: Option<Popup>,
}

impl PopupManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, popup: Popup) {
        self.open = Some(popup);
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn current(&self) -> Option<&Popup> {
        self.open.as_ref()
    }
}
