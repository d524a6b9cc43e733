//! Markup for the map region in each UI state

use crate::core::config::ResolvedMapOptions;
use crate::data::property::PropertyGeoRecord;
use crate::ui::format::format_price;
use maud::{html, Markup};

pub const LOADING_MESSAGE: &str = "Cargando mapa de propiedades...";
pub const ERROR_TITLE: &str = "No pudimos cargar el mapa";
pub const RETRY_LABEL: &str = "Reintentar";
pub const EMPTY_MESSAGE: &str = "No hay propiedades para mostrar en el mapa";

/// `onerror` handler that swaps in the URL from the image's `data-fallback`
pub(crate) const IMAGE_FALLBACK_SCRIPT: &str = "this.onerror=null;this.src=this.dataset.fallback;";

fn container_style(options: &ResolvedMapOptions) -> String {
    format!("height:{}px;", options.height_px)
}

/// Wraps state content in the sized, density-classed map region
pub fn map_container(options: &ResolvedMapOptions, state: &str, content: Markup) -> Markup {
    html! {
        section class={ "property-map " (options.density.css_class()) }
            style=(container_style(options))
            data-state=(state)
            data-breakpoint=(options.breakpoint.as_str()) {
            (content)
        }
    }
}

pub fn loading_view() -> Markup {
    html! {
        div class="property-map__loading" role="status" aria-live="polite" {
            div class="property-map__spinner" {}
            p { (LOADING_MESSAGE) }
        }
    }
}

pub fn error_view(message: &str) -> Markup {
    html! {
        div class="property-map__error" role="alert" {
            h3 { (ERROR_TITLE) }
            p class="property-map__error-message" { (message) }
            button type="button" class="property-map__retry" data-action="retry" {
                (RETRY_LABEL)
            }
        }
    }
}

pub fn empty_view() -> Markup {
    html! {
        div class="property-map__empty" {
            p { (EMPTY_MESSAGE) }
        }
    }
}

/// Thumbnail card used by the list next to the map
pub fn property_thumbnail(record: &PropertyGeoRecord, image_url: &str, placeholder: &str) -> Markup {
    html! {
        article class="property-thumb" data-property-id=(record.id) {
            img class="property-thumb__image"
                src=(image_url)
                alt=(record.title)
                data-fallback=(placeholder)
                onerror=(IMAGE_FALLBACK_SCRIPT);
            div class="property-thumb__body" {
                h4 { (record.title) }
                p { (format_price(record.price, record.currency)) }
            }
        }
    }
}
