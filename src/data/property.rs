use crate::core::geo::LatLng;
use crate::ui::i18n::normalize_key;
use serde::{Deserialize, Serialize};

/// Currency a listing is priced in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Ars,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Ars => "ARS",
        }
    }
}

/// Closed set of property types; anything else maps to `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    House,
    Apartment,
    Land,
    Commercial,
    Other,
}

impl PropertyKind {
    /// Accepts English and Spanish spellings in any case
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "house" | "casa" => Self::House,
            "apartment" | "departamento" | "depto" | "apartamento" => Self::Apartment,
            "land" | "terreno" | "lote" => Self::Land,
            "commercial" | "comercial" | "local" => Self::Commercial,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Apartment => "apartment",
            Self::Land => "land",
            Self::Commercial => "commercial",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Sale,
    Rent,
    Other,
}

impl OperationKind {
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "sale" | "venta" => Self::Sale,
            "rent" | "alquiler" | "renta" => Self::Rent,
            _ => Self::Other,
        }
    }
}

/// Immutable snapshot of a listing as the map sees it.
///
/// Type and operation keep the raw backend strings; use [`Self::kind`] and
/// [`Self::operation`] for the parsed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyGeoRecord {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub currency: Currency,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub property_type: String,
    pub operation_type: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: String,
}

impl PropertyGeoRecord {
    pub fn kind(&self) -> PropertyKind {
        PropertyKind::parse(&self.property_type)
    }

    pub fn operation(&self) -> OperationKind {
        OperationKind::parse(&self.operation_type)
    }

    /// Position if both coordinates are present and valid
    pub fn position(&self) -> Option<LatLng> {
        let position = LatLng::new(self.latitude?, self.longitude?);
        position.is_valid().then_some(position)
    }

    pub fn is_renderable(&self) -> bool {
        self.position().is_some()
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Keeps the records that can be placed on the map, in their original order
pub fn filter_renderable(records: Vec<PropertyGeoRecord>) -> Vec<PropertyGeoRecord> {
    records.into_iter().filter(|r| r.is_renderable()).collect()
}
