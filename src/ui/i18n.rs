//! Spanish display labels for property and operation types
//!
//! Backend rows mix English and Spanish spellings in any case. Keys are
//! normalized (trimmed, lowercased) and looked up in the tables below; a key
//! that is not listed passes through title-cased.

use crate::prelude::HashMap;
use once_cell::sync::Lazy;

/// Every accepted spelling of a property type and its canonical label
pub const PROPERTY_TYPE_LABELS: &[(&str, &str)] = &[
    ("house", "Casa"),
    ("casa", "Casa"),
    ("apartment", "Departamento"),
    ("departamento", "Departamento"),
    ("depto", "Departamento"),
    ("apartamento", "Departamento"),
    ("land", "Terreno"),
    ("terreno", "Terreno"),
    ("lote", "Terreno"),
    ("commercial", "Comercial"),
    ("comercial", "Comercial"),
    ("local", "Comercial"),
];

/// Every accepted spelling of an operation type and its canonical label
pub const OPERATION_TYPE_LABELS: &[(&str, &str)] = &[
    ("sale", "Venta"),
    ("venta", "Venta"),
    ("rent", "Alquiler"),
    ("alquiler", "Alquiler"),
    ("renta", "Alquiler"),
];

static PROPERTY_TYPES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| PROPERTY_TYPE_LABELS.iter().copied().collect());

static OPERATION_TYPES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| OPERATION_TYPE_LABELS.iter().copied().collect());

pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Uppercases the first letter of every word, leaving the rest untouched
pub fn title_case(raw: &str) -> String {
    raw.trim()
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn translate(table: &HashMap<&'static str, &'static str>, raw: &str) -> String {
    match table.get(normalize_key(raw).as_str()) {
        Some(label) => (*label).to_string(),
        None => title_case(raw),
    }
}

pub fn translate_property_type(raw: &str) -> String {
    translate(&PROPERTY_TYPES, raw)
}

pub fn translate_operation_type(raw: &str) -> String {
    translate(&OPERATION_TYPES, raw)
}
