use crate::data::property::PropertyKind;
use serde::{Deserialize, Serialize};

/// An opaque RGB color rendered as a CSS hex string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::from_rgb(255, 255, 255);
    pub const BLACK: Color = Color::from_rgb(0, 0, 0);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Style for map markers
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub house: Color,
    pub apartment: Color,
    pub land: Color,
    pub commercial: Color,
    /// Used for unrecognized property types
    pub default_color: Color,
    pub border_color: Color,
    pub border_width: f32,
}

impl MarkerStyle {
    pub fn color_for(&self, kind: PropertyKind) -> Color {
        match kind {
            PropertyKind::House => self.house,
            PropertyKind::Apartment => self.apartment,
            PropertyKind::Land => self.land,
            PropertyKind::Commercial => self.commercial,
            PropertyKind::Other => self.default_color,
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            house: Color::from_rgb(0x3b, 0x82, 0xf6),
            apartment: Color::from_rgb(0x10, 0xb9, 0x81),
            land: Color::from_rgb(0xf5, 0x9e, 0x0b),
            commercial: Color::from_rgb(0x8b, 0x5c, 0xf6),
            default_color: Color::from_rgb(0x6b, 0x72, 0x80),
            border_color: Color::WHITE,
            border_width: 2.0,
        }
    }
}

/// Style for cluster count badges, by size class
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterStyle {
    pub small: Color,
    pub medium: Color,
    pub large: Color,
    pub text_color: Color,
}

impl Default for ClusterStyle {
    fn default() -> Self {
        Self {
            small: Color::from_rgb(0x60, 0xa5, 0xfa),
            medium: Color::from_rgb(0xf5, 0x9e, 0x0b),
            large: Color::from_rgb(0xef, 0x44, 0x44),
            text_color: Color::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapStyle {
    pub markers: MarkerStyle,
    pub clusters: ClusterStyle,
}

/// Predefined themes for different map styles
pub struct MapThemes;

impl MapThemes {
    /// Light theme (default)
    pub fn light() -> MapStyle {
        MapStyle::default()
    }

    /// High contrast theme for accessibility
    pub fn high_contrast() -> MapStyle {
        MapStyle {
            markers: MarkerStyle {
                house: Color::from_rgb(0x00, 0x33, 0xcc),
                apartment: Color::from_rgb(0x00, 0x66, 0x33),
                land: Color::from_rgb(0x99, 0x4d, 0x00),
                commercial: Color::from_rgb(0x66, 0x00, 0x99),
                default_color: Color::BLACK,
                border_color: Color::BLACK,
                border_width: 3.0,
            },
            clusters: ClusterStyle {
                small: Color::from_rgb(0x00, 0x33, 0xcc),
                medium: Color::from_rgb(0x99, 0x4d, 0x00),
                large: Color::from_rgb(0xcc, 0x00, 0x00),
                text_color: Color::WHITE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(Color::from_rgb(59, 130, 246).to_hex(), "#3b82f6");
        assert_eq!(Color::WHITE.to_hex(), "#ffffff");
    }

    #[test]
    fn test_each_kind_has_distinct_color() {
        let style = MarkerStyle::default();
        let kinds = [
            PropertyKind::House,
            PropertyKind::Apartment,
            PropertyKind::Land,
            PropertyKind::Commercial,
            PropertyKind::Other,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(style.color_for(*a), style.color_for(*b));
            }
        }
    }

    #[test]
    fn test_high_contrast_theme() {
        let theme = MapThemes::high_contrast();
        assert_eq!(theme.markers.border_width, 3.0);
        assert_ne!(theme, MapThemes::light());
    }
}
