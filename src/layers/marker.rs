//! Marker and cluster badge icons
//!
//! Icons are built in two phases. [`IconSpec`] is a pure description that can
//! be computed anywhere. [`MarkerFactory::materialize`] turns it into markup
//! and needs an interactive [`RenderContext`]; until then the icon is
//! [`IconState::Pending`] and the marker is skipped for that pass.

use crate::constants::{
    CLUSTER_BADGE_LARGE, CLUSTER_BADGE_MEDIUM, CLUSTER_BADGE_SMALL, MARKER_ICON_ANCHOR,
    MARKER_ICON_SIZE,
};
use crate::{
    core::geo::LatLng,
    data::property::PropertyKind,
    rendering::context::RenderContext,
    ui::style::{Color, MapStyle},
    MapError, Result,
};
use maud::html;

/// Cluster badge size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeSize {
    Small,
    Medium,
    Large,
}

impl BadgeSize {
    pub fn from_count(count: usize) -> Self {
        if count < 10 {
            Self::Small
        } else if count < 100 {
            Self::Medium
        } else {
            Self::Large
        }
    }

    pub fn diameter(&self) -> u32 {
        match self {
            Self::Small => CLUSTER_BADGE_SMALL,
            Self::Medium => CLUSTER_BADGE_MEDIUM,
            Self::Large => CLUSTER_BADGE_LARGE,
        }
    }

    fn modifier(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    Property(PropertyKind),
    Cluster(BadgeSize),
}

/// Pure description of an icon
#[derive(Debug, Clone, PartialEq)]
pub struct IconSpec {
    pub kind: IconKind,
    pub class_name: String,
    pub color: Color,
    pub border_color: Color,
    pub border_width: f32,
    pub text_color: Color,
    /// Glyph for property pins, member count for cluster badges
    pub label: String,
    pub size: (u32, u32),
    pub anchor: (u32, u32),
}

/// A materialized icon ready to be placed on the map
#[derive(Debug, Clone, PartialEq)]
pub struct Icon {
    pub spec: IconSpec,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IconState {
    /// No render context yet
    Pending,
    Ready(Icon),
}

impl IconState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn icon(&self) -> Option<&Icon> {
        match self {
            Self::Ready(icon) => Some(icon),
            Self::Pending => None,
        }
    }
}

fn glyph(kind: PropertyKind) -> &'static str {
    match kind {
        PropertyKind::House => "\u{1F3E0}",
        PropertyKind::Apartment => "\u{1F3E2}",
        PropertyKind::Land => "\u{1F333}",
        PropertyKind::Commercial => "\u{1F3EA}",
        PropertyKind::Other => "\u{1F4CD}",
    }
}

/// Builds marker and badge icons from a [`MapStyle`]
#[derive(Debug, Clone, Default)]
pub struct MarkerFactory {
    style: MapStyle,
}

impl MarkerFactory {
    pub fn new(style: MapStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &MapStyle {
        &self.style
    }

    pub fn property_icon_spec(&self, kind: PropertyKind) -> IconSpec {
        let markers = &self.style.markers;
        IconSpec {
            kind: IconKind::Property(kind),
            class_name: format!("property-marker property-marker--{}", kind.as_str()),
            color: markers.color_for(kind),
            border_color: markers.border_color,
            border_width: markers.border_width,
            text_color: Color::WHITE,
            label: glyph(kind).to_string(),
            size: MARKER_ICON_SIZE,
            anchor: MARKER_ICON_ANCHOR,
        }
    }

    /// Badge for a cluster; depends on the member count only
    pub fn cluster_icon_spec(&self, count: usize) -> IconSpec {
        let size = BadgeSize::from_count(count);
        let clusters = &self.style.clusters;
        let color = match size {
            BadgeSize::Small => clusters.small,
            BadgeSize::Medium => clusters.medium,
            BadgeSize::Large => clusters.large,
        };
        let diameter = size.diameter();

        IconSpec {
            kind: IconKind::Cluster(size),
            class_name: format!("marker-cluster marker-cluster--{}", size.modifier()),
            color,
            border_color: clusters.text_color,
            border_width: 2.0,
            text_color: clusters.text_color,
            label: count.to_string(),
            size: (diameter, diameter),
            anchor: (diameter / 2, diameter / 2),
        }
    }

    pub fn materialize(&self, spec: &IconSpec, context: &RenderContext) -> Result<Icon> {
        if !context.is_ready() {
            return Err(MapError::IconNotReady(spec.class_name.clone()));
        }

        let radius = match spec.kind {
            IconKind::Property(_) => "50% 50% 50% 0",
            IconKind::Cluster(_) => "50%",
        };
        let style = format!(
            "background-color:{};border:{}px solid {};color:{};width:{}px;height:{}px;\
             margin-left:-{}px;margin-top:-{}px;border-radius:{};",
            spec.color.to_hex(),
            spec.border_width,
            spec.border_color.to_hex(),
            spec.text_color.to_hex(),
            spec.size.0,
            spec.size.1,
            spec.anchor.0,
            spec.anchor.1,
            radius,
        );

        let markup = html! {
            div class=(spec.class_name) style=(style) data-retina=(context.is_retina().to_string()) {
                span { (spec.label) }
            }
        };

        Ok(Icon {
            spec: spec.clone(),
            html: markup.into_string(),
        })
    }

    /// Like [`Self::materialize`], but reports a missing context as pending
    pub fn icon_state(&self, spec: &IconSpec, context: &RenderContext) -> IconState {
        match self.materialize(spec, context) {
            Ok(icon) => IconState::Ready(icon),
            Err(_) => IconState::Pending,
        }
    }
}

/// A property pin on the map
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub property_id: i64,
    pub position: LatLng,
    pub kind: PropertyKind,
    pub icon: IconState,
}

impl Marker {
    pub fn new(property_id: i64, position: LatLng, kind: PropertyKind, icon: IconState) -> Self {
        Self {
            property_id,
            position,
            kind,
            icon,
        }
    }

    /// Markers with a pending icon are not drawn in this pass
    pub fn is_drawable(&self) -> bool {
        self.icon.is_ready()
    }
}

/// A cluster badge on the map
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterMarker {
    pub cluster_id: String,
    pub position: LatLng,
    pub count: usize,
    pub property_ids: Vec<i64>,
    pub icon: IconState,
}
