use crate::constants::{
    CLUSTER_GRID_SIZE, CLUSTER_THRESHOLD, MAX_ZOOM, SPIDERFY_CIRCLE_FOOT_SEPARATION,
    SPIDERFY_CIRCLE_MAX, SPIDERFY_SPIRAL_FOOT_SEPARATION, SPIDERFY_SPIRAL_LENGTH_FACTOR,
    SPIDERFY_SPIRAL_LENGTH_START,
};
use crate::prelude::HashMap;
use crate::{
    core::{
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    spatial::index::{SpatialIndex, SpatialItem},
};
use std::f64::consts::PI;

/// Decides per render pass whether markers are grouped.
///
/// Clustering is on when forced explicitly or when the rendered count
/// reaches the threshold (the boundary is inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterPolicy {
    pub threshold: usize,
    pub explicit: bool,
}

impl ClusterPolicy {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            explicit: false,
        }
    }

    pub fn with_explicit(mut self, explicit: bool) -> Self {
        self.explicit = explicit;
        self
    }

    pub fn should_cluster(&self, rendered_count: usize) -> bool {
        self.explicit || rendered_count >= self.threshold
    }
}

impl Default for ClusterPolicy {
    fn default() -> Self {
        Self::new(CLUSTER_THRESHOLD)
    }
}

/// Represents a cluster of markers
#[derive(Debug, Clone)]
pub struct Cluster<T> {
    /// Unique identifier for the cluster
    pub id: String,
    /// Center point of the cluster
    pub center: LatLng,
    /// Geographic bounds of the cluster
    pub bounds: LatLngBounds,
    /// Items in this cluster, in insertion order
    pub items: Vec<SpatialItem<T>>,
    /// Zoom level at which this cluster was created
    pub zoom_level: f64,
}

impl<T> Cluster<T> {
    fn new(id: String, items: Vec<SpatialItem<T>>, zoom_level: f64) -> Self {
        let positions: Vec<LatLng> = items.iter().map(|item| item.position).collect();
        let bounds = LatLngBounds::from_points(&positions)
            .unwrap_or_else(|| LatLngBounds::new(LatLng::default(), LatLng::default()));
        let center = bounds.center();

        Self {
            id,
            center,
            bounds,
            items,
            zoom_level,
        }
    }

    /// Get the number of items in the cluster
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Check if this is a single-item cluster
    pub fn is_single(&self) -> bool {
        self.items.len() == 1
    }
}

/// Configuration for clustering
#[derive(Debug, Clone)]
pub struct ClusteringConfig {
    /// Grid size for clustering (in pixels)
    pub grid_size: f64,
    /// Zoom level from which every item is shown on its own
    pub disable_clustering_at_zoom: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            grid_size: CLUSTER_GRID_SIZE,
            disable_clustering_at_zoom: MAX_ZOOM + 1.0,
        }
    }
}

/// What activating a cluster does
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterAction {
    /// Zoom the map to the cluster's bounds
    ZoomToBounds(LatLngBounds),
    /// Already at max zoom: fan the members out around the cluster center
    Spiderfy(Vec<SpiderLeg>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpiderLeg {
    pub id: String,
    pub position: LatLng,
}

/// Grid-based marker clustering
pub struct Clustering<T> {
    config: ClusteringConfig,
    index: SpatialIndex<T>,
}

impl<T: Clone> Clustering<T> {
    /// Create a new clustering instance
    pub fn new(config: ClusteringConfig) -> Self {
        Self {
            config,
            index: SpatialIndex::new(),
        }
    }

    /// Add an item to the clustering system
    pub fn add_item(&mut self, id: String, position: LatLng, data: T) {
        self.index.insert(id, position, data);
    }

    /// Clear all items
    pub fn clear(&mut self) {
        self.index.clear();
    }

    /// Groups the items inside `visible` (all items when `None`) at `zoom_level`.
    ///
    /// Output order is deterministic: cells appear in the order of their
    /// first member.
    pub fn get_clusters(&self, visible: Option<&LatLngBounds>, zoom_level: f64) -> Vec<Cluster<T>> {
        let items = match visible {
            Some(bounds) => self.index.query(bounds),
            None => self.index.all_items(),
        };

        if zoom_level >= self.config.disable_clustering_at_zoom {
            return items
                .into_iter()
                .map(|item| Cluster::new(item.id.clone(), vec![item.clone()], zoom_level))
                .collect();
        }

        let grid_size = self.config.grid_size;
        let mut cells: Vec<((i64, i64), Vec<SpatialItem<T>>)> = Vec::new();
        let mut cell_index: HashMap<(i64, i64), usize> = HashMap::default();

        for item in items {
            let pixel = item.position.to_world_pixel(zoom_level);
            let key = (
                (pixel.x / grid_size).floor() as i64,
                (pixel.y / grid_size).floor() as i64,
            );

            match cell_index.get(&key) {
                Some(&i) => cells[i].1.push(item.clone()),
                None => {
                    cell_index.insert(key, cells.len());
                    cells.push((key, vec![item.clone()]));
                }
            }
        }

        cells
            .into_iter()
            .map(|((grid_x, grid_y), cell_items)| {
                let id = if cell_items.len() == 1 {
                    cell_items[0].id.clone()
                } else {
                    Self::cluster_id(zoom_level, grid_x, grid_y)
                };
                Cluster::new(id, cell_items, zoom_level)
            })
            .collect()
    }

    fn cluster_id(zoom_level: f64, grid_x: i64, grid_y: i64) -> String {
        format!("cluster_{}_{}_{}", zoom_level.floor() as i64, grid_x, grid_y)
    }

    /// Resolves a click on cluster `id` among those visible in `viewport`
    pub fn activate(&self, id: &str, viewport: &Viewport) -> Option<ClusterAction> {
        let visible = viewport.visible_bounds();
        let cluster = self
            .get_clusters(Some(&visible), viewport.zoom)
            .into_iter()
            .find(|cluster| cluster.id == id && !cluster.is_single())?;

        if viewport.is_at_max_zoom() || cluster.bounds.is_point() {
            Some(ClusterAction::Spiderfy(spiderfy(&cluster, viewport)))
        } else {
            Some(ClusterAction::ZoomToBounds(cluster.bounds))
        }
    }

    /// Get the number of items in the clustering system
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the clustering system is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }
}

impl<T: Clone> Default for Clustering<T> {
    fn default() -> Self {
        Self::new(ClusteringConfig::default())
    }
}

/// Pixel offsets of spiderfied legs around a cluster center
pub fn spiderfy_offsets(count: usize) -> Vec<Point> {
    if count <= SPIDERFY_CIRCLE_MAX {
        let circumference = SPIDERFY_CIRCLE_FOOT_SEPARATION * (2.0 + count as f64);
        let leg_length = circumference / (2.0 * PI);
        let angle_step = 2.0 * PI / count.max(1) as f64;
        let start_angle = PI / 6.0;

        (0..count)
            .map(|i| {
                let angle = start_angle + i as f64 * angle_step;
                Point::new(leg_length * angle.cos(), leg_length * angle.sin())
            })
            .collect()
    } else {
        let mut leg_length = SPIDERFY_SPIRAL_LENGTH_START;
        let mut angle = 0.0_f64;

        (0..count)
            .map(|i| {
                angle += SPIDERFY_SPIRAL_FOOT_SEPARATION / leg_length + i as f64 * 0.0005;
                let point = Point::new(leg_length * angle.cos(), leg_length * angle.sin());
                leg_length += 2.0 * PI * SPIDERFY_SPIRAL_LENGTH_FACTOR / angle;
                point
            })
            .collect()
    }
}

fn spiderfy<T>(cluster: &Cluster<T>, viewport: &Viewport) -> Vec<SpiderLeg> {
    let center = viewport.lat_lng_to_pixel(&cluster.center);
    cluster
        .items
        .iter()
        .zip(spiderfy_offsets(cluster.count()))
        .map(|(item, offset)| SpiderLeg {
            id: item.id.clone(),
            position: viewport.pixel_to_lat_lng(&center.add(&offset)),
        })
        .collect()
}
