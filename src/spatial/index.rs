use crate::core::geo::{LatLng, LatLngBounds};

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A point item indexed in the R-tree.
///
/// `order` is the insertion sequence, so query results can be put back in
/// the order the records arrived in.
#[derive(Debug, Clone)]
pub struct SpatialItem<T> {
    pub id: String,
    pub position: LatLng,
    pub order: usize,
    pub data: T,
}

impl<T> SpatialItem<T> {
    pub fn new(id: String, position: LatLng, order: usize, data: T) -> Self {
        Self {
            id,
            position,
            order,
            data,
        }
    }
}

impl<T> PartialEq for SpatialItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for SpatialItem<T> {}

// --- rstar integration -------------------------------------------------------------------------

impl<T> RTreeObject for SpatialItem<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.position.lng, self.position.lat])
    }
}

impl<T> PointDistance for SpatialItem<T> {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position.lng - point[0];
        let dy = self.position.lat - point[1];
        dx * dx + dy * dy
    }
}

/// R-tree over marker positions (x = lng, y = lat)
pub struct SpatialIndex<T> {
    rtree: RTree<SpatialItem<T>>,
    next_order: usize,
}

impl<T> SpatialIndex<T> {
    pub fn new() -> Self {
        Self {
            rtree: RTree::new(),
            next_order: 0,
        }
    }

    pub fn insert(&mut self, id: String, position: LatLng, data: T) {
        let item = SpatialItem::new(id, position, self.next_order, data);
        self.next_order += 1;
        self.rtree.insert(item);
    }

    /// Items inside `bounds`, in insertion order
    pub fn query(&self, bounds: &LatLngBounds) -> Vec<&SpatialItem<T>> {
        let envelope = AABB::from_corners(
            [bounds.west(), bounds.south()],
            [bounds.east(), bounds.north()],
        );
        let mut items: Vec<_> = self.rtree.locate_in_envelope(&envelope).collect();
        items.sort_by_key(|item| item.order);
        items
    }

    /// Every item, in insertion order
    pub fn all_items(&self) -> Vec<&SpatialItem<T>> {
        let mut items: Vec<_> = self.rtree.iter().collect();
        items.sort_by_key(|item| item.order);
        items
    }

    pub fn clear(&mut self) {
        self.rtree = RTree::new();
        self.next_order = 0;
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
