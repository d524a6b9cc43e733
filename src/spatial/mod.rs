pub mod clustering;
pub mod index;

pub use clustering::{Cluster, ClusterAction, ClusterPolicy, Clustering, ClusteringConfig, SpiderLeg};
pub use index::{SpatialIndex, SpatialItem};
