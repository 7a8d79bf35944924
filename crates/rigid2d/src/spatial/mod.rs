//! Spatial partitioning data structures
//!
//! Provides the broad-phase index used for collision candidate search,
//! render culling and area picking in 2D.

mod quadtree;

pub use quadtree::{
    QuadTree, QuadTreeData, QuadTreeKey, QuadTreeNode, SpatialError, DEFAULT_MAX_DEPTH,
};
