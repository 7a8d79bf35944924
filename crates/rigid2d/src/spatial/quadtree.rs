//! Quadtree spatial partitioning structure
//!
//! Divides a 2D world into a fixed hierarchy of quadrants, built once up
//! front down to a minimum cell size. Items are bounding rectangles with an
//! owner attached; each one is recorded in every leaf its bounds touch, so
//! a query over any part of an item finds it.

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::Vec2;
use crate::scene::BoundingRect;

/// Depth cap used by [`QuadTree::create`]
pub const DEFAULT_MAX_DEPTH: u32 = 10;

new_key_type! {
    /// Handle to an item stored in a [`QuadTree`]
    pub struct QuadTreeKey;
}

/// Errors raised while building a quadtree
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SpatialError {
    /// The minimum cell size is zero, negative or not finite
    #[error("minimum cell size must be positive and finite, got {width} x {height}")]
    DegenerateMinimumBounds {
        /// Requested minimum width
        width: f32,
        /// Requested minimum height
        height: f32,
    },

    /// The world bounds enclose no area
    #[error("tree bounds must have positive finite size, got {width} x {height}")]
    DegenerateBounds {
        /// World width
        width: f32,
        /// World height
        height: f32,
    },
}

/// Item stored in the tree: its bounds plus whatever owns it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadTreeData<T> {
    /// World-space bounds used for leaf placement
    pub bounds: BoundingRect,
    /// Back-reference to the owning object
    pub owner: T,
}

impl<T> QuadTreeData<T> {
    /// Pair bounds with an owner
    pub fn new(bounds: BoundingRect, owner: T) -> Self {
        Self { bounds, owner }
    }
}

/// Single node in the quadtree hierarchy
#[derive(Debug, Clone)]
pub struct QuadTreeNode {
    /// World-space bounds of this node
    pub bounds: BoundingRect,

    /// Depth in the tree (0 = root)
    pub depth: u32,

    /// Arena indices of the four quadrants, None if this is a leaf
    children: Option<[usize; 4]>,

    /// Items touching this node (leaves only)
    items: Vec<QuadTreeKey>,
}

impl QuadTreeNode {
    fn new(bounds: BoundingRect, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            children: None,
            items: Vec::new(),
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Arena indices of the children
    pub fn children(&self) -> Option<[usize; 4]> {
        self.children
    }

    /// Keys of the items recorded at this node
    pub fn items(&self) -> &[QuadTreeKey] {
        &self.items
    }

    /// Quadrant bounds in order: bottom-left, bottom-right, top-left, top-right
    fn quadrants(&self) -> [BoundingRect; 4] {
        let min = self.bounds.min;
        let max = self.bounds.max;
        let mid = self.bounds.center();
        [
            BoundingRect::new(min, mid),
            BoundingRect::new(Vec2::new(mid.x, min.y), Vec2::new(max.x, mid.y)),
            BoundingRect::new(Vec2::new(min.x, mid.y), Vec2::new(mid.x, max.y)),
            BoundingRect::new(mid, max),
        ]
    }
}

/// Statically partitioned quadtree with items addressed by [`QuadTreeKey`]
#[derive(Debug, Clone)]
pub struct QuadTree<T> {
    /// Node arena, root at index 0
    nodes: Vec<QuadTreeNode>,
    /// Item storage
    items: SlotMap<QuadTreeKey, QuadTreeData<T>>,
    /// Smallest leaf size the tree was built for
    min_size: Vec2,
}

fn has_area(size: Vec2) -> bool {
    size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0
}

impl<T> QuadTree<T> {
    /// Build the full node hierarchy for `bounds`
    ///
    /// A node is split while each of its quadrants would still be at least
    /// as large as `min_bounds` in both axes. Only the size of `min_bounds`
    /// matters, not its position. Subdivision also stops at
    /// [`DEFAULT_MAX_DEPTH`].
    pub fn create(min_bounds: BoundingRect, bounds: BoundingRect) -> Result<Self, SpatialError> {
        Self::create_with_max_depth(min_bounds, bounds, DEFAULT_MAX_DEPTH)
    }

    /// Same as [`QuadTree::create`], never splitting nodes at `max_depth`
    pub fn create_with_max_depth(
        min_bounds: BoundingRect,
        bounds: BoundingRect,
        max_depth: u32,
    ) -> Result<Self, SpatialError> {
        let min_size = min_bounds.size();
        if !has_area(min_size) {
            return Err(SpatialError::DegenerateMinimumBounds {
                width: min_size.x,
                height: min_size.y,
            });
        }
        let world_size = bounds.size();
        if !has_area(world_size) {
            return Err(SpatialError::DegenerateBounds {
                width: world_size.x,
                height: world_size.y,
            });
        }

        let mut nodes = vec![QuadTreeNode::new(bounds, 0)];
        let mut stack = vec![0usize];
        let mut depth_capped = false;

        while let Some(index) = stack.pop() {
            let half = nodes[index].bounds.size() * 0.5;
            if half.x < min_size.x || half.y < min_size.y {
                continue;
            }
            let depth = nodes[index].depth;
            if depth >= max_depth {
                depth_capped = true;
                continue;
            }

            let first = nodes.len();
            let quadrants = nodes[index].quadrants();
            for quadrant in quadrants {
                nodes.push(QuadTreeNode::new(quadrant, depth + 1));
            }
            let children = [first, first + 1, first + 2, first + 3];
            nodes[index].children = Some(children);
            stack.extend(children);
        }

        if depth_capped {
            log::warn!(
                "Quadtree subdivision stopped at depth {} before reaching cell size {:?}",
                max_depth,
                min_size
            );
        }
        log::info!(
            "Created quadtree over {:?}..{:?} with {} nodes",
            bounds.min,
            bounds.max,
            nodes.len()
        );

        Ok(Self {
            nodes,
            items: SlotMap::with_key(),
            min_size,
        })
    }

    /// Store an item in every leaf its bounds intersect
    ///
    /// Returns `None` and stores nothing if the item lies outside the tree.
    pub fn insert(&mut self, data: QuadTreeData<T>) -> Option<QuadTreeKey> {
        let leaves = self.leaf_indices(&data.bounds);
        if leaves.is_empty() {
            return None;
        }

        let key = self.items.insert(data);
        for leaf in leaves {
            self.nodes[leaf].items.push(key);
        }
        Some(key)
    }

    /// Remove an item from the tree, returning its data
    pub fn remove(&mut self, key: QuadTreeKey) -> Option<QuadTreeData<T>> {
        let data = self.items.remove(key)?;
        self.unlink(key, &data.bounds);
        Some(data)
    }

    /// Move an item to new bounds under the same key
    ///
    /// Returns `false` if the key is unknown. An item whose new bounds leave
    /// the tree is dropped and `false` is returned.
    pub fn update(&mut self, key: QuadTreeKey, bounds: BoundingRect) -> bool {
        let Some(old_bounds) = self.items.get(key).map(|data| data.bounds) else {
            return false;
        };
        if old_bounds == bounds {
            return true;
        }

        self.unlink(key, &old_bounds);
        let leaves = self.leaf_indices(&bounds);
        if leaves.is_empty() {
            self.items.remove(key);
            log::debug!("Dropped quadtree item {:?}: bounds {:?} left the tree", key, bounds);
            return false;
        }

        for leaf in leaves {
            self.nodes[leaf].items.push(key);
        }
        if let Some(data) = self.items.get_mut(key) {
            data.bounds = bounds;
        }
        true
    }

    /// Keys of every item recorded in a leaf that intersects `area`
    pub fn query(&self, area: &BoundingRect) -> Vec<QuadTreeKey> {
        let mut results = Vec::new();
        self.query_into(area, &mut results);
        results
    }

    /// Same as [`QuadTree::query`], reusing a caller-owned buffer
    ///
    /// The buffer is cleared first. Each key appears once.
    pub fn query_into(&self, area: &BoundingRect, results: &mut Vec<QuadTreeKey>) {
        results.clear();
        for leaf in self.leaf_indices(area) {
            results.extend_from_slice(&self.nodes[leaf].items);
        }
        results.sort_unstable();
        results.dedup();
    }

    /// Look up an item
    pub fn get(&self, key: QuadTreeKey) -> Option<&QuadTreeData<T>> {
        self.items.get(key)
    }

    /// Iterate over every stored item
    pub fn iter(&self) -> impl Iterator<Item = (QuadTreeKey, &QuadTreeData<T>)> {
        self.items.iter()
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the tree holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// World bounds covered by the tree
    pub fn bounds(&self) -> BoundingRect {
        self.nodes[0].bounds
    }

    /// Minimum cell size the tree was built for
    pub fn min_size(&self) -> Vec2 {
        self.min_size
    }

    /// All leaf nodes, for debug visualisation
    pub fn leaves(&self) -> impl Iterator<Item = &QuadTreeNode> {
        self.nodes.iter().filter(|node| node.is_leaf())
    }

    /// Node arena access
    pub fn node(&self, index: usize) -> Option<&QuadTreeNode> {
        self.nodes.get(index)
    }

    /// Total number of nodes, leaves and branches
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest leaf
    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    /// Drop every item, keeping the node topology
    pub fn clear(&mut self) {
        self.items.clear();
        for node in &mut self.nodes {
            node.items.clear();
        }
    }

    fn unlink(&mut self, key: QuadTreeKey, bounds: &BoundingRect) {
        for leaf in self.leaf_indices(bounds) {
            self.nodes[leaf].items.retain(|item| *item != key);
        }
    }

    /// Indices of the leaves intersecting `area`
    fn leaf_indices(&self, area: &BoundingRect) -> Vec<usize> {
        let mut leaves = Vec::new();
        if !self.nodes[0].bounds.is_intersecting(area) {
            return leaves;
        }

        let mut stack = vec![0usize];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            match node.children {
                None => leaves.push(index),
                Some(children) => stack.extend(
                    children
                        .into_iter()
                        .filter(|child| self.nodes[*child].bounds.is_intersecting(area)),
                ),
            }
        }
        leaves
    }
}
