use octoplane_core::{Aabb, PlaneSegmenter, PointCloud};
use rand::Rng;
use rayon::prelude::*;

use crate::{Octant, OctreeError};

/// Construction parameters for [`SpaceOctree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OctreeParams {
    /// Number of subdivision levels between the root and the leaves.
    /// `0` makes the root itself the only leaf.
    pub depth: usize,
}

impl Default for OctreeParams {
    fn default() -> Self {
        Self { depth: 1 }
    }
}

/// A cell of the octree.
///
/// A node does not know its own level: callers pass the remaining depth down
/// while walking. Nodes reached with a remaining depth of zero are leaves and
/// own the points routed into them; every other node owns only its children.
/// Children are created the first time a point is routed into their octant,
/// so unpopulated regions cost nothing.
#[derive(Debug, Clone)]
pub struct OctreeNode {
    bounds: Aabb,
    children: [Option<Box<OctreeNode>>; Octant::COUNT],
    points: PointCloud,
}

impl OctreeNode {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            children: Default::default(),
            points: PointCloud::new(),
        }
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Points held by this node. Always empty above leaf level.
    pub fn points(&self) -> &PointCloud {
        &self.points
    }

    pub fn child(&self, octant: Octant) -> Option<&OctreeNode> {
        self.children[octant.index()].as_deref()
    }

    /// Present children in octant order.
    pub fn children(&self) -> impl Iterator<Item = (Octant, &OctreeNode)> {
        Octant::all().filter_map(move |o| self.child(o).map(|c| (o, c)))
    }

    pub fn has_children(&self) -> bool {
        self.children.iter().any(Option::is_some)
    }

    /// Octant of this node's box that `point` falls into.
    #[inline]
    pub fn classify_octant(&self, point: &[f32; 3]) -> Octant {
        Octant::classify(&self.bounds.center(), point)
    }

    /// Routes `point` down `remaining_depth` levels and appends it to the
    /// leaf it lands in, creating any missing nodes on the way.
    pub fn insert(&mut self, point: [f32; 3], remaining_depth: usize) {
        let mut node = self;
        for _ in 0..remaining_depth {
            let octant = node.classify_octant(&point);
            let bounds = &node.bounds;
            node = &mut **node.children[octant.index()]
                .get_or_insert_with(|| Box::new(OctreeNode::new(octant.sub_aabb(bounds))));
        }
        node.points.push(point);
    }

    /// Replaces every leaf's points with the inliers `segmenter` picks
    /// for that leaf. Empty leaves are not handed to the segmenter.
    pub fn segment<S>(&mut self, segmenter: &S, remaining_depth: usize)
    where
        S: PlaneSegmenter + ?Sized,
    {
        if remaining_depth == 0 {
            self.segment_leaf(segmenter);
            return;
        }

        for child in self.children.iter_mut().flatten() {
            child.segment(segmenter, remaining_depth - 1);
        }
    }

    /// Same as [`segment`](Self::segment), with sibling subtrees handled on
    /// the rayon pool.
    pub fn par_segment<S>(&mut self, segmenter: &S, remaining_depth: usize)
    where
        S: PlaneSegmenter + Sync + ?Sized,
    {
        if remaining_depth == 0 {
            self.segment_leaf(segmenter);
            return;
        }

        self.children[..]
            .par_iter_mut()
            .filter_map(|slot| slot.as_deref_mut())
            .for_each(|child| child.par_segment(segmenter, remaining_depth - 1));
    }

    fn segment_leaf<S>(&mut self, segmenter: &S)
    where
        S: PlaneSegmenter + ?Sized,
    {
        let n = self.points.len();
        if n == 0 {
            return;
        }

        let mut inliers = segmenter.segment(&self.points);
        let returned = inliers.len();
        inliers.retain(|&i| i < n);
        if inliers.len() != returned {
            log::warn!(
                "segmenter returned {} out-of-range indices for a leaf of {} points; dropping them",
                returned - inliers.len(),
                n
            );
        }

        log::trace!("leaf {:?}: kept {} of {} points", self.bounds, inliers.len(), n);
        self.points = self.points.select(&inliers);
    }

    /// Collects all leaf points below this node, each leaf painted with one
    /// color drawn from `rng`. Leaves are visited depth first in octant order
    /// and each one consumes a single draw, even if it holds no points.
    pub fn export_colorized<R: Rng>(&self, remaining_depth: usize, rng: &mut R) -> PointCloud {
        let mut out = PointCloud::new();
        self.colorize_into(remaining_depth, rng, &mut out);
        out
    }

    fn colorize_into<R: Rng>(&self, remaining_depth: usize, rng: &mut R, out: &mut PointCloud) {
        if remaining_depth == 0 {
            let color: [u8; 3] = rng.gen();
            let mut leaf = self.points.clone();
            leaf.paint_uniform_color(color);
            out.append(&leaf);
            return;
        }

        for child in self.children.iter().flatten() {
            child.colorize_into(remaining_depth - 1, rng, out);
        }
    }

    /// Follows the insertion path of `point` and returns the leaf it would
    /// land in, if that leaf exists.
    pub fn leaf_for(&self, point: &[f32; 3], remaining_depth: usize) -> Option<&OctreeNode> {
        let mut node = self;
        for _ in 0..remaining_depth {
            node = node.child(node.classify_octant(point))?;
        }
        Some(node)
    }

    /// Calls `f` on every leaf below this node, in octant order.
    pub fn visit_leaves<F>(&self, remaining_depth: usize, f: &mut F)
    where
        F: FnMut(&OctreeNode),
    {
        if remaining_depth == 0 {
            f(self);
            return;
        }

        for child in self.children.iter().flatten() {
            child.visit_leaves(remaining_depth - 1, f);
        }
    }

    fn shrink_leaves(&mut self, remaining_depth: usize) {
        if remaining_depth == 0 {
            self.points.shrink_to_fit();
            return;
        }

        for child in self.children.iter_mut().flatten() {
            child.shrink_leaves(remaining_depth - 1);
        }
    }
}

/// Depth-bounded octree over a point cloud.
///
/// The tree is built once, segmented once and then read for display:
///
/// ```
/// use octoplane_core::PointCloud;
/// use octoplane_spatial::SpaceOctree;
///
/// let cloud = PointCloud::from_points([[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
/// let mut tree = SpaceOctree::new(1);
/// tree.build(&cloud).unwrap();
/// tree.segment(&|leaf: &PointCloud| -> Vec<usize> { (0..leaf.len()).collect() }).unwrap();
/// let colored = tree.export_colorized().unwrap();
/// assert_eq!(colored.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SpaceOctree {
    root: Option<OctreeNode>,
    depth: usize,
}

impl SpaceOctree {
    /// Largest depth [`build`](Self::build) accepts. Traversals recurse once
    /// per level, and a box away from the origin stops splitting after about
    /// 24 levels of `f32` precision anyway.
    pub const MAX_DEPTH: usize = 64;

    pub fn new(depth: usize) -> Self {
        Self { root: None, depth }
    }

    pub fn from_params(params: OctreeParams) -> Self {
        Self::new(params.depth)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn root(&self) -> Option<&OctreeNode> {
        self.root.as_ref()
    }

    pub fn is_built(&self) -> bool {
        self.root.is_some()
    }

    /// Builds the tree over the bounding box of `cloud`, replacing any
    /// previous tree.
    ///
    /// Points are inserted in cloud order. Non-finite points are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`OctreeError::DepthTooLarge`] if the configured depth exceeds
    /// [`MAX_DEPTH`](Self::MAX_DEPTH), and [`OctreeError::EmptyInput`] if
    /// `cloud` has no finite point. In both cases `self` is left unchanged.
    pub fn build(&mut self, cloud: &PointCloud) -> Result<(), OctreeError> {
        if self.depth > Self::MAX_DEPTH {
            return Err(OctreeError::DepthTooLarge {
                depth: self.depth,
                max: Self::MAX_DEPTH,
            });
        }

        let bounds = cloud.aabb();
        if bounds.is_empty() {
            return Err(OctreeError::EmptyInput);
        }

        let mut root = OctreeNode::new(bounds);
        let mut skipped = 0usize;
        for p in cloud.iter_points() {
            if !p.iter().all(|v| v.is_finite()) {
                skipped += 1;
                continue;
            }
            root.insert(p, self.depth);
        }
        root.shrink_leaves(self.depth);

        if skipped > 0 {
            log::warn!("skipped {} non-finite points while building octree", skipped);
        }

        self.root = Some(root);
        log::debug!(
            "built octree: depth={}, points={}, leaves={}",
            self.depth,
            cloud.len() - skipped,
            self.leaf_count()
        );
        Ok(())
    }

    /// Runs `segmenter` on every non-empty leaf and keeps only its inliers.
    ///
    /// # Errors
    ///
    /// Returns [`OctreeError::NotBuilt`] if called before [`build`](Self::build).
    pub fn segment<S>(&mut self, segmenter: &S) -> Result<(), OctreeError>
    where
        S: PlaneSegmenter + ?Sized,
    {
        let depth = self.depth;
        let root = self.root.as_mut().ok_or(OctreeError::NotBuilt)?;
        root.segment(segmenter, depth);
        log::debug!("segmented octree: {} points remain", self.point_count());
        Ok(())
    }

    /// Parallel [`segment`](Self::segment). Gives the same tree as the
    /// sequential version for segmenters whose output depends only on the
    /// leaf they are given.
    ///
    /// # Errors
    ///
    /// Returns [`OctreeError::NotBuilt`] if called before [`build`](Self::build).
    pub fn par_segment<S>(&mut self, segmenter: &S) -> Result<(), OctreeError>
    where
        S: PlaneSegmenter + Sync + ?Sized,
    {
        let depth = self.depth;
        let root = self.root.as_mut().ok_or(OctreeError::NotBuilt)?;
        root.par_segment(segmenter, depth);
        log::debug!("segmented octree in parallel: {} points remain", self.point_count());
        Ok(())
    }

    /// All leaf points in one cloud, each leaf in its own random color.
    ///
    /// Colors are drawn from the thread-local RNG, so they differ between
    /// calls. Use [`export_colorized_with_rng`](Self::export_colorized_with_rng)
    /// for reproducible output.
    ///
    /// # Errors
    ///
    /// Returns [`OctreeError::NotBuilt`] if called before [`build`](Self::build).
    pub fn export_colorized(&self) -> Result<PointCloud, OctreeError> {
        self.export_colorized_with_rng(&mut rand::thread_rng())
    }

    /// # Errors
    ///
    /// Returns [`OctreeError::NotBuilt`] if called before [`build`](Self::build).
    pub fn export_colorized_with_rng<R: Rng>(&self, rng: &mut R) -> Result<PointCloud, OctreeError> {
        let root = self.root.as_ref().ok_or(OctreeError::NotBuilt)?;
        let cloud = root.export_colorized(self.depth, rng);
        log::debug!("exported {} colorized points", cloud.len());
        Ok(cloud)
    }

    /// Leaf that `point` is routed to, if it exists.
    pub fn leaf_for(&self, point: &[f32; 3]) -> Option<&OctreeNode> {
        self.root.as_ref()?.leaf_for(point, self.depth)
    }

    /// Number of leaves; zero before `build`.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        if let Some(root) = &self.root {
            root.visit_leaves(self.depth, &mut |_| count += 1);
        }
        count
    }

    /// Number of points held across all leaves; zero before `build`.
    pub fn point_count(&self) -> usize {
        let mut count = 0;
        if let Some(root) = &self.root {
            root.visit_leaves(self.depth, &mut |leaf| count += leaf.points().len());
        }
        count
    }
}

impl Default for SpaceOctree {
    fn default() -> Self {
        Self::from_params(OctreeParams::default())
    }
}
