/// Precondition failures of [`SpaceOctree`](crate::SpaceOctree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OctreeError {
    /// `build` was given a cloud without a single finite point.
    #[error("cannot build an octree from an empty point cloud")]
    EmptyInput,
    /// The tree was queried before a successful `build`.
    #[error("octree has not been built; call build() first")]
    NotBuilt,
    /// `build` was asked for more levels than the tree supports.
    #[error("octree depth {depth} exceeds the maximum of {max}")]
    DepthTooLarge { depth: usize, max: usize },
}
