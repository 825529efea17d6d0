//! Depth-bounded octree for running plane segmentation cell by cell.
//!
//! The workspace is split into three library crates, re-exported here:
//!
//! - [`cloud`]: `PointCloud`, `Aabb` and the `PlaneSegmenter` interface.
//! - [`spatial`]: the octree itself (`SpaceOctree`, `OctreeNode`, `Octant`).
//! - [`segmentation`]: a RANSAC plane segmenter to plug into the octree.
#![forbid(unsafe_code)]

pub use octoplane_core as cloud;
pub use octoplane_segmentation as segmentation;
pub use octoplane_spatial as spatial;

pub use octoplane_core::{PlaneSegmenter, PointCloud};
pub use octoplane_segmentation::{RansacParams, RansacPlaneSegmenter};
pub use octoplane_spatial::{OctreeError, OctreeParams, SpaceOctree};
