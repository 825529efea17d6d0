#![forbid(unsafe_code)]

pub mod error;
pub mod octant;
pub mod octree;

pub use error::OctreeError;
pub use octant::Octant;
pub use octree::{OctreeNode, OctreeParams, SpaceOctree};
