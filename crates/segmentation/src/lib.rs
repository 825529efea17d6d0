#![forbid(unsafe_code)]

pub mod ransac_plane;

pub use ransac_plane::{fit_plane, PlaneFit, PlaneModel, RansacParams, RansacPlaneSegmenter};
