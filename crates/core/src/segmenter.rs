use crate::PointCloud;

/// A plane segmentation routine applied to one octree cell at a time.
///
/// `segment` returns indices into `cloud` of the points that lie on the
/// detected plane. An empty result means "no plane found"; implementations
/// must not panic on small or empty input.
///
/// The octree calls this once per non-empty leaf, possibly from several
/// threads when segmenting in parallel, so implementations should not keep
/// state that makes the result depend on the order leaves are visited.
pub trait PlaneSegmenter {
    fn segment(&self, cloud: &PointCloud) -> Vec<usize>;
}

impl<F> PlaneSegmenter for F
where
    F: Fn(&PointCloud) -> Vec<usize>,
{
    fn segment(&self, cloud: &PointCloud) -> Vec<usize> {
        self(cloud)
    }
}
