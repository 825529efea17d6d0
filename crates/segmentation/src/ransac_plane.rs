use octoplane_core::{PlaneSegmenter, PointCloud};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

/// Clouds at least this large with enough hypotheses are scored in parallel.
const PARALLEL_MIN_POINTS: usize = 10_000;
const PARALLEL_MIN_SAMPLES: usize = 16;

/// Probability of having drawn at least one all-inlier sample before the
/// sequential loop stops early.
const EARLY_EXIT_CONFIDENCE: f64 = 0.999;

/// A 3D plane model in the form `n . x + d = 0`, where `n` is a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneModel {
    pub normal: [f32; 3],
    pub d: f32,
}

impl PlaneModel {
    /// Absolute distance from `point` to the plane.
    #[inline]
    pub fn distance_to_point(&self, point: &[f32; 3]) -> f32 {
        (self.normal[0] * point[0] + self.normal[1] * point[1] + self.normal[2] * point[2] + self.d)
            .abs()
    }

    /// Plane through three points, or `None` if they are collinear.
    pub fn through(p0: &[f32; 3], p1: &[f32; 3], p2: &[f32; 3]) -> Option<Self> {
        let u = [p1[0] - p0[0], p1[1] - p0[1], p1[2] - p0[2]];
        let v = [p2[0] - p0[0], p2[1] - p0[1], p2[2] - p0[2]];

        let n = [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ];
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if len < 1e-10 {
            return None;
        }

        let normal = [n[0] / len, n[1] / len, n[2] / len];
        let d = -(normal[0] * p0[0] + normal[1] * p0[1] + normal[2] * p0[2]);
        Some(Self { normal, d })
    }
}

impl Default for PlaneModel {
    fn default() -> Self {
        Self {
            normal: [0.0, 0.0, 1.0],
            d: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RansacParams {
    /// Maximum point-to-plane distance for a point to count as an inlier.
    pub distance_threshold: f32,
    /// Number of 3-point hypotheses to draw.
    pub iterations: usize,
    /// Fixed seed for reproducible fits; `None` draws a fresh seed per call.
    pub seed: Option<u64>,
}

impl Default for RansacParams {
    fn default() -> Self {
        Self {
            distance_threshold: 0.01,
            iterations: 1000,
            seed: None,
        }
    }
}

/// Result of [`fit_plane`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaneFit {
    pub model: PlaneModel,
    /// Ascending indices of the points within the threshold of `model`.
    pub inliers: Vec<usize>,
}

/// Fits the dominant plane of `cloud` with RANSAC.
///
/// All hypotheses are sampled up front from a single seeded RNG, so a fixed
/// `params.seed` gives the same fit whether the hypotheses are scored
/// sequentially or on the rayon pool. The sequential path stops early once
/// the best inlier ratio makes a better model unlikely.
///
/// Clouds with fewer than 3 points, or a negative or NaN threshold, yield
/// the default model and no inliers.
pub fn fit_plane(cloud: &PointCloud, params: &RansacParams) -> PlaneFit {
    let n = cloud.len();
    if n < 3 || params.distance_threshold.is_nan() || params.distance_threshold < 0.0 {
        return PlaneFit::default();
    }

    let threshold = params.distance_threshold;
    let points: Vec<[f32; 3]> = cloud.iter_points().collect();

    let seed = params
        .seed
        .unwrap_or_else(|| rand::thread_rng().next_u64());
    let mut rng = StdRng::seed_from_u64(seed);
    let samples: Vec<[usize; 3]> = (0..params.iterations)
        .map(|_| {
            let picked = index::sample(&mut rng, n, 3);
            [picked.index(0), picked.index(1), picked.index(2)]
        })
        .collect();

    let best = if n >= PARALLEL_MIN_POINTS && samples.len() >= PARALLEL_MIN_SAMPLES {
        samples
            .par_iter()
            .filter_map(|s| score(&points, s, threshold))
            .reduce_with(|a, b| if a.1 >= b.1 { a } else { b })
    } else {
        best_sequential(&points, &samples, threshold)
    };

    let model = match best {
        Some((model, _)) => model,
        None => return PlaneFit::default(),
    };

    let inliers: Vec<usize> = points
        .iter()
        .enumerate()
        .filter(|(_, p)| model.distance_to_point(p) <= threshold)
        .map(|(i, _)| i)
        .collect();

    log::trace!(
        "ransac: {} of {} points within {} of plane {:?}",
        inliers.len(),
        n,
        threshold,
        model
    );

    PlaneFit { model, inliers }
}

fn score(points: &[[f32; 3]], sample: &[usize; 3], threshold: f32) -> Option<(PlaneModel, usize)> {
    let model = PlaneModel::through(&points[sample[0]], &points[sample[1]], &points[sample[2]])?;
    let count = points
        .iter()
        .filter(|p| model.distance_to_point(p) <= threshold)
        .count();
    Some((model, count))
}

fn best_sequential(
    points: &[[f32; 3]],
    samples: &[[usize; 3]],
    threshold: f32,
) -> Option<(PlaneModel, usize)> {
    let n = points.len() as f64;
    let mut best: Option<(PlaneModel, usize)> = None;

    for (iter, sample) in samples.iter().enumerate() {
        let Some((model, count)) = score(points, sample, threshold) else {
            continue;
        };
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((model, count));

            let w = count as f64 / n;
            if w > 0.5 {
                let needed = (1.0 - EARLY_EXIT_CONFIDENCE).ln() / (1.0 - w.powi(3)).ln();
                if (iter as f64) > needed {
                    break;
                }
            }
        }
    }

    best
}

/// [`PlaneSegmenter`] that keeps the inliers of the dominant RANSAC plane.
///
/// With a fixed seed every cell is fitted with the same seed, so the
/// outcome for a cell does not depend on which cells were fitted before it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RansacPlaneSegmenter {
    pub params: RansacParams,
}

impl RansacPlaneSegmenter {
    pub fn new(params: RansacParams) -> Self {
        Self { params }
    }

    pub fn seeded(distance_threshold: f32, iterations: usize, seed: u64) -> Self {
        Self::new(RansacParams {
            distance_threshold,
            iterations,
            seed: Some(seed),
        })
    }
}

impl PlaneSegmenter for RansacPlaneSegmenter {
    fn segment(&self, cloud: &PointCloud) -> Vec<usize> {
        fit_plane(cloud, &self.params).inliers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn seeded(distance_threshold: f32, iterations: usize) -> RansacParams {
        RansacParams {
            distance_threshold,
            iterations,
            seed: Some(42),
        }
    }

    fn grid(nx: usize, ny: usize, step: f32, z: impl Fn(f32, f32) -> f32) -> PointCloud {
        let mut pts = Vec::with_capacity(nx * ny);
        for i in 0..nx {
            for j in 0..ny {
                let (x, y) = (i as f32 * step, j as f32 * step);
                pts.push([x, y, z(x, y)]);
            }
        }
        PointCloud::from_points(pts)
    }

    #[test]
    fn fit_xy_plane() {
        let cloud = grid(20, 20, 0.1, |_, _| 0.0);
        let fit = fit_plane(&cloud, &seeded(0.01, 100));

        assert!(
            fit.model.normal[2].abs() > 0.99,
            "Expected normal z-component near +/-1, got {:?}",
            fit.model.normal
        );
        assert!(fit.model.d.abs() < 0.01);
        assert_eq!(fit.inliers.len(), 400);
    }

    #[test]
    fn fit_tilted_plane() {
        // x + y + z = 1
        let cloud = grid(10, 10, 0.1, |x, y| 1.0 - x - y);
        let fit = fit_plane(&cloud, &seeded(0.01, 100));

        let expected = 1.0 / 3.0f32.sqrt();
        for c in fit.model.normal {
            assert!((c.abs() - expected).abs() < 0.05, "normal {:?}", fit.model.normal);
        }
        assert_eq!(fit.inliers.len(), 100);
    }

    #[test]
    fn outliers_are_excluded() {
        let mut cloud = grid(7, 7, 1.0, |_, _| 0.0);
        for i in 0..10 {
            cloud.push([i as f32, i as f32, 100.0]);
        }

        let fit = fit_plane(&cloud, &seeded(0.1, 200));
        assert_eq!(fit.inliers, (0..49).collect::<Vec<_>>());
    }

    #[test]
    fn too_few_points_give_no_inliers() {
        for n in 0..3 {
            let cloud = PointCloud::from_points((0..n).map(|i| [i as f32, 0.0, 0.0]));
            let fit = fit_plane(&cloud, &seeded(0.1, 100));
            assert_eq!(fit.model, PlaneModel::default());
            assert!(fit.inliers.is_empty());
        }
    }

    #[test]
    fn collinear_points_give_no_inliers() {
        let cloud = PointCloud::from_points((0..20).map(|i| [i as f32, 2.0 * i as f32, 0.0]));
        let fit = fit_plane(&cloud, &seeded(0.1, 50));
        assert!(fit.inliers.is_empty());
    }

    #[test]
    fn nan_threshold_gives_no_inliers() {
        let cloud = grid(5, 5, 1.0, |_, _| 0.0);
        let fit = fit_plane(&cloud, &seeded(f32::NAN, 50));
        assert!(fit.inliers.is_empty());
    }

    #[test]
    fn exactly_3_points() {
        let cloud = PointCloud::from_points([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let fit = fit_plane(&cloud, &seeded(0.01, 100));
        assert!(fit.model.normal[2].abs() > 0.99);
        assert_eq!(fit.inliers, vec![0, 1, 2]);
    }

    #[test]
    fn plane_through_collinear_points_is_none() {
        assert!(PlaneModel::through(&[0.0; 3], &[1.0; 3], &[2.0; 3]).is_none());
    }

    #[test]
    fn distance_to_point_works() {
        let s3 = 3.0f32.sqrt();
        let model = PlaneModel {
            normal: [1.0 / s3, 1.0 / s3, 1.0 / s3],
            d: -3.0 / s3,
        };
        assert!(model.distance_to_point(&[1.0, 1.0, 1.0]) < 1e-5);
        assert!((model.distance_to_point(&[0.0, 0.0, 0.0]) - s3).abs() < 1e-5);
    }

    #[test]
    fn segmenter_is_deterministic_with_seed() {
        let cloud = grid(6, 6, 0.5, |x, _| if x > 1.0 { 0.0 } else { x });
        let seg = RansacPlaneSegmenter::seeded(0.01, 50, 123);
        assert_eq!(seg.segment(&cloud), seg.segment(&cloud));
        assert_eq!(seg.segment(&cloud), fit_plane(&cloud, &seg.params).inliers);
    }

    #[test]
    fn parallel_path_finds_dominant_plane() {
        let cloud = grid(120, 100, 0.05, |_, _| 2.0);
        assert!(cloud.len() >= PARALLEL_MIN_POINTS);
        let fit = fit_plane(&cloud, &seeded(0.01, 32));
        assert_eq!(fit.inliers.len(), cloud.len());
    }

    proptest! {
        #[test]
        fn inliers_are_within_threshold(
            plane_pts in prop::collection::vec((-10.0f32..10.0, -10.0f32..10.0), 10..50),
            threshold in 0.01f32..1.0,
            seed in 0u64..10000,
        ) {
            let cloud = PointCloud::from_points(plane_pts.iter().map(|&(x, y)| [x, y, 0.0]));
            let params = RansacParams { distance_threshold: threshold, iterations: 100, seed: Some(seed) };
            let fit = fit_plane(&cloud, &params);

            for &idx in &fit.inliers {
                let dist = fit.model.distance_to_point(&cloud.point(idx));
                prop_assert!(dist <= threshold + 1e-5, "inlier {} at distance {}", idx, dist);
            }
        }
    }
}
