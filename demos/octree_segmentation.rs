use octoplane::{PointCloud, RansacParams, RansacPlaneSegmenter, SpaceOctree};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Floor, two walls and a sprinkling of clutter inside a 10 x 10 x 3 room.
fn synthetic_room(rng: &mut StdRng) -> PointCloud {
    let mut pts: Vec<[f32; 3]> = Vec::new();
    for _ in 0..20_000 {
        pts.push([rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0), rng.gen_range(-0.005..0.005)]);
    }
    for _ in 0..6_000 {
        pts.push([rng.gen_range(-0.005..0.005), rng.gen_range(0.0..10.0), rng.gen_range(0.0..3.0)]);
        pts.push([rng.gen_range(0.0..10.0), rng.gen_range(9.995..10.005), rng.gen_range(0.0..3.0)]);
    }
    for _ in 0..2_000 {
        pts.push([rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0), rng.gen_range(0.0..3.0)]);
    }
    PointCloud::from_points(pts)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut rng = StdRng::seed_from_u64(7);
    let cloud = synthetic_room(&mut rng);
    log::info!("input cloud: {} points", cloud.len());

    let mut tree = SpaceOctree::new(2);
    if let Err(e) = tree.build(&cloud) {
        log::error!("build failed: {}", e);
        return;
    }
    log::info!("depth {} octree with {} leaves", tree.depth(), tree.leaf_count());

    let segmenter = RansacPlaneSegmenter::new(RansacParams {
        distance_threshold: 0.02,
        iterations: 200,
        seed: Some(1),
    });
    if let Err(e) = tree.par_segment(&segmenter) {
        log::error!("segmentation failed: {}", e);
        return;
    }
    log::info!("{} points kept as plane inliers", tree.point_count());

    match tree.export_colorized_with_rng(&mut rng) {
        Ok(colored) => {
            let aabb = colored.aabb();
            println!(
                "colorized cloud: {} points, bounds min={:?} max={:?}",
                colored.len(),
                aabb.min,
                aabb.max
            );
        }
        Err(e) => log::error!("export failed: {}", e),
    }
}
