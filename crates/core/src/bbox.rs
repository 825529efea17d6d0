/// Axis-aligned bounding box over `f32` coordinates.
///
/// An empty box has `min = +inf`, `max = -inf` and contains nothing. Growing
/// it with non-finite points is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
    empty: bool,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: [f32::INFINITY; 3],
            max: [f32::NEG_INFINITY; 3],
            empty: true,
        }
    }

    /// Builds a box from its two corners.
    ///
    /// # Panics
    ///
    /// Panics if `min[i] > max[i]` on any axis or a corner is not finite.
    pub fn from_corners(min: [f32; 3], max: [f32; 3]) -> Self {
        assert!(
            min.iter().chain(max.iter()).all(|v| v.is_finite()),
            "box corners must be finite"
        );
        assert!(
            (0..3).all(|axis| min[axis] <= max[axis]),
            "box lower corner must not exceed upper corner"
        );
        Self {
            min,
            max,
            empty: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn expand_with_point(&mut self, point: [f32; 3]) {
        if !point.iter().all(|v| v.is_finite()) {
            return;
        }

        if self.empty {
            self.min = point;
            self.max = point;
            self.empty = false;
            return;
        }

        for (axis, &val) in point.iter().enumerate() {
            self.min[axis] = self.min[axis].min(val);
            self.max[axis] = self.max[axis].max(val);
        }
    }

    /// Closed containment test: points on a face are inside.
    pub fn contains(&self, point: &[f32; 3]) -> bool {
        if self.empty || !point.iter().all(|v| v.is_finite()) {
            return false;
        }

        (0..3).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }

    /// Per-axis midpoint. Meaningless for an empty box.
    ///
    /// The result always lies within `[min, max]`, including for boxes that
    /// span most of the `f32` range or only a few subnormal steps.
    pub fn center(&self) -> [f32; 3] {
        std::array::from_fn(|axis| {
            let (lo, hi) = (self.min[axis], self.max[axis]);
            let half = (hi - lo) * 0.5;
            let mid = if half.is_finite() {
                lo + half
            } else {
                lo * 0.5 + hi * 0.5
            };
            mid.max(lo).min(hi)
        })
    }

    pub fn extent(&self) -> [f32; 3] {
        if self.empty {
            return [0.0; 3];
        }
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn volume(&self) -> f32 {
        let [ex, ey, ez] = self.extent();
        ex * ey * ez
    }

    /// Volume shared with `other`; boxes touching on a face overlap by zero.
    pub fn overlap_volume(&self, other: &Aabb) -> f32 {
        if self.empty || other.empty {
            return 0.0;
        }
        (0..3)
            .map(|axis| {
                let lo = self.min[axis].max(other.min[axis]);
                let hi = self.max[axis].min(other.max[axis]);
                (hi - lo).max(0.0)
            })
            .product()
    }

    pub fn from_xyz(x: &[f32], y: &[f32], z: &[f32]) -> Self {
        let n = x.len().min(y.len()).min(z.len());
        let mut aabb = Self::empty();
        for i in 0..n {
            aabb.expand_with_point([x[i], y[i], z[i]]);
        }
        aabb
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = [f32; 3]>,
    {
        let mut aabb = Self::empty();
        for p in points {
            aabb.expand_with_point(p);
        }
        aabb
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
