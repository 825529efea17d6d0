use octoplane_core::Aabb;

/// One of the eight children of an axis-aligned box split at its center.
///
/// The index packs one bit per axis, `4*z + 2*y + x`, where a set bit means
/// the upper half along that axis. The same encoding is used to pick a child
/// slot and to compute that child's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Octant(u8);

impl Octant {
    pub const COUNT: usize = 8;

    /// # Panics
    ///
    /// Panics if `index >= 8`.
    pub fn new(index: u8) -> Self {
        assert!(index < 8, "octant index must be in 0..8");
        Self(index)
    }

    pub fn from_bits(upper_x: bool, upper_y: bool, upper_z: bool) -> Self {
        Self((upper_x as u8) | ((upper_y as u8) << 1) | ((upper_z as u8) << 2))
    }

    /// Octant of `p` relative to `center`. Coordinates equal to the center
    /// go to the upper half.
    #[inline]
    pub fn classify(center: &[f32; 3], p: &[f32; 3]) -> Self {
        Self::from_bits(p[0] >= center[0], p[1] >= center[1], p[2] >= center[2])
    }

    pub fn all() -> impl Iterator<Item = Octant> {
        (0..8u8).map(Octant)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_upper(self, axis: usize) -> bool {
        debug_assert!(axis < 3);
        self.0 & (1 << axis) != 0
    }

    /// The sub-box of `parent` this octant covers: half the parent's extent
    /// on every axis.
    pub fn sub_aabb(self, parent: &Aabb) -> Aabb {
        let c = parent.center();
        let mut min = parent.min;
        let mut max = parent.max;
        for axis in 0..3 {
            if self.is_upper(axis) {
                min[axis] = c[axis];
            } else {
                max[axis] = c[axis];
            }
        }
        Aabb::from_corners(min, max)
    }
}
