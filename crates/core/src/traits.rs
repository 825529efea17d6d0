use crate::point::{PointXYZ, PointXYZRGB};

pub trait HasPosition {
    fn position(&self) -> [f32; 3];
}

pub trait HasColor {
    fn color(&self) -> [u8; 3];
}

impl HasPosition for [f32; 3] {
    #[inline]
    fn position(&self) -> [f32; 3] {
        *self
    }
}

impl HasPosition for PointXYZ {
    #[inline]
    fn position(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl HasPosition for PointXYZRGB {
    #[inline]
    fn position(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl HasColor for PointXYZRGB {
    #[inline]
    fn color(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}
