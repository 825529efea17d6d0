#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointXYZ {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A position tagged with an 8-bit RGB color, as produced by colorized export.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointXYZRGB {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<[f32; 3]> for PointXYZ {
    fn from(p: [f32; 3]) -> Self {
        Self {
            x: p[0],
            y: p[1],
            z: p[2],
        }
    }
}

impl PointXYZRGB {
    pub fn new(position: [f32; 3], color: [u8; 3]) -> Self {
        Self {
            x: position[0],
            y: position[1],
            z: position[2],
            r: color[0],
            g: color[1],
            b: color[2],
        }
    }
}
