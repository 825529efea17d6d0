use crate::{Aabb, HasPosition, PointXYZRGB};

/// Structure-of-arrays point cloud with optional per-point RGB colors.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
    pub colors: Option<Colors>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Colors {
    pub r: Vec<u8>,
    pub g: Vec<u8>,
    pub b: Vec<u8>,
}

impl Colors {
    pub fn uniform(color: [u8; 3], n: usize) -> Self {
        Self {
            r: vec![color[0]; n],
            g: vec![color[1]; n],
            b: vec![color[2]; n],
        }
    }

    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    pub fn get(&self, i: usize) -> [u8; 3] {
        [self.r[i], self.g[i], self.b[i]]
    }
}

impl PointCloud {
    pub fn new() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
            colors: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            z: Vec::with_capacity(capacity),
            colors: None,
        }
    }

    pub fn from_xyz(x: Vec<f32>, y: Vec<f32>, z: Vec<f32>) -> Self {
        assert_eq!(x.len(), y.len(), "x and y must have same length");
        assert_eq!(x.len(), z.len(), "x and z must have same length");

        Self {
            x,
            y,
            z,
            colors: None,
        }
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = [f32; 3]>,
    {
        let iter = points.into_iter();
        let mut cloud = Self::with_capacity(iter.size_hint().0);
        for p in iter {
            cloud.push(p);
        }
        cloud
    }

    pub fn from_array(data: &[f32], num_points: usize) -> Self {
        assert_eq!(
            data.len(),
            num_points * 3,
            "interleaved xyz input must have num_points * 3 floats"
        );

        Self::from_points(
            data.chunks_exact(3)
                .take(num_points)
                .map(|c| [c[0], c[1], c[2]]),
        )
    }

    pub fn len(&self) -> usize {
        debug_assert_eq!(self.x.len(), self.y.len());
        debug_assert_eq!(self.x.len(), self.z.len());
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_xyz(&self.x, &self.y, &self.z)
    }

    pub fn point(&self, i: usize) -> [f32; 3] {
        [self.x[i], self.y[i], self.z[i]]
    }

    /// Appends one uncolored point.
    ///
    /// # Panics
    ///
    /// Panics if the cloud carries colors, since the new point would have none.
    pub fn push(&mut self, point: [f32; 3]) {
        assert!(
            self.colors.is_none(),
            "cannot push an uncolored point into a colored cloud"
        );
        self.x.push(point[0]);
        self.y.push(point[1]);
        self.z.push(point[2]);
    }

    pub fn iter_points(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((x, y), z)| [*x, *y, *z])
    }

    /// Iterates `(position, color)` pairs, or `None` for an uncolored cloud.
    pub fn iter_colored(&self) -> Option<impl Iterator<Item = PointXYZRGB> + '_> {
        let colors = self.colors.as_ref()?;
        Some(
            self.iter_points()
                .enumerate()
                .map(move |(i, p)| PointXYZRGB::new(p, colors.get(i))),
        )
    }

    /// Returns the points at `indices`, in that order, colors included.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Self {
        let mut x = Vec::with_capacity(indices.len());
        let mut y = Vec::with_capacity(indices.len());
        let mut z = Vec::with_capacity(indices.len());

        for &idx in indices {
            assert!(idx < self.len(), "index out of bounds in select");
            x.push(self.x[idx]);
            y.push(self.y[idx]);
            z.push(self.z[idx]);
        }

        let colors = self.colors.as_ref().map(|c| Colors {
            r: indices.iter().map(|&idx| c.r[idx]).collect(),
            g: indices.iter().map(|&idx| c.g[idx]).collect(),
            b: indices.iter().map(|&idx| c.b[idx]).collect(),
        });

        Self { x, y, z, colors }
    }

    /// Concatenates `other` onto `self`.
    ///
    /// Colors survive only when both sides have them, except that appending
    /// onto an empty cloud adopts `other`'s colors as they are.
    pub fn append(&mut self, other: &PointCloud) {
        if other.is_empty() {
            return;
        }

        if self.is_empty() {
            self.colors = other.colors.clone();
        } else {
            match (self.colors.as_mut(), other.colors.as_ref()) {
                (Some(dst), Some(src)) => {
                    dst.r.extend_from_slice(&src.r);
                    dst.g.extend_from_slice(&src.g);
                    dst.b.extend_from_slice(&src.b);
                }
                _ => self.colors = None,
            }
        }

        self.x.extend_from_slice(&other.x);
        self.y.extend_from_slice(&other.y);
        self.z.extend_from_slice(&other.z);
    }

    /// Assigns the same color to every point, replacing existing colors.
    pub fn paint_uniform_color(&mut self, color: [u8; 3]) {
        self.colors = Some(Colors::uniform(color, self.len()));
    }

    pub fn shrink_to_fit(&mut self) {
        self.x.shrink_to_fit();
        self.y.shrink_to_fit();
        self.z.shrink_to_fit();
        if let Some(c) = self.colors.as_mut() {
            c.r.shrink_to_fit();
            c.g.shrink_to_fit();
            c.b.shrink_to_fit();
        }
    }

    pub fn to_array(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.len() * 3);
        for p in self.iter_points() {
            out.extend_from_slice(&p);
        }
        out
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects any positioned points (`PointXYZ`, `PointXYZRGB`, ...) into an
/// uncolored cloud.
impl<P: HasPosition> FromIterator<P> for PointCloud {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::from_points(iter.into_iter().map(|p| p.position()))
    }
}
