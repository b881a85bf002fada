//! Single-channel region masks and the foreground point sets extracted from them

use crate::io::configuration::{OPAQUE_BACKGROUND, TRANSPARENT_BACKGROUND};
use crate::io::error::{Result, ScoreError, invalid_parameter};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which half of the composite image a mask or point set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// The ground truth drawing
    Reference,
    /// The drawing being scored
    Observation,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Observation => write!(f, "observation"),
        }
    }
}

/// Background convention of the source image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackgroundMode {
    /// White background, strokes read from the first channel
    #[default]
    Opaque,
    /// Transparent background, strokes read from the alpha channel
    Transparent,
}

impl BackgroundMode {
    /// Intensity that marks a background pixel in this mode
    pub const fn background_value(self) -> u8 {
        match self {
            Self::Opaque => OPAQUE_BACKGROUND,
            Self::Transparent => TRANSPARENT_BACKGROUND,
        }
    }

    /// Mode selected by a transparency flag
    pub const fn from_transparent(transparent: bool) -> Self {
        if transparent {
            Self::Transparent
        } else {
            Self::Opaque
        }
    }
}

impl fmt::Display for BackgroundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opaque => write!(f, "opaque"),
            Self::Transparent => write!(f, "transparent"),
        }
    }
}

/// Intensity grid for one region, indexed `[row, col]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    pixels: Array2<u8>,
}

impl Mask {
    /// Wrap an intensity array
    pub const fn new(pixels: Array2<u8>) -> Self {
        Self { pixels }
    }

    /// Mask of the given size filled with `value`
    pub fn filled(rows: usize, cols: usize, value: u8) -> Self {
        Self::new(Array2::from_elem((rows, cols), value))
    }

    /// Grid dimensions (rows, cols)
    pub fn dims(&self) -> (usize, usize) {
        self.pixels.dim()
    }

    /// Intensity at `[row, col]`, if in bounds
    pub fn get(&self, position: [usize; 2]) -> Option<u8> {
        self.pixels.get(position).copied()
    }

    /// Set the intensity at `[row, col]`; out-of-bounds writes are ignored
    pub fn set(&mut self, position: [usize; 2], value: u8) {
        if let Some(pixel) = self.pixels.get_mut(position) {
            *pixel = value;
        }
    }

    /// Borrow the underlying array
    pub fn view(&self) -> ArrayView2<'_, u8> {
        self.pixels.view()
    }

    /// Extract every coordinate whose intensity differs from `background`
    ///
    /// # Errors
    ///
    /// Returns `EmptyPointSet` if every pixel equals the background value
    pub fn point_set(&self, region: Region, background: u8) -> Result<PointSet> {
        let points: Vec<[usize; 2]> = self
            .pixels
            .indexed_iter()
            .filter(|&(_, &value)| value != background)
            .map(|((row, col), _)| [row, col])
            .collect();

        if points.is_empty() {
            return Err(ScoreError::EmptyPointSet { region });
        }

        // indexed_iter visits elements in logical row-major order regardless of memory layout
        Ok(PointSet {
            region,
            dims: self.dims(),
            points,
        })
    }
}

/// Foreground coordinates of one region in row-major order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointSet {
    region: Region,
    dims: (usize, usize),
    points: Vec<[usize; 2]>,
}

impl PointSet {
    /// Build a point set from arbitrary coordinates
    ///
    /// Coordinates are sorted row-major and deduplicated. An empty input yields
    /// an empty set; stages that need points reject it later.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a coordinate lies outside `dims`
    pub fn from_coordinates(
        region: Region,
        dims: (usize, usize),
        coordinates: impl IntoIterator<Item = [usize; 2]>,
    ) -> Result<Self> {
        let mut points = Vec::new();
        for point in coordinates {
            if point[0] >= dims.0 || point[1] >= dims.1 {
                return Err(invalid_parameter(
                    "point",
                    &format!("({}, {})", point[0], point[1]),
                    &format!("outside the {}x{} {region} grid", dims.0, dims.1),
                ));
            }
            points.push(point);
        }
        points.sort_unstable();
        points.dedup();

        Ok(Self {
            region,
            dims,
            points,
        })
    }

    /// Empty set over `dims`
    pub const fn empty(region: Region, dims: (usize, usize)) -> Self {
        Self {
            region,
            dims,
            points: Vec::new(),
        }
    }

    /// Region the points were extracted from
    pub const fn region(&self) -> Region {
        self.region
    }

    /// Grid dimensions (rows, cols)
    pub const fn dims(&self) -> (usize, usize) {
        self.dims
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set holds no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in row-major order
    pub fn points(&self) -> &[[usize; 2]] {
        &self.points
    }

    /// Iterate over the points in row-major order
    pub fn iter(&self) -> std::slice::Iter<'_, [usize; 2]> {
        self.points.iter()
    }

    /// Whether `point` belongs to the set
    pub fn contains(&self, point: [usize; 2]) -> bool {
        self.points.binary_search(&point).is_ok()
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a [usize; 2];
    type IntoIter = std::slice::Iter<'a, [usize; 2]>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
