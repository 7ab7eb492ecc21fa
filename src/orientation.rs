use std::fmt;
use thiserror::Error;

/// Tolerance used when comparing direction cosines.
pub const DEFAULT_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrientationError {
    #[error("Image orientation is missing")]
    Missing,

    #[error("Image orientation is not numeric")]
    NotNumeric,

    #[error("Image orientation has {0} values instead of 6")]
    WrongLength(usize),

    #[error("Image orientation contains a non-finite value")]
    NotFinite,
}

/// Row and column direction cosines of an image, as found in
/// Image Orientation (Patient) (0020,0037).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrientationVector([f64; 6]);

impl OrientationVector {
    pub fn new(cosines: [f64; 6]) -> Self {
        Self(cosines)
    }

    /// Build from the values of a multi-valued attribute.
    pub fn from_values(values: &[f64]) -> Result<Self, OrientationError> {
        let cosines: [f64; 6] = values
            .try_into()
            .map_err(|_| OrientationError::WrongLength(values.len()))?;
        if cosines.iter().any(|v| !v.is_finite()) {
            return Err(OrientationError::NotFinite);
        }
        Ok(Self(cosines))
    }

    pub fn cosines(&self) -> &[f64; 6] {
        &self.0
    }

    pub fn row(&self) -> [f64; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    pub fn column(&self) -> [f64; 3] {
        [self.0[3], self.0[4], self.0[5]]
    }

    /// Whether both the row and the column cosines point the same way.
    ///
    /// Two orientations match when each pair of axes has a dot product
    /// above `1 - epsilon`. The relation is not transitive.
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        let threshold = 1.0 - epsilon;
        dot(self.row(), other.row()) > threshold && dot(self.column(), other.column()) > threshold
    }

    /// Identifier-safe rendering of the six values.
    ///
    /// Values are joined with `S`, with every `-` written as `N` and every
    /// `.` as `D`, so `[1, 0, 0, 0, -0.5, 0]` becomes `1S0S0S0SN0D5S0`.
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join("S")
            .replace('-', "N")
            .replace('.', "D")
    }
}

impl From<[f64; 6]> for OrientationVector {
    fn from(cosines: [f64; 6]) -> Self {
        Self(cosines)
    }
}

impl fmt::Display for OrientationVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "[{a}, {b}, {c}] [{d}, {e}, {g}]")
    }
}

#[inline]
fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0].mul_add(b[0], a[1].mul_add(b[1], a[2] * b[2]))
}
