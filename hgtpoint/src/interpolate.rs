//! Bilinear interpolation over four rectangle corners.
//!
//! See <https://en.wikipedia.org/wiki/Bilinear_interpolation>.

use std::cmp::Ordering;

use crate::error::{HgtError, Result};

/// A rectangle corner: its position and the value sampled there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl Corner {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }
}

impl From<(f64, f64, f64)> for Corner {
    fn from((x, y, value): (f64, f64, f64)) -> Self {
        Self::new(x, y, value)
    }
}

/// Interpolate the value at `(x, y)` from four corners of a rectangle.
///
/// The corners may be given in any order. After sorting by `(x, y)` they must
/// pair up as two corners at the lower `x` and two at the upper `x`, each pair
/// covering both `y` values.
///
/// # Errors
///
/// - [`HgtError::InvalidRectangle`] if the corners are not axis-aligned
/// - [`HgtError::PointOutOfBounds`] if `(x, y)` is outside the rectangle
///   (bounds are inclusive)
/// - [`HgtError::DegenerateRectangle`] if the rectangle has no area
///
/// # Examples
///
/// ```
/// use hgtpoint::interpolate::bilinear;
///
/// let value = bilinear(
///     12.0,
///     5.5,
///     [
///         (10.0, 4.0, 100.0).into(),
///         (20.0, 4.0, 200.0).into(),
///         (10.0, 6.0, 150.0).into(),
///         (20.0, 6.0, 300.0).into(),
///     ],
/// )
/// .unwrap();
/// assert_eq!(value, 165.0);
/// ```
pub fn bilinear(x: f64, y: f64, mut corners: [Corner; 4]) -> Result<f64> {
    corners.sort_by(compare_corners);
    let [c11, c12, c21, c22] = corners;

    let (x1, y1, q11) = (c11.x, c11.y, c11.value);
    let (y2, q12) = (c12.y, c12.value);
    let (x2, q21) = (c21.x, c21.value);
    let q22 = c22.value;

    if c12.x != x1 || c22.x != x2 || c21.y != y1 || c22.y != y2 {
        return Err(HgtError::InvalidRectangle);
    }
    if !(x1 <= x && x <= x2 && y1 <= y && y <= y2) {
        return Err(HgtError::PointOutOfBounds { x, y });
    }

    let area = (x2 - x1) * (y2 - y1);
    if area == 0.0 {
        return Err(HgtError::DegenerateRectangle { x1, x2, y1, y2 });
    }

    Ok((q11 * (x2 - x) * (y2 - y)
        + q21 * (x - x1) * (y2 - y)
        + q12 * (x2 - x) * (y - y1)
        + q22 * (x - x1) * (y - y1))
        / area)
}

/// Lexicographic order on `(x, y, value)`. `-0.0` and `0.0` compare equal.
fn compare_corners(a: &Corner, b: &Corner) -> Ordering {
    let key = |v: f64| v + 0.0;
    key(a.x)
        .total_cmp(&key(b.x))
        .then(key(a.y).total_cmp(&key(b.y)))
        .then(key(a.value).total_cmp(&key(b.value)))
}
