//! Placement of a subarray on the full detector.

use std::fmt;

use crate::error::{Error, Result};
use crate::header::{ScienceHeader, LTV1, LTV2, NAXIS1, NAXIS2};

/// How the sign of `LTV1`/`LTV2` is treated.
///
/// Subarray headers store the origin offset negated, so well-formed values
/// are zero or negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LtvPolicy {
    /// Use the absolute value whatever the sign.
    #[default]
    Absolute,
    /// Reject positive offsets with [`Error::PositiveOffset`].
    RequireNonPositive,
}

/// Rectangle `[y0:y1, x0:x1]` of full-detector pixels covered by a subarray.
///
/// Bounds are zero-based and half-open, in row-major array order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubarrayGeometry {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl SubarrayGeometry {
    /// Computes the rectangle from `LTV1`, `LTV2`, `NAXIS1` and `NAXIS2`.
    ///
    /// The origin is `|LTV|` truncated toward zero, so `LTV1 = -25.7` places
    /// the first column at 25.
    pub fn from_header(header: &ScienceHeader, policy: LtvPolicy) -> Result<Self> {
        let x0 = origin(header, LTV1, policy)?;
        let y0 = origin(header, LTV2, policy)?;
        let naxis1 = header.axis_len(NAXIS1)?;
        let naxis2 = header.axis_len(NAXIS2)?;

        let x1 = x0.checked_add(naxis1).ok_or(Error::InvalidKeyword {
            keyword: LTV1.to_string(),
            reason: "offset out of range",
        })?;
        let y1 = y0.checked_add(naxis2).ok_or(Error::InvalidKeyword {
            keyword: LTV2.to_string(),
            reason: "offset out of range",
        })?;

        Ok(Self { x0, y0, x1, y1 })
    }

    pub fn rows(&self) -> usize {
        self.y1 - self.y0
    }

    pub fn cols(&self) -> usize {
        self.x1 - self.x0
    }

    /// `(rows, cols)`, the same order as `ndarray::Array2::dim`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// Checks the declared extent against the actual array shape.
    pub fn check_shape(&self, rows: usize, cols: usize) -> Result<()> {
        if self.shape() != (rows, cols) {
            return Err(Error::ShapeMismatch {
                naxis1: self.cols(),
                naxis2: self.rows(),
                rows,
                cols,
            });
        }
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyImage);
        }
        Ok(())
    }

    /// Returns `true` if the rectangle lies inside a `rows` x `cols` map.
    pub fn fits_within(&self, rows: usize, cols: usize) -> bool {
        self.y1 <= rows && self.x1 <= cols
    }
}

impl fmt::Display for SubarrayGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}, {}:{}]", self.y0, self.y1, self.x0, self.x1)
    }
}

fn origin(header: &ScienceHeader, keyword: &'static str, policy: LtvPolicy) -> Result<usize> {
    let ltv = header.real(keyword)?;
    if !ltv.is_finite() {
        return Err(Error::InvalidKeyword {
            keyword: keyword.to_string(),
            reason: "offset is not finite",
        });
    }
    if policy == LtvPolicy::RequireNonPositive && ltv > 0.0 {
        return Err(Error::PositiveOffset {
            keyword,
            value: ltv,
        });
    }
    let offset = ltv.abs().trunc();
    if offset >= usize::MAX as f64 {
        return Err(Error::InvalidKeyword {
            keyword: keyword.to_string(),
            reason: "offset out of range",
        });
    }
    Ok(offset as usize)
}
