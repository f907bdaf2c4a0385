//! The pixel area map correction itself.

use log::debug;
use ndarray::{Array2, ArrayView2, Zip};

use crate::error::Result;
use crate::geometry::{LtvPolicy, SubarrayGeometry};
use crate::header::ScienceHeader;
use crate::pam::PamSet;

/// Pixel types the correction accepts.
///
/// Floating types keep their precision; integral types are promoted to `f64`.
pub trait Correctable: Copy {
    type Output: Copy;

    /// Multiplies the pixel by its normalized pixel area.
    fn scale(self, area: f64) -> Self::Output;
}

impl Correctable for f64 {
    type Output = f64;

    #[inline]
    fn scale(self, area: f64) -> f64 {
        self * area
    }
}

impl Correctable for f32 {
    type Output = f32;

    // Map files are single precision, so the narrowing is exact for them.
    #[inline]
    fn scale(self, area: f64) -> f32 {
        self * area as f32
    }
}

macro_rules! promote_to_f64 {
    ($($t:ty),*) => {
        $(
            impl Correctable for $t {
                type Output = f64;

                #[inline]
                fn scale(self, area: f64) -> f64 {
                    self as f64 * area
                }
            }
        )*
    };
}

promote_to_f64!(u8, i8, u16, i16, u32, i32, u64, i64);

/// Multiplies `image` by the region of its chip's pixel area map that lies
/// under it, treating `LTV1`/`LTV2` with [`LtvPolicy::Absolute`].
///
/// Neither the image nor the maps are modified; the result is a new array of
/// the image's shape.
pub fn correct<A: Correctable>(
    image: ArrayView2<'_, A>,
    header: &ScienceHeader,
    pam_by_chip: &PamSet,
) -> Result<Array2<A::Output>> {
    correct_with(image, header, pam_by_chip, LtvPolicy::Absolute)
}

/// [`correct`] with an explicit policy for the sign of `LTV1`/`LTV2`.
///
/// Checks run in order: header keywords, declared shape against `image`,
/// chip lookup, then map bounds. The first failure is returned.
pub fn correct_with<A: Correctable>(
    image: ArrayView2<'_, A>,
    header: &ScienceHeader,
    pam_by_chip: &PamSet,
    policy: LtvPolicy,
) -> Result<Array2<A::Output>> {
    apply(image, header, pam_by_chip, policy).map(|applied| applied.data)
}

/// Corrected pixels along with the chip and map region that produced them.
pub(crate) struct Applied<T> {
    pub chip: i64,
    pub geometry: SubarrayGeometry,
    pub data: Array2<T>,
}

pub(crate) fn apply<A: Correctable>(
    image: ArrayView2<'_, A>,
    header: &ScienceHeader,
    pam_by_chip: &PamSet,
    policy: LtvPolicy,
) -> Result<Applied<A::Output>> {
    let geometry = SubarrayGeometry::from_header(header, policy)?;
    let (rows, cols) = image.dim();
    geometry.check_shape(rows, cols)?;

    let chip = header.ccdchip()?;
    let pam = pam_by_chip.get(chip)?;
    let region = pam.region(&geometry)?;
    debug!("chip {chip}: applying pixel area map region {geometry} to {rows}x{cols} image");

    let data = Zip::from(&image)
        .and(&region)
        .map_collect(|&pixel, &area| pixel.scale(area));
    Ok(Applied {
        chip,
        geometry,
        data,
    })
}
