//! Pixel area map (PAM) correction for WFC3/UVIS images.
//!
//! A subarray readout records its position on the full detector through the
//! `LTV1`/`LTV2` header keywords. [`correct`] uses them to cut the matching
//! rectangle out of the chip's pixel area map and multiplies it into the image.

pub mod correct;
pub mod error;
pub mod fits;
pub mod geometry;
pub mod header;
pub mod pam;
pub mod pipeline;

pub use correct::{correct, correct_with, Correctable};
pub use error::{Error, Result};
pub use geometry::{LtvPolicy, SubarrayGeometry};
pub use header::{HeaderValue, ScienceHeader};
pub use pam::{PamSet, PixelAreaMap, UVIS_CHIPS};
