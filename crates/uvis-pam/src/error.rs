use std::path::PathBuf;

use crate::geometry::SubarrayGeometry;

/// All errors that can occur while correcting an image.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Declared NAXIS1/NAXIS2 disagree with the shape of the supplied array.
    #[error("header declares {naxis2}x{naxis1} pixels but the image is {rows}x{cols}")]
    ShapeMismatch {
        naxis1: usize,
        naxis2: usize,
        rows: usize,
        cols: usize,
    },
    /// CCDCHIP is missing or has no pixel area map.
    #[error("no pixel area map for {}", chip_label(.0))]
    UnsupportedChip(Option<i64>),
    /// The subarray rectangle does not fit inside the selected map.
    #[error("subarray region {region} lies outside the {map_rows}x{map_cols} pixel area map")]
    Geometry {
        region: SubarrayGeometry,
        map_rows: usize,
        map_cols: usize,
    },
    /// A required keyword was not found in the header.
    #[error("missing required keyword: {0}")]
    MissingKeyword(&'static str),
    /// A keyword is present but its value cannot be used.
    #[error("invalid value for keyword {keyword}: {reason}")]
    InvalidKeyword {
        keyword: String,
        reason: &'static str,
    },
    /// A positive LTV offset was rejected by [`LtvPolicy::RequireNonPositive`].
    ///
    /// [`LtvPolicy::RequireNonPositive`]: crate::geometry::LtvPolicy::RequireNonPositive
    #[error("{keyword} = {value} is positive, subarray offsets are stored negated")]
    PositiveOffset { keyword: &'static str, value: f64 },
    /// The image has zero rows or zero columns.
    #[error("image has no pixels")]
    EmptyImage,
    /// The HDU does not hold 2-D image data.
    #[error("HDU {hdu} does not hold a 2-D image")]
    NotAnImage { hdu: usize },
    /// The file has no SCI extension and no 2-D image HDU.
    #[error("no science image found in {}", .0.display())]
    NoScienceData(PathBuf),
    /// The output file exists and overwriting was not requested.
    #[error("output file {} already exists", .0.display())]
    OutputExists(PathBuf),
    /// Pixel data could not be arranged into the declared shape.
    #[error("pixel data does not match the declared image shape")]
    Shape(#[from] ndarray::ShapeError),
    /// Error reported by the FITS reader or writer.
    #[error("FITS error: {0}")]
    Fits(#[from] fitsio_pure::Error),
    /// An I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn chip_label(chip: &Option<i64>) -> String {
    match chip {
        Some(chip) => format!("chip {chip}"),
        None => "an image without CCDCHIP".to_string(),
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
