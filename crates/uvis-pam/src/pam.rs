//! Pixel area maps, one per detector chip.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;
use ndarray::{s, Array2, ArrayView2};

use crate::error::{Error, Result};
use crate::fits::load_pam;
use crate::geometry::SubarrayGeometry;

/// CCDCHIP values of the two WFC3/UVIS chips.
pub const UVIS_CHIPS: [i64; 2] = [1, 2];

/// File name of the map for `chip`, e.g. `UVIS2wfc3_map.fits`.
pub fn pam_file_name(chip: i64) -> String {
    format!("UVIS{chip}wfc3_map.fits")
}

/// Path of the map for `chip` inside `dir`.
pub fn pam_path(dir: impl AsRef<Path>, chip: i64) -> PathBuf {
    dir.as_ref().join(pam_file_name(chip))
}

/// Normalized on-sky area of every pixel of one chip.
///
/// The array is shared, so clones are cheap and every clone sees the same
/// immutable values.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelAreaMap {
    data: Arc<Array2<f64>>,
}

impl PixelAreaMap {
    pub fn new(data: Array2<f64>) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// The `[y0:y1, x0:x1]` window under a subarray.
    ///
    /// Fails with [`Error::Geometry`] instead of clipping when the window
    /// extends past the map.
    pub fn region(&self, geometry: &SubarrayGeometry) -> Result<ArrayView2<'_, f64>> {
        if !geometry.fits_within(self.rows(), self.cols()) {
            return Err(Error::Geometry {
                region: *geometry,
                map_rows: self.rows(),
                map_cols: self.cols(),
            });
        }
        Ok(self
            .data
            .slice(s![geometry.y0..geometry.y1, geometry.x0..geometry.x1]))
    }
}

impl From<Array2<f64>> for PixelAreaMap {
    fn from(data: Array2<f64>) -> Self {
        Self::new(data)
    }
}

/// Pixel area maps keyed by CCDCHIP.
#[derive(Debug, Clone, Default)]
pub struct PamSet {
    maps: BTreeMap<i64, PixelAreaMap>,
}

impl PamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the map for `chip`, returning the one it replaces.
    pub fn insert(&mut self, chip: i64, map: impl Into<PixelAreaMap>) -> Option<PixelAreaMap> {
        self.maps.insert(chip, map.into())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, chip: i64, map: impl Into<PixelAreaMap>) -> Self {
        self.insert(chip, map);
        self
    }

    /// The map for `chip`. There is no fallback map.
    pub fn get(&self, chip: i64) -> Result<&PixelAreaMap> {
        self.maps.get(&chip).ok_or(Error::UnsupportedChip(Some(chip)))
    }

    /// Registered chips in ascending order.
    pub fn chips(&self) -> impl Iterator<Item = i64> + '_ {
        self.maps.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Loads `<dir>/UVIS<chip>wfc3_map.fits` for each chip.
    pub fn load_dir(dir: impl AsRef<Path>, chips: &[i64]) -> Result<Self> {
        let mut set = Self::new();
        for &chip in chips {
            let path = pam_path(&dir, chip);
            let map = load_pam(&path)?;
            info!(
                "loaded pixel area map for chip {chip} from {} ({}x{})",
                path.display(),
                map.rows(),
                map.cols()
            );
            set.insert(chip, map);
        }
        Ok(set)
    }

    /// Loads the maps of both WFC3/UVIS chips from `dir`.
    pub fn load_uvis(dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_dir(dir, &UVIS_CHIPS)
    }
}
