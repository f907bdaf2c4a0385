//! Correcting whole files and batches of files.

use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;

use crate::correct::apply;
use crate::error::{Error, Result};
use crate::fits::{read_fits, write_corrected, CorrectedExtension, FitsFile};
use crate::geometry::LtvPolicy;
use crate::pam::PamSet;

/// Options for [`correct_file`] and [`correct_files`].
#[derive(Debug, Clone)]
pub struct CorrectionOptions {
    pub ltv_policy: LtvPolicy,
    /// Directory for corrected files. Nothing is written when `None`.
    pub output_dir: Option<PathBuf>,
    /// Appended to the input file stem to name the output.
    pub suffix: String,
    /// Replace existing output files.
    pub overwrite: bool,
}

impl Default for CorrectionOptions {
    fn default() -> Self {
        Self {
            ltv_policy: LtvPolicy::Absolute,
            output_dir: None,
            suffix: "_pam".to_string(),
            overwrite: false,
        }
    }
}

/// Result of correcting one file.
#[derive(Debug, Clone)]
pub struct CorrectedFile {
    pub input: PathBuf,
    /// Where the corrected copy was written, if anywhere.
    pub output: Option<PathBuf>,
    pub extensions: Vec<CorrectedExtension>,
}

/// Outcome of one file in a batch.
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<CorrectedFile>,
}

/// `<output_dir>/<stem><suffix>.fits`, or `None` without an output directory.
pub fn output_path(input: &Path, options: &CorrectionOptions) -> Option<PathBuf> {
    let dir = options.output_dir.as_ref()?;
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Some(dir.join(format!("{stem}{}.fits", options.suffix)))
}

/// Corrects every science image of an already loaded file.
///
/// Each image uses the map of its own CCDCHIP, so full frames holding both
/// chips are handled in one pass. Any failing image fails the whole file.
pub fn correct_fits(
    file: &FitsFile,
    pams: &PamSet,
    policy: LtvPolicy,
) -> Result<Vec<CorrectedExtension>> {
    file.science_extensions()?
        .into_iter()
        .map(|ext| -> Result<CorrectedExtension> {
            let applied = apply(ext.data.view(), &ext.header, pams, policy)?;
            Ok(CorrectedExtension {
                index: ext.index,
                chip: applied.chip,
                bitpix: ext.bitpix,
                geometry: applied.geometry,
                data: applied.data,
            })
        })
        .collect()
}

/// Reads `path`, corrects it and, when an output directory is configured,
/// writes the corrected copy.
pub fn correct_file(
    path: impl AsRef<Path>,
    pams: &PamSet,
    options: &CorrectionOptions,
) -> Result<CorrectedFile> {
    let path = path.as_ref();
    let output = output_path(path, options);
    if let Some(out) = &output {
        if out.exists() && !options.overwrite {
            return Err(Error::OutputExists(out.clone()));
        }
    }

    let file = read_fits(path)?;
    let extensions = correct_fits(&file, pams, options.ltv_policy)?;

    if let Some(out) = &output {
        if let Some(dir) = out.parent() {
            std::fs::create_dir_all(dir)?;
        }
        write_corrected(out, &file, &extensions, options.overwrite)?;
    }

    Ok(CorrectedFile {
        input: path.to_path_buf(),
        output,
        extensions,
    })
}

/// Corrects many files in parallel, sharing one set of maps.
///
/// Outcomes come back in input order. A failing file is logged and reported
/// in its outcome; the other files are unaffected.
pub fn correct_files<P>(
    paths: &[P],
    pams: &PamSet,
    options: &CorrectionOptions,
) -> Vec<FileOutcome>
where
    P: AsRef<Path> + Sync,
{
    let outcomes: Vec<FileOutcome> = paths
        .par_iter()
        .map(|p| {
            let input = p.as_ref().to_path_buf();
            let result = correct_file(&input, pams, options);
            if let Err(e) = &result {
                warn!("{}: {e}", input.display());
            }
            FileOutcome { input, result }
        })
        .collect();
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(
        "corrected {} of {} file(s)",
        outcomes.len() - failed,
        outcomes.len()
    );
    outcomes
}
