use std::path::PathBuf;
use std::process;

use clap::Parser;
use uvis_pam::pipeline::{correct_files, CorrectionOptions, FileOutcome};
use uvis_pam::{LtvPolicy, PamSet};

#[derive(Parser, Debug)]
#[command(name = "pamcorrect")]
#[command(about = "Apply the WFC3/UVIS pixel area map to calibrated images")]
struct Args {
    /// Directory holding UVIS1wfc3_map.fits and UVIS2wfc3_map.fits
    #[arg(long)]
    pam_dir: PathBuf,

    /// Write corrected copies here; without it files are only checked
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Appended to each input file stem to name its output
    #[arg(long, default_value = "_pam")]
    suffix: String,

    /// Reject positive LTV1/LTV2 instead of taking their absolute value
    #[arg(long)]
    strict_ltv: bool,

    /// Replace output files that already exist
    #[arg(long)]
    overwrite: bool,

    /// Calibrated FITS files (flt/flc)
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

impl Args {
    fn options(&self) -> CorrectionOptions {
        CorrectionOptions {
            ltv_policy: if self.strict_ltv {
                LtvPolicy::RequireNonPositive
            } else {
                LtvPolicy::Absolute
            },
            output_dir: self.output_dir.clone(),
            suffix: self.suffix.clone(),
            overwrite: self.overwrite,
        }
    }
}

fn format_outcome(outcome: &FileOutcome) -> String {
    let mut out = String::new();
    match &outcome.result {
        Ok(done) => {
            out.push_str(&format!("{}: ok\n", outcome.input.display()));
            for ext in &done.extensions {
                out.push_str(&format!(
                    "  HDU {}: chip {} region {}\n",
                    ext.index, ext.chip, ext.geometry
                ));
            }
            if let Some(path) = &done.output {
                out.push_str(&format!("  -> {}\n", path.display()));
            }
        }
        Err(e) => {
            out.push_str(&format!("{}: FAILED: {}\n", outcome.input.display(), e));
        }
    }
    out
}

fn run(args: &Args) -> Result<(String, usize), String> {
    let pams = PamSet::load_uvis(&args.pam_dir).map_err(|e| {
        format!(
            "Error loading pixel area maps from '{}': {}",
            args.pam_dir.display(),
            e
        )
    })?;

    let outcomes = correct_files(&args.files, &pams, &args.options());
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    let report: String = outcomes.iter().map(format_outcome).collect();
    Ok((report, failed))
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok((report, failed)) => {
            print!("{}", report);
            if failed > 0 {
                eprintln!("{} of {} file(s) failed", failed, args.files.len());
                process::exit(1);
            }
        }
        Err(msg) => {
            eprintln!("{}", msg);
            process::exit(1);
        }
    }
}
