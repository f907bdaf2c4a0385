use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use uvis_pam::fits::{read_fits, FitsFile};
use uvis_pam::header::{CCDCHIP, EXTNAME};
use uvis_pam::{LtvPolicy, SubarrayGeometry};

#[derive(Parser, Debug)]
#[command(name = "pamgeom")]
#[command(about = "Print where each science image sits on the WFC3/UVIS detector")]
struct Args {
    /// Calibrated FITS files
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn format_science(file: &FitsFile) -> String {
    let mut out = String::new();
    for index in file.science_indices() {
        let header = match file.header(index) {
            Ok(header) => header,
            Err(e) => {
                out.push_str(&format!("HDU {}: {}\n", index, e));
                continue;
            }
        };
        let name = header.text(EXTNAME).unwrap_or("");
        let chip = match header.ccdchip() {
            Ok(chip) => chip.to_string(),
            Err(_) => format!("no {}", CCDCHIP),
        };
        match SubarrayGeometry::from_header(&header, LtvPolicy::Absolute) {
            Ok(g) => out.push_str(&format!(
                "HDU {} {}: chip {}, {}x{}, region {}\n",
                index,
                name,
                chip,
                g.rows(),
                g.cols(),
                g
            )),
            Err(e) => out.push_str(&format!("HDU {} {}: chip {}, {}\n", index, name, chip, e)),
        }
    }
    out
}

fn run(path: &Path) -> Result<String, String> {
    let file = read_fits(path).map_err(|e| format!("Error reading '{}': {}", path.display(), e))?;
    Ok(format_science(&file))
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let mut failed = false;
    for path in &args.files {
        match run(path) {
            Ok(output) => print!("{}:\n{}", path.display(), output),
            Err(msg) => {
                eprintln!("{}", msg);
                failed = true;
            }
        }
    }
    if failed {
        process::exit(1);
    }
}
