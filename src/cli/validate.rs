use anyhow::Result;
use log::info;
use std::path::PathBuf;

/// Check a netCDF file against the CF-DSG conventions
pub fn run(file: PathBuf) -> Result<()> {
    use dsgconvert::validator::validate_dsg_file;

    info!("CF-DSG Validator");
    info!("================");
    info!("File: {}", file.display());

    match validate_dsg_file(&file) {
        Ok(report) => {
            println!("{}", report.format_colored());

            if report.has_failures() {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            std::process::exit(1);
        }
    }
}
