use anyhow::{Context, Result};
use std::path::PathBuf;

use dsgconvert::ncfile::NcReader;

/// Display the header of a netCDF file
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let reader = NcReader::open(&file).context("Failed to read netCDF file")?;
    let header = reader.header();

    println!("netCDF File Information");
    println!("=======================");
    println!("File: {}", file.display());
    println!("Format: {}", header.format);
    println!("Size: {} bytes", reader.file_size());
    println!();

    println!("Dimensions:");
    for dimension in &header.dimensions {
        println!("  {} = {}", dimension.name, dimension.len);
    }
    println!();

    println!("Global Attributes:");
    for attribute in &header.global_attributes {
        println!("  {}: {}", attribute.name, preview(&attribute.value.to_string()));
    }
    println!();

    println!("Variables:");
    for variable in &header.variables {
        println!(
            "  {} {}({})",
            variable.nc_type,
            variable.name,
            header.dimension_names(variable).join(", ")
        );
        for attribute in &variable.attributes {
            println!("      {}: {}", attribute.name, preview(&attribute.value.to_string()));
        }
    }

    Ok(())
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 100;
    match text.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}... ({} bytes)", &text[..cut], text.len()),
        None => text.to_string(),
    }
}
