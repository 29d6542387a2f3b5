use anyhow::{bail, Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use dsgconvert::encoder::{DsgEncoder, EncodingError, OutputTarget};
use dsgconvert::schema::FeatureType;
use dsgconvert::table::read_delimited_file;
use dsgconvert::template::Template;

use super::config::{Config, Overrides, Settings};
use super::OutputArgs;

/// Convert a delimited table to a CF-DSG netCDF file
pub fn run(
    input: PathBuf,
    template_path: PathBuf,
    delimiter: Option<String>,
    header_lines: Option<usize>,
    output: OutputArgs,
) -> Result<()> {
    if !input.exists() {
        bail!("Input file does not exist: {}", input.display());
    }

    let template = Template::from_json_file(&template_path)
        .with_context(|| format!("Failed to load template: {}", template_path.display()))?;
    let feature_type = resolve_feature_type(&output, &template);
    let settings = resolve_settings(&output, delimiter, header_lines, &input)?;

    info!("dsg-convert - table to CF-DSG netCDF");
    info!("====================================");
    info!("Input:    {}", input.display());
    info!("Template: {}", template_path.display());
    info!("Output:   {}", settings.output_dir.display());
    info!("Feature:  {}", feature_type);
    info!("Format:   {}", settings.encoder.format);

    let table = read_delimited_file(&input, &settings.table)
        .with_context(|| format!("Failed to read table: {}", input.display()))?;
    info!("Read {} rows x {} columns", table.row_count(), table.column_count());

    let source_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let target = OutputTarget::new(&settings.output_dir, source_name);
    let encoder = DsgEncoder::with_config(settings.encoder);

    let stats = encoder
        .encode(&template, &table, feature_type, &target)
        .map_err(describe)?;

    println!("{}", stats);
    Ok(())
}

/// Feature type from the flag, else the template, else trajectory
pub(super) fn resolve_feature_type(output: &OutputArgs, template: &Template) -> FeatureType {
    output
        .feature_type
        .map(FeatureType::from)
        .or(template.feature_type)
        .unwrap_or(FeatureType::Trajectory)
}

/// Merge the config file with flags; output defaults to the input's directory
pub(super) fn resolve_settings(
    output: &OutputArgs,
    delimiter: Option<String>,
    header_lines: Option<usize>,
    input: &Path,
) -> Result<Settings> {
    let config = Config::load(output.config.as_deref())?;
    let default_dir = input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    config.conversion.resolve(
        Overrides {
            format: output.format.map(Into::into),
            fallback_feature_id: output.feature_id.clone(),
            delimiter,
            header_lines,
            output_dir: output.output_dir.clone(),
        },
        default_dir,
    )
}

/// Attach a hint distinguishing environment failures from bad input
pub(super) fn describe(err: EncodingError) -> anyhow::Error {
    if err.is_resource_error() {
        anyhow::Error::new(err).context("Conversion failed (check the output location and retry)")
    } else {
        anyhow::Error::new(err).context("Conversion failed (fix the template or input data)")
    }
}
