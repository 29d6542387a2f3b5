use anyhow::{bail, Context, Result};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use dsgconvert::encoder::{DsgEncoder, OutputTarget};
use dsgconvert::matchup::{align, LongRecord, MatchupRequest, SeriesSet};
use dsgconvert::template::Template;

use super::convert::{describe, resolve_feature_type, resolve_settings};
use super::OutputArgs;

/// Align long-form series and encode the aligned table
pub fn run(
    observations: PathBuf,
    request_path: PathBuf,
    template_path: Option<PathBuf>,
    output: OutputArgs,
) -> Result<()> {
    if !observations.exists() {
        bail!("Observation file does not exist: {}", observations.display());
    }

    let request: MatchupRequest = {
        let file = File::open(&request_path)
            .with_context(|| format!("Failed to open request: {}", request_path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse request: {}", request_path.display()))?
    };
    let mut template = match &template_path {
        Some(path) => Template::from_json_file(path)
            .with_context(|| format!("Failed to load template: {}", path.display()))?,
        None => Template::default(),
    };
    let feature_type = resolve_feature_type(&output, &template);
    let settings = resolve_settings(&output, None, None, &observations)?;

    let set = read_long_records(&observations, settings.table.delimiter)?;
    info!(
        "Loaded {} series from {}: {}",
        set.len(),
        observations.display(),
        set.names().collect::<Vec<_>>().join(", ")
    );

    let aligned = align(&set, &request).context("Matchup failed")?;
    info!("Aligned {} rows on the reference time grid", aligned.row_count());

    let table = aligned
        .to_parsed_table()
        .context("Aligned series clash with reserved column names")?;
    template.variables = aligned.descriptors();

    let source_name = observations
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let target = OutputTarget::new(&settings.output_dir, source_name);
    let stats = DsgEncoder::with_config(settings.encoder)
        .encode(&template, &table, feature_type, &target)
        .map_err(describe)?;

    println!("{}", stats);
    Ok(())
}

fn read_long_records(path: &Path, delimiter: u8) -> Result<SeriesSet> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let records = reader
        .deserialize::<LongRecord>()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Malformed observation record in {}", path.display()))?;
    Ok(SeriesSet::from_long_records(records)?)
}
