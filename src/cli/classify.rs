use anyhow::{Context, Result};
use std::path::PathBuf;

use dsgconvert::catalog::{classify, ColumnRole};
use dsgconvert::schema::FeatureType;
use dsgconvert::template::Template;
use dsgconvert::time::TimeMode;

/// Print the classification of a template's columns
pub fn run(template_path: PathBuf, feature_type: Option<FeatureType>) -> Result<()> {
    let template = Template::from_json_file(&template_path)
        .with_context(|| format!("Failed to load template: {}", template_path.display()))?;
    let feature_type = feature_type
        .or(template.feature_type)
        .unwrap_or(FeatureType::Trajectory);

    let result = classify(&template.variables).context("Classification failed")?;

    println!("Template: {}", template_path.display());
    println!("Feature type: {}", feature_type);
    println!();

    println!("Columns:");
    for (variable, role) in result.column_variables() {
        let role = match role {
            ColumnRole::Coordinate(axis) => format!("{} coordinate", axis),
            ColumnRole::Data => "data".to_string(),
        };
        println!(
            "  {:>4} {:<24} <- '{}' ({:?}, {})",
            variable.index, variable.name, variable.descriptor.source_key, variable.descriptor.declared_type, role
        );
    }
    for component in &result.time_components {
        println!(
            "  {:>4} {:<24} <- '{}' (time component)",
            component.index, component.name, component.descriptor.source_key
        );
    }
    println!();

    match TimeMode::detect(&result) {
        Ok(mode) => println!("Time: {}", mode),
        Err(e) => println!("Time: {}", e),
    }

    let missing = result.missing_roles(feature_type);
    if missing.is_empty() {
        println!("All {} roles present", feature_type);
    } else {
        for role in missing {
            println!("Missing: {:?}", role);
        }
    }

    Ok(())
}
