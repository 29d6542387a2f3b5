use std::collections::{BTreeMap, HashMap};

use log::{debug, info, warn};

use super::constants::*;
use super::error::AttributeError;
use super::values::{ColumnValues, Extrema};
use super::{DataSource, EncodedSchema, FeatureType, VariableDef};
use crate::catalog::{
    AttributeSpec, AxisKind, ClassificationResult, ClassifiedVariable, ColumnRole, DeclaredType,
    NameRegistry,
};
use crate::ncfile::{is_valid_name, AttrValue, Attribute, Dimension, FileFormat, NcType};
use crate::template::AttributeGroup;
use crate::time::{TimeAxis, TimeSource};

/// Converted column values keyed by output variable name
pub type ConvertedColumns = BTreeMap<String, ColumnValues>;

/// Everything [`build`] derives the schema from
#[derive(Debug, Clone, Copy)]
pub struct BuildInput<'a> {
    /// Feature type of the dataset
    pub feature_type: FeatureType,
    /// Classified columns, including the name registry
    pub classification: &'a ClassificationResult,
    /// Resolved time coordinate
    pub time_axis: &'a TimeAxis,
    /// Converted values of every column variable
    pub columns: &'a ConvertedColumns,
    /// Number of data rows
    pub row_count: usize,
    /// User global attribute groups
    pub global_attributes: &'a [AttributeGroup],
    /// Feature identifier from the template
    pub feature_id: Option<&'a str>,
    /// Identifier used when the template has none
    pub fallback_feature_id: &'a str,
    /// Target file format (decides integer widths)
    pub format: FileFormat,
}

/// Attribute list keeping declaration order
#[derive(Debug, Default)]
struct AttributeSet {
    attributes: Vec<Attribute>,
}

impl AttributeSet {
    fn contains(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Set a derived value, replacing a user value in place
    fn set(&mut self, attribute: Attribute) {
        match self.attributes.iter_mut().find(|a| a.name == attribute.name) {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }

    /// Add a value only if the user did not declare one
    fn set_default(&mut self, attribute: Attribute) {
        if !self.contains(&attribute.name) {
            self.attributes.push(attribute);
        }
    }

    fn into_vec(self) -> Vec<Attribute> {
        self.attributes
    }
}

/// Convert a declared attribute into its stored form
fn typed_attribute(
    owner: &str,
    spec: &AttributeSpec,
    format: FileFormat,
) -> Result<Attribute, AttributeError> {
    if !is_valid_name(&spec.name) {
        return Err(AttributeError::InvalidName {
            owner: owner.to_string(),
            name: spec.name.clone(),
        });
    }
    let invalid = || AttributeError::InvalidValue {
        owner: owner.to_string(),
        name: spec.name.clone(),
        value: spec.value.clone(),
        expected: spec.value_type,
    };
    let value = match spec.value_type {
        DeclaredType::Text => AttrValue::Text(spec.value.clone()),
        DeclaredType::Integer => {
            let parsed: i64 = spec.value.trim().parse().map_err(|_| invalid())?;
            match i32::try_from(parsed) {
                Ok(narrow) => AttrValue::Int(vec![narrow]),
                Err(_) if format.supports_int64() => AttrValue::Int64(vec![parsed]),
                Err(_) => return Err(invalid()),
            }
        }
        DeclaredType::Float => {
            let parsed: f64 = spec.value.trim().parse().map_err(|_| invalid())?;
            AttrValue::Double(vec![parsed])
        }
    };
    Ok(Attribute::new(spec.name.clone(), value))
}

fn user_attributes(
    variable: &ClassifiedVariable,
    format: FileFormat,
) -> Result<AttributeSet, AttributeError> {
    let mut set = AttributeSet::default();
    for spec in &variable.descriptor.attributes {
        set.set(typed_attribute(&variable.name, spec, format)?);
    }
    Ok(set)
}

/// Flatten template groups in order, rejecting names declared twice
fn flatten_globals(
    groups: &[AttributeGroup],
    format: FileFormat,
) -> Result<AttributeSet, AttributeError> {
    let mut set = AttributeSet::default();
    let mut origin: HashMap<&str, &str> = HashMap::new();
    for group in groups {
        for spec in &group.attributes {
            if let Some(first) = origin.insert(spec.name.as_str(), group.group.as_str()) {
                return Err(AttributeError::DuplicateGlobal {
                    name: spec.name.clone(),
                    first_group: first.to_string(),
                    second_group: group.group.clone(),
                });
            }
            set.set(typed_attribute("global", spec, format)?);
        }
    }
    Ok(set)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerticalSense {
    Up,
    Down,
}

impl VerticalSense {
    fn of(variable: &ClassifiedVariable) -> Result<Self, AttributeError> {
        let raw = variable.descriptor.attribute(ATTR_POSITIVE).unwrap_or("");
        match raw.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(VerticalSense::Up),
            "down" => Ok(VerticalSense::Down),
            _ => Err(AttributeError::InvalidVerticalSense {
                name: variable.descriptor.name.clone(),
                value: raw.to_string(),
            }),
        }
    }

    fn positive(self) -> &'static str {
        match self {
            VerticalSense::Up => "up",
            VerticalSense::Down => "down",
        }
    }

    fn standard_name(self) -> &'static str {
        match self {
            VerticalSense::Up => "altitude",
            VerticalSense::Down => "depth",
        }
    }
}

/// Standard name, long name and default units of a horizontal or time axis
fn axis_names(axis: AxisKind) -> (&'static str, Option<&'static str>) {
    match axis {
        AxisKind::Time => ("time", None),
        AxisKind::Latitude => ("latitude", Some("degrees_north")),
        AxisKind::Longitude => ("longitude", Some("degrees_east")),
        AxisKind::Vertical => ("vertical", None),
    }
}

fn set_extrema(set: &mut AttributeSet, extrema: Option<Extrema>) {
    if let Some(extrema) = extrema {
        set.set(Attribute::new(ATTR_VALID_MIN, extrema.min_value()));
        set.set(Attribute::new(ATTR_VALID_MAX, extrema.max_value()));
    }
}

/// Running min/max across several variables
#[derive(Debug, Default, Clone, Copy)]
struct Bounds(Option<(f64, f64)>);

impl Bounds {
    fn include(&mut self, lo: f64, hi: f64) {
        self.0 = Some(match self.0 {
            None => (lo, hi),
            Some((a, b)) => (a.min(lo), b.max(hi)),
        });
    }
}

/// Scalar fallback coordinate of a Profile
struct ScalarCoordinate {
    name: String,
    axis: AxisKind,
    value: f64,
}

fn global_number(globals: &AttributeSet, name: &str) -> Result<Option<f64>, AttributeError> {
    let attribute = match globals.get(name) {
        Some(attribute) => attribute,
        None => return Ok(None),
    };
    if let Some(value) = attribute.value.as_f64() {
        return Ok(Some(value));
    }
    let text = attribute.value.as_text().unwrap_or("");
    text.trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| AttributeError::InvalidValue {
            owner: "global".to_string(),
            name: name.to_string(),
            value: text.to_string(),
            expected: DeclaredType::Float,
        })
}

/// User globals merged with `Conventions` and `featureType`
fn resolve_globals(
    feature: FeatureType,
    groups: &[AttributeGroup],
    format: FileFormat,
) -> Result<AttributeSet, AttributeError> {
    let mut globals = flatten_globals(groups, format)?;

    match globals.get(ATTR_CONVENTIONS).and_then(|a| a.value.as_text()) {
        Some(conventions) if !conventions.contains("CF") => {
            warn!(
                "Conventions attribute '{}' does not name CF conventions",
                conventions
            );
        }
        Some(_) => {}
        None => globals.set(Attribute::text(ATTR_CONVENTIONS, CF_CONVENTIONS)),
    }
    match globals.get(ATTR_FEATURE_TYPE) {
        Some(existing) => {
            let found = existing.value.as_text().unwrap_or("").trim().to_string();
            if !found.eq_ignore_ascii_case(feature.cf_name()) {
                return Err(AttributeError::ConflictingGlobal {
                    name: ATTR_FEATURE_TYPE.to_string(),
                    expected: feature.cf_name().to_string(),
                    found,
                });
            }
        }
        None => globals.set(Attribute::text(ATTR_FEATURE_TYPE, feature.cf_name())),
    }
    Ok(globals)
}

/// Check the user's attribute declarations without looking at any data.
///
/// Reports the same configuration errors [`build`] would, so callers can
/// reject a template before parsing rows.
pub fn validate_declarations(
    feature: FeatureType,
    classification: &ClassificationResult,
    global_attributes: &[AttributeGroup],
    format: FileFormat,
) -> Result<(), AttributeError> {
    resolve_globals(feature, global_attributes, format)?;
    for variable in classification.column_variables().into_iter().map(|(v, _)| v) {
        user_attributes(variable, format)?;
    }
    for vertical in &classification.coordinates.vertical {
        VerticalSense::of(vertical)?;
    }
    Ok(())
}

/// Derive the complete schema of one dataset.
///
/// The builder continues the name registry of the classification, so the
/// identifier and fallback variables never collide with column names.
pub fn build(input: &BuildInput<'_>) -> Result<EncodedSchema, AttributeError> {
    let feature = input.feature_type;
    let classification = input.classification;
    let format = input.format;
    let mut names: NameRegistry = classification.names.clone();
    let mut dimension_names = NameRegistry::new();

    // ========================================================================
    // Global attributes supplied by the user
    // ========================================================================

    let mut globals = resolve_globals(feature, input.global_attributes, format)?;

    // ========================================================================
    // Dimensions
    // ========================================================================

    let time_name = input.time_axis.variable_name.clone();
    let sample_dimension = match feature {
        FeatureType::Trajectory | FeatureType::TimeSeries => time_name.clone(),
        FeatureType::Profile => classification
            .coordinates
            .vertical
            .first()
            .map(|v| v.name.clone())
            .unwrap_or_else(|| DEFAULT_SAMPLE_DIMENSION.to_string()),
    };
    let sample_dimension = dimension_names.claim(&sample_dimension);
    let mut dimensions = vec![Dimension::new(sample_dimension.clone(), input.row_count)];

    let feature_id = match input.feature_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => {
            let fallback = input.fallback_feature_id.trim();
            if fallback.is_empty() {
                return Err(AttributeError::EmptyFeatureId);
            }
            info!("No feature identifier supplied, using '{}'", fallback);
            fallback.to_string()
        }
    };

    // ========================================================================
    // Profile scalar coordinates
    // ========================================================================

    let mut scalars = Vec::new();
    if feature == FeatureType::Profile {
        for (axis, global) in [
            (AxisKind::Latitude, GEOSPATIAL_LAT_START),
            (AxisKind::Longitude, GEOSPATIAL_LON_START),
        ] {
            if !classification.coordinates.for_axis(axis).is_empty() {
                continue;
            }
            match global_number(&globals, global)? {
                Some(value) => {
                    let (standard_name, _) = axis_names(axis);
                    debug!("Profile {} taken from global '{}' = {}", axis, global, value);
                    scalars.push(ScalarCoordinate {
                        name: names.claim(standard_name),
                        axis,
                        value,
                    });
                }
                None => debug!("Profile has no {} coordinate, omitting the axis", axis),
            }
        }
    }

    let mut coordinate_names = vec![time_name.clone()];
    for axis in [AxisKind::Latitude, AxisKind::Longitude, AxisKind::Vertical] {
        coordinate_names.extend(
            classification
                .coordinates
                .for_axis(axis)
                .iter()
                .map(|v| v.name.clone()),
        );
        coordinate_names.extend(
            scalars
                .iter()
                .filter(|s| s.axis == axis)
                .map(|s| s.name.clone()),
        );
    }
    let coordinates_attribute = coordinate_names.join(" ");

    // ========================================================================
    // Column variables
    // ========================================================================

    let mut variables = Vec::new();
    let mut bounds: HashMap<AxisKind, Bounds> = HashMap::new();

    for (variable, role) in classification.column_variables() {
        let values = input
            .columns
            .get(&variable.name)
            .ok_or_else(|| AttributeError::MissingValues(variable.name.clone()))?;
        let mut attributes = user_attributes(variable, format)?;
        let extrema = values.extrema();

        let mut var_dimensions = vec![sample_dimension.clone()];
        if let Some(width) = values.text_width() {
            let strlen = dimension_names.claim(&format!("{}_strlen", variable.name));
            dimensions.push(Dimension::new(strlen.clone(), width));
            var_dimensions.push(strlen);
        }

        match role {
            ColumnRole::Coordinate(AxisKind::Vertical) => {
                let sense = VerticalSense::of(variable)?;
                attributes.set(Attribute::text(ATTR_AXIS, AxisKind::Vertical.axis_code()));
                attributes.set(Attribute::text(ATTR_POSITIVE, sense.positive()));
                attributes.set_default(Attribute::text(ATTR_STANDARD_NAME, sense.standard_name()));
                attributes.set_default(Attribute::text(ATTR_LONG_NAME, sense.standard_name()));
            }
            ColumnRole::Coordinate(axis) => {
                let (standard_name, units) = axis_names(axis);
                attributes.set(Attribute::text(ATTR_AXIS, axis.axis_code()));
                attributes.set_default(Attribute::text(ATTR_STANDARD_NAME, standard_name));
                attributes.set_default(Attribute::text(ATTR_LONG_NAME, standard_name));
                if axis == AxisKind::Time {
                    attributes.set_default(Attribute::text(ATTR_UNITS, input.time_axis.units.clone()));
                } else if let Some(units) = units {
                    attributes.set_default(Attribute::text(ATTR_UNITS, units));
                }
            }
            ColumnRole::Data => {
                attributes.set_default(Attribute::text(
                    ATTR_LONG_NAME,
                    variable.descriptor.name.trim(),
                ));
                attributes.set(Attribute::text(ATTR_COORDINATES, coordinates_attribute.clone()));
            }
        }
        set_extrema(&mut attributes, extrema);
        attributes.set(Attribute::text(
            ATTR_COLUMN_ID,
            variable.descriptor.source_key.clone(),
        ));

        if let (ColumnRole::Coordinate(axis), Some(extrema)) = (role, extrema) {
            let (lo, hi) = extrema.as_f64();
            bounds.entry(axis).or_default().include(lo, hi);
        }

        variables.push(VariableDef {
            name: variable.name.clone(),
            nc_type: values.nc_type(),
            dimensions: var_dimensions,
            attributes: attributes.into_vec(),
            source: DataSource::Column {
                source_key: variable.descriptor.source_key.clone(),
            },
        });
    }

    // ========================================================================
    // Identifier, synthesized time and scalar fallbacks
    // ========================================================================

    let identifier_name = names.claim(feature.identifier_name());
    let id_strlen = dimension_names.claim(ID_STRLEN_DIMENSION);
    dimensions.push(Dimension::new(id_strlen.clone(), feature_id.len()));
    variables.push(VariableDef {
        name: identifier_name,
        nc_type: NcType::Char,
        dimensions: vec![id_strlen],
        attributes: vec![
            Attribute::text(ATTR_CF_ROLE, feature.cf_role()),
            Attribute::text(ATTR_LONG_NAME, format!("{} identifier", feature.cf_name())),
        ],
        source: DataSource::Identifier(feature_id.clone()),
    });

    if let TimeSource::Synthesized(values) = &input.time_axis.source {
        let mut attributes = AttributeSet::default();
        attributes.set(Attribute::text(ATTR_AXIS, AxisKind::Time.axis_code()));
        attributes.set(Attribute::text(ATTR_STANDARD_NAME, "time"));
        attributes.set(Attribute::text(ATTR_LONG_NAME, "time"));
        attributes.set(Attribute::text(ATTR_UNITS, input.time_axis.units.clone()));
        if let Some((lo, hi)) = values.extrema() {
            let (min, max) = match values.nc_type() {
                NcType::Int64 => (AttrValue::Int64(vec![lo]), AttrValue::Int64(vec![hi])),
                _ => (
                    AttrValue::Int(vec![lo as i32]),
                    AttrValue::Int(vec![hi as i32]),
                ),
            };
            attributes.set(Attribute::new(ATTR_VALID_MIN, min));
            attributes.set(Attribute::new(ATTR_VALID_MAX, max));
        }
        variables.push(VariableDef {
            name: time_name.clone(),
            nc_type: values.nc_type(),
            dimensions: vec![sample_dimension.clone()],
            attributes: attributes.into_vec(),
            source: DataSource::SynthesizedTime,
        });
    }

    for scalar in &scalars {
        let (standard_name, units) = axis_names(scalar.axis);
        let mut attributes = vec![
            Attribute::text(ATTR_AXIS, scalar.axis.axis_code()),
            Attribute::text(ATTR_STANDARD_NAME, standard_name),
            Attribute::text(ATTR_LONG_NAME, standard_name),
        ];
        if let Some(units) = units {
            attributes.push(Attribute::text(ATTR_UNITS, units));
        }
        bounds
            .entry(scalar.axis)
            .or_default()
            .include(scalar.value, scalar.value);
        variables.push(VariableDef {
            name: scalar.name.clone(),
            nc_type: NcType::Double,
            dimensions: Vec::new(),
            attributes,
            source: DataSource::Scalar(scalar.value),
        });
    }

    // ========================================================================
    // ACDD bounds
    // ========================================================================

    for (axis, prefix) in [
        (AxisKind::Latitude, "geospatial_lat"),
        (AxisKind::Longitude, "geospatial_lon"),
        (AxisKind::Vertical, "geospatial_vertical"),
    ] {
        if let Some(Bounds(Some((lo, hi)))) = bounds.get(&axis).copied() {
            globals.set_default(Attribute::new(format!("{}_min", prefix), AttrValue::Double(vec![lo])));
            globals.set_default(Attribute::new(format!("{}_max", prefix), AttrValue::Double(vec![hi])));
        }
    }

    info!(
        "Built {} schema: {} dimensions, {} variables, {} global attributes",
        feature,
        dimensions.len(),
        variables.len(),
        globals.attributes.len()
    );

    Ok(EncodedSchema {
        feature_type: feature,
        sample_dimension,
        feature_id,
        dimensions,
        variables,
        global_attributes: globals.into_vec(),
    })
}
