//! # Variable Catalog
//!
//! Classifies the user's column descriptors into coordinate variables (grouped
//! by axis), time components that need synthesis, and plain data variables.
//! Output names are sanitized and de-duplicated here through a
//! [`NameRegistry`] that is handed on to the schema builder.
//!
//! ```rust
//! use dsgconvert::catalog::{classify, AxisKind, DeclaredType, Role, VariableDescriptor};
//!
//! let descriptors = vec![
//!     VariableDescriptor::new("0", "lat", DeclaredType::Float, Role::coordinate(AxisKind::Latitude)),
//!     VariableDescriptor::new("1", "sea temp", DeclaredType::Float, Role::Data),
//!     VariableDescriptor::new("2", "notes", DeclaredType::Text, Role::Ignored),
//! ];
//! let result = classify(&descriptors)?;
//! assert_eq!(result.coordinates.latitude[0].name, "lat");
//! assert_eq!(result.data[0].name, "sea_temp");
//! # Ok::<(), dsgconvert::catalog::ClassificationError>(())
//! ```

mod error;
mod names;
mod types;


use log::{debug, warn};

pub use error::ClassificationError;
pub use names::{sanitize_name, NameRegistry};
pub use types::{
    AttributeSpec, AxisKind, DeclaredType, Role, TimeComponentKind, VariableDescriptor,
};

use crate::schema::FeatureType;

/// Name of the synthesized time coordinate
pub const TIME_VARIABLE_NAME: &str = "time";

/// A descriptor together with its unique output name
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedVariable {
    /// Sanitized, de-duplicated output name
    pub name: String,
    /// Position of the descriptor in the template
    pub index: usize,
    /// The original declaration
    pub descriptor: VariableDescriptor,
}

/// Non-time coordinate variables grouped by axis, each in template order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateGroups {
    /// Latitude columns
    pub latitude: Vec<ClassifiedVariable>,
    /// Longitude columns
    pub longitude: Vec<ClassifiedVariable>,
    /// Vertical columns
    pub vertical: Vec<ClassifiedVariable>,
}

impl CoordinateGroups {
    /// Columns for one spatial axis (empty for time)
    pub fn for_axis(&self, axis: AxisKind) -> &[ClassifiedVariable] {
        match axis {
            AxisKind::Latitude => &self.latitude,
            AxisKind::Longitude => &self.longitude,
            AxisKind::Vertical => &self.vertical,
            AxisKind::Time => &[],
        }
    }

    fn push(&mut self, axis: AxisKind, variable: ClassifiedVariable) {
        match axis {
            AxisKind::Latitude => self.latitude.push(variable),
            AxisKind::Longitude => self.longitude.push(variable),
            AxisKind::Vertical => self.vertical.push(variable),
            AxisKind::Time => {}
        }
    }
}

/// How a classified column is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Coordinate variable along an axis
    Coordinate(AxisKind),
    /// Plain data variable
    Data,
}

/// A role that a feature type needs but no descriptor supplies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingRole {
    /// No time information at all
    Time,
    /// No latitude column
    Latitude,
    /// No longitude column
    Longitude,
    /// No vertical column (profiles)
    Vertical,
}

/// Output of [`classify`]
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// The relative time coordinate, when one is declared
    pub relative_time: Option<ClassifiedVariable>,
    /// Spatial coordinate columns
    pub coordinates: CoordinateGroups,
    /// Time pieces that must be parsed into a synthesized axis
    pub time_components: Vec<ClassifiedVariable>,
    /// Plain data columns
    pub data: Vec<ClassifiedVariable>,
    /// True iff exactly one relative time coordinate is declared
    pub has_relative_time: bool,
    /// Output name of the time coordinate, if any time information exists
    pub time_variable_name: Option<String>,
    /// Names claimed so far; the schema builder continues from here
    pub names: NameRegistry,
}

impl ClassificationResult {
    /// All emitted column variables in template order
    pub fn column_variables(&self) -> Vec<(&ClassifiedVariable, ColumnRole)> {
        let mut columns: Vec<(&ClassifiedVariable, ColumnRole)> = Vec::new();
        if let Some(time) = &self.relative_time {
            columns.push((time, ColumnRole::Coordinate(AxisKind::Time)));
        }
        for axis in [AxisKind::Latitude, AxisKind::Longitude, AxisKind::Vertical] {
            for variable in self.coordinates.for_axis(axis) {
                columns.push((variable, ColumnRole::Coordinate(axis)));
            }
        }
        for variable in &self.data {
            columns.push((variable, ColumnRole::Data));
        }
        columns.sort_by_key(|(variable, _)| variable.index);
        columns
    }

    /// Roles the feature type needs that no column supplies.
    ///
    /// Profiles may take latitude/longitude from global attributes, so only
    /// the vertical axis is reported for them.
    pub fn missing_roles(&self, feature: FeatureType) -> Vec<MissingRole> {
        let mut missing = Vec::new();
        if !self.has_relative_time && self.time_components.is_empty() {
            missing.push(MissingRole::Time);
        }
        match feature {
            FeatureType::Trajectory | FeatureType::TimeSeries => {
                if self.coordinates.latitude.is_empty() {
                    missing.push(MissingRole::Latitude);
                }
                if self.coordinates.longitude.is_empty() {
                    missing.push(MissingRole::Longitude);
                }
            }
            FeatureType::Profile => {
                if self.coordinates.vertical.is_empty() {
                    missing.push(MissingRole::Vertical);
                }
            }
        }
        missing
    }
}

enum Kind {
    RelativeTime,
    Spatial(AxisKind),
    TimeComponent,
    Data,
}

fn kind_of(descriptor: &VariableDescriptor) -> Result<Option<Kind>, ClassificationError> {
    let kind = match &descriptor.role {
        Role::Ignored => return Ok(None),
        Role::Data => Kind::Data,
        Role::Coordinate { axis, time_kind } => match (axis, time_kind) {
            (AxisKind::Time, None) | (AxisKind::Time, Some(TimeComponentKind::RelativeTime)) => {
                Kind::RelativeTime
            }
            (AxisKind::Time, Some(kind)) => {
                return Err(ClassificationError::AmbiguousTimeRole {
                    name: descriptor.name.clone(),
                    detail: format!(
                        "a {} component cannot also be the time coordinate",
                        kind
                    ),
                })
            }
            (axis, Some(kind)) => {
                return Err(ClassificationError::AmbiguousTimeRole {
                    name: descriptor.name.clone(),
                    detail: format!("{} coordinate declares a {} encoding", axis, kind),
                })
            }
            (axis, None) => Kind::Spatial(*axis),
        },
        Role::TimeComponent {
            kind: TimeComponentKind::RelativeTime,
            ..
        } => Kind::RelativeTime,
        Role::TimeComponent { .. } => Kind::TimeComponent,
    };
    Ok(Some(kind))
}

/// Classify column descriptors.
///
/// Ignored columns are dropped before any naming happens. When time has to
/// be synthesized, the name `time` is reserved before column names are
/// claimed so the synthesized axis keeps its canonical name.
pub fn classify(descriptors: &[VariableDescriptor]) -> Result<ClassificationResult, ClassificationError> {
    let mut kinds = Vec::new();
    for (index, descriptor) in descriptors.iter().enumerate() {
        if let Some(kind) = kind_of(descriptor)? {
            if descriptor.source_key.trim().is_empty() {
                return Err(ClassificationError::EmptySourceKey(descriptor.name.clone()));
            }
            kinds.push((index, descriptor, kind));
        }
    }

    let relative: Vec<&VariableDescriptor> = kinds
        .iter()
        .filter(|(_, _, kind)| matches!(kind, Kind::RelativeTime))
        .map(|(_, descriptor, _)| *descriptor)
        .collect();
    if relative.len() > 1 {
        return Err(ClassificationError::MultipleRelativeTime {
            names: relative.iter().map(|d| d.name.clone()).collect(),
        });
    }
    let has_relative_time = relative.len() == 1;
    let needs_synthesis = !has_relative_time
        && kinds
            .iter()
            .any(|(_, _, kind)| matches!(kind, Kind::TimeComponent));

    let mut names = NameRegistry::new();
    let mut time_variable_name = None;
    if needs_synthesis {
        time_variable_name = Some(names.claim(TIME_VARIABLE_NAME));
    }

    let mut relative_time = None;
    let mut coordinates = CoordinateGroups::default();
    let mut time_components = Vec::new();
    let mut data = Vec::new();

    for (index, descriptor, kind) in kinds {
        let classified = |name: String| ClassifiedVariable {
            name,
            index,
            descriptor: descriptor.clone(),
        };
        match kind {
            Kind::RelativeTime => {
                let variable = classified(names.claim(&descriptor.name));
                time_variable_name = Some(variable.name.clone());
                relative_time = Some(variable);
            }
            Kind::Spatial(axis) => coordinates.push(axis, classified(names.claim(&descriptor.name))),
            // Consumed by time synthesis, never emitted
            Kind::TimeComponent => {
                if has_relative_time {
                    warn!(
                        "Ignoring time component '{}': a relative time coordinate is declared",
                        descriptor.name
                    );
                } else {
                    time_components.push(classified(sanitize_name(&descriptor.name)));
                }
            }
            Kind::Data => data.push(classified(names.claim(&descriptor.name))),
        }
    }

    debug!(
        "Classified {} descriptors: {} coordinates, {} time components, {} data variables",
        descriptors.len(),
        coordinates.latitude.len() + coordinates.longitude.len() + coordinates.vertical.len(),
        time_components.len(),
        data.len()
    );

    Ok(ClassificationResult {
        relative_time,
        coordinates,
        time_components,
        data,
        has_relative_time,
        time_variable_name,
        names,
    })
}
