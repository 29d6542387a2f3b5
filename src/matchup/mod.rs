//! # Temporal Matchup
//!
//! Aligns independently timestamped observation series (archival tag data,
//! where every quantity including position arrives as its own stream) onto a
//! single timeline so the result can be encoded like an ordinary table.
//!
//! ## Policies
//!
//! - [`MatchupPolicy::OneLocationOneObservation`]: the latitude series defines
//!   the timeline. Every other series contributes its nearest sample; when the
//!   preceding and following samples are equally far away the preceding one
//!   wins.
//! - [`MatchupPolicy::OneLocationManyObservations`]: an observation series
//!   defines the timeline. Location series only contribute their latest fix at
//!   or before each timestamp, never a later one, and a `freshness` column
//!   records how old that fix is. A timestamp with no earlier fix is an error.
//!
//! ```rust
//! use dsgconvert::matchup::{align, MatchupRequest, Observation, SeriesSet};
//!
//! let mut set = SeriesSet::new();
//! for t in [100, 200] {
//!     set.push("lat", Observation::new(t, "10.0", "degrees_north"));
//!     set.push("lon", Observation::new(t, "-80.0", "degrees_east"));
//! }
//! set.push("temp", Observation::new(90, "5.0", "degC"));
//! set.push("temp", Observation::new(150, "6.0", "degC"));
//!
//! let request = MatchupRequest::one_location_one_observation("lat", "lon", vec!["temp".into()]);
//! let table = align(&set, &request)?;
//! assert_eq!(table.column("temp").unwrap().values, vec!["5.0", "6.0"]);
//! # Ok::<(), dsgconvert::matchup::MatchupError>(())
//! ```

mod error;
mod series;


use std::collections::HashSet;

use log::{debug, info};
use serde::{Deserialize, Serialize};

pub use error::MatchupError;
pub use series::{LongRecord, Observation, ObservationSeries, SeriesSet};

use crate::catalog::{AttributeSpec, AxisKind, DeclaredType, Role, VariableDescriptor};
use crate::table::{ParsedTable, TableError};
use crate::time::SYNTHESIZED_TIME_UNITS;

/// Column name of the aligned timestamps
pub const TIME_COLUMN: &str = "time";

/// Column name of the location age under [`MatchupPolicy::OneLocationManyObservations`]
pub const FRESHNESS_COLUMN: &str = "freshness";

/// How the reference timeline is chosen and location fixes are matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchupPolicy {
    /// Timeline from the latitude series; nearest sample for everything else
    OneLocationOneObservation,
    /// Timeline from an observation series; latest earlier fix for locations
    OneLocationManyObservations {
        /// Series whose timestamps define the timeline
        reference: String,
    },
}

/// Names of the series holding position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSeries {
    /// Latitude series
    pub latitude: String,
    /// Longitude series
    pub longitude: String,
    /// Optional depth/altitude series
    #[serde(default)]
    pub vertical: Option<String>,
    /// `positive` direction of the vertical series
    #[serde(default = "default_positive")]
    pub vertical_positive: String,
}

fn default_positive() -> String {
    "down".to_string()
}

/// What to align and how
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchupRequest {
    /// Matching policy
    pub policy: MatchupPolicy,
    /// Position series
    pub location: LocationSeries,
    /// Observation series to carry along, in output order
    #[serde(default)]
    pub variables: Vec<String>,
}

impl MatchupRequest {
    /// Request under [`MatchupPolicy::OneLocationOneObservation`]
    pub fn one_location_one_observation(
        latitude: impl Into<String>,
        longitude: impl Into<String>,
        variables: Vec<String>,
    ) -> Self {
        Self {
            policy: MatchupPolicy::OneLocationOneObservation,
            location: LocationSeries {
                latitude: latitude.into(),
                longitude: longitude.into(),
                vertical: None,
                vertical_positive: default_positive(),
            },
            variables,
        }
    }

    /// Request under [`MatchupPolicy::OneLocationManyObservations`]
    pub fn one_location_many_observations(
        reference: impl Into<String>,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
        variables: Vec<String>,
    ) -> Self {
        Self {
            policy: MatchupPolicy::OneLocationManyObservations {
                reference: reference.into(),
            },
            ..Self::one_location_one_observation(latitude, longitude, variables)
        }
    }

    /// Attach a vertical series (builder style)
    pub fn with_vertical(mut self, name: impl Into<String>, positive: impl Into<String>) -> Self {
        self.location.vertical = Some(name.into());
        self.location.vertical_positive = positive.into();
        self
    }

    /// All requested series with their role, locations first
    fn requested(&self) -> Vec<(&str, AlignedRole)> {
        let mut requested = vec![
            (self.location.latitude.as_str(), AlignedRole::Latitude),
            (self.location.longitude.as_str(), AlignedRole::Longitude),
        ];
        if let Some(vertical) = &self.location.vertical {
            requested.push((vertical.as_str(), AlignedRole::Vertical));
        }
        requested.extend(self.variables.iter().map(|v| (v.as_str(), AlignedRole::Data)));
        requested
    }
}

/// What an aligned column represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignedRole {
    /// Latitude fix
    Latitude,
    /// Longitude fix
    Longitude,
    /// Depth or altitude fix
    Vertical,
    /// Observed quantity
    Data,
}

impl AlignedRole {
    fn is_location(self) -> bool {
        !matches!(self, AlignedRole::Data)
    }
}

/// One aligned series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedColumn {
    /// Series name
    pub name: String,
    /// Unit of the series (may be empty)
    pub unit: String,
    /// What the column represents
    pub role: AlignedRole,
    /// One value per reference timestamp
    pub values: Vec<String>,
}

/// Series aligned onto one timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedTable {
    /// Reference timestamps in ascending order
    pub timestamps: Vec<i64>,
    /// Aligned columns, locations first
    pub columns: Vec<AlignedColumn>,
    /// Seconds between each timestamp and the latitude fix used
    pub freshness: Option<Vec<i64>>,
    vertical_positive: String,
}

impl AlignedTable {
    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.timestamps.len()
    }

    /// Column by series name
    pub fn column(&self, name: &str) -> Option<&AlignedColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Render as a string table: `time`, every aligned column, then
    /// `freshness` when present.
    ///
    /// Fails when a series is itself named `time` or `freshness`.
    pub fn to_parsed_table(&self) -> Result<ParsedTable, TableError> {
        let mut columns: Vec<(String, Vec<String>)> = Vec::with_capacity(self.columns.len() + 2);
        columns.push((
            TIME_COLUMN.to_string(),
            self.timestamps.iter().map(|t| t.to_string()).collect(),
        ));
        for column in &self.columns {
            columns.push((column.name.clone(), column.values.clone()));
        }
        if let Some(freshness) = &self.freshness {
            columns.push((
                FRESHNESS_COLUMN.to_string(),
                freshness.iter().map(|f| f.to_string()).collect(),
            ));
        }
        ParsedTable::from_columns(columns)
    }

    /// Column declarations matching [`AlignedTable::to_parsed_table`], with time
    /// as a relative coordinate in epoch seconds
    pub fn descriptors(&self) -> Vec<VariableDescriptor> {
        let mut descriptors = vec![VariableDescriptor::new(
            TIME_COLUMN,
            TIME_COLUMN,
            DeclaredType::Integer,
            Role::coordinate(AxisKind::Time),
        )
        .with_attribute(AttributeSpec::text("units", SYNTHESIZED_TIME_UNITS))];

        for column in &self.columns {
            let role = match column.role {
                AlignedRole::Latitude => Role::coordinate(AxisKind::Latitude),
                AlignedRole::Longitude => Role::coordinate(AxisKind::Longitude),
                AlignedRole::Vertical => Role::coordinate(AxisKind::Vertical),
                AlignedRole::Data => Role::Data,
            };
            let numeric = column
                .values
                .iter()
                .all(|v| v.trim().parse::<f64>().is_ok());
            let declared_type = if numeric || column.role.is_location() {
                DeclaredType::Float
            } else {
                DeclaredType::Text
            };
            let mut descriptor =
                VariableDescriptor::new(column.name.as_str(), column.name.as_str(), declared_type, role);
            if !column.unit.is_empty() {
                descriptor = descriptor.with_attribute(AttributeSpec::text("units", column.unit.clone()));
            }
            if column.role == AlignedRole::Vertical {
                descriptor = descriptor
                    .with_attribute(AttributeSpec::text("positive", self.vertical_positive.clone()));
            }
            descriptors.push(descriptor);
        }

        if self.freshness.is_some() {
            descriptors.push(
                VariableDescriptor::new(
                    FRESHNESS_COLUMN,
                    FRESHNESS_COLUMN,
                    DeclaredType::Integer,
                    Role::Data,
                )
                .with_attribute(AttributeSpec::text("units", "seconds"))
                .with_attribute(AttributeSpec::text(
                    "long_name",
                    "age of the location fix",
                )),
            );
        }
        descriptors
    }
}

fn lookup<'a>(set: &'a SeriesSet, name: &str) -> Result<&'a ObservationSeries, MatchupError> {
    set.get(name)
        .ok_or_else(|| MatchupError::UnknownSeries(name.to_string()))
}

/// Align the requested series onto one timeline.
///
/// Every requested series must exist, the reference series must not be
/// empty, and every row must find a match in every series.
pub fn align(set: &SeriesSet, request: &MatchupRequest) -> Result<AlignedTable, MatchupError> {
    let requested = request.requested();
    let mut seen = HashSet::new();
    for (name, _) in &requested {
        if !seen.insert(*name) {
            return Err(MatchupError::DuplicateRequest(name.to_string()));
        }
        lookup(set, name)?;
    }

    let (reference_name, floor_locations) = match &request.policy {
        MatchupPolicy::OneLocationOneObservation => (request.location.latitude.as_str(), false),
        MatchupPolicy::OneLocationManyObservations { reference } => (reference.as_str(), true),
    };
    let reference = lookup(set, reference_name)?;
    if reference.is_empty() {
        return Err(MatchupError::EmptyReference(reference_name.to_string()));
    }
    let timestamps: Vec<i64> = reference.timestamps().collect();

    let mut columns = Vec::with_capacity(requested.len());
    let mut freshness = floor_locations.then(|| Vec::with_capacity(timestamps.len()));

    for (name, role) in requested {
        let series = lookup(set, name)?;
        let mut values = Vec::with_capacity(timestamps.len());
        for &timestamp in &timestamps {
            let matched = if floor_locations && role.is_location() {
                series.floor(timestamp)
            } else {
                series.nearest(timestamp)
            };
            let observation = matched.ok_or_else(|| MatchupError::NoTemporalMatch {
                series: name.to_string(),
                timestamp,
            })?;
            if role == AlignedRole::Latitude {
                if let Some(freshness) = freshness.as_mut() {
                    freshness.push(timestamp - observation.timestamp);
                }
            }
            values.push(observation.value.clone());
        }
        debug!("Aligned series '{}' ({} samples)", name, series.len());
        columns.push(AlignedColumn {
            name: name.to_string(),
            unit: series.unit().unwrap_or("").to_string(),
            role,
            values,
        });
    }

    info!(
        "Aligned {} series onto {} timestamps from '{}'",
        columns.len(),
        timestamps.len(),
        reference_name
    );

    Ok(AlignedTable {
        timestamps,
        columns,
        freshness,
        vertical_positive: request.location.vertical_positive.clone(),
    })
}
