//! # Time Axis Synthesis
//!
//! Resolves the single time coordinate of a dataset. A declared relative time
//! column passes through untouched; otherwise one full date/time column, or a
//! date column optionally paired with a time-of-day column, is parsed row by
//! row into integer seconds since the Unix epoch.
//!
//! Mode detection runs against the classification alone, so configuration
//! mistakes are reported before any cell is parsed.

mod error;
mod format;

#[cfg(test)]
mod tests;

use std::fmt;

use log::{debug, info};

pub use error::TimeAxisError;
pub use format::TimeFormat;

use crate::catalog::{
    ClassificationResult, ClassifiedVariable, Role, TimeComponentKind, TIME_VARIABLE_NAME,
};
use crate::ncfile::{NcType, VarData};
use crate::table::ParsedTable;

/// Units of every synthesized time axis
pub const SYNTHESIZED_TIME_UNITS: &str = "seconds since 1970-01-01T00:00:00";

/// A text time column with its compiled pattern
#[derive(Debug, Clone, PartialEq)]
pub struct TimeColumn {
    /// User-visible name of the component
    pub name: String,
    /// Key of the source column
    pub source_key: String,
    /// Compiled parse pattern
    pub format: TimeFormat,
}

impl TimeColumn {
    fn from_classified(variable: &ClassifiedVariable) -> Result<Self, TimeAxisError> {
        let descriptor = &variable.descriptor;
        let pattern = match &descriptor.role {
            Role::TimeComponent { format, .. } => format.as_str(),
            _ => "",
        };
        if pattern.trim().is_empty() {
            return Err(TimeAxisError::MissingFormat(descriptor.name.clone()));
        }
        let format = TimeFormat::new(pattern).map_err(|reason| TimeAxisError::InvalidFormat {
            column: descriptor.name.clone(),
            reason,
        })?;
        Ok(Self {
            name: descriptor.name.clone(),
            source_key: descriptor.source_key.clone(),
            format,
        })
    }
}

/// How the time coordinate is obtained
#[derive(Debug, Clone, PartialEq)]
pub enum TimeMode {
    /// A numeric column already holds offsets in `units`
    RelativeTime {
        /// Output name of the time variable
        variable_name: String,
        /// Key of the source column
        source_key: String,
        /// CF units string taken from the column's `units` attribute
        units: String,
    },
    /// One column holds complete timestamps
    FullDateTime(TimeColumn),
    /// A date column, optionally combined with a time-of-day column
    DateAndTime {
        /// Calendar date column
        date: TimeColumn,
        /// Time-of-day column; midnight when absent
        time: Option<TimeColumn>,
    },
}

impl TimeMode {
    /// Decide the time mode from a classification.
    ///
    /// Fails on missing, conflicting or incomplete time declarations.
    pub fn detect(classification: &ClassificationResult) -> Result<Self, TimeAxisError> {
        if let Some(relative) = &classification.relative_time {
            let units = relative
                .descriptor
                .attribute("units")
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .ok_or_else(|| TimeAxisError::MissingUnits(relative.descriptor.name.clone()))?;
            return Ok(TimeMode::RelativeTime {
                variable_name: relative.name.clone(),
                source_key: relative.descriptor.source_key.clone(),
                units: units.to_string(),
            });
        }

        let components = &classification.time_components;
        if components.is_empty() {
            return Err(TimeAxisError::NoTimeInformation);
        }
        let too_many = || TimeAxisError::TooManyTimeComponents {
            names: components
                .iter()
                .map(|c| c.descriptor.name.clone())
                .collect(),
        };
        if components.len() > 2 {
            return Err(too_many());
        }

        let of_kind = |wanted: TimeComponentKind| -> Vec<&ClassifiedVariable> {
            components
                .iter()
                .filter(|c| component_kind(c) == Some(wanted))
                .collect()
        };
        let full = of_kind(TimeComponentKind::FullDateTime);
        let dates = of_kind(TimeComponentKind::DateOnly);
        let times = of_kind(TimeComponentKind::TimeOnly);

        if !full.is_empty() {
            if components.len() != 1 {
                return Err(too_many());
            }
            return Ok(TimeMode::FullDateTime(TimeColumn::from_classified(full[0])?));
        }
        if dates.len() > 1 || times.len() > 1 {
            return Err(too_many());
        }
        match (dates.first(), times.first()) {
            (Some(date), time) => Ok(TimeMode::DateAndTime {
                date: TimeColumn::from_classified(date)?,
                time: time.map(|t| TimeColumn::from_classified(t)).transpose()?,
            }),
            (None, Some(time)) => Err(TimeAxisError::MissingDateComponent(
                time.descriptor.name.clone(),
            )),
            (None, None) => Err(TimeAxisError::NoTimeInformation),
        }
    }

    /// Output name of the time variable
    pub fn variable_name(&self) -> &str {
        match self {
            TimeMode::RelativeTime { variable_name, .. } => variable_name,
            _ => TIME_VARIABLE_NAME,
        }
    }

    /// Whether the axis is computed rather than copied from a column
    pub fn is_synthesized(&self) -> bool {
        !matches!(self, TimeMode::RelativeTime { .. })
    }
}

impl fmt::Display for TimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeMode::RelativeTime { source_key, units, .. } => {
                write!(f, "relative time from column '{}' ({})", source_key, units)
            }
            TimeMode::FullDateTime(column) => write!(
                f,
                "full date/time from '{}' ({})",
                column.name,
                column.format.pattern()
            ),
            TimeMode::DateAndTime { date, time: Some(time) } => write!(
                f,
                "date '{}' ({}) combined with time '{}' ({})",
                date.name,
                date.format.pattern(),
                time.name,
                time.format.pattern()
            ),
            TimeMode::DateAndTime { date, time: None } => write!(
                f,
                "date-only '{}' ({}) at midnight",
                date.name,
                date.format.pattern()
            ),
        }
    }
}

fn component_kind(variable: &ClassifiedVariable) -> Option<TimeComponentKind> {
    match &variable.descriptor.role {
        Role::TimeComponent { kind, .. } => Some(*kind),
        _ => None,
    }
}

/// Integer width used for synthesized time values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerWidth {
    /// 32-bit `int`, the only option in classic files
    I32,
    /// 64-bit `int64`
    I64,
}

impl IntegerWidth {
    /// netCDF type holding values of this width
    pub fn nc_type(self) -> NcType {
        match self {
            IntegerWidth::I32 => NcType::Int,
            IntegerWidth::I64 => NcType::Int64,
        }
    }
}

/// Synthesized seconds since the epoch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeValues {
    /// 32-bit values
    Int32(Vec<i32>),
    /// 64-bit values
    Int64(Vec<i64>),
}

impl TimeValues {
    /// Number of values
    pub fn len(&self) -> usize {
        match self {
            TimeValues::Int32(v) => v.len(),
            TimeValues::Int64(v) => v.len(),
        }
    }

    /// Whether there are no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `row`, widened
    pub fn get(&self, row: usize) -> Option<i64> {
        match self {
            TimeValues::Int32(v) => v.get(row).map(|&x| i64::from(x)),
            TimeValues::Int64(v) => v.get(row).copied(),
        }
    }

    /// Smallest and largest value
    pub fn extrema(&self) -> Option<(i64, i64)> {
        (0..self.len())
            .filter_map(|row| self.get(row))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// netCDF type of the values
    pub fn nc_type(&self) -> NcType {
        match self {
            TimeValues::Int32(_) => NcType::Int,
            TimeValues::Int64(_) => NcType::Int64,
        }
    }

    /// Convert into writable variable data
    pub fn to_var_data(&self) -> VarData {
        match self {
            TimeValues::Int32(v) => VarData::Int(v.clone()),
            TimeValues::Int64(v) => VarData::Int64(v.clone()),
        }
    }
}

/// Where the time coordinate's values come from
#[derive(Debug, Clone, PartialEq)]
pub enum TimeSource {
    /// Copied from an input column
    Column {
        /// Key of the source column
        source_key: String,
    },
    /// Computed from date/time text
    Synthesized(TimeValues),
}

/// The resolved time coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    /// Output variable name
    pub variable_name: String,
    /// CF units string
    pub units: String,
    /// Value source
    pub source: TimeSource,
}

impl TimeAxis {
    /// Synthesized values, if this axis was computed
    pub fn synthesized_values(&self) -> Option<&TimeValues> {
        match &self.source {
            TimeSource::Synthesized(values) => Some(values),
            TimeSource::Column { .. } => None,
        }
    }
}

/// Build the time axis for a table.
///
/// Any cell that fails to parse aborts the whole axis; the error carries the
/// column name, the zero-based row and the raw text.
pub fn synthesize(
    mode: &TimeMode,
    table: &ParsedTable,
    width: IntegerWidth,
) -> Result<TimeAxis, TimeAxisError> {
    info!("Time axis: {}", mode);

    let seconds = match mode {
        TimeMode::RelativeTime {
            variable_name,
            source_key,
            units,
        } => {
            if table.column(source_key).is_none() {
                return Err(TimeAxisError::MissingColumn(source_key.clone()));
            }
            return Ok(TimeAxis {
                variable_name: variable_name.clone(),
                units: units.clone(),
                source: TimeSource::Column {
                    source_key: source_key.clone(),
                },
            });
        }
        TimeMode::FullDateTime(column) => {
            let cells = column_cells(table, column)?;
            parse_cells(&column.name, cells, |text| column.format.parse_epoch_seconds(text))?
        }
        TimeMode::DateAndTime { date, time: None } => {
            let cells = column_cells(table, date)?;
            parse_cells(&date.name, cells, |text| date.format.parse_epoch_seconds(text))?
        }
        TimeMode::DateAndTime {
            date,
            time: Some(time),
        } => {
            let dates = column_cells(table, date)?;
            let times = column_cells(table, time)?;
            let combined_pattern = format!("{} {}", date.format.strftime(), time.format.strftime());
            let combined = TimeFormat::new(&combined_pattern).map_err(|reason| {
                TimeAxisError::InvalidFormat {
                    column: format!("{} + {}", date.name, time.name),
                    reason,
                }
            })?;
            let joined: Vec<String> = dates
                .iter()
                .zip(times)
                .map(|(d, t)| format!("{} {}", d.trim(), t.trim()))
                .collect();
            let label = format!("{} + {}", date.name, time.name);
            parse_cells(&label, &joined, |text| combined.parse_epoch_seconds(text))?
        }
    };

    let values = match width {
        IntegerWidth::I64 => TimeValues::Int64(seconds),
        IntegerWidth::I32 => {
            let mut narrow = Vec::with_capacity(seconds.len());
            for (row, value) in seconds.into_iter().enumerate() {
                let v = i32::try_from(value).map_err(|_| TimeAxisError::Overflow { row, value })?;
                narrow.push(v);
            }
            TimeValues::Int32(narrow)
        }
    };
    debug!("Synthesized {} time values as {}", values.len(), values.nc_type());

    Ok(TimeAxis {
        variable_name: mode.variable_name().to_string(),
        units: SYNTHESIZED_TIME_UNITS.to_string(),
        source: TimeSource::Synthesized(values),
    })
}

fn column_cells<'a>(table: &'a ParsedTable, column: &TimeColumn) -> Result<&'a [String], TimeAxisError> {
    table
        .column(&column.source_key)
        .ok_or_else(|| TimeAxisError::MissingColumn(column.source_key.clone()))
}

fn parse_cells<F>(label: &str, cells: &[String], parse: F) -> Result<Vec<i64>, TimeAxisError>
where
    F: Fn(&str) -> Result<i64, chrono::ParseError>,
{
    cells
        .iter()
        .enumerate()
        .map(|(row, text)| {
            parse(text).map_err(|e| TimeAxisError::Parse {
                column: label.to_string(),
                row,
                text: text.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}
