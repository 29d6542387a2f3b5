use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::MatchupError;

/// One timestamped sample of a physical quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    /// Raw value text
    pub value: String,
    /// Unit of the value (may be empty)
    #[serde(default)]
    pub unit: String,
}

impl Observation {
    /// Create an observation
    pub fn new(timestamp: i64, value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            timestamp,
            value: value.into(),
            unit: unit.into(),
        }
    }
}

/// Time-ordered samples of one quantity; a repeated timestamp overwrites
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationSeries {
    observations: BTreeMap<i64, Observation>,
}

impl ObservationSeries {
    /// Create an empty series
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an observation, returning the one it replaced
    pub fn insert(&mut self, observation: Observation) -> Option<Observation> {
        self.observations.insert(observation.timestamp, observation)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the series has no samples
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Sample timestamps in ascending order
    pub fn timestamps(&self) -> impl Iterator<Item = i64> + '_ {
        self.observations.keys().copied()
    }

    /// Samples in ascending time order
    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.values()
    }

    /// Sample at exactly `timestamp`
    pub fn get(&self, timestamp: i64) -> Option<&Observation> {
        self.observations.get(&timestamp)
    }

    /// Latest sample at or before `timestamp`
    pub fn floor(&self, timestamp: i64) -> Option<&Observation> {
        self.observations
            .range(..=timestamp)
            .next_back()
            .map(|(_, obs)| obs)
    }

    /// Earliest sample at or after `timestamp`
    pub fn ceiling(&self, timestamp: i64) -> Option<&Observation> {
        self.observations.range(timestamp..).next().map(|(_, obs)| obs)
    }

    /// Sample closest in time to `timestamp`; equal distances resolve to the
    /// earlier sample
    pub fn nearest(&self, timestamp: i64) -> Option<&Observation> {
        match (self.floor(timestamp), self.ceiling(timestamp)) {
            (Some(floor), Some(ceiling)) => {
                let before = timestamp.abs_diff(floor.timestamp);
                let after = ceiling.timestamp.abs_diff(timestamp);
                if after < before {
                    Some(ceiling)
                } else {
                    Some(floor)
                }
            }
            (floor, ceiling) => floor.or(ceiling),
        }
    }

    /// Unit of the first sample that declares one
    pub fn unit(&self) -> Option<&str> {
        self.observations
            .values()
            .map(|obs| obs.unit.as_str())
            .find(|unit| !unit.is_empty())
    }
}

impl FromIterator<Observation> for ObservationSeries {
    fn from_iter<T: IntoIterator<Item = Observation>>(iter: T) -> Self {
        let mut series = ObservationSeries::new();
        for observation in iter {
            series.insert(observation);
        }
        series
    }
}

/// A long-form record: one value of one variable at one time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongRecord {
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    /// Variable the value belongs to
    pub variable: String,
    /// Raw value text
    pub value: String,
    /// Unit of the value
    #[serde(default)]
    pub unit: String,
}

/// Named observation series
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesSet {
    series: BTreeMap<String, ObservationSeries>,
}

impl SeriesSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Group long-form records into one series per variable
    pub fn from_long_records<I>(records: I) -> Result<Self, MatchupError>
    where
        I: IntoIterator<Item = LongRecord>,
    {
        let mut set = SeriesSet::new();
        for record in records {
            let variable = record.variable.trim();
            if variable.is_empty() {
                return Err(MatchupError::UnnamedRecord(record.timestamp));
            }
            set.push(
                variable,
                Observation::new(record.timestamp, record.value, record.unit),
            );
        }
        Ok(set)
    }

    /// Add or replace a whole series
    pub fn insert_series(&mut self, name: impl Into<String>, series: ObservationSeries) {
        self.series.insert(name.into(), series);
    }

    /// Add one observation to a series, creating it when needed
    pub fn push(&mut self, name: &str, observation: Observation) {
        self.series
            .entry(name.to_string())
            .or_default()
            .insert(observation);
    }

    /// Series by name
    pub fn get(&self, name: &str) -> Option<&ObservationSeries> {
        self.series.get(name)
    }

    /// Series names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Number of series
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
