use crate::ncfile::{AttrValue, NcType, VarData};

/// Typed contents of one column after conversion
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    /// 32-bit integers (classic files)
    Int(Vec<i32>),
    /// 64-bit integers (CDF-5 files)
    Int64(Vec<i64>),
    /// Doubles
    Double(Vec<f64>),
    /// Text cells
    Text(Vec<String>),
}

/// Smallest and largest value of a numeric column, in its own type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extrema {
    /// 32-bit integer range
    Int(i32, i32),
    /// 64-bit integer range
    Int64(i64, i64),
    /// Floating-point range
    Double(f64, f64),
}

impl Extrema {
    /// `valid_min` attribute value
    pub fn min_value(&self) -> AttrValue {
        match *self {
            Extrema::Int(lo, _) => AttrValue::Int(vec![lo]),
            Extrema::Int64(lo, _) => AttrValue::Int64(vec![lo]),
            Extrema::Double(lo, _) => AttrValue::Double(vec![lo]),
        }
    }

    /// `valid_max` attribute value
    pub fn max_value(&self) -> AttrValue {
        match *self {
            Extrema::Int(_, hi) => AttrValue::Int(vec![hi]),
            Extrema::Int64(_, hi) => AttrValue::Int64(vec![hi]),
            Extrema::Double(_, hi) => AttrValue::Double(vec![hi]),
        }
    }

    /// Range widened to f64
    pub fn as_f64(&self) -> (f64, f64) {
        match *self {
            Extrema::Int(lo, hi) => (f64::from(lo), f64::from(hi)),
            Extrema::Int64(lo, hi) => (lo as f64, hi as f64),
            Extrema::Double(lo, hi) => (lo, hi),
        }
    }
}

fn int_range<T: Copy + Ord>(values: &[T]) -> Option<(T, T)> {
    let lo = values.iter().min()?;
    let hi = values.iter().max()?;
    Some((*lo, *hi))
}

impl ColumnValues {
    /// netCDF type the column is stored as
    pub fn nc_type(&self) -> NcType {
        match self {
            ColumnValues::Int(_) => NcType::Int,
            ColumnValues::Int64(_) => NcType::Int64,
            ColumnValues::Double(_) => NcType::Double,
            ColumnValues::Text(_) => NcType::Char,
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Int(v) => v.len(),
            ColumnValues::Int64(v) => v.len(),
            ColumnValues::Double(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
        }
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the column holds numbers
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ColumnValues::Text(_))
    }

    /// Range of a numeric column; NaN values are skipped
    pub fn extrema(&self) -> Option<Extrema> {
        match self {
            ColumnValues::Int(v) => int_range(v).map(|(lo, hi)| Extrema::Int(lo, hi)),
            ColumnValues::Int64(v) => int_range(v).map(|(lo, hi)| Extrema::Int64(lo, hi)),
            ColumnValues::Double(v) => v
                .iter()
                .copied()
                .filter(|x| !x.is_nan())
                .fold(None, |acc: Option<(f64, f64)>, x| match acc {
                    None => Some((x, x)),
                    Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
                })
                .map(|(lo, hi)| Extrema::Double(lo, hi)),
            ColumnValues::Text(_) => None,
        }
    }

    /// Fixed string width of a text column: the longest value in bytes, at least 1
    pub fn text_width(&self) -> Option<usize> {
        match self {
            ColumnValues::Text(v) => Some(v.iter().map(String::len).max().unwrap_or(0).max(1)),
            _ => None,
        }
    }

    /// Row-major data ready for writing; text is NUL-padded to `text_width`
    pub fn to_var_data(&self) -> VarData {
        match self {
            ColumnValues::Int(v) => VarData::Int(v.clone()),
            ColumnValues::Int64(v) => VarData::Int64(v.clone()),
            ColumnValues::Double(v) => VarData::Double(v.clone()),
            ColumnValues::Text(v) => {
                let width = self.text_width().unwrap_or(1);
                VarData::Char(pad_strings(v, width))
            }
        }
    }
}

/// Pack strings into a fixed-width, NUL-padded character array
fn pad_strings(values: &[String], width: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(values.len() * width);
    for value in values {
        let raw = value.as_bytes();
        let take = raw.len().min(width);
        bytes.extend_from_slice(&raw[..take]);
        bytes.resize(bytes.len() + (width - take), 0);
    }
    bytes
}
