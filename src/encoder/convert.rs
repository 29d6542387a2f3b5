use log::debug;

use super::error::{ConversionError, EncodingError};
use crate::catalog::{ClassificationResult, ClassifiedVariable, DeclaredType};
use crate::ncfile::{FileFormat, NcType};
use crate::schema::{ColumnValues, ConvertedColumns};
use crate::table::ParsedTable;

/// Convert one column's cells to its declared type
pub(crate) fn convert_column(
    variable: &ClassifiedVariable,
    cells: &[String],
    format: FileFormat,
) -> Result<ColumnValues, ConversionError> {
    let column = variable.descriptor.name.as_str();
    let fail = |row: usize, text: &str, expected: NcType| ConversionError {
        column: column.to_string(),
        row,
        text: text.to_string(),
        expected,
    };

    match variable.descriptor.declared_type {
        DeclaredType::Text => Ok(ColumnValues::Text(cells.to_vec())),
        DeclaredType::Float => cells
            .iter()
            .enumerate()
            .map(|(row, text)| {
                text.trim()
                    .parse::<f64>()
                    .map_err(|_| fail(row, text, NcType::Double))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ColumnValues::Double),
        DeclaredType::Integer if format.supports_int64() => cells
            .iter()
            .enumerate()
            .map(|(row, text)| {
                text.trim()
                    .parse::<i64>()
                    .map_err(|_| fail(row, text, NcType::Int64))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ColumnValues::Int64),
        DeclaredType::Integer => cells
            .iter()
            .enumerate()
            .map(|(row, text)| {
                text.trim()
                    .parse::<i32>()
                    .map_err(|_| fail(row, text, NcType::Int))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ColumnValues::Int),
    }
}

/// Convert every emitted column, keyed by output variable name.
///
/// The first bad cell aborts the whole conversion.
pub(crate) fn convert_columns(
    classification: &ClassificationResult,
    table: &ParsedTable,
    format: FileFormat,
) -> Result<ConvertedColumns, EncodingError> {
    let mut converted = ConvertedColumns::new();
    for (variable, _) in classification.column_variables() {
        let source_key = &variable.descriptor.source_key;
        let cells = table
            .column(source_key)
            .ok_or_else(|| EncodingError::MissingColumn {
                name: variable.name.clone(),
                source_key: source_key.clone(),
            })?;
        let values = convert_column(variable, cells, format)?;
        debug!(
            "Converted column '{}' -> {} ({} rows)",
            source_key,
            variable.name,
            values.len()
        );
        converted.insert(variable.name.clone(), values);
    }
    Ok(converted)
}
