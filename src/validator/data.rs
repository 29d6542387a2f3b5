use crate::ncfile::{AttrValue, NcReader};
use crate::schema::{ATTR_VALID_MAX, ATTR_VALID_MIN};

use super::{ValidationCheck, ValidationError, ValidationReport};

/// Step 4: stored values agree with their declared valid range
pub(crate) fn check_data_sanity(reader: &NcReader, report: &mut ValidationReport) -> Result<(), ValidationError> {
    let header = reader.header();
    let mut checked = 0usize;
    let mut problems = Vec::new();

    for variable in &header.variables {
        let valid_min = variable.attribute(ATTR_VALID_MIN).and_then(AttrValue::as_f64);
        let valid_max = variable.attribute(ATTR_VALID_MAX).and_then(AttrValue::as_f64);
        if valid_min.is_none() && valid_max.is_none() {
            continue;
        }
        let Some(values) = reader.read_variable(&variable.name)?.to_f64_vec() else {
            problems.push(format!("{}: valid range on a character variable", variable.name));
            continue;
        };
        checked += 1;

        let (lo, hi) = values
            .iter()
            .filter(|v| !v.is_nan())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if let Some(min) = valid_min {
            if lo < min {
                problems.push(format!("{}: value {} below valid_min {}", variable.name, lo, min));
            }
        }
        if let Some(max) = valid_max {
            if hi > max {
                problems.push(format!("{}: value {} above valid_max {}", variable.name, hi, max));
            }
        }
        if let (Some(min), Some(max)) = (valid_min, valid_max) {
            if min > max {
                problems.push(format!("{}: valid_min {} exceeds valid_max {}", variable.name, min, max));
            }
        }
    }

    if checked == 0 && problems.is_empty() {
        report.add_check(ValidationCheck::warning(
            "Valid ranges",
            "no variable declares valid_min/valid_max",
        ));
    } else {
        report.add_check(ValidationCheck::require(
            format!("Valid ranges ({} variables)", checked),
            problems.is_empty(),
            problems.join("; "),
        ));
    }

    Ok(())
}
