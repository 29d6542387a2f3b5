use crate::ncfile::{AttrValue, NcHeader};
use crate::schema::{FeatureType, ATTR_CONVENTIONS, ATTR_FEATURE_TYPE, GEOSPATIAL_LAT_START, GEOSPATIAL_LON_START};

use super::{ValidationCheck, ValidationReport};

/// Step 2: global attributes. Returns the declared feature type when it
/// parses.
pub(crate) fn check_global_metadata(header: &NcHeader, report: &mut ValidationReport) -> Option<FeatureType> {
    match header.global_attribute(ATTR_CONVENTIONS).map(AttrValue::as_text) {
        Some(Some(conventions)) if names_cf(conventions) => {
            report.add_check(ValidationCheck::ok(format!("Conventions ({})", conventions)));
        }
        Some(Some(conventions)) => report.add_check(ValidationCheck::failed(
            "Conventions",
            format!("'{}' does not name a CF version", conventions),
        )),
        Some(None) => report.add_check(ValidationCheck::failed(
            "Conventions",
            "attribute is not text",
        )),
        None => report.add_check(ValidationCheck::failed("Conventions", "attribute missing")),
    }

    let feature_type = match header.global_attribute(ATTR_FEATURE_TYPE).and_then(AttrValue::as_text) {
        Some(text) => match text.parse::<FeatureType>() {
            Ok(feature_type) => {
                report.add_check(ValidationCheck::ok(format!("featureType ({})", feature_type)));
                Some(feature_type)
            }
            Err(_) => {
                report.add_check(ValidationCheck::failed(
                    "featureType",
                    format!("unsupported feature type '{}'", text),
                ));
                None
            }
        },
        None => {
            report.add_check(ValidationCheck::failed("featureType", "attribute missing"));
            None
        }
    };

    // ACDD position hints are optional
    let has_bounds = [GEOSPATIAL_LAT_START, GEOSPATIAL_LON_START]
        .iter()
        .all(|name| header.global_attribute(name).and_then(AttrValue::as_f64).is_some());
    if has_bounds {
        report.add_check(ValidationCheck::ok("Geospatial start position"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Geospatial start position",
            "geospatial_lat_start/geospatial_lon_start not set",
        ));
    }

    feature_type
}

/// Whether a Conventions value lists a CF version, e.g. `CF-1.6, ACDD-1.3`
pub(crate) fn names_cf(conventions: &str) -> bool {
    conventions
        .split(|c: char| c == ',' || c.is_whitespace())
        .any(|token| token.starts_with("CF-"))
}
