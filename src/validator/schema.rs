use crate::ncfile::{AttrValue, NcHeader, NcVariable};
use crate::schema::{FeatureType, ATTR_AXIS, ATTR_CF_ROLE, ATTR_COORDINATES};

use super::{ValidationCheck, ValidationReport};

/// Step 3: identifier variable, coordinate axes and `coordinates` references
pub(crate) fn check_feature_layout(
    header: &NcHeader,
    feature_type: Option<FeatureType>,
    report: &mut ValidationReport,
) {
    check_identifier(header, feature_type, report);
    check_axes(header, feature_type, report);
    check_coordinate_references(header, report);
}

fn check_identifier(header: &NcHeader, feature_type: Option<FeatureType>, report: &mut ValidationReport) {
    let roles: Vec<(&NcVariable, &str)> = header
        .variables
        .iter()
        .filter_map(|v| v.attribute(ATTR_CF_ROLE).and_then(AttrValue::as_text).map(|r| (v, r)))
        .collect();

    match roles.as_slice() {
        [] => report.add_check(ValidationCheck::failed(
            "cf_role variable",
            "no variable carries a cf_role attribute",
        )),
        [(variable, role)] => match feature_type {
            Some(feature) if *role != feature.cf_role() => report.add_check(ValidationCheck::failed(
                "cf_role variable",
                format!(
                    "'{}' has cf_role '{}', expected '{}' for {}",
                    variable.name,
                    role,
                    feature.cf_role(),
                    feature
                ),
            )),
            _ => report.add_check(ValidationCheck::ok(format!("cf_role variable ({})", variable.name))),
        },
        many => report.add_check(ValidationCheck::failed(
            "cf_role variable",
            format!(
                "{} variables carry cf_role; a single-feature file needs exactly one",
                many.len()
            ),
        )),
    }
}

fn axis_holders<'a>(header: &'a NcHeader, code: &str) -> Vec<&'a str> {
    header
        .variables
        .iter()
        .filter(|v| v.attribute(ATTR_AXIS).and_then(AttrValue::as_text) == Some(code))
        .map(|v| v.name.as_str())
        .collect()
}

fn check_axes(header: &NcHeader, feature_type: Option<FeatureType>, report: &mut ValidationReport) {
    let is_profile = feature_type == Some(FeatureType::Profile);
    for (code, label, required) in [
        ("T", "Time axis", true),
        ("Y", "Latitude axis", !is_profile),
        ("X", "Longitude axis", !is_profile),
        ("Z", "Vertical axis", is_profile),
    ] {
        let holders = axis_holders(header, code);
        let check = match holders.as_slice() {
            [name] => ValidationCheck::ok(format!("{} ({})", label, name)),
            [] if required => ValidationCheck::failed(label, format!("no variable has axis = \"{}\"", code)),
            // A profile may carry its position only in the geospatial globals
            [] if is_profile && code != "Z" => ValidationCheck::warning(
                label,
                format!("no variable has axis = \"{}\"", code),
            ),
            [] => continue,
            names => ValidationCheck::warning(
                label,
                format!("several variables have axis = \"{}\": {}", code, names.join(", ")),
            ),
        };
        report.add_check(check);
    }
}

fn check_coordinate_references(header: &NcHeader, report: &mut ValidationReport) {
    let mut dangling = Vec::new();
    let mut referencing = 0usize;
    for variable in &header.variables {
        let Some(coordinates) = variable.attribute(ATTR_COORDINATES).and_then(AttrValue::as_text) else {
            continue;
        };
        referencing += 1;
        for name in coordinates.split_whitespace() {
            if header.variable(name).is_none() {
                dangling.push(format!("{} -> {}", variable.name, name));
            }
        }
    }

    if referencing == 0 {
        report.add_check(ValidationCheck::warning(
            "coordinates references",
            "no variable declares a coordinates attribute",
        ));
    } else {
        report.add_check(ValidationCheck::require(
            "coordinates references",
            dangling.is_empty(),
            format!("unknown variables referenced: {}", dangling.join(", ")),
        ));
    }
}
