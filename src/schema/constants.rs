/// CF conventions version written to every file
pub const CF_CONVENTIONS: &str = "CF-1.6";

/// Global attribute naming the conventions followed
pub const ATTR_CONVENTIONS: &str = "Conventions";

/// Global attribute naming the DSG feature type
pub const ATTR_FEATURE_TYPE: &str = "featureType";

/// Variable attribute marking the feature identifier
pub const ATTR_CF_ROLE: &str = "cf_role";

/// Variable attribute listing auxiliary coordinates
pub const ATTR_COORDINATES: &str = "coordinates";

/// Variable attribute naming the coordinate axis
pub const ATTR_AXIS: &str = "axis";

/// Vertical coordinate direction
pub const ATTR_POSITIVE: &str = "positive";

/// CF standard name
pub const ATTR_STANDARD_NAME: &str = "standard_name";

/// Human-readable name
pub const ATTR_LONG_NAME: &str = "long_name";

/// Units string
pub const ATTR_UNITS: &str = "units";

/// Smallest valid value
pub const ATTR_VALID_MIN: &str = "valid_min";

/// Largest valid value
pub const ATTR_VALID_MAX: &str = "valid_max";

/// Provenance: the input column a variable was read from
pub const ATTR_COLUMN_ID: &str = "column_id";

/// Global attribute read for the Profile latitude fallback
pub const GEOSPATIAL_LAT_START: &str = "geospatial_lat_start";

/// Global attribute read for the Profile longitude fallback
pub const GEOSPATIAL_LON_START: &str = "geospatial_lon_start";

/// Name of the fixed-length dimension of the identifier variable
pub const ID_STRLEN_DIMENSION: &str = "id_strlen";

/// Sample dimension name for profiles without a vertical column
pub const DEFAULT_SAMPLE_DIMENSION: &str = "obs";

/// Identifier written when none is supplied
pub const DEFAULT_FEATURE_ID: &str = "feature1";
