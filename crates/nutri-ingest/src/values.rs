//! Cell parsing for food-composition tables.
//!
//! Brazilian tables print decimals with a comma and use a handful of markers
//! for values that were not measured or are below detection. All markers
//! parse to `0.0`.

use nutri_model::RawValue;

/// Markers meaning "no value" (compared case-insensitively).
pub const MISSING_MARKERS: &[&str] = &[
    "-", "--", "n.d.", "nd", "n.a.", "na", "*", "tr", "traços", "tracos",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unparseable numeric value '{0}'")]
pub struct InvalidNumber(pub String);

/// True when the text is empty or one of [`MISSING_MARKERS`].
pub fn is_missing_marker(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
}

/// Parses a nutrient cell.
///
/// # Errors
///
/// Returns [`InvalidNumber`] for text that is neither a number nor a missing
/// marker, and for non-finite numbers.
///
/// # Examples
///
/// ```
/// use nutri_ingest::parse_numeric;
/// use nutri_model::RawValue;
///
/// assert_eq!(parse_numeric(&RawValue::text("3,51")).unwrap(), 3.51);
/// assert_eq!(parse_numeric(&RawValue::text("n.d.")).unwrap(), 0.0);
/// assert_eq!(parse_numeric(&RawValue::Null).unwrap(), 0.0);
/// assert!(parse_numeric(&RawValue::text("Arroz")).is_err());
/// ```
pub fn parse_numeric(value: &RawValue) -> Result<f64, InvalidNumber> {
    let parsed = match value {
        RawValue::Null => return Ok(0.0),
        RawValue::Number(number) => *number,
        RawValue::Text(text) => {
            if is_missing_marker(text) {
                return Ok(0.0);
            }
            let cleaned = text.trim().replace(',', ".");
            cleaned
                .parse::<f64>()
                .map_err(|_| InvalidNumber(text.trim().to_string()))?
        }
    };
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(InvalidNumber(parsed.to_string()))
    }
}

/// Text form of an identity cell (code, name, category).
///
/// Integral numbers are printed without a fractional part so that numeric
/// food codes read back as written.
pub fn parse_text(value: &RawValue) -> String {
    match value {
        RawValue::Null => String::new(),
        RawValue::Text(text) => text.trim().to_string(),
        RawValue::Number(number) => format_number(*number),
    }
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Splits a tag cell on commas and semicolons.
pub fn parse_tags(value: &RawValue) -> Vec<String> {
    parse_text(value)
        .split([',', ';'])
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_lowercase)
        .collect()
}
