use chrono::NaiveDateTime;

/// Format of an HTML `datetime-local` input.
pub const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

const ACCEPTED_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

pub fn to_input(value: &NaiveDateTime) -> String {
    value.format(INPUT_FORMAT).to_string()
}

/// Converts a stored date-time string into the value a `datetime-local`
/// input expects. Strings that do not parse are returned untouched.
pub fn raw_to_input(raw: &str) -> String {
    match parse_datetime(raw) {
        Some(value) => to_input(&value),
        None => raw.trim().to_string(),
    }
}

pub fn display(value: Option<&NaiveDateTime>) -> String {
    match value {
        Some(value) => value.format(DISPLAY_FORMAT).to_string(),
        None => "n/a".to_string(),
    }
}

pub fn display_raw(raw: &str) -> String {
    match parse_datetime(raw) {
        Some(value) => display(Some(&value)),
        None => raw.to_string(),
    }
}
