use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(raw: &str, field: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use lectern_core::enums::{LifecycleState, UserRole};

    use super::{parse_enum, parse_timestamp};

    #[test]
    fn parses_snake_case_enum() {
        let role: UserRole = parse_enum("educator", "role").expect("role should parse");
        assert_eq!(role, UserRole::Educator);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let state: LifecycleState =
            parse_enum("in-progress", "state").expect("state should parse");
        assert_eq!(state, LifecycleState::InProgress);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<UserRole>("principal", "role").expect_err("should fail");
        assert!(err.to_string().contains("invalid role 'principal'"));
    }

    #[test]
    fn timestamps_are_normalized_to_utc() {
        let parsed = parse_timestamp("2026-03-02T15:30:00+05:30", "start").expect("should parse");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap());
    }

    #[test]
    fn malformed_timestamp_names_the_field() {
        let err = parse_timestamp("tomorrow", "due").expect_err("should fail");
        assert!(err.to_string().contains("invalid due 'tomorrow'"));
    }
}
