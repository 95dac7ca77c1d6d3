use chrono::DateTime;
use chrono_tz::Tz;

use crate::error::ModelError;

/// A wall-clock time in the zone of the forecast location.
pub type LocalTime = DateTime<Tz>;

/// Parse an IANA zone identifier such as `Europe/Paris`.
pub fn parse_timezone(timezone: &str) -> Result<Tz, ModelError> {
    timezone
        .parse::<Tz>()
        .map_err(|_| ModelError::InvalidTimezone(timezone.to_string()))
}

/// Convert a UNIX timestamp (seconds) into local time for `timezone`,
/// with the DST offset in force at that instant.
pub fn localize(timestamp: i64, timezone: &str) -> Result<LocalTime, ModelError> {
    let tz = parse_timezone(timezone)?;
    localize_in(timestamp, tz)
}

pub(crate) fn localize_in(timestamp: i64, tz: Tz) -> Result<LocalTime, ModelError> {
    DateTime::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(&tz))
        .ok_or(ModelError::InvalidTimestamp(timestamp))
}
