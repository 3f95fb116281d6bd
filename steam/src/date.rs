use derive_more::{Deref, From};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Timestamp layout used in `history.csv`, always UTC
const FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deref, From)]
pub struct DateTime(pub OffsetDateTime);

impl DateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn parse(s: &str) -> Result<Self, time::error::Parse> {
        PrimitiveDateTime::parse(s.trim(), FORMAT).map(|dt| Self(dt.assume_utc()))
    }

    pub fn format(&self) -> Result<String, time::error::Format> {
        self.0.to_offset(time::UtcOffset::UTC).format(FORMAT)
    }

    /// Seconds since the Unix epoch, with sub-second precision
    pub fn unix_seconds(&self) -> f64 {
        (self.0 - OffsetDateTime::UNIX_EPOCH).as_seconds_f64()
    }
}

impl Serialize for DateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.format().map_err(serde::ser::Error::custom)?)
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        DateTime::parse(&String::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_format_is_utc_without_offset() {
        let dt = DateTime(datetime!(2024-03-09 17:05:01 +05:30));
        assert_eq!(dt.format().unwrap(), "2024-03-09 11:35:01");
    }

    #[test]
    fn test_parse_assumes_utc() {
        let dt = DateTime::parse("2024-03-09 11:35:01").unwrap();
        assert_eq!(*dt, datetime!(2024-03-09 11:35:01 UTC));
        assert!(DateTime::parse("09/03/2024").is_err());
    }

    #[test]
    fn test_unix_seconds() {
        let dt = DateTime(datetime!(1970-01-01 00:01:00.5 UTC));
        assert_eq!(dt.unix_seconds(), 60.5);
    }
}
