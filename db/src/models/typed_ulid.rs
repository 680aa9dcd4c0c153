use std::{fmt, str::FromStr, time::SystemTime};

use bson::{Binary, Bson, spec::BinarySubtype};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ulid::Ulid;

/// A ULID stored as 16 bytes of BSON binary. Byte order matches ULID order,
/// so sorting on `_id` sorts by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DbUlid(Ulid);

impl DbUlid {
    pub fn new() -> Self {
        DbUlid(Ulid::new())
    }

    /// A fresh ULID whose timestamp part is `at`.
    pub fn at(at: DateTime<Utc>) -> Self {
        DbUlid(Ulid::from_datetime(SystemTime::from(at)))
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        self.0.datetime().into()
    }
}

impl Default for DbUlid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DbUlid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DbUlid {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s).map(DbUlid)
    }
}

impl From<DbUlid> for Bson {
    fn from(d: DbUlid) -> Self {
        Bson::Binary(d.to_binary())
    }
}

impl DbUlid {
    fn to_binary(self) -> Binary {
        Binary {
            subtype: BinarySubtype::Generic,
            bytes: self.0.to_bytes().to_vec(),
        }
    }
}

impl Serialize for DbUlid {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_binary().serialize(s)
    }
}

impl<'de> Deserialize<'de> for DbUlid {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let bin = Binary::deserialize(d)?;
        let bytes: [u8; 16] = bin
            .bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("DbUlid: expected exactly 16 bytes"))?;
        Ok(DbUlid(Ulid::from_bytes(bytes)))
    }
}

#[cfg(test)]
mod test {
    use chrono::TimeDelta;

    use super::*;

    #[test]
    fn parses_its_own_display() {
        let id = DbUlid::new();
        assert_eq!(id.to_string().parse::<DbUlid>().unwrap(), id);
        assert!("not-a-ulid".parse::<DbUlid>().is_err());
    }

    #[test]
    fn orders_by_timestamp() {
        let now = Utc::now();
        let older = DbUlid::at(now - TimeDelta::hours(1));
        let newer = DbUlid::at(now);
        assert!(older < newer);
        assert!(older.to_binary().bytes < newer.to_binary().bytes);
    }

    #[test]
    fn datetime_keeps_millisecond_precision() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(DbUlid::at(at).datetime(), at);
    }
}
