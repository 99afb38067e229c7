//! Nullable timestamp column adapter.
//!
//! `NullTime` is a timestamp that may be NULL. It plugs into sqlx as a
//! `Decode`/`Encode` type, so it can be read with `row.try_get::<NullTime, _>`
//! and bound with `query.bind(..)` on every sqlx backend, and it converts to
//! and from the driver-agnostic [`Value`] for everything else.
//!
//! Scanning is lossy: a driver NULL and a value of the wrong type
//! both come back as an absent `NullTime`. Numbers count as the wrong type
//! even where the driver could read them as epoch offsets, as SQLite can.
//! Scanning never fails, so a column
//! that unexpectedly holds an integer or a string reads as NULL rather than
//! raising an error. Callers that need to tell the two apart must inspect the
//! raw value themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::{Database, Decode, Encode, Type, ValueRef};
use std::hash::{Hash, Hasher};

use super::traits::Value;

/// A timestamp that may be NULL.
///
/// When `valid` is false, `time` carries no meaning whatever its contents;
/// equality, hashing, [`NullTime::get`] and the bind path all ignore it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTime {
    pub time: DateTime<Utc>,
    /// True if `time` is not NULL
    pub valid: bool,
}

impl NullTime {
    /// A present timestamp.
    pub fn new(time: DateTime<Utc>) -> Self {
        Self { time, valid: true }
    }

    /// An absent timestamp; `time` is left at the Unix epoch.
    pub fn null() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The timestamp, or `None` when absent.
    pub fn get(&self) -> Option<DateTime<Utc>> {
        self.valid.then_some(self.time)
    }

    /// Interpret a driver-provided column value.
    ///
    /// Only `Value::DateTimeTz` counts as present. NULL, naive datetimes,
    /// integers, text and everything else scan as absent.
    pub fn scan(value: &Value) -> Self {
        match value.as_datetime_tz() {
            Some(time) => Self::new(time),
            None => Self::null(),
        }
    }

    /// The value to bind for this timestamp: NULL when absent, the
    /// timestamp unchanged otherwise.
    pub fn value(&self) -> Value {
        match self.get() {
            Some(time) => Value::DateTimeTz(time),
            None => Value::Null,
        }
    }
}

impl PartialEq for NullTime {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Eq for NullTime {}

impl Hash for NullTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.get().hash(state);
    }
}

impl From<Option<DateTime<Utc>>> for NullTime {
    fn from(time: Option<DateTime<Utc>>) -> Self {
        time.map(Self::new).unwrap_or_default()
    }
}

impl From<DateTime<Utc>> for NullTime {
    fn from(time: DateTime<Utc>) -> Self {
        Self::new(time)
    }
}

impl From<NullTime> for Option<DateTime<Utc>> {
    fn from(nt: NullTime) -> Self {
        nt.get()
    }
}

impl From<NullTime> for Value {
    fn from(nt: NullTime) -> Self {
        nt.value()
    }
}

impl Serialize for NullTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.get().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NullTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<DateTime<Utc>>::deserialize(deserializer).map(Self::from)
    }
}

impl<DB: Database> Type<DB> for NullTime
where
    DateTime<Utc>: Type<DB>,
{
    fn type_info() -> DB::TypeInfo {
        <DateTime<Utc> as Type<DB>>::type_info()
    }

    // Any column may be scanned; mismatches are folded into NULL by `decode`.
    fn compatible(_ty: &DB::TypeInfo) -> bool {
        true
    }
}

impl<'r, DB: Database> Decode<'r, DB> for NullTime
where
    DateTime<Utc>: Decode<'r, DB> + Type<DB>,
    i64: Type<DB>,
    f64: Type<DB>,
{
    fn decode(value: <DB as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        if value.is_null() {
            return Ok(Self::null());
        }

        // SQLite accepts unix seconds and julian days as timestamps; a
        // number is never a timestamp here.
        let is_timestamp = {
            let ty = value.type_info();
            !<i64 as Type<DB>>::compatible(&ty)
                && !<f64 as Type<DB>>::compatible(&ty)
                && <DateTime<Utc> as Type<DB>>::compatible(&ty)
        };
        if !is_timestamp {
            return Ok(Self::null());
        }

        Ok(match <DateTime<Utc> as Decode<'r, DB>>::decode(value) {
            Ok(time) => Self::new(time),
            Err(_) => Self::null(),
        })
    }
}

impl<'q, DB: Database> Encode<'q, DB> for NullTime
where
    DateTime<Utc>: Encode<'q, DB>,
{
    fn encode_by_ref(
        &self,
        buf: &mut <DB as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        match self.get() {
            Some(time) => <DateTime<Utc> as Encode<'q, DB>>::encode_by_ref(&time, buf),
            None => Ok(IsNull::Yes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_scan_timestamp_is_present() {
        let nt = NullTime::scan(&Value::DateTimeTz(sample_time()));
        assert!(nt.valid);
        assert_eq!(nt.time, sample_time());
    }

    #[test]
    fn test_scan_null_is_absent() {
        let nt = NullTime::scan(&Value::Null);
        assert!(!nt.valid);
        assert_eq!(nt.time, DateTime::<Utc>::default());
    }

    #[test]
    fn test_scan_wrong_type_is_absent() {
        assert!(!NullTime::scan(&Value::Int64(1_710_000_000)).valid);
        assert!(!NullTime::scan(&Value::Text("2024-03-09".to_string())).valid);
        assert!(!NullTime::scan(&Value::DateTime(sample_time().naive_utc())).valid);
    }

    #[test]
    fn test_bind_absent_is_null() {
        assert_eq!(NullTime::null().value(), Value::Null);

        // Garbage in `time` must not leak through when not valid.
        let stale = NullTime {
            time: sample_time(),
            valid: false,
        };
        assert_eq!(stale.value(), Value::Null);
        assert_eq!(stale.get(), None);
    }

    #[test]
    fn test_bind_present_is_unchanged() {
        assert_eq!(
            NullTime::new(sample_time()).value(),
            Value::DateTimeTz(sample_time())
        );
    }

    #[test]
    fn test_equality_ignores_time_when_absent() {
        let stale = NullTime {
            time: sample_time(),
            valid: false,
        };
        assert_eq!(stale, NullTime::null());
        assert_ne!(NullTime::new(sample_time()), NullTime::null());
    }

    #[test]
    fn test_option_conversions() {
        let nt: NullTime = Some(sample_time()).into();
        assert_eq!(Option::<DateTime<Utc>>::from(nt), Some(sample_time()));

        let nt: NullTime = None.into();
        assert!(!nt.is_valid());
    }

    #[test]
    fn test_serde_as_optional_timestamp() {
        assert_eq!(serde_json::to_string(&NullTime::null()).unwrap(), "null");

        let json = serde_json::to_string(&NullTime::new(sample_time())).unwrap();
        let back: NullTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(), Some(sample_time()));

        let back: NullTime = serde_json::from_str("null").unwrap();
        assert!(!back.valid);
    }
}
