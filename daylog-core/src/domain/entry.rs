//! Diary entry domain model

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::goals::GoalSnapshot;
use super::result::{Error, Result};

/// A partial set of entry fields, keyed by field name.
///
/// Each key replaces the whole field when applied, so `nutrition` and
/// `goals` are only ever replaced wholesale.
pub type EntryPatch = Map<String, JsonValue>;

/// The diary record for one calendar day (UTC)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    /// Storage key; one entry per date
    pub date: NaiveDate,
    /// Body weight recorded for the day, `None` when never set
    #[serde(default, with = "weight_field")]
    pub weight: Option<Decimal>,
    /// Goal targets captured when the entry was created
    #[serde(default)]
    pub goals: GoalSnapshot,
    /// Logged amounts keyed by nutrition item
    #[serde(default)]
    pub nutrition: BTreeMap<String, Decimal>,
    /// Fields merged in at update time that the diary doesn't interpret
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl DiaryEntry {
    /// Create a fresh entry with an empty nutrition log
    pub fn new(date: NaiveDate, weight: Option<Decimal>, goals: GoalSnapshot) -> Self {
        Self {
            date,
            weight,
            goals,
            nutrition: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    /// Overwrite every field present in `patch` onto this entry.
    ///
    /// The `date` key is ignored: it is the storage key and cannot move.
    /// On a type mismatch the entry is left untouched.
    pub fn apply(&mut self, patch: &EntryPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let JsonValue::Object(mut fields) = serde_json::to_value(&*self)? else {
            return Err(Error::Other("diary entry did not serialize to an object".to_string()));
        };

        for (key, value) in patch {
            if key == "date" {
                continue;
            }
            fields.insert(key.clone(), value.clone());
        }

        let merged: DiaryEntry = serde_json::from_value(JsonValue::Object(fields))
            .map_err(|e| Error::validation(format!("Invalid entry field: {}", e)))?;

        *self = merged;
        Ok(())
    }
}

/// Truncate a timestamp to its calendar day in UTC
pub fn truncate_to_utc_date<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> NaiveDate {
    timestamp.with_timezone(&Utc).date_naive()
}

/// Today's date in UTC
pub fn today_utc() -> NaiveDate {
    truncate_to_utc_date(&Utc::now())
}

/// Parse a user-supplied date.
///
/// Accepts a plain `YYYY-MM-DD` date or an RFC 3339 timestamp, which is
/// truncated to its UTC day. A timestamp without an offset is read as UTC.
pub fn parse_entry_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(truncate_to_utc_date(&ts));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|ts| truncate_to_utc_date(&ts.and_utc()))
        .ok_or_else(|| Error::validation(format!("Invalid date '{}'. Use YYYY-MM-DD", input)))
}

/// Parse a weight typed by the user. Returns `None` for anything non-numeric.
pub fn parse_weight(input: &str) -> Option<Decimal> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .ok()
}

/// Weight accepts null, an empty string, a number or a numeric string
mod weight_field {
    use rust_decimal::Decimal;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value as JsonValue;

    use super::parse_weight;

    pub fn serialize<S: Serializer>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
        match Option::<JsonValue>::deserialize(deserializer)? {
            None | Some(JsonValue::Null) => Ok(None),
            Some(JsonValue::String(s)) if s.trim().is_empty() => Ok(None),
            Some(JsonValue::String(s)) => parse_weight(&s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("weight '{}' is not a number", s))),
            Some(JsonValue::Number(n)) => parse_weight(&n.to_string())
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("weight {} is out of range", n))),
            Some(other) => Err(D::Error::custom(format!("weight must be a number, got {}", other))),
        }
    }
}
