//! Timestamp handling for upstream DTOs.
//!
//! The upstream API reports an unset timestamp either as `null`, as an
//! absent field, as an empty string, or as a zero sentinel
//! (`0001-01-01T00:00:00Z` or the Unix epoch). All of them decode to `None`.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// True when `t` is one of the zero sentinels.
pub fn is_zero_time(t: &DateTime<Utc>) -> bool {
    t.year() <= 1 || t.timestamp() == 0
}

/// Serde adapter for `Option<DateTime<Utc>>` fields.
pub mod optional {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.serialize_str(&t.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => {
                let parsed = DateTime::parse_from_rfc3339(s)
                    .map_err(serde::de::Error::custom)?
                    .with_timezone(&Utc);
                Ok(Some(parsed).filter(|t| !is_zero_time(t)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    struct Holder {
        #[serde(with = "optional")]
        at: Option<DateTime<Utc>>,
    }

    fn decode(json: &str) -> Option<DateTime<Utc>> {
        serde_json::from_str::<Holder>(json).unwrap().at
    }

    #[test]
    fn test_unset_forms_decode_to_none() {
        assert!(decode("{}").is_none());
        assert!(decode(r#"{"at": null}"#).is_none());
        assert!(decode(r#"{"at": ""}"#).is_none());
        assert!(decode(r#"{"at": "0001-01-01T00:00:00Z"}"#).is_none());
        assert!(decode(r#"{"at": "1970-01-01T00:00:00Z"}"#).is_none());
    }

    #[test]
    fn test_real_timestamp_decodes() {
        let at = decode(r#"{"at": "2024-05-01T12:00:00Z"}"#).unwrap();
        assert_eq!(at.to_rfc3339(), "2024-05-01T12:00:00+00:00");
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(serde_json::from_str::<Holder>(r#"{"at": "soon"}"#).is_err());
    }
}
