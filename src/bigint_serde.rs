//! Serde helpers for encoding arbitrary-precision integers as decimal strings.
//!
//! Wire compatibility with existing published transcripts requires integers
//! to serialize as plain decimal strings (or JSON big-integers), never as
//! rug's native binary/struct representation.

use rug::Integer;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serde helpers for a single `rug::Integer` field.
pub mod decimal {
    use super::*;

    pub fn serialize<S>(value: &Integer, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Integer, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Integer::parse(&s)
            .map(|incomplete| Integer::from(incomplete))
            .map_err(DeError::custom)
    }
}

/// Serde helpers for `Vec<rug::Integer>` fields.
pub mod decimal_vec {
    use super::*;

    pub fn serialize<S>(values: &[Integer], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let strings: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        strings.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Integer>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let strings = Vec::<String>::deserialize(deserializer)?;
        strings
            .into_iter()
            .map(|s| {
                Integer::parse(&s)
                    .map(Integer::from)
                    .map_err(DeError::custom)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Wrapper {
        #[serde(with = "decimal")]
        value: Integer,
        #[serde(with = "decimal_vec")]
        values: Vec<Integer>,
    }

    #[test]
    fn round_trips_through_json() {
        let w = Wrapper {
            value: Integer::from(123456789u64),
            values: vec![Integer::from(1u8), Integer::from(u64::MAX)],
        };
        let json = serde_json::to_string(&w).unwrap();
        assert!(json.contains("\"123456789\""));
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(w, back);
    }
}
