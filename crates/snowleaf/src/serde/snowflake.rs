use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serde `with` module storing a [`SnowflakeId`] as its raw `u64`.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use snowleaf::{SnowflakeId, as_native_snow};
///
/// #[derive(Serialize, Deserialize)]
/// struct Row {
///     #[serde(with = "as_native_snow")]
///     event_id: SnowflakeId,
/// }
/// ```
///
/// [`SnowflakeId`]: crate::SnowflakeId
pub mod as_native_snow {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::{SerdeError, SnowflakeId};

    /// Serialize a snowflake ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize a snowflake ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The value sets the reserved high bit
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = SnowflakeId::from_raw(u64::deserialize(d)?);
        if !id.is_valid() {
            return Err(serde::de::Error::custom(SerdeError::DecodeOverflow { id }));
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SerdeError, SnowflakeId};
    use serde_json::json;

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct Row {
        #[serde(with = "as_native_snow")]
        event_id: SnowflakeId,
    }

    #[test]
    fn native_snow_roundtrip() {
        let row = Row {
            event_id: SnowflakeId::from_components(42, 3, 7),
        };

        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, format!(r#"{{"event_id":{}}}"#, row.event_id.to_raw()));
        let back: Row = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, row);
    }

    #[test]
    fn native_snow_rejects_reserved_bit() {
        let json = json!({"event_id": u64::MAX});
        let err = serde_json::from_value::<Row>(json).expect_err("should fail");
        assert_eq!(
            err.to_string(),
            SerdeError::DecodeOverflow {
                id: SnowflakeId::from_raw(u64::MAX)
            }
            .to_string()
        );
    }
}
