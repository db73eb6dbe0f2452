use crate::SnowflakeId;

/// Errors that can occur while deserializing native integers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum SerdeError {
    /// The decoded value sets the reserved high bit, so no generator could
    /// have produced it.
    #[error("decoded id {id} sets the reserved bit")]
    DecodeOverflow {
        /// The decoded ID value, which failed validation.
        id: SnowflakeId,
    },
}
