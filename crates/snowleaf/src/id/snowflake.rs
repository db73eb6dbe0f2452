use core::{fmt, time::Duration};

/// A 64-bit Snowflake ID.
///
/// - 1 bit reserved (always zero, keeps the value positive as an `i64`)
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 10 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21            12 11             0
///              +--------------+----------------+----------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | worker ID (10) | sequence (12) |
///              +--------------+----------------+----------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ----------->|
/// ```
///
/// The layout is fixed: any decoder that splits the integer along these bit
/// boundaries reads back the same fields.
///
/// # Example
///
/// ```
/// use snowleaf::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1000, 2, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.worker_id(), 2);
/// assert_eq!(id.sequence(), 1);
/// assert_eq!(SnowflakeId::from_raw(id.to_raw()), id);
/// ```
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Width of the timestamp field.
    pub const TIMESTAMP_BITS: u32 = 41;

    /// Width of the worker ID field.
    pub const WORKER_ID_BITS: u32 = 10;

    /// Width of the sequence field.
    pub const SEQUENCE_BITS: u32 = 12;

    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 22
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for extracting the 10-bit worker ID field. Occupies bits 12
    /// through 21.
    pub const WORKER_ID_MASK: u64 = (1 << Self::WORKER_ID_BITS) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u32 = Self::WORKER_ID_SHIFT + Self::WORKER_ID_BITS;

    /// Number of bits to shift the worker ID to its correct position (bit 12).
    pub const WORKER_ID_SHIFT: u32 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u32 = 0;

    /// Largest timestamp delta the layout can hold, roughly 69 years of
    /// milliseconds.
    pub const MAX_TIMESTAMP: u64 = Self::TIMESTAMP_MASK;

    /// Largest worker ID the layout can hold (1023).
    pub const MAX_WORKER_ID: u64 = Self::WORKER_ID_MASK;

    /// Largest sequence value the layout can hold (4095).
    pub const MAX_SEQUENCE: u64 = Self::SEQUENCE_MASK;

    /// Packs the three fields into an ID.
    ///
    /// Each component is masked to its field width, so out-of-range inputs are
    /// truncated rather than bleeding into neighbouring fields. The generator
    /// validates its inputs before calling this.
    pub const fn from_components(timestamp: u64, worker_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | worker_id | sequence,
        }
    }

    /// Extracts the timestamp (ms since the epoch) from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the worker ID from the packed ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the raw integer representation.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Wraps a raw integer without validation. See [`Self::is_valid`].
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns `true` if the reserved high bit is clear.
    ///
    /// Every ID produced by a generator is valid; this only matters for
    /// values decoded from untrusted input.
    pub const fn is_valid(&self) -> bool {
        self.id >> (Self::TIMESTAMP_SHIFT + Self::TIMESTAMP_BITS) == 0
    }

    /// Returns the absolute creation time in milliseconds since the Unix
    /// epoch, given the epoch the ID was generated against.
    pub const fn unix_millis(&self, epoch: Duration) -> u64 {
        self.timestamp() + epoch.as_millis() as u64
    }

    /// Returns the three fields as `(timestamp, worker_id, sequence)`.
    pub const fn into_parts(self) -> (u64, u64, u64) {
        (self.timestamp(), self.worker_id(), self.sequence())
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &format_args!("0x{:016x}", self.id))
            .field("timestamp", &self.timestamp())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}
