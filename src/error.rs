use thiserror::Error;

/// A block whose bits do not describe any decodable layout.
#[derive(Copy, Clone, Debug, Error, Eq, PartialEq)]
pub enum DataFormatError {
    /// BC7 blocks with none of the low 8 bits set select the reserved mode 8.
    #[error("BC7 block uses the reserved mode 8")]
    ReservedMode,
}

/// A field handed to a packer does not fit the layout of the chosen mode.
#[derive(Copy, Clone, Debug, Error, Eq, PartialEq)]
pub enum PackError {
    #[error("{field} value {value} does not fit in {bits} bits")]
    ValueOutOfRange {
        field: &'static str,
        value: i64,
        bits: u32,
    },

    #[error("endpoint {endpoint} channel {channel} delta {delta} does not fit in {bits} signed bits")]
    DeltaOutOfRange {
        endpoint: usize,
        channel: usize,
        delta: i64,
        bits: u32,
    },

    #[error("partition {partition} is out of range, the mode has {count} partitions")]
    InvalidPartition { partition: usize, count: usize },

    #[error("anchor pixel {pixel} has index {index} which needs more than {bits} bits")]
    AnchorIndexTooLarge { pixel: usize, index: u8, bits: u32 },
}

/// Failure while untiling a surface of blocks.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum DecompressError {
    #[error("expected {expected} bytes of block data but found {actual}")]
    InvalidInputSize { expected: usize, actual: usize },

    #[error("expected an output buffer of {expected} elements but found {actual}")]
    InvalidOutputSize { expected: usize, actual: usize },

    #[error("block {block_index} could not be decoded: {source}")]
    DataFormat {
        block_index: usize,
        #[source]
        source: DataFormatError,
    },
}
