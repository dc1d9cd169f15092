//! # bptc
//!
//! Bit-exact packing and unpacking of BPTC texture blocks.
//!
//! Every 4x4 pixel block is 16 bytes. The codecs read and write the logical
//! fields of a block (mode, partition, endpoints, indices) and interpolate
//! them to pixels exactly as GPUs do. No mode search or endpoint fitting is
//! done here; the packers only place already quantized values.
//!
//! ## Supported formats
//!
//!  * BC6H (RGB half float, signed and unsigned), feature `bc6h`
//!  * BC7 (RGBA8), feature `bc7`
//!
//! The `rayon` feature decodes whole surfaces in parallel.
//!
//! ## Example
//!
//! ```
//! # #[cfg(feature = "bc7")]
//! # {
//! use bptc::{bc7, Rgba8};
//!
//! let fields = bc7::Bc7Fields::Mode6 {
//!     endpoints: [[100, 50, 25, 127]; 2],
//!     pbits: [0, 0],
//!     indices: [0; 16],
//! };
//! let block = bc7::pack(&fields);
//!
//! assert_eq!(bc7::decode_block(&block), Ok([Rgba8::new(200, 100, 50, 254); 16]));
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "bc6h")]
#[cfg_attr(docsrs, doc(cfg(feature = "bc6h")))]
pub mod bc6h;
#[cfg(feature = "bc7")]
#[cfg_attr(docsrs, doc(cfg(feature = "bc7")))]
pub mod bc7;
mod bits;
pub mod decode;
mod error;
pub mod partition;
mod texel;

pub use bits::BitField128;
pub use error::{DataFormatError, DecompressError, PackError};
#[cfg(feature = "bc6h")]
pub use half;
#[cfg(feature = "bc6h")]
pub use texel::RgbHalf;
pub use texel::Rgba8;

/// Compression variants supported by this crate.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum CompressionVariant {
    /// BC6H compression (RGB HDR)
    BC6H,
    /// BC7 compression with smooth alpha (RGBA)
    BC7,
}

impl CompressionVariant {
    /// Returns the bytes per row of blocks for the given width.
    ///
    /// Width is rounded up to the nearest multiple of 4.
    pub const fn bytes_per_row(self, width: u32) -> u32 {
        let blocks_per_row = width.div_ceil(4);
        blocks_per_row * self.block_byte_size()
    }

    /// Returns the byte size required for storing compressed blocks for the given dimensions.
    ///
    /// Width and height are rounded up to the nearest multiple of 4.
    pub const fn blocks_byte_size(self, width: u32, height: u32) -> usize {
        let block_width = (width as usize).div_ceil(4);
        let block_height = (height as usize).div_ceil(4);
        let block_count = block_width * block_height;
        let block_size = self.block_byte_size() as usize;
        block_count * block_size
    }

    /// Size of a single block. Both variants use 128 bit blocks.
    pub const fn block_byte_size(self) -> u32 {
        16
    }

    /// Number of output channels per decoded pixel.
    pub const fn channels(self) -> usize {
        match self {
            CompressionVariant::BC6H => 3,
            CompressionVariant::BC7 => 4,
        }
    }
}
