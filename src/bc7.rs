//! BC7: RGBA8 blocks.
//!
//! The mode is unary coded in the lowest bits of the block. Every mode stores,
//! in order: partition id, rotation, index mode, the endpoint components
//! (channel major), P-bits, the primary indices and, for modes 4 and 5, a
//! second set of indices.

use crate::bits::{BitCursor, BitField128};
use crate::error::{DataFormatError, PackError};
use crate::partition::{self, PARTITION_COUNT};
use crate::texel::Rgba8;

/// Number of defined modes. Blocks without any of the low 8 bits set are reserved.
pub const MODE_COUNT: usize = 8;

/// Constant layout parameters of a BC7 mode.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ModeDescriptor {
    pub num_subsets: usize,
    pub partition_bits: u32,
    pub rotation_bits: u32,
    pub index_mode_bits: u32,
    /// Stored bits per color component, without P-bit.
    pub color_bits: u32,
    /// Stored bits per alpha component, 0 for opaque modes.
    pub alpha_bits: u32,
    /// One P-bit per endpoint.
    pub endpoint_pbits: bool,
    /// One P-bit per subset, shared by both of its endpoints.
    pub shared_pbits: bool,
    pub index_bits: u32,
    /// Width of the second index set, 0 if the mode has none.
    pub index2_bits: u32,
}

impl ModeDescriptor {
    pub const fn num_endpoints(&self) -> usize {
        self.num_subsets * 2
    }

    /// Number of P-bits stored in the block.
    pub const fn num_pbits(&self) -> usize {
        if self.endpoint_pbits {
            self.num_endpoints()
        } else if self.shared_pbits {
            self.num_subsets
        } else {
            0
        }
    }

    const fn has_pbits(&self) -> bool {
        self.endpoint_pbits || self.shared_pbits
    }
}

#[rustfmt::skip]
static MODES: [ModeDescriptor; MODE_COUNT] = [
    mode(3, 4, 0, 0, 4, 0, true, false, 3, 0),
    mode(2, 6, 0, 0, 6, 0, false, true, 3, 0),
    mode(3, 6, 0, 0, 5, 0, false, false, 2, 0),
    mode(2, 6, 0, 0, 7, 0, true, false, 2, 0),
    mode(1, 0, 2, 1, 5, 6, false, false, 2, 3),
    mode(1, 0, 2, 0, 7, 8, false, false, 2, 2),
    mode(1, 0, 0, 0, 7, 7, true, false, 4, 0),
    mode(2, 6, 0, 0, 5, 5, true, false, 2, 0),
];

#[allow(clippy::too_many_arguments)]
const fn mode(
    num_subsets: usize,
    partition_bits: u32,
    rotation_bits: u32,
    index_mode_bits: u32,
    color_bits: u32,
    alpha_bits: u32,
    endpoint_pbits: bool,
    shared_pbits: bool,
    index_bits: u32,
    index2_bits: u32,
) -> ModeDescriptor {
    ModeDescriptor {
        num_subsets,
        partition_bits,
        rotation_bits,
        index_mode_bits,
        color_bits,
        alpha_bits,
        endpoint_pbits,
        shared_pbits,
        index_bits,
        index2_bits,
    }
}

/// Returns the layout parameters of `mode` (0..8).
pub fn descriptor(mode: u8) -> &'static ModeDescriptor {
    &MODES[mode as usize]
}

/// Returns the mode of a block: the position of the lowest set bit of byte 0.
pub fn mode_of(block: &[u8; 16]) -> Result<u8, DataFormatError> {
    match block[0].trailing_zeros() {
        8 => Err(DataFormatError::ReservedMode),
        mode => Ok(mode as u8),
    }
}

/// The logical content of a BC7 block, one variant per mode.
///
/// Endpoint components are the stored values, before P-bit insertion and
/// expansion to 8 bits. Subset `s` uses endpoints `2 * s` and `2 * s + 1`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Bc7Fields {
    /// Three subsets, 4 bit RGB endpoints, one P-bit per endpoint, 3 bit indices.
    Mode0 {
        partition: u8,
        endpoints: [[u8; 3]; 6],
        pbits: [u8; 6],
        indices: [u8; 16],
    },
    /// Two subsets, 6 bit RGB endpoints, one P-bit per subset, 3 bit indices.
    Mode1 {
        partition: u8,
        endpoints: [[u8; 3]; 4],
        pbits: [u8; 2],
        indices: [u8; 16],
    },
    /// Three subsets, 5 bit RGB endpoints, 2 bit indices.
    Mode2 {
        partition: u8,
        endpoints: [[u8; 3]; 6],
        indices: [u8; 16],
    },
    /// Two subsets, 7 bit RGB endpoints, one P-bit per endpoint, 2 bit indices.
    Mode3 {
        partition: u8,
        endpoints: [[u8; 3]; 4],
        pbits: [u8; 4],
        indices: [u8; 16],
    },
    /// 5 bit color and 6 bit alpha, with 2 bit primary and 3 bit secondary
    /// indices. `index_mode` 0 interpolates color with the primary indices and
    /// alpha with the secondary ones, 1 does the reverse.
    Mode4 {
        rotation: u8,
        index_mode: u8,
        endpoints: [[u8; 4]; 2],
        primary_indices: [u8; 16],
        secondary_indices: [u8; 16],
    },
    /// 7 bit color and 8 bit alpha with separate 2 bit index sets.
    Mode5 {
        rotation: u8,
        endpoints: [[u8; 4]; 2],
        color_indices: [u8; 16],
        alpha_indices: [u8; 16],
    },
    /// 7 bit RGBA endpoints, one P-bit per endpoint, 4 bit indices.
    Mode6 {
        endpoints: [[u8; 4]; 2],
        pbits: [u8; 2],
        indices: [u8; 16],
    },
    /// Two subsets, 5 bit RGBA endpoints, one P-bit per endpoint, 2 bit indices.
    Mode7 {
        partition: u8,
        endpoints: [[u8; 4]; 4],
        pbits: [u8; 4],
        indices: [u8; 16],
    },
}

/// Mode independent view of a block, walked front to back by the descriptor.
#[derive(Copy, Clone, Debug, Default)]
struct RawBlock {
    mode: u8,
    partition: u8,
    rotation: u8,
    index_mode: u8,
    endpoints: [[u8; 4]; 6],
    pbits: [u8; 6],
    indices: [u8; 16],
    indices2: [u8; 16],
}

fn rgb<const N: usize>(endpoints: &[[u8; 4]; 6]) -> [[u8; 3]; N] {
    std::array::from_fn(|e| [endpoints[e][0], endpoints[e][1], endpoints[e][2]])
}

fn rgba<const N: usize>(endpoints: &[[u8; 4]; 6]) -> [[u8; 4]; N] {
    std::array::from_fn(|e| endpoints[e])
}

fn head<const N: usize>(values: &[u8; 6]) -> [u8; N] {
    std::array::from_fn(|i| values[i])
}

fn from_rgb(endpoints: &[[u8; 3]]) -> [[u8; 4]; 6] {
    let mut out = [[0u8; 4]; 6];
    for (target, [r, g, b]) in out.iter_mut().zip(endpoints) {
        *target = [*r, *g, *b, 0];
    }
    out
}

fn from_rgba(endpoints: &[[u8; 4]]) -> [[u8; 4]; 6] {
    let mut out = [[0u8; 4]; 6];
    out[..endpoints.len()].copy_from_slice(endpoints);
    out
}

fn from_pbits(pbits: &[u8]) -> [u8; 6] {
    let mut out = [0u8; 6];
    out[..pbits.len()].copy_from_slice(pbits);
    out
}

impl RawBlock {
    #[allow(clippy::needless_range_loop)]
    fn read(block: &[u8; 16]) -> Result<Self, DataFormatError> {
        let mode = mode_of(block)?;
        let descriptor = descriptor(mode);
        let num_endpoints = descriptor.num_endpoints();

        let mut cursor = BitCursor::new(BitField128::from_bytes(block));
        cursor.read_bits(mode as u32 + 1);

        let mut raw = RawBlock {
            mode,
            partition: cursor.read_bits(descriptor.partition_bits) as u8,
            rotation: cursor.read_bits(descriptor.rotation_bits) as u8,
            index_mode: cursor.read_bits(descriptor.index_mode_bits) as u8,
            ..Default::default()
        };

        for channel in 0..3 {
            for endpoint in raw.endpoints.iter_mut().take(num_endpoints) {
                endpoint[channel] = cursor.read_bits(descriptor.color_bits) as u8;
            }
        }
        for endpoint in raw.endpoints.iter_mut().take(num_endpoints) {
            endpoint[3] = cursor.read_bits(descriptor.alpha_bits) as u8;
        }

        for pbit in raw.pbits.iter_mut().take(descriptor.num_pbits()) {
            *pbit = cursor.read_bit() as u8;
        }

        for pixel in 0..16 {
            raw.indices[pixel] = cursor.read_bits(raw.index_bits(pixel)) as u8;
        }
        if descriptor.index2_bits > 0 {
            for pixel in 0..16 {
                raw.indices2[pixel] = cursor.read_bits(raw.index2_bits(pixel)) as u8;
            }
        }
        debug_assert_eq!(cursor.position(), 128);

        Ok(raw)
    }

    fn write(&self) -> [u8; 16] {
        let descriptor = self.descriptor();
        let num_endpoints = descriptor.num_endpoints();

        let mut cursor = BitCursor::new(BitField128::new());
        cursor.write_bits(self.mode as u32 + 1, 1 << self.mode);
        cursor.write_bits(descriptor.partition_bits, self.partition as u32);
        cursor.write_bits(descriptor.rotation_bits, self.rotation as u32);
        cursor.write_bits(descriptor.index_mode_bits, self.index_mode as u32);

        for channel in 0..3 {
            for endpoint in self.endpoints.iter().take(num_endpoints) {
                cursor.write_bits(descriptor.color_bits, endpoint[channel] as u32);
            }
        }
        for endpoint in self.endpoints.iter().take(num_endpoints) {
            cursor.write_bits(descriptor.alpha_bits, endpoint[3] as u32);
        }

        for &pbit in self.pbits.iter().take(descriptor.num_pbits()) {
            cursor.write_bit(pbit as u32);
        }

        for (pixel, &index) in self.indices.iter().enumerate() {
            cursor.write_bits(self.index_bits(pixel), index as u32);
        }
        if descriptor.index2_bits > 0 {
            for (pixel, &index) in self.indices2.iter().enumerate() {
                cursor.write_bits(self.index2_bits(pixel), index as u32);
            }
        }
        debug_assert_eq!(cursor.position(), 128);

        cursor.bits.to_bytes()
    }

    fn descriptor(&self) -> &'static ModeDescriptor {
        descriptor(self.mode)
    }

    fn subset_of(&self, pixel: usize) -> usize {
        partition::subset_of(
            self.descriptor().num_subsets,
            self.partition as usize,
            pixel,
        )
    }

    /// Stored width of the primary index of `pixel`.
    fn index_bits(&self, pixel: usize) -> u32 {
        let descriptor = self.descriptor();
        partition::index_bit_width(
            descriptor.num_subsets,
            self.partition as usize,
            descriptor.index_bits,
            pixel,
        )
    }

    /// Stored width of the secondary index of `pixel`. Only pixel 0 is an anchor.
    fn index2_bits(&self, pixel: usize) -> u32 {
        let bits = self.descriptor().index2_bits;
        if pixel == 0 {
            bits - 1
        } else {
            bits
        }
    }

    /// Endpoints after P-bit insertion and expansion to 8 bits.
    fn expanded_endpoints(&self) -> [[i32; 4]; 6] {
        let descriptor = self.descriptor();
        let mut expanded = [[0i32; 4]; 6];

        for (e, (target, stored)) in expanded
            .iter_mut()
            .zip(self.endpoints.iter())
            .take(descriptor.num_endpoints())
            .enumerate()
        {
            let pbit = if descriptor.endpoint_pbits {
                Some(self.pbits[e])
            } else if descriptor.shared_pbits {
                Some(self.pbits[e / 2])
            } else {
                None
            };

            for channel in 0..3 {
                target[channel] = expand(stored[channel], descriptor.color_bits, pbit) as i32;
            }
            target[3] = if descriptor.alpha_bits == 0 {
                0xFF
            } else {
                expand(stored[3], descriptor.alpha_bits, pbit) as i32
            };
        }

        expanded
    }

    fn texels(&self) -> [Rgba8; 16] {
        let descriptor = self.descriptor();
        let endpoints = self.expanded_endpoints();

        let primary_weights = partition::weights(descriptor.index_bits);
        let (color_weights, alpha_weights, color_indices, alpha_indices) =
            match (descriptor.index2_bits, self.index_mode) {
                (0, _) => (
                    primary_weights,
                    primary_weights,
                    &self.indices,
                    &self.indices,
                ),
                (bits, 0) => (
                    primary_weights,
                    partition::weights(bits),
                    &self.indices,
                    &self.indices2,
                ),
                (bits, _) => (
                    partition::weights(bits),
                    primary_weights,
                    &self.indices2,
                    &self.indices,
                ),
            };

        let mut texels = [Rgba8::default(); 16];
        for (pixel, texel) in texels.iter_mut().enumerate() {
            let subset = self.subset_of(pixel);
            let e0 = endpoints[subset * 2];
            let e1 = endpoints[subset * 2 + 1];
            let color_index = color_indices[pixel] as u32;
            let alpha_index = alpha_indices[pixel] as u32;

            let mut rgba = [0u8; 4];
            for channel in 0..3 {
                rgba[channel] =
                    partition::interpolate(e0[channel], e1[channel], color_weights, color_index)
                        as u8;
            }
            rgba[3] = partition::interpolate(e0[3], e1[3], alpha_weights, alpha_index) as u8;

            *texel = rotate(rgba, self.rotation).into();
        }

        texels
    }

    fn validate(&self) -> Result<(), PackError> {
        let descriptor = self.descriptor();

        let partition_count = if descriptor.num_subsets > 1 {
            1usize << descriptor.partition_bits
        } else {
            1
        };
        if self.partition as usize >= partition_count.min(PARTITION_COUNT) {
            return Err(PackError::InvalidPartition {
                partition: self.partition as usize,
                count: partition_count,
            });
        }

        check("rotation", self.rotation, descriptor.rotation_bits)?;
        check("index mode", self.index_mode, descriptor.index_mode_bits)?;

        for endpoint in self.endpoints.iter().take(descriptor.num_endpoints()) {
            for &component in &endpoint[..3] {
                check("color endpoint", component, descriptor.color_bits)?;
            }
            check("alpha endpoint", endpoint[3], descriptor.alpha_bits)?;
        }

        for &pbit in self.pbits.iter().take(descriptor.num_pbits()) {
            check("p-bit", pbit, 1)?;
        }

        for (pixel, &index) in self.indices.iter().enumerate() {
            check_index(pixel, index, descriptor.index_bits, self.index_bits(pixel))?;
        }
        if descriptor.index2_bits > 0 {
            for (pixel, &index) in self.indices2.iter().enumerate() {
                check_index(pixel, index, descriptor.index2_bits, self.index2_bits(pixel))?;
            }
        }

        Ok(())
    }
}

fn check(field: &'static str, value: u8, bits: u32) -> Result<(), PackError> {
    if (value as u32) < 1 << bits {
        Ok(())
    } else {
        Err(PackError::ValueOutOfRange {
            field,
            value: value as i64,
            bits,
        })
    }
}

fn check_index(pixel: usize, index: u8, bits: u32, stored_bits: u32) -> Result<(), PackError> {
    check("index", index, bits)?;
    if (index as u32) < 1 << stored_bits {
        Ok(())
    } else {
        Err(PackError::AnchorIndexTooLarge {
            pixel,
            index,
            bits: stored_bits,
        })
    }
}

/// Expands a stored component (plus optional P-bit) to 8 bits by replicating
/// its most significant bits into the low bits.
#[inline]
fn expand(value: u8, bits: u32, pbit: Option<u8>) -> u8 {
    let (value, precision) = match pbit {
        Some(pbit) => (((value as u32) << 1) | pbit as u32, bits + 1),
        None => (value as u32, bits),
    };

    let value = value << (8 - precision);
    (value | (value >> precision)) as u8
}

/// Swaps alpha with red, green or blue for rotation 1, 2 or 3.
#[inline]
fn rotate(mut rgba: [u8; 4], rotation: u8) -> [u8; 4] {
    match rotation {
        1 => rgba.swap(3, 0),
        2 => rgba.swap(3, 1),
        3 => rgba.swap(3, 2),
        _ => {}
    }
    rgba
}

impl From<&Bc7Fields> for RawBlock {
    fn from(fields: &Bc7Fields) -> Self {
        let raw = RawBlock::default();
        match *fields {
            Bc7Fields::Mode0 {
                partition,
                ref endpoints,
                ref pbits,
                indices,
            } => RawBlock {
                mode: 0,
                partition,
                endpoints: from_rgb(endpoints),
                pbits: from_pbits(pbits),
                indices,
                ..raw
            },
            Bc7Fields::Mode1 {
                partition,
                ref endpoints,
                ref pbits,
                indices,
            } => RawBlock {
                mode: 1,
                partition,
                endpoints: from_rgb(endpoints),
                pbits: from_pbits(pbits),
                indices,
                ..raw
            },
            Bc7Fields::Mode2 {
                partition,
                ref endpoints,
                indices,
            } => RawBlock {
                mode: 2,
                partition,
                endpoints: from_rgb(endpoints),
                indices,
                ..raw
            },
            Bc7Fields::Mode3 {
                partition,
                ref endpoints,
                ref pbits,
                indices,
            } => RawBlock {
                mode: 3,
                partition,
                endpoints: from_rgb(endpoints),
                pbits: from_pbits(pbits),
                indices,
                ..raw
            },
            Bc7Fields::Mode4 {
                rotation,
                index_mode,
                ref endpoints,
                primary_indices,
                secondary_indices,
            } => RawBlock {
                mode: 4,
                rotation,
                index_mode,
                endpoints: from_rgba(endpoints),
                indices: primary_indices,
                indices2: secondary_indices,
                ..raw
            },
            Bc7Fields::Mode5 {
                rotation,
                ref endpoints,
                color_indices,
                alpha_indices,
            } => RawBlock {
                mode: 5,
                rotation,
                endpoints: from_rgba(endpoints),
                indices: color_indices,
                indices2: alpha_indices,
                ..raw
            },
            Bc7Fields::Mode6 {
                ref endpoints,
                ref pbits,
                indices,
            } => RawBlock {
                mode: 6,
                endpoints: from_rgba(endpoints),
                pbits: from_pbits(pbits),
                indices,
                ..raw
            },
            Bc7Fields::Mode7 {
                partition,
                ref endpoints,
                ref pbits,
                indices,
            } => RawBlock {
                mode: 7,
                partition,
                endpoints: from_rgba(endpoints),
                pbits: from_pbits(pbits),
                indices,
                ..raw
            },
        }
    }
}

impl From<RawBlock> for Bc7Fields {
    fn from(raw: RawBlock) -> Self {
        let endpoints = &raw.endpoints;
        match raw.mode {
            0 => Self::Mode0 {
                partition: raw.partition,
                endpoints: rgb(endpoints),
                pbits: head(&raw.pbits),
                indices: raw.indices,
            },
            1 => Self::Mode1 {
                partition: raw.partition,
                endpoints: rgb(endpoints),
                pbits: head(&raw.pbits),
                indices: raw.indices,
            },
            2 => Self::Mode2 {
                partition: raw.partition,
                endpoints: rgb(endpoints),
                indices: raw.indices,
            },
            3 => Self::Mode3 {
                partition: raw.partition,
                endpoints: rgb(endpoints),
                pbits: head(&raw.pbits),
                indices: raw.indices,
            },
            4 => Self::Mode4 {
                rotation: raw.rotation,
                index_mode: raw.index_mode,
                endpoints: rgba(endpoints),
                primary_indices: raw.indices,
                secondary_indices: raw.indices2,
            },
            5 => Self::Mode5 {
                rotation: raw.rotation,
                endpoints: rgba(endpoints),
                color_indices: raw.indices,
                alpha_indices: raw.indices2,
            },
            6 => Self::Mode6 {
                endpoints: rgba(endpoints),
                pbits: head(&raw.pbits),
                indices: raw.indices,
            },
            _ => Self::Mode7 {
                partition: raw.partition,
                endpoints: rgba(endpoints),
                pbits: head(&raw.pbits),
                indices: raw.indices,
            },
        }
    }
}

impl Bc7Fields {
    /// The mode number (0..8) of this variant.
    pub const fn mode(&self) -> u8 {
        match self {
            Self::Mode0 { .. } => 0,
            Self::Mode1 { .. } => 1,
            Self::Mode2 { .. } => 2,
            Self::Mode3 { .. } => 3,
            Self::Mode4 { .. } => 4,
            Self::Mode5 { .. } => 5,
            Self::Mode6 { .. } => 6,
            Self::Mode7 { .. } => 7,
        }
    }

    /// Interpolates the 16 pixels these fields describe.
    pub fn texels(&self) -> [Rgba8; 16] {
        RawBlock::from(self).texels()
    }

    /// Checks every field against the layout of the mode.
    pub fn validate(&self) -> Result<(), PackError> {
        RawBlock::from(self).validate()
    }
}

/// Reads all fields of a block.
pub fn decode_fields(block: &[u8; 16]) -> Result<Bc7Fields, DataFormatError> {
    RawBlock::read(block).map(Bc7Fields::from)
}

/// Decodes a block into 16 RGBA8 pixels in row-major order.
pub fn decode_block(block: &[u8; 16]) -> Result<[Rgba8; 16], DataFormatError> {
    Ok(RawBlock::read(block)?.texels())
}

/// Packs fields that are known to be valid, such as those returned by
/// [`decode_fields`].
///
/// The fields must satisfy [`Bc7Fields::validate`]; this is only asserted in
/// debug builds, release builds truncate oversized values to their field width.
/// Use [`try_pack`] for fields built from any other source.
pub fn pack(fields: &Bc7Fields) -> [u8; 16] {
    let raw = RawBlock::from(fields);
    debug_assert_eq!(raw.validate(), Ok(()));
    raw.write()
}

/// Packs the fields into a block, checking them first.
pub fn try_pack(fields: &Bc7Fields) -> Result<[u8; 16], PackError> {
    let raw = RawBlock::from(fields);
    raw.validate()?;
    Ok(raw.write())
}
