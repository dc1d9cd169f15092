//! BC6H: three channel half float blocks.
//!
//! A block starts with a 2 or 5 bit mode prefix, followed by a mode specific
//! header holding the endpoints (and partition id for two-subset modes), and
//! ends with the per-pixel indices. Endpoints 1..=3 of most modes are stored as
//! signed deltas against endpoint 0.
//!
//! Decoding follows the D3D11 reference: blocks with an unknown mode decode to
//! solid magenta instead of failing.

mod layout;

use self::layout::{Field, Segment};
use crate::bits::{BitCursor, BitField128};
use crate::error::PackError;
use crate::partition::{self, BC6H_PARTITION_COUNT};
use crate::texel::RgbHalf;

/// The 14 defined BC6H modes, named by their prefix code.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Bc6hMode {
    Mode0,
    Mode1,
    Mode2,
    Mode3,
    Mode6,
    Mode7,
    Mode10,
    Mode11,
    Mode14,
    Mode15,
    Mode18,
    Mode22,
    Mode26,
    Mode30,
}

/// Constant layout parameters of a BC6H mode.
#[derive(Copy, Clone, Debug)]
pub struct ModeDescriptor {
    /// 1 or 2.
    pub num_subsets: usize,
    /// Whether endpoints 1..=3 are deltas against endpoint 0.
    pub transformed: bool,
    /// Precision of endpoint 0 and of every reconstructed endpoint.
    pub endpoint_bits: u32,
    /// Stored precision of endpoints 1..=3 per channel.
    pub delta_bits: [u32; 3],
    /// Nominal index precision.
    pub index_bits: u32,
    layout: &'static [Segment],
}

const fn two_subsets(
    transformed: bool,
    endpoint_bits: u32,
    delta_bits: [u32; 3],
    layout: &'static [Segment],
) -> ModeDescriptor {
    ModeDescriptor {
        num_subsets: 2,
        transformed,
        endpoint_bits,
        delta_bits,
        index_bits: 3,
        layout,
    }
}

const fn one_subset(
    transformed: bool,
    endpoint_bits: u32,
    delta_bits: u32,
    layout: &'static [Segment],
) -> ModeDescriptor {
    ModeDescriptor {
        num_subsets: 1,
        transformed,
        endpoint_bits,
        delta_bits: [delta_bits; 3],
        index_bits: 4,
        layout,
    }
}

static MODE_0: ModeDescriptor = two_subsets(true, 10, [5, 5, 5], layout::MODE_0);
static MODE_1: ModeDescriptor = two_subsets(true, 7, [6, 6, 6], layout::MODE_1);
static MODE_2: ModeDescriptor = two_subsets(true, 11, [5, 4, 4], layout::MODE_2);
static MODE_6: ModeDescriptor = two_subsets(true, 11, [4, 5, 4], layout::MODE_6);
static MODE_10: ModeDescriptor = two_subsets(true, 11, [4, 4, 5], layout::MODE_10);
static MODE_14: ModeDescriptor = two_subsets(true, 9, [5, 5, 5], layout::MODE_14);
static MODE_18: ModeDescriptor = two_subsets(true, 8, [6, 5, 5], layout::MODE_18);
static MODE_22: ModeDescriptor = two_subsets(true, 8, [5, 6, 5], layout::MODE_22);
static MODE_26: ModeDescriptor = two_subsets(true, 8, [5, 5, 6], layout::MODE_26);
static MODE_30: ModeDescriptor = two_subsets(false, 6, [6, 6, 6], layout::MODE_30);
static MODE_3: ModeDescriptor = one_subset(false, 10, 10, layout::MODE_3);
static MODE_7: ModeDescriptor = one_subset(true, 11, 9, layout::MODE_7);
static MODE_11: ModeDescriptor = one_subset(true, 12, 8, layout::MODE_11);
static MODE_15: ModeDescriptor = one_subset(true, 16, 4, layout::MODE_15);

/// Header size (prefix + endpoints + partition) of two-subset modes.
const HEADER_BITS_2: u32 = 82;
/// Header size of one-subset modes.
const HEADER_BITS_1: u32 = 65;

impl Bc6hMode {
    pub const ALL: [Self; 14] = [
        Self::Mode0,
        Self::Mode1,
        Self::Mode2,
        Self::Mode3,
        Self::Mode6,
        Self::Mode7,
        Self::Mode10,
        Self::Mode11,
        Self::Mode14,
        Self::Mode15,
        Self::Mode18,
        Self::Mode22,
        Self::Mode26,
        Self::Mode30,
    ];

    /// The prefix stored in the low bits of the block.
    pub const fn code(self) -> u8 {
        match self {
            Self::Mode0 => 0,
            Self::Mode1 => 1,
            Self::Mode2 => 2,
            Self::Mode3 => 3,
            Self::Mode6 => 6,
            Self::Mode7 => 7,
            Self::Mode10 => 10,
            Self::Mode11 => 11,
            Self::Mode14 => 14,
            Self::Mode15 => 15,
            Self::Mode18 => 18,
            Self::Mode22 => 22,
            Self::Mode26 => 26,
            Self::Mode30 => 30,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Mode0,
            1 => Self::Mode1,
            2 => Self::Mode2,
            3 => Self::Mode3,
            6 => Self::Mode6,
            7 => Self::Mode7,
            10 => Self::Mode10,
            11 => Self::Mode11,
            14 => Self::Mode14,
            15 => Self::Mode15,
            18 => Self::Mode18,
            22 => Self::Mode22,
            26 => Self::Mode26,
            30 => Self::Mode30,
            _ => return None,
        })
    }

    /// Width of the mode prefix.
    pub const fn prefix_bits(self) -> u32 {
        match self {
            Self::Mode0 | Self::Mode1 => 2,
            _ => 5,
        }
    }

    pub fn descriptor(self) -> &'static ModeDescriptor {
        match self {
            Self::Mode0 => &MODE_0,
            Self::Mode1 => &MODE_1,
            Self::Mode2 => &MODE_2,
            Self::Mode3 => &MODE_3,
            Self::Mode6 => &MODE_6,
            Self::Mode7 => &MODE_7,
            Self::Mode10 => &MODE_10,
            Self::Mode11 => &MODE_11,
            Self::Mode14 => &MODE_14,
            Self::Mode15 => &MODE_15,
            Self::Mode18 => &MODE_18,
            Self::Mode22 => &MODE_22,
            Self::Mode26 => &MODE_26,
            Self::Mode30 => &MODE_30,
        }
    }

    const fn header_bits(self) -> u32 {
        match self {
            Self::Mode3 | Self::Mode7 | Self::Mode11 | Self::Mode15 => HEADER_BITS_1,
            _ => HEADER_BITS_2,
        }
    }
}

/// Returns the mode of a block, or `None` for the reserved prefixes.
pub fn mode_of(block: &[u8; 16]) -> Option<Bc6hMode> {
    let prefix = block[0];
    if prefix & 0b10 == 0 {
        Bc6hMode::from_code(prefix & 0b11)
    } else {
        Bc6hMode::from_code(prefix & 0b11111)
    }
}

/// The logical content of a BC6H block.
///
/// Endpoints are absolute quantized values at the precision of the mode
/// (`endpoint_bits`), negative only for signed blocks. Subset `s` uses
/// endpoints `2 * s` and `2 * s + 1`; entries past the mode's subsets are
/// ignored when packing and zero when decoding.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Bc6hFields {
    pub mode: Bc6hMode,
    pub partition: u8,
    pub endpoints: [[i32; 3]; 4],
    pub indices: [u8; 16],
}

#[inline]
fn extend_sign(val: i32, bits: u32) -> i32 {
    // http://graphics.stanford.edu/~seander/bithacks.html#VariableSignExtend
    (val << (32 - bits)) >> (32 - bits)
}

#[inline]
fn low_mask(bits: u32) -> i32 {
    ((1i64 << bits) - 1) as i32
}

#[inline]
fn transform_inverse(delta: i32, base: i32, bits: u32, is_signed: bool) -> i32 {
    // If the precision of A0 is "p" bits, then the transform algorithm is:
    // B0 = (B0 + A0) & ((1 << p) - 1)
    let transformed = (delta + base) & low_mask(bits);
    if is_signed {
        extend_sign(transformed, bits)
    } else {
        transformed
    }
}

/// Scales an endpoint component to the 16 bit (unsigned) or 15 bit magnitude
/// (signed) range the interpolation works in.
#[inline]
fn unquantize(val: i32, bits: u32, is_signed: bool) -> i32 {
    if !is_signed {
        if bits >= 15 {
            val
        } else if val == 0 {
            0
        } else if val == low_mask(bits) {
            0xFFFF
        } else {
            ((val << 16) + 0x8000) >> bits
        }
    } else if bits >= 16 {
        val
    } else {
        let (negative, magnitude) = if val < 0 { (true, -val) } else { (false, val) };

        let unq = if magnitude == 0 {
            0
        } else if magnitude >= low_mask(bits - 1) {
            0x7FFF
        } else {
            ((magnitude << 15) + 0x4000) >> (bits - 1)
        };

        if negative {
            -unq
        } else {
            unq
        }
    }
}

/// Converts an interpolated value to the bit pattern of a half float.
#[inline]
fn finish_unquantize(val: i32, is_signed: bool) -> u16 {
    if !is_signed {
        // Scale the magnitude by 31 / 64
        ((val * 31) >> 6) as u16
    } else {
        // Scale the magnitude by 31 / 32; values that scale to zero lose their sign
        let scaled = if val < 0 {
            -(((-val) * 31) >> 5)
        } else {
            (val * 31) >> 5
        };
        let sign_bit = if scaled < 0 { 0x8000 } else { 0 };

        (sign_bit | scaled.abs()) as u16
    }
}

/// Reads the mode, endpoints, partition and indices of a block.
///
/// Returns `None` if the block uses a reserved mode.
pub fn decode_fields(block: &[u8; 16], is_signed: bool) -> Option<Bc6hFields> {
    let mode = mode_of(block)?;
    let descriptor = mode.descriptor();

    let mut cursor = BitCursor::new(BitField128::from_bytes(block));
    cursor.read_bits(mode.prefix_bits());

    let mut raw = [[0i32; 3]; 4];
    let mut partition = 0u8;

    for segment in descriptor.layout {
        let bits = cursor.read_bits(segment.len as u32);
        match segment.field {
            Field::Endpoint { endpoint, channel } => {
                raw[endpoint as usize][channel as usize] |= (bits as i32) << segment.shift;
            }
            Field::Partition => partition |= (bits as u8) << segment.shift,
        }
    }
    debug_assert_eq!(cursor.position(), mode.header_bits());

    let endpoints = reconstruct_endpoints(descriptor, raw, is_signed);

    let mut indices = [0u8; 16];
    for (pixel, index) in indices.iter_mut().enumerate() {
        let bits = partition::index_bit_width(
            descriptor.num_subsets,
            partition as usize,
            descriptor.index_bits,
            pixel,
        );
        *index = cursor.read_bits(bits) as u8;
    }
    debug_assert_eq!(cursor.position(), 128);

    Some(Bc6hFields {
        mode,
        partition,
        endpoints,
        indices,
    })
}

/// Turns the stored endpoint bits into absolute endpoints.
fn reconstruct_endpoints(
    descriptor: &ModeDescriptor,
    mut endpoints: [[i32; 3]; 4],
    is_signed: bool,
) -> [[i32; 3]; 4] {
    let bits = descriptor.endpoint_bits;
    let num_endpoints = descriptor.num_subsets * 2;

    if is_signed {
        for channel in endpoints[0].iter_mut() {
            *channel = extend_sign(*channel, bits);
        }
    }

    let base = endpoints[0];
    for endpoint in endpoints.iter_mut().take(num_endpoints).skip(1) {
        for (channel, value) in endpoint.iter_mut().enumerate() {
            if descriptor.transformed {
                let delta = extend_sign(*value, descriptor.delta_bits[channel]);
                *value = transform_inverse(delta, base[channel], bits, is_signed);
            } else if is_signed {
                *value = extend_sign(*value, bits);
            }
        }
    }

    endpoints
}

impl Bc6hFields {
    /// Interpolates the 16 pixels these fields describe.
    pub fn texels(&self, is_signed: bool) -> [RgbHalf; 16] {
        let descriptor = self.mode.descriptor();
        let weights = partition::weights(descriptor.index_bits);

        let mut unquantized = [[0i32; 3]; 4];
        for (target, endpoint) in unquantized
            .iter_mut()
            .zip(self.endpoints.iter())
            .take(descriptor.num_subsets * 2)
        {
            for (out, &value) in target.iter_mut().zip(endpoint.iter()) {
                *out = unquantize(value, descriptor.endpoint_bits, is_signed);
            }
        }

        let mut texels = [RgbHalf::default(); 16];
        for (pixel, texel) in texels.iter_mut().enumerate() {
            let subset =
                partition::subset_of(descriptor.num_subsets, self.partition as usize, pixel);
            let e0 = unquantized[subset * 2];
            let e1 = unquantized[subset * 2 + 1];
            let index = self.indices[pixel] as u32;

            let channel = |c: usize| {
                finish_unquantize(
                    partition::interpolate(e0[c], e1[c], weights, index),
                    is_signed,
                )
            };
            *texel = RgbHalf::from_bits(channel(0), channel(1), channel(2));
        }

        texels
    }

    /// Checks every field against the layout of the mode.
    pub fn validate(&self, is_signed: bool) -> Result<(), PackError> {
        let descriptor = self.mode.descriptor();
        let bits = descriptor.endpoint_bits;
        let num_endpoints = descriptor.num_subsets * 2;

        let partition_count = if descriptor.num_subsets == 2 {
            BC6H_PARTITION_COUNT
        } else {
            1
        };
        if self.partition as usize >= partition_count {
            return Err(PackError::InvalidPartition {
                partition: self.partition as usize,
                count: partition_count,
            });
        }

        let (min, max) = if is_signed {
            (-(1i64 << (bits - 1)), (1i64 << (bits - 1)) - 1)
        } else {
            (0, (1i64 << bits) - 1)
        };
        for endpoint in self.endpoints.iter().take(num_endpoints) {
            for &value in endpoint {
                if !(min..=max).contains(&(value as i64)) {
                    return Err(PackError::ValueOutOfRange {
                        field: "endpoint",
                        value: value as i64,
                        bits,
                    });
                }
            }
        }

        if descriptor.transformed {
            for (endpoint, values) in self.endpoints.iter().enumerate().take(num_endpoints).skip(1)
            {
                for channel in 0..3 {
                    let delta_bits = descriptor.delta_bits[channel];
                    // Deltas wrap at the endpoint precision.
                    let delta = values[channel] as i64 - self.endpoints[0][channel] as i64;
                    let wrapped = extend_sign((delta as i32) & low_mask(bits), bits) as i64;
                    let limit = 1i64 << (delta_bits - 1);
                    if !(-limit..limit).contains(&wrapped) {
                        return Err(PackError::DeltaOutOfRange {
                            endpoint,
                            channel,
                            delta,
                            bits: delta_bits,
                        });
                    }
                }
            }
        }

        for (pixel, &index) in self.indices.iter().enumerate() {
            let stored = partition::index_bit_width(
                descriptor.num_subsets,
                self.partition as usize,
                descriptor.index_bits,
                pixel,
            );
            if index as u32 >= 1 << descriptor.index_bits {
                return Err(PackError::ValueOutOfRange {
                    field: "index",
                    value: index as i64,
                    bits: descriptor.index_bits,
                });
            }
            if index as u32 >= 1 << stored {
                return Err(PackError::AnchorIndexTooLarge {
                    pixel,
                    index,
                    bits: stored,
                });
            }
        }

        Ok(())
    }
}

/// Decodes a block into 16 half float pixels in row-major order.
///
/// Blocks with a reserved mode decode to [`RgbHalf::MAGENTA`].
pub fn decode_block(block: &[u8; 16], is_signed: bool) -> [RgbHalf; 16] {
    match decode_fields(block, is_signed) {
        Some(fields) => fields.texels(is_signed),
        None => [RgbHalf::MAGENTA; 16],
    }
}

/// Decodes a block into 16 `f32` RGB pixels in row-major order.
pub fn decode_block_f32(block: &[u8; 16], is_signed: bool) -> [[f32; 3]; 16] {
    decode_block(block, is_signed).map(RgbHalf::to_f32)
}

/// Packs the fields into a block, checking them first.
pub fn try_pack(fields: &Bc6hFields, is_signed: bool) -> Result<[u8; 16], PackError> {
    fields.validate(is_signed)?;
    Ok(write_block(fields))
}

/// Packs the fields into a block.
///
/// The fields must satisfy [`Bc6hFields::validate`]; this is only asserted in
/// debug builds, release builds truncate oversized values to their field width.
/// Use [`try_pack`] for fields not returned by [`decode_fields`].
pub fn pack(fields: &Bc6hFields, is_signed: bool) -> [u8; 16] {
    debug_assert_eq!(fields.validate(is_signed), Ok(()));
    write_block(fields)
}

fn write_block(fields: &Bc6hFields) -> [u8; 16] {
    let mode = fields.mode;
    let descriptor = mode.descriptor();
    let num_endpoints = descriptor.num_subsets * 2;

    let mut stored = [[0i32; 3]; 4];
    for (endpoint, values) in fields.endpoints.iter().enumerate().take(num_endpoints) {
        for channel in 0..3 {
            stored[endpoint][channel] = if endpoint == 0 || !descriptor.transformed {
                values[channel] & low_mask(descriptor.endpoint_bits)
            } else {
                (values[channel] - fields.endpoints[0][channel])
                    & low_mask(descriptor.delta_bits[channel])
            };
        }
    }

    let mut cursor = BitCursor::new(BitField128::new());
    cursor.write_bits(mode.prefix_bits(), mode.code() as u32);

    for segment in descriptor.layout {
        let value = match segment.field {
            Field::Endpoint { endpoint, channel } => {
                stored[endpoint as usize][channel as usize] as u32
            }
            Field::Partition => fields.partition as u32,
        };
        cursor.write_bits(segment.len as u32, value >> segment.shift);
    }

    for (pixel, &index) in fields.indices.iter().enumerate() {
        let bits = partition::index_bit_width(
            descriptor.num_subsets,
            fields.partition as usize,
            descriptor.index_bits,
            pixel,
        );
        cursor.write_bits(bits, index as u32);
    }

    cursor.bits.to_bytes()
}
