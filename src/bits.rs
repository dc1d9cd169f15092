//! 128-bit block storage with masked field access.
//!
//! A BPTC block is numbered from bit 0 (the least significant bit of byte 0)
//! up to bit 127. The block is held as two little-endian `u64` halves so that
//! every field extraction is at most two shifts and a mask.

/// A 128-bit register made of two little-endian 64-bit halves.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct BitField128 {
    /// Bits 0..64.
    pub low: u64,
    /// Bits 64..128.
    pub high: u64,
}

#[inline(always)]
const fn mask(bit_count: u32) -> u64 {
    if bit_count >= 64 {
        u64::MAX
    } else {
        (1u64 << bit_count) - 1
    }
}

impl BitField128 {
    /// Creates an all-zero register.
    pub const fn new() -> Self {
        Self { low: 0, high: 0 }
    }

    /// Splits a 16 byte block into its two little-endian halves.
    pub fn from_bytes(block: &[u8; 16]) -> Self {
        let mut low = [0u8; 8];
        let mut high = [0u8; 8];
        low.copy_from_slice(&block[..8]);
        high.copy_from_slice(&block[8..]);

        Self {
            low: u64::from_le_bytes(low),
            high: u64::from_le_bytes(high),
        }
    }

    /// Writes the register back as a 16 byte block.
    pub fn to_bytes(self) -> [u8; 16] {
        let mut block = [0u8; 16];
        block[..8].copy_from_slice(&self.low.to_le_bytes());
        block[8..].copy_from_slice(&self.high.to_le_bytes());
        block
    }

    /// Returns `bit_count` bits starting at absolute bit `index`.
    ///
    /// Requires `1 <= bit_count <= 64` and `index + bit_count <= 128`.
    #[inline]
    pub fn extract(&self, index: u32, bit_count: u32) -> u64 {
        debug_assert!((1..=64).contains(&bit_count), "bit count {bit_count}");
        debug_assert!(index + bit_count <= 128, "field {index}+{bit_count}");

        let value = if index >= 64 {
            self.high >> (index - 64)
        } else if index == 0 {
            self.low
        } else {
            // The upper half contributes once the span reaches past bit 64.
            (self.low >> index) | (self.high << (64 - index))
        };

        value & mask(bit_count)
    }

    /// Clears `bit_count` bits at absolute bit `index` and writes `value` there.
    ///
    /// Bits of `value` above `bit_count` are discarded.
    #[inline]
    pub fn store(&mut self, index: u32, bit_count: u32, value: u64) {
        debug_assert!((1..=64).contains(&bit_count), "bit count {bit_count}");
        debug_assert!(index + bit_count <= 128, "field {index}+{bit_count}");

        let field = mask(bit_count);
        let value = value & field;

        if index >= 64 {
            let shift = index - 64;
            self.high = (self.high & !(field << shift)) | (value << shift);
            return;
        }

        self.low = (self.low & !(field << index)) | (value << index);

        if index + bit_count > 64 {
            let spill = 64 - index;
            let high_mask = mask(bit_count - spill);
            self.high = (self.high & !high_mask) | (value >> spill);
        }
    }
}

impl From<[u8; 16]> for BitField128 {
    fn from(block: [u8; 16]) -> Self {
        Self::from_bytes(&block)
    }
}

impl From<BitField128> for [u8; 16] {
    fn from(bits: BitField128) -> Self {
        bits.to_bytes()
    }
}

/// Sequential cursor over a [`BitField128`].
///
/// Both block formats lay out their fields back to back, so the codecs walk a
/// block front to back instead of computing every offset up front.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct BitCursor {
    pub(crate) bits: BitField128,
    position: u32,
}

impl BitCursor {
    pub(crate) fn new(bits: BitField128) -> Self {
        Self { bits, position: 0 }
    }

    pub(crate) fn position(&self) -> u32 {
        self.position
    }

    #[inline]
    pub(crate) fn read_bits(&mut self, num_bits: u32) -> u32 {
        if num_bits == 0 {
            return 0;
        }
        let value = self.bits.extract(self.position, num_bits) as u32;
        self.position += num_bits;
        value
    }

    #[inline]
    pub(crate) fn read_bit(&mut self) -> u32 {
        self.read_bits(1)
    }

    #[inline]
    pub(crate) fn write_bits(&mut self, num_bits: u32, value: u32) {
        if num_bits == 0 {
            return;
        }
        self.bits.store(self.position, num_bits, value as u64);
        self.position += num_bits;
    }

    #[inline]
    pub(crate) fn write_bit(&mut self, value: u32) {
        self.write_bits(1, value)
    }
}
