use bytemuck::{Pod, Zeroable};

/// An 8-bit per channel RGBA pixel, as produced by BC7.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(texel: Rgba8) -> Self {
        [texel.r, texel.g, texel.b, texel.a]
    }
}

/// A half float RGB pixel, as produced by BC6H.
#[cfg(feature = "bc6h")]
#[cfg_attr(docsrs, doc(cfg(feature = "bc6h")))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct RgbHalf {
    pub r: half::f16,
    pub g: half::f16,
    pub b: half::f16,
}

#[cfg(feature = "bc6h")]
impl RgbHalf {
    /// Output of every BC6H block with an unknown mode.
    pub const MAGENTA: Self = Self::new(half::f16::ONE, half::f16::ZERO, half::f16::ONE);

    pub const fn new(r: half::f16, g: half::f16, b: half::f16) -> Self {
        Self { r, g, b }
    }

    /// Builds a pixel from raw half float bit patterns.
    pub const fn from_bits(r: u16, g: u16, b: u16) -> Self {
        Self::new(
            half::f16::from_bits(r),
            half::f16::from_bits(g),
            half::f16::from_bits(b),
        )
    }

    pub fn to_f32(self) -> [f32; 3] {
        [self.r.to_f32(), self.g.to_f32(), self.b.to_f32()]
    }
}
