//! Untiling of whole block surfaces into linear images.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::error::{DataFormatError, DecompressError};
use crate::CompressionVariant;

trait BlockDecoder: Sync {
    type Texel: Copy + Send;

    const VARIANT: CompressionVariant;

    fn decode_block(&self, block: &[u8; 16]) -> Result<[Self::Texel; 16], DataFormatError>;
}

#[cfg(feature = "bc6h")]
struct BC6HDecoder {
    signed: bool,
}

#[cfg(feature = "bc7")]
struct BC7Decoder;

#[cfg(feature = "bc6h")]
impl BlockDecoder for BC6HDecoder {
    type Texel = crate::RgbHalf;

    const VARIANT: CompressionVariant = CompressionVariant::BC6H;

    #[inline(always)]
    fn decode_block(&self, block: &[u8; 16]) -> Result<[Self::Texel; 16], DataFormatError> {
        Ok(crate::bc6h::decode_block(block, self.signed))
    }
}

#[cfg(feature = "bc7")]
impl BlockDecoder for BC7Decoder {
    type Texel = crate::Rgba8;

    const VARIANT: CompressionVariant = CompressionVariant::BC7;

    #[inline(always)]
    fn decode_block(&self, block: &[u8; 16]) -> Result<[Self::Texel; 16], DataFormatError> {
        crate::bc7::decode_block(block)
    }
}

fn check_sizes(
    variant: CompressionVariant,
    width: u32,
    height: u32,
    input_len: usize,
    output_len: usize,
) -> Result<(), DecompressError> {
    let expected = variant.blocks_byte_size(width, height);
    if input_len != expected {
        return Err(DecompressError::InvalidInputSize {
            expected,
            actual: input_len,
        });
    }

    let expected = width as usize * height as usize * variant.channels();
    if output_len != expected {
        return Err(DecompressError::InvalidOutputSize {
            expected,
            actual: output_len,
        });
    }

    Ok(())
}

/// Decodes one row of blocks into the (up to) four image rows it covers.
fn decompress_block_row<D: BlockDecoder>(
    decoder: &D,
    block_row: usize,
    width: usize,
    blocks: &[u8],
    output: &mut [D::Texel],
) -> Result<(), DecompressError> {
    let blocks_x = width.div_ceil(4);
    let rows = output.len() / width;

    for (bx, block) in blocks.chunks_exact(16).enumerate() {
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(block);

        let texels =
            decoder
                .decode_block(&bytes)
                .map_err(|source| DecompressError::DataFormat {
                    block_index: block_row * blocks_x + bx,
                    source,
                })?;

        // Blocks on the right and bottom edge may hang over the image.
        let x = bx * 4;
        let columns = (width - x).min(4);
        for y in 0..rows {
            let start = y * width + x;
            output[start..start + columns].copy_from_slice(&texels[y * 4..y * 4 + columns]);
        }
    }

    Ok(())
}

fn decompress<D: BlockDecoder>(
    decoder: &D,
    width: u32,
    height: u32,
    input_bitstream: &[u8],
    output: &mut [D::Texel],
) -> Result<(), DecompressError> {
    if width == 0 || height == 0 {
        return Ok(());
    }

    let width = width as usize;
    let block_row_bytes = D::VARIANT.bytes_per_row(width as u32) as usize;
    let block_row_texels = width * 4;

    #[cfg(feature = "rayon")]
    {
        output
            .par_chunks_mut(block_row_texels)
            .zip(input_bitstream.par_chunks(block_row_bytes))
            .enumerate()
            .try_for_each(|(by, (rows, blocks))| {
                decompress_block_row(decoder, by, width, blocks, rows)
            })
    }

    #[cfg(not(feature = "rayon"))]
    {
        output
            .chunks_mut(block_row_texels)
            .zip(input_bitstream.chunks(block_row_bytes))
            .enumerate()
            .try_for_each(|(by, (rows, blocks))| {
                decompress_block_row(decoder, by, width, blocks, rows)
            })
    }
}

/// Decodes a BC7 surface into tightly packed RGBA8 data.
///
/// `input_bitstream` holds the blocks in row-major order and must be exactly
/// [`CompressionVariant::blocks_byte_size`] bytes long. `output` must hold
/// `width * height * 4` bytes.
///
/// Fails with [`DecompressError::DataFormat`] if any block uses the reserved
/// mode. With the `rayon` feature block rows are decoded in parallel, and the
/// reported block is then any one of the offending blocks.
#[cfg(feature = "bc7")]
#[cfg_attr(docsrs, doc(cfg(feature = "bc7")))]
pub fn decompress_blocks_bc7(
    width: u32,
    height: u32,
    input_bitstream: &[u8],
    output: &mut [u8],
) -> Result<(), DecompressError> {
    check_sizes(
        CompressionVariant::BC7,
        width,
        height,
        input_bitstream.len(),
        output.len(),
    )?;

    let output: &mut [crate::Rgba8] = bytemuck::cast_slice_mut(output);
    decompress(&BC7Decoder, width, height, input_bitstream, output)
}

/// Decodes a BC6H surface into tightly packed RGB half float data.
///
/// `output` must hold `width * height * 3` values. Blocks with an unknown mode
/// come out as magenta, so only size mismatches are reported.
#[cfg(feature = "bc6h")]
#[cfg_attr(docsrs, doc(cfg(feature = "bc6h")))]
pub fn decompress_blocks_bc6h(
    width: u32,
    height: u32,
    input_bitstream: &[u8],
    output: &mut [half::f16],
    signed: bool,
) -> Result<(), DecompressError> {
    check_sizes(
        CompressionVariant::BC6H,
        width,
        height,
        input_bitstream.len(),
        output.len(),
    )?;

    let output: &mut [crate::RgbHalf] = bytemuck::cast_slice_mut(output);
    decompress(
        &BC6HDecoder { signed },
        width,
        height,
        input_bitstream,
        output,
    )
}
