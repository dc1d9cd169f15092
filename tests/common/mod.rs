#![allow(dead_code)]

use bptc::bc7::{self, Bc7Fields};

pub mod metrics;

/// Deterministic xorshift bytes, so failures can be reproduced from the seed.
pub fn pseudo_random_bytes(count: usize, seed: u64) -> Vec<u8> {
    let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

/// Random BC7 blocks that never select the reserved mode.
pub fn random_bc7_blocks(count: usize, seed: u64) -> Vec<u8> {
    let mut blocks = pseudo_random_bytes(count * 16, seed);
    for block in blocks.chunks_exact_mut(16) {
        if block[0] == 0 {
            block[0] = 0x40;
        }
    }
    blocks
}

/// Random BC6H block with the mode prefix replaced by `code`.
pub fn random_bc6h_block(code: u8, seed: u64) -> [u8; 16] {
    let mut block = [0u8; 16];
    block.copy_from_slice(&pseudo_random_bytes(16, seed));

    let prefix_mask = if code < 2 { 0b11 } else { 0b11111 };
    block[0] = (block[0] & !prefix_mask) | code;
    block
}

/// Horizontal RGBA gradient whose channels all rise together.
pub fn gradient_image(width: u32, height: u32) -> Vec<u8> {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..height {
        for x in 0..width {
            let s = (x * 255 / (width - 1).max(1)) as u8;
            rgba.extend_from_slice(&[s, s / 2 + 32, s / 4 + 16, 255]);
        }
    }
    rgba
}

/// Fits every block of an RGBA8 image with BC7 mode 6 along the line between
/// the per-channel minimum and maximum of the block.
pub fn encode_bc7_mode6(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
    let blocks_x = width.div_ceil(4);
    let blocks_y = height.div_ceil(4);
    let mut blocks = Vec::with_capacity((blocks_x * blocks_y * 16) as usize);

    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let mut pixels = [[0i32; 4]; 16];
            for (i, pixel) in pixels.iter_mut().enumerate() {
                let x = (bx * 4 + i as u32 % 4).min(width - 1);
                let y = (by * 4 + i as u32 / 4).min(height - 1);
                let offset = ((y * width + x) * 4) as usize;
                for c in 0..4 {
                    pixel[c] = rgba[offset + c] as i32;
                }
            }
            blocks.extend_from_slice(&fit_mode6(&pixels));
        }
    }

    blocks
}

fn quantize_endpoint(color: [i32; 4]) -> ([u8; 4], u8) {
    let odd = color.iter().filter(|&&c| c & 1 == 1).count();
    let pbit = u8::from(odd >= 2);
    let stored = color.map(|c| ((c - pbit as i32).max(0) >> 1) as u8);
    (stored, pbit)
}

fn fit_mode6(pixels: &[[i32; 4]; 16]) -> [u8; 16] {
    let mut low = [255i32; 4];
    let mut high = [0i32; 4];
    for pixel in pixels {
        for c in 0..4 {
            low[c] = low[c].min(pixel[c]);
            high[c] = high[c].max(pixel[c]);
        }
    }

    let axis: [i32; 4] = std::array::from_fn(|c| high[c] - low[c]);
    let length: i32 = axis.iter().map(|a| a * a).sum();

    let mut indices = [0u8; 16];
    if length > 0 {
        for (index, pixel) in indices.iter_mut().zip(pixels) {
            let projection: i32 = (0..4).map(|c| (pixel[c] - low[c]) * axis[c]).sum();
            *index = ((projection * 15 + length / 2) / length).clamp(0, 15) as u8;
        }
    }

    let (mut e0, mut p0) = quantize_endpoint(low);
    let (mut e1, mut p1) = quantize_endpoint(high);

    // The anchor index must leave its top bit clear.
    if indices[0] >= 8 {
        std::mem::swap(&mut e0, &mut e1);
        std::mem::swap(&mut p0, &mut p1);
        indices.iter_mut().for_each(|index| *index = 15 - *index);
    }

    bc7::pack(&Bc7Fields::Mode6 {
        endpoints: [e0, e1],
        pbits: [p0, p1],
        indices,
    })
}
