use std::{fs::File, io::BufReader, path::PathBuf, time::Instant};

use bptc::{
    decode::{decompress_blocks_bc6h, decompress_blocks_bc7},
    half::f16,
    CompressionVariant,
};
use ddsfile::{Dds, DxgiFormat};
use image::RgbaImage;

struct Args {
    file_name: String,
    signed: bool,
}

fn main() {
    let args = match parse_args() {
        Some(args) => args,
        None => return,
    };

    let start = Instant::now();

    let dds = read_dds_file(&args.file_name);
    let width = dds.get_width();
    let height = dds.get_height();

    let duration = start.elapsed();
    println!("DDS read took: {:.3} ms", duration.as_secs_f64() * 1000.0);

    let Some((variant, signed)) = dds.get_dxgi_format().and_then(variant_of) else {
        println!("Error: Unsupported DXGI format {:?}", dds.get_dxgi_format());
        return;
    };
    let signed = signed || args.signed;

    let data = dds.get_data(0).expect("DDS file has no data");
    let top_level = &data[..variant.blocks_byte_size(width, height).min(data.len())];

    let start = Instant::now();

    let rgba = match variant {
        CompressionVariant::BC7 => {
            let mut rgba = vec![0u8; width as usize * height as usize * 4];
            decompress_blocks_bc7(width, height, top_level, &mut rgba)
                .expect("failed to decode BC7 blocks");
            rgba
        }
        CompressionVariant::BC6H => {
            let mut rgb = vec![f16::ZERO; width as usize * height as usize * 3];
            decompress_blocks_bc6h(width, height, top_level, &mut rgb, signed)
                .expect("failed to decode BC6H blocks");
            rgb_f16_to_rgba8(&rgb)
        }
    };

    let duration = start.elapsed();
    println!(
        "Block decoding ({variant:?}) took: {:.3} ms",
        duration.as_secs_f64() * 1000.0
    );

    let start = Instant::now();

    write_png_file(&args.file_name, width, height, rgba);

    let duration = start.elapsed();
    println!(
        "PNG output to disk took: {:.3} ms",
        duration.as_secs_f64() * 1000.0
    );
}

fn read_dds_file(file_name: &str) -> Dds {
    let file = File::open(file_name).expect("can't open input file");
    Dds::read(&mut BufReader::new(file)).expect("can't parse DDS file")
}

/// Maps a DXGI format to the variant and signedness used to decode it.
fn variant_of(format: DxgiFormat) -> Option<(CompressionVariant, bool)> {
    match format {
        DxgiFormat::BC7_Typeless | DxgiFormat::BC7_UNorm | DxgiFormat::BC7_UNorm_sRGB => {
            Some((CompressionVariant::BC7, false))
        }
        DxgiFormat::BC6H_Typeless | DxgiFormat::BC6H_UF16 => {
            Some((CompressionVariant::BC6H, false))
        }
        DxgiFormat::BC6H_SF16 => Some((CompressionVariant::BC6H, true)),
        _ => None,
    }
}

fn rgb_f16_to_rgba8(rgb: &[f16]) -> Vec<u8> {
    rgb.chunks_exact(3)
        .flat_map(|pixel| {
            [
                linear_to_srgb(pixel[0].to_f64()),
                linear_to_srgb(pixel[1].to_f64()),
                linear_to_srgb(pixel[2].to_f64()),
                255,
            ]
        })
        .collect()
}

fn linear_to_srgb(linear: f64) -> u8 {
    let v = linear.clamp(0.0, 1.0);
    let srgb = if v <= 0.0031308 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    (srgb * 255.0).round() as u8
}

fn write_png_file(file_name: &str, width: u32, height: u32, rgba: Vec<u8>) {
    let image = RgbaImage::from_raw(width, height, rgba).expect("image buffer has the wrong size");

    let mut png_name = PathBuf::from(file_name);
    png_name.set_extension("png");

    image.save(png_name).expect("failed to write PNG file");
}

fn print_help() {
    println!("Usage: decompressor <input_file> [--signed]");
    println!("\nThe input must be a DDS file holding one of:");
    println!("  BC6H_UF16 / BC6H_SF16 - BC6H (RGB HDR), written clamped to [0, 1]");
    println!("  BC7_UNorm / BC7_UNorm_sRGB - BC7 (RGBA)");
    println!("\nOptions:");
    println!("  --signed - decode BC6H blocks as signed even if the format says otherwise");
}

fn parse_args() -> Option<Args> {
    let args: Vec<String> = std::env::args().collect();

    if !(2..=3).contains(&args.len()) || args.contains(&"--help".to_string()) {
        print_help();
        return None;
    }

    let signed = match args.get(2).map(|arg| arg.to_lowercase()) {
        None => false,
        Some(flag) if flag == "--signed" => true,
        Some(_) => {
            println!("Error: Invalid option");
            print_help();
            return None;
        }
    };

    let file_name = args[1].clone();

    Some(Args { file_name, signed })
}
