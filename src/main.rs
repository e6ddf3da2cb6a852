use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::ProgressBar;
use log::info;

use rgbapng::png::{Bitmap, ChannelOrder, CompressionLevel, CompressorKind, EncoderOptions, PngEncoder};

/// Encode a raw 32-bit pixel dump as an RGBA PNG.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Raw interleaved pixels, four bytes each, row-major.
    input: PathBuf,

    #[arg(short, long)]
    output: PathBuf,

    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,

    /// Channel order of the input pixels.
    #[arg(long, value_enum, default_value_t = ChannelOrder::Rgba)]
    order: ChannelOrder,

    #[arg(long, value_enum, default_value_t = CompressorKind::Zlib)]
    compressor: CompressorKind,

    #[arg(long, value_enum, default_value_t = CompressionLevel::Maximum)]
    level: CompressionLevel,

    /// Filter rows on a single thread.
    #[arg(long)]
    sequential: bool,

    /// Hide the progress bar.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let pb = if args.quiet { ProgressBar::hidden() } else { ProgressBar::new(5) };

    pb.set_message(format!("Reading pixels {}", args.input.display()));
    let raw = std::fs::read(&args.input)
        .with_context(|| format!("Could not read file {}", args.input.display()))?;
    let bitmap = Bitmap::from_bytes(args.width, args.height, args.order, &raw)
        .with_context(|| format!("{} is not a {}x{} pixel dump", args.input.display(), args.width, args.height))?;
    drop(raw);
    pb.inc(1);

    let options = EncoderOptions {
        compressor: args.compressor,
        level: args.level,
        parallel: !args.sequential,
    };
    let encoder = PngEncoder::new(options).with_progress(pb.clone());
    let bytes = encoder.encode(&bitmap).context("Could not encode image")?;

    pb.set_message(format!("Writing image {}", args.output.display()));
    std::fs::write(&args.output, &bytes)
        .with_context(|| format!("Could not create file {}", args.output.display()))?;
    pb.inc(1);
    pb.finish_with_message("Done");

    info!(
        "wrote {} ({} bytes, {:?} at {:?})",
        args.output.display(),
        bytes.len(),
        args.compressor,
        args.level
    );

    Ok(())
}
