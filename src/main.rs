use anyhow::{Context, Result};
use clap::Parser;
use palettegen::{export::PaletteExport, ExtractionConfig, Palette};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Extract a ranked, perceptually diverse color palette from images
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image paths
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Number of colors to extract
    #[arg(short = 'k', long)]
    count: Option<usize>,

    /// Largest side of the working resolution images are shrunk to
    #[arg(long)]
    max_dimension: Option<u32>,

    /// Width of a color bucket along each channel
    #[arg(long)]
    bucket_size: Option<u8>,

    /// JSON file with extraction settings, overridden by the other options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only use the given region of each image, as x,y,width,height
    #[arg(long, value_parser = parse_region)]
    region: Option<Region>,

    /// Print the palette as a JSON export document
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy)]
struct Region {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

fn parse_region(value: &str) -> Result<Region, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<u32>().map_err(|e| format!("`{part}`: {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    match parts[..] {
        [x, y, width, height] => Ok(Region { x, y, width, height }),
        _ => Err(format!("expected x,y,width,height, got `{value}`")),
    }
}

fn load_config(args: &Args) -> Result<ExtractionConfig> {
    let mut config = match &args.config {
        Some(path) => ExtractionConfig::from_json_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => ExtractionConfig::default(),
    };

    if let Some(count) = args.count {
        config.color_count = count;
    }

    if let Some(max_dimension) = args.max_dimension {
        config.max_dimension = max_dimension;
    }

    if let Some(bucket_size) = args.bucket_size {
        config.bucket_size = bucket_size;
    }

    config.validate().context("invalid extraction settings")?;
    Ok(config)
}

fn extract(path: &Path, config: ExtractionConfig, region: Option<Region>) -> Result<Palette> {
    let mut builder = Palette::from_path(path)?.config(config);

    if let Some(Region { x, y, width, height }) = region {
        builder = builder.region(x, y, width, height);
    }

    Ok(builder.generate()?)
}

fn print_swatches(palette: &Palette) {
    if palette.is_empty() {
        println!("  no opaque pixels");
        return;
    }

    for (index, swatch) in palette.iter().enumerate() {
        println!("  {}. {}  {}", index + 1, swatch.hex(), swatch.rgb_string());
    }
}

fn run(args: &Args) -> Result<bool> {
    let config = load_config(args)?;
    let mut all_succeeded = true;

    for path in &args.images {
        match extract(path, config, args.region) {
            Ok(palette) if args.json => println!("{}", PaletteExport::now(&palette).to_json_pretty()?),
            Ok(palette) => {
                println!("{}", path.display());
                print_swatches(&palette);
            }
            Err(e) => {
                eprintln!("{}: {e:#}", path.display());
                all_succeeded = false;
            }
        }
    }

    Ok(all_succeeded)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
