use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use rayon::prelude::*;

use td3_extract::archive::{self, PlayDisk};
use td3_extract::error::TdExtractError;
use td3_extract::patch;

#[derive(Parser)]
#[command(name = "td3extract", about = "Extract and patch a 1990s DOS racing game's asset archives")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract every engine/car/scene asset into the current directory.
    #[command(name = "x")]
    Extract,
    /// Patch TD3.EXE -> TD3_U.EXE to bypass archived asset lookup.
    #[command(name = "p")]
    Patch,
    /// Decompress a single LZW-encoded file to raw bytes.
    #[command(name = "d")]
    Decode { input: PathBuf, output: PathBuf },
    /// Decode an LZW+RLE paletted image to a PNG file.
    ImgDecode {
        input: PathBuf,
        width: usize,
        palette: PathBuf,
        output: PathBuf,
    },
    /// Encode a paletted PNG back to an LZW+RLE stream.
    ImgEncode { input: PathBuf, output: PathBuf },
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let result = match args.command {
        Command::Extract => extract(Path::new(".")),
        Command::Patch => run_patch(Path::new("TD3.EXE"), Path::new("TD3_U.EXE")),
        Command::Decode { input, output } => decode_file(&input, &output),
        Command::ImgDecode { input, width, palette, output } => img_decode(&input, width, &palette, &output),
        Command::ImgEncode { input, output } => img_encode(&input, &output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn extract(dir: &Path) -> Result<(), TdExtractError> {
    let playdisk_path = dir.join("PLAYDISK.DAT");
    let playdisk_buf = fs::read(&playdisk_path)
        .map_err(|e| TdExtractError::Other(format!("reading {}: {e}", playdisk_path.display())))?;
    let playdisk = PlayDisk::parse(&playdisk_buf)?;

    let exe_path = dir.join("TD3.EXE");
    let exe = fs::read(&exe_path).map_err(|e| TdExtractError::Other(format!("reading {}: {e}", exe_path.display())))?;

    println!("{} engine files", "Extracting".green().bold());
    let written = archive::extract_engine_files(&exe, dir, dir)?;
    for path in &written {
        println!("  {}", path.display());
    }

    println!("{} {} car archives", "Extracting".green().bold(), playdisk.cars.len());
    let car_results: Vec<_> = playdisk
        .cars
        .par_iter()
        .map(|car| (car, archive::extract_car_files(car, dir, dir)))
        .collect();
    for (car, result) in car_results {
        match result {
            Ok(written) => {
                println!("  {car}: {} files", written.len());
            }
            Err(e) => println!("  {} {car}: {e}", "Failed".red().bold()),
        }
    }

    println!("{} {} scene archives", "Extracting".green().bold(), playdisk.scenes.len());
    let scene_results: Vec<_> = playdisk
        .scenes
        .par_iter()
        .map(|scene| (scene, archive::extract_scene_files(scene, dir, dir)))
        .collect();
    for (scene, result) in scene_results {
        match result {
            Ok(written) => {
                println!("  {scene}: {} files", written.len());
            }
            Err(e) => println!("  {} {scene}: {e}", "Failed".red().bold()),
        }
    }

    Ok(())
}

fn run_patch(exe_path: &Path, out_path: &Path) -> Result<(), TdExtractError> {
    let offset = patch::patch_executable(exe_path, out_path)?;
    println!("Found record table at {offset:#x}");
    println!("{} {} -> {}", "Patched".green().bold(), exe_path.display(), out_path.display());
    Ok(())
}

fn decode_file(input: &Path, output: &Path) -> Result<(), TdExtractError> {
    let data = fs::read(input).map_err(|e| TdExtractError::Other(format!("reading {}: {e}", input.display())))?;
    let decoded = td3_extract::lzw::decode(&data);
    fs::write(output, &decoded).map_err(|e| TdExtractError::Other(format!("writing {}: {e}", output.display())))?;
    println!("{} {} -> {}", "Decoded".green().bold(), input.display(), output.display());
    Ok(())
}

#[cfg(feature = "to_image")]
fn img_decode(input: &Path, width: usize, palette: &Path, output: &Path) -> Result<(), TdExtractError> {
    let lzw_data = fs::read(input).map_err(|e| TdExtractError::Other(format!("reading {}: {e}", input.display())))?;
    let palette_data =
        fs::read(palette).map_err(|e| TdExtractError::Other(format!("reading {}: {e}", palette.display())))?;
    let image = td3_extract::image::decode(&lzw_data, width, &palette_data)?;
    td3_extract::png_io::write_indexed_png(output, image.width, image.height, &image.indices, &image.palette)?;
    println!("{} {} -> {}", "Decoded".green().bold(), input.display(), output.display());
    Ok(())
}

#[cfg(not(feature = "to_image"))]
fn img_decode(_input: &Path, _width: usize, _palette: &Path, _output: &Path) -> Result<(), TdExtractError> {
    Err(TdExtractError::Other("built without the `to_image` feature".to_string()))
}

#[cfg(feature = "to_image")]
fn img_encode(input: &Path, output: &Path) -> Result<(), TdExtractError> {
    let (width, height, indices, _palette) = td3_extract::png_io::read_indexed_png(input)?;
    let encoded = td3_extract::image::encode(&indices, width, height)?;
    fs::write(output, &encoded).map_err(|e| TdExtractError::Other(format!("writing {}: {e}", output.display())))?;
    println!("{} {} -> {}", "Encoded".green().bold(), input.display(), output.display());
    Ok(())
}

#[cfg(not(feature = "to_image"))]
fn img_encode(_input: &Path, _output: &Path) -> Result<(), TdExtractError> {
    Err(TdExtractError::Other("built without the `to_image` feature".to_string()))
}
