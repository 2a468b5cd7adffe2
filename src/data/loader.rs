//! Load a directory of images into an [`ImageFeed`]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::GrayImage;
use ndarray::Array2;
use rayon::prelude::*;

use crate::data::{ImageFeed, ImageRecord};

/// File extensions picked up when scanning a directory
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Convert an 8-bit grayscale buffer into a rows x columns intensity matrix
pub fn gray_to_matrix(image: &GrayImage) -> Array2<f32> {
    let (width, height) = image.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
        image.get_pixel(col as u32, row as u32)[0] as f32
    })
}

/// Decode one file to grayscale and resize it to `side` x `side`
pub fn load_image(path: &Path, side: u32) -> Result<Array2<f32>> {
    let decoded = image::open(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    let gray = decoded.to_luma8();
    let resized = image::imageops::resize(&gray, side, side, FilterType::CatmullRom);
    Ok(gray_to_matrix(&resized))
}

/// Load every image in `dir`, keyed by file name.
///
/// Files that fail to decode are skipped with a warning and never reach the
/// feed.
pub fn load_images(dir: &Path, side: u32) -> Result<ImageFeed> {
    log::info!("Loading images from {}", dir.display());

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_image_extension(path))
        .collect();
    paths.sort();

    log::debug!("Found {} candidate image files", paths.len());

    let decoded: Vec<Option<ImageRecord>> = paths
        .par_iter()
        .map(|path| {
            let id = path.file_name()?.to_string_lossy().into_owned();
            match load_image(path, side) {
                Ok(matrix) => Some(ImageRecord::new(id, matrix)),
                Err(err) => {
                    log::warn!("Excluding {}: {:#}", id, err);
                    None
                }
            }
        })
        .collect();

    let mut feed = ImageFeed::new();
    for record in decoded.into_iter().flatten() {
        feed.insert(record)?;
    }

    log::info!(
        "Loaded {} of {} images at {}x{}",
        feed.len(),
        paths.len(),
        side,
        side
    );

    Ok(feed)
}
