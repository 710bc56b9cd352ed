use crate::config::ConvertConfig;
use crate::{ChannelRole, RawAssets, RemappedAssets};
use image::Rgba;
use log::debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Uncompressed format the external compiler consumes.
pub(crate) const INTERMEDIATE_EXTENSION: &str = "tga";

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to decode image '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write image '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to create directory '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The catalog packs AO/roughness/metalness into RGB, the engine expects
/// metalness/roughness/AO:
///   AO R M      M R AO
///   0  1 2  ->  2 1 0
/// Components beyond the first three are left alone.
pub fn remap_arm_pixel(pixel: Rgba<u8>) -> Rgba<u8> {
    Rgba([pixel[2], pixel[1], pixel[0], pixel[3]])
}

fn convert_one(
    config: &ConvertConfig,
    path: &Path,
    role: ChannelRole,
) -> Result<PathBuf, ImageError> {
    let parent = if role.is_packed() {
        config.pbr_dir()
    } else {
        config.output_dir()
    };
    let dest = parent.join(format!("{}.{}", role.file_stem(), INTERMEDIATE_EXTENSION));
    std::fs::create_dir_all(&parent).map_err(|e| ImageError::Io {
        path: parent.clone(),
        source: e,
    })?;

    let img = image::open(path).map_err(|e| ImageError::Decode {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!("Converting {} to {}", path.display(), dest.display());
    if role.is_packed() {
        let mut rgba = img.to_rgba8();
        for pixel in rgba.pixels_mut() {
            *pixel = remap_arm_pixel(*pixel);
        }
        rgba.save(&dest).map_err(|e| ImageError::Write {
            path: dest.clone(),
            source: e,
        })?;
    } else {
        img.save(&dest).map_err(|e| ImageError::Write {
            path: dest.clone(),
            source: e,
        })?;
    }

    Ok(dest)
}

/// Re-encode the downloaded images into the intermediate format. Albedo and
/// normal are saved unchanged; the packed ARM map gets its channel order
/// remapped and lands in the PBR sub-folder.
pub fn remap_assets(config: &ConvertConfig, raw: &RawAssets) -> Result<RemappedAssets, ImageError> {
    Ok(RemappedAssets {
        albedo: convert_one(config, &raw.albedo, ChannelRole::Albedo)?,
        normal: convert_one(config, &raw.normal, ChannelRole::Normal)?,
        mrao: convert_one(config, &raw.mrao, ChannelRole::Mrao)?,
    })
}
