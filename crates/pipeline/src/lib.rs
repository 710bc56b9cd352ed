pub mod catalog;
pub mod compiler;
pub mod config;
pub mod fetch;
pub mod material;
pub mod remap;

use crate::catalog::CatalogError;
use crate::compiler::CompilerError;
use crate::config::{ConvertConfig, FailurePolicy};
use crate::fetch::DownloadError;
use crate::material::MaterialError;
use crate::remap::ImageError;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One of the three images making up a texture set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelRole {
    Albedo,
    Normal,
    /// The packed ambient-occlusion/roughness/metalness map.
    Mrao,
}

impl ChannelRole {
    pub const ALL: [ChannelRole; 3] = [ChannelRole::Albedo, ChannelRole::Normal, ChannelRole::Mrao];

    /// Key of this channel in the catalog listing.
    pub fn catalog_key(self) -> &'static str {
        match self {
            ChannelRole::Albedo => "Diffuse",
            ChannelRole::Normal => "nor_dx",
            ChannelRole::Mrao => "arm",
        }
    }

    /// Stem of the raw and intermediate files on disk.
    pub fn file_stem(self) -> &'static str {
        match self {
            ChannelRole::Albedo => "albedo",
            ChannelRole::Normal => "normal",
            ChannelRole::Mrao => "albedo_mrao",
        }
    }

    /// Suffix the compiler appends to the texture identifier.
    pub fn compiled_suffix(self) -> &'static str {
        match self {
            ChannelRole::Albedo => "albedo",
            ChannelRole::Normal => "normal",
            ChannelRole::Mrao => "mrao",
        }
    }

    /// Whether the compiler must encode this image with normal-map
    /// semantics.
    pub fn is_normal_map(self) -> bool {
        matches!(self, ChannelRole::Normal)
    }

    /// Whether this image goes through the channel remap and lands in the
    /// PBR sub-folder.
    pub fn is_packed(self) -> bool {
        matches!(self, ChannelRole::Mrao)
    }
}

/// Downloaded files in the source format, one per channel role.
#[derive(Debug, Clone)]
pub struct RawAssets {
    pub albedo: PathBuf,
    pub normal: PathBuf,
    pub mrao: PathBuf,
}

/// Intermediate-format files ready for the external compiler.
#[derive(Debug, Clone)]
pub struct RemappedAssets {
    pub albedo: PathBuf,
    pub normal: PathBuf,
    pub mrao: PathBuf,
}

/// Engine-native compiled textures.
#[derive(Debug, Clone)]
pub struct CompiledAssets {
    pub albedo: PathBuf,
    pub normal: PathBuf,
    pub mrao: PathBuf,
}

impl RawAssets {
    pub fn paths(&self) -> [&Path; 3] {
        [
            self.albedo.as_path(),
            self.normal.as_path(),
            self.mrao.as_path(),
        ]
    }
}

impl RemappedAssets {
    pub fn paths(&self) -> [&Path; 3] {
        [
            self.albedo.as_path(),
            self.normal.as_path(),
            self.mrao.as_path(),
        ]
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("catalog lookup failed: {0}")]
    Catalog(#[from] CatalogError),
    #[error("download failed: {0}")]
    Download(#[from] DownloadError),
    #[error("image conversion failed: {0}")]
    Image(#[from] ImageError),
    #[error("texture compilation failed: {0}")]
    Compiler(#[from] CompilerError),
    #[error("material write failed: {0}")]
    Material(#[from] MaterialError),
    #[error("failed to construct HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Per-identifier outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, ConvertError)>,
}

impl BatchReport {
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }

    /// End-of-run summary, one line per identifier.
    pub fn log_summary(&self) {
        info!(
            "Batch finished: {} succeeded, {} failed",
            self.succeeded.len(),
            self.failed.len()
        );
        for texture in &self.succeeded {
            info!("  ok     {}", texture);
        }
        for (texture, err) in &self.failed {
            error!("  failed {}: {}", texture, err);
        }
    }
}

/// The conversion pipeline: one configuration and one HTTP client, used
/// sequentially for every texture identifier.
pub struct Pipeline {
    config: ConvertConfig,
    client: reqwest::blocking::Client,
}

impl Pipeline {
    pub fn new(config: ConvertConfig) -> Result<Self, ConvertError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Run the full pipeline for one texture identifier:
    /// resolve -> fetch -> remap -> drop raw files -> compile -> drop
    /// intermediate files -> write material. A stage's inputs are removed
    /// only after that stage succeeded; on failure everything already
    /// produced is left in place for inspection.
    pub fn convert_texture(&self, texture: &str) -> Result<CompiledAssets, ConvertError> {
        info!("Converting texture '{}'", texture);

        let urls = catalog::resolve(&self.client, &self.config, texture)?;
        let raw = fetch::download_assets(&self.client, &self.config, &urls)?;
        let remapped = remap::remap_assets(&self.config, &raw)?;
        remove_stage_files(raw.paths());

        let compiled = compiler::compile_assets(&self.config, texture, &remapped)?;
        remove_stage_files(remapped.paths());

        material::write_material(&self.config, texture, &compiled)?;
        info!("Finished texture '{}'", texture);

        Ok(compiled)
    }

    /// Process identifiers one after another. Under
    /// [`FailurePolicy::ContinueOnError`] a failing identifier is recorded
    /// and the batch moves on; under
    /// [`FailurePolicy::AbortOnFirstError`] the batch stops there.
    pub fn run_batch(&self, textures: &[String]) -> BatchReport {
        let mut report = BatchReport::default();
        for texture in textures {
            match self.convert_texture(texture) {
                Ok(_) => report.succeeded.push(texture.clone()),
                Err(err) => {
                    error!("Conversion of '{}' failed: {}", texture, err);
                    report.failed.push((texture.clone(), err));
                    if self.config.failure_policy == FailurePolicy::AbortOnFirstError {
                        warn!("Aborting the batch after the first failure");
                        break;
                    }
                }
            }
        }
        report
    }
}

/// Best-effort removal of a superseded stage's files. Called only after the
/// next stage has fully succeeded.
fn remove_stage_files(paths: [&Path; 3]) {
    for path in paths {
        if let Err(err) = std::fs::remove_file(path) {
            warn!("Failed to remove '{}': {}", path.display(), err);
        }
    }
}
