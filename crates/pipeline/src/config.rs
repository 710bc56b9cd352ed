use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// What the batch runner does after a texture fails to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report the failure and move on to the next identifier.
    ContinueOnError,
    /// Stop the whole batch at the first failing identifier.
    AbortOnFirstError,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::ContinueOnError
    }
}

/// All process-wide knobs of the conversion pipeline. Every component takes
/// this by reference, so tests can substitute a fixture configuration
/// instead of patching globals.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Base URL of the catalog API.
    pub catalog_url: Url,
    /// Resolution key used when indexing the catalog listing.
    pub resolution: String,
    /// File-format key used when indexing the catalog listing. Also the
    /// extension of the downloaded files.
    pub source_format: String,
    /// Root of the materials tree everything is written under.
    pub materials_root: PathBuf,
    /// Sub-folder for albedo/normal textures and the material file.
    pub output_subdir: String,
    /// Sub-folder for the packed MRAO texture.
    pub pbr_subdir: String,
    /// The external VTF compiler executable.
    pub compiler_path: PathBuf,
    /// Compression format selector passed to the compiler.
    pub compression_format: String,
    /// Bound on every catalog query and download.
    pub http_timeout: Duration,
    pub failure_policy: FailurePolicy,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            catalog_url: Url::parse("https://api.polyhaven.com")
                .expect("default catalog URL is valid"),
            resolution: "2k".to_string(),
            source_format: "png".to_string(),
            materials_root: PathBuf::from("materials"),
            output_subdir: "polyhaven".to_string(),
            pbr_subdir: "vistrace/pbr".to_string(),
            compiler_path: PathBuf::from("bin/VTFCmd.exe"),
            compression_format: "dxt5".to_string(),
            http_timeout: Duration::from_secs(60),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl ConvertConfig {
    /// Directory holding downloads, albedo/normal outputs and the material.
    pub fn output_dir(&self) -> PathBuf {
        self.materials_root.join(&self.output_subdir)
    }

    /// Directory holding the packed MRAO outputs.
    pub fn pbr_dir(&self) -> PathBuf {
        self.materials_root.join(&self.pbr_subdir)
    }
}
