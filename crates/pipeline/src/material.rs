use crate::config::ConvertConfig;
use crate::CompiledAssets;
use log::debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("failed to write material file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn base_name(path: &Path) -> &str {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
}

fn render(folder: &str, albedo: &str, normal: &str) -> String {
    format!(
        "\"VertexLitGeneric\"\n\
         {{\n\
         \t\"$basetexture\"          \"{folder}/{albedo}\"\n\
         \t\"$bumpmap\"              \"{folder}/{normal}\"\n\
         \t\"$bumptransform\"        \"center .5 .5 scale 1 1 rotate 0 translate 0 0\"\n\
         \t\"$basetexturetransform\" \"center .5 .5 scale 1 1 rotate 0 translate 0 0\"\n\
         }}\n"
    )
}

/// Write the material descriptor referencing the compiled albedo and normal
/// textures by base name. The engine re-reads this file; this tool never
/// does.
pub fn write_material(
    config: &ConvertConfig,
    texture: &str,
    compiled: &CompiledAssets,
) -> Result<PathBuf, MaterialError> {
    let path = config.output_dir().join(format!("{}.vmt", texture));
    let body = render(
        &config.output_subdir,
        base_name(&compiled.albedo),
        base_name(&compiled.normal),
    );

    debug!("Writing material {}", path.display());
    std::fs::write(&path, body).map_err(|e| MaterialError::Write {
        path: path.clone(),
        source: e,
    })?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_references_compiled_base_names() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ConvertConfig {
            materials_root: tmp.path().to_path_buf(),
            ..ConvertConfig::default()
        };
        std::fs::create_dir_all(config.output_dir()).unwrap();

        let compiled = CompiledAssets {
            albedo: config.output_dir().join("rock_face_albedo.vtf"),
            normal: config.output_dir().join("rock_face_normal.vtf"),
            mrao: config.pbr_dir().join("rock_face_mrao.vtf"),
        };

        let path = write_material(&config, "rock_face", &compiled).unwrap();
        assert_eq!(path, config.output_dir().join("rock_face.vmt"));

        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("\"$basetexture\"          \"polyhaven/rock_face_albedo\""));
        assert!(body.contains("\"$bumpmap\"              \"polyhaven/rock_face_normal\""));
        // Every quote must be balanced.
        assert_eq!(body.matches('"').count() % 2, 0);
    }

    #[test]
    fn unwritable_destination_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ConvertConfig {
            materials_root: tmp.path().to_path_buf(),
            ..ConvertConfig::default()
        };
        // Output directory deliberately not created.

        let compiled = CompiledAssets {
            albedo: PathBuf::from("rock_face_albedo.vtf"),
            normal: PathBuf::from("rock_face_normal.vtf"),
            mrao: PathBuf::from("rock_face_mrao.vtf"),
        };

        let err = write_material(&config, "rock_face", &compiled).unwrap_err();
        assert!(matches!(err, MaterialError::Write { .. }));
    }
}
