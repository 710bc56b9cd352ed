use crate::config::ConvertConfig;
use crate::{ChannelRole, CompiledAssets, RemappedAssets};
use haven_util::profile::Measure;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Engine-native compressed texture extension.
pub(crate) const NATIVE_EXTENSION: &str = "vtf";

#[derive(Debug, Error)]
pub enum CompilerError {
    #[error("failed to launch compiler '{path}': {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("compiler exited with {status} while converting '{path}'")]
    Failed {
        path: PathBuf,
        status: std::process::ExitStatus,
    },
    #[error("compiler reported success but produced no file at '{path}'")]
    OutputMissing { path: PathBuf },
}

/// The compiler is never asked where it wrote its output; this derives the
/// path from the naming convention the tool is configured with
/// (`{texture}_` prefix, role suffix, native extension). If the tool's
/// convention ever changes, the prediction diverges, which is why
/// [`compile`] verifies the file exists after the invocation.
pub fn expected_output_path(config: &ConvertConfig, texture: &str, role: ChannelRole) -> PathBuf {
    let parent = if role.is_packed() {
        config.pbr_dir()
    } else {
        config.output_dir()
    };
    parent.join(format!(
        "{}_{}.{}",
        texture,
        role.compiled_suffix(),
        NATIVE_EXTENSION
    ))
}

/// Invoke the external compiler on one intermediate image and return the
/// predicted output path once the file is confirmed to exist.
pub fn compile(
    config: &ConvertConfig,
    texture: &str,
    role: ChannelRole,
    source: &Path,
) -> Result<PathBuf, CompilerError> {
    let output = expected_output_path(config, texture, role);

    let mut command = Command::new(&config.compiler_path);
    if role.is_normal_map() {
        command.arg("-flag").arg("normal");
    }
    command
        .arg("-format")
        .arg(&config.compression_format)
        .arg("-prefix")
        .arg(format!("{}_", texture))
        .arg("-file")
        .arg(source);

    debug!("Invoking {:?}", command);
    let _measure = Measure::new(format!("Compiled {}", source.display()));
    let status = command.status().map_err(|e| CompilerError::Launch {
        path: config.compiler_path.clone(),
        source: e,
    })?;
    if !status.success() {
        return Err(CompilerError::Failed {
            path: source.to_path_buf(),
            status,
        });
    }
    if !output.exists() {
        return Err(CompilerError::OutputMissing { path: output });
    }

    Ok(output)
}

/// Compile all three intermediate images of one texture set.
pub fn compile_assets(
    config: &ConvertConfig,
    texture: &str,
    remapped: &RemappedAssets,
) -> Result<CompiledAssets, CompilerError> {
    Ok(CompiledAssets {
        albedo: compile(config, texture, ChannelRole::Albedo, &remapped.albedo)?,
        normal: compile(config, texture, ChannelRole::Normal, &remapped.normal)?,
        mrao: compile(config, texture, ChannelRole::Mrao, &remapped.mrao)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_follows_the_naming_convention() {
        let config = ConvertConfig::default();
        assert_eq!(
            expected_output_path(&config, "rock_face", ChannelRole::Albedo),
            PathBuf::from("materials/polyhaven/rock_face_albedo.vtf")
        );
        assert_eq!(
            expected_output_path(&config, "rock_face", ChannelRole::Normal),
            PathBuf::from("materials/polyhaven/rock_face_normal.vtf")
        );
        assert_eq!(
            expected_output_path(&config, "rock_face", ChannelRole::Mrao),
            PathBuf::from("materials/vistrace/pbr/rock_face_mrao.vtf")
        );
    }

    #[test]
    fn output_path_is_deterministic() {
        let config = ConvertConfig::default();
        for role in ChannelRole::ALL {
            assert_eq!(
                expected_output_path(&config, "rock_face", role),
                expected_output_path(&config, "rock_face", role)
            );
        }
    }

    #[test]
    fn missing_executable_is_a_launch_error() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ConvertConfig {
            materials_root: tmp.path().to_path_buf(),
            compiler_path: tmp.path().join("no_such_compiler"),
            ..ConvertConfig::default()
        };

        let source = tmp.path().join("albedo.tga");
        let err = compile(&config, "rock_face", ChannelRole::Albedo, &source).unwrap_err();
        assert!(matches!(err, CompilerError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_a_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ConvertConfig {
            materials_root: tmp.path().to_path_buf(),
            compiler_path: PathBuf::from("/bin/false"),
            ..ConvertConfig::default()
        };

        let source = tmp.path().join("albedo.tga");
        let err = compile(&config, "rock_face", ChannelRole::Albedo, &source).unwrap_err();
        assert!(matches!(err, CompilerError::Failed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn success_without_output_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ConvertConfig {
            materials_root: tmp.path().to_path_buf(),
            compiler_path: PathBuf::from("/bin/true"),
            ..ConvertConfig::default()
        };

        let source = tmp.path().join("albedo.tga");
        let err = compile(&config, "rock_face", ChannelRole::Albedo, &source).unwrap_err();
        assert!(matches!(err, CompilerError::OutputMissing { .. }));
    }
}
