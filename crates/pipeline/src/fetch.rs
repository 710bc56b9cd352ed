use crate::catalog::AssetUrlSet;
use crate::config::ConvertConfig;
use crate::{ChannelRole, RawAssets};
use haven_util::profile::Measure;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to download '{url}': {source}")]
    Http {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("download of '{url}' returned status code {status}")]
    RequestFailed { url: Url, status: u16 },
    #[error("failed to store '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Download the three resolved URLs into the output directory, one file per
/// channel role. Either all three files exist afterwards or the first
/// failing download aborts the whole set.
pub fn download_assets(
    client: &reqwest::blocking::Client,
    config: &ConvertConfig,
    urls: &AssetUrlSet,
) -> Result<RawAssets, DownloadError> {
    let dir = config.output_dir();

    let download = |url: &Url, role: ChannelRole| -> Result<PathBuf, DownloadError> {
        let path = dir.join(format!("{}.{}", role.file_stem(), config.source_format));

        let _measure = Measure::new(format!("Downloaded {}", url));
        let response = client.get(url.clone()).send().map_err(|e| DownloadError::Http {
            url: url.clone(),
            source: e,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::RequestFailed {
                url: url.clone(),
                status: status.as_u16(),
            });
        }
        let content = response.bytes().map_err(|e| DownloadError::Http {
            url: url.clone(),
            source: e,
        })?;

        std::fs::create_dir_all(&dir).map_err(|e| DownloadError::Io {
            path: dir.clone(),
            source: e,
        })?;
        std::fs::write(&path, &content).map_err(|e| DownloadError::Io {
            path: path.clone(),
            source: e,
        })?;

        Ok(path)
    };

    Ok(RawAssets {
        albedo: download(&urls.albedo, ChannelRole::Albedo)?,
        normal: download(&urls.normal, ChannelRole::Normal)?,
        mrao: download(&urls.arm, ChannelRole::Mrao)?,
    })
}
