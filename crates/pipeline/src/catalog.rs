use crate::config::ConvertConfig;
use crate::ChannelRole;
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request for '{texture}' failed: {source}")]
    Http {
        texture: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("catalog request for '{texture}' returned status code {status}")]
    RequestFailed { texture: String, status: u16 },
    #[error("malformed catalog response for '{texture}': {source}")]
    MalformedResponse {
        texture: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("catalog listing for '{texture}' has no '{channel}' channel")]
    MissingChannel {
        texture: String,
        channel: &'static str,
    },
    #[error("catalog listing for '{texture}' does not offer '{channel}' at resolution '{resolution}'")]
    MissingResolution {
        texture: String,
        channel: &'static str,
        resolution: String,
    },
    #[error("catalog listing for '{texture}' does not offer '{channel}' in format '{format}'")]
    MissingFormat {
        texture: String,
        channel: &'static str,
        format: String,
    },
}

/// The three per-channel download URLs of one texture set, all at the
/// configured resolution and source format.
#[derive(Debug, Clone)]
pub struct AssetUrlSet {
    pub albedo: Url,
    pub normal: Url,
    pub arm: Url,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    url: Url,
}

/// The catalog listing is keyed channel -> resolution -> format, with the
/// download URL at the leaf. Unknown leaf fields are ignored.
type FileListing = HashMap<String, HashMap<String, HashMap<String, FileEntry>>>;

/// Query the catalog for one texture identifier and extract the three
/// channel URLs. Any missing channel/resolution/format key surfaces as an
/// explicit, texture-identified error instead of a parse crash.
pub fn resolve(
    client: &reqwest::blocking::Client,
    config: &ConvertConfig,
    texture: &str,
) -> Result<AssetUrlSet, CatalogError> {
    let endpoint = format!(
        "{}/files/{}",
        config.catalog_url.as_str().trim_end_matches('/'),
        texture
    );
    debug!("Querying catalog endpoint {}", endpoint);

    let response = client
        .get(&endpoint)
        .send()
        .map_err(|e| CatalogError::Http {
            texture: texture.to_string(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::RequestFailed {
            texture: texture.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().map_err(|e| CatalogError::Http {
        texture: texture.to_string(),
        source: e,
    })?;

    parse_listing(config, texture, &body)
}

/// Pure extraction half of the resolver, split out so it can be exercised
/// against fixture responses without a network.
pub(crate) fn parse_listing(
    config: &ConvertConfig,
    texture: &str,
    body: &str,
) -> Result<AssetUrlSet, CatalogError> {
    let listing: FileListing =
        serde_json::from_str(body).map_err(|e| CatalogError::MalformedResponse {
            texture: texture.to_string(),
            source: e,
        })?;

    let pick = |role: ChannelRole| -> Result<Url, CatalogError> {
        let channel = role.catalog_key();
        let resolutions = listing
            .get(channel)
            .ok_or_else(|| CatalogError::MissingChannel {
                texture: texture.to_string(),
                channel,
            })?;
        let formats =
            resolutions
                .get(&config.resolution)
                .ok_or_else(|| CatalogError::MissingResolution {
                    texture: texture.to_string(),
                    channel,
                    resolution: config.resolution.clone(),
                })?;
        let entry =
            formats
                .get(&config.source_format)
                .ok_or_else(|| CatalogError::MissingFormat {
                    texture: texture.to_string(),
                    channel,
                    format: config.source_format.clone(),
                })?;
        Ok(entry.url.clone())
    };

    Ok(AssetUrlSet {
        albedo: pick(ChannelRole::Albedo)?,
        normal: pick(ChannelRole::Normal)?,
        arm: pick(ChannelRole::Mrao)?,
    })
}
