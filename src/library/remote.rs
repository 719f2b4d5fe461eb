use std::time::Duration;

use log::{debug, warn};

use super::{
    TrackSource, Track, UNKNOWN_TITLE,
    types::{Item, ItemsResponse},
};
use crate::{AppError, RemoteConfig};

/// Everything needed to address one library on a media server.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchParams {
    pub server_url: String,
    pub api_key: String,
    pub user_id: String,
    pub library_id: String,
}

impl From<&RemoteConfig> for FetchParams {
    fn from(config: &RemoteConfig) -> Self {
        Self {
            server_url: config.url.clone(),
            api_key: config.api_key.clone(),
            user_id: config.user_id.clone(),
            library_id: config.library_id.clone(),
        }
    }
}

/// Fetches the audio catalog of a Jellyfin-style media server.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    insecure: bool,
}

impl RemoteClient {
    /// Creates a new HTTP client. With `insecure` set, TLS certificates are
    /// not verified at all, which is only acceptable for self-signed servers on
    /// a trusted network.
    pub fn new(timeout: Duration, insecure: bool) -> Result<Self, AppError> {
        if insecure {
            warn!("TLS certificate verification is disabled for the remote library");
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(insecure)
            .build()?;
        Ok(Self { client, insecure })
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self, AppError> {
        Self::new(Duration::from_secs(config.timeout_secs), config.insecure)
    }

    pub fn is_insecure(&self) -> bool {
        self.insecure
    }

    /// Returns every audio item of the library as a [`Track`].
    ///
    /// Never fails: transport errors and unusable responses give an empty
    /// list, a response that breaks off halfway gives the tracks parsed
    /// until then.
    pub async fn fetch_tracks(&self, params: &FetchParams) -> Vec<Track> {
        match self.get_items(params).await {
            Ok(body) => parse_items(&body, &params.server_url, &params.api_key),
            Err(e) => {
                warn!("failed to fetch remote library: {e}");
                Vec::new()
            }
        }
    }

    /// Errors carry no URL, the query string holds the api key.
    async fn get_items(&self, params: &FetchParams) -> Result<String, AppError> {
        if params.user_id.is_empty() {
            debug!("GET /Users/Items");
        } else {
            debug!("GET /Users/{}/Items", params.user_id);
        }
        let request = async {
            self.client
                .get(items_url(params))
                .send()
                .await?
                .error_for_status()?
                .text()
                .await
        };
        request.await.map_err(|e| AppError::Api(e.without_url()))
    }
}

fn trim_server(server_url: &str) -> &str {
    server_url.strip_suffix('/').unwrap_or(server_url)
}

pub fn items_url(params: &FetchParams) -> String {
    let mut url = format!("{}/Users", trim_server(&params.server_url));
    if !params.user_id.is_empty() {
        url.push('/');
        url.push_str(&params.user_id);
    }
    url.push_str("/Items?Recursive=true&IncludeItemTypes=Audio&Fields=Album,Artists,ProviderIds");
    if !params.library_id.is_empty() {
        url.push_str("&ParentId=");
        url.push_str(&params.library_id);
    }
    if !params.api_key.is_empty() {
        url.push_str("&api_key=");
        url.push_str(&params.api_key);
    }
    url
}

pub fn download_url(server_url: &str, id: &str, api_key: &str) -> String {
    let url = format!("{}/Items/{}/Download", trim_server(server_url), id);
    if api_key.is_empty() {
        url
    } else {
        format!("{url}?api_key={api_key}")
    }
}

/// Turns an items response into tracks. Items without an ID are skipped,
/// the first malformed item ends parsing.
pub fn parse_items(body: &str, server_url: &str, api_key: &str) -> Vec<Track> {
    let response: ItemsResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => {
            warn!("remote library response is not usable: {e}");
            return Vec::new();
        }
    };

    let mut tracks = Vec::new();
    for value in response.items {
        let item: Item = match serde_json::from_value(value) {
            Ok(item) => item,
            Err(e) => {
                warn!(
                    "malformed item in remote library, keeping {} tracks: {e}",
                    tracks.len()
                );
                break;
            }
        };

        let id = match item.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => {
                debug!("skipping item {:?} without ID", item.name);
                continue;
            }
        };

        tracks.push(Track::new(
            item.name.as_deref().unwrap_or(UNKNOWN_TITLE),
            item.first_artist().unwrap_or_default(),
            TrackSource::Remote(download_url(server_url, id, api_key)),
        ));
    }
    debug!("parsed {} remote tracks", tracks.len());
    tracks
}
