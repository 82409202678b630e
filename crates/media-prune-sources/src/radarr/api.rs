use anyhow::Context;
use async_trait::async_trait;
use media_prune_models::{LibraryEntry, TagMap};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::SourceError;
use crate::traits::MovieLibrary;

const SERVICE: &str = "radarr";

#[derive(Debug, Deserialize)]
struct RadarrTag {
    id: u64,
    label: String,
}

#[derive(Debug, Deserialize)]
struct RadarrMovie {
    id: u64,
    title: String,
    year: Option<u32>,
    #[serde(rename = "tmdbId")]
    tmdb_id: Option<u32>,
    #[serde(default)]
    tags: Vec<u64>,
    #[serde(rename = "hasFile", default)]
    has_file: bool,
    path: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExclusionPayload {
    #[serde(rename = "tmdbId")]
    tmdb_id: u32,
    #[serde(rename = "movieTitle")]
    movie_title: String,
    #[serde(rename = "movieYear")]
    movie_year: u32,
}

/// Client for the library tool's v3 API: tag lookup, movie listing,
/// delete-with-files and the import exclusion list.
pub struct RadarrHttpClient {
    client: Client,
    base_url: String,
}

impl RadarrHttpClient {
    pub fn new(base_url: String, api_key: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers.insert(
                    reqwest::header::HeaderName::from_static("x-api-key"),
                    reqwest::header::HeaderValue::from_str(&api_key)
                        .context("Invalid API key format")?,
                );
                headers
            })
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/v3{}", self.base_url, endpoint)
    }

    async fn get(&self, endpoint: &str) -> Result<reqwest::Response, SourceError> {
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|source| SourceError::Connection {
                service: SERVICE,
                url: self.base_url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(SourceError::auth_hint(SERVICE, status));
            }
            return Err(SourceError::Api {
                service: SERVICE,
                endpoint: endpoint.to_string(),
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response)
    }

    /// Basic authentication check before anything else runs.
    pub async fn check_auth(&self) -> Result<(), SourceError> {
        self.get("/system/status").await?;
        debug!("Radarr API authentication successful");
        Ok(())
    }

    /// Resolve configured exclusion tag names against Radarr's tag labels.
    pub async fn resolve_tags(&self, names: &[String]) -> Result<TagMap, SourceError> {
        let tags: Vec<RadarrTag> = self.get("/tag").await?.json().await?;
        let labels: Vec<(u64, String)> = tags.into_iter().map(|t| (t.id, t.label)).collect();

        let map = TagMap::resolve(names, &labels);
        for name in map.unresolved() {
            warn!(
                "Radarr tag '{}' not found; movies with this tag will NOT be protected",
                name
            );
        }
        Ok(map)
    }

    /// All managed movies. Entries without a TMDb ID cannot be matched and
    /// are dropped here.
    pub async fn get_movies(&self) -> Result<Vec<LibraryEntry>, SourceError> {
        let movies: Vec<RadarrMovie> = self.get("/movie").await?.json().await?;

        let entries: Vec<LibraryEntry> = movies
            .into_iter()
            .filter_map(|movie| {
                let Some(tmdb_id) = movie.tmdb_id else {
                    debug!("Radarr movie '{}' has no TMDb ID, ignoring", movie.title);
                    return None;
                };
                Some(LibraryEntry {
                    id: movie.id,
                    tmdb_id,
                    title: movie.title,
                    year: movie.year,
                    tag_ids: movie.tags.into_iter().collect(),
                    has_file: movie.has_file,
                    path: movie.path,
                })
            })
            .collect();

        debug!("Radarr: {} managed movies", entries.len());
        Ok(entries)
    }
}

#[async_trait]
impl MovieLibrary for RadarrHttpClient {
    async fn delete_movie(&self, id: u64) -> Result<(), SourceError> {
        let response = self
            .client
            .delete(self.url(&format!("/movie/{}", id)))
            .query(&[("deleteFiles", "true")])
            .send()
            .await
            .map_err(|source| SourceError::Connection {
                service: SERVICE,
                url: self.base_url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(SourceError::Api {
                service: SERVICE,
                endpoint: format!("/movie/{}", id),
                status: response.status(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        info!("Deleted Radarr movie {} and its files", id);
        Ok(())
    }

    async fn add_exclusion(&self, tmdb_id: u32, title: &str, year: u32) -> Result<(), SourceError> {
        let payload = ExclusionPayload {
            tmdb_id,
            movie_title: title.to_string(),
            movie_year: year,
        };

        let response = self
            .client
            .post(self.url("/exclusions"))
            .json(&payload)
            .send()
            .await
            .map_err(|source| SourceError::Connection {
                service: SERVICE,
                url: self.base_url.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            info!("Added '{}' (tmdb {}) to Radarr exclusion list", title, tmdb_id);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        // Radarr rejects duplicates with a validation error; an identifier
        // that is already on the list is the state we wanted anyway.
        if status.as_u16() == 400 && is_already_excluded(&body) {
            info!("'{}' (tmdb {}) is already on the exclusion list", title, tmdb_id);
            return Ok(());
        }

        Err(SourceError::Api {
            service: SERVICE,
            endpoint: "/exclusions".to_string(),
            status,
            body,
        })
    }
}

fn is_already_excluded(body: &str) -> bool {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.as_array().cloned())
        .map(|errors| {
            errors.iter().any(|err| {
                err.get("errorCode").and_then(|c| c.as_str())
                    == Some("ImportListExclusionExistsValidator")
            })
        })
        .unwrap_or(false)
}
