use anyhow::Context;
use chrono::{DateTime, TimeZone, Utc};
use media_prune_models::WatchedItem;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::SourceError;

const SERVICE: &str = "plex";

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub key: String,
    pub type_: String,
    pub title: String,
}

/// Read-only client for the media server. Only the watched-movie query is
/// needed; everything is parsed leniently from `serde_json::Value` because
/// Plex payload shapes vary between server versions.
pub struct PlexHttpClient {
    client: Client,
    token: String,
    server_url: String,
}

impl PlexHttpClient {
    pub fn new(server_url: String, token: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers.insert(
                    reqwest::header::HeaderName::from_static("x-plex-token"),
                    reqwest::header::HeaderValue::from_str(&token)
                        .context("Invalid token format")?,
                );
                headers.insert(
                    reqwest::header::HeaderName::from_static("x-plex-client-identifier"),
                    reqwest::header::HeaderValue::from_static("watchsweep-cli"),
                );
                headers
            })
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            token,
            server_url,
        })
    }

    pub async fn get_libraries(&self) -> Result<Vec<LibraryInfo>, SourceError> {
        let url = format!("{}/library/sections", self.server_url);
        let response = self
            .client
            .get(&url)
            .header("X-Plex-Token", &self.token)
            .send()
            .await
            .map_err(|source| SourceError::Connection {
                service: SERVICE,
                url: self.server_url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(SourceError::auth_hint(SERVICE, status));
            }
            return Err(SourceError::Api {
                service: SERVICE,
                endpoint: "/library/sections".to_string(),
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }

        let json: Value = response.json().await?;

        let mut libraries = Vec::new();
        if let Some(dir_array) = json
            .get("MediaContainer")
            .and_then(|mc| mc.get("Directory"))
            .and_then(|d| d.as_array())
        {
            for dir in dir_array {
                let key = dir
                    .get("key")
                    .and_then(|k| k.as_str())
                    .unwrap_or("")
                    .to_string();
                let type_ = dir
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or("")
                    .to_string();
                let title = dir
                    .get("title")
                    .and_then(|t| t.as_str())
                    .unwrap_or("")
                    .to_string();

                libraries.push(LibraryInfo { key, type_, title });
            }
        }

        Ok(libraries)
    }

    /// Fetch every movie in the named library section that has been watched
    /// at least once, with its most recent watch timestamp. Items without a
    /// TMDb GUID cannot be matched against the library tool and are skipped
    /// with a warning.
    pub async fn get_watched_movies(
        &self,
        section_title: &str,
    ) -> Result<Vec<WatchedItem>, SourceError> {
        let libraries = self.get_libraries().await?;
        let section = libraries
            .iter()
            .find(|lib| lib.type_ == "movie" && lib.title == section_title)
            .ok_or_else(|| SourceError::Parse {
                service: SERVICE,
                endpoint: "/library/sections".to_string(),
                detail: format!("no movie library section titled '{}'", section_title),
            })?;

        let url = format!("{}/library/sections/{}/all", self.server_url, section.key);
        let response = self
            .client
            .get(&url)
            .header("X-Plex-Token", &self.token)
            .send()
            .await
            .map_err(|source| SourceError::Connection {
                service: SERVICE,
                url: self.server_url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(SourceError::Api {
                service: SERVICE,
                endpoint: format!("/library/sections/{}/all", section.key),
                status: response.status(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let json: Value = response.json().await?;

        let empty = Vec::new();
        let metadata = json
            .get("MediaContainer")
            .and_then(|mc| mc.get("Metadata").or_else(|| mc.get("Video")))
            .and_then(|m| m.as_array())
            .unwrap_or(&empty);

        let mut watched = Vec::new();
        for item in metadata {
            let Some(last_watched_at) = parse_timestamp(item.get("lastViewedAt")) else {
                continue;
            };
            let title = item
                .get("title")
                .and_then(|t| t.as_str())
                .unwrap_or("Unknown")
                .to_string();
            let year = item.get("year").and_then(|y| y.as_u64()).map(|y| y as u32);

            let guids = parse_guid_array(item.get("Guid").unwrap_or(&Value::Null));
            let Some(tmdb_id) = extract_tmdb_id(&guids) else {
                warn!(
                    "Skipping '{}' from Plex: no TMDb GUID, cannot match or exclude",
                    title
                );
                continue;
            };

            watched.push(WatchedItem {
                tmdb_id,
                title,
                year,
                last_watched_at,
            });
        }

        debug!(
            "Plex: {} watched movies in section '{}'",
            watched.len(),
            section_title
        );
        Ok(watched)
    }
}

fn parse_timestamp(timestamp: Option<&Value>) -> Option<DateTime<Utc>> {
    timestamp
        .and_then(|t| t.as_i64())
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
}

fn parse_guid_array(guid_value: &Value) -> Vec<String> {
    let mut guids = Vec::new();
    if guid_value.is_null() {
        return guids;
    }

    if let Some(guid_array) = guid_value.as_array() {
        for guid_obj in guid_array {
            if let Some(id) = guid_obj.get("id").and_then(|i| i.as_str()) {
                guids.push(id.to_string());
            } else if let Some(id_str) = guid_obj.as_str() {
                // Sometimes GUIDs come back as plain strings
                guids.push(id_str.to_string());
            }
        }
    } else if let Some(guid_obj) = guid_value.as_object() {
        if let Some(id) = guid_obj.get("id").and_then(|i| i.as_str()) {
            guids.push(id.to_string());
        }
    } else if let Some(id_str) = guid_value.as_str() {
        guids.push(id_str.to_string());
    }
    guids
}

/// Pull the numeric TMDb ID out of a GUID list (`tmdb://603` style entries).
fn extract_tmdb_id(guids: &[String]) -> Option<u32> {
    guids
        .iter()
        .find_map(|guid| guid.strip_prefix("tmdb://"))
        .and_then(|id| id.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_tmdb_id() {
        let guids = vec![
            "imdb://tt0133093".to_string(),
            "tmdb://603".to_string(),
            "tvdb://1858".to_string(),
        ];
        assert_eq!(extract_tmdb_id(&guids), Some(603));
    }

    #[test]
    fn test_extract_tmdb_id_missing() {
        let guids = vec!["imdb://tt0133093".to_string()];
        assert_eq!(extract_tmdb_id(&guids), None);
        assert_eq!(extract_tmdb_id(&[]), None);
    }

    #[test]
    fn test_parse_guid_array_object_form() {
        let value = json!([{"id": "tmdb://603"}, {"id": "imdb://tt0133093"}]);
        let guids = parse_guid_array(&value);
        assert_eq!(guids, vec!["tmdb://603", "imdb://tt0133093"]);
    }

    #[test]
    fn test_parse_guid_array_string_forms() {
        let guids = parse_guid_array(&json!(["tmdb://603"]));
        assert_eq!(guids, vec!["tmdb://603"]);

        let guids = parse_guid_array(&json!("tmdb://603"));
        assert_eq!(guids, vec!["tmdb://603"]);

        assert!(parse_guid_array(&Value::Null).is_empty());
    }

    #[test]
    fn test_parse_timestamp() {
        let value = json!(1700000000);
        let parsed = parse_timestamp(Some(&value)).unwrap();
        assert_eq!(parsed.timestamp(), 1700000000);

        assert_eq!(parse_timestamp(None), None);
        assert_eq!(parse_timestamp(Some(&json!("not a number"))), None);
    }
}
