//! Microsoft Graph directory
//!
//! Implements `Directory` with HTTP calls against the Graph REST API:
//! `GET /me`, `POST /search/query`, `GET /users/{id}/directReports` and
//! `GET /users/{id}/department`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::DirectorySettings;
use crate::error::{Error, Result};

use super::{Directory, DirectoryEntry, TopPerson};

// ─────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────

/// Connection settings for the Graph client
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// API base URL without trailing slash
    pub base_url: String,

    /// Bearer token
    pub token: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GraphConfig {
    /// Build from configuration, requiring a token
    pub fn from_settings(settings: &DirectorySettings) -> Result<Self> {
        let token = settings
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::config_field_invalid(
                    "directory.token",
                    "No API token configured; pass --token or set ORGCHART_TOKEN",
                )
            })?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            timeout_secs: settings.timeout_secs,
        })
    }
}

// ─────────────────────────────────────────────────────────────────
// Graph API types (request/response)
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SearchRequestBody {
    requests: Vec<SearchRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    entity_types: Vec<&'static str>,
    query: SearchQuery,
    from: u32,
    size: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery {
    query_string: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    value: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    hits_containers: Vec<HitsContainer>,
}

#[derive(Debug, Deserialize)]
struct HitsContainer {
    total: u64,
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    resource: PersonResource,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonResource {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    user_principal_name: Option<String>,
    #[serde(default)]
    job_title: Option<String>,
    #[serde(default)]
    department: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ODataList<T> {
    value: Vec<T>,
    #[serde(rename = "@odata.nextLink", default)]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ODataValue<T> {
    #[serde(default)]
    value: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Me {
    #[serde(default)]
    mail: Option<String>,
    #[serde(default)]
    user_principal_name: Option<String>,
}

// ─────────────────────────────────────────────────────────────────
// Graph Directory
// ─────────────────────────────────────────────────────────────────

/// Directory backed by the Microsoft Graph API
pub struct GraphDirectory {
    config: GraphConfig,
    client: Client,
}

impl GraphDirectory {
    /// Create a new Graph directory client
    pub fn new(config: GraphConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!(base_url = %config.base_url, "Graph directory created");

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    /// Send a request, turning transport failures and error statuses into errors
    async fn send(&self, subject: &str, request: RequestBuilder) -> Result<Response> {
        let response = request
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::FetchTimeout {
                        subject: subject.to_string(),
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    Error::fetch(subject, format!("Request error: {}", e))
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::AuthenticationFailed {
                message: format!("{} rejected the token ({})", self.config.base_url, status),
            });
        }
        Err(Error::fetch(subject, format!("API error {}: {}", status, body)))
    }

    async fn get_json<T: DeserializeOwned>(&self, subject: &str, path: &str) -> Result<T> {
        let response = self.send(subject, self.client.get(self.url(path))).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| Error::malformed(subject, e.to_string()))
    }
}

/// Search hits carry ids like "<object-id>@<tenant-id>"; the user endpoints want the object id
fn object_id(search_id: &str) -> &str {
    search_id.split('@').next().unwrap_or(search_id)
}

#[async_trait]
impl Directory for GraphDirectory {
    fn name(&self) -> &'static str {
        "graph"
    }

    async fn validate(&self) -> Result<()> {
        let me: Me = self
            .get_json("me", "me")
            .await
            .map_err(|e| match e {
                Error::Fetch { message, .. } => Error::AuthenticationFailed { message },
                other => other,
            })?;

        let who = me
            .mail
            .or(me.user_principal_name)
            .unwrap_or_else(|| "unknown account".to_string());
        info!(account = %who, "Validated token");
        Ok(())
    }

    async fn search_top_person(&self, query: &str) -> Result<TopPerson> {
        let body = SearchRequestBody {
            requests: vec![SearchRequest {
                entity_types: vec!["person"],
                query: SearchQuery {
                    query_string: query.to_string(),
                },
                from: 0,
                size: 2,
            }],
        };

        let request = self.client.post(self.url("search/query")).json(&body);
        let response = self.send(query, request).await?;
        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::malformed(query, e.to_string()))?;

        let container = parsed
            .value
            .into_iter()
            .next()
            .and_then(|r| r.hits_containers.into_iter().next())
            .ok_or_else(|| Error::malformed(query, "search response has no hits container"))?;

        match container.total {
            0 => return Err(Error::NotFound { query: query.to_string() }),
            1 => {}
            total => {
                return Err(Error::AmbiguousResult {
                    query: query.to_string(),
                    total,
                })
            }
        }

        let resource = container
            .hits
            .into_iter()
            .next()
            .map(|h| h.resource)
            .ok_or_else(|| Error::malformed(query, "search reported a match but returned no hit"))?;

        Ok(TopPerson {
            entry: DirectoryEntry {
                id: object_id(&resource.id).to_string(),
                display_name: resource.display_name,
                user_principal_name: resource.user_principal_name,
                job_title: resource.job_title,
            },
            department: resource.department,
        })
    }

    async fn direct_reports(&self, id: &str) -> Result<Vec<DirectoryEntry>> {
        let list: ODataList<DirectoryEntry> = self
            .get_json(id, &format!("users/{}/directReports", id))
            .await?;

        if list.next_link.is_some() {
            warn!(person_id = %id, "Direct reports are paged; only the first page is used");
        }
        Ok(list.value)
    }

    async fn department(&self, id: &str) -> Result<Option<String>> {
        let value: ODataValue<String> = self
            .get_json(id, &format!("users/{}/department", id))
            .await?;
        Ok(value.value)
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
