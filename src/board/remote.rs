//! The project service as seen from the board.
//!
//! `ProjectRemote` is the CRUD surface the board depends on; `HttpRemote`
//! implements it over the service's JSON API:
//!
//! | Call                 | HTTP                         |
//! |----------------------|------------------------------|
//! | `list`               | `GET /projects`              |
//! | `get`                | `GET /projects/{id}`         |
//! | `create`             | `POST /projects`             |
//! | `update`             | `PATCH /projects/{id}`       |
//! | `delete`             | `DELETE /projects/{id}`      |

use std::time::Duration;

use async_trait::async_trait;
use nightwing_common::{Project, ProjectDraft, ProjectId, ProjectPatch};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::errors::{BoardError, BoardResult};

#[async_trait]
pub trait ProjectRemote: Send + Sync {
    async fn list(&self) -> BoardResult<Vec<Project>>;
    async fn get(&self, id: &ProjectId) -> BoardResult<Project>;
    async fn create(&self, draft: &ProjectDraft) -> BoardResult<Project>;
    async fn update(&self, id: &ProjectId, patch: &ProjectPatch) -> BoardResult<Project>;
    async fn delete(&self, id: &ProjectId) -> BoardResult<()>;
}

#[derive(Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemote {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn project_url(&self, id: &ProjectId) -> String {
        self.url(&format!("/projects/{}", id))
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        id: Option<&ProjectId>,
    ) -> BoardResult<reqwest::Response> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = error_message(response).await;
        Err(classify_status(status, id, message))
    }

    async fn json<T: DeserializeOwned>(response: reqwest::Response) -> BoardResult<T> {
        response.json::<T>().await.map_err(|e| {
            BoardError::RemoteUnreachable(format!("Malformed response from project service: {}", e))
        })
    }
}

#[async_trait]
impl ProjectRemote for HttpRemote {
    async fn list(&self) -> BoardResult<Vec<Project>> {
        let response = self.send(self.client.get(self.url("/projects")), None).await?;
        Self::json(response).await
    }

    async fn get(&self, id: &ProjectId) -> BoardResult<Project> {
        let response = self.send(self.client.get(self.project_url(id)), Some(id)).await?;
        Self::json(response).await
    }

    async fn create(&self, draft: &ProjectDraft) -> BoardResult<Project> {
        let request = self.client.post(self.url("/projects")).json(draft);
        let response = self.send(request, None).await?;
        Self::json(response).await
    }

    async fn update(&self, id: &ProjectId, patch: &ProjectPatch) -> BoardResult<Project> {
        let request = self.client.patch(self.project_url(id)).json(patch);
        let response = self.send(request, Some(id)).await?;
        Self::json(response).await
    }

    async fn delete(&self, id: &ProjectId) -> BoardResult<()> {
        self.send(self.client.delete(self.project_url(id)), Some(id))
            .await?;
        Ok(())
    }
}

fn transport_error(err: reqwest::Error) -> BoardError {
    if err.is_timeout() {
        BoardError::RemoteUnreachable("request timed out".to_string())
    } else if err.is_connect() {
        BoardError::RemoteUnreachable(format!("connection failed: {}", err))
    } else {
        BoardError::RemoteUnreachable(err.to_string())
    }
}

/// Pull the `{"error": ".."}` message the service sends with failures,
/// falling back to the raw body.
async fn error_message(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or(body)
}

/// A 404 only means "no such project" on a per-project route. On the
/// collection route it means the base URL does not point at the service.
fn classify_status(status: StatusCode, id: Option<&ProjectId>, message: String) -> BoardError {
    if let Some(id) = id.filter(|_| status == StatusCode::NOT_FOUND) {
        BoardError::ProjectNotFound { id: id.to_string() }
    } else if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
        BoardError::Validation(message)
    } else if status.is_server_error() {
        BoardError::RemoteUnreachable(format!("project service returned {}: {}", status, message))
    } else {
        BoardError::RemoteUnreachable(format!("unexpected status {}: {}", status, message))
    }
}
