//! HTTP client for the notes REST backend.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::Config;
use crate::entity::{FetchNotesParams, Note, NoteFormValues, NoteListResponse};
use crate::error::{NotehubError, Result};

use super::NotesApi;

pub struct HttpNotesApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpNotesApi {
    /// Create a client for the given base URL, e.g. `http://localhost:3000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn notes_url(&self) -> String {
        format!("{}/notes", self.base_url)
    }

    fn note_url(&self, id: &str) -> String {
        format!("{}/notes/{}", self.base_url, id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Turn a response into `T`, mapping non-2xx to `Server` and a 404 on a
    /// by-id route to `NoteNotFound`.
    async fn read_json<T: DeserializeOwned>(resp: Response, id: Option<&str>) -> Result<T> {
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(NotehubError::NoteNotFound(id.to_string()));
            }
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotehubError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json().await?)
    }
}

impl NotesApi for HttpNotesApi {
    async fn create_note(&self, values: &NoteFormValues) -> Result<Note> {
        let url = self.notes_url();
        info!(url = %url, tag = %values.tag, "creating note");

        let resp = self
            .authorize(self.client.post(&url).json(values))
            .send()
            .await?;
        let note: Note = Self::read_json(resp, None).await?;

        info!(id = %note.id, "note created");
        Ok(note)
    }

    async fn fetch_notes(&self, params: &FetchNotesParams) -> Result<NoteListResponse> {
        let url = self.notes_url();
        let mut query: Vec<(&str, String)> = vec![
            ("page", params.page.to_string()),
            ("perPage", params.per_page.to_string()),
        ];
        if let Some(search) = params.search_term() {
            query.push(("search", search.to_string()));
        }
        if let Some(tag) = params.tag {
            query.push(("tag", tag.to_string()));
        }

        debug!(url = %url, ?query, "fetching notes");
        let resp = self
            .authorize(self.client.get(&url).query(&query))
            .send()
            .await?;
        let list: NoteListResponse = Self::read_json(resp, None).await?;

        debug!(count = list.notes.len(), total_pages = list.total_pages, "fetched notes");
        Ok(list)
    }

    async fn fetch_note_by_id(&self, id: &str) -> Result<Note> {
        let url = self.note_url(id);
        debug!(url = %url, "fetching note");
        let resp = self.authorize(self.client.get(&url)).send().await?;
        Self::read_json(resp, Some(id)).await
    }

    async fn delete_note(&self, id: &str) -> Result<Note> {
        let url = self.note_url(id);
        info!(url = %url, "deleting note");
        let resp = self.authorize(self.client.delete(&url)).send().await?;
        Self::read_json(resp, Some(id)).await
    }
}
