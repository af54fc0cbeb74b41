//! AnkiConnect client.
//!
//! Every call is a POST of `{action, version, params}`; every reply is
//! `{result, error}` with `error` null on success, even for HTTP 200.

use crate::anki::note::Note;
use crate::anki::store::NoteStore;
use crate::defaults;
use crate::error::{Result, VocardsError};
use crate::http::check_status;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

const SERVICE: &str = "AnkiConnect";

#[derive(Debug, Serialize)]
struct AnkiRequest<'a, P: Serialize> {
    action: &'a str,
    version: u32,
    params: P,
}

#[derive(Debug, Deserialize)]
struct AnkiResponse<T> {
    result: Option<T>,
    error: Option<String>,
}

impl<T> AnkiResponse<T> {
    fn into_result(self, action: &str) -> Result<T> {
        if let Some(error) = self.error {
            return Err(VocardsError::Service {
                service: SERVICE.to_string(),
                message: error,
            });
        }
        self.result.ok_or_else(|| VocardsError::Service {
            service: SERVICE.to_string(),
            message: format!("{action} returned no result"),
        })
    }
}

#[derive(Clone)]
pub struct AnkiConnect {
    http: reqwest::Client,
    url: String,
}

impl AnkiConnect {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Runs one action and decodes its result.
    async fn invoke<P, T>(&self, action: &str, params: P) -> Result<T>
    where
        P: Serialize + Send,
        T: DeserializeOwned,
    {
        let request = AnkiRequest {
            action,
            version: defaults::ANKI_API_VERSION,
            params,
        };

        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| VocardsError::http(SERVICE, e))?;

        let body = check_status(SERVICE, response)
            .await?
            .text()
            .await
            .map_err(|e| VocardsError::http(SERVICE, e))?;

        let reply: AnkiResponse<T> =
            serde_json::from_str(&body).map_err(|e| VocardsError::Service {
                service: SERVICE.to_string(),
                message: format!("unexpected response to {action}: {e}"),
            })?;

        reply.into_result(action)
    }
}

#[async_trait]
impl NoteStore for AnkiConnect {
    async fn add_note(&self, note: &Note) -> Result<i64> {
        self.invoke("addNote", json!({ "note": note })).await
    }
}
