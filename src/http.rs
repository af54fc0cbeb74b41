//! Shared HTTP plumbing for the remote service clients.

use crate::error::{Result, VocardsError};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest error body echoed back in an error message.
const MAX_ERROR_BODY: usize = 300;

/// Builds a client whose every request is bounded by `timeout`.
///
/// The client pools connections; clone it to share the pool.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|e| VocardsError::http("HTTP client", e))
}

/// Passes 2xx responses through; turns anything else into a service error
/// carrying the status and the start of the body.
pub async fn check_status(service: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(VocardsError::Service {
        service: service.to_string(),
        message: format!("HTTP {}: {}", status, truncate(body.trim(), MAX_ERROR_BODY)),
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_truncate_cuts_on_char_boundary() {
        assert_eq!(truncate("привет мир", 6), "привет…");
    }

    #[tokio::test]
    async fn test_check_status_passes_success() {
        let (url, server) = test_server::serve_once(200, "text/plain", b"ok".to_vec()).await;
        let client = build_client(Duration::from_secs(5)).unwrap();

        let response = client.get(&url).send().await.unwrap();
        let response = check_status("Test", response).await.unwrap();
        assert_eq!(response.text().await.unwrap(), "ok");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_check_status_reports_status_and_body() {
        let (url, server) =
            test_server::serve_once(429, "application/json", b"{\"error\":\"slow down\"}".to_vec())
                .await;
        let client = build_client(Duration::from_secs(5)).unwrap();

        let response = client.get(&url).send().await.unwrap();
        let err = check_status("OpenAI", response).await.unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("OpenAI error: HTTP 429"), "got: {message}");
        assert!(message.contains("slow down"));
        server.await.unwrap();
    }
}
