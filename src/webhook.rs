//! Fire-and-forget webhook notifications for served API results.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use reqwest::Url;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, warn};

use crate::fetch::{HttpClient, post_json};

#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload<T> {
    pub event: &'static str,
    pub timestamp: String,
    pub status: u16,
    pub duration_ms: u64,
    pub data: T,
}

impl<T> WebhookPayload<T> {
    pub fn new(event: &'static str, status: u16, duration_ms: u64, data: T) -> Self {
        Self {
            event,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            status,
            duration_ms,
            data,
        }
    }
}

#[derive(Clone)]
pub struct Webhook {
    url: Option<Url>,
    http: Arc<dyn HttpClient>,
}

impl Webhook {
    pub fn new(url: Option<Url>, http: Arc<dyn HttpClient>) -> Self {
        Self { url, http }
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Posts `payload` in the background. Delivery failures are only logged.
    ///
    /// Returns the spawned task, or `None` when no URL is configured.
    pub fn notify<T>(&self, payload: WebhookPayload<T>) -> Option<JoinHandle<()>>
    where
        T: Serialize + Send + Sync + 'static,
    {
        let Some(url) = self.url.clone() else {
            warn!("WEBHOOK_URL is not configured, skipping webhook");
            return None;
        };

        let http = self.http.clone();
        let span = tracing::info_span!("webhook", event = payload.event);

        Some(tokio::spawn(
            async move {
                match post_json(http.as_ref(), url, &payload).await {
                    Ok(status) if (200..300).contains(&status) => {
                        debug!(status, "Webhook delivered");
                    }
                    Ok(status) => warn!(status, "Webhook endpoint rejected payload"),
                    Err(e) => error!(error = %e, "Webhook failed"),
                }
            }
            .instrument(span),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        requests: Mutex<Vec<(String, String, Vec<u8>)>>,
    }

    #[async_trait]
    impl HttpClient for Recorder {
        async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            let body = req
                .body()
                .and_then(|b| b.as_bytes())
                .map(<[u8]>::to_vec)
                .unwrap_or_default();
            let content_type = req
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            self.requests
                .lock()
                .unwrap()
                .push((req.url().to_string(), content_type, body));

            let resp = http::Response::builder().status(204).body("").unwrap();
            Ok(reqwest::Response::from(resp))
        }
    }

    #[tokio::test]
    async fn test_notify_without_url_is_noop() {
        let recorder = Arc::new(Recorder::default());
        let webhook = Webhook::new(None, recorder.clone());

        assert!(!webhook.is_enabled());
        assert!(webhook.notify(WebhookPayload::new("E", 200, 1, ())).is_none());
        assert!(recorder.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notify_posts_json() {
        let recorder = Arc::new(Recorder::default());
        let url = Url::parse("https://hooks.example.test/covid").unwrap();
        let webhook = Webhook::new(Some(url), recorder.clone());

        let payload = WebhookPayload::new("COVID_RATE_CHANGE", 200, 42, vec![1, 2, 3]);
        webhook.notify(payload).unwrap().await.unwrap();

        let requests = recorder.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (url, content_type, body) = &requests[0];
        assert_eq!(url, "https://hooks.example.test/covid");
        assert_eq!(content_type, "application/json");

        let json: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(json["event"], "COVID_RATE_CHANGE");
        assert_eq!(json["duration_ms"], 42);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }
}
